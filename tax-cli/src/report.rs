//! Plain-text rendering of results for the terminal.

use std::fmt;

use rust_decimal::Decimal;
use tax_core::calculations::YearProjection;
use tax_core::calculations::common::format_percent;
use tax_core::{Epoch, LineCategory, TaxCalculationRequest, TaxLineItem, TaxResult, TaxSummary};

const NAME_WIDTH: usize = 44;

fn category_label(category: LineCategory) -> &'static str {
    match category {
        LineCategory::OnRevenue => "revenue",
        LineCategory::OnResult => "result",
        LineCategory::Informational => "balance",
    }
}

fn write_items(
    f: &mut fmt::Formatter<'_>,
    items: &[TaxLineItem],
) -> fmt::Result {
    writeln!(
        f,
        "{:<NAME_WIDTH$} {:<8} {:>9} {:>14}",
        "Item", "Base", "Rate", "Value"
    )?;
    for item in items {
        writeln!(
            f,
            "{:<NAME_WIDTH$} {:<8} {:>9} {:>14.2}",
            item.name,
            category_label(item.category),
            item.rate.as_deref().unwrap_or("-"),
            item.value
        )?;
    }
    Ok(())
}

fn write_totals(
    f: &mut fmt::Formatter<'_>,
    total: Decimal,
    effective_rate: Decimal,
) -> fmt::Result {
    writeln!(f, "{:<NAME_WIDTH$} {:>33.2}", "Total", total)?;
    writeln!(
        f,
        "{:<NAME_WIDTH$} {:>33}",
        "Effective rate",
        format_percent(effective_rate)
    )
}

/// One itemized result with its epoch.
pub struct ResultReport<'a> {
    pub epoch: Epoch,
    pub result: &'a TaxResult,
}

impl fmt::Display for ResultReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(f, "Epoch: {}", self.epoch)?;
        if self.result.is_zero() {
            return writeln!(f, "No tax due.");
        }
        write_items(f, &self.result.items)?;
        write_totals(f, self.result.total, self.result.effective_rate)
    }
}

/// One line per projected year.
pub struct TimelineReport<'a>(pub &'a [YearProjection]);

impl fmt::Display for TimelineReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(
            f,
            "{:<6} {:<24} {:>14} {:>10}",
            "Year", "Epoch", "Total", "Effective"
        )?;
        for projection in self.0 {
            writeln!(
                f,
                "{:<6} {:<24} {:>14.2} {:>10}",
                projection.year,
                projection.epoch.to_string(),
                projection.result.total,
                format_percent(projection.result.effective_rate)
            )?;
        }
        Ok(())
    }
}

/// Per-row totals followed by the combined summary.
pub struct BatchReport<'a> {
    pub rows: &'a [(TaxCalculationRequest, TaxResult)],
    pub summary: &'a TaxSummary,
}

impl fmt::Display for BatchReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(
            f,
            "{:>4} {:<6} {:<16} {:<12} {:>14} {:>14} {:>10}",
            "Row", "Year", "Regime", "Code", "Revenue", "Total", "Effective"
        )?;
        for (idx, (request, result)) in self.rows.iter().enumerate() {
            writeln!(
                f,
                "{:>4} {:<6} {:<16} {:<12} {:>14.2} {:>14.2} {:>10}",
                idx + 1,
                request.simulation_year,
                request.regime.as_str(),
                request.activity_code,
                request.revenue,
                result.total,
                format_percent(result.effective_rate)
            )?;
        }
        writeln!(f)?;
        writeln!(f, "Summary of {} entities", self.summary.entities)?;
        write_items(f, &self.summary.items)?;
        write_totals(f, self.summary.total, self.summary.effective_rate)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use tax_core::Regime;

    use super::*;

    fn sample() -> TaxResult {
        TaxResult::from_items(
            vec![
                TaxLineItem::on_revenue("Service Tax", dec!(2000)).with_rate("2%"),
                TaxLineItem::on_revenue("Consumption Tax B", dec!(0)).with_rate("7.6%"),
                TaxLineItem::informational("Consumption Tax B Credit Balance", dec!(120)),
            ],
            dec!(100000),
        )
    }

    #[test]
    fn result_report_lists_items_and_totals() {
        let result = sample();
        let text = ResultReport {
            epoch: Epoch::Legacy,
            result: &result,
        }
        .to_string();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Epoch: legacy");
        assert!(lines[2].starts_with("Service Tax "));
        assert!(lines[2].ends_with("2000.00"));
        assert!(lines[4].contains("balance"));
        assert!(lines[5].starts_with("Total"));
        assert!(lines[5].ends_with("2000.00"));
        assert!(lines[6].ends_with("2%"));
    }

    #[test]
    fn zero_result_is_reported_as_no_tax() {
        let result = TaxResult::zero();
        let text = ResultReport {
            epoch: Epoch::FullReform,
            result: &result,
        }
        .to_string();

        assert_eq!(text, "Epoch: full-reform\nNo tax due.\n");
    }

    #[test]
    fn timeline_has_one_line_per_year() {
        let projections = vec![
            YearProjection {
                year: 2025,
                epoch: Epoch::Legacy,
                result: sample(),
            },
            YearProjection {
                year: 2030,
                epoch: Epoch::Transition {
                    proportion: dec!(0.5),
                },
                result: TaxResult::zero(),
            },
        ];

        let text = TimelineReport(&projections).to_string();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("2025   legacy"));
        assert!(lines[2].contains("transition (50% new)"));
    }

    #[test]
    fn batch_report_numbers_rows_from_one() {
        let request = TaxCalculationRequest::new(2025, Regime::ActualProfit, dec!(100000), "6201-5/01");
        let result = sample();
        let summary = TaxSummary::from_results([(request.revenue, &result)]);
        let rows = vec![(request, result)];

        let text = BatchReport {
            rows: &rows,
            summary: &summary,
        }
        .to_string();

        let first_row = text.lines().nth(1).unwrap();
        assert!(first_row.trim_start().starts_with("1 2025"));
        assert!(first_row.contains("actual-profit"));
        assert!(text.contains("Summary of 1 entities"));
    }
}
