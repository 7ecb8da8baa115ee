//! Resolution of an activity classification to its bracket table.
//!
//! Most codes map to a fixed table. Codes flagged for ratio routing pick
//! between the high-ratio and low-ratio tables depending on how much of the
//! trailing revenue went to payroll.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::CalculationError;
use crate::{BracketTable, ReferenceData};

/// Payroll as a share of trailing revenue; zero when there is no revenue.
///
/// A quotient too large to represent saturates at [`Decimal::MAX`] (or
/// [`Decimal::MIN`] for opposite signs).
pub fn payroll_ratio(
    trailing_payroll: Decimal,
    trailing_revenue: Decimal,
) -> Decimal {
    if trailing_revenue.is_zero() {
        return Decimal::ZERO;
    }
    trailing_payroll
        .checked_div(trailing_revenue)
        .unwrap_or_else(|| {
            if trailing_payroll.is_sign_negative() == trailing_revenue.is_sign_negative() {
                Decimal::MAX
            } else {
                Decimal::MIN
            }
        })
}

/// Looks up bracket tables in borrowed reference data.
#[derive(Debug, Clone, Copy)]
pub struct BracketTableLookup<'a> {
    reference: &'a ReferenceData,
    ratio_threshold: Decimal,
}

impl<'a> BracketTableLookup<'a> {
    pub fn new(
        reference: &'a ReferenceData,
        ratio_threshold: Decimal,
    ) -> Self {
        Self {
            reference,
            ratio_threshold,
        }
    }

    /// Returns the table that applies to `activity_code`.
    ///
    /// # Errors
    ///
    /// * [`CalculationError::UnknownClassification`] if the code is absent.
    /// * [`CalculationError::UnknownBracketTable`] if the resolved table id
    ///   has no table.
    pub fn resolve(
        &self,
        activity_code: &str,
        trailing_revenue: Decimal,
        trailing_payroll: Decimal,
    ) -> Result<&'a BracketTable, CalculationError> {
        let classification = self
            .reference
            .classification(activity_code)
            .ok_or_else(|| CalculationError::UnknownClassification(activity_code.to_string()))?;

        let table_id = if classification.requires_ratio_routing {
            let ratio = payroll_ratio(trailing_payroll, trailing_revenue);
            let routing = &self.reference.ratio_routing;
            let id = if ratio >= self.ratio_threshold {
                &routing.high_ratio_table_id
            } else {
                &routing.low_ratio_table_id
            };
            debug!(code = activity_code, %ratio, table = %id, "ratio-routed bracket table");
            id
        } else {
            &classification.bracket_table_id
        };

        self.reference.bracket_table(table_id).ok_or_else(|| {
            warn!(
                code = activity_code,
                table = %table_id,
                "classification references a missing bracket table"
            );
            CalculationError::UnknownBracketTable(table_id.clone())
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::{ActivityClassification, RatioRouting};

    fn reference() -> ReferenceData {
        ReferenceData::new(
            [
                ActivityClassification::new("6201-5/01", "V", true),
                ActivityClassification::new("4711-3/02", "I", false),
                ActivityClassification::new("1091-1/02", "II", false),
            ],
            [
                BracketTable::new("I", vec![]),
                BracketTable::new("III", vec![]),
                BracketTable::new("V", vec![]),
            ],
            RatioRouting {
                high_ratio_table_id: "III".to_string(),
                low_ratio_table_id: "V".to_string(),
            },
        )
    }

    #[test]
    fn payroll_ratio_is_zero_without_revenue() {
        assert_eq!(payroll_ratio(dec!(5000), dec!(0)), dec!(0));
        assert_eq!(payroll_ratio(dec!(28000), dec!(100000)), dec!(0.28));
    }

    fn huge() -> Decimal {
        Decimal::from_i128_with_scale(10_i128.pow(20), 0)
    }

    fn tiny() -> Decimal {
        Decimal::new(1, 20)
    }

    #[test]
    fn payroll_ratio_saturates_on_tiny_revenue() {
        assert_eq!(payroll_ratio(huge(), tiny()), Decimal::MAX);
        assert_eq!(payroll_ratio(-huge(), tiny()), Decimal::MIN);
    }

    #[test]
    fn routed_code_with_saturated_ratio_uses_high_ratio_table() {
        let data = reference();
        let lookup = BracketTableLookup::new(&data, dec!(0.28));

        let table = lookup.resolve("6201-5/01", tiny(), huge()).unwrap();

        assert_eq!(table.id, "III");
    }

    #[test]
    fn static_code_returns_associated_table() {
        let data = reference();
        let lookup = BracketTableLookup::new(&data, dec!(0.28));

        let table = lookup.resolve("4711-3/02", dec!(100000), dec!(90000)).unwrap();

        assert_eq!(table.id, "I");
    }

    #[test]
    fn routed_code_at_threshold_uses_high_ratio_table() {
        let data = reference();
        let lookup = BracketTableLookup::new(&data, dec!(0.28));

        let table = lookup.resolve("6201-5/01", dec!(100000), dec!(28000)).unwrap();

        assert_eq!(table.id, "III");
    }

    #[test]
    fn routed_code_below_threshold_uses_low_ratio_table() {
        let data = reference();
        let lookup = BracketTableLookup::new(&data, dec!(0.28));

        let table = lookup.resolve("6201-5/01", dec!(100000), dec!(27999.99)).unwrap();

        assert_eq!(table.id, "V");
    }

    #[test]
    fn routed_code_without_trailing_revenue_uses_low_ratio_table() {
        let data = reference();
        let lookup = BracketTableLookup::new(&data, dec!(0.28));

        let table = lookup.resolve("6201-5/01", dec!(0), dec!(10000)).unwrap();

        assert_eq!(table.id, "V");
    }

    #[test]
    fn unknown_code_is_lookup_miss() {
        let data = reference();
        let lookup = BracketTableLookup::new(&data, dec!(0.28));

        let result = lookup.resolve("9999-9/99", dec!(0), dec!(0));

        assert_eq!(
            result,
            Err(CalculationError::UnknownClassification("9999-9/99".to_string()))
        );
    }

    #[test]
    fn missing_table_is_lookup_miss() {
        let data = reference();
        let lookup = BracketTableLookup::new(&data, dec!(0.28));

        let result = lookup.resolve("1091-1/02", dec!(0), dec!(0));

        assert_eq!(
            result,
            Err(CalculationError::UnknownBracketTable("II".to_string()))
        );
    }
}
