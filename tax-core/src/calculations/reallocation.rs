//! Test-year reallocation.
//!
//! In the test year the two unified taxes are charged at token rates. They
//! are not an additional burden: the amount is taken out of an existing
//! legacy consumption tax before the test items are appended.

use rust_decimal::Decimal;

use super::common::{format_percent, round_half_up};
use super::regimes::{CONSUMPTION_TAX_B, TEST_FEDERAL_TAX, TEST_SUBNATIONAL_TAX};
use crate::{LineCategory, TaxLineItem, TaxRates};

/// Reduces the legacy line by `min(line, test taxes)` and appends the two
/// test taxes. Returns the amount moved off the legacy line.
pub fn reallocate_test_taxes(
    items: &mut Vec<TaxLineItem>,
    revenue: Decimal,
    rates: &TaxRates,
) -> Decimal {
    let federal = round_half_up(revenue * rates.test_federal);
    let subnational = round_half_up(revenue * rates.test_subnational);
    let test_total = federal + subnational;

    let reduction = match items
        .iter_mut()
        .find(|item| item.name == CONSUMPTION_TAX_B && item.category == LineCategory::OnRevenue)
    {
        Some(target) => {
            let reduction = target.value.min(test_total);
            target.value -= reduction;
            reduction
        }
        None => Decimal::ZERO,
    };

    items.push(
        TaxLineItem::on_revenue(TEST_FEDERAL_TAX, federal)
            .with_rate(format_percent(rates.test_federal)),
    );
    items.push(
        TaxLineItem::on_revenue(TEST_SUBNATIONAL_TAX, subnational)
            .with_rate(format_percent(rates.test_subnational)),
    );

    reduction
}
