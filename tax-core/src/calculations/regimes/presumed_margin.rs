use super::RegimeContext;
use super::consumption::revenue_taxes;
use crate::TaxLineItem;
use crate::calculations::{CalculationError, IncomeBase, IncomeTaxCalculator};

/// Revenue taxes for the epoch, then income taxes on the presumed base.
///
/// The presumed base ignores costs and revenue taxes entirely.
pub(super) fn line_items(ctx: &RegimeContext<'_>) -> Result<Vec<TaxLineItem>, CalculationError> {
    let rates = &ctx.config.rates;
    let mut items = revenue_taxes(ctx).items;

    let base = IncomeBase::presumed_margin(
        ctx.request.revenue,
        ctx.request.presumed_margin_percent,
        rates,
    )?;
    items.extend(IncomeTaxCalculator::new(rates).items(&base, ctx.incentive_applies()));

    Ok(items)
}
