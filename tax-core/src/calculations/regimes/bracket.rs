use tracing::debug;

use super::RegimeContext;
use crate::TaxLineItem;
use crate::calculations::common::format_percent;
use crate::calculations::{BracketTableLookup, CalculationError, EffectiveRateCalculator};

pub const BRACKET_REGIME_TAX: &str = "Bracket Regime Tax";
/// Label used once the reform is in full effect; bracket-regime rules for
/// the reformed system are not yet defined, so the legacy value is kept.
pub const BRACKET_REGIME_PENDING: &str = "Bracket Regime Tax (pending definition)";

pub(super) fn line_items(ctx: &RegimeContext<'_>) -> Result<Vec<TaxLineItem>, CalculationError> {
    let request = ctx.request;
    let table = BracketTableLookup::new(ctx.reference, ctx.config.rates.ratio_routing_threshold)
        .resolve(
            &request.activity_code,
            request.trailing_revenue,
            request.trailing_payroll,
        )?;

    let result = EffectiveRateCalculator::new(table)
        .calculate(request.trailing_revenue, request.revenue)?;
    debug!(
        table = %table.id,
        bracket = result.order_index,
        effective_rate = %result.effective_rate,
        "bracket selected"
    );

    let name = if request.simulation_year >= ctx.config.calendar.full_reform_year() {
        BRACKET_REGIME_PENDING
    } else {
        BRACKET_REGIME_TAX
    };

    Ok(vec![
        TaxLineItem::on_revenue(name, result.monthly_payable)
            .with_rate(format_percent(result.effective_rate)),
    ])
}
