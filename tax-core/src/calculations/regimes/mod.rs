//! Per-regime line-item strategies.
//!
//! The set of regimes is closed, so strategies are plain functions selected
//! by matching on [`Regime`] rather than trait objects.

mod actual_profit;
mod bracket;
mod consumption;
mod presumed_margin;

pub use bracket::{BRACKET_REGIME_PENDING, BRACKET_REGIME_TAX};
pub use consumption::{
    CONSUMPTION_TAX_A, CONSUMPTION_TAX_B, SERVICE_TAX, TEST_FEDERAL_TAX, TEST_SUBNATIONAL_TAX,
    UNIFIED_FEDERAL_TAX, UNIFIED_SUBNATIONAL_TAX,
};

use super::{CalculationError, Epoch};
use crate::{EngineConfig, ReferenceData, Regime, TaxCalculationRequest, TaxLineItem};

/// Everything a strategy needs for one computation.
#[derive(Debug, Clone, Copy)]
pub struct RegimeContext<'a> {
    pub request: &'a TaxCalculationRequest,
    pub epoch: Epoch,
    pub config: &'a EngineConfig,
    pub reference: &'a ReferenceData,
}

impl RegimeContext<'_> {
    /// Whether input credits may be netted against the unified taxes.
    ///
    /// Actual-profit businesses always may; presumed-margin businesses only
    /// from the presumed-credit year onward.
    pub fn unified_credits_allowed(&self) -> bool {
        match self.request.regime {
            Regime::ActualProfit => true,
            Regime::PresumedMargin => {
                self.request.simulation_year >= self.config.calendar.presumed_credit_year()
            }
            Regime::Bracket => false,
        }
    }

    /// Whether the corporate income tax incentive applies.
    pub fn incentive_applies(&self) -> bool {
        self.request.incentive_opt_in
            && self.request.regime == Regime::ActualProfit
            && self.epoch.is_pre_reform()
    }
}

/// Builds the line items for the request's regime in the context's epoch.
///
/// # Errors
///
/// The bracket regime fails on a bracket table lookup miss. Bracket and
/// presumed-margin computations fail on amounts out of decimal range.
pub fn line_items(ctx: &RegimeContext<'_>) -> Result<Vec<TaxLineItem>, CalculationError> {
    match ctx.request.regime {
        Regime::Bracket => bracket::line_items(ctx),
        Regime::PresumedMargin => presumed_margin::line_items(ctx),
        Regime::ActualProfit => Ok(actual_profit::line_items(ctx)),
    }
}
