//! Entry point of the engine: request validation, epoch routing and
//! result assembly.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::calculations::TaxEngine;
//! use tax_core::{
//!     ActivityClassification, BracketTable, EngineConfig, RatioRouting, ReferenceData, Regime,
//!     TaxCalculationRequest,
//! };
//!
//! let reference = ReferenceData::new(
//!     [ActivityClassification::new("6201-5/01", "V", true)],
//!     Vec::<BracketTable>::new(),
//!     RatioRouting {
//!         high_ratio_table_id: "III".to_string(),
//!         low_ratio_table_id: "V".to_string(),
//!     },
//! );
//! let config = EngineConfig::default();
//! let engine = TaxEngine::new(&reference, &config);
//!
//! let request = TaxCalculationRequest::new(2025, Regime::ActualProfit, dec!(100000), "6201-5/01")
//!     .with_cost(dec!(50000))
//!     .with_credit_generating_costs(dec!(30000));
//! let result = engine.calculate(&request);
//!
//! assert_eq!(result.total, dec!(19650.00));
//! assert_eq!(result.effective_rate, dec!(0.1965));
//! ```

use std::ops::RangeInclusive;

use rust_decimal::Decimal;
use tracing::debug;

use super::CalculationError;
use super::epoch::Epoch;
use super::reallocation::reallocate_test_taxes;
use super::regimes::{self, RegimeContext};
use crate::{EngineConfig, ReferenceData, Regime, TaxCalculationRequest, TaxResult};

/// One year of a [`TaxEngine::project`] run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearProjection {
    pub year: i32,
    pub epoch: Epoch,
    pub result: TaxResult,
}

/// Stateless tax engine over borrowed reference data and configuration.
///
/// Cheap to construct and safe to share between threads; every call is
/// independent.
#[derive(Debug, Clone, Copy)]
pub struct TaxEngine<'a> {
    reference: &'a ReferenceData,
    config: &'a EngineConfig,
}

impl<'a> TaxEngine<'a> {
    pub fn new(
        reference: &'a ReferenceData,
        config: &'a EngineConfig,
    ) -> Self {
        Self { reference, config }
    }

    pub fn config(&self) -> &'a EngineConfig {
        self.config
    }

    pub fn epoch_for(
        &self,
        year: i32,
    ) -> Epoch {
        Epoch::for_year(year, &self.config.calendar)
    }

    /// Computes the itemized result, degrading every error to
    /// [`TaxResult::zero`].
    pub fn calculate(
        &self,
        request: &TaxCalculationRequest,
    ) -> TaxResult {
        self.try_calculate(request).unwrap_or_else(|error| {
            debug!(
                code = %request.activity_code,
                year = request.simulation_year,
                invalid_input = error.is_invalid_input(),
                %error,
                "degraded to zero result"
            );
            TaxResult::zero()
        })
    }

    /// Computes the itemized result.
    ///
    /// # Errors
    ///
    /// * [`CalculationError::NonPositiveRevenue`] for revenue ≤ 0.
    /// * [`CalculationError::MissingClassification`] for a blank code.
    /// * [`CalculationError::UnknownClassification`] for a code absent from
    ///   the reference data.
    /// * Bracket lookup misses for the bracket regime.
    /// * [`CalculationError::Overflow`] when an amount leaves the decimal
    ///   range.
    pub fn try_calculate(
        &self,
        request: &TaxCalculationRequest,
    ) -> Result<TaxResult, CalculationError> {
        if request.revenue <= Decimal::ZERO {
            return Err(CalculationError::NonPositiveRevenue(request.revenue));
        }
        if request.activity_code.trim().is_empty() {
            return Err(CalculationError::MissingClassification);
        }
        if self
            .reference
            .classification(&request.activity_code)
            .is_none()
        {
            return Err(CalculationError::UnknownClassification(
                request.activity_code.clone(),
            ));
        }

        let epoch = self.epoch_for(request.simulation_year);
        debug!(
            year = request.simulation_year,
            regime = request.regime.as_str(),
            %epoch,
            "routing request"
        );

        let ctx = RegimeContext {
            request,
            epoch,
            config: self.config,
            reference: self.reference,
        };
        let mut items = regimes::line_items(&ctx)?;

        if epoch == Epoch::TestYear && request.regime != Regime::Bracket {
            let moved = reallocate_test_taxes(&mut items, request.revenue, &self.config.rates);
            debug!(%moved, "test-year taxes reallocated");
        }

        items
            .iter()
            .filter(|item| item.is_payable())
            .try_fold(Decimal::ZERO, |total, item| total.checked_add(item.value))
            .ok_or(CalculationError::Overflow("total"))?;

        Ok(TaxResult::from_items(items, request.revenue))
    }

    /// Runs the same request for every year in `years`.
    pub fn project(
        &self,
        request: &TaxCalculationRequest,
        years: RangeInclusive<i32>,
    ) -> Vec<YearProjection> {
        years
            .map(|year| YearProjection {
                year,
                epoch: self.epoch_for(year),
                result: self.calculate(&request.for_year(year)),
            })
            .collect()
    }
}
