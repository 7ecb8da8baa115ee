//! Effective rate of the bracket regime.
//!
//! The nominal bracket rate is applied to the trailing-12-month revenue,
//! the bracket's fixed deduction is subtracted, and the result is expressed
//! as a share of that trailing revenue:
//!
//! ```text
//! effective = (trailing × nominal − deduction) / trailing
//! monthly   = monthly_revenue × effective
//! ```
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::{Bracket, BracketTable};
//! use tax_core::calculations::EffectiveRateCalculator;
//!
//! let table = BracketTable::new(
//!     "III",
//!     vec![
//!         Bracket {
//!             order_index: 1,
//!             min_revenue: dec!(0),
//!             max_revenue: dec!(180000),
//!             nominal_rate: dec!(0.06),
//!             deduction: dec!(0),
//!         },
//!         Bracket {
//!             order_index: 2,
//!             min_revenue: dec!(180000),
//!             max_revenue: dec!(360000),
//!             nominal_rate: dec!(0.112),
//!             deduction: dec!(9360),
//!         },
//!     ],
//! );
//!
//! let calculator = EffectiveRateCalculator::new(&table);
//! let result = calculator.calculate(dec!(240000), dec!(20000)).unwrap();
//!
//! assert_eq!(result.order_index, 2);
//! assert_eq!(result.effective_rate, dec!(0.073));
//! assert_eq!(result.monthly_payable, dec!(1460.00));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::CalculationError;
use super::common::{non_negative, round_half_up};
use crate::{Bracket, BracketTable};

/// Outcome of the effective-rate computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveRateResult {
    /// Order index of the selected bracket.
    pub order_index: u32,
    pub nominal_rate: Decimal,
    pub deduction: Decimal,
    pub effective_rate: Decimal,
    pub monthly_payable: Decimal,
}

/// Calculator bound to a single bracket table.
#[derive(Debug, Clone, Copy)]
pub struct EffectiveRateCalculator<'a> {
    table: &'a BracketTable,
}

impl<'a> EffectiveRateCalculator<'a> {
    pub fn new(table: &'a BracketTable) -> Self {
        Self { table }
    }

    /// Finds the bracket containing `trailing_revenue`.
    ///
    /// Brackets are scanned in order, so a value on a shared boundary
    /// belongs to the lower-index bracket.
    pub fn select_bracket(
        &self,
        trailing_revenue: Decimal,
    ) -> Option<&'a Bracket> {
        self.table
            .brackets()
            .iter()
            .find(|b| b.contains(trailing_revenue))
    }

    /// Computes the effective rate and the monthly amount payable.
    ///
    /// # Errors
    ///
    /// * [`CalculationError::NoMatchingBracket`] if no bracket covers the
    ///   trailing revenue (including an empty table).
    /// * [`CalculationError::Overflow`] if an intermediate amount cannot be
    ///   represented.
    pub fn calculate(
        &self,
        trailing_revenue: Decimal,
        monthly_revenue: Decimal,
    ) -> Result<EffectiveRateResult, CalculationError> {
        let no_match = || CalculationError::NoMatchingBracket {
            table: self.table.id.clone(),
            trailing_revenue,
        };

        let (bracket, effective_rate) = if trailing_revenue.is_zero() {
            let first = self.table.first().ok_or_else(no_match)?;
            (first, first.nominal_rate)
        } else {
            let bracket = self.select_bracket(trailing_revenue).ok_or_else(no_match)?;
            let rate = trailing_revenue
                .checked_mul(bracket.nominal_rate)
                .and_then(|gross| gross.checked_sub(bracket.deduction))
                .and_then(|net| net.checked_div(trailing_revenue))
                .ok_or(CalculationError::Overflow("effective rate"))?;
            (bracket, non_negative(rate))
        };

        let monthly_payable = monthly_revenue
            .checked_mul(effective_rate)
            .ok_or(CalculationError::Overflow("monthly payable"))?;

        Ok(EffectiveRateResult {
            order_index: bracket.order_index,
            nominal_rate: bracket.nominal_rate,
            deduction: bracket.deduction,
            effective_rate,
            monthly_payable: round_half_up(monthly_payable),
        })
    }
}
