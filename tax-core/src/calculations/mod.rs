//! Tax calculation modules.
//!
//! Leaf calculators (bracket lookup, effective rate, credit netting, income
//! base) are composed by the regime strategies, which the [`TaxEngine`]
//! selects per request after routing the simulation year to an [`Epoch`].

pub mod bracket_lookup;
pub mod common;
pub mod credit_netting;
pub mod effective_rate;
pub mod engine;
pub mod epoch;
pub mod error;
pub mod income_base;
pub mod reallocation;
pub mod regimes;

pub use bracket_lookup::{BracketTableLookup, payroll_ratio};
pub use credit_netting::{CreditNetting, NettedTax};
pub use effective_rate::{EffectiveRateCalculator, EffectiveRateResult};
pub use engine::{TaxEngine, YearProjection};
pub use epoch::{Epoch, blending_proportion};
pub use error::CalculationError;
pub use income_base::{IncomeBase, IncomeTaxCalculator};
pub use reallocation::reallocate_test_taxes;
