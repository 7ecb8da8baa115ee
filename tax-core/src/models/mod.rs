mod activity_classification;
mod engine_config;
mod reference_data;
mod tax_bracket;
mod tax_request;
mod tax_result;

pub use activity_classification::ActivityClassification;
pub use engine_config::{
    ConfigError, EngineConfig, LegislativeCalendar, MAX_CALENDAR_SPAN_YEARS, TaxRates,
};
pub use reference_data::{RatioRouting, ReferenceData};
pub use tax_bracket::{Bracket, BracketTable, BracketTableError};
pub use tax_request::{Regime, TaxCalculationRequest};
pub use tax_result::{LineCategory, TaxLineItem, TaxResult, TaxSummary};
