//! Legislative calendar and statutory rates used by the engine.
//!
//! Every value has a default matching current legislation, so an empty
//! configuration file is valid. Rates are fractions (`0.15` = 15%).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors reported by [`EngineConfig::validate`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A rate fell outside `[0, 1]`. Carries the field name and value.
    #[error("rate '{0}' must be between 0 and 1, got {1}")]
    RateOutOfRange(&'static str, Decimal),

    #[error("transition window length must be positive")]
    EmptyTransitionWindow,

    /// A calendar span (in years) exceeds [`MAX_CALENDAR_SPAN_YEARS`].
    #[error("'{0}' must be at most {max} years, got {1}", max = MAX_CALENDAR_SPAN_YEARS)]
    SpanTooLong(&'static str, u32),

    #[error("calendar years starting at {transition_start} run past the supported year range")]
    CalendarOverflow { transition_start: i32 },

    #[error("transition start year {transition_start} must come after test year {test_year}")]
    CalendarOutOfOrder {
        test_year: i32,
        transition_start: i32,
    },

    #[error("surtax threshold must be non-negative, got {0}")]
    NegativeSurtaxThreshold(Decimal),
}

/// Longest transition window or presumed-credit delay accepted by
/// [`EngineConfig::validate`].
pub const MAX_CALENDAR_SPAN_YEARS: u32 = 100;

fn span(years: u32) -> i32 {
    i32::try_from(years).unwrap_or(i32::MAX)
}

/// Years that delimit the legislative epochs.
///
/// The hybrid window runs from the year after `test_year` up to the year
/// before `transition_start_year`. Full reform starts when the transition
/// window ends. Derived years saturate at `i32::MAX`;
/// [`EngineConfig::validate`] rejects calendars where that would happen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegislativeCalendar {
    pub test_year: i32,
    pub transition_start_year: i32,
    pub transition_window_length: u32,
    /// Years after full reform before presumed-margin businesses may take
    /// input credits on the unified taxes.
    pub presumed_credit_delay_years: u32,
}

impl Default for LegislativeCalendar {
    fn default() -> Self {
        Self {
            test_year: 2026,
            transition_start_year: 2029,
            transition_window_length: 4,
            presumed_credit_delay_years: 2,
        }
    }
}

impl LegislativeCalendar {
    pub fn hybrid_start_year(&self) -> i32 {
        self.test_year.saturating_add(1)
    }

    /// Last year of the transition window.
    pub fn transition_end_year(&self) -> i32 {
        self.full_reform_year().saturating_sub(1)
    }

    pub fn full_reform_year(&self) -> i32 {
        self.transition_start_year
            .saturating_add(span(self.transition_window_length))
    }

    /// First year presumed-margin businesses may net input credits.
    pub fn presumed_credit_year(&self) -> i32 {
        self.full_reform_year()
            .saturating_add(span(self.presumed_credit_delay_years))
    }

    fn checked_presumed_credit_year(&self) -> Option<i32> {
        let window = i32::try_from(self.transition_window_length).ok()?;
        let delay = i32::try_from(self.presumed_credit_delay_years).ok()?;
        self.transition_start_year
            .checked_add(window)?
            .checked_add(delay)
    }
}

/// Statutory rates and thresholds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxRates {
    /// City-level service tax for codes in `reduced_service_tax_codes`.
    pub service_tax_reduced: Decimal,
    pub service_tax_standard: Decimal,
    pub reduced_service_tax_codes: Vec<String>,

    /// Legacy federal consumption pair under actual profit (credit-bearing).
    pub consumption_a_actual: Decimal,
    pub consumption_b_actual: Decimal,
    /// Legacy federal consumption pair under presumed margin (cumulative).
    pub consumption_a_presumed: Decimal,
    pub consumption_b_presumed: Decimal,

    pub test_federal: Decimal,
    pub test_subnational: Decimal,
    pub unified_federal: Decimal,
    pub unified_subnational: Decimal,

    pub corporate_income: Decimal,
    /// Multiplier applied to corporate income tax when the incentive is used.
    pub incentive_factor: Decimal,
    /// Monthly base above which the surtax applies.
    pub surtax_threshold: Decimal,
    pub surtax: Decimal,
    pub social_contribution: Decimal,
    /// Social contribution rate for presumed margins other than the
    /// services margin.
    pub social_contribution_presumed_other: Decimal,
    /// Presumed margin percentage that identifies service activities.
    pub services_presumed_margin_percent: Decimal,

    /// Payroll / trailing revenue ratio at which the high-ratio table applies.
    pub ratio_routing_threshold: Decimal,
}

impl Default for TaxRates {
    fn default() -> Self {
        Self {
            service_tax_reduced: Decimal::new(2, 2),
            service_tax_standard: Decimal::new(5, 2),
            reduced_service_tax_codes: vec![
                "6201-5/01".to_string(),
                "6202-3/00".to_string(),
                "6203-1/00".to_string(),
            ],
            consumption_a_actual: Decimal::new(165, 4),
            consumption_b_actual: Decimal::new(76, 3),
            consumption_a_presumed: Decimal::new(65, 4),
            consumption_b_presumed: Decimal::new(3, 2),
            test_federal: Decimal::new(9, 3),
            test_subnational: Decimal::new(1, 3),
            unified_federal: Decimal::new(88, 3),
            unified_subnational: Decimal::new(177, 3),
            corporate_income: Decimal::new(15, 2),
            incentive_factor: Decimal::new(96, 2),
            surtax_threshold: Decimal::from(20_000),
            surtax: Decimal::new(10, 2),
            social_contribution: Decimal::new(9, 2),
            social_contribution_presumed_other: Decimal::new(12, 2),
            services_presumed_margin_percent: Decimal::from(32),
            ratio_routing_threshold: Decimal::new(28, 2),
        }
    }
}

impl TaxRates {
    /// Service tax rate for an activity code (two-tier).
    pub fn service_tax_for(
        &self,
        activity_code: &str,
    ) -> Decimal {
        if self
            .reduced_service_tax_codes
            .iter()
            .any(|code| code == activity_code)
        {
            self.service_tax_reduced
        } else {
            self.service_tax_standard
        }
    }

    fn named_rates(&self) -> [(&'static str, Decimal); 17] {
        [
            ("service_tax_reduced", self.service_tax_reduced),
            ("service_tax_standard", self.service_tax_standard),
            ("consumption_a_actual", self.consumption_a_actual),
            ("consumption_b_actual", self.consumption_b_actual),
            ("consumption_a_presumed", self.consumption_a_presumed),
            ("consumption_b_presumed", self.consumption_b_presumed),
            ("test_federal", self.test_federal),
            ("test_subnational", self.test_subnational),
            ("unified_federal", self.unified_federal),
            ("unified_subnational", self.unified_subnational),
            ("corporate_income", self.corporate_income),
            ("incentive_factor", self.incentive_factor),
            ("surtax", self.surtax),
            ("social_contribution", self.social_contribution),
            (
                "social_contribution_presumed_other",
                self.social_contribution_presumed_other,
            ),
            ("ratio_routing_threshold", self.ratio_routing_threshold),
            (
                "services_presumed_margin",
                self.services_presumed_margin_percent / Decimal::ONE_HUNDRED,
            ),
        ]
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub calendar: LegislativeCalendar,
    pub rates: TaxRates,
}

impl EngineConfig {
    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if any rate is outside `[0, 1]`, the surtax
    /// threshold is negative, a calendar span is empty or too long, the
    /// transition starts before the hybrid window, or the derived years do
    /// not fit in an `i32`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, rate) in self.rates.named_rates() {
            if rate < Decimal::ZERO || rate > Decimal::ONE {
                return Err(ConfigError::RateOutOfRange(name, rate));
            }
        }
        if self.rates.surtax_threshold < Decimal::ZERO {
            return Err(ConfigError::NegativeSurtaxThreshold(
                self.rates.surtax_threshold,
            ));
        }
        let calendar = &self.calendar;
        if calendar.transition_window_length == 0 {
            return Err(ConfigError::EmptyTransitionWindow);
        }
        for (name, years) in [
            ("transition_window_length", calendar.transition_window_length),
            ("presumed_credit_delay_years", calendar.presumed_credit_delay_years),
        ] {
            if years > MAX_CALENDAR_SPAN_YEARS {
                return Err(ConfigError::SpanTooLong(name, years));
            }
        }
        if calendar.transition_start_year <= calendar.test_year {
            return Err(ConfigError::CalendarOutOfOrder {
                test_year: calendar.test_year,
                transition_start: calendar.transition_start_year,
            });
        }
        if calendar.checked_presumed_credit_year().is_none() {
            return Err(ConfigError::CalendarOverflow {
                transition_start: calendar.transition_start_year,
            });
        }
        Ok(())
    }
}
