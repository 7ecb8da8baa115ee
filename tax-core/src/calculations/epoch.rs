//! Year to legislative epoch mapping.
//!
//! | Epoch       | Years (default calendar) |
//! |-------------|--------------------------|
//! | Legacy      | ..=2025                  |
//! | TestYear    | 2026                     |
//! | Hybrid      | 2027..=2028              |
//! | Transition  | 2029..=2032, `p` = 1/4 .. 1 |
//! | FullReform  | 2033..                   |

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::common::clamp_unit;
use crate::LegislativeCalendar;

/// A period of the legislative timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Epoch {
    Legacy,
    TestYear,
    Hybrid,
    /// Old and new subnational taxes blended by `proportion` (the new
    /// tax's share).
    Transition { proportion: Decimal },
    FullReform,
}

impl Epoch {
    /// Total function from year to epoch.
    pub fn for_year(
        year: i32,
        calendar: &LegislativeCalendar,
    ) -> Self {
        if year < calendar.test_year {
            Self::Legacy
        } else if year == calendar.test_year {
            Self::TestYear
        } else if year < calendar.transition_start_year {
            Self::Hybrid
        } else if year < calendar.full_reform_year() {
            Self::Transition {
                proportion: blending_proportion(year, calendar),
            }
        } else {
            Self::FullReform
        }
    }

    /// Legacy rules apply (before any unified tax replaces an old one).
    pub fn is_pre_reform(&self) -> bool {
        matches!(self, Self::Legacy | Self::TestYear)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Legacy => "legacy",
            Self::TestYear => "test-year",
            Self::Hybrid => "hybrid",
            Self::Transition { .. } => "transition",
            Self::FullReform => "full-reform",
        }
    }
}

impl fmt::Display for Epoch {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::Transition { proportion } => {
                write!(f, "transition ({}% new)", (*proportion * Decimal::ONE_HUNDRED).normalize())
            }
            other => f.write_str(other.name()),
        }
    }
}

/// Linear share of the new subnational tax:
/// `(year − start + 1) / window`, clamped to `[0, 1]`.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::LegislativeCalendar;
/// use tax_core::calculations::blending_proportion;
///
/// let calendar = LegislativeCalendar::default();
///
/// assert_eq!(blending_proportion(2029, &calendar), dec!(0.25));
/// assert_eq!(blending_proportion(2032, &calendar), dec!(1));
/// ```
pub fn blending_proportion(
    year: i32,
    calendar: &LegislativeCalendar,
) -> Decimal {
    if calendar.transition_window_length == 0 {
        return Decimal::ONE;
    }
    let elapsed = Decimal::from(i64::from(year) - i64::from(calendar.transition_start_year) + 1);
    clamp_unit(elapsed / Decimal::from(calendar.transition_window_length))
}
