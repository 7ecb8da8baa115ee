use rust_decimal::Decimal;
use thiserror::Error;

/// Reasons a computation degrades to a zero result.
///
/// [`TaxEngine::calculate`](crate::calculations::TaxEngine::calculate)
/// never surfaces these; they are available through
/// [`TaxEngine::try_calculate`](crate::calculations::TaxEngine::try_calculate)
/// for callers that want to explain an empty result.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CalculationError {
    #[error("revenue must be positive, got {0}")]
    NonPositiveRevenue(Decimal),

    #[error("no activity classification code provided")]
    MissingClassification,

    #[error("unknown activity classification '{0}'")]
    UnknownClassification(String),

    #[error("bracket table '{0}' not found in reference data")]
    UnknownBracketTable(String),

    #[error("no bracket of table '{table}' covers trailing revenue {trailing_revenue}")]
    NoMatchingBracket {
        table: String,
        trailing_revenue: Decimal,
    },

    /// An amount left the representable decimal range. Carries the name of
    /// the quantity being computed.
    #[error("{0} is out of range")]
    Overflow(&'static str),
}

impl CalculationError {
    /// Whether the error stems from the request itself rather than from a
    /// reference-data miss.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::NonPositiveRevenue(_) | Self::MissingClassification | Self::Overflow(_)
        )
    }
}
