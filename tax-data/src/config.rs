//! TOML loader for [`EngineConfig`].
//!
//! Every key is optional; anything left out keeps its default. Rates may be
//! written as strings (`"0.15"`) or as TOML floats.
//!
//! ```toml
//! [calendar]
//! test_year = 2026
//! transition_start_year = 2029
//! transition_window_length = 4
//!
//! [rates]
//! corporate_income = "0.15"
//! reduced_service_tax_codes = ["6201-5/01"]
//! ```

use std::path::Path;

use tax_core::{ConfigError, EngineConfig};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while loading an engine configuration.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(#[from] ConfigError),
}

/// Parse and validate a configuration from TOML text.
pub fn load_from_str(input: &str) -> Result<EngineConfig, ConfigLoadError> {
    let config: EngineConfig = toml::from_str(input)?;
    config.validate()?;
    debug!(
        test_year = config.calendar.test_year,
        transition_start = config.calendar.transition_start_year,
        full_reform = config.calendar.full_reform_year(),
        "engine configuration loaded"
    );
    Ok(config)
}

/// Read a TOML file from disk and delegate to [`load_from_str`].
pub fn load_from_file(path: &Path) -> Result<EngineConfig, ConfigLoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_from_str(&contents)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_empty_input_is_default() {
        let config = load_from_str("").expect("empty config is valid");
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_partial_override_keeps_other_defaults() {
        let config = load_from_str(
            r#"
            [calendar]
            transition_start_year = 2030

            [rates]
            surtax = "0.12"
            "#,
        )
        .expect("valid config");

        assert_eq!(config.calendar.transition_start_year, 2030);
        assert_eq!(config.calendar.test_year, 2026);
        assert_eq!(config.rates.surtax, dec!(0.12));
        assert_eq!(config.rates.corporate_income, dec!(0.15));
    }

    #[test]
    fn test_float_rates_are_accepted() {
        let config = load_from_str("[rates]\nunified_federal = 0.09\n").expect("valid config");
        assert_eq!(config.rates.unified_federal, dec!(0.09));
    }

    #[test]
    fn test_out_of_range_rate_is_rejected() {
        let err = load_from_str("[rates]\nsocial_contribution = \"1.5\"\n").unwrap_err();

        match err {
            ConfigLoadError::Invalid(ConfigError::RateOutOfRange(name, value)) => {
                assert_eq!(name, "social_contribution");
                assert_eq!(value, dec!(1.5));
            }
            other => panic!("expected RateOutOfRange, got {other:?}"),
        }
    }

    #[test]
    fn test_calendar_out_of_order_is_rejected() {
        let err = load_from_str("[calendar]\ntest_year = 2030\ntransition_start_year = 2029\n")
            .unwrap_err();

        assert!(
            matches!(
                err,
                ConfigLoadError::Invalid(ConfigError::CalendarOutOfOrder { .. })
            ),
            "{err:?}"
        );
    }

    #[test]
    fn test_oversized_transition_window_is_rejected() {
        let err = load_from_str("[calendar]\ntransition_window_length = 3000000000\n").unwrap_err();

        assert!(
            matches!(
                err,
                ConfigLoadError::Invalid(ConfigError::SpanTooLong("transition_window_length", _))
            ),
            "{err:?}"
        );
    }

    #[test]
    fn test_transition_start_at_year_limit_is_rejected() {
        let err = load_from_str("[calendar]\ntransition_start_year = 2147483647\n").unwrap_err();

        assert!(
            matches!(
                err,
                ConfigLoadError::Invalid(ConfigError::CalendarOverflow { .. })
            ),
            "{err:?}"
        );
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let err = load_from_str("[rates\nsurtax = 0.1").unwrap_err();
        assert!(matches!(err, ConfigLoadError::Parse(_)), "{err:?}");
    }
}
