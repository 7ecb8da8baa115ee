//! CSV loader for batches of calculation requests.
//!
//! ## CSV Format
//!
//! Columns are matched by header name, so their order does not matter.
//! Optional columns may be left out entirely or left empty per row.
//!
//! | Column                    | Required | Type    | Notes                                        |
//! |---------------------------|----------|---------|----------------------------------------------|
//! | `simulation_year`         | yes      | integer | e.g. `2029`                                  |
//! | `regime`                  | yes      | string  | `bracket`, `presumed-margin`, `actual-profit`|
//! | `revenue`                 | yes      | decimal | monthly revenue                              |
//! | `activity_code`           | yes      | string  | e.g. `6201-5/01`                             |
//! | `cost`                    | no       | decimal | sign is ignored                              |
//! | `presumed_margin_percent` | no       | decimal | `32` means 32%                               |
//! | `trailing_revenue`        | no       | decimal | trailing 12 months                           |
//! | `trailing_payroll`        | no       | decimal | trailing 12 months                           |
//! | `incentive_opt_in`        | no       | bool    | `true` / `false`                             |
//! | `credit_generating_costs` | no       | decimal | sign is ignored                              |
//!
//! ### Example
//!
//! ```csv
//! simulation_year,regime,revenue,activity_code,cost,credit_generating_costs
//! 2025,actual-profit,100000.00,6201-5/01,50000.00,30000.00
//! 2030,presumed-margin,80000.00,7020-4/00,,
//! ```

use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use tax_core::{Regime, TaxCalculationRequest};

#[derive(Debug, Deserialize)]
struct CsvRow {
    simulation_year: i32,
    regime: String,
    revenue: Decimal,
    activity_code: String,
    #[serde(default)]
    cost: Option<Decimal>,
    #[serde(default)]
    presumed_margin_percent: Option<Decimal>,
    #[serde(default)]
    trailing_revenue: Option<Decimal>,
    #[serde(default)]
    trailing_payroll: Option<Decimal>,
    #[serde(default)]
    incentive_opt_in: Option<bool>,
    #[serde(default)]
    credit_generating_costs: Option<Decimal>,
}

/// Errors that can occur while loading a request batch.
///
/// Row numbers are 1-based and count data rows only (the header is row 0).
#[derive(Debug, thiserror::Error)]
pub enum BatchLoadError {
    /// The header is unreadable or a row could not be deserialised (missing
    /// required column, unparseable number, wrong column count).
    #[error("CSV parse error on row {row}: {source}")]
    Parse {
        row: usize,
        #[source]
        source: csv::Error,
    },

    #[error("unrecognised regime '{regime}' on row {row}")]
    InvalidRegime { regime: String, row: usize },

    #[error("failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

fn convert_row(
    row: CsvRow,
    row_number: usize,
) -> Result<TaxCalculationRequest, BatchLoadError> {
    let regime = Regime::parse(&row.regime).ok_or_else(|| BatchLoadError::InvalidRegime {
        regime: row.regime.clone(),
        row: row_number,
    })?;

    Ok(
        TaxCalculationRequest::new(row.simulation_year, regime, row.revenue, row.activity_code)
            .with_cost(row.cost.unwrap_or_default())
            .with_presumed_margin_percent(row.presumed_margin_percent.unwrap_or_default())
            .with_trailing(
                row.trailing_revenue.unwrap_or_default(),
                row.trailing_payroll.unwrap_or_default(),
            )
            .with_incentive(row.incentive_opt_in.unwrap_or(false))
            .with_credit_generating_costs(row.credit_generating_costs.unwrap_or_default()),
    )
}

/// Parse a request batch from CSV text. Rows are returned in file order.
///
/// # Errors
///
/// * [`BatchLoadError::Parse`] if the CSV is structurally invalid or a
///   field cannot be deserialised.
/// * [`BatchLoadError::InvalidRegime`] if a row names an unknown regime.
pub fn load_from_str(input: &str) -> Result<Vec<TaxCalculationRequest>, BatchLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| {
            let row_number = idx + 1;
            let row = result.map_err(|source| BatchLoadError::Parse {
                row: row_number,
                source,
            })?;
            convert_row(row, row_number)
        })
        .collect()
}

/// Read a file from disk and delegate to [`load_from_str`].
pub fn load_from_file(path: &Path) -> Result<Vec<TaxCalculationRequest>, BatchLoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| BatchLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_from_str(&contents)
}
