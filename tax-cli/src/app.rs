use std::path::Path;

use anyhow::{Context, Result, bail};
use tax_core::{EngineConfig, ReferenceData, TaxEngine, TaxResult, TaxSummary};
use tax_data::{ReferenceDataBuilder, batch, config};
use tracing::{info, warn};

use crate::cli::{Cli, Command};
use crate::report::{BatchReport, ResultReport, TimelineReport};

/// Loads the engine configuration, falling back to the built-in defaults.
pub fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => config::load_from_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display())),
        None => Ok(EngineConfig::default()),
    }
}

/// Loads reference data, using the bundled files for anything not given.
pub fn load_reference_data(
    brackets: Option<&Path>,
    classifications: Option<&Path>,
) -> Result<ReferenceData> {
    let builder = match brackets {
        Some(path) => ReferenceDataBuilder::new()
            .bracket_tables_file(path)
            .with_context(|| format!("Failed to load bracket tables: {}", path.display()))?,
        None => ReferenceDataBuilder::new().bundled_bracket_tables()?,
    };
    let builder = match classifications {
        Some(path) => builder
            .classifications_file(path)
            .with_context(|| format!("Failed to load classifications: {}", path.display()))?,
        None => builder.bundled_classifications()?,
    };
    builder.build().context("Invalid reference data")
}

/// Runs the selected command and returns the report text.
pub fn run(cli: &Cli) -> Result<String> {
    let config = load_config(cli.config.as_deref())?;
    let reference = load_reference_data(cli.brackets.as_deref(), cli.classifications.as_deref())?;
    let engine = TaxEngine::new(&reference, &config);

    match &cli.command {
        Command::Calculate { year, request } => {
            let request = request.to_request(*year);
            let result = engine.try_calculate(&request).unwrap_or_else(|error| {
                warn!(%error, "no tax computed");
                TaxResult::zero()
            });
            Ok(ResultReport {
                epoch: engine.epoch_for(*year),
                result: &result,
            }
            .to_string())
        }
        Command::Timeline { from, to, request } => {
            if from > to {
                bail!("--from {from} is after --to {to}");
            }
            let projections = engine.project(&request.to_request(*from), *from..=*to);
            Ok(TimelineReport(&projections).to_string())
        }
        Command::Batch { file } => {
            let requests = batch::load_from_file(file)
                .with_context(|| format!("Failed to load batch: {}", file.display()))?;
            info!(rows = requests.len(), "batch loaded");

            let rows: Vec<_> = requests
                .into_iter()
                .map(|request| {
                    let result = engine.calculate(&request);
                    (request, result)
                })
                .collect();
            let summary = TaxSummary::from_results(
                rows.iter()
                    .map(|(request, result)| (request.revenue, result)),
            );
            Ok(BatchReport {
                rows: &rows,
                summary: &summary,
            }
            .to_string())
        }
    }
}
