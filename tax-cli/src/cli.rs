use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use tax_core::{Regime, TaxCalculationRequest};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Multi-year business tax simulator.
///
/// Computes the taxes owed by a business under its regime for any year of
/// the reform calendar, from the legacy rules through full reform.
#[derive(Debug, Parser)]
#[command(name = "tax-sim", version, about, long_about = None)]
pub struct Cli {
    /// TOML file overriding the legislative calendar and rates.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Bracket tables CSV. The bundled tables are used when omitted.
    #[arg(long, global = true)]
    pub brackets: Option<PathBuf>,

    /// Activity classifications CSV. The bundled set is used when omitted.
    #[arg(long, global = true)]
    pub classifications: Option<PathBuf>,

    /// Log filter: a bare level (`debug`) or any `RUST_LOG` directive.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Also append log records to this file.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Itemized taxes for one year.
    #[command(allow_negative_numbers = true)]
    Calculate {
        /// Simulation year.
        #[arg(long)]
        year: i32,

        #[command(flatten)]
        request: RequestArgs,
    },

    /// Totals for the same business across a range of years.
    #[command(allow_negative_numbers = true)]
    Timeline {
        /// First year, inclusive.
        #[arg(long)]
        from: i32,

        /// Last year, inclusive.
        #[arg(long)]
        to: i32,

        #[command(flatten)]
        request: RequestArgs,
    },

    /// Computes every row of a request CSV and prints the combined summary.
    Batch {
        /// Request CSV, one row per entity.
        file: PathBuf,
    },
}

/// Business inputs shared by `calculate` and `timeline`.
#[derive(Debug, Clone, Args)]
pub struct RequestArgs {
    /// `bracket`, `presumed-margin` or `actual-profit`.
    #[arg(long, value_parser = parse_regime)]
    pub regime: Regime,

    /// Monthly gross revenue.
    #[arg(long)]
    pub revenue: Decimal,

    /// Activity classification code, e.g. `6201-5/01`.
    #[arg(long = "code")]
    pub activity_code: String,

    /// Monthly operating cost (actual profit).
    #[arg(long, default_value = "0")]
    pub cost: Decimal,

    /// Presumed margin in percent, e.g. `32`.
    #[arg(long = "margin", default_value = "0")]
    pub presumed_margin_percent: Decimal,

    /// Trailing 12-month revenue (bracket regime).
    #[arg(long, default_value = "0")]
    pub trailing_revenue: Decimal,

    /// Trailing 12-month payroll (bracket regime).
    #[arg(long, default_value = "0")]
    pub trailing_payroll: Decimal,

    /// Apply the reduced corporate income tax incentive.
    #[arg(long)]
    pub incentive: bool,

    /// Monthly costs that generate input credits.
    #[arg(long = "credit-costs", default_value = "0")]
    pub credit_generating_costs: Decimal,
}

impl RequestArgs {
    pub fn to_request(
        &self,
        year: i32,
    ) -> TaxCalculationRequest {
        TaxCalculationRequest::new(year, self.regime, self.revenue, self.activity_code.clone())
            .with_cost(self.cost)
            .with_presumed_margin_percent(self.presumed_margin_percent)
            .with_trailing(self.trailing_revenue, self.trailing_payroll)
            .with_incentive(self.incentive)
            .with_credit_generating_costs(self.credit_generating_costs)
    }
}

fn parse_regime(s: &str) -> Result<Regime, String> {
    Regime::parse(s).ok_or_else(|| {
        format!("unknown regime '{s}' (expected bracket, presumed-margin or actual-profit)")
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn parses_calculate_with_defaults() {
        let cli = Cli::try_parse_from([
            "tax-sim",
            "calculate",
            "--year",
            "2025",
            "--regime",
            "actual-profit",
            "--revenue",
            "100000",
            "--code",
            "6201-5/01",
        ])
        .expect("valid arguments");

        let Command::Calculate { year, request } = cli.command else {
            panic!("expected calculate, got {:?}", cli.command);
        };
        assert_eq!(
            request.to_request(year),
            TaxCalculationRequest::new(2025, Regime::ActualProfit, dec!(100000), "6201-5/01")
        );
    }

    #[test]
    fn negative_cost_is_accepted_and_normalized() {
        let cli = Cli::try_parse_from([
            "tax-sim",
            "calculate",
            "--year",
            "2030",
            "--regime",
            "ACTUAL-PROFIT",
            "--revenue",
            "1000",
            "--code",
            "x",
            "--cost",
            "-400",
        ])
        .expect("valid arguments");

        let Command::Calculate { year, request } = cli.command else {
            panic!("expected calculate");
        };
        assert_eq!(request.to_request(year).cost, dec!(400));
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "tax-sim",
            "batch",
            "requests.csv",
            "--log-level",
            "debug",
            "--config",
            "engine.toml",
        ])
        .expect("valid arguments");

        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert_eq!(cli.config, Some(PathBuf::from("engine.toml")));
        assert!(matches!(cli.command, Command::Batch { .. }));
    }

    #[test]
    fn unknown_regime_is_rejected() {
        let result = Cli::try_parse_from([
            "tax-sim",
            "timeline",
            "--from",
            "2025",
            "--to",
            "2030",
            "--regime",
            "flat",
            "--revenue",
            "1",
            "--code",
            "x",
        ]);

        assert!(result.is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
