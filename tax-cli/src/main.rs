use clap::Parser;
use tracing::debug;

use tax_cli::{app, cli::Cli, logging};

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_level.as_deref(), cli.log_file.as_deref())?;

    debug!(command = ?cli.command, "starting");
    let report = app::run(&cli)?;
    print!("{report}");

    Ok(())
}
