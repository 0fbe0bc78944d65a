/*!
 * MLFQ Simulator - Main Entry Point
 *
 * Completion lines go to stdout, logs to stderr.
 */

use clap::Parser;
use miette::IntoDiagnostic;
use mlfq_sim::cli::Cli;
use mlfq_sim::{init_tracing, MlfqError, Runtime};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use tracing::info;

fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    // Configuration errors surface here, before any thread is spawned
    let runtime = Runtime::new(cli.to_config())?;
    info!(config = ?runtime.config(), "MLFQ simulator starting");

    let input: Box<dyn BufRead + Send> = match &cli.input {
        Some(path) => Box::new(BufReader::new(File::open(path).map_err(MlfqError::from)?)),
        None => Box::new(BufReader::new(io::stdin())),
    };

    let summary = runtime.run(input, io::stdout())?;
    info!(
        run_id = %summary.run_id,
        stats = %serde_json::to_string(&summary.stats).into_diagnostic()?,
        "MLFQ simulator finished"
    );
    Ok(())
}
