//! Restaurant Report: runs the sales reporting pipeline and prints the summary

use clap::Parser;
use restaurant_report::{logging, pipeline, report, Args, ReportError};
use std::process::ExitCode;
use tracing::error;

fn main() -> ExitCode {
    let args = Args::parse();
    logging::init_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Some(ReportError::MissingInput { file }) = err.downcast_ref::<ReportError>() {
                error!(
                    file = %file,
                    "Required file not found; ensure all four CSVs are in the data directory"
                );
            } else {
                error!("{:#}", err);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let config = args.pipeline_config()?;
    let report = pipeline::run(&config)?;

    print!("{}", report::render(&report));

    Ok(())
}
