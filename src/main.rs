//! This file defines the aggregationist binary entry point.

use std::fs::File;
use std::io::BufWriter;
use std::process::ExitCode;

use aggregationist::cli::{self, CommandLineArgs};
use aggregationist::error::AggregationError;
use aggregationist::pipeline;
use aggregationist::source::{split_metadata, JsonSource};
use aggregationist::tracing::init_tracing;
use tracing::{event, Level};

/// Application entry point
fn main() -> ExitCode {
    let args = cli::parse();
    init_tracing();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            event!(Level::ERROR, "{}", error);
            ExitCode::FAILURE
        }
    }
}

/// Aggregate the records named on the command line and write the result.
fn run(args: &CommandLineArgs) -> Result<(), AggregationError> {
    let (detected, records) = split_metadata(args.records.clone());
    let metadata = args.metadata.clone().or(detected);
    let source = JsonSource::new();
    let aggregated = pipeline::aggregate_all(&source, &records, metadata.as_deref())?;
    let file = File::create(&args.output)?;
    serde_json::to_writer_pretty(BufWriter::new(file), &aggregated)?;
    event!(Level::INFO, output = %args.output, "wrote aggregated record");
    Ok(())
}
