//! Command Line Interface (CLI) arguments.

use clap::Parser;

/// Aggregationist command line interface
#[derive(Clone, Debug, Parser)]
pub struct CommandLineArgs {
    /// Paths of the profile records to aggregate, in stacking order
    #[arg(required = true)]
    pub records: Vec<String>,
    /// Path of the metadata record; detected by filename convention if not specified
    #[arg(long, env = "AGGREGATIONIST_METADATA")]
    pub metadata: Option<String>,
    /// Path to which the aggregated record is written
    #[arg(long, default_value = "aggregate.json", env = "AGGREGATIONIST_OUTPUT")]
    pub output: String,
}

/// Returns parsed command line arguments.
pub fn parse() -> CommandLineArgs {
    CommandLineArgs::parse()
}
