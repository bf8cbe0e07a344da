//! normalizr command-line tool
//!
//! Flattens a nested JSON payload into entity tables using a schema
//! document, and prints `{"result": ..., "entities": ...}` to stdout.
//!
//! Usage:
//!   normalizr --data response.json --schema schema.json --pretty
//!
//! Logs go to stderr; merge conflicts are reported as warnings.

use std::path::PathBuf;
use anyhow::Result;
use clap::Parser;
use normalizr_cli::run_files;
use normalizr_core::{DEFAULT_MAX_DEPTH, NormalizeOptions};
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "normalizr")]
#[command(about = "Normalize nested JSON into flat entity tables")]
struct Args {
    /// JSON payload to normalize (`-` for stdin)
    #[arg(short, long)]
    data: PathBuf,

    /// Schema document describing entities and the root schema
    #[arg(short, long)]
    schema: PathBuf,

    /// Pretty-print the output
    #[arg(short, long)]
    pretty: bool,

    /// Maximum nesting depth accepted
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    debug!(data = %args.data.display(), schema = %args.schema.display(), "Loading inputs");
    let options = NormalizeOptions::default().with_max_depth(args.max_depth);
    let output = run_files(&args.data, &args.schema, &options, args.pretty)?;
    println!("{output}");
    Ok(())
}
