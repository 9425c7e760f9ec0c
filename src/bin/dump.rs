//! fdict-dump
//!
//! Lists the records of a dictionary backing file.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use fdict::codec::peek_type_tag;
use fdict::storage::RecordLog;
use tracing_subscriber::{fmt, EnvFilter};

/// Inspect an fdict backing file
#[derive(Parser, Debug)]
#[command(name = "fdict-dump")]
#[command(about = "List the records of an fdict backing file")]
#[command(version)]
struct Args {
    /// Backing file to read
    path: PathBuf,

    /// Also print each record's text
    #[arg(short, long)]
    values: bool,

    /// Stop after this many records
    #[arg(short, long)]
    limit: Option<usize>,
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(&args) {
        Ok(count) => {
            tracing::info!("{} records in {}", count, args.path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Failed to read {}: {}", args.path.display(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> fdict::Result<usize> {
    let mut log = RecordLog::open_existing(&args.path)?;
    let limit = args.limit.unwrap_or(usize::MAX);
    let mut count = 0;

    println!("{:>12}  {:>8}  type", "offset", "bytes");

    for record in log.scan()?.take(limit) {
        let (offset, payload) = record?;
        let text = String::from_utf8_lossy(&payload);
        let tag = peek_type_tag(&text).unwrap_or_else(|_| "<unreadable>".to_string());

        println!("{:>12}  {:>8}  {}", offset, payload.len(), tag);
        if args.values {
            println!("{:>24}{}", "", text);
        }
        count += 1;
    }

    Ok(count)
}
