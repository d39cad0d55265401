//! Apply record-checking rules to a batch of JSON records.
//!
//! ```text
//! bibcheck --rules rules.json records.json --output amended.json --report
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use inspire_marc::bibcheck::{task, IssueKind, RuleSet};
use inspire_marc::Record;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info, trace};

#[derive(Parser, Debug)]
#[command(
    name = "bibcheck",
    version,
    about = "Apply record-checking rules to a batch of JSON records"
)]
struct Cli {
    /// JSON rule file
    #[arg(short, long)]
    rules: PathBuf,

    /// JSON file holding an array of records
    records: PathBuf,

    /// Write the checked records here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the per-record report as JSON on stderr
    #[arg(long)]
    report: bool,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_target(cli.verbose >= 2)
        .with_writer(std::io::stderr)
        .init();
    trace!("Full CLI args: {:?}", std::env::args().collect::<Vec<_>>());

    let rules = RuleSet::from_path(&cli.rules)
        .with_context(|| format!("reading rules from {}", cli.rules.display()))?
        .compile()
        .context("compiling rules")?;
    debug!(rules = rules.len(), "rules compiled");

    let text = fs::read_to_string(&cli.records)
        .with_context(|| format!("reading records from {}", cli.records.display()))?;
    let records: Vec<Record> = serde_json::from_str(&text)
        .with_context(|| format!("parsing records in {}", cli.records.display()))?;

    let (records, report) = task::check_records(records, &rules);

    let json = serde_json::to_string_pretty(&records)?;
    match &cli.output {
        Some(path) => fs::write(path, json)
            .with_context(|| format!("writing records to {}", path.display()))?,
        None => println!("{json}"),
    }

    if cli.report {
        eprintln!("{}", serde_json::to_string_pretty(&report)?);
    }

    info!(
        amended = report.amended_count(),
        warnings = report.count(IssueKind::Warning),
        "done"
    );
    Ok(())
}
