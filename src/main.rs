//! Bill Splitter CLI
//!
//! Reads a group file (members and expenses as JSON) and prints the balance
//! report, or the settlements alone as CSV.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- group.json [--csv] [--strict] [--notify] > report.json
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `info` to control logging verbosity

use bill_splitter::{
    notify, report, GroupRecord, LogNotifier, OutputFormat, Result, RunConfig, SplitEngine,
};
use log::info;
use std::env;
use std::fs::File;
use std::io::{self, BufReader};
use std::process;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let config = RunConfig::from_args(env::args().skip(1))?;

    let file = File::open(&config.input)?;
    let group = GroupRecord::from_reader(BufReader::new(file))?.normalize();
    info!(
        "Loaded group '{}' with {} members and {} expenses",
        group.name,
        group.members.len(),
        group.expenses.len()
    );

    let mut engine = if config.strict {
        SplitEngine::new_strict(group)?
    } else {
        SplitEngine::new(group)
    };

    if config.notify {
        let mut notifier = LogNotifier::new();
        let outcomes = engine.notify_settlements(&mut notifier)?;
        notify::log_outcomes(&outcomes);
    }

    let balance = engine.balance();
    let stdout = io::stdout();
    let handle = stdout.lock();
    match config.format {
        OutputFormat::Json => report::write_json(&balance, handle)?,
        OutputFormat::Csv => report::write_settlements_csv(&balance, handle)?,
    }

    Ok(())
}
