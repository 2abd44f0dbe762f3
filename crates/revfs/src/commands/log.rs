use std::time::{Duration, UNIX_EPOCH};

use clap::Args;

use revfs_store::HistoryFilter;

use crate::config::open_store;
use crate::output::format_time;

#[derive(Args)]
pub struct LogArgs {
    /// Revision to start from
    #[arg(default_value = "HEAD")]
    revision: String,
    /// Only commits that changed this exact path
    #[arg(long, conflicts_with = "prefix")]
    path: Option<String>,
    /// Only commits that changed something under this directory
    #[arg(long)]
    prefix: Option<String>,
    /// Maximum number of entries
    #[arg(long, default_value = "20")]
    limit: usize,
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: LogArgs) -> anyhow::Result<()> {
    let store = open_store()?;
    let start = store.resolve_revision(&args.revision)?;
    let filter = match (args.path, args.prefix) {
        (Some(path), _) => HistoryFilter::Path(path),
        (None, Some(prefix)) => HistoryFilter::Prefix(prefix),
        (None, None) => HistoryFilter::All,
    };

    let mut entries = Vec::new();
    for info in store.history(&start, filter).take(args.limit) {
        entries.push(info?);
    }

    if args.json {
        let json: Vec<serde_json::Value> = entries
            .iter()
            .map(|e| {
                serde_json::json!({
                    "commit": e.id.to_hex(),
                    "author": e.author,
                    "timestamp_ms": e.timestamp_ms,
                    "message": e.message,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&json)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No matching commits.");
    }
    for entry in &entries {
        let date = format_time(UNIX_EPOCH + Duration::from_millis(entry.timestamp_ms));
        println!("commit {}", entry.id);
        println!("Author: {}", entry.author);
        println!("Date:   {date}");
        println!();
        for line in entry.message.lines() {
            println!("    {line}");
        }
        println!();
    }
    Ok(())
}
