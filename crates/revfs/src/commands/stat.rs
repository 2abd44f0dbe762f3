use clap::Args;

use revfs_view::Snapshot;

use crate::config::open_store;
use crate::output::{format_time, kv};

#[derive(Args)]
pub struct StatArgs {
    /// Revision to inspect
    revision: String,
    /// Path inside the revision
    #[arg(default_value = ".")]
    path: String,
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: StatArgs) -> anyhow::Result<()> {
    let store = open_store()?;
    let snapshot = Snapshot::resolve(&store, &args.revision)?;
    let info = snapshot.stat(&args.path)?;

    if args.json {
        let mod_time_ms = info
            .mod_time()
            .duration_since(std::time::UNIX_EPOCH)?
            .as_millis() as u64;
        let json = serde_json::json!({
            "name": info.name(),
            "path": info.path(),
            "size": info.size(),
            "mode": info.mode().to_string(),
            "mode_bits": info.mode().bits(),
            "is_dir": info.is_dir(),
            "mod_time_ms": mod_time_ms,
            "last_commit": info.last_commit().to_hex(),
        });
        println!("{}", serde_json::to_string_pretty(&json)?);
        return Ok(());
    }

    println!("{}", kv("Name", info.name()));
    println!("{}", kv("Path", info.path()));
    println!("{}", kv("Size", &info.size().to_string()));
    println!("{}", kv("Mode", &info.mode().to_string()));
    println!("{}", kv("Modified", &format_time(info.mod_time())));
    println!("{}", kv("Commit", &info.last_commit().to_string()));
    Ok(())
}
