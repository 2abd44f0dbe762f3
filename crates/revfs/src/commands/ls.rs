use clap::Args;

use revfs_view::{Handle, Snapshot, Stat};

use crate::config::open_store;
use crate::output::listing_line;

#[derive(Args)]
pub struct LsArgs {
    /// Revision to list
    revision: String,
    /// Directory inside the revision
    #[arg(default_value = ".")]
    path: String,
    /// Entries materialized per batch
    #[arg(long, default_value = "32")]
    batch: isize,
}

pub fn run(args: LsArgs) -> anyhow::Result<()> {
    let store = open_store()?;
    let snapshot = Snapshot::resolve(&store, &args.revision)?;

    match snapshot.open(&args.path)? {
        Handle::File(file) => println!("{}", listing_line(file.stat())),
        Handle::Dir(mut dir) => {
            while let Some(batch) = dir.read_entries(args.batch)? {
                if batch.is_empty() {
                    anyhow::bail!("--batch must not be 0");
                }
                for info in &batch {
                    println!("{}", listing_line(info));
                }
            }
            dir.close();
        }
    }
    Ok(())
}
