use std::io::Write;

use clap::Args;

use revfs_view::{Handle, Snapshot};

use crate::config::open_store;

#[derive(Args)]
pub struct CatArgs {
    /// Revision to read from
    revision: String,
    /// File inside the revision
    path: String,
}

pub fn run(args: CatArgs) -> anyhow::Result<()> {
    let store = open_store()?;
    let snapshot = Snapshot::resolve(&store, &args.revision)?;

    match snapshot.open(&args.path)? {
        Handle::File(mut file) => {
            let mut stdout = std::io::stdout().lock();
            std::io::copy(&mut file, &mut stdout)?;
            stdout.flush()?;
            file.close();
            Ok(())
        }
        Handle::Dir(_) => anyhow::bail!("{} is a directory", args.path),
    }
}
