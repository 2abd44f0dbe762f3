use std::path::PathBuf;

use clap::Args;

use revfs_store::repo::{read_config, write_config};
use revfs_store::RevStore;

#[derive(Args)]
pub struct InitArgs {
    /// Directory to initialize (default: current directory)
    path: Option<PathBuf>,
    /// Repository name recorded in repo.toml
    #[arg(long)]
    name: Option<String>,
    /// Branch HEAD points at until changed
    #[arg(long, default_value = "main")]
    default_branch: String,
}

pub fn run(args: InitArgs) -> anyhow::Result<()> {
    let root = match args.path {
        Some(path) => path,
        None => std::env::current_dir()?,
    };
    std::fs::create_dir_all(&root)?;
    if root.join(".revfs").exists() {
        anyhow::bail!("already a revfs repository: {}", root.display());
    }

    let store = RevStore::init(&root)?;
    let mut config = read_config(store.layout())?;
    config.name = args.name;
    config.default_branch = args.default_branch;
    write_config(store.layout(), &config)?;

    tracing::info!(root = %root.display(), branch = %config.default_branch, "initialized repository");
    println!("Initialized empty revfs repository in {}", store.layout().revfs_dir().display());
    Ok(())
}
