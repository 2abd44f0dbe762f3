use clap::Args;

use revfs_core::object::Object;
use revfs_core::types::Commit;
use revfs_store::HeadState;

use crate::config::open_store;
use crate::ignore::IgnoreRules;
use crate::worktree;

#[derive(Args)]
pub struct CommitArgs {
    /// Commit message
    #[arg(short, long)]
    message: String,
    /// Author name
    #[arg(short, long, default_value = "revfs")]
    author: String,
    /// Author time in milliseconds since the unix epoch (default: now)
    #[arg(long)]
    timestamp_ms: Option<u64>,
    /// Record a commit even if the tree did not change
    #[arg(long)]
    allow_empty: bool,
}

pub fn run(args: CommitArgs) -> anyhow::Result<()> {
    let store = open_store()?;
    let root = store.root().to_path_buf();
    let ignore = IgnoreRules::load(&root)?;

    let branch_ref = match store.read_head()? {
        HeadState::Symbolic { ref_name } => ref_name,
        HeadState::Detached { .. } => anyhow::bail!("cannot commit in detached HEAD state"),
    };
    let parent = store.get_ref(&branch_ref)?;

    let tree = worktree::scan_worktree(&store, &root, &ignore)?;
    if let Some(parent_id) = &parent {
        if store.load_commit(parent_id)?.tree == tree && !args.allow_empty {
            println!("Nothing to commit.");
            return Ok(());
        }
    }

    let timestamp_ms = match args.timestamp_ms {
        Some(ms) => ms,
        None => std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)?
            .as_millis() as u64,
    };

    let commit = Commit {
        parents: parent.into_iter().collect(),
        tree,
        author: args.author,
        timestamp_ms,
        message: args.message,
    };
    let id = store.store_object(&Object::Commit(commit.clone()))?;
    store.set_ref(&branch_ref, &id)?;

    tracing::info!(commit = %id.short_hex(), branch = %branch_ref, "recorded commit");
    let branch = branch_ref.strip_prefix("heads/").unwrap_or(&branch_ref);
    println!("[{branch} {}] {}", id.short_hex(), commit.message);
    Ok(())
}
