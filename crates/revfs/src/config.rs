use std::path::{Path, PathBuf};

use revfs_store::RevStore;

/// Find the repository root by walking up from `start`.
pub fn find_repo_root_from(start: &Path) -> anyhow::Result<PathBuf> {
    let mut dir = start.to_path_buf();
    loop {
        if dir.join(".revfs").is_dir() {
            return Ok(dir);
        }
        if !dir.pop() {
            anyhow::bail!("not in a revfs repository (no .revfs directory found)");
        }
    }
}

pub fn find_repo_root() -> anyhow::Result<PathBuf> {
    find_repo_root_from(&std::env::current_dir()?)
}

pub fn open_store() -> anyhow::Result<RevStore> {
    Ok(RevStore::open(&find_repo_root()?)?)
}
