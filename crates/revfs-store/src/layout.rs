use std::path::{Path, PathBuf};

use crate::StoreError;

#[derive(Debug, Clone)]
pub struct RepoLayout {
    root: PathBuf,
}

impl RepoLayout {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn revfs_dir(&self) -> PathBuf {
        self.root.join(".revfs")
    }

    pub fn objects_dir(&self) -> PathBuf {
        self.revfs_dir().join("objects")
    }

    pub fn refs_dir(&self) -> PathBuf {
        self.revfs_dir().join("refs")
    }

    pub fn head_file(&self) -> PathBuf {
        self.revfs_dir().join("HEAD")
    }

    pub fn config_file(&self) -> PathBuf {
        self.revfs_dir().join("repo.toml")
    }

    pub fn create_dirs(&self) -> Result<(), StoreError> {
        std::fs::create_dir_all(self.objects_dir())?;
        std::fs::create_dir_all(self.refs_dir().join("heads"))?;
        std::fs::create_dir_all(self.refs_dir().join("tags"))?;
        Ok(())
    }
}
