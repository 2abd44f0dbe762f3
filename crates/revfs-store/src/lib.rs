pub mod error;
pub mod head;
pub mod history;
pub mod layout;
pub mod loose;
pub mod refs;
pub mod repo;
pub mod revparse;

pub use error::StoreError;
pub use head::HeadState;
pub use history::{CommitInfo, HistoryFilter, HistoryIter};
pub use repo::{RepoConfig, ServeConfig};

use std::io::Cursor;
use std::path::Path;

use revfs_core::cof::{cof_decode, cof_encode, cof_peek};
use revfs_core::hash::content_hash;
use revfs_core::id::ObjectId;
use revfs_core::object::{Object, TypeTag};
use revfs_core::types::{Commit, Tree};

use crate::layout::RepoLayout;

/// Kind and uncompressed size of a stored object, read from its header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectStat {
    pub type_tag: TypeTag,
    pub size: u64,
}

pub struct RevStore {
    layout: RepoLayout,
    config: RepoConfig,
}

impl RevStore {
    pub fn init(root: &Path) -> Result<Self, StoreError> {
        let layout = RepoLayout::new(root);
        layout.create_dirs()?;
        repo::write_default_config(&layout)?;
        Ok(Self {
            layout,
            config: RepoConfig::default(),
        })
    }

    pub fn open(root: &Path) -> Result<Self, StoreError> {
        let layout = RepoLayout::new(root);
        if !layout.revfs_dir().exists() {
            return Err(StoreError::NotARepository(root.to_path_buf()));
        }
        let config = repo::read_config(&layout)?;
        Ok(Self { layout, config })
    }

    pub fn root(&self) -> &Path {
        self.layout.root()
    }

    pub fn layout(&self) -> &RepoLayout {
        &self.layout
    }

    pub fn config(&self) -> &RepoConfig {
        &self.config
    }

    pub fn store_object(&self, obj: &Object) -> Result<ObjectId, StoreError> {
        let payload = obj.serialize_payload()?;
        let type_tag = obj.type_tag();
        let id = content_hash(type_tag, &payload);
        let cof_data = cof_encode(type_tag, &payload)?;
        loose::write_loose_object(&self.layout, &id, &cof_data)?;
        Ok(id)
    }

    pub fn load_object(&self, id: &ObjectId) -> Result<Object, StoreError> {
        let cof_data = loose::read_loose_object(&self.layout, id)?;
        let (type_tag, payload) = cof_decode(&cof_data)?;
        let obj = Object::deserialize_payload(type_tag, &payload)?;
        Ok(obj)
    }

    /// Kind and size without decompressing the payload.
    pub fn stat_object(&self, id: &ObjectId) -> Result<ObjectStat, StoreError> {
        let header = loose::read_loose_header(&self.layout, id)?;
        let header = cof_peek(&header)?;
        Ok(ObjectStat {
            type_tag: header.type_tag,
            size: header.uncompressed_len,
        })
    }

    pub fn has_object(&self, id: &ObjectId) -> bool {
        loose::loose_object_path(&self.layout, id).exists()
    }

    pub fn load_tree(&self, id: &ObjectId) -> Result<Tree, StoreError> {
        match self.load_object(id)? {
            Object::Tree(tree) => Ok(tree),
            other => Err(unexpected(id, TypeTag::Tree, &other)),
        }
    }

    pub fn load_commit(&self, id: &ObjectId) -> Result<Commit, StoreError> {
        match self.load_object(id)? {
            Object::Commit(commit) => Ok(commit),
            other => Err(unexpected(id, TypeTag::Commit, &other)),
        }
    }

    /// Byte stream over a blob's content.
    pub fn open_blob(&self, id: &ObjectId) -> Result<Cursor<Vec<u8>>, StoreError> {
        match self.load_object(id)? {
            Object::Blob(blob) => Ok(Cursor::new(blob.data)),
            other => Err(unexpected(id, TypeTag::Blob, &other)),
        }
    }

    pub fn set_ref(&self, name: &str, target: &ObjectId) -> Result<(), StoreError> {
        refs::write_ref(&self.layout, name, target)
    }

    pub fn get_ref(&self, name: &str) -> Result<Option<ObjectId>, StoreError> {
        refs::read_ref(&self.layout, name)
    }

    pub fn list_refs(&self, prefix: &str) -> Result<Vec<(String, ObjectId)>, StoreError> {
        refs::list_refs(&self.layout, prefix)
    }

    pub fn delete_ref(&self, name: &str) -> Result<(), StoreError> {
        refs::delete_ref(&self.layout, name)
    }

    pub fn read_head(&self) -> Result<HeadState, StoreError> {
        head::read_head(&self.layout, &self.config.default_branch)
    }

    pub fn write_head(&self, state: &HeadState) -> Result<(), StoreError> {
        head::write_head(&self.layout, state)
    }

    pub fn resolve_head(&self) -> Result<Option<ObjectId>, StoreError> {
        head::resolve_head(&self.layout, &self.config.default_branch)
    }

    /// Resolve a branch, tag, hash, or `HEAD` expression to a commit.
    pub fn resolve_revision(&self, rev: &str) -> Result<ObjectId, StoreError> {
        revparse::resolve_revision(self, rev)
    }

    /// Commits reachable from `from` that touch `filter`, newest first.
    pub fn history(&self, from: &ObjectId, filter: HistoryFilter) -> HistoryIter<'_> {
        HistoryIter::new(self, *from, filter)
    }
}

fn unexpected(id: &ObjectId, expected: TypeTag, actual: &Object) -> StoreError {
    StoreError::UnexpectedObject {
        id: *id,
        expected: expected.name(),
        actual: actual.type_tag().name(),
    }
}
