use std::io::Read;
use std::sync::Arc;

use revfs_core::id::ObjectId;
use revfs_core::object::TypeTag;
use revfs_core::types::{Commit, TreeEntry};
use revfs_store::{CommitInfo, HistoryFilter, RevStore, StoreError};

pub type BlobStream = Box<dyn Read + Send>;
pub type CommitStream<'a> = Box<dyn Iterator<Item = Result<CommitInfo, StoreError>> + 'a>;

/// What a stored object can become in the filesystem view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Directory,
    File { size: u64 },
    Unsupported(&'static str),
}

/// Content-addressed object lookups the view is built on.
pub trait ObjectGraph {
    fn resolve_revision(&self, revision: &str) -> Result<ObjectId, StoreError>;

    fn load_commit(&self, id: &ObjectId) -> Result<Commit, StoreError>;

    /// Classify an object without reading file content.
    fn stat_node(&self, id: &ObjectId) -> Result<NodeKind, StoreError>;

    /// Children of a directory object, in stored order.
    fn read_dir(&self, id: &ObjectId) -> Result<Vec<TreeEntry>, StoreError>;

    fn open_blob(&self, id: &ObjectId) -> Result<BlobStream, StoreError>;
}

/// Filtered commit history, newest first.
pub trait HistoryWalk {
    fn walk(&self, from: &ObjectId, filter: HistoryFilter) -> CommitStream<'_>;
}

impl ObjectGraph for RevStore {
    fn resolve_revision(&self, revision: &str) -> Result<ObjectId, StoreError> {
        RevStore::resolve_revision(self, revision)
    }

    fn load_commit(&self, id: &ObjectId) -> Result<Commit, StoreError> {
        RevStore::load_commit(self, id)
    }

    fn stat_node(&self, id: &ObjectId) -> Result<NodeKind, StoreError> {
        let stat = self.stat_object(id)?;
        Ok(match stat.type_tag {
            TypeTag::Tree => NodeKind::Directory,
            TypeTag::Blob => NodeKind::File { size: stat.size },
            other => NodeKind::Unsupported(other.name()),
        })
    }

    fn read_dir(&self, id: &ObjectId) -> Result<Vec<TreeEntry>, StoreError> {
        Ok(self.load_tree(id)?.entries)
    }

    fn open_blob(&self, id: &ObjectId) -> Result<BlobStream, StoreError> {
        Ok(Box::new(RevStore::open_blob(self, id)?))
    }
}

impl HistoryWalk for RevStore {
    fn walk(&self, from: &ObjectId, filter: HistoryFilter) -> CommitStream<'_> {
        Box::new(self.history(from, filter))
    }
}

macro_rules! forward_graph {
    ($($ptr:ty),*) => {$(
        impl<T: ObjectGraph + ?Sized> ObjectGraph for $ptr {
            fn resolve_revision(&self, revision: &str) -> Result<ObjectId, StoreError> {
                (**self).resolve_revision(revision)
            }

            fn load_commit(&self, id: &ObjectId) -> Result<Commit, StoreError> {
                (**self).load_commit(id)
            }

            fn stat_node(&self, id: &ObjectId) -> Result<NodeKind, StoreError> {
                (**self).stat_node(id)
            }

            fn read_dir(&self, id: &ObjectId) -> Result<Vec<TreeEntry>, StoreError> {
                (**self).read_dir(id)
            }

            fn open_blob(&self, id: &ObjectId) -> Result<BlobStream, StoreError> {
                (**self).open_blob(id)
            }
        }

        impl<T: HistoryWalk + ?Sized> HistoryWalk for $ptr {
            fn walk(&self, from: &ObjectId, filter: HistoryFilter) -> CommitStream<'_> {
                (**self).walk(from, filter)
            }
        }
    )*};
}

forward_graph!(&T, Arc<T>);
