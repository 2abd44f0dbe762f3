use std::io::Read;

use revfs_core::id::ObjectId;
use revfs_store::StoreError;

use crate::graph::{HistoryWalk, NodeKind, ObjectGraph};
use crate::handle::Handle;
use crate::info::{FileInfo, Stat};
use crate::materialize::{Entry, Intent, NodeRef};
use crate::path::SnapPath;
use crate::ViewError;

/// An immutable view of the tree rooted at one commit.
///
/// Resolving is cheap: it loads the commit and checks its root tree, and
/// nothing else. All further work happens per opened path.
pub struct Snapshot<G> {
    graph: G,
    revision: String,
    commit: ObjectId,
    tree: ObjectId,
}

impl<G: ObjectGraph> Snapshot<G> {
    pub fn resolve(graph: G, revision: &str) -> Result<Self, ViewError> {
        let not_a_commit = |e: StoreError| match e {
            StoreError::RevisionNotFound(_)
            | StoreError::RefNotFound(_)
            | StoreError::AmbiguousRevision { .. }
            | StoreError::UnexpectedObject { expected: "commit", .. } => {
                ViewError::RevisionNotFound(revision.to_string())
            }
            other => other.into(),
        };
        let commit = graph.resolve_revision(revision).map_err(not_a_commit)?;
        let tree = graph.load_commit(&commit).map_err(not_a_commit)?.tree;
        match graph.stat_node(&tree)? {
            NodeKind::Directory => {}
            NodeKind::File { .. } => {
                return Err(ViewError::UnsupportedObjectKind {
                    path: ".".to_string(),
                    kind: "blob",
                })
            }
            NodeKind::Unsupported(kind) => {
                return Err(ViewError::UnsupportedObjectKind {
                    path: ".".to_string(),
                    kind,
                })
            }
        }

        Ok(Self {
            graph,
            revision: revision.to_string(),
            commit,
            tree,
        })
    }
}

impl<G> Snapshot<G> {
    pub fn graph(&self) -> &G {
        &self.graph
    }

    /// The revision expression this snapshot was resolved from.
    pub fn revision(&self) -> &str {
        &self.revision
    }

    pub fn commit_id(&self) -> &ObjectId {
        &self.commit
    }

    pub fn tree_id(&self) -> &ObjectId {
        &self.tree
    }
}

impl<G: ObjectGraph + HistoryWalk> Snapshot<G> {
    pub fn open_with(&self, path: &str, intent: Intent) -> Result<Entry<'_, G>, ViewError> {
        let (node, info) = self.lookup(path)?;
        match intent {
            Intent::MetadataOnly => Ok(Entry::Metadata(info)),
            Intent::ForRead => Ok(Entry::Open(self.open_node(node, info)?)),
        }
    }

    /// Open `path` for reading or listing.
    pub fn open(&self, path: &str) -> Result<Handle<'_, G>, ViewError> {
        let (node, info) = self.lookup(path)?;
        self.open_node(node, info)
    }

    fn lookup(&self, path: &str) -> Result<(NodeRef, FileInfo), ViewError> {
        let node = self.locate(&SnapPath::parse(path)?)?;
        let info = self.describe(&node)?;
        Ok((node, info))
    }

    pub fn stat(&self, path: &str) -> Result<FileInfo, ViewError> {
        Ok(self.open_with(path, Intent::MetadataOnly)?.into_info())
    }

    /// Every child of the directory at `path`, in stored order.
    pub fn read_dir(&self, path: &str) -> Result<Vec<FileInfo>, ViewError> {
        let mut handle = self.open(path)?;
        let entries = handle.read_entries(-1)?.unwrap_or_default();
        handle.close();
        Ok(entries)
    }

    pub fn read_file(&self, path: &str) -> Result<Vec<u8>, ViewError> {
        match self.open(path)? {
            Handle::File(mut file) => {
                let mut data = Vec::with_capacity(file.stat().size() as usize);
                file.read_to_end(&mut data)?;
                Ok(data)
            }
            Handle::Dir(dir) => Err(ViewError::PermissionDenied {
                op: "read",
                path: dir.stat().path().to_string(),
            }),
        }
    }
}
