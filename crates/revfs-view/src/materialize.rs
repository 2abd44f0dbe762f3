//! Turning graph nodes into filesystem entries.

use std::time::{Duration, UNIX_EPOCH};

use revfs_core::id::ObjectId;
use revfs_core::types::FileMode;
use revfs_store::HistoryFilter;

use crate::graph::{HistoryWalk, NodeKind, ObjectGraph};
use crate::handle::{DirCursor, DirHandle, FileHandle, Handle};
use crate::info::{FileInfo, FsMode, Stat};
use crate::path::SnapPath;
use crate::snapshot::Snapshot;
use crate::ViewError;

/// What the caller plans to do with an opened path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Stat-level fields only. Never opens blob content.
    MetadataOnly,
    /// A handle with a content stream (files) or a child cursor (directories).
    ForRead,
}

/// Result of [`Snapshot::open_with`].
pub enum Entry<'s, G> {
    Metadata(FileInfo),
    Open(Handle<'s, G>),
}

impl<G> Entry<'_, G> {
    pub fn into_info(self) -> FileInfo {
        match self {
            Entry::Metadata(info) => info,
            Entry::Open(handle) => handle.stat().clone(),
        }
    }
}

impl<G> Stat for Entry<'_, G> {
    fn stat(&self) -> &FileInfo {
        match self {
            Entry::Metadata(info) => info,
            Entry::Open(handle) => handle.stat(),
        }
    }
}

/// A graph object together with the mode its parent recorded for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRef {
    pub path: SnapPath,
    pub mode: FileMode,
    pub id: ObjectId,
}

impl NodeRef {
    pub(crate) fn root(tree: ObjectId) -> Self {
        Self {
            path: SnapPath::root(),
            mode: FileMode::Directory,
            id: tree,
        }
    }

    fn history_filter(&self) -> HistoryFilter {
        if self.path.is_root() {
            HistoryFilter::All
        } else if self.mode == FileMode::Directory {
            HistoryFilter::Prefix(self.path.to_string())
        } else {
            HistoryFilter::Path(self.path.to_string())
        }
    }
}

impl<G: ObjectGraph + HistoryWalk> Snapshot<G> {
    /// Follow `path` from the root tree.
    pub(crate) fn locate(&self, path: &SnapPath) -> Result<NodeRef, ViewError> {
        let mut node = NodeRef::root(*self.tree_id());
        for segment in path.segments() {
            if node.mode != FileMode::Directory {
                return Err(ViewError::NotExist(path.to_string()));
            }
            let entry = self
                .graph()
                .read_dir(&node.id)?
                .into_iter()
                .find(|e| &e.name == segment)
                .ok_or_else(|| ViewError::NotExist(path.to_string()))?;
            node = NodeRef {
                path: node.path.join(segment),
                mode: entry.mode,
                id: entry.object_id,
            };
        }
        Ok(node)
    }

    /// Stat-level fields for `node`, including its history-derived mod time.
    pub(crate) fn describe(&self, node: &NodeRef) -> Result<FileInfo, ViewError> {
        let path = node.path.to_string();
        let (is_dir, size) = match self.graph().stat_node(&node.id)? {
            NodeKind::Directory => (true, 0),
            NodeKind::File { size } => (false, size),
            NodeKind::Unsupported(kind) => {
                return Err(ViewError::UnsupportedObjectKind { path, kind });
            }
        };

        // The recorded mode must agree with what the object actually is.
        let mode = match FsMode::translate(node.mode) {
            Some(mode) if mode.is_dir() == is_dir => mode,
            _ => {
                return Err(ViewError::UnsupportedModeTranslation {
                    path,
                    mode: node.mode.name(),
                })
            }
        };

        let latest = self
            .graph()
            .walk(self.commit_id(), node.history_filter())
            .next();
        let commit = match latest {
            Some(Ok(commit)) => commit,
            Some(Err(source)) => {
                return Err(ViewError::HistoryUnavailable {
                    path,
                    source: Some(source),
                })
            }
            None => return Err(ViewError::HistoryUnavailable { path, source: None }),
        };

        Ok(FileInfo {
            name: node.path.name().to_string(),
            path,
            size,
            mode,
            mod_time: UNIX_EPOCH + Duration::from_millis(commit.timestamp_ms),
            last_commit: commit.id,
        })
    }

    /// Handle over an already described node: a content stream for files,
    /// a child cursor for directories.
    pub(crate) fn open_node(&self, node: NodeRef, info: FileInfo) -> Result<Handle<'_, G>, ViewError> {
        if info.is_dir() {
            let cursor = DirCursor::new(self.graph().read_dir(&node.id)?);
            Ok(Handle::Dir(DirHandle::new(self, info, node.path, cursor)))
        } else {
            let stream = self.graph().open_blob(&node.id)?;
            Ok(Handle::File(FileHandle::new(info, stream)))
        }
    }
}
