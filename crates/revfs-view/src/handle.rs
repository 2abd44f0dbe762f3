//! Content-bearing handles returned by [`Snapshot::open`](crate::Snapshot::open).

use std::collections::VecDeque;
use std::fmt;
use std::io::{self, Read};

use revfs_core::types::TreeEntry;

use crate::graph::{BlobStream, HistoryWalk, ObjectGraph};
use crate::info::{FileInfo, Stat};
use crate::materialize::NodeRef;
use crate::path::SnapPath;
use crate::snapshot::Snapshot;
use crate::ViewError;

/// An open regular file.
pub struct FileHandle {
    info: FileInfo,
    stream: BlobStream,
}

impl FileHandle {
    pub(crate) fn new(info: FileInfo, stream: BlobStream) -> Self {
        Self { info, stream }
    }

    pub fn close(self) {}
}

impl Read for FileHandle {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.stream.read(buf)
    }
}

impl Stat for FileHandle {
    fn stat(&self) -> &FileInfo {
        &self.info
    }
}

impl fmt::Debug for FileHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileHandle").field("info", &self.info).finish_non_exhaustive()
    }
}

/// Children of a directory that have not been returned yet, in stored order.
#[derive(Debug, Clone, Default)]
pub struct DirCursor {
    remaining: VecDeque<TreeEntry>,
}

impl DirCursor {
    pub fn new(entries: Vec<TreeEntry>) -> Self {
        Self {
            remaining: entries.into(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.remaining.len()
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining.is_empty()
    }

    /// The next `n` entries, without consuming them.
    pub fn peek(&self, n: usize) -> impl Iterator<Item = &TreeEntry> {
        self.remaining.iter().take(n)
    }

    pub fn advance(&mut self, n: usize) {
        let n = n.min(self.remaining.len());
        self.remaining.drain(..n);
    }

    pub fn clear(&mut self) {
        self.remaining.clear();
    }
}

/// An open directory. Enumerated with [`DirHandle::read_entries`].
pub struct DirHandle<'s, G> {
    snapshot: &'s Snapshot<G>,
    info: FileInfo,
    path: SnapPath,
    cursor: DirCursor,
}

impl<'s, G> DirHandle<'s, G> {
    pub(crate) fn new(snapshot: &'s Snapshot<G>, info: FileInfo, path: SnapPath, cursor: DirCursor) -> Self {
        Self {
            snapshot,
            info,
            path,
            cursor,
        }
    }

    pub fn cursor(&self) -> &DirCursor {
        &self.cursor
    }

    /// Drops whatever children were never listed.
    pub fn close(mut self) {
        self.cursor.clear();
    }
}

impl<G: ObjectGraph + HistoryWalk> DirHandle<'_, G> {
    /// Up to `max` more children, or all of them when `max` is negative.
    ///
    /// `None` marks the end of the listing. `Some(vec![])` is only returned
    /// for `max == 0`. If any child cannot be described the call fails and
    /// the cursor does not move.
    pub fn read_entries(&mut self, max: isize) -> Result<Option<Vec<FileInfo>>, ViewError> {
        if max == 0 {
            return Ok(Some(Vec::new()));
        }
        if self.cursor.is_exhausted() {
            return Ok(None);
        }
        let n = usize::try_from(max).map_or(self.cursor.remaining(), |m| m.min(self.cursor.remaining()));

        let mut infos = Vec::with_capacity(n);
        for entry in self.cursor.peek(n) {
            let node = NodeRef {
                path: self.path.join(&entry.name),
                mode: entry.mode,
                id: entry.object_id,
            };
            infos.push(self.snapshot.describe(&node)?);
        }
        self.cursor.advance(n);
        Ok(Some(infos))
    }
}

impl<G> Stat for DirHandle<'_, G> {
    fn stat(&self) -> &FileInfo {
        &self.info
    }
}

impl<G> fmt::Debug for DirHandle<'_, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirHandle")
            .field("info", &self.info)
            .field("remaining", &self.cursor.remaining())
            .finish_non_exhaustive()
    }
}

/// Either kind of open entry.
pub enum Handle<'s, G> {
    File(FileHandle),
    Dir(DirHandle<'s, G>),
}

impl<G> fmt::Debug for Handle<'_, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handle::File(file) => fmt::Debug::fmt(file, f),
            Handle::Dir(dir) => fmt::Debug::fmt(dir, f),
        }
    }
}

impl<G> Handle<'_, G> {
    pub fn is_dir(&self) -> bool {
        matches!(self, Handle::Dir(_))
    }

    /// Read file content. Directories have none.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize, ViewError> {
        match self {
            Handle::File(file) => Ok(file.read(buf)?),
            Handle::Dir(dir) => Err(ViewError::PermissionDenied {
                op: "read",
                path: dir.info.path.clone(),
            }),
        }
    }

    pub fn close(self) {
        match self {
            Handle::File(file) => file.close(),
            Handle::Dir(dir) => dir.close(),
        }
    }
}

impl<G: ObjectGraph + HistoryWalk> Handle<'_, G> {
    /// See [`DirHandle::read_entries`]. Files cannot be listed.
    pub fn read_entries(&mut self, max: isize) -> Result<Option<Vec<FileInfo>>, ViewError> {
        match self {
            Handle::Dir(dir) => dir.read_entries(max),
            Handle::File(file) => Err(ViewError::PermissionDenied {
                op: "readdir",
                path: file.info.path.clone(),
            }),
        }
    }
}

impl<G> Stat for Handle<'_, G> {
    fn stat(&self) -> &FileInfo {
        match self {
            Handle::File(file) => file.stat(),
            Handle::Dir(dir) => dir.stat(),
        }
    }
}

impl<G> Read for Handle<'_, G> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Handle::read(self, buf).map_err(io::Error::from)
    }
}
