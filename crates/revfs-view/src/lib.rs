//! A read-only filesystem over one revision of a revfs repository.
//!
//! [`Snapshot::resolve`] turns a revision expression into an immutable view
//! rooted at that commit's tree. Paths inside the snapshot are opened with
//! [`Snapshot::open`] (content-bearing [`Handle`]) or described with
//! [`Snapshot::stat`] (metadata-only [`FileInfo`]). Every entry carries the
//! author time of the newest commit that touched it.
//!
//! ```no_run
//! use std::io::Read;
//! use revfs_store::RevStore;
//! use revfs_view::Snapshot;
//!
//! let store = RevStore::open(std::path::Path::new("."))?;
//! let snap = Snapshot::resolve(&store, "main")?;
//! let mut readme = String::new();
//! snap.open("docs/readme.md")?.read_to_string(&mut readme)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod graph;
mod handle;
mod info;
mod materialize;
mod path;
mod snapshot;

#[cfg(test)]
mod testing;

pub use error::ViewError;
pub use graph::{BlobStream, CommitStream, HistoryWalk, NodeKind, ObjectGraph};
pub use handle::{DirCursor, DirHandle, FileHandle, Handle};
pub use info::{FileInfo, FsMode, Stat};
pub use materialize::{Entry, Intent, NodeRef};
pub use path::SnapPath;
pub use snapshot::Snapshot;

pub use revfs_store::{CommitInfo, HistoryFilter};
