use std::io;

use thiserror::Error;

use revfs_core::id::ObjectId;
use revfs_store::StoreError;

#[derive(Debug, Error)]
pub enum ViewError {
    #[error("revision not found: {0}")]
    RevisionNotFound(String),
    #[error("{0}: file does not exist")]
    NotExist(String),
    #[error("invalid path: {0}")]
    InvalidPath(String),
    #[error("object not found: {0}")]
    ObjectNotFound(ObjectId),
    #[error("{path}: cannot represent a {kind} object as a file or directory")]
    UnsupportedObjectKind { path: String, kind: &'static str },
    #[error("{path}: no filesystem mode for stored mode '{mode}'")]
    UnsupportedModeTranslation { path: String, mode: &'static str },
    #[error("{path}: history unavailable")]
    HistoryUnavailable {
        path: String,
        #[source]
        source: Option<StoreError>,
    },
    #[error("{path}: permission denied ({op})")]
    PermissionDenied { op: &'static str, path: String },
    #[error("store error: {0}")]
    Store(#[source] StoreError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

impl ViewError {
    /// True for the "no such file or directory" case.
    pub fn is_not_exist(&self) -> bool {
        matches!(self, ViewError::NotExist(_))
    }
}

impl From<StoreError> for ViewError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ObjectNotFound(id) => ViewError::ObjectNotFound(id),
            other => ViewError::Store(other),
        }
    }
}

impl From<ViewError> for io::Error {
    fn from(err: ViewError) -> Self {
        let kind = match &err {
            ViewError::NotExist(_) => io::ErrorKind::NotFound,
            ViewError::PermissionDenied { .. } => io::ErrorKind::PermissionDenied,
            ViewError::InvalidPath(_) => io::ErrorKind::InvalidInput,
            ViewError::Io(e) => e.kind(),
            _ => io::ErrorKind::Other,
        };
        match err {
            ViewError::Io(e) => e,
            other => io::Error::new(kind, other),
        }
    }
}
