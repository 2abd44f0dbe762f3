use std::path::PathBuf;
use thiserror::Error;

use revfs_core::id::ObjectId;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not a revfs repository: {0}")]
    NotARepository(PathBuf),
    #[error("object not found: {0}")]
    ObjectNotFound(ObjectId),
    #[error("ref not found: {0}")]
    RefNotFound(String),
    #[error("revision not found: {0}")]
    RevisionNotFound(String),
    #[error("ambiguous revision '{prefix}': {count} commits match")]
    AmbiguousRevision { prefix: String, count: usize },
    #[error("object {id} is a {actual}, expected a {expected}")]
    UnexpectedObject {
        id: ObjectId,
        expected: &'static str,
        actual: &'static str,
    },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("core error: {0}")]
    Core(#[from] revfs_core::CoreError),
    #[error("config error: {0}")]
    Config(String),
}
