use serde::{Deserialize, Serialize};

use crate::id::ObjectId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    pub parents: Vec<ObjectId>,
    pub tree: ObjectId,
    pub author: String,
    /// Author time, milliseconds since the unix epoch.
    pub timestamp_ms: u64,
    pub message: String,
}

impl Commit {
    pub fn first_parent(&self) -> Option<&ObjectId> {
        self.parents.first()
    }

    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }
}
