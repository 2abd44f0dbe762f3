use serde::{Deserialize, Serialize};

use crate::types::*;
use crate::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum TypeTag {
    Blob = 0x01,
    Tree = 0x02,
    Commit = 0x03,
}

impl TypeTag {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0x01 => Some(Self::Blob),
            0x02 => Some(Self::Tree),
            0x03 => Some(Self::Commit),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Blob => "blob",
            Self::Tree => "tree",
            Self::Commit => "commit",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Object {
    Blob(Blob),
    Tree(Tree),
    Commit(Commit),
}

impl Object {
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Object::Blob(_) => TypeTag::Blob,
            Object::Tree(_) => TypeTag::Tree,
            Object::Commit(_) => TypeTag::Commit,
        }
    }

    /// Blobs serialize to their raw bytes; trees and commits to JSON.
    pub fn serialize_payload(&self) -> Result<Vec<u8>, CoreError> {
        match self {
            Object::Blob(blob) => Ok(blob.data.clone()),
            Object::Tree(tree) => {
                serde_json::to_vec(tree).map_err(|e| CoreError::Serialization(e.to_string()))
            }
            Object::Commit(commit) => {
                serde_json::to_vec(commit).map_err(|e| CoreError::Serialization(e.to_string()))
            }
        }
    }

    pub fn deserialize_payload(type_tag: TypeTag, data: &[u8]) -> Result<Self, CoreError> {
        match type_tag {
            TypeTag::Blob => Ok(Object::Blob(Blob::new(data))),
            TypeTag::Tree => serde_json::from_slice(data)
                .map(Object::Tree)
                .map_err(|e| CoreError::Deserialization(e.to_string())),
            TypeTag::Commit => serde_json::from_slice(data)
                .map(Object::Commit)
                .map_err(|e| CoreError::Deserialization(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::ObjectId;

    #[test]
    fn blob_payload_is_raw_bytes() {
        let obj = Object::Blob(Blob::new(b"plain bytes".to_vec()));
        assert_eq!(obj.serialize_payload().unwrap(), b"plain bytes");
    }

    #[test]
    fn commit_payload_decodes() {
        let commit = Commit {
            parents: vec![ObjectId::from_bytes([2; 32])],
            tree: ObjectId::from_bytes([3; 32]),
            author: "alice".to_string(),
            timestamp_ms: 1_700_000_000_000,
            message: "init".to_string(),
        };
        let payload = Object::Commit(commit.clone()).serialize_payload().unwrap();
        let decoded = Object::deserialize_payload(TypeTag::Commit, &payload).unwrap();
        assert_eq!(decoded, Object::Commit(commit));
    }

    #[test]
    fn garbage_tree_payload_is_an_error() {
        let err = Object::deserialize_payload(TypeTag::Tree, b"not json").unwrap_err();
        assert!(matches!(err, CoreError::Deserialization(_)));
    }

    #[test]
    fn type_tag_bytes() {
        for tag in [TypeTag::Blob, TypeTag::Tree, TypeTag::Commit] {
            assert_eq!(TypeTag::from_u8(tag as u8), Some(tag));
        }
        assert_eq!(TypeTag::from_u8(0x7f), None);
    }
}
