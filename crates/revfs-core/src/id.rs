use data_encoding::BASE32_NOPAD;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::CoreError;

const OBJECT_ID_PREFIX: &str = "rfs_";

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId([u8; 32]);

impl ObjectId {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Abbreviated hex form used in listings and logs.
    pub fn short_hex(&self) -> String {
        hex::encode(&self.0[..6])
    }

    pub fn from_hex(s: &str) -> Result<Self, CoreError> {
        let bytes = hex::decode(s).map_err(|e| CoreError::InvalidObjectId(e.to_string()))?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| CoreError::InvalidObjectId("expected 32 bytes".into()))?;
        Ok(Self(arr))
    }

    pub fn from_display(s: &str) -> Result<Self, CoreError> {
        let encoded = s.strip_prefix(OBJECT_ID_PREFIX).ok_or_else(|| {
            CoreError::InvalidObjectId(format!("missing prefix '{OBJECT_ID_PREFIX}'"))
        })?;
        let upper = encoded.to_uppercase();
        let bytes = BASE32_NOPAD
            .decode(upper.as_bytes())
            .map_err(|e| CoreError::InvalidObjectId(e.to_string()))?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| CoreError::InvalidObjectId("expected 32 bytes".into()))?;
        Ok(Self(arr))
    }

    /// First 2 hex chars used for loose object directory sharding
    pub fn shard_prefix(&self) -> String {
        hex::encode(&self.0[..1])
    }

    /// Remaining hex chars for the loose object filename
    pub fn shard_suffix(&self) -> String {
        hex::encode(&self.0[1..])
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let encoded = BASE32_NOPAD.encode(&self.0).to_lowercase();
        write!(f, "{OBJECT_ID_PREFIX}{encoded}")
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.short_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_roundtrip() {
        let id = ObjectId::from_bytes([7u8; 32]);
        assert_eq!(ObjectId::from_hex(&id.to_hex()).unwrap(), id);
    }

    #[test]
    fn display_roundtrip() {
        let mut bytes = [0u8; 32];
        for (i, b) in bytes.iter_mut().enumerate() {
            *b = i as u8 * 9;
        }
        let id = ObjectId::from_bytes(bytes);
        let shown = id.to_string();
        assert!(shown.starts_with("rfs_"));
        assert_eq!(ObjectId::from_display(&shown).unwrap(), id);
    }

    #[test]
    fn short_hex_is_prefix_of_full_hex() {
        let id = ObjectId::from_bytes([0xab; 32]);
        assert_eq!(id.short_hex().len(), 12);
        assert!(id.to_hex().starts_with(&id.short_hex()));
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(matches!(
            ObjectId::from_hex("abcd"),
            Err(CoreError::InvalidObjectId(_))
        ));
        assert!(ObjectId::from_display("xyz_aaaa").is_err());
    }

    #[test]
    fn shard_parts_rebuild_hex() {
        let id = ObjectId::from_bytes([0x5c; 32]);
        assert_eq!(format!("{}{}", id.shard_prefix(), id.shard_suffix()), id.to_hex());
    }
}
