use crate::id::ObjectId;
use crate::object::TypeTag;

/// Domain-separated BLAKE3 hash: "revfs\0" || type_tag || version || payload
pub fn content_hash(type_tag: TypeTag, payload: &[u8]) -> ObjectId {
    let mut hasher = blake3::Hasher::new();
    hasher.update(b"revfs\0");
    hasher.update(&[type_tag as u8]);
    hasher.update(&[1u8]); // version
    hasher.update(payload);
    let hash = hasher.finalize();
    ObjectId::from_bytes(*hash.as_bytes())
}
