//! Object container format.
//!
//! `[4B magic][1B version][1B type_tag][1B flags][1B compression][uvarint uncompressed_len][payload][4B CRC32]`
//!
//! The header alone answers "what kind of object, and how large": [`cof_peek`]
//! reads it without touching the payload.

use crate::error::CoreError;
use crate::object::TypeTag;

const MAGIC: &[u8; 4] = b"RFS1";
const COF_VERSION: u8 = 0x01;
const FIXED_HEADER_LEN: usize = 8;

/// Longest possible header: fixed part plus a 10-byte uvarint.
pub const MAX_HEADER_LEN: usize = FIXED_HEADER_LEN + 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Compression {
    None = 0x00,
    Zstd = 0x01,
}

impl Compression {
    fn from_u8(v: u8) -> Option<Self> {
        match v {
            0x00 => Some(Self::None),
            0x01 => Some(Self::Zstd),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CofFlags(u8);

impl CofFlags {
    pub fn new(compressed: bool) -> Self {
        let mut bits = 0u8;
        if compressed {
            bits |= 0x01;
        }
        Self(bits)
    }

    pub fn bits(&self) -> u8 {
        self.0
    }

    pub fn is_compressed(&self) -> bool {
        self.0 & 0x01 != 0
    }
}

/// Decoded container header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CofHeader {
    pub type_tag: TypeTag,
    pub compression: Compression,
    pub uncompressed_len: u64,
    /// Offset of the first payload byte.
    pub payload_offset: usize,
}

fn encode_uvarint(mut value: u64, buf: &mut Vec<u8>) {
    loop {
        let mut byte = (value & 0x7F) as u8;
        value >>= 7;
        if value != 0 {
            byte |= 0x80;
        }
        buf.push(byte);
        if value == 0 {
            break;
        }
    }
}

fn decode_uvarint(data: &[u8], pos: &mut usize) -> Result<u64, CoreError> {
    let mut result: u64 = 0;
    let mut shift = 0u32;
    loop {
        if *pos >= data.len() {
            return Err(CoreError::Deserialization(
                "unexpected end of uvarint".into(),
            ));
        }
        let byte = data[*pos];
        *pos += 1;
        result |= ((byte & 0x7F) as u64) << shift;
        if byte & 0x80 == 0 {
            break;
        }
        shift += 7;
        if shift >= 64 {
            return Err(CoreError::Deserialization("uvarint overflow".into()));
        }
    }
    Ok(result)
}

/// Encode a payload into the container format.
pub fn cof_encode(type_tag: TypeTag, payload: &[u8]) -> Result<Vec<u8>, CoreError> {
    let compression = if payload.len() > 64 {
        Compression::Zstd
    } else {
        Compression::None
    };

    let compressed = match compression {
        Compression::None => payload.to_vec(),
        Compression::Zstd => {
            zstd::encode_all(payload, 3).map_err(|e| CoreError::Compression(e.to_string()))?
        }
    };

    let flags = CofFlags::new(compression != Compression::None);

    let mut buf = Vec::with_capacity(MAX_HEADER_LEN + compressed.len() + 4);

    buf.extend_from_slice(MAGIC);
    buf.push(COF_VERSION);
    buf.push(type_tag as u8);
    buf.push(flags.bits());
    buf.push(compression as u8);
    encode_uvarint(payload.len() as u64, &mut buf);

    buf.extend_from_slice(&compressed);

    // CRC32 of the uncompressed payload, little endian
    let crc = crc32fast::hash(payload);
    buf.extend_from_slice(&crc.to_le_bytes());

    Ok(buf)
}

/// Parse only the header. `data` may be a prefix of the full container as
/// long as it covers the header.
pub fn cof_peek(data: &[u8]) -> Result<CofHeader, CoreError> {
    if data.len() < FIXED_HEADER_LEN + 1 {
        return Err(CoreError::Deserialization(
            "data too short for header".into(),
        ));
    }
    if &data[..4] != MAGIC {
        return Err(CoreError::InvalidMagic);
    }
    let version = data[4];
    if version != COF_VERSION {
        return Err(CoreError::UnsupportedVersion(version));
    }
    let type_tag = TypeTag::from_u8(data[5]).ok_or(CoreError::UnknownTypeTag(data[5]))?;
    let compression = Compression::from_u8(data[7])
        .ok_or_else(|| CoreError::Deserialization(format!("unknown compression: {}", data[7])))?;

    let mut pos = FIXED_HEADER_LEN;
    let uncompressed_len = decode_uvarint(data, &mut pos)?;

    Ok(CofHeader {
        type_tag,
        compression,
        uncompressed_len,
        payload_offset: pos,
    })
}

/// Decode a full container, returning (TypeTag, decompressed payload).
pub fn cof_decode(data: &[u8]) -> Result<(TypeTag, Vec<u8>), CoreError> {
    let header = cof_peek(data)?;

    if data.len() < header.payload_offset + 4 {
        return Err(CoreError::Deserialization(
            "data too short for CRC32".into(),
        ));
    }
    let crc_offset = data.len() - 4;
    let expected_crc = u32::from_le_bytes([
        data[crc_offset],
        data[crc_offset + 1],
        data[crc_offset + 2],
        data[crc_offset + 3],
    ]);

    let compressed = &data[header.payload_offset..crc_offset];

    let payload = match header.compression {
        Compression::None => compressed.to_vec(),
        Compression::Zstd => zstd::decode_all(compressed)
            .map_err(|e| CoreError::Decompression(e.to_string()))?,
    };
    if payload.len() as u64 != header.uncompressed_len {
        return Err(CoreError::Decompression(format!(
            "length mismatch: header says {}, got {}",
            header.uncompressed_len,
            payload.len()
        )));
    }

    let actual_crc = crc32fast::hash(&payload);
    if expected_crc != actual_crc {
        return Err(CoreError::Crc32Mismatch {
            expected: expected_crc,
            actual: actual_crc,
        });
    }

    Ok((header.type_tag, payload))
}
