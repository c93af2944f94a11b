//! codec/header.rs
//! Fixed 16-byte little-endian header that frames every binary document.
//!
//! ```text
//! 0..4   magic     "OBJB"
//! 4..6   version   u16
//! 6..8   flags     u16 (DocumentFlags)
//! 8..12  body_len  u32
//! 12..16 crc32     u32 over the body (0 when HAS_CHECKSUM is clear)
//! ```

use bitflags::bitflags;
use byteorder::{ByteOrder, LittleEndian};

use crate::constants::{flags, BINARY_HEADER_LEN, BINARY_VERSION, MAGIC_OBJB};
use crate::types::DecodeError;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DocumentFlags: u16 {
        const HAS_CHECKSUM = flags::HAS_CHECKSUM;
        /// The document carries a non-empty identity table.
        const HAS_NODES    = flags::HAS_NODES;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentHeader {
    pub magic: [u8; 4],
    pub version: u16,
    pub flags: DocumentFlags,
    pub body_len: u32,
    pub crc32: u32,
}

impl DocumentHeader {
    pub const LEN: usize = BINARY_HEADER_LEN;

    pub fn new(flags: DocumentFlags, body_len: u32, crc32: u32) -> Self {
        Self { magic: MAGIC_OBJB, version: BINARY_VERSION, flags, body_len, crc32 }
    }
}

#[inline]
pub fn encode_header_le(h: &DocumentHeader) -> [u8; BINARY_HEADER_LEN] {
    let mut out = [0u8; BINARY_HEADER_LEN];
    out[0..4].copy_from_slice(&h.magic);
    LittleEndian::write_u16(&mut out[4..6], h.version);
    LittleEndian::write_u16(&mut out[6..8], h.flags.bits());
    LittleEndian::write_u32(&mut out[8..12], h.body_len);
    LittleEndian::write_u32(&mut out[12..16], h.crc32);
    out
}

/// Parse and validate a header. Body length limits are the caller's concern.
#[inline]
pub fn decode_header_le(buf: &[u8; BINARY_HEADER_LEN]) -> Result<DocumentHeader, DecodeError> {
    let mut magic = [0u8; 4];
    magic.copy_from_slice(&buf[0..4]);
    if magic != MAGIC_OBJB {
        return Err(DecodeError::InvalidMagic { have: magic });
    }

    let version = LittleEndian::read_u16(&buf[4..6]);
    if version != BINARY_VERSION {
        return Err(DecodeError::UnsupportedVersion { have: version });
    }

    let raw_flags = LittleEndian::read_u16(&buf[6..8]);
    let flags = DocumentFlags::from_bits(raw_flags)
        .ok_or_else(|| DecodeError::Malformed(format!("unknown header flags 0x{raw_flags:04x}")))?;

    Ok(DocumentHeader {
        magic,
        version,
        flags,
        body_len: LittleEndian::read_u32(&buf[8..12]),
        crc32: LittleEndian::read_u32(&buf[12..16]),
    })
}
