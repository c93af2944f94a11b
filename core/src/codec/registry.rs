//! codec/registry.rs
//! Format registry and factory functions.

use crate::codec::binary::BinaryCodec;
use crate::codec::text::TextCodec;
use crate::codec::types::{Codec, Format};
use crate::config::CodecConfig;
use crate::constants::{format_ids, MAGIC_OBJB};
use crate::guard::{CloseableRead, CloseableWrite};
use crate::model::Persist;
use crate::telemetry::CounterSnapshot;
use crate::types::{ObjioError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatInfo {
    pub format: Format,
    pub name: &'static str,
    /// Shared allocations decode to one allocation.
    pub preserves_identity: bool,
    pub supports_cycles: bool,
    pub human_readable: bool,
}

pub fn resolve(format_id: u16) -> Result<FormatInfo> {
    match format_id {
        x if x == format_ids::TEXT => Ok(FormatInfo {
            format: Format::Text,
            name: "text",
            preserves_identity: false,
            supports_cycles: false,
            human_readable: true,
        }),
        x if x == format_ids::BINARY => Ok(FormatInfo {
            format: Format::Binary,
            name: "binary",
            preserves_identity: true,
            supports_cycles: true,
            human_readable: false,
        }),
        other => Err(ObjioError::UnsupportedFormat { format_id: other }),
    }
}

pub fn create_codec(format_id: u16, config: CodecConfig) -> Result<AnyCodec> {
    match format_id {
        x if x == format_ids::TEXT => TextCodec::new(config).map(AnyCodec::Text),
        x if x == format_ids::BINARY => BinaryCodec::new(config).map(AnyCodec::Binary),
        other => Err(ObjioError::UnsupportedFormat { format_id: other }),
    }
}

/// Guess the format of a stream from its first bytes.
pub fn detect_format(prefix: &[u8]) -> Option<Format> {
    if prefix.starts_with(&MAGIC_OBJB) {
        return Some(Format::Binary);
    }
    match prefix.iter().find(|b| !b.is_ascii_whitespace()) {
        Some(b'{') => Some(Format::Text),
        _ => None,
    }
}

/// Codec chosen at runtime.
#[derive(Debug)]
pub enum AnyCodec {
    Text(TextCodec),
    Binary(BinaryCodec),
}

impl From<TextCodec> for AnyCodec {
    fn from(codec: TextCodec) -> Self {
        AnyCodec::Text(codec)
    }
}

impl From<BinaryCodec> for AnyCodec {
    fn from(codec: BinaryCodec) -> Self {
        AnyCodec::Binary(codec)
    }
}

impl Codec for AnyCodec {
    fn format(&self) -> Format {
        match self {
            AnyCodec::Text(c) => c.format(),
            AnyCodec::Binary(c) => c.format(),
        }
    }

    fn config(&self) -> &CodecConfig {
        match self {
            AnyCodec::Text(c) => c.config(),
            AnyCodec::Binary(c) => c.config(),
        }
    }

    fn encode<T: Persist, S: CloseableWrite>(&mut self, payload: &T, out: S) -> Result<()> {
        match self {
            AnyCodec::Text(c) => c.encode(payload, out),
            AnyCodec::Binary(c) => c.encode(payload, out),
        }
    }

    fn decode<T: Persist, S: CloseableRead>(&mut self, input: S) -> Result<T> {
        match self {
            AnyCodec::Text(c) => c.decode(input),
            AnyCodec::Binary(c) => c.decode(input),
        }
    }

    fn counters(&self) -> CounterSnapshot {
        match self {
            AnyCodec::Text(c) => c.counters(),
            AnyCodec::Binary(c) => c.counters(),
        }
    }
}
