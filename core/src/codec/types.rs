//! codec/types.rs
//! Codec contract and format identifiers.

use num_enum::TryFromPrimitive;

use crate::config::CodecConfig;
use crate::constants::format_ids;
use crate::guard::{CloseableRead, CloseableWrite};
use crate::model::Persist;
use crate::telemetry::CounterSnapshot;
use crate::types::{ObjioError, Result};

/// Stable format identifiers.
#[repr(u16)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, TryFromPrimitive)]
pub enum Format {
    Text   = format_ids::TEXT,
    Binary = format_ids::BINARY,
}

impl Format {
    pub fn verify(raw: u16) -> Result<()> {
        match raw {
            x if x == Format::Text as u16   => Ok(()),
            x if x == Format::Binary as u16 => Ok(()),
            _ => Err(ObjioError::UnsupportedFormat { format_id: raw }),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Format::Text => "text",
            Format::Binary => "binary",
        }
    }
}

/// A reusable, format-bound encode/decode engine.
///
/// Methods take `&mut self`: one call at a time per instance. Share an
/// instance across threads behind a mutex, or give each thread its own.
///
/// Backends own the stream they are handed and `close` it once the document
/// is complete; pass a `guard` view to keep a stream alive past the call.
/// Per-call session state is reset on every exit path.
pub trait Codec {
    fn format(&self) -> Format;

    fn config(&self) -> &CodecConfig;

    /// Encode `payload` as one document appended to `out`.
    fn encode<T: Persist, S: CloseableWrite>(&mut self, payload: &T, out: S) -> Result<()>;

    /// Decode the next document from `input` and verify it describes `T`.
    fn decode<T: Persist, S: CloseableRead>(&mut self, input: S) -> Result<T>;

    fn counters(&self) -> CounterSnapshot;
}
