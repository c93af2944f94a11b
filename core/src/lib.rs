//! objio
//!
//! Object-graph persistence over caller-owned byte streams.
//! Two backends: a self-describing text format and a compact,
//! identity-preserving binary format.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;
pub mod utils;
pub mod config;

// Object model and backends
pub mod model;
pub mod guard;
pub mod codec;
pub mod telemetry;

// Caller-facing
pub mod io;
pub mod seq;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::codec::{create_codec, detect_format, AnyCodec, BinaryCodec, Codec, Format, TextCodec};
    pub use crate::config::CodecConfig;
    pub use crate::guard::{CloseableRead, CloseableWrite, NonClosingReader, NonClosingWriter};
    pub use crate::io::{InputSource, ObjectIo, OutputSink};
    pub use crate::model::{Decoder, Encoder, Persist, TypeDescriptor, Value};
    pub use crate::seq::{ISeq, MSeq, Seq};
    pub use crate::types::{DecodeError, EncodeError, ObjioError, Result};
}
