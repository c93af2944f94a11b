//! types.rs
//! Error taxonomy shared by every layer.
//!
//! - `EncodeError`: the payload cannot be represented in the target format.
//! - `DecodeError`: stream content is malformed, truncated or unresolvable.
//! - `ObjioError`: what the facade and the sequence contract surface to callers.
//!   `From` impls let `?` lift the layer errors.

use std::io;
use thiserror::Error;

use crate::codec::Format;
use crate::model::TypeDescriptor;
use crate::utils::{enum_name_or_hex, fmt_bytes};

/// Raised while turning a payload into a document or a document into bytes.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// A shared allocation was reached again while its own content was still
    /// being encoded, and the backend cannot express back-references.
    #[error("cyclic structure in {descriptor}")]
    Cyclic { descriptor: TypeDescriptor },

    #[error("unsupported structure: {0}")]
    Unsupported(String),

    #[error("nesting depth exceeds limit {limit}")]
    DepthExceeded { limit: usize },

    #[error("identity table exceeds limit {limit}")]
    TooManyNodes { limit: usize },

    #[error("document too large: {have} > {max}")]
    DocumentTooLarge { have: usize, max: usize },

    /// The backend serializer rejected the document (e.g. NaN in JSON).
    #[error("format error: {0}")]
    Format(String),
}

/// Raised while reading bytes into a document or a document into a payload.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("truncated document: {0}")]
    Truncated(String),

    #[error("invalid magic: {}", fmt_bytes(have))]
    InvalidMagic { have: [u8; 4] },

    #[error("unsupported document version: {have}")]
    UnsupportedVersion { have: u16 },

    #[error("checksum mismatch: expected 0x{expected:08x}, actual 0x{actual:08x}")]
    ChecksumMismatch { expected: u32, actual: u32 },

    #[error("document too large: {have} > {max}")]
    DocumentTooLarge { have: usize, max: usize },

    #[error("malformed document: {0}")]
    Malformed(String),

    #[error("unexpected value: expected {expected}, found {found}")]
    Unexpected { expected: &'static str, found: &'static str },

    #[error("missing field `{field}`")]
    MissingField { field: String },

    #[error("unknown variant `{tag}` for {descriptor}")]
    UnknownVariant { descriptor: TypeDescriptor, tag: String },

    #[error("unresolved node reference {id} (table holds {len} nodes)")]
    UnresolvedNode { id: u32, len: usize },

    #[error("node {id} closes a cycle through {descriptor}, which cannot hold one")]
    CyclicImmutable { id: u32, descriptor: TypeDescriptor },

    #[error("node {id} already materialized as a type other than {descriptor}")]
    NodeTypeConflict { id: u32, descriptor: TypeDescriptor },

    #[error("nesting depth exceeds limit {limit}")]
    DepthExceeded { limit: usize },

    #[error("identity table exceeds limit {limit}")]
    TooManyNodes { limit: usize },

    /// Node references expanded into more copied values than allowed.
    #[error("node references expand past {limit} values")]
    TooManyValues { limit: usize },

    #[error("value out of range for {target}: {value}")]
    OutOfRange { target: &'static str, value: String },
}

/// Crate-level error.
#[derive(Debug, Error)]
pub enum ObjioError {
    /// Stream transport failed (open/read/write/flush).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("encoding error: {0}")]
    Encoding(#[from] EncodeError),

    #[error("decoding error: {0}")]
    Decoding(#[from] DecodeError),

    /// The decoded document does not describe the requested type.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: TypeDescriptor, found: TypeDescriptor },

    #[error("required argument `{name}` is absent")]
    NullArgument { name: &'static str },

    #[error("index {index} out of range [0, {size})")]
    Index { index: usize, size: usize },

    #[error("iterator exhausted after {available} of {expected} values")]
    Exhausted { expected: usize, available: usize },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("unsupported format: {}", enum_name_or_hex::<Format>(*format_id))]
    UnsupportedFormat { format_id: u16 },
}

pub type Result<T> = std::result::Result<T, ObjioError>;

impl ObjioError {
    /// Classify an I/O failure met while *reading a document*: running out of
    /// bytes mid-document is a content problem, everything else is transport.
    pub(crate) fn from_read(e: io::Error) -> Self {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            ObjioError::Decoding(DecodeError::Truncated(e.to_string()))
        } else {
            ObjioError::Io(e)
        }
    }
}
