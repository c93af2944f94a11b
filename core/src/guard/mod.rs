//! guard/mod.rs
//! Stream ownership isolation.
//!
//! Backends treat the stream they are handed as theirs and `close` it once a
//! document is complete. Callers that own a stream hand the backend a
//! non-closing view instead, so the stream outlives the call:
//! - `NonClosingWriter`: close flushes, never closes.
//! - `NonClosingReader`: close is a no-op.
//!
//! Guards borrow the stream for one call and carry no other state; build a
//! fresh one per call.

pub mod types;
pub mod reader;
pub mod writer;

pub use types::*;
pub use reader::*;
pub use writer::*;
