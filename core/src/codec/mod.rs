//! codec/mod.rs
//! Format backends behind one encode/decode contract.
//!
//! - Text: self-describing JSON document, tree-shaped (shared content inlined).
//! - Binary: fixed header + bincode body, identity-preserving graph.
//! - Registry resolves stable format ids to backends.

pub mod types;
pub mod session;
pub mod header;
pub mod text;
pub mod binary;
pub mod registry;

pub use types::*;
pub use session::*;
pub use header::*;
pub use text::*;
pub use binary::*;
pub use registry::*;
