//! model/mod.rs
//! Backend-neutral object model.
//!
//! Payload types opt in through `Persist` and describe themselves as a
//! `Value` tree. Both backends serialize the same `Document`, so the
//! encode/decode capability is checked at compile time instead of being
//! discovered by introspection.

pub mod value;
pub mod persist;
pub mod encoder;
pub mod decoder;
pub mod shared;
pub mod record;
pub mod bounded;

pub use value::*;
pub use persist::*;
pub use encoder::*;
pub use decoder::*;
pub use bounded::{DepthBudget, DocumentSeed};
