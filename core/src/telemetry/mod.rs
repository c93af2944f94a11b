//! telemetry/mod.rs
//! Per-codec counters, stage timings and immutable snapshots.
//!
//! Counters are owned by a codec instance and only touched by the active
//! call; `Codec::counters` copies them out as a `CounterSnapshot`.

pub mod counters;
pub mod timers;
pub mod snapshot;

pub use counters::*;
pub use timers::*;
pub use snapshot::*;
