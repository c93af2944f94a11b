//! codec/session.rs
//! Per-instance scratch state and its unconditional reset.

use std::ops::{Deref, DerefMut};
use tracing::trace;

use crate::model::EncodeState;

/// Scratch buffers larger than this are released on reset instead of kept.
const RETAIN_BUFFER_CAP: usize = 1024 * 1024;

#[derive(Debug, Default)]
pub struct Session {
    pub buffer: Vec<u8>,
    pub encode: EncodeState,
    resets: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a call scope. The session resets when the scope ends, whatever
    /// the outcome.
    pub fn begin(&mut self) -> SessionScope<'_> {
        SessionScope { session: self }
    }

    pub fn is_clean(&self) -> bool {
        self.buffer.is_empty() && self.encode.is_clean()
    }

    pub fn resets(&self) -> u64 {
        self.resets
    }

    fn reset(&mut self) {
        self.buffer.clear();
        if self.buffer.capacity() > RETAIN_BUFFER_CAP {
            self.buffer = Vec::new();
        }
        self.encode.reset();
        self.resets += 1;
        trace!(resets = self.resets, "codec session reset");
    }
}

/// Drop guard returned by [`Session::begin`].
pub struct SessionScope<'a> {
    session: &'a mut Session,
}

impl Deref for SessionScope<'_> {
    type Target = Session;

    fn deref(&self) -> &Session {
        self.session
    }
}

impl DerefMut for SessionScope<'_> {
    fn deref_mut(&mut self) -> &mut Session {
        self.session
    }
}

impl Drop for SessionScope<'_> {
    fn drop(&mut self) {
        self.session.reset();
    }
}
