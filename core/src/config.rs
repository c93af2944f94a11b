//! config.rs
//! Per-codec limits and output options.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_MAX_DEPTH, DEFAULT_MAX_DOCUMENT_LEN, DEFAULT_MAX_NODES, DEFAULT_MAX_VALUES,
    MAX_DEPTH_LIMIT, MAX_DOCUMENT_LEN_LIMIT,
};
use crate::types::{ObjioError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Maximum nesting depth of a payload, on both encode and decode.
    pub max_depth: usize,

    /// Maximum number of shared nodes in one document's identity table.
    pub max_nodes: usize,

    /// Maximum number of values copied out of the node table while reading
    /// one document. A node read through a non-shared type is copied each
    /// time it is referenced; this bounds the total.
    pub max_values: usize,

    /// Maximum binary body length accepted or produced.
    pub max_document_len: usize,

    /// Indent text documents. Ignored by the binary backend.
    pub pretty: bool,

    /// Verify the CRC32 of binary bodies on read. Writers always emit it.
    pub verify_checksum: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_nodes: DEFAULT_MAX_NODES,
            max_values: DEFAULT_MAX_VALUES,
            max_document_len: DEFAULT_MAX_DOCUMENT_LEN,
            pretty: false,
            verify_checksum: true,
        }
    }
}

impl CodecConfig {
    pub fn new(
        max_depth: Option<usize>,
        max_nodes: Option<usize>,
        max_document_len: Option<usize>,
    ) -> Self {
        Self {
            max_depth: max_depth.unwrap_or(DEFAULT_MAX_DEPTH),
            max_nodes: max_nodes.unwrap_or(DEFAULT_MAX_NODES),
            max_document_len: max_document_len.unwrap_or(DEFAULT_MAX_DOCUMENT_LEN),
            ..Self::default()
        }
    }

    pub fn pretty() -> Self {
        Self { pretty: true, ..Self::default() }
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_depth == 0 || self.max_depth > MAX_DEPTH_LIMIT {
            return Err(ObjioError::Config(format!(
                "max_depth must be in 1..={MAX_DEPTH_LIMIT}, got {}",
                self.max_depth
            )));
        }
        if self.max_nodes == 0 || self.max_nodes > u32::MAX as usize {
            return Err(ObjioError::Config(format!(
                "max_nodes must be in 1..={}, got {}",
                u32::MAX,
                self.max_nodes
            )));
        }
        if self.max_values == 0 {
            return Err(ObjioError::Config("max_values must be at least 1".into()));
        }
        if self.max_document_len == 0 || self.max_document_len > MAX_DOCUMENT_LEN_LIMIT {
            return Err(ObjioError::Config(format!(
                "max_document_len must be in 1..={MAX_DOCUMENT_LEN_LIMIT}, got {}",
                self.max_document_len
            )));
        }
        Ok(())
    }
}
