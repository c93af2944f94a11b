//! constants.rs
//! Stable format identifiers, wire markers and default bounds.

/// Magic number for binary documents.
/// "OBJB" = Object graph, Binary
pub const MAGIC_OBJB: [u8; 4] = *b"OBJB";

/// Current binary layout version.
pub const BINARY_VERSION: u16 = 1;

/// Tag carried in the `format` field of every text document.
pub const TEXT_FORMAT_TAG: &str = "objio";

/// Current text document version.
pub const TEXT_VERSION: u16 = 1;

/// Fixed binary header size in bytes.
pub const BINARY_HEADER_LEN: usize = 16;

/// Defaults when Option<T> is None
pub const DEFAULT_MAX_DEPTH: usize = 256;
pub const DEFAULT_MAX_NODES: usize = 1 << 20;
pub const DEFAULT_MAX_VALUES: usize = 1 << 24;
pub const DEFAULT_MAX_DOCUMENT_LEN: usize = 256 * 1024 * 1024; // 256 MiB

/// Hard ceilings, independent of configuration.
pub const MAX_DEPTH_LIMIT: usize = 64 * 1024;
pub const MAX_DOCUMENT_LEN_LIMIT: usize = u32::MAX as usize;

/// Format identifiers (mirrored in the registry).
pub mod format_ids {
    pub const TEXT: u16   = 0x0001;
    pub const BINARY: u16 = 0x0002;
}

/// Flag bitmask carried in the binary header.
pub mod flags {
    pub const HAS_CHECKSUM: u16 = 0x0001;
    pub const HAS_NODES: u16    = 0x0002;
}

/// Depth ceiling for text documents. Each payload level costs up to three
/// JSON nesting levels and the JSON reader stops at 128.
pub const TEXT_MAX_DEPTH: usize = 40;
