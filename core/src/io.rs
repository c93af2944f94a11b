//! io.rs
//! Caller-facing read/write facade.
//!
//! Stream forms borrow the caller's stream, wrap it in a fresh non-closing
//! guard for the call and leave it open afterwards. Path forms open a
//! buffered file scoped to the call; it is released on every exit path.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::codec::{create_codec, AnyCodec, BinaryCodec, Codec, Format, TextCodec};
use crate::config::CodecConfig;
use crate::guard::{NonClosingReader, NonClosingWriter};
use crate::model::Persist;
use crate::telemetry::CounterSnapshot;
use crate::types::Result;

/// Canonical input abstraction
pub enum InputSource<'a> {
    Reader(&'a mut dyn Read),
    File(PathBuf),
    Memory(&'a [u8]),
}

/// Canonical output abstraction
pub enum OutputSink<'a> {
    Writer(&'a mut dyn Write),
    File(PathBuf),
}

/// Reads and writes payloads through one owned codec.
///
/// Calls take `&mut self`, so an `ObjectIo` serves one call at a time. Give
/// each thread its own, or share one behind a `Mutex`.
#[derive(Debug, Default)]
pub struct ObjectIo<C: Codec> {
    codec: C,
}

impl ObjectIo<TextCodec> {
    pub fn text(config: CodecConfig) -> Result<Self> {
        Ok(Self::new(TextCodec::new(config)?))
    }
}

impl ObjectIo<BinaryCodec> {
    pub fn binary(config: CodecConfig) -> Result<Self> {
        Ok(Self::new(BinaryCodec::new(config)?))
    }
}

impl ObjectIo<AnyCodec> {
    /// Select the backend by registry id.
    pub fn for_format(format_id: u16, config: CodecConfig) -> Result<Self> {
        Ok(Self::new(create_codec(format_id, config)?))
    }
}

impl<C: Codec> ObjectIo<C> {
    pub fn new(codec: C) -> Self {
        Self { codec }
    }

    pub fn format(&self) -> Format {
        self.codec.format()
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    pub fn into_inner(self) -> C {
        self.codec
    }

    pub fn counters(&self) -> CounterSnapshot {
        self.codec.counters()
    }

    /// Append `payload` to `out` as one document. `out` stays open.
    pub fn write<T: Persist, W: Write + ?Sized>(&mut self, payload: &T, out: &mut W) -> Result<()> {
        let result = self.codec.encode(payload, NonClosingWriter::new(out));
        if let Err(e) = &result {
            warn!(format = self.format().name(), descriptor = %T::descriptor(), error = %e, "write failed");
        }
        result
    }

    /// Write `payload` to a file created (or truncated) at `path`.
    pub fn write_path<T: Persist, P: AsRef<Path>>(&mut self, payload: &T, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut out = BufWriter::new(File::create(path)?);
        self.write(payload, &mut out)?;
        out.flush()?;
        debug!(path = %path.display(), "file written");
        Ok(())
    }

    /// Decode the next document from `input` as a `T`. `input` stays open
    /// and is positioned after the document.
    pub fn read<T: Persist, R: Read + ?Sized>(&mut self, input: &mut R) -> Result<T> {
        let result = self.codec.decode(NonClosingReader::new(input));
        if let Err(e) = &result {
            warn!(format = self.format().name(), descriptor = %T::descriptor(), error = %e, "read failed");
        }
        result
    }

    /// Decode the first document of the file at `path`.
    pub fn read_path<T: Persist, P: AsRef<Path>>(&mut self, path: P) -> Result<T> {
        let path = path.as_ref();
        let mut input = BufReader::new(File::open(path)?);
        let value = self.read(&mut input)?;
        debug!(path = %path.display(), "file read");
        Ok(value)
    }

    pub fn write_to<T: Persist>(&mut self, payload: &T, sink: OutputSink<'_>) -> Result<()> {
        match sink {
            OutputSink::Writer(w) => self.write(payload, w),
            OutputSink::File(p) => self.write_path(payload, p),
        }
    }

    pub fn read_from<T: Persist>(&mut self, src: InputSource<'_>) -> Result<T> {
        match src {
            InputSource::Reader(r) => self.read(r),
            InputSource::File(p) => self.read_path(p),
            InputSource::Memory(mut bytes) => self.read(&mut bytes),
        }
    }

    /// Encode `payload` into a fresh buffer.
    pub fn to_bytes<T: Persist>(&mut self, payload: &T) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.write(payload, &mut out)?;
        Ok(out)
    }

    /// Decode the first document in `bytes`.
    pub fn from_bytes<T: Persist>(&mut self, bytes: &[u8]) -> Result<T> {
        self.read_from(InputSource::Memory(bytes))
    }
}
