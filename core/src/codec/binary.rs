//! codec/binary.rs
//! Compact backend: fixed header followed by a bincode body.
//!
//! The body is the serialized `Document`, node table included, so shared
//! allocations keep their identity and cycles through `Rc<RefCell<_>>`
//! round-trip. The header carries the body length, so a reader consumes
//! exactly one document and leaves the stream positioned at the next.

use std::io::{self, Read};
use tracing::debug;

use crate::codec::header::{decode_header_le, encode_header_le, DocumentFlags, DocumentHeader};
use crate::codec::session::Session;
use crate::codec::types::{Codec, Format};
use crate::config::CodecConfig;
use crate::constants::BINARY_HEADER_LEN;
use crate::guard::{CloseableRead, CloseableWrite};
use crate::model::{decode_document, encode_document, DepthBudget, Persist, Sharing};
use crate::telemetry::{CodecCounters, CounterSnapshot, Stage, StageTimes};
use crate::types::{DecodeError, EncodeError, ObjioError, Result};
use crate::utils::compute_checksum;

#[derive(Debug)]
pub struct BinaryCodec {
    config: CodecConfig,
    session: Session,
    counters: CodecCounters,
    times: StageTimes,
}

impl BinaryCodec {
    pub fn new(config: CodecConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_config(config))
    }

    fn with_config(config: CodecConfig) -> Self {
        Self {
            config,
            session: Session::new(),
            counters: CodecCounters::default(),
            times: StageTimes::default(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }
}

impl Default for BinaryCodec {
    fn default() -> Self {
        Self::with_config(CodecConfig::default())
    }
}

impl Codec for BinaryCodec {
    fn format(&self) -> Format {
        Format::Binary
    }

    fn config(&self) -> &CodecConfig {
        &self.config
    }

    fn encode<T: Persist, S: CloseableWrite>(&mut self, payload: &T, out: S) -> Result<()> {
        let result = {
            let mut session = self.session.begin();
            write_document(&self.config, &mut session, &mut self.times, payload, out)
        };
        match result {
            Ok(len) => {
                self.counters.add_write(len);
                Ok(())
            }
            Err(e) => {
                self.counters.add_failed_write();
                Err(e)
            }
        }
    }

    fn decode<T: Persist, S: CloseableRead>(&mut self, input: S) -> Result<T> {
        let result = {
            let mut session = self.session.begin();
            read_document(&self.config, &mut session, &mut self.times, input)
        };
        match result {
            Ok((value, len)) => {
                self.counters.add_read(len);
                Ok(value)
            }
            Err(e) => {
                self.counters.add_failed_read();
                Err(e)
            }
        }
    }

    fn counters(&self) -> CounterSnapshot {
        CounterSnapshot::from(Format::Binary.name(), &self.counters, self.session.resets(), &self.times)
    }
}

fn write_document<T: Persist, S: CloseableWrite>(
    config: &CodecConfig,
    session: &mut Session,
    times: &mut StageTimes,
    payload: &T,
    mut out: S,
) -> Result<usize> {
    let encode = &mut session.encode;
    let doc = times.measure(Stage::Encode, || {
        encode_document(payload, Sharing::Identity, config, encode)
    })?;

    let buffer = &mut session.buffer;
    times
        .measure(Stage::Serialize, || {
            bincode::serde::encode_into_std_write(&doc, &mut *buffer, bincode::config::standard())
        })
        .map_err(|e| EncodeError::Format(e.to_string()))?;

    let body_len = buffer.len();
    if body_len > config.max_document_len {
        return Err(EncodeError::DocumentTooLarge { have: body_len, max: config.max_document_len }.into());
    }
    let wire_len = u32::try_from(body_len)
        .map_err(|_| EncodeError::DocumentTooLarge { have: body_len, max: u32::MAX as usize })?;

    let mut flags = DocumentFlags::HAS_CHECKSUM;
    if doc.has_nodes() {
        flags |= DocumentFlags::HAS_NODES;
    }
    let header = DocumentHeader::new(flags, wire_len, compute_checksum(&buffer[..]));
    let header_bytes = encode_header_le(&header);

    let body: &[u8] = &buffer[..];
    times.measure(Stage::Write, || -> io::Result<()> {
        out.write_all(&header_bytes)?;
        out.write_all(body)?;
        out.close()
    })?;

    debug!(
        format = "binary",
        descriptor = %doc.descriptor,
        nodes = doc.nodes.len(),
        bytes = BINARY_HEADER_LEN + body_len,
        "document written"
    );
    Ok(BINARY_HEADER_LEN + body_len)
}

fn read_document<T: Persist, S: CloseableRead>(
    config: &CodecConfig,
    session: &mut Session,
    times: &mut StageTimes,
    mut input: S,
) -> Result<(T, usize)> {
    let mut header_buf = [0u8; BINARY_HEADER_LEN];
    times
        .measure(Stage::Read, || input.read_exact(&mut header_buf))
        .map_err(ObjioError::from_read)?;
    let header = decode_header_le(&header_buf)?;

    let body_len = header.body_len as usize;
    if body_len > config.max_document_len {
        return Err(DecodeError::DocumentTooLarge { have: body_len, max: config.max_document_len }.into());
    }

    // Grow with the bytes that arrive, not with the declared length.
    let buffer = &mut session.buffer;
    buffer.clear();
    let received = times
        .measure(Stage::Read, || input.by_ref().take(body_len as u64).read_to_end(&mut *buffer))
        .map_err(ObjioError::from_read)?;
    if received != body_len {
        return Err(DecodeError::Truncated(format!(
            "body holds {received} of {body_len} declared bytes"
        ))
        .into());
    }
    input.close()?;

    if config.verify_checksum && header.flags.contains(DocumentFlags::HAS_CHECKSUM) {
        let actual = compute_checksum(&buffer[..]);
        if actual != header.crc32 {
            return Err(DecodeError::ChecksumMismatch { expected: header.crc32, actual }.into());
        }
    }

    let body: &[u8] = &buffer[..];
    let budget = DepthBudget::new(config.max_depth);
    let (doc, consumed) = times
        .measure(Stage::Deserialize, || {
            bincode::serde::seed_decode_from_slice(budget.document(), body, bincode::config::standard())
        })
        .map_err(|e| {
            if budget.exceeded() {
                DecodeError::DepthExceeded { limit: budget.max_depth() }
            } else {
                DecodeError::Malformed(e.to_string())
            }
        })?;
    if consumed != body_len {
        return Err(DecodeError::Malformed(format!(
            "{} trailing bytes after document body",
            body_len - consumed
        ))
        .into());
    }
    if header.flags.contains(DocumentFlags::HAS_NODES) != doc.has_nodes() {
        return Err(DecodeError::Malformed("node table disagrees with header flags".into()).into());
    }

    let value = times.measure(Stage::Decode, || decode_document::<T>(&doc, config))?;

    debug!(
        format = "binary",
        descriptor = %doc.descriptor,
        nodes = doc.nodes.len(),
        bytes = BINARY_HEADER_LEN + body_len,
        "document read"
    );
    Ok((value, BINARY_HEADER_LEN + body_len))
}
