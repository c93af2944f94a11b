//! codec/text.rs
//! Human-readable backend: one JSON document per call.
//!
//! ```text
//! {"format":"objio","version":1,"type":"seq<string>","nodes":[],"root":{...}}\n
//! ```
//!
//! Shared content is written in place, so identity is not preserved and a
//! cycle is an encode error. The reader accepts inline documents only: a
//! node table or a `node` reference is malformed. Each document ends with a newline; the reader
//! stops right after the closing brace, so several documents can follow one
//! another on the same stream.

use std::io;
use serde::{Deserialize, Serialize};
use serde_json::error::Category;
use tracing::debug;

use crate::codec::session::Session;
use crate::codec::types::{Codec, Format};
use crate::config::CodecConfig;
use crate::constants::{TEXT_FORMAT_TAG, TEXT_MAX_DEPTH, TEXT_VERSION};
use crate::guard::{CloseableRead, CloseableWrite};
use crate::model::{decode_document, encode_document, Document, Persist, Sharing, TypeDescriptor, Value};
use crate::telemetry::{CodecCounters, CounterSnapshot, CountingReader, Stage, StageTimes};
use crate::types::{DecodeError, EncodeError, ObjioError, Result};

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    format: &'static str,
    version: u16,
    #[serde(rename = "type")]
    descriptor: &'a TypeDescriptor,
    nodes: &'a [Value],
    root: &'a Value,
}

#[derive(Deserialize)]
struct Envelope {
    format: String,
    version: u16,
    #[serde(rename = "type")]
    descriptor: TypeDescriptor,
    #[serde(default)]
    nodes: Vec<Value>,
    root: Value,
}

impl Envelope {
    fn into_document(self) -> std::result::Result<Document, DecodeError> {
        if self.format != TEXT_FORMAT_TAG {
            return Err(DecodeError::Malformed(format!("unknown document format `{}`", self.format)));
        }
        if self.version != TEXT_VERSION {
            return Err(DecodeError::UnsupportedVersion { have: self.version });
        }
        if !self.nodes.is_empty() {
            return Err(DecodeError::Malformed(format!(
                "text documents carry no node table, found {} nodes",
                self.nodes.len()
            )));
        }
        if let Some(Value::Node(id)) = self.root.descendants().find(|v| matches!(v, Value::Node(_))) {
            return Err(DecodeError::Malformed(format!("node reference {id} in a text document")));
        }
        Ok(Document::new(self.descriptor, self.nodes, self.root))
    }
}

#[derive(Debug)]
pub struct TextCodec {
    config: CodecConfig,
    session: Session,
    counters: CodecCounters,
    times: StageTimes,
}

impl TextCodec {
    pub fn new(config: CodecConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::bounded(config))
    }

    fn bounded(mut config: CodecConfig) -> Self {
        config.max_depth = config.max_depth.min(TEXT_MAX_DEPTH);
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

impl Default for TextCodec {
    fn default() -> Self {
        Self::bounded(CodecConfig::default())
    }
}

impl Codec for TextCodec {
    fn format(&self) -> Format {
        Format::Text
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
            let _session = self.session.begin();
            read_document(&self.config, &mut self.times, input)
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
        CounterSnapshot::from(Format::Text.name(), &self.counters, self.session.resets(), &self.times)
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
        encode_document(payload, Sharing::Inline, config, encode)
    })?;
    ensure_finite(&doc)?;

    let buffer = &mut session.buffer;
    times
        .measure(Stage::Serialize, || {
            let envelope = EnvelopeRef {
                format: TEXT_FORMAT_TAG,
                version: TEXT_VERSION,
                descriptor: &doc.descriptor,
                nodes: &doc.nodes,
                root: &doc.root,
            };
            if config.pretty {
                serde_json::to_writer_pretty(&mut *buffer, &envelope)
            } else {
                serde_json::to_writer(&mut *buffer, &envelope)
            }
        })
        .map_err(|e| EncodeError::Format(e.to_string()))?;
    buffer.push(b'\n');

    let body: &[u8] = &buffer[..];
    times.measure(Stage::Write, || -> io::Result<()> {
        out.write_all(body)?;
        out.close()
    })?;

    debug!(format = "text", descriptor = %doc.descriptor, bytes = body.len(), "document written");
    Ok(body.len())
}

fn read_document<T: Persist, S: CloseableRead>(
    config: &CodecConfig,
    times: &mut StageTimes,
    mut input: S,
) -> Result<(T, usize)> {
    let (envelope, len) = times.measure(Stage::Read, || {
        let mut counted = CountingReader::new(&mut input);
        let envelope = {
            let mut de = serde_json::Deserializer::from_reader(&mut counted);
            Envelope::deserialize(&mut de)
        };
        (envelope, counted.count())
    });
    let envelope = envelope.map_err(json_read_error)?;
    input.close()?;

    let doc = envelope.into_document()?;
    let value = times.measure(Stage::Decode, || decode_document::<T>(&doc, config))?;

    debug!(format = "text", descriptor = %doc.descriptor, bytes = len, "document read");
    Ok((value, len))
}

/// JSON has no spelling for NaN or infinities; refuse instead of writing
/// `null` and failing on the way back.
fn ensure_finite(doc: &Document) -> std::result::Result<(), EncodeError> {
    let non_finite = doc
        .nodes
        .iter()
        .chain(std::iter::once(&doc.root))
        .flat_map(Value::descendants)
        .find_map(|v| match v {
            Value::Float(f) if !f.is_finite() => Some(*f),
            _ => None,
        });
    match non_finite {
        Some(f) => Err(EncodeError::Format(format!(
            "{} holds non-finite float {f}, which has no text form",
            doc.descriptor
        ))),
        None => Ok(()),
    }
}

fn json_read_error(e: serde_json::Error) -> ObjioError {
    match e.classify() {
        Category::Io => ObjioError::from_read(io::Error::from(e)),
        Category::Eof => DecodeError::Truncated(e.to_string()).into(),
        Category::Syntax | Category::Data => DecodeError::Malformed(e.to_string()).into(),
    }
}
