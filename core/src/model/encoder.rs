//! model/encoder.rs
//! Payload -> `Document` traversal with identity tracking and depth bounds.

use std::collections::{HashMap, HashSet};

use crate::config::CodecConfig;
use crate::model::persist::Persist;
use crate::model::value::{Document, Field, TypeDescriptor, Value};
use crate::types::EncodeError;

/// How shared allocations (`Arc`, `Rc<RefCell<_>>`) are written.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Sharing {
    /// Register each allocation once and emit `Value::Node` for every later
    /// occurrence. Preserves identity and cycles.
    Identity,
    /// Write shared content in place every time it is met. Meeting an
    /// allocation inside its own content is a cycle and fails.
    Inline,
}

/// Per-call encoder tables, owned by a codec session and reset after every
/// call. Keys are allocation addresses, valid only while the payload is
/// borrowed by the call.
#[derive(Debug, Default)]
pub struct EncodeState {
    nodes: Vec<Option<Value>>,
    index: HashMap<usize, u32>,
    in_progress: HashSet<usize>,
}

impl EncodeState {
    pub fn reset(&mut self) {
        self.nodes.clear();
        self.index.clear();
        self.in_progress.clear();
    }

    pub fn is_clean(&self) -> bool {
        self.nodes.is_empty() && self.index.is_empty() && self.in_progress.is_empty()
    }
}

pub struct Encoder<'s> {
    sharing: Sharing,
    max_depth: usize,
    max_nodes: usize,
    depth: usize,
    state: &'s mut EncodeState,
}

impl<'s> Encoder<'s> {
    pub fn new(sharing: Sharing, config: &CodecConfig, state: &'s mut EncodeState) -> Self {
        Self {
            sharing,
            max_depth: config.max_depth,
            max_nodes: config.max_nodes,
            depth: 0,
            state,
        }
    }

    pub fn sharing(&self) -> Sharing {
        self.sharing
    }

    /// Encode a nested value, one level deeper.
    pub fn encode<T: Persist>(&mut self, value: &T) -> Result<Value, EncodeError> {
        if self.depth >= self.max_depth {
            return Err(EncodeError::DepthExceeded { limit: self.max_depth });
        }
        self.depth += 1;
        let result = value.encode(self);
        self.depth -= 1;
        result
    }

    pub fn record(&mut self) -> RecordEncoder<'_, 's> {
        RecordEncoder { enc: self, fields: Vec::new() }
    }

    pub fn variant<T: Persist>(&mut self, tag: &str, value: &T) -> Result<Value, EncodeError> {
        let value = self.encode(value)?;
        Ok(Value::Variant { tag: tag.to_string(), value: Box::new(value) })
    }

    pub fn unit_variant(&self, tag: &str) -> Value {
        Value::Variant { tag: tag.to_string(), value: Box::new(Value::Unit) }
    }

    /// Encode the content of a shared allocation found at `addr`.
    ///
    /// `content` produces the allocation's value; it runs at most once per
    /// allocation in `Sharing::Identity` mode.
    pub fn shared<F>(
        &mut self,
        addr: usize,
        descriptor: TypeDescriptor,
        content: F,
    ) -> Result<Value, EncodeError>
    where
        F: FnOnce(&mut Self) -> Result<Value, EncodeError>,
    {
        match self.sharing {
            Sharing::Identity => {
                if let Some(&id) = self.state.index.get(&addr) {
                    return Ok(Value::Node(id));
                }
                if self.state.nodes.len() >= self.max_nodes {
                    return Err(EncodeError::TooManyNodes { limit: self.max_nodes });
                }
                // Register before descending so cycles resolve to this id.
                let id = self.state.nodes.len() as u32;
                self.state.nodes.push(None);
                self.state.index.insert(addr, id);

                let value = content(self)?;
                self.state.nodes[id as usize] = Some(value);
                Ok(Value::Node(id))
            }
            Sharing::Inline => {
                if !self.state.in_progress.insert(addr) {
                    return Err(EncodeError::Cyclic { descriptor });
                }
                let result = content(self);
                self.state.in_progress.remove(&addr);
                result
            }
        }
    }

    /// Close the traversal and move the node table into a document.
    fn finish(self, descriptor: TypeDescriptor, root: Value) -> Result<Document, EncodeError> {
        let nodes = self
            .state
            .nodes
            .drain(..)
            .enumerate()
            .map(|(id, node)| {
                node.ok_or_else(|| {
                    EncodeError::Unsupported(format!("shared node {id} left incomplete"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Document::new(descriptor, nodes, root))
    }
}

/// Builder for `Value::Record`.
pub struct RecordEncoder<'e, 's> {
    enc: &'e mut Encoder<'s>,
    fields: Vec<Field>,
}

impl<'e, 's> RecordEncoder<'e, 's> {
    pub fn field<T: Persist>(mut self, name: &str, value: &T) -> Result<Self, EncodeError> {
        let value = self.enc.encode(value)?;
        self.fields.push(Field { name: name.to_string(), value });
        Ok(self)
    }

    pub fn finish(self) -> Value {
        Value::Record(self.fields)
    }
}

/// Build the document for `payload`.
pub fn encode_document<T: Persist>(
    payload: &T,
    sharing: Sharing,
    config: &CodecConfig,
    state: &mut EncodeState,
) -> Result<Document, EncodeError> {
    let mut enc = Encoder::new(sharing, config, state);
    let root = enc.encode(payload)?;
    enc.finish(T::descriptor(), root)
}
