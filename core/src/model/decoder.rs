//! model/decoder.rs
//! `Document` -> payload materialization.
//!
//! Shared handles are cached per node id so every `Value::Node(id)` resolves
//! to the same allocation. The cache lives for one call only.
//!
//! Every time a node's content is taken from the table, shared or copied,
//! its size is charged against a per-call value budget. A small table whose
//! nodes reference each other many times cannot expand past that budget.

use std::any::Any;
use std::cell::Cell;
use std::collections::{HashMap, HashSet};

use crate::config::CodecConfig;
use crate::model::persist::Persist;
use crate::model::value::{Document, Field, TypeDescriptor, Value};
use crate::types::{DecodeError, ObjioError};

#[derive(Default)]
struct DecodeState {
    shared: HashMap<u32, Box<dyn Any>>,
    pending: HashSet<u32>,
}

pub struct Decoder<'d> {
    nodes: &'d [Value],
    node_sizes: Vec<usize>,
    values_limit: usize,
    values_left: Cell<usize>,
    max_depth: usize,
    depth: usize,
    state: DecodeState,
}

impl<'d> Decoder<'d> {
    pub fn new(nodes: &'d [Value], config: &CodecConfig) -> Self {
        let node_sizes: Vec<usize> = nodes.iter().map(|n| n.descendants().count()).collect();
        // A table read once per node always fits.
        let values_limit = config.max_values.max(node_sizes.iter().sum());
        Self {
            nodes,
            node_sizes,
            values_limit,
            values_left: Cell::new(values_limit),
            max_depth: config.max_depth,
            depth: 0,
            state: DecodeState::default(),
        }
    }

    /// Decode a nested value, one level deeper.
    pub fn decode<T: Persist>(&mut self, value: &'d Value) -> Result<T, DecodeError> {
        if self.depth >= self.max_depth {
            return Err(DecodeError::DepthExceeded { limit: self.max_depth });
        }
        self.depth += 1;
        let result = T::decode(value, self);
        self.depth -= 1;
        result
    }

    /// Follow node references until a content value is reached. Non-shared
    /// types use this to read a copy of shared content.
    pub fn resolve(&self, value: &'d Value) -> Result<&'d Value, DecodeError> {
        let nodes = self.nodes;
        let mut current = value;
        let mut hops = 0usize;
        while let Value::Node(id) = current {
            current = nodes
                .get(*id as usize)
                .ok_or(DecodeError::UnresolvedNode { id: *id, len: nodes.len() })?;
            self.charge(*id)?;
            hops += 1;
            if hops > nodes.len() {
                return Err(DecodeError::Malformed(format!("reference loop at node {id}")));
            }
        }
        Ok(current)
    }

    pub fn record(&self, value: &'d Value) -> Result<Fields<'d>, DecodeError> {
        match self.resolve(value)? {
            Value::Record(fields) => Ok(Fields { fields }),
            other => Err(unexpected("record", other)),
        }
    }

    pub fn field<T: Persist>(&mut self, fields: &Fields<'d>, name: &str) -> Result<T, DecodeError> {
        self.decode(fields.require(name)?)
    }

    /// Decode a field that may be missing from older documents.
    pub fn field_or_default<T: Persist + Default>(
        &mut self,
        fields: &Fields<'d>,
        name: &str,
    ) -> Result<T, DecodeError> {
        match fields.get(name) {
            Some(value) => self.decode(value),
            None => Ok(T::default()),
        }
    }

    /// Split a `Value::Variant` into its tag and payload.
    pub fn variant(&self, value: &'d Value) -> Result<(&'d str, &'d Value), DecodeError> {
        match self.resolve(value)? {
            Value::Variant { tag, value } => Ok((tag.as_str(), value.as_ref())),
            other => Err(unexpected("variant", other)),
        }
    }

    /// Materialize a shared handle that cannot be observed before its content
    /// is complete (`Arc<T>`). A cycle back into it is an error.
    pub fn shared<H, F>(
        &mut self,
        value: &'d Value,
        descriptor: TypeDescriptor,
        build: F,
    ) -> Result<H, DecodeError>
    where
        H: Clone + 'static,
        F: FnOnce(&mut Self, &'d Value) -> Result<H, DecodeError>,
    {
        let id = match value {
            Value::Node(id) => *id,
            inline => return build(self, inline),
        };
        if let Some(handle) = self.cached::<H>(id, &descriptor)? {
            return Ok(handle);
        }
        if !self.state.pending.insert(id) {
            return Err(DecodeError::CyclicImmutable { id, descriptor });
        }
        let content = self.node(id)?;
        let handle = build(self, content)?;
        self.state.pending.remove(&id);
        self.state.shared.insert(id, Box::new(handle.clone()));
        Ok(handle)
    }

    /// Materialize a shared handle that is allocated before its content is
    /// decoded (`Rc<RefCell<T>>`), so references back into it close cycles.
    pub fn shared_cyclic<H, A, F>(
        &mut self,
        value: &'d Value,
        descriptor: TypeDescriptor,
        allocate: A,
        fill: F,
    ) -> Result<H, DecodeError>
    where
        H: Clone + 'static,
        A: FnOnce() -> H,
        F: FnOnce(&mut Self, &H, &'d Value) -> Result<(), DecodeError>,
    {
        let id = match value {
            Value::Node(id) => *id,
            inline => {
                let handle = allocate();
                fill(self, &handle, inline)?;
                return Ok(handle);
            }
        };
        if let Some(handle) = self.cached::<H>(id, &descriptor)? {
            return Ok(handle);
        }
        let content = self.node(id)?;
        let handle = allocate();
        self.state.shared.insert(id, Box::new(handle.clone()));
        fill(self, &handle, content)?;
        Ok(handle)
    }

    fn node(&self, id: u32) -> Result<&'d Value, DecodeError> {
        let nodes = self.nodes;
        let content = nodes
            .get(id as usize)
            .ok_or(DecodeError::UnresolvedNode { id, len: nodes.len() })?;
        self.charge(id)?;
        Ok(content)
    }

    fn charge(&self, id: u32) -> Result<(), DecodeError> {
        let cost = self.node_sizes.get(id as usize).copied().unwrap_or(0);
        let left = self.values_left.get();
        if cost > left {
            return Err(DecodeError::TooManyValues { limit: self.values_limit });
        }
        self.values_left.set(left - cost);
        Ok(())
    }

    fn cached<H: Clone + 'static>(
        &self,
        id: u32,
        descriptor: &TypeDescriptor,
    ) -> Result<Option<H>, DecodeError> {
        match self.state.shared.get(&id) {
            None => Ok(None),
            Some(any) => any
                .downcast_ref::<H>()
                .cloned()
                .map(Some)
                .ok_or_else(|| DecodeError::NodeTypeConflict { id, descriptor: descriptor.clone() }),
        }
    }
}

/// Read-only view over a record's fields.
#[derive(Debug, Clone, Copy)]
pub struct Fields<'d> {
    fields: &'d [Field],
}

impl<'d> Fields<'d> {
    pub fn get(&self, name: &str) -> Option<&'d Value> {
        self.fields.iter().find(|f| f.name == name).map(|f| &f.value)
    }

    pub fn require(&self, name: &str) -> Result<&'d Value, DecodeError> {
        self.get(name).ok_or_else(|| DecodeError::MissingField { field: name.to_string() })
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

pub(crate) fn unexpected(expected: &'static str, found: &Value) -> DecodeError {
    DecodeError::Unexpected { expected, found: found.kind() }
}

/// Verify `doc` describes `T`, then materialize it.
pub fn decode_document<T: Persist>(doc: &Document, config: &CodecConfig) -> Result<T, ObjioError> {
    let expected = T::descriptor();
    if !expected.accepts(&doc.descriptor) {
        return Err(ObjioError::TypeMismatch { expected, found: doc.descriptor.clone() });
    }
    if doc.nodes.len() > config.max_nodes {
        return Err(DecodeError::TooManyNodes { limit: config.max_nodes }.into());
    }
    let mut dec = Decoder::new(&doc.nodes, config);
    Ok(dec.decode::<T>(&doc.root)?)
}
