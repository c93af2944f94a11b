//! model/value.rs
//! Value tree, document envelope and type descriptors.

use std::borrow::Cow;
use std::fmt;
use serde::{Deserialize, Serialize};

/// Canonical name of a payload type, written into every document and
/// compared on read.
///
/// Composite descriptors are spelled `base<param,param>`, e.g. `seq<string>`
/// or `map<string,i64>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeDescriptor(Cow<'static, str>);

impl TypeDescriptor {
    pub const fn named(name: &'static str) -> Self {
        TypeDescriptor(Cow::Borrowed(name))
    }

    pub fn generic(base: &str, params: &[TypeDescriptor]) -> Self {
        let params: Vec<&str> = params.iter().map(TypeDescriptor::as_str).collect();
        TypeDescriptor(Cow::Owned(format!("{}<{}>", base, params.join(","))))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether a document described by `found` may be read as `self`.
    pub fn accepts(&self, found: &TypeDescriptor) -> bool {
        self == found
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for TypeDescriptor {
    fn from(name: String) -> Self {
        TypeDescriptor(Cow::Owned(name))
    }
}

/// Named record field. Order is preserved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub value: Value,
}

/// One node of a payload's structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    Unit,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Char(char),
    Text(String),
    Bytes(Vec<u8>),
    Option(Option<Box<Value>>),
    Seq(Vec<Value>),
    Map(Vec<(Value, Value)>),
    Record(Vec<Field>),
    Variant { tag: String, value: Box<Value> },
    /// Reference into the document's node table.
    Node(u32),
}

impl Value {
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Unit => "unit",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::UInt(_) => "uint",
            Value::Float(_) => "float",
            Value::Char(_) => "char",
            Value::Text(_) => "text",
            Value::Bytes(_) => "bytes",
            Value::Option(_) => "option",
            Value::Seq(_) => "seq",
            Value::Map(_) => "map",
            Value::Record(_) => "record",
            Value::Variant { .. } => "variant",
            Value::Node(_) => "node",
        }
    }

    /// This value and everything nested in it, depth first. `Node`
    /// references are yielded as they are, not followed.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }
}

/// Iterator returned by [`Value::descendants`]. Uses an explicit stack, so
/// arbitrarily deep trees are walked without recursion.
#[derive(Debug, Clone)]
pub struct Descendants<'a> {
    stack: Vec<&'a Value>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Value;

    fn next(&mut self) -> Option<&'a Value> {
        let value = self.stack.pop()?;
        match value {
            Value::Option(Some(inner)) => self.stack.push(inner),
            Value::Seq(items) => self.stack.extend(items.iter().rev()),
            Value::Map(entries) => {
                for (k, v) in entries.iter().rev() {
                    self.stack.push(v);
                    self.stack.push(k);
                }
            }
            Value::Record(fields) => self.stack.extend(fields.iter().rev().map(|f| &f.value)),
            Value::Variant { value, .. } => self.stack.push(value),
            _ => {}
        }
        Some(value)
    }
}

/// The unit a single codec call writes or reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub descriptor: TypeDescriptor,
    /// Shared allocations, referenced from `root` by `Value::Node(index)`.
    pub nodes: Vec<Value>,
    pub root: Value,
}

impl Document {
    pub fn new(descriptor: TypeDescriptor, nodes: Vec<Value>, root: Value) -> Self {
        Self { descriptor, nodes, root }
    }

    pub fn has_nodes(&self) -> bool {
        !self.nodes.is_empty()
    }
}
