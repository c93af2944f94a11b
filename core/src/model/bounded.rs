//! model/bounded.rs
//! Depth-bounded deserialization of `Document`s.
//!
//! The derived `Deserialize` for `Value` recurses once per nesting level
//! with no limit, so a crafted body could exhaust the stack before any
//! payload check runs. `DepthBudget` drives the same wire shape through
//! seeds that count levels and stop at `max_depth`.
//!
//! ```text
//! root / node table entry    depth 1
//! option, seq, map, record,
//! variant content            parent + 1
//! ```

use std::cell::Cell;
use std::fmt;

use serde::de::{self, DeserializeSeed, EnumAccess, MapAccess, SeqAccess, VariantAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::model::value::{Document, Field, TypeDescriptor, Value};

/// Serde enum name and variant list of `Value`, in declaration order.
const VALUE_VARIANTS: &[&str] = &[
    "unit", "bool", "int", "u_int", "float", "char", "text", "bytes", "option", "seq", "map",
    "record", "variant", "node",
];

#[derive(Deserialize)]
#[serde(variant_identifier, rename_all = "snake_case")]
enum ValueTag {
    Unit,
    Bool,
    Int,
    UInt,
    Float,
    Char,
    Text,
    Bytes,
    Option,
    Seq,
    Map,
    Record,
    Variant,
    Node,
}

#[derive(Deserialize)]
#[serde(field_identifier, rename_all = "snake_case")]
enum DocumentKey {
    Descriptor,
    Nodes,
    Root,
}

#[derive(Deserialize)]
#[serde(field_identifier, rename_all = "snake_case")]
enum FieldKey {
    Name,
    Value,
}

#[derive(Deserialize)]
#[serde(field_identifier, rename_all = "snake_case")]
enum VariantKey {
    Tag,
    Value,
}

/// Nesting limit for one document read. Records whether the limit was hit
/// so callers can tell it apart from other format errors.
#[derive(Debug)]
pub struct DepthBudget {
    max_depth: usize,
    exceeded: Cell<bool>,
}

impl DepthBudget {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth, exceeded: Cell::new(false) }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Whether a read through this budget stopped at the depth limit.
    pub fn exceeded(&self) -> bool {
        self.exceeded.get()
    }

    pub fn document(&self) -> DocumentSeed<'_> {
        DocumentSeed { root: ValueSeed { remaining: self.max_depth, budget: self } }
    }
}

/// Seed producing a whole `Document`.
#[derive(Clone, Copy)]
pub struct DocumentSeed<'b> {
    root: ValueSeed<'b>,
}

impl<'de, 'b> DeserializeSeed<'de> for DocumentSeed<'b> {
    type Value = Document;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Document, D::Error> {
        deserializer.deserialize_struct("Document", &["descriptor", "nodes", "root"], self)
    }
}

impl<'de, 'b> Visitor<'de> for DocumentSeed<'b> {
    type Value = Document;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("struct Document")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Document, A::Error> {
        let descriptor: TypeDescriptor =
            seq.next_element()?.ok_or_else(|| de::Error::invalid_length(0, &self))?;
        let nodes = seq
            .next_element_seed(ValuesSeed(self.root))?
            .ok_or_else(|| de::Error::invalid_length(1, &self))?;
        let root = seq
            .next_element_seed(self.root)?
            .ok_or_else(|| de::Error::invalid_length(2, &self))?;
        Ok(Document::new(descriptor, nodes, root))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Document, A::Error> {
        let (mut descriptor, mut nodes, mut root) = (None, None, None);
        while let Some(key) = map.next_key::<DocumentKey>()? {
            match key {
                DocumentKey::Descriptor => descriptor = Some(map.next_value::<TypeDescriptor>()?),
                DocumentKey::Nodes => nodes = Some(map.next_value_seed(ValuesSeed(self.root))?),
                DocumentKey::Root => root = Some(map.next_value_seed(self.root)?),
            }
        }
        let descriptor = descriptor.ok_or_else(|| de::Error::missing_field("descriptor"))?;
        let root = root.ok_or_else(|| de::Error::missing_field("root"))?;
        Ok(Document::new(descriptor, nodes.unwrap_or_default(), root))
    }
}

#[derive(Clone, Copy)]
struct ValueSeed<'b> {
    remaining: usize,
    budget: &'b DepthBudget,
}

impl<'b> ValueSeed<'b> {
    fn nested(self) -> Self {
        Self { remaining: self.remaining.saturating_sub(1), ..self }
    }
}

impl<'de, 'b> DeserializeSeed<'de> for ValueSeed<'b> {
    type Value = Value;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        if self.remaining == 0 {
            self.budget.exceeded.set(true);
            return Err(de::Error::custom(format!(
                "nesting depth exceeds limit {}",
                self.budget.max_depth
            )));
        }
        deserializer.deserialize_enum("Value", VALUE_VARIANTS, self)
    }
}

impl<'de, 'b> Visitor<'de> for ValueSeed<'b> {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("enum Value")
    }

    fn visit_enum<A: EnumAccess<'de>>(self, data: A) -> Result<Value, A::Error> {
        let (tag, variant) = data.variant::<ValueTag>()?;
        let child = self.nested();
        Ok(match tag {
            ValueTag::Unit => {
                variant.unit_variant()?;
                Value::Unit
            }
            ValueTag::Bool => Value::Bool(variant.newtype_variant()?),
            ValueTag::Int => Value::Int(variant.newtype_variant()?),
            ValueTag::UInt => Value::UInt(variant.newtype_variant()?),
            ValueTag::Float => Value::Float(variant.newtype_variant()?),
            ValueTag::Char => Value::Char(variant.newtype_variant()?),
            ValueTag::Text => Value::Text(variant.newtype_variant()?),
            ValueTag::Bytes => Value::Bytes(variant.newtype_variant()?),
            ValueTag::Node => Value::Node(variant.newtype_variant()?),
            ValueTag::Option => Value::Option(variant.newtype_variant_seed(OptionSeed(child))?),
            ValueTag::Seq => Value::Seq(variant.newtype_variant_seed(ValuesSeed(child))?),
            ValueTag::Map => Value::Map(variant.newtype_variant_seed(EntriesSeed(child))?),
            ValueTag::Record => Value::Record(variant.newtype_variant_seed(FieldsSeed(child))?),
            ValueTag::Variant => variant.struct_variant(&["tag", "value"], VariantSeed(child))?,
        })
    }
}

/// Initial capacity taken from a length prefix, capped so a forged prefix
/// cannot reserve more than the body can hold.
fn cautious(hint: Option<usize>) -> usize {
    hint.unwrap_or(0).min(4096)
}

#[derive(Clone, Copy)]
struct OptionSeed<'b>(ValueSeed<'b>);

impl<'de, 'b> DeserializeSeed<'de> for OptionSeed<'b> {
    type Value = Option<Box<Value>>;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_option(self)
    }
}

impl<'de, 'b> Visitor<'de> for OptionSeed<'b> {
    type Value = Option<Box<Value>>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("optional value")
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        self.0.deserialize(deserializer).map(|v| Some(Box::new(v)))
    }
}

#[derive(Clone, Copy)]
struct ValuesSeed<'b>(ValueSeed<'b>);

impl<'de, 'b> DeserializeSeed<'de> for ValuesSeed<'b> {
    type Value = Vec<Value>;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Vec<Value>, D::Error> {
        deserializer.deserialize_seq(self)
    }
}

impl<'de, 'b> Visitor<'de> for ValuesSeed<'b> {
    type Value = Vec<Value>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("sequence of values")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Vec<Value>, A::Error> {
        let mut out = Vec::with_capacity(cautious(seq.size_hint()));
        while let Some(value) = seq.next_element_seed(self.0)? {
            out.push(value);
        }
        Ok(out)
    }
}

#[derive(Clone, Copy)]
struct EntriesSeed<'b>(ValueSeed<'b>);

impl<'de, 'b> DeserializeSeed<'de> for EntriesSeed<'b> {
    type Value = Vec<(Value, Value)>;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_seq(self)
    }
}

impl<'de, 'b> Visitor<'de> for EntriesSeed<'b> {
    type Value = Vec<(Value, Value)>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("sequence of key/value pairs")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut out = Vec::with_capacity(cautious(seq.size_hint()));
        while let Some(pair) = seq.next_element_seed(PairSeed(self.0))? {
            out.push(pair);
        }
        Ok(out)
    }
}

#[derive(Clone, Copy)]
struct PairSeed<'b>(ValueSeed<'b>);

impl<'de, 'b> DeserializeSeed<'de> for PairSeed<'b> {
    type Value = (Value, Value);

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_tuple(2, self)
    }
}

impl<'de, 'b> Visitor<'de> for PairSeed<'b> {
    type Value = (Value, Value);

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("key/value pair")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let key = seq.next_element_seed(self.0)?.ok_or_else(|| de::Error::invalid_length(0, &self))?;
        let value = seq.next_element_seed(self.0)?.ok_or_else(|| de::Error::invalid_length(1, &self))?;
        Ok((key, value))
    }
}

#[derive(Clone, Copy)]
struct FieldsSeed<'b>(ValueSeed<'b>);

impl<'de, 'b> DeserializeSeed<'de> for FieldsSeed<'b> {
    type Value = Vec<Field>;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Vec<Field>, D::Error> {
        deserializer.deserialize_seq(self)
    }
}

impl<'de, 'b> Visitor<'de> for FieldsSeed<'b> {
    type Value = Vec<Field>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("sequence of record fields")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Vec<Field>, A::Error> {
        let mut out = Vec::with_capacity(cautious(seq.size_hint()));
        while let Some(field) = seq.next_element_seed(FieldSeed(self.0))? {
            out.push(field);
        }
        Ok(out)
    }
}

#[derive(Clone, Copy)]
struct FieldSeed<'b>(ValueSeed<'b>);

impl<'de, 'b> DeserializeSeed<'de> for FieldSeed<'b> {
    type Value = Field;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Field, D::Error> {
        deserializer.deserialize_struct("Field", &["name", "value"], self)
    }
}

impl<'de, 'b> Visitor<'de> for FieldSeed<'b> {
    type Value = Field;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("struct Field")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Field, A::Error> {
        let name: String = seq.next_element()?.ok_or_else(|| de::Error::invalid_length(0, &self))?;
        let value = seq.next_element_seed(self.0)?.ok_or_else(|| de::Error::invalid_length(1, &self))?;
        Ok(Field { name, value })
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Field, A::Error> {
        let (mut name, mut value) = (None, None);
        while let Some(key) = map.next_key::<FieldKey>()? {
            match key {
                FieldKey::Name => name = Some(map.next_value::<String>()?),
                FieldKey::Value => value = Some(map.next_value_seed(self.0)?),
            }
        }
        Ok(Field {
            name: name.ok_or_else(|| de::Error::missing_field("name"))?,
            value: value.ok_or_else(|| de::Error::missing_field("value"))?,
        })
    }
}

#[derive(Clone, Copy)]
struct VariantSeed<'b>(ValueSeed<'b>);

impl<'de, 'b> Visitor<'de> for VariantSeed<'b> {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("struct variant Value::Variant")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let tag: String = seq.next_element()?.ok_or_else(|| de::Error::invalid_length(0, &self))?;
        let value = seq.next_element_seed(self.0)?.ok_or_else(|| de::Error::invalid_length(1, &self))?;
        Ok(Value::Variant { tag, value: Box::new(value) })
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Value, A::Error> {
        let (mut tag, mut value) = (None, None);
        while let Some(key) = map.next_key::<VariantKey>()? {
            match key {
                VariantKey::Tag => tag = Some(map.next_value::<String>()?),
                VariantKey::Value => value = Some(map.next_value_seed(self.0)?),
            }
        }
        Ok(Value::Variant {
            tag: tag.ok_or_else(|| de::Error::missing_field("tag"))?,
            value: Box::new(value.ok_or_else(|| de::Error::missing_field("value"))?),
        })
    }
}
