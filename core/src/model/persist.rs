//! model/persist.rs
//! The payload capability and its implementations for std types.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use bytes::Bytes;

use crate::model::decoder::{unexpected, Decoder};
use crate::model::encoder::Encoder;
use crate::model::value::{TypeDescriptor, Value};
use crate::types::{DecodeError, EncodeError};

/// A type that can be written by any codec and read back by the same codec.
///
/// `descriptor` is written into every document and compared on read, so two
/// types sharing a descriptor must share an encoding.
pub trait Persist: Sized {
    fn descriptor() -> TypeDescriptor;

    fn encode(&self, enc: &mut Encoder<'_>) -> Result<Value, EncodeError>;

    fn decode<'d>(value: &'d Value, dec: &mut Decoder<'d>) -> Result<Self, DecodeError>;
}

impl Persist for () {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::named("unit")
    }

    fn encode(&self, _enc: &mut Encoder<'_>) -> Result<Value, EncodeError> {
        Ok(Value::Unit)
    }

    fn decode<'d>(value: &'d Value, dec: &mut Decoder<'d>) -> Result<Self, DecodeError> {
        match dec.resolve(value)? {
            Value::Unit => Ok(()),
            other => Err(unexpected("unit", other)),
        }
    }
}

impl Persist for bool {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::named("bool")
    }

    fn encode(&self, _enc: &mut Encoder<'_>) -> Result<Value, EncodeError> {
        Ok(Value::Bool(*self))
    }

    fn decode<'d>(value: &'d Value, dec: &mut Decoder<'d>) -> Result<Self, DecodeError> {
        match dec.resolve(value)? {
            Value::Bool(b) => Ok(*b),
            other => Err(unexpected("bool", other)),
        }
    }
}

macro_rules! persist_signed {
    ($($ty:ty => $name:literal),* $(,)?) => {$(
        impl Persist for $ty {
            fn descriptor() -> TypeDescriptor {
                TypeDescriptor::named($name)
            }

            fn encode(&self, _enc: &mut Encoder<'_>) -> Result<Value, EncodeError> {
                Ok(Value::Int(*self as i64))
            }

            fn decode<'d>(value: &'d Value, dec: &mut Decoder<'d>) -> Result<Self, DecodeError> {
                match dec.resolve(value)? {
                    Value::Int(i) => <$ty>::try_from(*i).map_err(|_| DecodeError::OutOfRange {
                        target: $name,
                        value: i.to_string(),
                    }),
                    other => Err(unexpected("int", other)),
                }
            }
        }
    )*};
}

macro_rules! persist_unsigned {
    ($($ty:ty => $name:literal),* $(,)?) => {$(
        impl Persist for $ty {
            fn descriptor() -> TypeDescriptor {
                TypeDescriptor::named($name)
            }

            fn encode(&self, _enc: &mut Encoder<'_>) -> Result<Value, EncodeError> {
                Ok(Value::UInt(*self as u64))
            }

            fn decode<'d>(value: &'d Value, dec: &mut Decoder<'d>) -> Result<Self, DecodeError> {
                match dec.resolve(value)? {
                    Value::UInt(u) => <$ty>::try_from(*u).map_err(|_| DecodeError::OutOfRange {
                        target: $name,
                        value: u.to_string(),
                    }),
                    other => Err(unexpected("uint", other)),
                }
            }
        }
    )*};
}

persist_signed!(i8 => "i8", i16 => "i16", i32 => "i32", i64 => "i64", isize => "isize");
persist_unsigned!(u8 => "u8", u16 => "u16", u32 => "u32", u64 => "u64", usize => "usize");

impl Persist for f64 {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::named("f64")
    }

    fn encode(&self, _enc: &mut Encoder<'_>) -> Result<Value, EncodeError> {
        Ok(Value::Float(*self))
    }

    fn decode<'d>(value: &'d Value, dec: &mut Decoder<'d>) -> Result<Self, DecodeError> {
        match dec.resolve(value)? {
            Value::Float(f) => Ok(*f),
            other => Err(unexpected("float", other)),
        }
    }
}

impl Persist for f32 {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::named("f32")
    }

    fn encode(&self, _enc: &mut Encoder<'_>) -> Result<Value, EncodeError> {
        Ok(Value::Float(*self as f64))
    }

    fn decode<'d>(value: &'d Value, dec: &mut Decoder<'d>) -> Result<Self, DecodeError> {
        match dec.resolve(value)? {
            Value::Float(f) => Ok(*f as f32),
            other => Err(unexpected("float", other)),
        }
    }
}

impl Persist for char {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::named("char")
    }

    fn encode(&self, _enc: &mut Encoder<'_>) -> Result<Value, EncodeError> {
        Ok(Value::Char(*self))
    }

    fn decode<'d>(value: &'d Value, dec: &mut Decoder<'d>) -> Result<Self, DecodeError> {
        match dec.resolve(value)? {
            Value::Char(c) => Ok(*c),
            other => Err(unexpected("char", other)),
        }
    }
}

impl Persist for String {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::named("string")
    }

    fn encode(&self, _enc: &mut Encoder<'_>) -> Result<Value, EncodeError> {
        Ok(Value::Text(self.clone()))
    }

    fn decode<'d>(value: &'d Value, dec: &mut Decoder<'d>) -> Result<Self, DecodeError> {
        match dec.resolve(value)? {
            Value::Text(s) => Ok(s.clone()),
            other => Err(unexpected("text", other)),
        }
    }
}

impl Persist for Bytes {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::named("bytes")
    }

    fn encode(&self, _enc: &mut Encoder<'_>) -> Result<Value, EncodeError> {
        Ok(Value::Bytes(self.to_vec()))
    }

    fn decode<'d>(value: &'d Value, dec: &mut Decoder<'d>) -> Result<Self, DecodeError> {
        match dec.resolve(value)? {
            Value::Bytes(b) => Ok(Bytes::copy_from_slice(b)),
            other => Err(unexpected("bytes", other)),
        }
    }
}

impl<T: Persist> Persist for Option<T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::generic("option", &[T::descriptor()])
    }

    fn encode(&self, enc: &mut Encoder<'_>) -> Result<Value, EncodeError> {
        match self {
            None => Ok(Value::Option(None)),
            Some(v) => Ok(Value::Option(Some(Box::new(enc.encode(v)?)))),
        }
    }

    fn decode<'d>(value: &'d Value, dec: &mut Decoder<'d>) -> Result<Self, DecodeError> {
        match dec.resolve(value)? {
            Value::Option(None) => Ok(None),
            Value::Option(Some(v)) => Ok(Some(dec.decode(v)?)),
            other => Err(unexpected("option", other)),
        }
    }
}

// Transparent: a boxed value is written exactly like the value.
impl<T: Persist> Persist for Box<T> {
    fn descriptor() -> TypeDescriptor {
        T::descriptor()
    }

    fn encode(&self, enc: &mut Encoder<'_>) -> Result<Value, EncodeError> {
        (**self).encode(enc)
    }

    fn decode<'d>(value: &'d Value, dec: &mut Decoder<'d>) -> Result<Self, DecodeError> {
        T::decode(value, dec).map(Box::new)
    }
}

impl<T: Persist> Persist for Vec<T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::generic("seq", &[T::descriptor()])
    }

    fn encode(&self, enc: &mut Encoder<'_>) -> Result<Value, EncodeError> {
        encode_seq(self.iter(), enc)
    }

    fn decode<'d>(value: &'d Value, dec: &mut Decoder<'d>) -> Result<Self, DecodeError> {
        decode_seq(value, dec)
    }
}

/// Shared by every `seq<T>` implementor.
pub fn encode_seq<'a, T, I>(items: I, enc: &mut Encoder<'_>) -> Result<Value, EncodeError>
where
    T: Persist + 'a,
    I: Iterator<Item = &'a T>,
{
    let items = items.map(|item| enc.encode(item)).collect::<Result<Vec<_>, _>>()?;
    Ok(Value::Seq(items))
}

pub fn decode_seq<'d, T: Persist>(value: &'d Value, dec: &mut Decoder<'d>) -> Result<Vec<T>, DecodeError> {
    match dec.resolve(value)? {
        Value::Seq(items) => items.iter().map(|item| dec.decode(item)).collect(),
        other => Err(unexpected("seq", other)),
    }
}

impl<A: Persist, B: Persist> Persist for (A, B) {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::generic("tuple", &[A::descriptor(), B::descriptor()])
    }

    fn encode(&self, enc: &mut Encoder<'_>) -> Result<Value, EncodeError> {
        Ok(Value::Seq(vec![enc.encode(&self.0)?, enc.encode(&self.1)?]))
    }

    fn decode<'d>(value: &'d Value, dec: &mut Decoder<'d>) -> Result<Self, DecodeError> {
        match dec.resolve(value)? {
            Value::Seq(items) if items.len() == 2 => Ok((dec.decode(&items[0])?, dec.decode(&items[1])?)),
            Value::Seq(items) => Err(DecodeError::Malformed(format!(
                "tuple of 2 holds {} elements",
                items.len()
            ))),
            other => Err(unexpected("seq", other)),
        }
    }
}

impl<A: Persist, B: Persist, C: Persist> Persist for (A, B, C) {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::generic("tuple", &[A::descriptor(), B::descriptor(), C::descriptor()])
    }

    fn encode(&self, enc: &mut Encoder<'_>) -> Result<Value, EncodeError> {
        Ok(Value::Seq(vec![
            enc.encode(&self.0)?,
            enc.encode(&self.1)?,
            enc.encode(&self.2)?,
        ]))
    }

    fn decode<'d>(value: &'d Value, dec: &mut Decoder<'d>) -> Result<Self, DecodeError> {
        match dec.resolve(value)? {
            Value::Seq(items) if items.len() == 3 => Ok((
                dec.decode(&items[0])?,
                dec.decode(&items[1])?,
                dec.decode(&items[2])?,
            )),
            Value::Seq(items) => Err(DecodeError::Malformed(format!(
                "tuple of 3 holds {} elements",
                items.len()
            ))),
            other => Err(unexpected("seq", other)),
        }
    }
}

// BTreeMap and HashMap share the `map<K,V>` descriptor and are readable as
// one another.
impl<K: Persist + Ord, V: Persist> Persist for BTreeMap<K, V> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::generic("map", &[K::descriptor(), V::descriptor()])
    }

    fn encode(&self, enc: &mut Encoder<'_>) -> Result<Value, EncodeError> {
        encode_map(self.iter(), enc)
    }

    fn decode<'d>(value: &'d Value, dec: &mut Decoder<'d>) -> Result<Self, DecodeError> {
        decode_map(value, dec)
    }
}

impl<K: Persist + Eq + Hash, V: Persist> Persist for HashMap<K, V> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::generic("map", &[K::descriptor(), V::descriptor()])
    }

    fn encode(&self, enc: &mut Encoder<'_>) -> Result<Value, EncodeError> {
        encode_map(self.iter(), enc)
    }

    fn decode<'d>(value: &'d Value, dec: &mut Decoder<'d>) -> Result<Self, DecodeError> {
        decode_map(value, dec)
    }
}

fn encode_map<'a, K, V, I>(entries: I, enc: &mut Encoder<'_>) -> Result<Value, EncodeError>
where
    K: Persist + 'a,
    V: Persist + 'a,
    I: Iterator<Item = (&'a K, &'a V)>,
{
    let entries = entries
        .map(|(k, v)| -> Result<(Value, Value), EncodeError> {
            Ok((enc.encode(k)?, enc.encode(v)?))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Value::Map(entries))
}

fn decode_map<'d, K, V, M>(value: &'d Value, dec: &mut Decoder<'d>) -> Result<M, DecodeError>
where
    K: Persist,
    V: Persist,
    M: FromIterator<(K, V)>,
{
    match dec.resolve(value)? {
        Value::Map(entries) => entries
            .iter()
            .map(|(k, v)| -> Result<(K, V), DecodeError> {
                Ok((dec.decode(k)?, dec.decode(v)?))
            })
            .collect(),
        other => Err(unexpected("map", other)),
    }
}
