//! seq/iseq.rs
//! Immutable sequence snapshot.

use std::ops::Index;
use std::slice;
use std::sync::Arc;

use crate::model::{decode_seq, encode_seq, Decoder, Encoder, Persist, TypeDescriptor, Value};
use crate::seq::{MSeq, Seq};
use crate::types::{DecodeError, EncodeError};

/// Read-only sequence. Clones share storage.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct ISeq<T> {
    values: Arc<[T]>,
}

impl<T> ISeq<T> {
    pub fn empty() -> Self {
        Self { values: Arc::from(Vec::new()) }
    }

    /// Mutable copy.
    pub fn copy(&self) -> MSeq<T>
    where
        T: Clone,
    {
        MSeq::from(self.values.to_vec())
    }

    /// Whether both handles share one storage.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.values, &other.values)
    }
}

impl<T> Clone for ISeq<T> {
    fn clone(&self) -> Self {
        Self { values: Arc::clone(&self.values) }
    }
}

impl<T> Default for ISeq<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> Seq<T> for ISeq<T> {
    fn as_slice(&self) -> &[T] {
        &self.values
    }
}

impl<T> From<Vec<T>> for ISeq<T> {
    fn from(values: Vec<T>) -> Self {
        Self { values: Arc::from(values) }
    }
}

impl<T> FromIterator<T> for ISeq<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<T>>())
    }
}

impl<T> Index<usize> for ISeq<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.values[index]
    }
}

impl<'a, T> IntoIterator for &'a ISeq<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl<T: Persist> Persist for ISeq<T> {
    fn descriptor() -> TypeDescriptor {
        Vec::<T>::descriptor()
    }

    fn encode(&self, enc: &mut Encoder<'_>) -> Result<Value, EncodeError> {
        encode_seq(self.values.iter(), enc)
    }

    fn decode<'d>(value: &'d Value, dec: &mut Decoder<'d>) -> Result<Self, DecodeError> {
        decode_seq::<T>(value, dec).map(Self::from)
    }
}
