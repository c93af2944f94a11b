//! seq/mseq.rs
//! Mutable fixed-length sequence.

use std::ops::Index;
use std::slice;

use crate::model::{decode_seq, encode_seq, Decoder, Encoder, Persist, TypeDescriptor, Value};
use crate::seq::{ISeq, Seq};
use crate::types::{DecodeError, EncodeError, ObjioError, Result};

/// Ordered container whose length is fixed at construction; elements are
/// replaced in place, never inserted or removed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct MSeq<T> {
    values: Vec<T>,
}

impl<T> MSeq<T> {
    pub fn new() -> Self {
        Self { values: Vec::new() }
    }

    pub fn with_len(len: usize) -> Self
    where
        T: Default,
    {
        Self { values: std::iter::repeat_with(T::default).take(len).collect() }
    }

    pub fn filled(len: usize, value: T) -> Self
    where
        T: Clone,
    {
        Self { values: vec![value; len] }
    }

    /// Replace the element at `index`.
    pub fn set(&mut self, index: usize, value: T) -> Result<()> {
        let size = self.values.len();
        match self.values.get_mut(index) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(ObjioError::Index { index, size }),
        }
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.values.get_mut(index)
    }

    /// Assign `value` to every position.
    pub fn fill_value(&mut self, value: T) -> &mut Self
    where
        T: Clone,
    {
        self.values.fill(value);
        self
    }

    /// Take exactly `len()` values from `values`, in order. If it yields
    /// fewer, the sequence is left unchanged.
    pub fn fill_iter<I>(&mut self, values: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = T>,
    {
        let expected = self.values.len();
        let staged: Vec<T> = values.into_iter().take(expected).collect();
        if staged.len() < expected {
            return Err(ObjioError::Exhausted { expected, available: staged.len() });
        }
        self.values = staged;
        Ok(self)
    }

    /// Copy the first `min(len(), values.len())` entries of `values`.
    pub fn fill_slice(&mut self, values: &[T]) -> &mut Self
    where
        T: Clone,
    {
        let n = self.values.len().min(values.len());
        self.values[..n].clone_from_slice(&values[..n]);
        self
    }

    /// Call `factory` once per index, ascending.
    pub fn fill_with<F>(&mut self, factory: Option<F>) -> Result<&mut Self>
    where
        F: FnMut() -> T,
    {
        let mut factory = factory.ok_or(ObjioError::NullArgument { name: "factory" })?;
        for slot in self.values.iter_mut() {
            *slot = factory();
        }
        Ok(self)
    }

    /// Positional cursor with in-place replacement.
    pub fn iter_mut(&mut self) -> slice::IterMut<'_, T> {
        self.values.iter_mut()
    }

    pub fn swap(&mut self, i: usize, j: usize) -> Result<()> {
        let size = self.values.len();
        for index in [i, j] {
            if index >= size {
                return Err(ObjioError::Index { index, size });
            }
        }
        self.values.swap(i, j);
        Ok(())
    }

    /// Frozen copy. Later changes to `self` do not show through it.
    pub fn to_iseq(&self) -> ISeq<T>
    where
        T: Clone,
    {
        ISeq::from(self.values.clone())
    }

    /// Freeze without copying.
    pub fn into_iseq(self) -> ISeq<T> {
        ISeq::from(self.values)
    }

    pub fn into_vec(self) -> Vec<T> {
        self.values
    }
}

impl<T> Seq<T> for MSeq<T> {
    fn as_slice(&self) -> &[T] {
        &self.values
    }
}

impl<T> From<Vec<T>> for MSeq<T> {
    fn from(values: Vec<T>) -> Self {
        Self { values }
    }
}

impl<T> FromIterator<T> for MSeq<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self { values: iter.into_iter().collect() }
    }
}

impl<T> Index<usize> for MSeq<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.values[index]
    }
}

impl<'a, T> IntoIterator for &'a MSeq<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl<T: Persist> Persist for MSeq<T> {
    fn descriptor() -> TypeDescriptor {
        Vec::<T>::descriptor()
    }

    fn encode(&self, enc: &mut Encoder<'_>) -> std::result::Result<Value, EncodeError> {
        encode_seq(self.values.iter(), enc)
    }

    fn decode<'d>(value: &'d Value, dec: &mut Decoder<'d>) -> std::result::Result<Self, DecodeError> {
        decode_seq::<T>(value, dec).map(Self::from)
    }
}
