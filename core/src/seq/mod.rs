//! seq/mod.rs
//! Fixed-length ordered containers: mutable `MSeq` and its frozen `ISeq`.
//!
//! Both persist as `seq<T>`, the same shape as `Vec<T>`.

pub mod mseq;
pub mod iseq;

pub use mseq::*;
pub use iseq::*;

use std::slice;

/// Read access shared by `MSeq` and `ISeq`.
pub trait Seq<T> {
    fn as_slice(&self) -> &[T];

    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }

    fn iter(&self) -> slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    fn index_of(&self, value: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.as_slice().iter().position(|v| v == value)
    }

    fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.index_of(value).is_some()
    }
}
