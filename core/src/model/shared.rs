//! model/shared.rs
//! Shared and cyclic allocations.
//!
//! - `Arc<T>`: immutable sharing. Identity is preserved by the binary codec;
//!   a cycle cannot be built through it.
//! - `Rc<RefCell<T>>`: mutable sharing. Allocated before its content is
//!   decoded, so cycles round-trip. Needs `T: Default` for the placeholder.
//! - `Weak<RefCell<T>>`: back-edges. Only meaningful with identity tracking.
//!
//! All three share the descriptor of their content, except `Weak` which is
//! spelled `weak<T>`.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::sync::Arc;

use crate::model::decoder::{unexpected, Decoder};
use crate::model::encoder::{Encoder, Sharing};
use crate::model::persist::Persist;
use crate::model::value::{TypeDescriptor, Value};
use crate::types::{DecodeError, EncodeError};

fn addr<T: ?Sized>(ptr: *const T) -> usize {
    ptr as *const () as usize
}

impl<T: Persist + 'static> Persist for Arc<T> {
    fn descriptor() -> TypeDescriptor {
        T::descriptor()
    }

    fn encode(&self, enc: &mut Encoder<'_>) -> Result<Value, EncodeError> {
        enc.shared(addr(Arc::as_ptr(self)), T::descriptor(), |enc| enc.encode(&**self))
    }

    fn decode<'d>(value: &'d Value, dec: &mut Decoder<'d>) -> Result<Self, DecodeError> {
        dec.shared(value, T::descriptor(), |dec, content| {
            dec.decode::<T>(content).map(Arc::new)
        })
    }
}

impl<T: Persist + Default + 'static> Persist for Rc<RefCell<T>> {
    fn descriptor() -> TypeDescriptor {
        T::descriptor()
    }

    fn encode(&self, enc: &mut Encoder<'_>) -> Result<Value, EncodeError> {
        enc.shared(addr(Rc::as_ptr(self)), T::descriptor(), |enc| {
            let inner = self.try_borrow().map_err(|_| {
                EncodeError::Unsupported(format!("{} is mutably borrowed", T::descriptor()))
            })?;
            enc.encode(&*inner)
        })
    }

    fn decode<'d>(value: &'d Value, dec: &mut Decoder<'d>) -> Result<Self, DecodeError> {
        dec.shared_cyclic(
            value,
            T::descriptor(),
            || Rc::new(RefCell::new(T::default())),
            |dec, cell, content| {
                let decoded = dec.decode::<T>(content)?;
                *cell.borrow_mut() = decoded;
                Ok(())
            },
        )
    }
}

impl<T: Persist + Default + 'static> Persist for Weak<RefCell<T>> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::generic("weak", &[T::descriptor()])
    }

    fn encode(&self, enc: &mut Encoder<'_>) -> Result<Value, EncodeError> {
        if enc.sharing() == Sharing::Inline {
            return Err(EncodeError::Unsupported(format!(
                "weak reference to {} needs an identity-preserving codec",
                T::descriptor()
            )));
        }
        match self.upgrade() {
            None => Ok(Value::Option(None)),
            Some(strong) => Ok(Value::Option(Some(Box::new(enc.encode(&strong)?)))),
        }
    }

    fn decode<'d>(value: &'d Value, dec: &mut Decoder<'d>) -> Result<Self, DecodeError> {
        match dec.resolve(value)? {
            Value::Option(None) => Ok(Weak::new()),
            Value::Option(Some(target)) => {
                let strong = dec.decode::<Rc<RefCell<T>>>(target)?;
                Ok(Rc::downgrade(&strong))
            }
            other => Err(unexpected("option", other)),
        }
    }
}
