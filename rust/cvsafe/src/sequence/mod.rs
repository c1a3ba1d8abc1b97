//! Native ordered collections of fixed-layout elements.
//!
//! A [`Sequence<T>`] owns one native vector. Every element kind speaks the same
//! protocol (create, bulk-create, size, bulk-copy, iterate, destroy); the per-kind
//! entry points are bound to the generic implementation through [`SequenceElement`],
//! implemented once per kind in [`kinds`].

use std::fmt;
use std::marker::PhantomData;
use std::ptr::NonNull;

use cvsafe_common::{Result, error::Error};

use crate::config;
use crate::handle::{Handle, ResourceKind};

pub mod iter;
mod kinds;

pub use iter::ForeignIterator;

/// Binds an element type to the native entry points of its vector kind.
///
/// # Safety
///
/// `Self` must have exactly the size, alignment and field layout of the element type
/// the native functions operate on, and every function must forward to the matching
/// native entry point for that kind.
pub unsafe trait SequenceElement: bytemuck::Pod {
    type Vector;
    type Cursor;

    const SEQUENCE_NAME: &'static str;
    const CURSOR_NAME: &'static str;

    unsafe fn vector_new() -> *mut Self::Vector;
    unsafe fn vector_new_array(data: *const Self, len: usize) -> *mut Self::Vector;
    unsafe fn vector_size(vector: *const Self::Vector) -> usize;
    unsafe fn vector_copy(vector: *const Self::Vector, data: *mut Self);
    unsafe fn vector_delete(vector: *mut Self::Vector);

    unsafe fn iterator_new(vector: *const Self::Vector) -> *mut Self::Cursor;
    unsafe fn iterator_has_next(cursor: *const Self::Cursor) -> bool;
    unsafe fn iterator_next(cursor: *mut Self::Cursor) -> Self;
    unsafe fn iterator_delete(cursor: *mut Self::Cursor);

    /// The shared null sequence of this kind.
    fn null_sequence() -> &'static Sequence<Self>;
}

/// Native vector of `T`, destroyed with the kind's `delete` entry point.
pub struct VectorKind<T>(PhantomData<T>);

unsafe impl<T: SequenceElement> ResourceKind for VectorKind<T> {
    type Raw = T::Vector;
    const NAME: &'static str = T::SEQUENCE_NAME;

    unsafe fn destroy(ptr: NonNull<T::Vector>) {
        unsafe { T::vector_delete(ptr.as_ptr()) }
    }
}

pub struct Sequence<T: SequenceElement> {
    handle: Handle<VectorKind<T>>,
}

impl<T: SequenceElement> Sequence<T> {
    /// Allocates an empty native sequence.
    pub fn new() -> Result<Self> {
        let handle = unsafe { Handle::acquire(T::vector_new())? };
        Ok(Sequence { handle })
    }

    /// Allocates a native sequence holding a copy of `items`, in order.
    ///
    /// Fails with `SizeMismatch` if the native sequence does not end up with exactly
    /// `items.len()` elements.
    pub fn from_slice(items: &[T]) -> Result<Self> {
        let config = config::current();
        if items.len() > config.max_sequence_len {
            return Err(Error::invalid_arg(
                "items",
                format!(
                    "{} elements exceed the configured maximum of {}",
                    items.len(),
                    config.max_sequence_len
                ),
            ));
        }

        let raw = unsafe { T::vector_new_array(items.as_ptr(), items.len()) };
        let sequence = Sequence {
            handle: unsafe { Handle::acquire(raw)? },
        };
        if config.verify_sequence_construction {
            let len = sequence.len()?;
            if len != items.len() {
                return Err(Error::size_mismatch(items.len(), len));
            }
        }
        Ok(sequence)
    }

    /// The shared "no sequence" instance of this kind.
    pub fn null() -> &'static Self {
        T::null_sequence()
    }

    pub(crate) const fn null_handle() -> Self {
        Sequence {
            handle: Handle::null(),
        }
    }

    pub fn is_invalid(&self) -> bool {
        self.handle.is_invalid()
    }

    fn raw(&self) -> Result<*mut T::Vector> {
        Ok(self.handle.as_ptr()?.as_ptr())
    }

    /// Current number of elements, as reported by the native side.
    pub fn len(&self) -> Result<usize> {
        let raw = self.raw()?;
        Ok(unsafe { T::vector_size(raw) })
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Copies every element, in order, into the front of `dst` and returns how many
    /// were copied.
    ///
    /// Fails with `SizeMismatch` if `dst` is shorter than the sequence.
    pub fn copy_to(&self, dst: &mut [T]) -> Result<usize> {
        let raw = self.raw()?;
        let len = unsafe { T::vector_size(raw) };
        if dst.len() < len {
            return Err(Error::size_mismatch(len, dst.len()));
        }
        if len > 0 {
            unsafe { T::vector_copy(raw, dst.as_mut_ptr()) };
        }
        Ok(len)
    }

    pub fn to_vec(&self) -> Result<Vec<T>> {
        let mut items = vec![<T as bytemuck::Zeroable>::zeroed(); self.len()?];
        self.copy_to(&mut items)?;
        Ok(items)
    }

    /// Starts a new cursor at the first element.
    ///
    /// The returned iterator releases its native cursor when exhausted or dropped,
    /// whichever comes first.
    pub fn iter(&self) -> Result<ForeignIterator<'_, T>> {
        let raw = self.raw()?;
        let cursor = unsafe { Handle::acquire(T::iterator_new(raw))? };
        Ok(ForeignIterator::new(cursor))
    }

    /// Destroys the native sequence. Repeated calls do nothing.
    pub fn release(&mut self) {
        self.handle.release();
    }

    pub fn is_released(&self) -> bool {
        self.handle.is_released()
    }
}

impl<T: SequenceElement> fmt::Debug for Sequence<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sequence")
            .field("kind", &T::SEQUENCE_NAME)
            .field("handle", &self.handle)
            .finish()
    }
}
