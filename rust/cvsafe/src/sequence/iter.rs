//! Disposable forward cursor over a [`Sequence`].

use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::ptr::NonNull;

use crate::handle::{Handle, ResourceKind};

use super::{Sequence, SequenceElement};

/// Native cursor over a vector of `T`, destroyed with the kind's `iterator_delete`.
pub struct CursorKind<T>(PhantomData<T>);

unsafe impl<T: SequenceElement> ResourceKind for CursorKind<T> {
    type Raw = T::Cursor;
    const NAME: &'static str = T::CURSOR_NAME;

    unsafe fn destroy(ptr: NonNull<T::Cursor>) {
        unsafe { T::iterator_delete(ptr.as_ptr()) }
    }
}

/// Lazy, forward-only iterator over the elements of a [`Sequence`].
///
/// The native cursor is deleted exactly once: as soon as the cursor reports no more
/// elements, or when the iterator is dropped, whichever happens first. Dropping the
/// iterator half way through is the way to stop early.
pub struct ForeignIterator<'a, T: SequenceElement> {
    cursor: Handle<CursorKind<T>>,
    _sequence: PhantomData<&'a Sequence<T>>,
}

impl<'a, T: SequenceElement> ForeignIterator<'a, T> {
    pub(super) fn new(cursor: Handle<CursorKind<T>>) -> Self {
        ForeignIterator {
            cursor,
            _sequence: PhantomData,
        }
    }

    /// Returns `true` once the native cursor has been deleted.
    pub fn is_disposed(&self) -> bool {
        self.cursor.is_released()
    }
}

impl<T: SequenceElement> Iterator for ForeignIterator<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let cursor = self.cursor.as_ptr().ok()?.as_ptr();
        if unsafe { T::iterator_has_next(cursor) } {
            Some(unsafe { T::iterator_next(cursor) })
        } else {
            self.cursor.release();
            None
        }
    }
}

impl<T: SequenceElement> FusedIterator for ForeignIterator<'_, T> {}
