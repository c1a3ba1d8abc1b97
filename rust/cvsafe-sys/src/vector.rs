//! Growable element sequences and forward cursors over them.
//!
//! The same nine entry points are exported for every supported element type:
//! `cv_vector_<name>_{new, new_array, size, copy, iterator_new, iterator_has_next,
//! iterator_next, iterator_delete, delete}`. Every entry point tolerates null handles,
//! turning them into a no-op or an empty result.

#![allow(improper_ctypes_definitions, non_snake_case)]

use std::ptr;

use bytemuck::Zeroable;

use crate::counters::bump;
use crate::types::{CvDMatch, CvKeyPoint, CvPoint2f};

/// Engine-side sequence. Opaque to callers.
pub struct CvVector<T>(Vec<T>);

/// Engine-side forward cursor over a [`CvVector`]. Opaque to callers.
///
/// The cursor borrows the vector storage: the vector must outlive the cursor.
#[repr(C)]
pub struct CvVectorIterator<T> {
    current: *const T,
    end: *const T,
}

fn vector_new<T>() -> *mut CvVector<T> {
    bump(|c| c.vectors_created += 1);
    Box::into_raw(Box::new(CvVector(Vec::new())))
}

unsafe fn vector_new_array<T: Copy>(data: *const T, length: usize) -> *mut CvVector<T> {
    let items = if data.is_null() || length == 0 {
        Vec::new()
    } else {
        unsafe { std::slice::from_raw_parts(data, length) }.to_vec()
    };
    bump(|c| c.vectors_created += 1);
    Box::into_raw(Box::new(CvVector(items)))
}

unsafe fn vector_size<T>(vector: *const CvVector<T>) -> usize {
    unsafe { vector.as_ref() }.map_or(0, |v| v.0.len())
}

unsafe fn vector_copy<T: Copy>(vector: *const CvVector<T>, data: *mut T) {
    let Some(vector) = (unsafe { vector.as_ref() }) else {
        return;
    };
    if data.is_null() || vector.0.is_empty() {
        return;
    }
    unsafe { ptr::copy_nonoverlapping(vector.0.as_ptr(), data, vector.0.len()) };
}

unsafe fn iterator_new<T>(vector: *const CvVector<T>) -> *mut CvVectorIterator<T> {
    let Some(vector) = (unsafe { vector.as_ref() }) else {
        return ptr::null_mut();
    };
    let range = vector.0.as_ptr_range();
    bump(|c| c.iterators_created += 1);
    Box::into_raw(Box::new(CvVectorIterator {
        current: range.start,
        end: range.end,
    }))
}

unsafe fn iterator_has_next<T>(iterator: *const CvVectorIterator<T>) -> bool {
    unsafe { iterator.as_ref() }.is_some_and(|it| it.current != it.end)
}

/// Yields the element under the cursor and advances it, or a zeroed value once the
/// cursor is exhausted.
unsafe fn iterator_next<T: Copy + Zeroable>(iterator: *mut CvVectorIterator<T>) -> T {
    let Some(it) = (unsafe { iterator.as_mut() }) else {
        return T::zeroed();
    };
    if it.current == it.end {
        return T::zeroed();
    }
    let item = unsafe { it.current.read() };
    it.current = unsafe { it.current.add(1) };
    item
}

unsafe fn iterator_delete<T>(iterator: *mut CvVectorIterator<T>) {
    if iterator.is_null() {
        return;
    }
    drop(unsafe { Box::from_raw(iterator) });
    bump(|c| c.iterators_released += 1);
}

unsafe fn vector_delete<T>(vector: *mut CvVector<T>) {
    if vector.is_null() {
        return;
    }
    drop(unsafe { Box::from_raw(vector) });
    bump(|c| c.vectors_released += 1);
}

macro_rules! vector {
    ($ty:ty, $name:ident) => {
        paste::paste! {
            #[doc = concat!("Creates an empty `", stringify!($name), "` sequence.")]
            #[unsafe(no_mangle)]
            pub extern "C" fn [<cv_vector_ $name _new>]() -> *mut CvVector<$ty> {
                vector_new()
            }

            #[doc = concat!("Creates a `", stringify!($name), "` sequence holding a copy of `length` elements read from `data`.")]
            ///
            /// # Safety
            ///
            /// `data` must be null or valid for reads of `length` elements.
            #[unsafe(no_mangle)]
            pub unsafe extern "C" fn [<cv_vector_ $name _new_array>](
                data: *const $ty,
                length: usize,
            ) -> *mut CvVector<$ty> {
                unsafe { vector_new_array(data, length) }
            }

            /// Returns the current element count, or `0` for a null handle.
            ///
            /// # Safety
            ///
            /// `vector` must be null or a live handle from this library.
            #[unsafe(no_mangle)]
            pub unsafe extern "C" fn [<cv_vector_ $name _size>](vector: *const CvVector<$ty>) -> usize {
                unsafe { vector_size(vector) }
            }

            /// Copies every element into `data`.
            ///
            /// # Safety
            ///
            /// `vector` must be null or a live handle; `data` must be null or valid for
            /// writes of the current element count.
            #[unsafe(no_mangle)]
            pub unsafe extern "C" fn [<cv_vector_ $name _copy>](vector: *const CvVector<$ty>, data: *mut $ty) {
                unsafe { vector_copy(vector, data) }
            }

            /// Opens a cursor positioned at the first element.
            ///
            /// # Safety
            ///
            /// `vector` must be null or a live handle that outlives the cursor.
            #[unsafe(no_mangle)]
            pub unsafe extern "C" fn [<cv_vector_ $name _iterator_new>](
                vector: *const CvVector<$ty>,
            ) -> *mut CvVectorIterator<$ty> {
                unsafe { iterator_new(vector) }
            }

            /// # Safety
            ///
            /// `iterator` must be null or a live cursor.
            #[unsafe(no_mangle)]
            pub unsafe extern "C" fn [<cv_vector_ $name _iterator_has_next>](
                iterator: *const CvVectorIterator<$ty>,
            ) -> bool {
                unsafe { iterator_has_next(iterator) }
            }

            /// # Safety
            ///
            /// `iterator` must be null or a live cursor.
            #[unsafe(no_mangle)]
            pub unsafe extern "C" fn [<cv_vector_ $name _iterator_next>](
                iterator: *mut CvVectorIterator<$ty>,
            ) -> $ty {
                unsafe { iterator_next(iterator) }
            }

            /// # Safety
            ///
            /// `iterator` must be null or a live cursor; it is dangling afterwards.
            #[unsafe(no_mangle)]
            pub unsafe extern "C" fn [<cv_vector_ $name _iterator_delete>](
                iterator: *mut CvVectorIterator<$ty>,
            ) {
                unsafe { iterator_delete(iterator) }
            }

            /// # Safety
            ///
            /// `vector` must be null or a live handle with no open cursors; it is
            /// dangling afterwards.
            #[unsafe(no_mangle)]
            pub unsafe extern "C" fn [<cv_vector_ $name _delete>](vector: *mut CvVector<$ty>) {
                unsafe { vector_delete(vector) }
            }
        }
    };
}

vector!(i32, int);
vector!(u8, char);
vector!(CvPoint2f, Point2f);
vector!(CvKeyPoint, KeyPoint);
vector!(CvDMatch, DMatch);
