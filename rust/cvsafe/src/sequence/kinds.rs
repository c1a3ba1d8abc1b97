//! Element kinds with a native vector implementation.

use std::sync::OnceLock;

use cvsafe_sys::{CvDMatch, CvKeyPoint, CvPoint2f, CvVector, CvVectorIterator};

use crate::sentinel::Sentinel;
use crate::types::{DMatch, KeyPoint, Point2f};

use super::{Sequence, SequenceElement};

/// Implements [`SequenceElement`] for `$elem`, forwarding to the native
/// `cv_vector_$name_*` entry points that operate on `$foreign`.
macro_rules! sequence_element {
    ($elem:ty, $foreign:ty, $name:ident) => {
        const _: () = {
            assert!(size_of::<$elem>() == size_of::<$foreign>());
            assert!(align_of::<$elem>() == align_of::<$foreign>());
        };

        paste::paste! {
            unsafe impl SequenceElement for $elem {
                type Vector = CvVector<$foreign>;
                type Cursor = CvVectorIterator<$foreign>;

                const SEQUENCE_NAME: &'static str = concat!(stringify!($name), " sequence");
                const CURSOR_NAME: &'static str = concat!(stringify!($name), " iterator");

                unsafe fn vector_new() -> *mut Self::Vector {
                    cvsafe_sys::[<cv_vector_ $name _new>]()
                }

                unsafe fn vector_new_array(data: *const Self, len: usize) -> *mut Self::Vector {
                    unsafe { cvsafe_sys::[<cv_vector_ $name _new_array>](data.cast(), len) }
                }

                unsafe fn vector_size(vector: *const Self::Vector) -> usize {
                    unsafe { cvsafe_sys::[<cv_vector_ $name _size>](vector) }
                }

                unsafe fn vector_copy(vector: *const Self::Vector, data: *mut Self) {
                    unsafe { cvsafe_sys::[<cv_vector_ $name _copy>](vector, data.cast()) }
                }

                unsafe fn vector_delete(vector: *mut Self::Vector) {
                    unsafe { cvsafe_sys::[<cv_vector_ $name _delete>](vector) }
                }

                unsafe fn iterator_new(vector: *const Self::Vector) -> *mut Self::Cursor {
                    unsafe { cvsafe_sys::[<cv_vector_ $name _iterator_new>](vector) }
                }

                unsafe fn iterator_has_next(cursor: *const Self::Cursor) -> bool {
                    unsafe { cvsafe_sys::[<cv_vector_ $name _iterator_has_next>](cursor) }
                }

                unsafe fn iterator_next(cursor: *mut Self::Cursor) -> Self {
                    let item = unsafe { cvsafe_sys::[<cv_vector_ $name _iterator_next>](cursor) };
                    bytemuck::cast(item)
                }

                unsafe fn iterator_delete(cursor: *mut Self::Cursor) {
                    unsafe { cvsafe_sys::[<cv_vector_ $name _iterator_delete>](cursor) }
                }

                fn null_sequence() -> &'static Sequence<Self> {
                    static NULL: OnceLock<Sentinel<Sequence<$elem>>> = OnceLock::new();
                    NULL.get_or_init(|| Sentinel::new(Sequence::null_handle())).get()
                }
            }
        }
    };
}

sequence_element!(i32, i32, int);
sequence_element!(u8, u8, char);
sequence_element!(Point2f, CvPoint2f, Point2f);
sequence_element!(KeyPoint, CvKeyPoint, KeyPoint);
sequence_element!(DMatch, CvDMatch, DMatch);
