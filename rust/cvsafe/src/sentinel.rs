//! Process-wide "no resource" stand-ins.
//!
//! Each resource kind has one null instance, created lazily on first use and shared
//! by every thread. Null instances never own a native object, so releasing one is a
//! no-op. Public APIs take `Option<&Mat>` for optional arguments; the conversion to a
//! null native pointer happens only right before the native call.

use std::ptr;

use cvsafe_common::Result;
use cvsafe_sys::CvMat;

use crate::mat::Mat;

/// Wrapper that lets a null resource live in a `static`.
pub struct Sentinel<T>(T);

impl<T> Sentinel<T> {
    /// Callers must pass a value that holds no native pointer and no shared state.
    pub(crate) const fn new(value: T) -> Self {
        Sentinel(value)
    }

    pub fn get(&self) -> &T {
        &self.0
    }
}

// SAFETY: sentinels only ever wrap null resources. A null resource carries no
// pointer and no reference count, and every operation on it either fails or does
// nothing without mutating state.
unsafe impl<T> Sync for Sentinel<T> {}
unsafe impl<T> Send for Sentinel<T> {}

/// Translates an optional matrix argument into the pointer a native call expects.
///
/// `None` and the null matrix both become a null pointer. A released matrix is an
/// error rather than a silent "absent" argument.
pub fn raw_or_null(mat: Option<&Mat>) -> Result<*const CvMat> {
    match mat {
        Some(mat) if !mat.is_null() => Ok(mat.raw()?.cast_const()),
        _ => Ok(ptr::null()),
    }
}
