//! Two-dimensional matrices backed by native storage.
//!
//! A [`Mat`] is a cheaply clonable, single-threaded handle to a native matrix header.
//! Headers either own their element storage (matrices made by [`Mat::new`] and
//! friends) or alias the storage of another matrix (views, see [`crate::view`]). A
//! view keeps its owner alive through a strong reference, so the owner's storage
//! cannot go away while any view over it is reachable.

use std::fmt;
use std::ptr::NonNull;
use std::rc::Rc;
use std::sync::OnceLock;

use cvsafe_common::{Result, error::Error, verify_arg};
use cvsafe_common_traits::data_owner::{DataOwner, DataRegion};
use cvsafe_sys::{
    CV_AUTOSTEP, CV_CN_MAX, CvMat, cv_clone_mat, cv_create_mat, cv_create_mat_header,
    cv_elem_size, cv_get_real_2d, cv_init_mat_header, cv_make_type, cv_mat_channels,
    cv_mat_depth, cv_release_mat, cv_set, cv_set_real_2d, cv_set_zero,
};

use crate::handle::{Handle, ResourceKind};
use crate::sentinel::{self, Sentinel};
use crate::status::{check, to_c_int};
use crate::types::{Depth, MatElement, Scalar, Size};

/// Native matrix header, destroyed with `cv_release_mat`.
pub struct MatHeaderKind;

unsafe impl ResourceKind for MatHeaderKind {
    type Raw = CvMat;
    const NAME: &'static str = "Mat";

    unsafe fn destroy(ptr: NonNull<CvMat>) {
        let mut raw = ptr.as_ptr();
        unsafe { cv_release_mat(&mut raw) };
    }
}

pub(crate) struct MatCore {
    header: Handle<MatHeaderKind>,
    /// Set for views; keeps the matrix whose storage `header` points into alive.
    owner: Option<Mat>,
}

impl Drop for MatCore {
    fn drop(&mut self) {
        // The header goes first; the owner may only be let go once nothing points
        // into its storage anymore.
        self.header.release();
        self.owner = None;
    }
}

#[derive(Clone)]
enum MatRepr {
    Shared(Rc<MatCore>),
    Null,
    Released,
}

#[derive(Clone)]
pub struct Mat {
    repr: MatRepr,
}

impl Mat {
    /// Allocates a zero-filled `rows` x `cols` matrix with `channels` values of type
    /// `depth` per element.
    pub fn new(rows: usize, cols: usize, depth: Depth, channels: usize) -> Result<Mat> {
        verify_arg!(channels, (1..=CV_CN_MAX as usize).contains(&channels));
        let type_ = cv_make_type(depth.code(), channels as i32);
        let raw = cv_create_mat(to_c_int(rows, "rows")?, to_c_int(cols, "cols")?, type_);
        let header = unsafe { Handle::acquire(raw)? };
        Ok(Mat::from_core(MatCore {
            header,
            owner: None,
        }))
    }

    /// Creates a single-channel matrix holding a copy of `data`, laid out row by row.
    ///
    /// The native side sees `data` only through a temporary header that is released
    /// before this function returns.
    pub fn from_slice<T: MatElement>(rows: usize, cols: usize, data: &[T]) -> Result<Mat> {
        let required = rows
            .checked_mul(cols)
            .ok_or_else(|| Error::out_of_range("from_slice", "rows * cols overflows"))?;
        if data.len() != required {
            return Err(Error::size_mismatch(required, data.len()));
        }

        let (rows, cols) = (to_c_int(rows, "rows")?, to_c_int(cols, "cols")?);
        let type_ = cv_make_type(T::DEPTH.code(), 1);
        let temp =
            unsafe { Handle::<MatHeaderKind>::acquire(cv_create_mat_header(rows, cols, type_))? };
        let status = unsafe {
            cv_init_mat_header(
                temp.as_ptr()?.as_ptr(),
                rows,
                cols,
                type_,
                data.as_ptr().cast::<u8>().cast_mut(),
                CV_AUTOSTEP,
            )
        };
        check(status, "cv_init_mat_header")?;

        let header = unsafe { Handle::acquire(cv_clone_mat(temp.as_ptr()?.as_ptr()))? };
        Ok(Mat::from_core(MatCore {
            header,
            owner: None,
        }))
    }

    /// The shared "no matrix" instance. It never owns native memory.
    pub fn null() -> &'static Mat {
        static NULL: OnceLock<Sentinel<Mat>> = OnceLock::new();
        NULL.get_or_init(|| Sentinel::new(Mat { repr: MatRepr::Null }))
            .get()
    }

    /// Creates a view matrix from a header computed against `owner`'s storage.
    pub(crate) fn alias(owner: &Mat, region: &CvMat) -> Result<Mat> {
        let raw = cv_create_mat_header(region.rows, region.cols, region.type_);
        let header = unsafe { Handle::<MatHeaderKind>::acquire(raw)? };
        let status = unsafe {
            cv_init_mat_header(
                header.as_ptr()?.as_ptr(),
                region.rows,
                region.cols,
                region.type_,
                region.data,
                region.step,
            )
        };
        check(status, "cv_init_mat_header")?;
        Ok(Mat::from_core(MatCore {
            header,
            owner: Some(owner.clone()),
        }))
    }

    fn from_core(core: MatCore) -> Mat {
        Mat {
            repr: MatRepr::Shared(Rc::new(core)),
        }
    }

    fn core(&self) -> Result<&MatCore> {
        match &self.repr {
            MatRepr::Shared(core) => Ok(core),
            MatRepr::Null => Err(Error::invalid_handle(MatHeaderKind::NAME)),
            MatRepr::Released => Err(Error::already_released(MatHeaderKind::NAME)),
        }
    }

    pub(crate) fn raw(&self) -> Result<*mut CvMat> {
        Ok(self.core()?.header.as_ptr()?.as_ptr())
    }

    /// Copy of the native header fields.
    pub(crate) fn header(&self) -> Result<CvMat> {
        let raw = self.raw()?;
        Ok(unsafe { *raw })
    }

    /// Returns `true` if both handles refer to the same native header.
    pub fn ptr_eq(a: &Mat, b: &Mat) -> bool {
        match (&a.repr, &b.repr) {
            (MatRepr::Shared(a), MatRepr::Shared(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Returns `true` for the null matrix.
    pub fn is_null(&self) -> bool {
        matches!(self.repr, MatRepr::Null)
    }

    /// Returns `true` if this handle cannot be used: null or released.
    pub fn is_invalid(&self) -> bool {
        !matches!(self.repr, MatRepr::Shared(_))
    }

    pub fn is_released(&self) -> bool {
        matches!(self.repr, MatRepr::Released)
    }

    /// The matrix whose storage this view aliases, or `None` for matrices that own
    /// their storage.
    pub fn owner(&self) -> Option<&Mat> {
        match &self.repr {
            MatRepr::Shared(core) => core.owner.as_ref(),
            _ => None,
        }
    }

    pub fn is_view(&self) -> bool {
        self.owner().is_some()
    }

    /// Lets go of this handle.
    ///
    /// The native header is destroyed once the last clone of the handle is released
    /// or dropped; a view also drops its owner reference at that point. Calling
    /// `release` again, or on the null matrix, does nothing.
    pub fn release(&mut self) {
        match std::mem::replace(&mut self.repr, MatRepr::Released) {
            MatRepr::Shared(core) => {
                let remaining = Rc::strong_count(&core) - 1;
                if remaining > 0 {
                    log::debug!("Mat header release deferred: {remaining} handles remain");
                }
            }
            MatRepr::Null => self.repr = MatRepr::Null,
            MatRepr::Released => {}
        }
    }

    pub fn rows(&self) -> Result<usize> {
        Ok(self.header()?.rows as usize)
    }

    pub fn cols(&self) -> Result<usize> {
        Ok(self.header()?.cols as usize)
    }

    /// Distance between consecutive rows, in bytes.
    pub fn step(&self) -> Result<usize> {
        Ok(self.header()?.step as usize)
    }

    pub fn size(&self) -> Result<Size> {
        let header = self.header()?;
        Ok(Size {
            width: header.cols as usize,
            height: header.rows as usize,
        })
    }

    pub fn depth(&self) -> Result<Depth> {
        Depth::from_code(cv_mat_depth(self.header()?.type_))
    }

    pub fn channels(&self) -> Result<usize> {
        Ok(cv_mat_channels(self.header()?.type_) as usize)
    }

    /// Size of one element in bytes, all channels included.
    pub fn elem_size(&self) -> Result<usize> {
        Ok(cv_elem_size(self.header()?.type_) as usize)
    }

    /// Storage geometry as seen by the native engine.
    pub fn region(&self) -> Result<DataRegion> {
        let header = self.header()?;
        Ok(region_of(&header))
    }

    /// Allocates an independent, tightly packed copy of this matrix.
    pub fn deep_copy(&self) -> Result<Mat> {
        let raw = unsafe { cv_clone_mat(self.raw()?) };
        let header = unsafe { Handle::acquire(raw)? };
        Ok(Mat::from_core(MatCore {
            header,
            owner: None,
        }))
    }

    /// Reads element (`row`, `col`) of a single-channel matrix.
    pub fn get_real(&self, row: usize, col: usize) -> Result<f64> {
        let raw = self.raw()?;
        let mut value = 0.0;
        let status = unsafe {
            cv_get_real_2d(
                raw,
                to_c_int(row, "row")?,
                to_c_int(col, "col")?,
                &mut value,
            )
        };
        check(status, "cv_get_real_2d")?;
        Ok(value)
    }

    /// Writes element (`row`, `col`) of a single-channel matrix. Integer depths round
    /// to the nearest value and saturate.
    pub fn set_real(&self, row: usize, col: usize, value: f64) -> Result<()> {
        let raw = self.raw()?;
        let status =
            unsafe { cv_set_real_2d(raw, to_c_int(row, "row")?, to_c_int(col, "col")?, value) };
        check(status, "cv_set_real_2d")
    }

    /// Assigns `value` to every element, or only to those selected by a non-zero
    /// byte in `mask` (an 8-bit single-channel matrix of the same size).
    pub fn set(&self, value: Scalar, mask: Option<&Mat>) -> Result<()> {
        let raw = self.raw()?;
        let mask = sentinel::raw_or_null(mask)?;
        let status = unsafe { cv_set(raw, value.into(), mask) };
        check(status, "cv_set")
    }

    pub fn set_zero(&self) -> Result<()> {
        let status = unsafe { cv_set_zero(self.raw()?) };
        check(status, "cv_set_zero")
    }

    /// Copies all channel values, row by row, into the front of `dst`.
    ///
    /// `T` must match the matrix depth. Fails with `SizeMismatch` if `dst` is too
    /// small.
    pub fn copy_to<T: MatElement>(&self, dst: &mut [T]) -> Result<()> {
        let depth = self.depth()?;
        if depth != T::DEPTH {
            return Err(Error::invalid_arg(
                "T",
                format!("element type does not match matrix depth {depth:?}"),
            ));
        }
        let region = self
            .data_region()
            .ok_or_else(|| Error::invalid_handle(MatHeaderKind::NAME))?;
        let required = region.len() * self.channels()?;
        if dst.len() < required {
            return Err(Error::size_mismatch(required, dst.len()));
        }
        let bytes: &mut [u8] = bytemuck::cast_slice_mut(&mut dst[..required]);
        unsafe { region.copy_packed(bytes) };
        Ok(())
    }

    pub fn to_vec<T: MatElement>(&self) -> Result<Vec<T>> {
        let len = self.rows()? * self.cols()? * self.channels()?;
        let mut values = vec![<T as bytemuck::Zeroable>::zeroed(); len];
        self.copy_to(&mut values)?;
        Ok(values)
    }
}

pub(crate) fn region_of(header: &CvMat) -> DataRegion {
    DataRegion {
        ptr: header.data.cast_const(),
        rows: header.rows as usize,
        cols: header.cols as usize,
        step: header.step as usize,
        elem_type: header.type_,
        elem_size: cv_elem_size(header.type_) as usize,
    }
}

// SAFETY: a live header describes `rows` rows of `step` bytes with at least
// `cols * elem_size` readable bytes each; views keep their owner's storage alive.
unsafe impl DataOwner for Mat {
    fn data_region(&self) -> Option<DataRegion> {
        self.region().ok()
    }
}

impl fmt::Debug for Mat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.repr {
            MatRepr::Null => f.write_str("Mat(null)"),
            MatRepr::Released => f.write_str("Mat(released)"),
            MatRepr::Shared(core) => {
                let mut s = f.debug_struct("Mat");
                if let Ok(header) = self.header() {
                    s.field("rows", &header.rows)
                        .field("cols", &header.cols)
                        .field("type", &header.type_)
                        .field("step", &header.step);
                }
                s.field("view", &core.owner.is_some()).finish()
            }
        }
    }
}
