//! Matrix headers and the element storage they describe.
//!
//! A header created by [`cv_create_mat`] owns a reference-counted data block; headers
//! produced by [`cv_create_mat_header`] own nothing but themselves. Region calls
//! (`cv_get_sub_rect`, `cv_get_rows`, ...) fill a caller-provided header that aliases
//! the source storage: no element data is ever duplicated by them.

use std::cmp::min;
use std::ptr;

use libc::c_int;

use crate::counters::bump;
use crate::status::*;
use crate::types::*;

/// Heap block backing the elements of a matrix created by [`cv_create_mat`].
///
/// `refcount` must stay the first field: headers point at it directly.
#[repr(C)]
struct DataBlock {
    refcount: c_int,
    storage: Vec<u64>,
}

type Status<T> = Result<T, c_int>;

fn finish(result: Status<CvMat>, out: *mut CvMat) -> c_int {
    match result {
        Ok(header) => {
            unsafe { *out = header };
            CV_STS_OK
        }
        Err(status) => status,
    }
}

fn alloc_header(header: CvMat) -> *mut CvMat {
    bump(|c| c.mat_headers_created += 1);
    Box::into_raw(Box::new(header))
}

fn valid_dims(rows: c_int, cols: c_int, type_: c_int) -> bool {
    rows >= 0 && cols >= 0 && cv_is_valid_type(type_)
}

fn packed_step(cols: c_int, type_: c_int) -> Option<c_int> {
    cols.checked_mul(cv_elem_size(type_))
}

/// Resolves the source and output pointers of a region call.
///
/// # Safety
///
/// `src` must be null or point to a live header.
unsafe fn region_source<'a>(src: *const CvMat, out: *mut CvMat) -> Status<&'a CvMat> {
    if src.is_null() || out.is_null() {
        return Err(CV_STS_NULL_PTR);
    }
    Ok(unsafe { &*src })
}

/// Builds a header that aliases `src` storage starting `offset` bytes past its data
/// pointer. The pointer is never dereferenced for zero-sized regions, so wrapping
/// arithmetic is used to stay clear of out-of-allocation offsets.
///
/// Fails with `CV_STS_BAD_SIZE` if the extent or the step does not fit a header field.
fn alias(
    src: &CvMat,
    offset: i64,
    rows: i64,
    cols: i64,
    step: i64,
    type_: c_int,
) -> Status<CvMat> {
    let narrow = |value: i64| c_int::try_from(value).map_err(|_| CV_STS_BAD_SIZE);
    Ok(CvMat {
        type_,
        step: narrow(step)?,
        refcount: ptr::null_mut(),
        data: src.data.wrapping_add(offset as usize),
        rows: narrow(rows)?,
        cols: narrow(cols)?,
    })
}

/// Allocates a header without element storage.
///
/// Returns null if the dimensions or the type are invalid.
#[unsafe(no_mangle)]
pub extern "C" fn cv_create_mat_header(rows: c_int, cols: c_int, type_: c_int) -> *mut CvMat {
    if !valid_dims(rows, cols, type_) {
        return ptr::null_mut();
    }
    let Some(step) = packed_step(cols, type_) else {
        return ptr::null_mut();
    };
    alloc_header(CvMat {
        type_,
        step,
        refcount: ptr::null_mut(),
        data: ptr::null_mut(),
        rows,
        cols,
    })
}

/// Allocates a header together with zero-initialized element storage.
///
/// Returns null if the dimensions or the type are invalid.
#[unsafe(no_mangle)]
pub extern "C" fn cv_create_mat(rows: c_int, cols: c_int, type_: c_int) -> *mut CvMat {
    if !valid_dims(rows, cols, type_) {
        return ptr::null_mut();
    }
    let Some(step) = packed_step(cols, type_) else {
        return ptr::null_mut();
    };
    let Some(total) = (step as usize).checked_mul(rows as usize) else {
        return ptr::null_mut();
    };

    let block = Box::into_raw(Box::new(DataBlock {
        refcount: 1,
        storage: vec![0u64; total.div_ceil(8)],
    }));
    bump(|c| c.data_blocks_created += 1);
    let data = unsafe { (*block).storage.as_mut_ptr().cast::<u8>() };

    alloc_header(CvMat {
        type_,
        step,
        refcount: block.cast::<c_int>(),
        data,
        rows,
        cols,
    })
}

/// Points an existing header at caller-provided element storage.
///
/// `step` may be [`CV_AUTOSTEP`] for tightly packed rows.
///
/// # Safety
///
/// `mat` must be null or a header returned by [`cv_create_mat_header`]. `data` must
/// stay valid for as long as the header is used to access elements.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn cv_init_mat_header(
    mat: *mut CvMat,
    rows: c_int,
    cols: c_int,
    type_: c_int,
    data: *mut u8,
    step: c_int,
) -> c_int {
    if mat.is_null() {
        return CV_STS_NULL_PTR;
    }
    if !valid_dims(rows, cols, type_) {
        return CV_STS_BAD_ARG;
    }
    let Some(min_step) = packed_step(cols, type_) else {
        return CV_STS_BAD_SIZE;
    };
    let step = if step == CV_AUTOSTEP { min_step } else { step };
    if step < min_step && rows > 1 {
        return CV_STS_BAD_SIZE;
    }

    let header = unsafe { &mut *mat };
    if !header.refcount.is_null() {
        // The header owns a data block; re-pointing it would leak that block.
        return CV_STS_BAD_ARG;
    }
    header.type_ = type_;
    header.rows = rows;
    header.cols = cols;
    header.step = step;
    header.data = data;
    CV_STS_OK
}

/// Releases a header and, if it holds the last reference, its data block.
///
/// The pointed-to header pointer is reset to null. Passing a null pointer, or a
/// pointer to a null header, is a no-op.
///
/// # Safety
///
/// `*mat` must be null or a header returned by this library that has not been
/// released yet.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn cv_release_mat(mat: *mut *mut CvMat) {
    if mat.is_null() {
        return;
    }
    let header = unsafe { *mat };
    if header.is_null() {
        return;
    }
    unsafe { *mat = ptr::null_mut() };

    let header = unsafe { Box::from_raw(header) };
    if !header.refcount.is_null() {
        let block = header.refcount.cast::<DataBlock>();
        unsafe {
            (*block).refcount -= 1;
            if (*block).refcount <= 0 {
                drop(Box::from_raw(block));
                bump(|c| c.data_blocks_released += 1);
            }
        }
    }
    bump(|c| c.mat_headers_released += 1);
}

/// Allocates a new matrix holding a packed copy of `src` elements.
///
/// # Safety
///
/// `src` must be null or point to a live header whose data covers its extent.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn cv_clone_mat(src: *const CvMat) -> *mut CvMat {
    if src.is_null() {
        return ptr::null_mut();
    }
    let src = unsafe { &*src };
    let dst = cv_create_mat(src.rows, src.cols, src.type_);
    if dst.is_null() {
        return dst;
    }

    let row_bytes = src.cols as usize * cv_elem_size(src.type_) as usize;
    if row_bytes > 0 && src.rows > 0 {
        if src.data.is_null() {
            let mut dst = dst;
            unsafe { cv_release_mat(&mut dst) };
            return ptr::null_mut();
        }
        let dst_ref = unsafe { &*dst };
        for row in 0..src.rows as usize {
            unsafe {
                ptr::copy_nonoverlapping(
                    src.data.add(row * src.step as usize),
                    dst_ref.data.add(row * dst_ref.step as usize),
                    row_bytes,
                );
            }
        }
    }
    dst
}

/// Fills `out` with a header over the rectangle `rect` of `src`.
///
/// # Safety
///
/// `src` must be null or point to a live header; `out` must be null or writable.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn cv_get_sub_rect(src: *const CvMat, out: *mut CvMat, rect: CvRect) -> c_int {
    let result = unsafe { region_source(src, out) }.and_then(|src| {
        let (x, y, w, h) = (
            rect.x as i64,
            rect.y as i64,
            rect.width as i64,
            rect.height as i64,
        );
        if x < 0 || y < 0 || w < 0 || h < 0 || x + w > src.cols as i64 || y + h > src.rows as i64
        {
            return Err(CV_STS_OUT_OF_RANGE);
        }
        let elem = cv_elem_size(src.type_) as i64;
        let offset = y * src.step as i64 + x * elem;
        alias(src, offset, h, w, src.step as i64, src.type_)
    });
    finish(result, out)
}

/// Fills `out` with a header over rows `start..end` of `src`, taking every
/// `delta`-th row.
///
/// # Safety
///
/// `src` must be null or point to a live header; `out` must be null or writable.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn cv_get_rows(
    src: *const CvMat,
    out: *mut CvMat,
    start: c_int,
    end: c_int,
    delta: c_int,
) -> c_int {
    let result = unsafe { region_source(src, out) }.and_then(|src| {
        if start < 0 || start > end || end > src.rows || delta < 1 {
            return Err(CV_STS_OUT_OF_RANGE);
        }
        let (start, end, delta) = (start as i64, end as i64, delta as i64);
        let rows = (end - start + delta - 1) / delta;
        let step = src.step as i64 * delta;
        let offset = start * src.step as i64;
        alias(src, offset, rows, src.cols as i64, step, src.type_)
    });
    finish(result, out)
}

/// Fills `out` with a header over columns `start..end` of `src`.
///
/// # Safety
///
/// `src` must be null or point to a live header; `out` must be null or writable.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn cv_get_cols(
    src: *const CvMat,
    out: *mut CvMat,
    start: c_int,
    end: c_int,
) -> c_int {
    let result = unsafe { region_source(src, out) }.and_then(|src| {
        if start < 0 || start > end || end > src.cols {
            return Err(CV_STS_OUT_OF_RANGE);
        }
        let elem = cv_elem_size(src.type_) as i64;
        let offset = start as i64 * elem;
        alias(
            src,
            offset,
            src.rows as i64,
            (end - start) as i64,
            src.step as i64,
            src.type_,
        )
    });
    finish(result, out)
}

/// Fills `out` with a single-column header over a diagonal of `src`.
///
/// Zero selects the main diagonal, positive values select diagonals below it and
/// negative values diagonals above it.
///
/// # Safety
///
/// `src` must be null or point to a live header; `out` must be null or writable.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn cv_get_diag(src: *const CvMat, out: *mut CvMat, diag: c_int) -> c_int {
    let result = unsafe { region_source(src, out) }.and_then(|src| {
        let pix = cv_elem_size(src.type_) as i64;
        let (rows, cols, step, diag) = (
            src.rows as i64,
            src.cols as i64,
            src.step as i64,
            diag as i64,
        );
        let (len, offset) = if diag >= 0 {
            (min(cols, rows - diag), diag * step)
        } else {
            (min(rows, cols + diag), -diag * pix)
        };
        if len <= 0 {
            return Err(CV_STS_OUT_OF_RANGE);
        }
        let diag_step = step + if len > 1 { pix } else { 0 };
        alias(src, offset, len, 1, diag_step, src.type_)
    });
    finish(result, out)
}

/// Fills `out` with a header that views `src` with a different channel count and/or
/// number of rows. Zero keeps the current value.
///
/// # Safety
///
/// `src` must be null or point to a live header; `out` must be null or writable.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn cv_reshape(
    src: *const CvMat,
    out: *mut CvMat,
    new_cn: c_int,
    new_rows: c_int,
) -> c_int {
    let result = unsafe { region_source(src, out) }.and_then(|src| {
        let depth = cv_mat_depth(src.type_);
        let cn = cv_mat_channels(src.type_);
        let new_cn = if new_cn == 0 { cn } else { new_cn };
        if !(1..=CV_CN_MAX).contains(&new_cn) {
            return Err(CV_STS_BAD_ARG);
        }
        if new_rows < 0 {
            return Err(CV_STS_OUT_OF_RANGE);
        }

        let mut total_width = src.cols as i64 * cn as i64;
        let mut rows = src.rows as i64;
        let mut step = src.step as i64;
        if new_rows != 0 && new_rows as i64 != rows {
            let row_bytes = src.cols as i64 * cv_elem_size(src.type_) as i64;
            if rows > 1 && step != row_bytes {
                // Only continuous storage can be re-split into a different row count.
                return Err(CV_STS_BAD_ARG);
            }
            let total = total_width * rows;
            if total % new_rows as i64 != 0 {
                return Err(CV_STS_BAD_SIZE);
            }
            total_width = total / new_rows as i64;
            rows = new_rows as i64;
            step = total_width * cv_depth_size(depth) as i64;
        }

        let new_cols = total_width / new_cn as i64;
        if new_cols * new_cn as i64 != total_width {
            return Err(CV_STS_BAD_SIZE);
        }
        alias(
            src,
            0,
            rows,
            new_cols,
            step,
            cv_make_type(depth, new_cn),
        )
    });
    finish(result, out)
}

/// Fills `out` with a header that reinterprets the bytes of `src` as elements of
/// another depth, keeping the channel count and the row byte-width.
///
/// # Safety
///
/// `src` must be null or point to a live header; `out` must be null or writable.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn cv_reinterpret(src: *const CvMat, out: *mut CvMat, depth: c_int) -> c_int {
    let result = unsafe { region_source(src, out) }.and_then(|src| {
        let depth_size = cv_depth_size(depth) as i64;
        if depth_size == 0 {
            return Err(CV_STS_BAD_ARG);
        }
        let cn = cv_mat_channels(src.type_);
        let row_bytes = src.cols as i64 * cv_elem_size(src.type_) as i64;
        let new_elem = depth_size * cn as i64;
        if row_bytes % new_elem != 0 {
            return Err(CV_STS_BAD_SIZE);
        }
        if (src.data as usize as i64) % depth_size != 0
            || (src.rows > 1 && src.step as i64 % depth_size != 0)
        {
            return Err(CV_STS_UNMATCHED_FORMATS);
        }
        alias(
            src,
            0,
            src.rows as i64,
            row_bytes / new_elem,
            src.step as i64,
            cv_make_type(depth, cn),
        )
    });
    finish(result, out)
}

unsafe fn element_ptr(mat: &CvMat, row: c_int, col: c_int) -> Status<*mut u8> {
    if cv_mat_channels(mat.type_) != 1 {
        return Err(CV_STS_BAD_ARG);
    }
    if row < 0 || row >= mat.rows || col < 0 || col >= mat.cols {
        return Err(CV_STS_OUT_OF_RANGE);
    }
    if mat.data.is_null() {
        return Err(CV_STS_NULL_PTR);
    }
    let offset = row as usize * mat.step as usize + col as usize * cv_elem_size(mat.type_) as usize;
    Ok(unsafe { mat.data.add(offset) })
}

unsafe fn read_value(ptr: *const u8, depth: c_int) -> f64 {
    unsafe {
        match depth {
            CV_8U => ptr.read() as f64,
            CV_8S => ptr.cast::<i8>().read() as f64,
            CV_16U => ptr.cast::<u16>().read_unaligned() as f64,
            CV_16S => ptr.cast::<i16>().read_unaligned() as f64,
            CV_32S => ptr.cast::<i32>().read_unaligned() as f64,
            CV_32F => ptr.cast::<f32>().read_unaligned() as f64,
            _ => ptr.cast::<f64>().read_unaligned(),
        }
    }
}

/// Stores `value` with rounding and saturation for integer depths.
unsafe fn write_value(ptr: *mut u8, depth: c_int, value: f64) {
    unsafe {
        match depth {
            CV_8U => ptr.write(value.round() as u8),
            CV_8S => ptr.cast::<i8>().write(value.round() as i8),
            CV_16U => ptr.cast::<u16>().write_unaligned(value.round() as u16),
            CV_16S => ptr.cast::<i16>().write_unaligned(value.round() as i16),
            CV_32S => ptr.cast::<i32>().write_unaligned(value.round() as i32),
            CV_32F => ptr.cast::<f32>().write_unaligned(value as f32),
            _ => ptr.cast::<f64>().write_unaligned(value),
        }
    }
}

/// Reads element (`row`, `col`) of a single-channel matrix.
///
/// # Safety
///
/// `mat` must be null or point to a live header; `value` must be null or writable.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn cv_get_real_2d(
    mat: *const CvMat,
    row: c_int,
    col: c_int,
    value: *mut f64,
) -> c_int {
    if mat.is_null() || value.is_null() {
        return CV_STS_NULL_PTR;
    }
    let mat = unsafe { &*mat };
    match unsafe { element_ptr(mat, row, col) } {
        Ok(ptr) => {
            unsafe { *value = read_value(ptr, cv_mat_depth(mat.type_)) };
            CV_STS_OK
        }
        Err(status) => status,
    }
}

/// Writes element (`row`, `col`) of a single-channel matrix.
///
/// # Safety
///
/// `mat` must be null or point to a live header.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn cv_set_real_2d(mat: *const CvMat, row: c_int, col: c_int, value: f64) -> c_int {
    if mat.is_null() {
        return CV_STS_NULL_PTR;
    }
    let mat = unsafe { &*mat };
    match unsafe { element_ptr(mat, row, col) } {
        Ok(ptr) => {
            unsafe { write_value(ptr, cv_mat_depth(mat.type_), value) };
            CV_STS_OK
        }
        Err(status) => status,
    }
}

/// Assigns `value` to every element of `arr`, or only to the elements whose `mask`
/// byte is non-zero when a mask is given.
///
/// A null `mask` means "no mask". A mask must be an 8-bit single-channel matrix of the
/// same size as `arr`.
///
/// # Safety
///
/// `arr` and `mask` must each be null or point to a live header.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn cv_set(arr: *const CvMat, value: CvScalar, mask: *const CvMat) -> c_int {
    if arr.is_null() {
        return CV_STS_NULL_PTR;
    }
    let arr = unsafe { &*arr };
    let mask = unsafe { mask.as_ref() };
    if let Some(mask) = mask {
        if mask.type_ != cv_make_type(CV_8U, 1) {
            return CV_STS_UNMATCHED_FORMATS;
        }
        if mask.rows != arr.rows || mask.cols != arr.cols {
            return CV_STS_UNMATCHED_SIZES;
        }
    }
    if arr.rows == 0 || arr.cols == 0 {
        return CV_STS_OK;
    }
    if arr.data.is_null() || mask.is_some_and(|m| m.data.is_null()) {
        return CV_STS_NULL_PTR;
    }

    let depth = cv_mat_depth(arr.type_);
    let depth_size = cv_depth_size(depth) as usize;
    let channels = cv_mat_channels(arr.type_) as usize;
    let elem = cv_elem_size(arr.type_) as usize;
    for row in 0..arr.rows as usize {
        for col in 0..arr.cols as usize {
            if let Some(mask) = mask {
                let selected = unsafe { mask.data.add(row * mask.step as usize + col).read() };
                if selected == 0 {
                    continue;
                }
            }
            let base = unsafe { arr.data.add(row * arr.step as usize + col * elem) };
            for channel in 0..channels {
                let v = value.val.get(channel).copied().unwrap_or(0.0);
                unsafe { write_value(base.add(channel * depth_size), depth, v) };
            }
        }
    }
    CV_STS_OK
}

/// Clears every element of `arr`.
///
/// # Safety
///
/// `arr` must be null or point to a live header.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn cv_set_zero(arr: *const CvMat) -> c_int {
    unsafe { cv_set(arr, CvScalar::default(), ptr::null()) }
}
