//! Plain-data layouts shared across the C boundary.
//!
//! Every struct here is `#[repr(C)]` and mirrors the native engine's field order and
//! width exactly. Callers on the other side of the boundary must agree on these layouts.

use std::ptr;

use libc::c_int;

/// Matrix element depth codes.
pub const CV_8U: c_int = 0;
pub const CV_8S: c_int = 1;
pub const CV_16U: c_int = 2;
pub const CV_16S: c_int = 3;
pub const CV_32S: c_int = 4;
pub const CV_32F: c_int = 5;
pub const CV_64F: c_int = 6;

/// Number of bits the channel count is shifted by in a matrix type code.
pub const CV_CN_SHIFT: c_int = 3;
/// Maximum number of channels per matrix element.
pub const CV_CN_MAX: c_int = 512;
/// Passed as `step` to request a tightly packed row layout.
pub const CV_AUTOSTEP: c_int = 0x7fff_ffff;

const CV_DEPTH_MASK: c_int = (1 << CV_CN_SHIFT) - 1;

/// Builds a matrix type code from a depth and channel count.
#[inline]
pub const fn cv_make_type(depth: c_int, channels: c_int) -> c_int {
    (depth & CV_DEPTH_MASK) + ((channels - 1) << CV_CN_SHIFT)
}

/// Extracts the depth code from a matrix type code.
#[inline]
pub const fn cv_mat_depth(type_: c_int) -> c_int {
    type_ & CV_DEPTH_MASK
}

/// Extracts the channel count from a matrix type code.
#[inline]
pub const fn cv_mat_channels(type_: c_int) -> c_int {
    ((type_ >> CV_CN_SHIFT) & (CV_CN_MAX - 1)) + 1
}

/// Size in bytes of a single channel value of the given depth, or `0` for an
/// unknown depth.
#[inline]
pub const fn cv_depth_size(depth: c_int) -> c_int {
    match depth {
        CV_8U | CV_8S => 1,
        CV_16U | CV_16S => 2,
        CV_32S | CV_32F => 4,
        CV_64F => 8,
        _ => 0,
    }
}

/// Size in bytes of one matrix element (all channels) for the given type code.
#[inline]
pub const fn cv_elem_size(type_: c_int) -> c_int {
    cv_depth_size(cv_mat_depth(type_)) * cv_mat_channels(type_)
}

/// Returns `true` if the type code names a known depth and a supported channel count.
#[inline]
pub const fn cv_is_valid_type(type_: c_int) -> bool {
    type_ >= 0
        && cv_depth_size(cv_mat_depth(type_)) != 0
        && (type_ >> CV_CN_SHIFT) < CV_CN_MAX
}

/// Two-dimensional matrix header.
///
/// `data` points at the first element of row zero; consecutive rows are `step` bytes
/// apart. `refcount` is non-null only for headers that own their data block.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct CvMat {
    pub type_: c_int,
    pub step: c_int,
    pub refcount: *mut c_int,
    pub data: *mut u8,
    pub rows: c_int,
    pub cols: c_int,
}

impl CvMat {
    /// A header describing nothing, used as an out-parameter before a view call.
    pub const fn empty() -> CvMat {
        CvMat {
            type_: 0,
            step: 0,
            refcount: ptr::null_mut(),
            data: ptr::null_mut(),
            rows: 0,
            cols: 0,
        }
    }
}

#[repr(C)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CvRect {
    pub x: c_int,
    pub y: c_int,
    pub width: c_int,
    pub height: c_int,
}

#[repr(C)]
#[derive(Debug, Default, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CvScalar {
    pub val: [f64; 4],
}

#[repr(C)]
#[derive(Debug, Default, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CvPoint2f {
    pub x: f32,
    pub y: f32,
}

#[repr(C)]
#[derive(Debug, Default, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CvKeyPoint {
    pub pt: CvPoint2f,
    pub size: f32,
    pub angle: f32,
    pub response: f32,
    pub octave: c_int,
    pub class_id: c_int,
}

/// Descriptor match record: query index, train index, image index, distance.
#[repr(C)]
#[derive(Debug, Default, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CvDMatch {
    pub query_idx: c_int,
    pub train_idx: c_int,
    pub img_idx: c_int,
    pub distance: f32,
}
