//! Value types exchanged with the native engine.

use cvsafe_common::{Result, error::Error};
use cvsafe_sys::{
    CV_8S, CV_8U, CV_16S, CV_16U, CV_32F, CV_32S, CV_64F, CvRect, CvScalar, cv_depth_size,
};
use libc::c_int;

/// Storage type of one channel of a matrix element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum Depth {
    U8 = CV_8U,
    S8 = CV_8S,
    U16 = CV_16U,
    S16 = CV_16S,
    S32 = CV_32S,
    F32 = CV_32F,
    F64 = CV_64F,
}

impl Depth {
    #[inline]
    pub fn code(self) -> c_int {
        self as c_int
    }

    pub fn from_code(code: c_int) -> Result<Depth> {
        Ok(match code {
            CV_8U => Depth::U8,
            CV_8S => Depth::S8,
            CV_16U => Depth::U16,
            CV_16S => Depth::S16,
            CV_32S => Depth::S32,
            CV_32F => Depth::F32,
            CV_64F => Depth::F64,
            _ => return Err(Error::invalid_format(format!("depth code {code}"))),
        })
    }

    /// Size in bytes of one channel value.
    #[inline]
    pub fn size(self) -> usize {
        cv_depth_size(self.code()) as usize
    }
}

/// Rust scalar types that match a matrix depth one-to-one.
pub trait MatElement: bytemuck::Pod {
    const DEPTH: Depth;
}

macro_rules! mat_element {
    ($($ty:ty => $depth:ident),* $(,)?) => {
        $(impl MatElement for $ty {
            const DEPTH: Depth = Depth::$depth;
        })*
    };
}

mat_element! {
    u8 => U8,
    i8 => S8,
    u16 => U16,
    i16 => S16,
    i32 => S32,
    f32 => F32,
    f64 => F64,
}

#[repr(C)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Rect {
        Rect {
            x,
            y,
            width,
            height,
        }
    }
}

impl From<Rect> for CvRect {
    fn from(rect: Rect) -> Self {
        bytemuck::cast(rect)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: usize,
    pub height: usize,
}

/// Up to four per-channel values.
#[repr(C)]
#[derive(Debug, Default, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Scalar {
    pub val: [f64; 4],
}

impl Scalar {
    pub const fn new(v0: f64, v1: f64, v2: f64, v3: f64) -> Scalar {
        Scalar {
            val: [v0, v1, v2, v3],
        }
    }

    /// The same value in every channel.
    pub const fn all(v: f64) -> Scalar {
        Scalar { val: [v; 4] }
    }

    /// `v` in the first channel, zero elsewhere.
    pub const fn real(v: f64) -> Scalar {
        Scalar {
            val: [v, 0.0, 0.0, 0.0],
        }
    }
}

impl From<Scalar> for CvScalar {
    fn from(scalar: Scalar) -> Self {
        CvScalar { val: scalar.val }
    }
}

#[repr(C)]
#[derive(Debug, Default, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Point2f {
    pub x: f32,
    pub y: f32,
}

impl Point2f {
    pub const fn new(x: f32, y: f32) -> Point2f {
        Point2f { x, y }
    }
}

/// A salient image point found by a feature detector.
#[repr(C)]
#[derive(Debug, Default, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct KeyPoint {
    pub pt: Point2f,
    /// Diameter of the meaningful neighborhood.
    pub size: f32,
    /// Orientation in degrees, or `-1` if not applicable.
    pub angle: f32,
    pub response: f32,
    /// Pyramid octave the point was extracted from.
    pub octave: i32,
    /// Object class, when points are clustered by object.
    pub class_id: i32,
}

/// Match between a query descriptor and a train descriptor.
#[repr(C)]
#[derive(Debug, Default, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DMatch {
    pub query_idx: i32,
    pub train_idx: i32,
    pub img_idx: i32,
    pub distance: f32,
}

impl DMatch {
    pub const fn new(query_idx: i32, train_idx: i32, img_idx: i32, distance: f32) -> DMatch {
        DMatch {
            query_idx,
            train_idx,
            img_idx,
            distance,
        }
    }
}
