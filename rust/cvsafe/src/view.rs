//! Views: matrices that alias part or all of another matrix's storage.
//!
//! The native engine computes each view header from the owner's current header and a
//! [`Region`]. No element data is copied; writes through a view are visible through
//! the owner and vice versa. A view keeps its owner alive for as long as the view
//! itself is alive.
//!
//! When the computed header describes exactly the owner (same data pointer, extent,
//! element type and row step), the owner handle is returned instead of a new view,
//! so no header is allocated. This holds for every [`Region`] kind, not only for
//! [`Mat::get_mat`]: a full-extent sub-rectangle, row range or no-op reshape also
//! hands back the owner.

use cvsafe_common::Result;
use cvsafe_common_traits::data_owner::DataOwner;
use cvsafe_sys::{
    CvMat, cv_get_cols, cv_get_diag, cv_get_rows, cv_get_sub_rect, cv_reinterpret, cv_reshape,
};

use crate::mat::{Mat, region_of};
use crate::status::{check, to_c_int};
use crate::types::{Depth, Rect};

/// Part or reinterpretation of a matrix to build a view over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    /// A rectangle of elements.
    SubRect(Rect),
    /// Rows `start..end`, taking every `delta`-th row.
    Rows {
        start: usize,
        end: usize,
        delta: usize,
    },
    /// Columns `start..end`.
    Cols { start: usize, end: usize },
    /// A diagonal as a single column: `0` is the main diagonal, positive offsets go
    /// below it, negative offsets above it.
    Diag(i32),
    /// Same elements with a different channel count and/or row count. Zero keeps the
    /// current value.
    Reshape { channels: usize, rows: usize },
    /// Same bytes read as another depth; the channel count is kept.
    Retype(Depth),
}

impl Mat {
    /// Builds a view over `region` of this matrix.
    ///
    /// Fails with `OutOfRange` if the native engine rejects the region.
    pub fn view(&self, region: Region) -> Result<Mat> {
        let src = self.raw()?;
        let mut computed = CvMat::empty();
        let out = &mut computed as *mut CvMat;

        let (status, function) = match region {
            Region::SubRect(rect) => (
                unsafe { cv_get_sub_rect(src, out, rect.into()) },
                "cv_get_sub_rect",
            ),
            Region::Rows { start, end, delta } => {
                let (start, end) = (to_c_int(start, "start")?, to_c_int(end, "end")?);
                let delta = to_c_int(delta, "delta")?;
                (
                    unsafe { cv_get_rows(src, out, start, end, delta) },
                    "cv_get_rows",
                )
            }
            Region::Cols { start, end } => {
                let (start, end) = (to_c_int(start, "start")?, to_c_int(end, "end")?);
                (unsafe { cv_get_cols(src, out, start, end) }, "cv_get_cols")
            }
            Region::Diag(diag) => (unsafe { cv_get_diag(src, out, diag) }, "cv_get_diag"),
            Region::Reshape { channels, rows } => {
                let channels = to_c_int(channels, "channels")?;
                let rows = to_c_int(rows, "rows")?;
                (unsafe { cv_reshape(src, out, channels, rows) }, "cv_reshape")
            }
            Region::Retype(depth) => (
                unsafe { cv_reinterpret(src, out, depth.code()) },
                "cv_reinterpret",
            ),
        };
        check(status, function)?;

        let computed_region = region_of(&computed);
        if self
            .data_region()
            .is_some_and(|owner| owner.same_extent(&computed_region))
        {
            log::debug!("{region:?} covers the whole matrix; returning the owner");
            return Ok(self.clone());
        }
        Mat::alias(self, &computed)
    }

    pub fn get_sub_rect(&self, rect: Rect) -> Result<Mat> {
        self.view(Region::SubRect(rect))
    }

    pub fn get_rows(&self, start: usize, end: usize) -> Result<Mat> {
        self.get_rows_step(start, end, 1)
    }

    pub fn get_rows_step(&self, start: usize, end: usize, delta: usize) -> Result<Mat> {
        self.view(Region::Rows { start, end, delta })
    }

    pub fn get_row(&self, row: usize) -> Result<Mat> {
        self.get_rows(row, row.saturating_add(1))
    }

    pub fn get_cols(&self, start: usize, end: usize) -> Result<Mat> {
        self.view(Region::Cols { start, end })
    }

    pub fn get_col(&self, col: usize) -> Result<Mat> {
        self.get_cols(col, col.saturating_add(1))
    }

    pub fn get_diag(&self, diag: i32) -> Result<Mat> {
        self.view(Region::Diag(diag))
    }

    pub fn reshape(&self, channels: usize, rows: usize) -> Result<Mat> {
        self.view(Region::Reshape { channels, rows })
    }

    pub fn reinterpret(&self, depth: Depth) -> Result<Mat> {
        self.view(Region::Retype(depth))
    }

    /// A matrix header over the full extent. For a matrix this is the matrix itself.
    pub fn get_mat(&self) -> Result<Mat> {
        let cols = self.cols()?;
        self.get_cols(0, cols)
    }
}
