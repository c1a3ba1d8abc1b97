//! `DataOwner`: A trait for resources that expose strided element storage.

/// A trait for resources that describe a two-dimensional block of element storage.
///
/// # Safety
///
/// Implementors must guarantee that:
/// - When `data_region()` returns `Some`, every row `r < rows` starts at
///   `ptr + r * step` and holds at least `cols * elem_size` readable bytes.
/// - The storage remains valid for as long as the owner is alive and not released.
/// - The reported geometry matches what the native engine sees for the same resource.
pub unsafe trait DataOwner {
    /// Returns the storage region, or `None` if the resource holds no storage
    /// (a null or released resource).
    fn data_region(&self) -> Option<DataRegion>;
}

/// Geometry of a strided block of elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataRegion {
    /// Pointer to the first element of row zero.
    pub ptr: *const u8,
    /// Number of rows.
    pub rows: usize,
    /// Number of elements per row.
    pub cols: usize,
    /// Distance between the starts of consecutive rows, in bytes.
    pub step: usize,
    /// Native element type code (depth and channel count).
    pub elem_type: i32,
    /// Size of one element in bytes, all channels included.
    pub elem_size: usize,
}

impl DataRegion {
    /// Number of meaningful bytes in each row.
    #[inline]
    pub fn row_bytes(&self) -> usize {
        self.cols * self.elem_size
    }

    /// Number of elements in the region.
    #[inline]
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if rows follow each other without padding.
    #[inline]
    pub fn is_continuous(&self) -> bool {
        self.rows <= 1 || self.step == self.row_bytes()
    }

    /// Returns `true` if both regions describe the same elements with the same layout.
    /// The step only matters when there is more than one row.
    pub fn same_extent(&self, other: &DataRegion) -> bool {
        self.ptr == other.ptr
            && self.rows == other.rows
            && self.cols == other.cols
            && self.elem_type == other.elem_type
            && (self.rows <= 1 || self.step == other.step)
    }

    /// Copies the region, row by row, into a tightly packed byte buffer.
    ///
    /// # Safety
    ///
    /// The region must satisfy the [`DataOwner`] contract at the time of the call.
    pub unsafe fn copy_packed(&self, dst: &mut [u8]) {
        let row_bytes = self.row_bytes();
        debug_assert!(dst.len() >= row_bytes * self.rows);
        if row_bytes == 0 {
            return;
        }
        for (row, chunk) in dst.chunks_exact_mut(row_bytes).take(self.rows).enumerate() {
            let src = unsafe { std::slice::from_raw_parts(self.ptr.add(row * self.step), row_bytes) };
            chunk.copy_from_slice(src);
        }
    }
}
