//! Lifetime-safe handles over a native image-processing engine.
//!
//! - [`handle`]: owning wrapper for a single native object with idempotent release
//! - [`mat`] and [`view`]: matrices and views aliasing another matrix's storage
//! - [`sentinel`]: shared "no resource" instances for optional arguments
//! - [`sequence`]: native element collections and disposable cursors over them
//! - [`config`]: process-wide settings

pub mod config;
pub mod handle;
pub mod mat;
pub mod sentinel;
pub mod sequence;
mod status;
pub mod types;
pub mod view;

pub use cvsafe_common::{
    Result,
    error::{Error, ErrorKind},
};
pub use mat::Mat;
pub use sequence::{ForeignIterator, Sequence, SequenceElement};
pub use types::{DMatch, Depth, KeyPoint, MatElement, Point2f, Rect, Scalar, Size};
pub use view::Region;
