//! Native engine behind the `cvsafe` wrappers.
//!
//! Everything here is exported with the C ABI and works on raw pointers: matrix headers
//! with reference-counted element storage, region headers that alias that storage, and
//! element sequences with forward cursors. None of these functions track ownership on
//! behalf of the caller.

pub mod counters;
pub mod mat;
pub mod status;
pub mod types;
pub mod vector;

pub use counters::{CvDebugCounters, cv_debug_counters};
pub use mat::*;
pub use status::*;
pub use types::*;
pub use vector::*;

#[cfg(test)]
mod tests;
