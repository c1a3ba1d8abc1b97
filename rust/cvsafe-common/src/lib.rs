//! Core definitions (errors and result helpers), relied upon by all cvsafe-* crates.

pub mod error;
pub mod result;

pub use result::Result;

#[cfg(test)]
mod tests;
