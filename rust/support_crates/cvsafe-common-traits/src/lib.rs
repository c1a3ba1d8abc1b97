//! Traits and definitions used throughout the cvsafe crates.
//!
//! # Modules
//!
//! - [`data_owner`]: Traits for resources that expose a strided two-dimensional
//!   block of element storage

pub mod data_owner;
