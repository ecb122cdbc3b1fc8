//! Shared leaf types for the meadow scene toolkit.
//!
//! # Invariants
//! - Grid flattening is row-major with the grid height as row stride; every
//!   consumer of a flattened index goes through [`GridDims`].
//! - [`InstanceRaw`] is plain-old-data with a layout renderers can bind
//!   directly as a per-instance vertex buffer.

pub mod grid;
pub mod instance;
pub mod rotation;

pub use grid::{GridDims, GridError};
pub use instance::InstanceRaw;

pub fn crate_info() -> &'static str {
    "meadow-common v0.1.0"
}
