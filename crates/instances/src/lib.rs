//! Foliage instance generation over a terrain grid.
//!
//! For every cell of a `(width, height)` grid this crate computes one
//! [`InstanceRaw`](meadow_common::InstanceRaw): a transform that places the
//! cell's foliage on the height field and spins it about the up axis with the
//! animation clock, plus a color that tints collected cells.
//!
//! # Invariants
//! - Each fill writes every output slot exactly once, at the cell's flattened
//!   index; sequential and parallel fills are bit-identical.
//! - Cell computation is pure: same inputs, same record, regardless of
//!   evaluation order.
//! - All lengths are validated before the first write.

pub mod flags;
pub mod generator;

pub use flags::{flag_at, words_for, CollectedFlags, FLAGS_PER_WORD};
pub use generator::{fill, instance_at, par_fill, FieldParams, InstanceError, COLLECTED_COLOR};

pub fn crate_info() -> &'static str {
    "meadow-instances v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("instances"));
    }
}
