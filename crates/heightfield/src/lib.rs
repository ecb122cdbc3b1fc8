//! Height-map terrain: image-backed scalar field, mesh generation, water plane.
//!
//! # Invariants
//! - Sampling never fails: out-of-range texture coordinates resolve through an
//!   explicit [`EdgeMode`] instead of an implicit sampler property.
//! - Generated meshes index only vertices they emitted.

pub mod field;
pub mod mesh;
pub mod water;

pub use field::{EdgeMode, HeightField, HeightFieldError};
pub use mesh::{TerrainMesh, TerrainVertex};
pub use water::{WaterMesh, WaterVertex};

/// Fraction of the height scale at which open water sits. Terrain at or below
/// this level is shaded as lake bed, and the water plane is placed here.
pub const WATER_LEVEL_FRACTION: f32 = 0.143_921_568_6;

pub fn crate_info() -> &'static str {
    "meadow-heightfield v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("heightfield"));
    }
}
