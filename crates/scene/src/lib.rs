//! Scene state for a terrain with collectible, swaying foliage.
//!
//! Owns the height field, grid, collected-cell flags, and animation clock,
//! and regenerates the per-cell instance records a renderer consumes.
//!
//! # Invariants
//! - Instance regeneration fully overwrites the record array; no state
//!   accumulates in the output between invocations.
//! - The collected flag array and the collected coordinate list never
//!   disagree.
//! - The clock only moves through [`Scene::advance`]; wall time stays with
//!   the frame loop.

pub mod config;
pub mod scene;

pub use config::{ConfigError, SceneConfig};
pub use scene::{Scene, SceneSummary};

pub fn crate_info() -> &'static str {
    "meadow-scene v0.1.0"
}
