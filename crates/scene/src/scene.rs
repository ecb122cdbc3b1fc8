use crate::config::SceneConfig;
use meadow_common::{GridDims, InstanceRaw};
use meadow_heightfield::{HeightField, WATER_LEVEL_FRACTION};
use meadow_instances::{par_fill, CollectedFlags, FieldParams, InstanceError};

/// A terrain scene: height field, foliage grid, collected cells, clock.
///
/// The scene owns everything the instance generator reads, so a fill sees a
/// consistent snapshot by construction — collection and clock mutations
/// cannot interleave with a running fill through `&self`.
#[derive(Debug, Clone)]
pub struct Scene {
    field: HeightField,
    dims: GridDims,
    params: FieldParams,
    flags: CollectedFlags,
    collected: Vec<(u32, u32)>,
    clock: f32,
}

impl Scene {
    pub fn new(field: HeightField, dims: GridDims, params: FieldParams) -> Self {
        Self {
            field,
            dims,
            params,
            flags: CollectedFlags::new(dims.len()),
            collected: Vec::new(),
            clock: 0.0,
        }
    }

    /// Build a scene from a config plus the decoded height field.
    pub fn from_config(config: &SceneConfig, field: HeightField) -> Self {
        let field = field.with_edge_mode(config.edge);
        Self::new(field, config.grid, config.params)
    }

    pub fn dims(&self) -> GridDims {
        self.dims
    }

    pub fn params(&self) -> &FieldParams {
        &self.params
    }

    pub fn field(&self) -> &HeightField {
        &self.field
    }

    pub fn clock(&self) -> f32 {
        self.clock
    }

    /// Advance the animation clock. The frame loop owns real time; the scene
    /// only accumulates the deltas it is handed.
    pub fn advance(&mut self, dt: f32) -> f32 {
        self.clock += dt;
        self.clock
    }

    /// Mark the cell at `(x, y)` as collected.
    ///
    /// Returns false for coordinates outside the grid. Collecting an already
    /// collected cell is a no-op that still returns true.
    pub fn collect(&mut self, x: u32, y: u32) -> bool {
        let Ok(index) = self.dims.flatten(x, y) else {
            tracing::debug!(x, y, "ignoring collect outside the grid");
            return false;
        };
        if !self.flags.is_set(index) {
            self.flags.set(index);
            self.collected.push((x, y));
            tracing::debug!(x, y, total = self.collected.len(), "collected cell");
        }
        true
    }

    pub fn is_collected(&self, x: u32, y: u32) -> bool {
        self.dims
            .flatten(x, y)
            .map(|index| self.flags.is_set(index))
            .unwrap_or(false)
    }

    /// Cells collected so far, in collection order.
    pub fn collected(&self) -> &[(u32, u32)] {
        &self.collected
    }

    /// The packed flag words, as the generator and renderer consume them.
    pub fn flag_words(&self) -> &[u32] {
        self.flags.words()
    }

    /// Regenerate the full instance array for the current clock.
    pub fn instances(&self) -> Result<Vec<InstanceRaw>, InstanceError> {
        let mut out = vec![InstanceRaw::default(); self.dims.len()];
        self.write_instances(&mut out)?;
        Ok(out)
    }

    /// Regenerate into a caller-owned array (sized to the grid), overwriting
    /// every slot.
    pub fn write_instances(&self, out: &mut [InstanceRaw]) -> Result<(), InstanceError> {
        par_fill(
            &self.params,
            &self.field,
            self.flags.words(),
            self.dims,
            self.clock,
            out,
        )
    }

    /// World height of the water plane for this scene's calibration.
    pub fn water_level(&self) -> f32 {
        WATER_LEVEL_FRACTION * self.params.height_scale
    }

    pub fn summary(&self) -> SceneSummary {
        SceneSummary {
            width: self.dims.width,
            height: self.dims.height,
            cells: self.dims.len(),
            collected: self.collected.len(),
            clock: self.clock,
        }
    }
}

/// Snapshot of scene state for tooling output.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneSummary {
    pub width: u32,
    pub height: u32,
    pub cells: usize,
    pub collected: usize,
    pub clock: f32,
}

impl std::fmt::Display for SceneSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Scene: grid={}x{} cells={} collected={} clock={:.3}",
            self.width, self.height, self.cells, self.collected, self.clock
        )
    }
}
