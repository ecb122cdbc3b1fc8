use crate::flags::{self, flag_at};
use glam::Vec3;
use meadow_common::{rotation, GridDims, GridError, InstanceRaw};
use meadow_heightfield::HeightField;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Opaque cyan-blue tint applied to collected cells (191/255 green channel).
pub const COLLECTED_COLOR: [f32; 4] = [0.0, 191.0 / 255.0, 1.0, 1.0];

/// Calibration of the foliage field: how grid cells map onto the height field
/// and the world, and how the sway animation runs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldParams {
    /// World (and texel) distance between neighboring cells. Ties a specific
    /// height-map resolution to a specific world grid pitch.
    pub cell_spacing: f32,
    /// Exponent applied to the sampled height; below 1.0 it lifts low ground,
    /// flattening the field visually.
    pub height_exponent: f32,
    /// World height of a full-intensity sample.
    pub height_scale: f32,
    /// Vertical offset applied after the height curve, planting stems into
    /// the ground.
    pub y_offset: f32,
    /// Sway angle in radians per clock unit.
    pub spin_rate: f32,
    /// Tint for collected cells; everything else stays transparent.
    pub collected_color: [f32; 4],
}

impl Default for FieldParams {
    fn default() -> Self {
        Self {
            cell_spacing: 30.96,
            height_exponent: 0.4,
            height_scale: 250.0,
            y_offset: -10.0,
            spin_rate: 2.0,
            collected_color: COLLECTED_COLOR,
        }
    }
}

/// Errors from batch instance generation.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum InstanceError {
    #[error("output holds {actual} records, a {width}x{height} grid needs {expected}")]
    OutputLength {
        expected: usize,
        actual: usize,
        width: u32,
        height: u32,
    },
    #[error("flag array holds {actual} words, a grid of {cells} cells needs {expected}")]
    FlagCapacity {
        expected: usize,
        actual: usize,
        cells: usize,
    },
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Compute the instance record for one grid cell.
///
/// Pure: the record depends only on the arguments, so cells can be evaluated
/// in any order or in parallel. The transform spins about the up axis by
/// `time * spin_rate` and translates to the cell's position on the height
/// field; the color is transparent unless the cell's collected flag is set.
pub fn instance_at(
    params: &FieldParams,
    field: &HeightField,
    collected: &[u32],
    dims: GridDims,
    time: f32,
    x: u32,
    y: u32,
) -> Result<InstanceRaw, GridError> {
    let index = dims.flatten(x, y)?;

    let sampled = field.sample(x as f32 * params.cell_spacing, y as f32 * params.cell_spacing);
    let elevation = sampled.powf(params.height_exponent) * params.height_scale;

    let sway = rotation::axis_angle(Vec3::Y, time * params.spin_rate);
    let mut raw = InstanceRaw::new(rotation::rotation_matrix(sway), [0.0; 4]);
    raw.model_3 = [
        x as f32 * params.cell_spacing,
        elevation + params.y_offset,
        y as f32 * params.cell_spacing,
        1.0,
    ];
    if flag_at(collected, index) {
        raw.color = params.collected_color;
    }
    Ok(raw)
}

/// Fill `out` with one record per grid cell, sequentially.
///
/// `out` must hold exactly one slot per cell and `collected` enough words for
/// the whole grid; both are validated before anything is written.
pub fn fill(
    params: &FieldParams,
    field: &HeightField,
    collected: &[u32],
    dims: GridDims,
    time: f32,
    out: &mut [InstanceRaw],
) -> Result<(), InstanceError> {
    validate(dims, collected, out.len())?;
    for x in 0..dims.width {
        for y in 0..dims.height {
            let index = dims.flatten(x, y)?;
            out[index] = instance_at(params, field, collected, dims, time, x, y)?;
        }
    }
    Ok(())
}

/// Fill `out` in parallel, one task per grid row.
///
/// Rows are disjoint, contiguous runs of the output, so no two tasks touch
/// the same slot. Produces bit-identical results to [`fill`].
pub fn par_fill(
    params: &FieldParams,
    field: &HeightField,
    collected: &[u32],
    dims: GridDims,
    time: f32,
    out: &mut [InstanceRaw],
) -> Result<(), InstanceError> {
    validate(dims, collected, out.len())?;
    if dims.is_empty() {
        return Ok(());
    }
    let span = tracing::debug_span!("par_fill", cells = dims.len());
    let _guard = span.enter();

    out.par_chunks_mut(dims.height as usize)
        .enumerate()
        .try_for_each(|(x, row)| {
            for (y, slot) in row.iter_mut().enumerate() {
                *slot = instance_at(params, field, collected, dims, time, x as u32, y as u32)?;
            }
            Ok::<(), InstanceError>(())
        })
}

fn validate(dims: GridDims, collected: &[u32], out_len: usize) -> Result<(), InstanceError> {
    if out_len != dims.len() {
        return Err(InstanceError::OutputLength {
            expected: dims.len(),
            actual: out_len,
            width: dims.width,
            height: dims.height,
        });
    }
    let expected = flags::words_for(dims.len());
    if collected.len() < expected {
        return Err(InstanceError::FlagCapacity {
            expected,
            actual: collected.len(),
            cells: dims.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::CollectedFlags;
    use glam::Mat4;

    fn flat_field(value: f32) -> HeightField {
        HeightField::from_values(vec![value; 64 * 64], 64, 64).unwrap()
    }

    fn wavy_field() -> HeightField {
        let values = (0..64 * 64).map(|i| (i % 7) as f32 / 7.0).collect();
        HeightField::from_values(values, 64, 64).unwrap()
    }

    #[test]
    fn translation_tracks_grid_position() {
        let params = FieldParams::default();
        let field = flat_field(1.0);
        let dims = GridDims::new(4, 4);
        let flags = CollectedFlags::new(dims.len());
        for x in 0..4 {
            for y in 0..4 {
                let raw =
                    instance_at(&params, &field, flags.words(), dims, 0.0, x, y).unwrap();
                assert_eq!(raw.model_3[0], x as f32 * 30.96);
                assert_eq!(raw.model_3[2], y as f32 * 30.96);
                assert_eq!(raw.model_3[3], 1.0);
            }
        }
    }

    #[test]
    fn height_follows_the_curve() {
        let params = FieldParams::default();
        let field = flat_field(0.25);
        let dims = GridDims::new(1, 1);
        let flags = CollectedFlags::new(1);
        let raw = instance_at(&params, &field, flags.words(), dims, 0.0, 0, 0).unwrap();
        let expected = 0.25_f32.powf(0.4) * 250.0 - 10.0;
        assert!((raw.model_3[1] - expected).abs() < 1e-5);
    }

    #[test]
    fn time_zero_rotation_is_identity() {
        let params = FieldParams::default();
        let field = flat_field(0.5);
        let dims = GridDims::new(2, 2);
        let flags = CollectedFlags::new(dims.len());
        let raw = instance_at(&params, &field, flags.words(), dims, 0.0, 1, 1).unwrap();
        assert_eq!(raw.model_0, [1.0, 0.0, 0.0, 0.0]);
        assert_eq!(raw.model_1, [0.0, 1.0, 0.0, 0.0]);
        assert_eq!(raw.model_2, [0.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn sway_angle_is_twice_the_clock() {
        let params = FieldParams::default();
        let field = flat_field(0.5);
        let dims = GridDims::new(1, 1);
        let flags = CollectedFlags::new(1);
        let time = 0.35_f32;
        let raw = instance_at(&params, &field, flags.words(), dims, time, 0, 0).unwrap();
        let angle = time * 2.0;
        assert!((raw.model_0[0] - angle.cos()).abs() < 1e-6);
        assert!((raw.model_0[2] - -angle.sin()).abs() < 1e-6);
        assert!((raw.model_2[0] - angle.sin()).abs() < 1e-6);
        assert!((raw.model_2[2] - angle.cos()).abs() < 1e-6);
    }

    #[test]
    fn collected_cells_are_tinted() {
        let params = FieldParams::default();
        let field = flat_field(0.5);
        let dims = GridDims::new(2, 3);
        let mut flags = CollectedFlags::new(dims.len());
        flags.set(dims.flatten(1, 2).unwrap());
        for x in 0..2 {
            for y in 0..3 {
                let raw =
                    instance_at(&params, &field, flags.words(), dims, 0.0, x, y).unwrap();
                if (x, y) == (1, 2) {
                    assert_eq!(raw.color, COLLECTED_COLOR);
                } else {
                    assert_eq!(raw.color, [0.0, 0.0, 0.0, 0.0]);
                }
            }
        }
    }

    #[test]
    fn out_of_grid_cell_is_an_error() {
        let params = FieldParams::default();
        let field = flat_field(0.5);
        let dims = GridDims::new(2, 2);
        let flags = CollectedFlags::new(dims.len());
        assert!(instance_at(&params, &field, flags.words(), dims, 0.0, 2, 0).is_err());
    }

    #[test]
    fn fill_validates_output_length() {
        let params = FieldParams::default();
        let field = flat_field(0.5);
        let dims = GridDims::new(3, 3);
        let flags = CollectedFlags::new(dims.len());
        let mut out = vec![InstanceRaw::default(); 8];
        assert_eq!(
            fill(&params, &field, flags.words(), dims, 0.0, &mut out),
            Err(InstanceError::OutputLength {
                expected: 9,
                actual: 8,
                width: 3,
                height: 3
            })
        );
    }

    #[test]
    fn fill_validates_flag_capacity() {
        let params = FieldParams::default();
        let field = flat_field(0.5);
        let dims = GridDims::new(3, 3);
        let mut out = vec![InstanceRaw::default(); 9];
        let short = [0_u32; 2]; // 9 cells need 3 words
        assert_eq!(
            fill(&params, &field, &short, dims, 0.0, &mut out),
            Err(InstanceError::FlagCapacity {
                expected: 3,
                actual: 2,
                cells: 9
            })
        );
    }

    #[test]
    fn par_fill_matches_fill() {
        let params = FieldParams::default();
        let field = wavy_field();
        let dims = GridDims::new(8, 5);
        let flags = CollectedFlags::from_indices(dims.len(), [0, 7, 13, 39]);
        let time = 1.375;

        let mut sequential = vec![InstanceRaw::default(); dims.len()];
        fill(&params, &field, flags.words(), dims, time, &mut sequential).unwrap();
        let mut parallel = vec![InstanceRaw::default(); dims.len()];
        par_fill(&params, &field, flags.words(), dims, time, &mut parallel).unwrap();

        assert_eq!(sequential, parallel);
    }

    #[test]
    fn empty_grid_fills_nothing() {
        let params = FieldParams::default();
        let field = flat_field(0.5);
        let dims = GridDims::new(0, 4);
        let mut out = vec![];
        assert_eq!(par_fill(&params, &field, &[], dims, 0.0, &mut out), Ok(()));
    }

    /// Full scenario: a 1x4 column, one packed word with bits 1 and 3 set, a
    /// constant height field, clock at zero.
    #[test]
    fn end_to_end_single_word_column() {
        let params = FieldParams::default();
        let field = flat_field(1.0);
        let dims = GridDims::new(1, 4);
        let collected = [0b1010_u32];

        let mut out = vec![InstanceRaw::default(); 4];
        fill(&params, &field, &collected, dims, 0.0, &mut out).unwrap();

        for (i, raw) in out.iter().enumerate() {
            if i == 1 || i == 3 {
                assert_eq!(raw.color, COLLECTED_COLOR);
            } else {
                assert_eq!(raw.color, [0.0, 0.0, 0.0, 0.0]);
            }
            // pow(1.0, 0.4)*250 - 10
            assert_eq!(raw.model_3[1], 240.0);
            let rot = Mat4::from_cols_array_2d(&[
                raw.model_0,
                raw.model_1,
                raw.model_2,
                [0.0, 0.0, 0.0, 1.0],
            ]);
            assert_eq!(rot, Mat4::IDENTITY);
        }
    }
}
