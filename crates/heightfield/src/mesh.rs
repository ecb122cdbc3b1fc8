use crate::field::{HeightField, HeightFieldError};
use crate::WATER_LEVEL_FRACTION;
use bytemuck::{Pod, Zeroable};
use glam::Vec3;

const GRASS: [f32; 3] = [17.0 / 255.0, 124.0 / 255.0, 19.0 / 255.0];
const SNOW: [f32; 3] = [0.9, 0.9, 0.9];
const LAKE_BED: [f32; 3] = [0.3, 0.3, 0.3];
const DIRT: [f32; 3] = [165.0 / 255.0, 42.0 / 255.0, 42.0 / 255.0];

/// Elevation above which terrain is shaded as snow, as a fraction of the
/// height scale.
const SNOW_LINE_FRACTION: f32 = 0.7;

/// Faces flatter than this (normal Y component) keep their elevation color;
/// steeper faces are shaded as exposed dirt.
const DIRT_SLOPE_LIMIT: f32 = 0.5;

/// Terrain vertex: world position, vertex color, surface normal.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct TerrainVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub normal: [f32; 3],
}

impl TerrainVertex {
    fn pos(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }
}

/// An indexed triangle mesh of the terrain surface.
#[derive(Debug, Clone)]
pub struct TerrainMesh {
    pub vertices: Vec<TerrainVertex>,
    pub indices: Vec<u32>,
}

impl TerrainMesh {
    /// Tessellate the height field into a triangle grid.
    ///
    /// One vertex is emitted per `res`-th texel, at world position
    /// `(x*res*spacing, luma*height_scale, y*res*spacing)`. Vertices are
    /// colored by elevation (grass, snow above the snow line, lake bed at or
    /// below the water level). With `shade_slopes`, a second pass computes
    /// per-face normals and recolors steep faces as dirt; snow is never
    /// overridden.
    pub fn build(
        field: &HeightField,
        res: u32,
        spacing: f32,
        height_scale: f32,
        shade_slopes: bool,
    ) -> Result<Self, HeightFieldError> {
        let res = res.max(1);
        let width = field.width() / res;
        let height = field.height() / res;
        if width == 0 || height == 0 {
            return Err(HeightFieldError::Empty { width, height });
        }

        let mut vertices = Vec::with_capacity(width as usize * height as usize);
        let mut indices = Vec::new();
        for x in 0..width {
            for y in 0..height {
                let luma = field.texel(i64::from(x * res), i64::from(y * res));
                let elevation = luma * height_scale;
                let mut color = GRASS;
                if elevation > SNOW_LINE_FRACTION * height_scale {
                    color = SNOW;
                }
                if elevation <= WATER_LEVEL_FRACTION * height_scale {
                    color = LAKE_BED;
                }
                vertices.push(TerrainVertex {
                    position: [
                        (x * res) as f32 * spacing,
                        elevation,
                        (y * res) as f32 * spacing,
                    ],
                    color,
                    normal: [0.0, 0.0, 0.0],
                });
                if x < width - 1 && y < height - 1 {
                    let i = x * height + y;
                    indices.extend_from_slice(&[i, i + 1, i + height + 1, i, i + height + 1, i + height]);
                }
            }
        }

        if shade_slopes {
            shade_by_slope(&mut vertices, &indices);
        }

        tracing::debug!(
            vertices = vertices.len(),
            triangles = indices.len() / 3,
            "built terrain mesh"
        );
        Ok(Self { vertices, indices })
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Assign per-face normals to each face's vertices and recolor steep faces.
fn shade_by_slope(vertices: &mut [TerrainVertex], indices: &[u32]) {
    for tri in indices.chunks_exact(3) {
        let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
        let u = vertices[b].pos() - vertices[a].pos();
        let v = vertices[c].pos() - vertices[a].pos();
        let normal = u.cross(v).normalize_or_zero();
        for &i in &[a, b, c] {
            vertices[i].normal = normal.to_array();
            if normal.y < DIRT_SLOPE_LIMIT && vertices[i].color != SNOW {
                vertices[i].color = DIRT;
            }
        }
    }
}
