use bytemuck::{Pod, Zeroable};

/// Water surface vertex: world position, texture coordinate, surface normal.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct WaterVertex {
    pub position: [f32; 3],
    pub tex_pos: [f32; 2],
    pub normal: [f32; 3],
}

/// A flat, subdivided water plane at a fixed level.
///
/// Subdivision keeps quads near `spacing` in world size so a vertex-displacing
/// wave shader has geometry to work with. Texture coordinates span `[0, 1]`
/// across the plane.
#[derive(Debug, Clone)]
pub struct WaterMesh {
    pub vertices: Vec<WaterVertex>,
    pub indices: Vec<u32>,
    pub level: f32,
}

impl WaterMesh {
    pub fn build(extent: f32, level: f32, spacing: f32) -> Self {
        let cells = (extent / spacing).ceil().max(1.0) as u32;
        let step = extent / cells as f32;
        let verts_per_side = cells + 1;

        let mut vertices = Vec::with_capacity((verts_per_side * verts_per_side) as usize);
        let mut indices = Vec::with_capacity((cells * cells * 6) as usize);
        for x in 0..verts_per_side {
            for z in 0..verts_per_side {
                let (wx, wz) = (x as f32 * step, z as f32 * step);
                vertices.push(WaterVertex {
                    position: [wx, level, wz],
                    tex_pos: [wx / extent, wz / extent],
                    normal: [0.0, 1.0, 0.0],
                });
                if x < cells && z < cells {
                    let i = x * verts_per_side + z;
                    indices.extend_from_slice(&[
                        i,
                        i + 1,
                        i + verts_per_side + 1,
                        i,
                        i + verts_per_side + 1,
                        i + verts_per_side,
                    ]);
                }
            }
        }
        Self {
            vertices,
            indices,
            level,
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subdivides_to_spacing() {
        let mesh = WaterMesh::build(100.0, 5.0, 10.0);
        // 10 cells per side -> 11x11 vertices, 200 triangles.
        assert_eq!(mesh.vertices.len(), 121);
        assert_eq!(mesh.triangle_count(), 200);
    }

    #[test]
    fn sits_at_level() {
        let mesh = WaterMesh::build(40.0, 36.0, 10.0);
        assert!(mesh.vertices.iter().all(|v| v.position[1] == 36.0));
        assert_eq!(mesh.level, 36.0);
    }

    #[test]
    fn tex_coords_span_unit_square() {
        let mesh = WaterMesh::build(64.0, 0.0, 16.0);
        let first = mesh.vertices.first().unwrap();
        let last = mesh.vertices.last().unwrap();
        assert_eq!(first.tex_pos, [0.0, 0.0]);
        assert_eq!(last.tex_pos, [1.0, 1.0]);
    }

    #[test]
    fn indices_stay_in_range() {
        let mesh = WaterMesh::build(30.0, 0.0, 7.0);
        let max = mesh.vertices.len() as u32;
        assert!(mesh.indices.iter().all(|&i| i < max));
    }
}
