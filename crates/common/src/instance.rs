use bytemuck::{Pod, Zeroable};
use glam::Mat4;

/// Per-instance record as a renderer binds it: a column-major model transform
/// split into four vec4 vertex attributes, followed by an RGBA color.
///
/// A zeroed record carries the transparent color `(0, 0, 0, 0)`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct InstanceRaw {
    pub model_0: [f32; 4],
    pub model_1: [f32; 4],
    pub model_2: [f32; 4],
    pub model_3: [f32; 4],
    pub color: [f32; 4],
}

impl InstanceRaw {
    pub fn new(model: Mat4, color: [f32; 4]) -> Self {
        let cols = model.to_cols_array_2d();
        Self {
            model_0: cols[0],
            model_1: cols[1],
            model_2: cols[2],
            model_3: cols[3],
            color,
        }
    }

    /// Reassemble the model transform from the four column attributes.
    pub fn model(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&[self.model_0, self.model_1, self.model_2, self.model_3])
    }
}

impl Default for InstanceRaw {
    fn default() -> Self {
        Self::zeroed()
    }
}
