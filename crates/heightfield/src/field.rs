use image::DynamicImage;
use serde::{Deserialize, Serialize};

/// Errors from height-field construction.
#[derive(Debug, thiserror::Error)]
pub enum HeightFieldError {
    #[error("image decode error: {0}")]
    Image(#[from] image::ImageError),
    #[error("height field has zero extent ({width}x{height})")]
    Empty { width: u32, height: u32 },
    #[error("value count {count} does not match {width}x{height}")]
    ValueCount { count: usize, width: u32, height: u32 },
}

/// How texture coordinates outside the field resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeMode {
    /// Clamp to the border texel.
    #[default]
    Clamp,
    /// Wrap around, tiling the field.
    Repeat,
}

/// An immutable 2D scalar field decoded from a grayscale image.
///
/// Values are luma normalized to `[0, 1]`. Lookups take texture coordinates in
/// texel units; fractional coordinates truncate to the containing texel
/// (point sampling at mip level 0).
#[derive(Debug, Clone)]
pub struct HeightField {
    values: Vec<f32>,
    width: u32,
    height: u32,
    edge: EdgeMode,
}

impl HeightField {
    /// Decode an encoded image (PNG, etc.) into a height field.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, HeightFieldError> {
        let image = image::load_from_memory(bytes)?;
        Self::from_image(&image)
    }

    /// Convert a decoded image, taking luma of each pixel.
    pub fn from_image(image: &DynamicImage) -> Result<Self, HeightFieldError> {
        let luma = image.to_luma8();
        let (width, height) = luma.dimensions();
        let values = luma.pixels().map(|p| f32::from(p.0[0]) / 255.0).collect();
        tracing::debug!(width, height, "decoded height field");
        Self::from_values(values, width, height)
    }

    /// Build a field from raw row-major values (row stride = `width`).
    pub fn from_values(values: Vec<f32>, width: u32, height: u32) -> Result<Self, HeightFieldError> {
        if width == 0 || height == 0 {
            return Err(HeightFieldError::Empty { width, height });
        }
        if values.len() != width as usize * height as usize {
            return Err(HeightFieldError::ValueCount {
                count: values.len(),
                width,
                height,
            });
        }
        Ok(Self {
            values,
            width,
            height,
            edge: EdgeMode::default(),
        })
    }

    pub fn with_edge_mode(mut self, edge: EdgeMode) -> Self {
        self.edge = edge;
        self
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn edge_mode(&self) -> EdgeMode {
        self.edge
    }

    /// Value of the texel containing `(u, v)`, in texel units.
    pub fn sample(&self, u: f32, v: f32) -> f32 {
        self.texel(u.floor() as i64, v.floor() as i64)
    }

    /// Texel lookup with integral coordinates, resolved through the edge mode.
    pub fn texel(&self, x: i64, y: i64) -> f32 {
        let (w, h) = (i64::from(self.width), i64::from(self.height));
        let (x, y) = match self.edge {
            EdgeMode::Clamp => (x.clamp(0, w - 1), y.clamp(0, h - 1)),
            EdgeMode::Repeat => (x.rem_euclid(w), y.rem_euclid(h)),
        };
        self.values[y as usize * self.width as usize + x as usize]
    }

    /// Terrain surface height at world position `(x, z)`.
    ///
    /// Bilinearly interpolates the linear height `luma * height_scale` between
    /// the four surrounding texels; `spacing` is the world size of one texel.
    pub fn surface_height(&self, x: f32, z: f32, spacing: f32, height_scale: f32) -> f32 {
        let u = (x / spacing).clamp(0.0, self.width as f32);
        let v = (z / spacing).clamp(0.0, self.height as f32);
        let (uf, vf) = (u.fract(), v.fract());
        let (u0, v0) = (u.floor() as i64, v.floor() as i64);

        let h00 = self.texel(u0, v0) * height_scale;
        let h10 = self.texel(u0 + 1, v0) * height_scale;
        let h01 = self.texel(u0, v0 + 1) * height_scale;
        let h11 = self.texel(u0 + 1, v0 + 1) * height_scale;

        let near = h00 + (h10 - h00) * uf;
        let far = h01 + (h11 - h01) * uf;
        near + (far - near) * vf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp_field() -> HeightField {
        // 2x2 field: column x=0 holds 0.0, column x=1 holds 1.0.
        HeightField::from_values(vec![0.0, 1.0, 0.0, 1.0], 2, 2).unwrap()
    }

    #[test]
    fn rejects_empty_and_mismatched() {
        assert!(matches!(
            HeightField::from_values(vec![], 0, 4),
            Err(HeightFieldError::Empty { .. })
        ));
        assert!(matches!(
            HeightField::from_values(vec![0.0; 3], 2, 2),
            Err(HeightFieldError::ValueCount { count: 3, .. })
        ));
    }

    #[test]
    fn sample_truncates_to_texel() {
        let field = ramp_field();
        assert_eq!(field.sample(0.0, 0.0), 0.0);
        assert_eq!(field.sample(0.99, 0.99), 0.0);
        assert_eq!(field.sample(1.0, 0.0), 1.0);
        assert_eq!(field.sample(1.7, 1.2), 1.0);
    }

    #[test]
    fn clamp_edge_extends_border() {
        let field = ramp_field();
        assert_eq!(field.sample(-5.0, 0.0), 0.0);
        assert_eq!(field.sample(40.0, 3.0), 1.0);
    }

    #[test]
    fn repeat_edge_tiles() {
        let field = ramp_field().with_edge_mode(EdgeMode::Repeat);
        assert_eq!(field.sample(2.0, 0.0), 0.0);
        assert_eq!(field.sample(3.0, 0.0), 1.0);
        assert_eq!(field.sample(-1.0, 0.0), 1.0);
    }

    #[test]
    fn surface_height_interpolates() {
        let field = ramp_field();
        // Halfway between the 0.0 and 1.0 columns at height scale 100.
        let h = field.surface_height(0.5, 0.0, 1.0, 100.0);
        assert!((h - 50.0).abs() < 1e-4);
        // On a texel center the value is exact.
        let h = field.surface_height(1.0, 0.0, 1.0, 100.0);
        assert!((h - 100.0).abs() < 1e-4);
    }

    #[test]
    fn surface_height_respects_spacing() {
        let field = ramp_field();
        // spacing 2.0 puts the 1.0 column at world x = 2.0.
        let h = field.surface_height(1.0, 0.0, 2.0, 100.0);
        assert!((h - 50.0).abs() < 1e-4);
    }

    #[test]
    fn decodes_luma_from_image() {
        let mut img = image::GrayImage::new(2, 1);
        img.put_pixel(0, 0, image::Luma([0]));
        img.put_pixel(1, 0, image::Luma([255]));
        let field = HeightField::from_image(&DynamicImage::ImageLuma8(img)).unwrap();
        assert_eq!(field.sample(0.0, 0.0), 0.0);
        assert_eq!(field.sample(1.0, 0.0), 1.0);
    }
}
