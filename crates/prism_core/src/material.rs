//! Phong material description.
//!
//! Every coefficient is a `MaterialParameter`: either a constant color or a
//! texture map sampled at the hit's UV coordinates.

use std::sync::Arc;

use prism_math::{Vec2, Vec3};

use crate::texture::TextureMap;
use crate::Color;

/// A material coefficient, constant or texture driven.
#[derive(Clone, Debug)]
pub enum MaterialParameter {
    Constant(Color),
    Texture(Arc<TextureMap>),
}

impl MaterialParameter {
    /// Scalar parameter stored as a gray color.
    pub fn scalar(value: f32) -> Self {
        MaterialParameter::Constant(Vec3::splat(value))
    }

    pub fn is_mapped(&self) -> bool {
        matches!(self, MaterialParameter::Texture(_))
    }

    /// Color value at `uv`.
    pub fn value(&self, uv: Vec2) -> Color {
        match self {
            MaterialParameter::Constant(c) => *c,
            MaterialParameter::Texture(map) => map.mapped_value(uv),
        }
    }

    /// Luminance of the value at `uv`.
    pub fn intensity_value(&self, uv: Vec2) -> f32 {
        let v = self.value(uv);
        0.299 * v.x + 0.587 * v.y + 0.114 * v.z
    }
}

impl Default for MaterialParameter {
    fn default() -> Self {
        MaterialParameter::Constant(Color::ZERO)
    }
}

impl From<Color> for MaterialParameter {
    fn from(c: Color) -> Self {
        MaterialParameter::Constant(c)
    }
}

impl From<Arc<TextureMap>> for MaterialParameter {
    fn from(map: Arc<TextureMap>) -> Self {
        MaterialParameter::Texture(map)
    }
}

/// Surface material for Phong shading and recursive reflection/refraction.
#[derive(Clone, Debug)]
pub struct Material {
    /// Material name (from the scene file)
    pub name: String,
    /// Emissive
    pub ke: MaterialParameter,
    /// Ambient
    pub ka: MaterialParameter,
    /// Specular
    pub ks: MaterialParameter,
    /// Diffuse
    pub kd: MaterialParameter,
    /// Reflective
    pub kr: MaterialParameter,
    /// Transmissive
    pub kt: MaterialParameter,
    /// Phong exponent
    pub shininess: MaterialParameter,
    /// Index of refraction
    pub index: MaterialParameter,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: String::new(),
            ke: MaterialParameter::default(),
            ka: MaterialParameter::default(),
            ks: MaterialParameter::default(),
            kd: MaterialParameter::default(),
            kr: MaterialParameter::default(),
            kt: MaterialParameter::default(),
            shininess: MaterialParameter::scalar(0.0),
            index: MaterialParameter::scalar(1.0),
        }
    }
}

impl Material {
    /// Create a new material with just a name and diffuse color.
    pub fn new(name: impl Into<String>, diffuse: Color) -> Self {
        Self {
            name: name.into(),
            kd: diffuse.into(),
            ..Default::default()
        }
    }

    pub fn ke(&self, uv: Vec2) -> Color {
        self.ke.value(uv)
    }

    pub fn ka(&self, uv: Vec2) -> Color {
        self.ka.value(uv)
    }

    pub fn ks(&self, uv: Vec2) -> Color {
        self.ks.value(uv)
    }

    pub fn kd(&self, uv: Vec2) -> Color {
        self.kd.value(uv)
    }

    pub fn kr(&self, uv: Vec2) -> Color {
        self.kr.value(uv)
    }

    pub fn kt(&self, uv: Vec2) -> Color {
        self.kt.value(uv)
    }

    /// Phong exponent. Texture-mapped exponents are rescaled from [0, 1] to [0, 128].
    pub fn shininess(&self, uv: Vec2) -> f32 {
        let s = self.shininess.intensity_value(uv);
        if self.shininess.is_mapped() {
            128.0 * s
        } else {
            s
        }
    }

    pub fn index(&self, uv: Vec2) -> f32 {
        self.index.intensity_value(uv)
    }

    /// True when any channel of `kt` lets light through at `uv`.
    pub fn is_transmissive(&self, uv: Vec2) -> bool {
        self.kt(uv).element_sum() > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_material_is_black_and_opaque() {
        let m = Material::default();

        assert_eq!(m.kd(Vec2::ZERO), Color::ZERO);
        assert!((m.index(Vec2::ZERO) - 1.0).abs() < 1e-5);
        assert!(!m.is_transmissive(Vec2::ZERO));
    }

    #[test]
    fn test_scalar_intensity_round_trips() {
        let p = MaterialParameter::scalar(1.5);
        assert!((p.intensity_value(Vec2::ZERO) - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_intensity_uses_luminance_weights() {
        let p = MaterialParameter::from(Color::new(1.0, 0.0, 0.0));
        assert!((p.intensity_value(Vec2::ZERO) - 0.299).abs() < 1e-6);
    }

    #[test]
    fn test_mapped_shininess_is_rescaled() {
        let white = TextureMap::from_rgb(1, 1, vec![255, 255, 255], "<white>").unwrap();
        let m = Material {
            shininess: MaterialParameter::Texture(Arc::new(white)),
            ..Default::default()
        };

        assert!((m.shininess(Vec2::ZERO) - 128.0).abs() < 1e-3);
    }

    #[test]
    fn test_textured_parameter_samples_map() {
        let red = TextureMap::from_rgb(1, 1, vec![255, 0, 0], "<red>").unwrap();
        let m = Material {
            kd: Arc::new(red).into(),
            ..Default::default()
        };

        assert_eq!(m.kd(Vec2::new(0.4, 0.6)), Color::new(1.0, 0.0, 0.0));
    }
}
