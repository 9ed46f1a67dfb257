//! Light sources.

use prism_math::Vec3;
use serde::Deserialize;

use crate::Color;

/// A scene light.
///
/// The set of light types is fixed, so lights are a closed enum rather than
/// trait objects.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Light {
    /// Infinitely distant light shining along `orientation`.
    Directional { orientation: Vec3, color: Color },

    /// Point light with `f(d) = min(1, 1 / (constant + linear d + quadratic d^2))` falloff.
    Point {
        position: Vec3,
        color: Color,
        #[serde(default = "default_constant")]
        constant: f32,
        #[serde(default)]
        linear: f32,
        #[serde(default)]
        quadratic: f32,
    },
}

fn default_constant() -> f32 {
    1.0
}

impl Light {
    /// Directional light; `orientation` is normalized.
    pub fn directional(orientation: Vec3, color: Color) -> Self {
        Light::Directional {
            orientation: orientation.normalize(),
            color,
        }
    }

    /// Point light with no distance falloff.
    pub fn point(position: Vec3, color: Color) -> Self {
        Light::Point {
            position,
            color,
            constant: 1.0,
            linear: 0.0,
            quadratic: 0.0,
        }
    }

    /// Replace the attenuation coefficients of a point light.
    ///
    /// Directional lights are returned unchanged.
    pub fn with_attenuation(self, a: f32, b: f32, c: f32) -> Self {
        match self {
            Light::Point {
                position, color, ..
            } => Light::Point {
                position,
                color,
                constant: a,
                linear: b,
                quadratic: c,
            },
            directional => directional,
        }
    }

    /// Unit vector from `p` toward the light.
    pub fn direction(&self, p: Vec3) -> Vec3 {
        match self {
            Light::Directional { orientation, .. } => -orientation.normalize(),
            Light::Point { position, .. } => (*position - p).normalize(),
        }
    }

    /// Light color arriving at `p`.
    pub fn color(&self, _p: Vec3) -> Color {
        match self {
            Light::Directional { color, .. } | Light::Point { color, .. } => *color,
        }
    }

    /// Scalar intensity falloff at `p`, in `[0, 1]`.
    pub fn distance_attenuation(&self, p: Vec3) -> f32 {
        match self {
            // Infinitely far away: no falloff
            Light::Directional { .. } => 1.0,
            Light::Point {
                position,
                constant,
                linear,
                quadratic,
                ..
            } => {
                let d = (p - *position).length();
                (1.0 / (constant + linear * d + quadratic * d * d)).min(1.0)
            }
        }
    }

    /// Distance from `p` to the light, `None` for directional lights.
    pub fn distance(&self, p: Vec3) -> Option<f32> {
        match self {
            Light::Directional { .. } => None,
            Light::Point { position, .. } => Some((*position - p).length()),
        }
    }

    /// Occlusion factor at `p`: 1 = fully lit, 0 = fully occluded.
    ///
    /// Lights on their own know nothing about the geometry between them and
    /// `p`, so this always reports fully lit. Occlusion testing against the
    /// scene is done by the renderer when shadows are enabled.
    pub fn shadow_attenuation(&self, _p: Vec3) -> Color {
        Color::ONE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directional_light_points_against_orientation() {
        let light = Light::directional(Vec3::new(0.0, -2.0, 0.0), Color::ONE);

        assert_eq!(light.direction(Vec3::new(5.0, 1.0, -3.0)), Vec3::Y);
        assert_eq!(light.distance_attenuation(Vec3::splat(100.0)), 1.0);
        assert_eq!(light.distance(Vec3::ZERO), None);
    }

    #[test]
    fn test_point_light_direction() {
        let light = Light::point(Vec3::new(0.0, 10.0, 0.0), Color::ONE);
        let dir = light.direction(Vec3::ZERO);

        assert!((dir - Vec3::Y).length() < 1e-6);
        assert_eq!(light.distance(Vec3::ZERO), Some(10.0));
    }

    #[test]
    fn test_point_light_attenuation_is_capped_at_one() {
        let light = Light::point(Vec3::ZERO, Color::ONE).with_attenuation(0.0, 0.0, 0.0);
        assert_eq!(light.distance_attenuation(Vec3::X), 1.0);

        let light = Light::point(Vec3::ZERO, Color::ONE).with_attenuation(0.25, 0.0, 0.0);
        assert_eq!(light.distance_attenuation(Vec3::X), 1.0);
    }

    #[test]
    fn test_point_light_quadratic_falloff() {
        let light = Light::point(Vec3::ZERO, Color::ONE).with_attenuation(1.0, 0.0, 1.0);

        // 1 / (1 + 0 * 2 + 1 * 4)
        let f = light.distance_attenuation(Vec3::new(2.0, 0.0, 0.0));
        assert!((f - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_shadow_attenuation_is_fully_lit() {
        let point = Light::point(Vec3::ZERO, Color::ONE);
        let directional = Light::directional(Vec3::NEG_Y, Color::ONE);

        assert_eq!(point.shadow_attenuation(Vec3::X), Color::ONE);
        assert_eq!(directional.shadow_attenuation(Vec3::X), Color::ONE);
    }

    #[test]
    fn test_deserialize_point_light_defaults() {
        let json = r#"{ "type": "point", "position": [0, 1, 0], "color": [1, 1, 1] }"#;
        let light: Light = serde_json::from_str(json).unwrap();

        assert_eq!(light, Light::point(Vec3::Y, Color::ONE));
    }
}
