//! Phong local illumination.

use prism_core::{Color, Light};
use prism_math::{Interval, Ray, RayKind, Vec3};

use crate::hittable::Intersection;
use crate::world::World;

/// How light visibility is resolved during shading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ShadowMode {
    /// Every light fully reaches every point.
    #[default]
    Disabled,
    /// Cast a shadow ray toward each light. Every surface crossed before the
    /// light filters it by its transmissive color.
    Occlusion,
}

/// Local Phong color at `isect`.
///
/// `ke + ka * ambient` plus, for every light in scene order, diffuse and
/// specular terms scaled by the light color, its distance attenuation and its
/// shadow attenuation. The result is not clamped.
pub fn shade(world: &World, ray: &Ray, isect: &Intersection<'_>, shadows: ShadowMode) -> Color {
    let material = isect.material;
    let uv = isect.uv;
    let normal = isect.normal;
    let point = ray.at(isect.t);

    let view = (world.camera().eye() - point).normalize_or_zero();
    let kd = material.kd(uv);
    let ks = material.ks(uv);
    let shininess = material.shininess(uv);

    let mut color = material.ke(uv) + material.ka(uv) * world.ambient();

    for light in world.lights() {
        let to_light = light.direction(point);
        let n_dot_l = normal.dot(to_light);

        let diffuse = kd * n_dot_l.max(0.0);
        let reflected = 2.0 * n_dot_l * normal - to_light;
        let specular = ks * view.dot(reflected).max(0.0).powf(shininess);

        color += (diffuse + specular)
            * light.color(point)
            * light.distance_attenuation(point)
            * shadow_attenuation(world, light, point, shadows);
    }

    color
}

/// Fraction of `light` reaching `point`, per channel.
pub fn shadow_attenuation(world: &World, light: &Light, point: Vec3, mode: ShadowMode) -> Color {
    match mode {
        ShadowMode::Disabled => light.shadow_attenuation(point),
        ShadowMode::Occlusion => {
            let direction = light.direction(point);
            let mut origin = point;
            let mut remaining = light.distance(point).unwrap_or(f32::INFINITY);
            let mut attenuation = Color::ONE;

            // Every surface up to the light filters what is left.
            while attenuation != Color::ZERO {
                let ray = Ray::new(origin, direction, RayKind::Shadow);
                let Some(blocker) =
                    world.intersect_within(&ray, Interval::forward().with_max(remaining))
                else {
                    break;
                };
                attenuation *= blocker.material.kt(blocker.uv);
                origin = ray.at(blocker.t);
                remaining -= blocker.t;
            }

            attenuation
        }
    }
}
