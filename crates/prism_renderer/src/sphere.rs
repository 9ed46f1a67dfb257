//! Sphere primitive.

use std::f32::consts::PI;
use std::sync::Arc;

use prism_core::Material;
use prism_math::{Aabb, Interval, Ray, Vec2, Vec3};

use crate::hittable::{Hittable, Intersection};

/// A sphere primitive.
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: Arc<Material>,
    object_id: usize,
    bbox: Aabb,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: Vec3, radius: f32, material: Arc<Material>, object_id: usize) -> Self {
        let radius = radius.max(0.0);
        let rvec = Vec3::splat(radius);
        let bbox = Aabb::from_points(center - rvec, center + rvec);

        Self {
            center,
            radius,
            material,
            object_id,
            bbox,
        }
    }

    /// Get the UV coordinates for a point on the unit sphere.
    fn sphere_uv(p: Vec3) -> Vec2 {
        // theta: angle down from +Y
        // phi: angle around Y axis from +X
        let theta = (-p.y).acos();
        let phi = (-p.z).atan2(p.x) + PI;

        Vec2::new(phi / (2.0 * PI), theta / PI)
    }
}

impl Hittable for Sphere {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<Intersection<'_>> {
        if self.radius <= 0.0 {
            return None;
        }

        let oc = self.center - ray.origin();
        let a = ray.direction().length_squared();
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 || a == 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (h + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return None;
            }
        }

        let outward_normal = (ray.at(root) - self.center) / self.radius;
        Some(Intersection {
            t: root,
            normal: outward_normal.normalize(),
            material: &self.material,
            uv: Self::sphere_uv(outward_normal),
            object_id: self.object_id,
        })
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_math::RayKind;

    fn unit_sphere() -> Sphere {
        Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, Arc::new(Material::default()), 3)
    }

    #[test]
    fn test_sphere_hit() {
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z, RayKind::Visibility);
        let sphere = unit_sphere();
        let rec = sphere.hit(&ray, Interval::forward()).unwrap();

        assert!((rec.t - 0.5).abs() < 0.001);
        assert!((rec.normal - Vec3::Z).length() < 1e-5);
        assert_eq!(rec.object_id, 3);
    }

    #[test]
    fn test_sphere_miss() {
        let ray = Ray::new(Vec3::ZERO, Vec3::Y, RayKind::Visibility);
        assert!(unit_sphere().hit(&ray, Interval::forward()).is_none());
    }

    #[test]
    fn test_inside_hit_keeps_outward_normal() {
        // From the center the far wall is hit and the normal still points out.
        let ray = Ray::new(Vec3::new(0.0, 0.0, -1.0), Vec3::NEG_Z, RayKind::Refraction);
        let sphere = unit_sphere();
        let rec = sphere.hit(&ray, Interval::forward()).unwrap();

        assert!((rec.t - 0.5).abs() < 0.001);
        assert!((rec.normal - Vec3::NEG_Z).length() < 1e-5);
        assert!(ray.direction().dot(rec.normal) > 0.0);
    }

    #[test]
    fn test_surface_origin_skips_self_hit() {
        // A ray leaving the surface outward must not hit the same sphere again.
        let ray = Ray::new(Vec3::new(0.0, 0.0, -0.5), Vec3::Z, RayKind::Reflection);
        assert!(unit_sphere().hit(&ray, Interval::forward()).is_none());
    }
}
