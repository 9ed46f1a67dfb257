//! Hittable trait and Intersection record for ray-object intersection.

use prism_core::Material;
use prism_math::{Aabb, Interval, Ray, Vec2, Vec3};

/// Record of a ray-object intersection.
#[derive(Debug, Clone, Copy)]
pub struct Intersection<'a> {
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Unit surface normal. Not flipped toward the ray: refraction reads the
    /// side of the surface from its sign.
    pub normal: Vec3,
    /// Material at the intersection point
    pub material: &'a Material,
    /// Texture coordinates (barycentric weights for triangles)
    pub uv: Vec2,
    /// Index of the owning object in the scene
    pub object_id: usize,
}

/// Trait for objects that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Nearest hit with `t` strictly inside `ray_t`, if any.
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<Intersection<'_>>;

    /// Get the axis-aligned bounding box of this object.
    fn bounding_box(&self) -> Aabb;
}
