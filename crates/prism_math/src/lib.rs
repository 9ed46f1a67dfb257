// Re-export glam for convenience
pub use glam::*;

// Prism math types
mod aabb;
mod interval;
mod ray;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::{Ray, RayKind};

/// Minimum accepted hit distance along a ray.
///
/// Secondary rays start exactly on a surface; hits closer than this are the
/// surface itself and are rejected.
pub const RAY_EPSILON: f32 = 1e-4;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_operations() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert_eq!(a + b, Vec3::new(5.0, 7.0, 9.0));
    }

    #[test]
    fn test_color_product_is_componentwise() {
        let a = Vec3::new(0.5, 1.0, 2.0);
        let b = Vec3::new(2.0, 3.0, 0.25);
        assert_eq!(a * b, Vec3::new(1.0, 3.0, 0.5));
    }
}
