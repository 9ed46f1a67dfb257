use crate::Vec3;

/// What a ray is being traced for.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum RayKind {
    /// Primary ray from the camera.
    Visibility,
    /// Mirror bounce off a surface.
    Reflection,
    /// Transmitted ray through a surface.
    Refraction,
    /// Occlusion probe toward a light.
    Shadow,
}

/// A ray in 3D space with origin, direction, and kind.
///
/// Directions are unit length by convention; constructors do not enforce it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    pub kind: RayKind,
}

impl Ray {
    /// Create a new ray.
    pub fn new(origin: Vec3, direction: Vec3, kind: RayKind) -> Self {
        Self {
            origin,
            direction,
            kind,
        }
    }

    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    #[inline]
    pub fn kind(&self) -> RayKind {
        self.kind
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}
