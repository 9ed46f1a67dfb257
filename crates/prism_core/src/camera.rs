//! Pinhole camera mapping normalized image coordinates to primary rays.

use prism_math::{Ray, RayKind, Vec3};

/// Camera for generating primary rays into the scene.
///
/// Image-plane coordinates run over `[0, 1]` on both axes with `(0, 0)` at
/// the bottom-left corner, so `y` grows upward.
#[derive(Debug, Clone)]
pub struct Camera {
    // Camera positioning
    eye: Vec3,
    look_at: Vec3,
    vup: Vec3,

    /// Image plane height at unit distance from the eye, i.e. `2 tan(fov / 2)`
    normalized_height: f32,
    aspect: f32,

    // Cached basis (set by update())
    look: Vec3,
    u: Vec3,
    v: Vec3,
}

impl Camera {
    /// Camera at the origin looking down -Z with a unit-height image plane.
    pub fn new() -> Self {
        let mut camera = Self {
            eye: Vec3::ZERO,
            look_at: Vec3::NEG_Z,
            vup: Vec3::Y,
            normalized_height: 1.0,
            aspect: 1.0,
            look: Vec3::NEG_Z,
            u: Vec3::X,
            v: Vec3::Y,
        };
        camera.update();
        camera
    }

    /// Set camera position.
    pub fn with_position(mut self, eye: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.eye = eye;
        self.look_at = look_at;
        self.vup = vup;
        self.update();
        self
    }

    /// Set the vertical field of view in degrees.
    pub fn with_fov(mut self, fov_degrees: f32) -> Self {
        self.normalized_height = 2.0 * (fov_degrees.to_radians() / 2.0).tan();
        self.update();
        self
    }

    /// Set the width / height ratio of the image plane.
    pub fn with_aspect(mut self, aspect: f32) -> Self {
        self.set_aspect(aspect);
        self
    }

    /// Update aspect ratio (e.g., when the output size changes).
    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
        self.update();
    }

    fn update(&mut self) {
        self.look = (self.look_at - self.eye).normalize_or_zero();
        if self.look == Vec3::ZERO {
            log::warn!("Camera eye and look-at coincide, looking down -Z");
            self.look = Vec3::NEG_Z;
        }

        let mut right = self.look.cross(self.vup).normalize_or_zero();
        if right == Vec3::ZERO {
            // Looking straight along the up vector; pick any perpendicular.
            right = self.look.any_orthonormal_vector();
        }
        let up = right.cross(self.look);

        self.u = right * self.normalized_height * self.aspect;
        self.v = up * self.normalized_height;
    }

    /// Build the primary ray through normalized image coordinates `(x, y)`.
    pub fn ray_through(&self, x: f32, y: f32) -> Ray {
        let x = x - 0.5;
        let y = y - 0.5;
        let direction = (self.look + x * self.u + y * self.v).normalize();
        Ray::new(self.eye, direction, RayKind::Visibility)
    }

    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    /// Unit viewing direction.
    pub fn look(&self) -> Vec3 {
        self.look
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
