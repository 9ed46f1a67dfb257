//! Scene description consumed by the renderer.
//!
//! A scene is built once (by hand or by the loader) and is read-only while a
//! frame is traced.

use std::sync::Arc;

use prism_math::Vec3;

use crate::camera::Camera;
use crate::light::Light;
use crate::material::Material;
use crate::mesh::Mesh;
use crate::Color;

/// An intersectable object.
#[derive(Clone, Debug)]
pub enum SceneObject {
    Sphere {
        center: Vec3,
        radius: f32,
        material: Arc<Material>,
    },
    Trimesh {
        mesh: Arc<Mesh>,
        material: Arc<Material>,
    },
}

impl SceneObject {
    pub fn material(&self) -> &Arc<Material> {
        match self {
            SceneObject::Sphere { material, .. } | SceneObject::Trimesh { material, .. } => {
                material
            }
        }
    }

    /// Number of primitives this object contributes to the renderer.
    pub fn primitive_count(&self) -> usize {
        match self {
            SceneObject::Sphere { .. } => 1,
            SceneObject::Trimesh { mesh, .. } => mesh.triangle_count(),
        }
    }
}

/// The complete scene: objects, lights, ambient light and camera.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    /// Scene name (file stem when loaded from disk)
    pub name: String,
    pub camera: Camera,
    /// Global ambient light color
    pub ambient: Color,
    /// Lights in shading order
    pub lights: Vec<Light>,
    pub objects: Vec<SceneObject>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_camera(mut self, camera: Camera) -> Self {
        self.camera = camera;
        self
    }

    pub fn with_ambient(mut self, ambient: Color) -> Self {
        self.ambient = ambient;
        self
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    /// Add a sphere and return its object ID.
    pub fn add_sphere(&mut self, center: Vec3, radius: f32, material: Arc<Material>) -> usize {
        self.objects.push(SceneObject::Sphere {
            center,
            radius: radius.max(0.0),
            material,
        });
        self.objects.len() - 1
    }

    /// Add a triangle mesh and return its object ID.
    ///
    /// Vertex normals are generated here when the mesh has none.
    pub fn add_mesh(&mut self, mut mesh: Mesh, material: Arc<Material>) -> usize {
        mesh.ensure_normals();
        self.objects.push(SceneObject::Trimesh {
            mesh: Arc::new(mesh),
            material,
        });
        self.objects.len() - 1
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn light_count(&self) -> usize {
        self.lights.len()
    }

    /// Total spheres plus triangles.
    pub fn primitive_count(&self) -> usize {
        self.objects.iter().map(SceneObject::primitive_count).sum()
    }
}
