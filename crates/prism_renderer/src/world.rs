//! Render-ready world: a scene plus its intersection acceleration structure.

use std::sync::Arc;

use prism_core::{Camera, Color, Light, Scene, SceneObject};
use prism_math::{Interval, Ray};

use crate::bvh::BvhNode;
use crate::hittable::{Hittable, Intersection};
use crate::sphere::Sphere;
use crate::triangle::Triangle;

/// A scene prepared for tracing. Read-only once built.
pub struct World {
    scene: Scene,
    bvh: BvhNode,
}

impl World {
    /// Split every scene object into primitives and build the BVH over them.
    pub fn new(scene: Scene) -> Self {
        let mut primitives: Vec<Box<dyn Hittable>> = Vec::with_capacity(scene.primitive_count());

        for (object_id, object) in scene.objects.iter().enumerate() {
            match object {
                SceneObject::Sphere {
                    center,
                    radius,
                    material,
                } => {
                    primitives.push(Box::new(Sphere::new(
                        *center,
                        *radius,
                        Arc::clone(material),
                        object_id,
                    )));
                }
                SceneObject::Trimesh { mesh, material } => {
                    for tri in Triangle::from_mesh(mesh, material, object_id) {
                        primitives.push(Box::new(tri));
                    }
                }
            }
        }

        let primitive_count = primitives.len();
        let bvh = BvhNode::new(primitives);
        log::debug!(
            "Built BVH for '{}': {} primitives, depth {}",
            scene.name,
            primitive_count,
            bvh.depth()
        );

        Self { scene, bvh }
    }

    /// Nearest hit in front of the ray origin.
    pub fn intersect(&self, ray: &Ray) -> Option<Intersection<'_>> {
        self.bvh.hit(ray, Interval::forward())
    }

    /// Nearest hit with `t` strictly inside `ray_t`.
    pub fn intersect_within(&self, ray: &Ray, ray_t: Interval) -> Option<Intersection<'_>> {
        self.bvh.hit(ray, ray_t)
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.scene.camera
    }

    pub fn lights(&self) -> &[Light] {
        &self.scene.lights
    }

    pub fn ambient(&self) -> Color {
        self.scene.ambient
    }
}
