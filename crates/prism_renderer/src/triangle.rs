//! Triangle primitive using the Möller-Trumbore intersection algorithm.

use std::sync::Arc;

use prism_core::{Material, Mesh};
use prism_math::{Aabb, Interval, Ray, Vec2, Vec3};

use crate::hittable::{Hittable, Intersection};

/// A single face of a shared triangle mesh.
pub struct Triangle {
    mesh: Arc<Mesh>,
    face: usize,
    material: Arc<Material>,
    object_id: usize,
    bbox: Aabb,
}

impl Triangle {
    /// Create a triangle referencing face `face` of `mesh`.
    pub fn new(mesh: Arc<Mesh>, face: usize, material: Arc<Material>, object_id: usize) -> Self {
        let [v0, v1, v2] = mesh.face_vertices(face);
        let bbox = Aabb::from_points(v0.min(v1).min(v2), v0.max(v1).max(v2));

        Self {
            mesh,
            face,
            material,
            object_id,
            bbox,
        }
    }

    /// Split every face of `mesh` into its own triangle primitive.
    pub fn from_mesh(mesh: &Arc<Mesh>, material: &Arc<Material>, object_id: usize) -> Vec<Self> {
        (0..mesh.triangle_count())
            .map(|face| Self::new(Arc::clone(mesh), face, Arc::clone(material), object_id))
            .collect()
    }

    /// Möller-Trumbore test returning `(t, u, v)`.
    ///
    /// `u` and `v` weight the second and third corners. Rays parallel to the
    /// plane (determinant exactly zero) miss.
    fn intersect(&self, ray: &Ray) -> Option<(f32, f32, f32)> {
        let [v0, v1, v2] = self.mesh.face_vertices(self.face);
        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        let pvec = ray.direction().cross(edge2);
        let det = edge1.dot(pvec);
        if det == 0.0 {
            return None;
        }
        let inv_det = 1.0 / det;

        let tvec = ray.origin() - v0;
        let u = tvec.dot(pvec) * inv_det;
        let qvec = tvec.cross(edge1);
        let v = ray.direction().dot(qvec) * inv_det;

        if u < 0.0 || v < 0.0 {
            return None;
        }
        if u + v > 1.0 {
            return None;
        }

        Some((edge2.dot(qvec) * inv_det, u, v))
    }

    /// Surface normal at barycentric `(u, v)`.
    ///
    /// Interpolates the vertex normals when present, otherwise falls back to
    /// the geometric face normal.
    fn normal_at(&self, u: f32, v: f32) -> Vec3 {
        if let Some(normals) = &self.mesh.normals {
            let [a, b, c] = self.mesh.faces[self.face];
            let n = normals[a as usize] * (1.0 - u - v)
                + normals[b as usize] * u
                + normals[c as usize] * v;
            let n = n.normalize_or_zero();
            if n != Vec3::ZERO {
                return n;
            }
        }
        self.mesh.face_normal(self.face)
    }
}

impl Hittable for Triangle {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<Intersection<'_>> {
        let (t, u, v) = self.intersect(ray)?;
        if !ray_t.surrounds(t) {
            return None;
        }

        Some(Intersection {
            t,
            normal: self.normal_at(u, v),
            material: &self.material,
            // Barycentric weights double as texture coordinates.
            uv: Vec2::new(u, v),
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

    fn unit_triangle(with_normals: bool) -> Triangle {
        let mut mesh = Mesh::new(vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ]);
        mesh.add_face(0, 1, 2).unwrap();
        if with_normals {
            mesh.ensure_normals();
        }
        Triangle::new(Arc::new(mesh), 0, Arc::new(Material::default()), 0)
    }

    fn ray_toward(x: f32, y: f32) -> Ray {
        Ray::new(Vec3::new(x, y, 1.0), Vec3::NEG_Z, RayKind::Visibility)
    }

    #[test]
    fn test_centroid_barycentrics() {
        let tri = unit_triangle(true);
        let rec = tri
            .hit(&ray_toward(1.0 / 3.0, 1.0 / 3.0), Interval::forward())
            .unwrap();

        assert!((rec.t - 1.0).abs() < 1e-5);
        assert!((rec.uv.x - 1.0 / 3.0).abs() < 1e-5);
        assert!((rec.uv.y - 1.0 / 3.0).abs() < 1e-5);
        let w = 1.0 - rec.uv.x - rec.uv.y;
        assert!((w + rec.uv.x + rec.uv.y - 1.0).abs() < 1e-6);
        assert!((rec.normal - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_rejects_outside_each_edge() {
        let tri = unit_triangle(true);

        // u < 0
        assert!(tri.hit(&ray_toward(-0.1, 0.5), Interval::forward()).is_none());
        // v < 0
        assert!(tri.hit(&ray_toward(0.5, -0.1), Interval::forward()).is_none());
        // u + v > 1
        assert!(tri.hit(&ray_toward(0.6, 0.6), Interval::forward()).is_none());
    }

    #[test]
    fn test_parallel_ray_misses() {
        let tri = unit_triangle(true);
        let ray = Ray::new(Vec3::new(-1.0, 0.2, 0.0), Vec3::X, RayKind::Visibility);
        assert!(tri.hit(&ray, Interval::forward()).is_none());
    }

    #[test]
    fn test_hit_behind_origin_rejected() {
        let tri = unit_triangle(true);
        let ray = Ray::new(Vec3::new(0.2, 0.2, 1.0), Vec3::Z, RayKind::Visibility);
        assert!(tri.hit(&ray, Interval::forward()).is_none());
    }

    #[test]
    fn test_back_side_is_hit_with_same_normal() {
        let tri = unit_triangle(true);
        let ray = Ray::new(Vec3::new(0.2, 0.2, -1.0), Vec3::Z, RayKind::Visibility);
        let rec = tri.hit(&ray, Interval::forward()).unwrap();

        assert!((rec.t - 1.0).abs() < 1e-5);
        assert!((rec.normal - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_face_normal_fallback() {
        let tri = unit_triangle(false);
        let rec = tri.hit(&ray_toward(0.25, 0.25), Interval::forward()).unwrap();
        assert!((rec.normal - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_interpolated_normal_is_unit() {
        let mut mesh = Mesh::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y])
            .with_normals(vec![
                Vec3::new(0.0, 0.0, 2.0),
                Vec3::new(1.0, 0.0, 1.0),
                Vec3::new(0.0, 1.0, 1.0),
            ])
            .unwrap();
        mesh.add_face(0, 1, 2).unwrap();
        let tri = Triangle::new(Arc::new(mesh), 0, Arc::new(Material::default()), 0);

        let rec = tri.hit(&ray_toward(0.5, 0.25), Interval::forward()).unwrap();
        assert!((rec.normal.length() - 1.0).abs() < 1e-5);
        assert!(rec.normal.x > 0.0);
    }
}
