//! Triangle mesh geometry.
//!
//! Vertices, optional per-vertex normals and triangle faces. Faces are
//! validated against the vertex count when added, and per-vertex normals are
//! generated when a mesh does not supply them.

use prism_math::{Aabb, Vec3};
use thiserror::Error;

/// Errors raised while building a mesh.
#[derive(Error, Debug, PartialEq)]
pub enum MeshError {
    #[error("Face ({a}, {b}, {c}) references a vertex past the last of {vertex_count}")]
    FaceIndexOutOfRange {
        a: u32,
        b: u32,
        c: u32,
        vertex_count: usize,
    },

    #[error("Mesh has {normals} normals for {vertices} vertices")]
    NormalCountMismatch { normals: usize, vertices: usize },
}

/// A mesh consisting of vertex positions, optional normals, and triangle faces.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    /// Vertex positions (one Vec3 per vertex)
    pub positions: Vec<Vec3>,

    /// Vertex normals (one per vertex when present)
    pub normals: Option<Vec<Vec3>>,

    /// Triangles as vertex index triples
    pub faces: Vec<[u32; 3]>,
}

impl Mesh {
    /// Create a mesh with vertices and no faces yet.
    pub fn new(positions: Vec<Vec3>) -> Self {
        Self {
            positions,
            normals: None,
            faces: Vec::new(),
        }
    }

    /// Attach per-vertex normals. Their count must match the vertex count.
    pub fn with_normals(mut self, normals: Vec<Vec3>) -> Result<Self, MeshError> {
        if normals.len() != self.positions.len() {
            return Err(MeshError::NormalCountMismatch {
                normals: normals.len(),
                vertices: self.positions.len(),
            });
        }
        self.normals = Some(normals);
        Ok(self)
    }

    /// Add a triangle. All three indices must name existing vertices.
    pub fn add_face(&mut self, a: u32, b: u32, c: u32) -> Result<(), MeshError> {
        let vertex_count = self.positions.len();
        if [a, b, c].iter().any(|&i| i as usize >= vertex_count) {
            return Err(MeshError::FaceIndexOutOfRange {
                a,
                b,
                c,
                vertex_count,
            });
        }
        self.faces.push([a, b, c]);
        Ok(())
    }

    /// Corner positions of face `face`.
    pub fn face_vertices(&self, face: usize) -> [Vec3; 3] {
        let [a, b, c] = self.faces[face];
        [
            self.positions[a as usize],
            self.positions[b as usize],
            self.positions[c as usize],
        ]
    }

    /// Unit geometric normal of face `face` (counter-clockwise winding).
    ///
    /// Zero for degenerate faces.
    pub fn face_normal(&self, face: usize) -> Vec3 {
        let [a, b, c] = self.face_vertices(face);
        (b - a).cross(c - a).normalize_or_zero()
    }

    /// Compute per-vertex normals as the plain average of the normals of the
    /// faces sharing each vertex.
    ///
    /// Every adjacent face counts once regardless of its area or corner
    /// angle. The averages are not renormalized; the interpolated normal is
    /// normalized at intersection time.
    pub fn compute_normals(&mut self) {
        let vertex_count = self.positions.len();
        let mut normals = vec![Vec3::ZERO; vertex_count];
        let mut face_counts = vec![0u32; vertex_count];

        for face in 0..self.faces.len() {
            let face_normal = self.face_normal(face);
            for index in self.faces[face] {
                normals[index as usize] += face_normal;
                face_counts[index as usize] += 1;
            }
        }

        for (normal, &count) in normals.iter_mut().zip(&face_counts) {
            if count > 0 {
                *normal /= count as f32;
            }
        }

        self.normals = Some(normals);
    }

    /// Check if the mesh has normals.
    pub fn has_normals(&self) -> bool {
        self.normals.is_some()
    }

    /// Ensure the mesh has normals, computing them if necessary.
    pub fn ensure_normals(&mut self) {
        if !self.has_normals() {
            log::debug!(
                "Generating vertex normals for mesh with {} vertices, {} faces",
                self.vertex_count(),
                self.triangle_count()
            );
            self.compute_normals();
        }
    }

    /// Axis-aligned bounds of all vertices.
    pub fn bounds(&self) -> Aabb {
        if self.positions.is_empty() {
            return Aabb::EMPTY;
        }

        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for pos in &self.positions {
            min = min.min(*pos);
            max = max.max(*pos);
        }
        Aabb::from_points(min, max)
    }

    pub fn triangle_count(&self) -> usize {
        self.faces.len()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }
}
