//! Mesh and convex hull geometry.
//!
//! The scene layer never computes convex hulls itself; the surrounding
//! application supplies them through the [`HullProvider`] seam (usually
//! from an off-thread geometry worker) and the scene only consumes the
//! completed result.

use nalgebra::{Matrix4, Point3, Vector3};
use serde::{Deserialize, Serialize};

use platekit_core::SceneError;

use crate::geometry::Aabb;

/// Indexed triangle mesh of a solid model. Exclusively owned by the
/// model that carries it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub vertices: Vec<Point3<f64>>,
    pub faces: Vec<[u32; 3]>,
}

impl Mesh {
    /// Creates a mesh from raw vertex and face data.
    pub fn new(vertices: Vec<Point3<f64>>, faces: Vec<[u32; 3]>) -> Self {
        Self { vertices, faces }
    }

    /// Axis-aligned bounds of the untransformed vertices.
    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(self.vertices.iter().copied())
    }

    /// An axis-aligned cuboid centered at the origin.
    pub fn cuboid(width: f64, depth: f64, height: f64) -> Self {
        let (vertices, faces) = cuboid_geometry(width, depth, height);
        Self { vertices, faces }
    }
}

/// Convex hull of a solid's mesh vertices.
///
/// Faces are triangles with outward winding; normals are derived from
/// the winding, so a transformed copy keeps its normals consistent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvexHull {
    vertices: Vec<Point3<f64>>,
    faces: Vec<[u32; 3]>,
}

impl ConvexHull {
    /// Creates a hull, validating that it has faces and that every face
    /// index is in range.
    pub fn new(vertices: Vec<Point3<f64>>, faces: Vec<[u32; 3]>) -> Result<Self, SceneError> {
        if faces.is_empty() {
            return Err(SceneError::DegenerateHull {
                reason: "no faces".to_string(),
            });
        }
        let len = vertices.len() as u32;
        for face in &faces {
            if face.iter().any(|&i| i >= len) {
                return Err(SceneError::DegenerateHull {
                    reason: format!("face index out of range ({:?} of {})", face, len),
                });
            }
        }
        Ok(Self { vertices, faces })
    }

    /// Convex hull of an axis-aligned cuboid centered at the origin.
    pub fn cuboid(width: f64, depth: f64, height: f64) -> Self {
        let (vertices, faces) = cuboid_geometry(width, depth, height);
        Self { vertices, faces }
    }

    /// Hull vertex positions.
    pub fn vertices(&self) -> &[Point3<f64>] {
        &self.vertices
    }

    /// Hull faces as vertex index triples.
    pub fn faces(&self) -> &[[u32; 3]] {
        &self.faces
    }

    /// Outward normal of face `i`, normalized. Degenerate (zero-area)
    /// faces yield a zero vector.
    pub fn face_normal(&self, i: usize) -> Vector3<f64> {
        let [a, b, c] = self.faces[i];
        let v0 = self.vertices[a as usize];
        let v1 = self.vertices[b as usize];
        let v2 = self.vertices[c as usize];
        let normal = (v1 - v0).cross(&(v2 - v0));
        let norm = normal.norm();
        if norm < 1e-12 {
            Vector3::zeros()
        } else {
            normal / norm
        }
    }

    /// A copy of this hull with every vertex transformed by `matrix`.
    /// Face topology is unchanged.
    pub fn transformed(&self, matrix: &Matrix4<f64>) -> ConvexHull {
        ConvexHull {
            vertices: self
                .vertices
                .iter()
                .map(|v| matrix.transform_point(v))
                .collect(),
            faces: self.faces.clone(),
        }
    }

    /// Bounds of the hull vertices.
    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(self.vertices.iter().copied())
    }
}

/// Seam to the external geometry provider.
///
/// Implementations may compute hulls off-thread; the scene only accepts
/// the finished hull via `Model::set_convex_hull`.
pub trait HullProvider {
    /// Computes the convex hull of `mesh`.
    fn convex_hull(&self, mesh: &Mesh) -> Result<ConvexHull, SceneError>;
}

fn cuboid_geometry(width: f64, depth: f64, height: f64) -> (Vec<Point3<f64>>, Vec<[u32; 3]>) {
    let (hx, hy, hz) = (width / 2.0, depth / 2.0, height / 2.0);
    let vertices = vec![
        Point3::new(-hx, -hy, -hz),
        Point3::new(hx, -hy, -hz),
        Point3::new(hx, hy, -hz),
        Point3::new(-hx, hy, -hz),
        Point3::new(-hx, -hy, hz),
        Point3::new(hx, -hy, hz),
        Point3::new(hx, hy, hz),
        Point3::new(-hx, hy, hz),
    ];
    let faces = vec![
        // -Z
        [0, 2, 1],
        [0, 3, 2],
        // +Z
        [4, 5, 6],
        [4, 6, 7],
        // -Y
        [0, 1, 5],
        [0, 5, 4],
        // +Y
        [2, 3, 7],
        [2, 7, 6],
        // -X
        [0, 4, 7],
        [0, 7, 3],
        // +X
        [1, 2, 6],
        [1, 6, 5],
    ];
    (vertices, faces)
}
