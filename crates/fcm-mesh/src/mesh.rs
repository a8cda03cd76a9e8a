//! Core triangle surface type.

use std::path::Path;

use fcm_types::{FcmError, FcmResult, VertexId};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// A triangle surface: vertex positions plus triangle indices.
///
/// Faces are oriented counter-clockwise when seen from the side the
/// face normal `(p1 - p0) × (p2 - p0)` points to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    /// Vertex positions.
    pub vertices: Vec<Vector3<f64>>,
    /// Triangle indices: each triangle is `[v0, v1, v2]`.
    pub faces: Vec<[u32; 3]>,
}

impl Surface {
    /// Creates a validated surface.
    pub fn new(vertices: Vec<Vector3<f64>>, faces: Vec<[u32; 3]>) -> FcmResult<Self> {
        let surface = Self { vertices, faces };
        surface.validate()?;
        Ok(surface)
    }

    /// Returns the number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of triangles.
    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Returns the position of vertex `v`.
    #[inline]
    pub fn vertex(&self, v: VertexId) -> Vector3<f64> {
        self.vertices[v.index()]
    }

    /// Returns the three vertex indices of triangle `f`.
    #[inline]
    pub fn face(&self, f: usize) -> [usize; 3] {
        let [a, b, c] = self.faces[f];
        [a as usize, b as usize, c as usize]
    }

    /// Returns the corner positions of triangle `f` in `vertices`.
    ///
    /// `vertices` may be any configuration sharing this topology.
    #[inline]
    pub fn corners(&self, vertices: &[Vector3<f64>], f: usize) -> [Vector3<f64>; 3] {
        let [a, b, c] = self.face(f);
        [vertices[a], vertices[b], vertices[c]]
    }

    /// Mean of all vertex positions.
    pub fn center_of_gravity(&self) -> Vector3<f64> {
        mean(&self.vertices)
    }

    /// Returns a copy with the same faces and new vertex positions.
    pub fn with_vertices(&self, vertices: Vec<Vector3<f64>>) -> FcmResult<Self> {
        if vertices.len() != self.vertex_count() {
            return Err(FcmError::DimensionMismatch {
                expected: self.vertex_count(),
                actual: vertices.len(),
            });
        }
        Ok(Self {
            vertices,
            faces: self.faces.clone(),
        })
    }

    /// Validates mesh integrity.
    ///
    /// Checks:
    /// - At least one face
    /// - Triangle indices are within bounds
    /// - No degenerate triangles (repeated vertex indices)
    /// - Vertex coordinates are finite
    pub fn validate(&self) -> FcmResult<()> {
        let n = self.vertex_count();

        if self.faces.is_empty() {
            return Err(FcmError::InvalidMesh("Surface has no faces".into()));
        }

        if let Some(i) = self.vertices.iter().position(|p| !p.iter().all(|x| x.is_finite())) {
            return Err(FcmError::InvalidMesh(format!(
                "Vertex {i} has a non-finite coordinate"
            )));
        }

        for (t, face) in self.faces.iter().enumerate() {
            for &idx in face {
                if idx as usize >= n {
                    return Err(FcmError::InvalidMesh(format!(
                        "Index {idx} in face {t} is out of range (vertex count: {n})"
                    )));
                }
            }
            let [a, b, c] = *face;
            if a == b || b == c || a == c {
                return Err(FcmError::InvalidMesh(format!(
                    "Triangle {t} has repeated vertex indices: [{a}, {b}, {c}]"
                )));
            }
        }

        Ok(())
    }

    /// Constructs a surface from interleaved position data
    /// `[x0, y0, z0, x1, y1, z1, ...]` and flat triangle indices.
    pub fn from_interleaved(positions: &[f64], indices: &[u32]) -> FcmResult<Self> {
        if positions.len() % 3 != 0 {
            return Err(FcmError::InvalidMesh(
                "Interleaved positions length not divisible by 3".into(),
            ));
        }
        if indices.len() % 3 != 0 {
            return Err(FcmError::InvalidMesh(
                "Index count is not divisible by 3".into(),
            ));
        }

        let vertices = positions
            .chunks_exact(3)
            .map(|p| Vector3::new(p[0], p[1], p[2]))
            .collect();
        let faces = indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]]).collect();

        Self::new(vertices, faces)
    }
}

impl Surface {
    /// Parses and validates a surface from its JSON form
    /// (`{"vertices": [[x, y, z], ...], "faces": [[a, b, c], ...]}`).
    pub fn from_json(json: &str) -> FcmResult<Self> {
        let surface: Self = serde_json::from_str(json)
            .map_err(|e| FcmError::Serialization(format!("surface JSON: {e}")))?;
        surface.validate()?;
        Ok(surface)
    }

    /// Pretty-printed JSON form.
    pub fn to_json(&self) -> FcmResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| FcmError::Serialization(format!("surface JSON: {e}")))
    }

    /// Reads a surface from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> FcmResult<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    /// Writes the surface as a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> FcmResult<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

/// Mean of a set of points (origin for an empty set).
pub fn mean(points: &[Vector3<f64>]) -> Vector3<f64> {
    if points.is_empty() {
        return Vector3::zeros();
    }
    points.iter().sum::<Vector3<f64>>() / points.len() as f64
}
