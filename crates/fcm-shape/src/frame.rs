//! Per-face orthonormal frames.

use fcm_mesh::Surface;
use nalgebra::{Matrix3, Vector3};

/// Orthonormal frame of a triangle `[p0, p1, p2]`, columns
/// `(t₁, t₂, n)`.
///
/// `t₁` follows the edge `p2 − p1`, `t₂` is `p0 − p2` with its `t₁`
/// component removed, and `n = t₁ × t₂` is the face normal.
pub fn frame_of_face(corners: &[Vector3<f64>; 3]) -> Matrix3<f64> {
    let [p0, p1, p2] = corners;
    let v1 = p2 - p1;
    let mut v2 = p0 - p2;
    v2 -= v1 * (v2.dot(&v1) / v1.dot(&v1));

    let t1 = v1.normalize();
    let t2 = v2.normalize();
    let n = t1.cross(&t2);
    Matrix3::from_columns(&[t1, t2, n])
}

/// One frame per face of a surface configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameField {
    frames: Vec<Matrix3<f64>>,
}

impl FrameField {
    /// Frames of `surface` at its current vertex positions.
    pub fn build(surface: &Surface) -> Self {
        let frames = (0..surface.face_count())
            .map(|f| frame_of_face(&surface.corners(&surface.vertices, f)))
            .collect();
        Self { frames }
    }

    /// Frame of face `f`.
    #[inline]
    pub fn frame(&self, f: usize) -> &Matrix3<f64> {
        &self.frames[f]
    }

    /// All frames, indexed by face.
    #[inline]
    pub fn frames(&self) -> &[Matrix3<f64>] {
        &self.frames
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}
