//! Fundamental-coordinate values: points and tangent vectors.
//!
//! A value holds one 3×3 block per inner edge (transition rotations, or
//! skew tangents) and one 2×2 block per face (stretch tensors, or
//! symmetric tangents). The flat layout is all edge blocks, then all
//! face blocks, each block row-major: `9E + 4F` numbers.

use std::ops::{Add, Mul, Neg, Sub};
use std::path::Path;

use fcm_types::{FcmError, FcmResult};
use nalgebra::{Matrix2, Matrix3};
use serde::{Deserialize, Serialize};

/// A point of the shape space or a tangent vector at one.
#[derive(Debug, Clone, PartialEq)]
pub struct FcmCoords {
    /// One block per inner edge, indexed by edge id.
    pub rotations: Vec<Matrix3<f64>>,
    /// One block per face, indexed by face id.
    pub stretches: Vec<Matrix2<f64>>,
}

impl FcmCoords {
    /// Identity rotations and identity stretches.
    pub fn identity(edge_count: usize, face_count: usize) -> Self {
        Self {
            rotations: vec![Matrix3::identity(); edge_count],
            stretches: vec![Matrix2::identity(); face_count],
        }
    }

    /// All-zero blocks.
    pub fn zeros(edge_count: usize, face_count: usize) -> Self {
        Self {
            rotations: vec![Matrix3::zeros(); edge_count],
            stretches: vec![Matrix2::zeros(); face_count],
        }
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.rotations.len()
    }

    #[inline]
    pub fn face_count(&self) -> usize {
        self.stretches.len()
    }

    /// Length of the flat representation.
    #[inline]
    pub fn flat_len(&self) -> usize {
        flat_len(self.edge_count(), self.face_count())
    }

    /// Flatten to `9E + 4F` numbers, row-major blocks, rotations first.
    pub fn to_flat(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.flat_len());
        for m in &self.rotations {
            for i in 0..3 {
                out.extend((0..3).map(|j| m[(i, j)]));
            }
        }
        for m in &self.stretches {
            for i in 0..2 {
                out.extend((0..2).map(|j| m[(i, j)]));
            }
        }
        out
    }

    /// Inverse of [`to_flat`](Self::to_flat).
    pub fn from_flat(values: &[f64], edge_count: usize, face_count: usize) -> FcmResult<Self> {
        let expected = flat_len(edge_count, face_count);
        if values.len() != expected {
            return Err(FcmError::DimensionMismatch {
                expected,
                actual: values.len(),
            });
        }
        let (c, u) = values.split_at(9 * edge_count);
        Ok(Self {
            rotations: c.chunks_exact(9).map(Matrix3::from_row_slice).collect(),
            stretches: u.chunks_exact(4).map(Matrix2::from_row_slice).collect(),
        })
    }

    /// Fails unless `self` has `edge_count` rotation and `face_count`
    /// stretch blocks.
    pub fn check_shape(&self, edge_count: usize, face_count: usize) -> FcmResult<()> {
        if self.edge_count() != edge_count || self.face_count() != face_count {
            return Err(FcmError::DimensionMismatch {
                expected: flat_len(edge_count, face_count),
                actual: self.flat_len(),
            });
        }
        Ok(())
    }

    /// Combine two values block by block.
    pub fn zip_with(
        &self,
        other: &Self,
        rot: impl Fn(&Matrix3<f64>, &Matrix3<f64>) -> Matrix3<f64>,
        st: impl Fn(&Matrix2<f64>, &Matrix2<f64>) -> Matrix2<f64>,
    ) -> Self {
        debug_assert_eq!(self.edge_count(), other.edge_count());
        debug_assert_eq!(self.face_count(), other.face_count());
        Self {
            rotations: self
                .rotations
                .iter()
                .zip(&other.rotations)
                .map(|(a, b)| rot(a, b))
                .collect(),
            stretches: self
                .stretches
                .iter()
                .zip(&other.stretches)
                .map(|(a, b)| st(a, b))
                .collect(),
        }
    }

    /// Largest absolute entry over all blocks.
    pub fn amax(&self) -> f64 {
        let r = self.rotations.iter().map(|m| m.amax());
        let s = self.stretches.iter().map(|m| m.amax());
        r.chain(s).fold(0.0, f64::max)
    }
}

fn flat_len(edge_count: usize, face_count: usize) -> usize {
    9 * edge_count + 4 * face_count
}

impl Add for &FcmCoords {
    type Output = FcmCoords;

    fn add(self, rhs: &FcmCoords) -> FcmCoords {
        self.zip_with(rhs, |a, b| a + b, |a, b| a + b)
    }
}

impl Add for FcmCoords {
    type Output = FcmCoords;

    fn add(self, rhs: FcmCoords) -> FcmCoords {
        &self + &rhs
    }
}

impl Sub for &FcmCoords {
    type Output = FcmCoords;

    fn sub(self, rhs: &FcmCoords) -> FcmCoords {
        self.zip_with(rhs, |a, b| a - b, |a, b| a - b)
    }
}

impl Sub for FcmCoords {
    type Output = FcmCoords;

    fn sub(self, rhs: FcmCoords) -> FcmCoords {
        &self - &rhs
    }
}

impl Mul<f64> for &FcmCoords {
    type Output = FcmCoords;

    fn mul(self, s: f64) -> FcmCoords {
        FcmCoords {
            rotations: self.rotations.iter().map(|m| m * s).collect(),
            stretches: self.stretches.iter().map(|m| m * s).collect(),
        }
    }
}

impl Mul<f64> for FcmCoords {
    type Output = FcmCoords;

    fn mul(self, s: f64) -> FcmCoords {
        &self * s
    }
}

impl Neg for FcmCoords {
    type Output = FcmCoords;

    fn neg(self) -> FcmCoords {
        self * -1.0
    }
}

/// Serialized form of a coordinate value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatCoords {
    pub edge_count: usize,
    pub face_count: usize,
    /// `9 * edge_count + 4 * face_count` numbers, see [`FcmCoords::to_flat`].
    pub values: Vec<f64>,
}

impl From<&FcmCoords> for FlatCoords {
    fn from(c: &FcmCoords) -> Self {
        Self {
            edge_count: c.edge_count(),
            face_count: c.face_count(),
            values: c.to_flat(),
        }
    }
}

impl TryFrom<FlatCoords> for FcmCoords {
    type Error = FcmError;

    fn try_from(flat: FlatCoords) -> FcmResult<Self> {
        Self::from_flat(&flat.values, flat.edge_count, flat.face_count)
    }
}

impl FlatCoords {
    /// Parses a coordinate record from JSON.
    pub fn from_json(json: &str) -> FcmResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| FcmError::Serialization(format!("coordinate JSON: {e}")))
    }

    pub fn to_json(&self) -> FcmResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| FcmError::Serialization(format!("coordinate JSON: {e}")))
    }

    /// Reads a coordinate record from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> FcmResult<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    /// Writes the record as a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> FcmResult<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
