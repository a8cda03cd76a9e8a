//! Diagonal area-weighted metric of the product manifold.

use fcm_mesh::DiscreteOperators;

/// Per-block weights of the shape-space metric.
///
/// Edge weights are the inner-edge areas normalized to sum 1, times the
/// rotation weight; face weights are the face areas normalized to sum 1,
/// times the stretch weight. Every entry of a block shares its weight.
#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    edge_weights: Vec<f64>,
    face_weights: Vec<f64>,
}

impl Metric {
    pub fn new(operators: &DiscreteOperators, rotation_weight: f64, stretch_weight: f64) -> Self {
        Self {
            edge_weights: normalized(&operators.edge_areas, rotation_weight),
            face_weights: normalized(&operators.face_areas, stretch_weight),
        }
    }

    /// Weight of the rotation block of each inner edge.
    #[inline]
    pub fn edge_weights(&self) -> &[f64] {
        &self.edge_weights
    }

    /// Weight of the stretch block of each face.
    #[inline]
    pub fn face_weights(&self) -> &[f64] {
        &self.face_weights
    }

    /// The full diagonal, `9E + 4F` entries laid out like the flat
    /// coordinates.
    pub fn diagonal(&self) -> Vec<f64> {
        let mut diag = Vec::with_capacity(9 * self.edge_weights.len() + 4 * self.face_weights.len());
        for &w in &self.edge_weights {
            diag.extend(std::iter::repeat(w).take(9));
        }
        for &w in &self.face_weights {
            diag.extend(std::iter::repeat(w).take(4));
        }
        diag
    }
}

fn normalized(areas: &[f64], scale: f64) -> Vec<f64> {
    let total: f64 = areas.iter().sum();
    if total <= 0.0 {
        return vec![0.0; areas.len()];
    }
    areas.iter().map(|a| scale * a / total).collect()
}
