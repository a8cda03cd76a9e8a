//! Face adjacency across inner edges.
//!
//! An inner edge is a mesh edge shared by exactly two faces. Each one
//! gets a unique id, assigned in ascending order of its sorted vertex
//! pair so ids are stable for a given face list. The face-to-face matrix
//! stores that id at `(f, g)` and `(g, f)`.

use std::collections::BTreeMap;

use fcm_types::{EdgeId, FaceId, FcmError, FcmResult, VertexId};
use nalgebra_sparse::CsrMatrix;

use crate::mesh::Surface;

/// An inner (non-boundary) edge with its two adjacent faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InnerEdge {
    /// Unique id; indexes the edge's rotation block.
    pub id: EdgeId,
    /// Endpoints, lower vertex index first.
    pub vertices: [VertexId; 2],
    /// Incident faces, lower face id first.
    pub faces: [FaceId; 2],
}

/// Inner-edge adjacency of a triangle surface.
///
/// Built once per topology; vertex positions do not affect it.
#[derive(Debug, Clone)]
pub struct FaceAdjacency {
    edges: Vec<InnerEdge>,
    /// Face-to-face matrix, entries are inner-edge ids.
    matrix: CsrMatrix<EdgeId>,
    boundary_edges: usize,
}

impl FaceAdjacency {
    /// Build adjacency from a triangle surface.
    pub fn build(surface: &Surface) -> FcmResult<Self> {
        let face_count = surface.face_count();

        // Key: (min_vertex, max_vertex) to canonicalize edge direction
        let mut edge_map: BTreeMap<(u32, u32), Vec<u32>> = BTreeMap::new();
        for (t, &[a, b, c]) in surface.faces.iter().enumerate() {
            for (v0, v1) in [(a, b), (b, c), (c, a)] {
                let key = if v0 < v1 { (v0, v1) } else { (v1, v0) };
                edge_map.entry(key).or_default().push(t as u32);
            }
        }

        let mut edges = Vec::new();
        let mut rows: Vec<Vec<(usize, EdgeId)>> = vec![Vec::new(); face_count];
        let mut boundary_edges = 0;

        for (&(v0, v1), tris) in &edge_map {
            match tris.as_slice() {
                &[f, g] => {
                    let id = EdgeId(edges.len() as u32);
                    let (lo, hi) = if f < g { (f, g) } else { (g, f) };
                    edges.push(InnerEdge {
                        id,
                        vertices: [VertexId(v0), VertexId(v1)],
                        faces: [FaceId(lo), FaceId(hi)],
                    });
                    rows[lo as usize].push((hi as usize, id));
                    rows[hi as usize].push((lo as usize, id));
                }
                &[_] => boundary_edges += 1,
                // Non-manifold edges (3+ faces) carry no transition rotation.
                _ => {}
            }
        }

        let mut row_offsets = Vec::with_capacity(face_count + 1);
        let mut col_indices = Vec::with_capacity(2 * edges.len());
        let mut values = Vec::with_capacity(2 * edges.len());
        row_offsets.push(0);
        for row in &mut rows {
            row.sort_by_key(|&(g, _)| g);
            for &(g, id) in row.iter() {
                col_indices.push(g);
                values.push(id);
            }
            row_offsets.push(col_indices.len());
        }

        let matrix = CsrMatrix::try_from_csr_data(
            face_count,
            face_count,
            row_offsets,
            col_indices,
            values,
        )
        .map_err(|e| FcmError::InvalidMesh(format!("Face adjacency is not a simple graph: {e}")))?;

        Ok(Self {
            edges,
            matrix,
            boundary_edges,
        })
    }

    /// Number of inner edges (rotation blocks).
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of faces (stretch blocks).
    #[inline]
    pub fn face_count(&self) -> usize {
        self.matrix.nrows()
    }

    /// All inner edges, ordered by id.
    #[inline]
    pub fn edges(&self) -> &[InnerEdge] {
        &self.edges
    }

    /// The face-to-face matrix with inner-edge ids as entries.
    #[inline]
    pub fn matrix(&self) -> &CsrMatrix<EdgeId> {
        &self.matrix
    }

    /// Neighbors of face `f` across inner edges, ascending by face id.
    pub fn neighbors(&self, f: FaceId) -> impl Iterator<Item = (FaceId, EdgeId)> + '_ {
        let offsets = self.matrix.row_offsets();
        let range = offsets[f.index()]..offsets[f.index() + 1];
        self.matrix.col_indices()[range.clone()]
            .iter()
            .zip(&self.matrix.values()[range])
            .map(|(&g, &id)| (FaceId(g as u32), id))
    }

    /// Number of inner-edge neighbors of face `f` (at most 3 on a manifold mesh).
    pub fn neighbor_count(&self, f: FaceId) -> usize {
        self.matrix.row(f.index()).nnz()
    }

    /// Number of edges with exactly one incident face.
    pub fn boundary_edge_count(&self) -> usize {
        self.boundary_edges
    }
}
