//! Breadth-first spanning tree over the face adjacency.
//!
//! The decoder initializes one rotation per face by walking this tree
//! from the root face, composing transition rotations along tree edges.

use std::collections::VecDeque;

use fcm_mesh::FaceAdjacency;
use fcm_types::{EdgeId, FaceId, FcmError, FcmResult};

/// One tree edge, in visitation order: `target` was discovered from
/// `source` across inner edge `edge`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeStep {
    pub edge: EdgeId,
    pub source: FaceId,
    pub target: FaceId,
}

/// Spanning tree of the face-adjacency graph rooted at one face.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanningTree {
    root: FaceId,
    steps: Vec<TreeStep>,
}

impl SpanningTree {
    /// Breadth-first traversal from `root`.
    ///
    /// Neighbors are visited in ascending face order. Fails with
    /// [`FcmError::DisconnectedMesh`] if some face is not reachable.
    pub fn build(adjacency: &FaceAdjacency, root: FaceId) -> FcmResult<Self> {
        let face_count = adjacency.face_count();
        if root.index() >= face_count {
            return Err(FcmError::InvalidConfig(format!(
                "Root face {} is out of range (face count: {face_count})",
                root.0
            )));
        }

        let mut visited = vec![false; face_count];
        let mut queue = VecDeque::new();
        let mut steps = Vec::with_capacity(face_count.saturating_sub(1));

        visited[root.index()] = true;
        queue.push_back(root);

        while let Some(face) = queue.pop_front() {
            for (neighbor, edge) in adjacency.neighbors(face) {
                if visited[neighbor.index()] {
                    continue;
                }
                visited[neighbor.index()] = true;
                queue.push_back(neighbor);
                steps.push(TreeStep {
                    edge,
                    source: face,
                    target: neighbor,
                });
            }
        }

        let reached = steps.len() + 1;
        if reached != face_count {
            return Err(FcmError::DisconnectedMesh {
                reached,
                total: face_count,
            });
        }

        Ok(Self { root, steps })
    }

    /// The root face.
    #[inline]
    pub fn root(&self) -> FaceId {
        self.root
    }

    /// Tree edges in visitation order; every non-root face is the
    /// target of exactly one step.
    #[inline]
    pub fn steps(&self) -> &[TreeStep] {
        &self.steps
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
