//! Reference geometry: everything the encoder and decoder precompute
//! from the reference surface.
//!
//! Topology-dependent state (face adjacency, spanning tree) is built once.
//! Geometry-dependent state (operators, frames, metric, the factorized
//! Poisson system) is rebuilt by [`ReferenceGeometry::update`].

use std::fmt;

use fcm_math::{SolverBackend, SparseSolver};
use fcm_mesh::{DiscreteOperators, FaceAdjacency, Surface};
use fcm_types::{FaceId, FcmResult, VertexId};
use nalgebra::Vector3;
use nalgebra_sparse::{CooMatrix, CsrMatrix};
use tracing::{debug, info};

use crate::config::FcmConfig;
use crate::frame::FrameField;
use crate::metric::Metric;
use crate::spanning_tree::SpanningTree;

/// Precomputed state of the reference surface.
pub struct ReferenceGeometry {
    surface: Surface,
    adjacency: FaceAdjacency,
    tree: SpanningTree,
    config: FcmConfig,
    backend: SolverBackend,

    operators: DiscreteOperators,
    frames: FrameField,
    metric: Metric,
    center: Vector3<f64>,
    /// Factorized `div·grad + e₀e₀ᵀ`.
    poisson: Box<dyn SparseSolver>,
}

impl ReferenceGeometry {
    /// Build with the sparse backend detected for this build.
    pub fn new(surface: Surface, config: FcmConfig) -> FcmResult<Self> {
        Self::with_backend(surface, config, SolverBackend::detect())
    }

    /// Build with an explicit sparse backend.
    pub fn with_backend(
        surface: Surface,
        config: FcmConfig,
        backend: SolverBackend,
    ) -> FcmResult<Self> {
        surface.validate()?;
        config.validate(surface.vertex_count(), surface.face_count())?;

        let adjacency = FaceAdjacency::build(&surface)?;
        let tree = SpanningTree::build(&adjacency, FaceId(config.init_face as u32))?;
        debug!(
            root = config.init_face,
            tree_edges = tree.len(),
            "Spanning tree built"
        );

        let operators = DiscreteOperators::build(&surface, &adjacency)?;
        let poisson = factorize_poisson(&operators, backend)?;
        let frames = FrameField::build(&surface);
        let metric = Metric::new(&operators, config.rotation_weight, config.stretch_weight);
        let center = surface.center_of_gravity();

        info!(
            vertices = surface.vertex_count(),
            faces = surface.face_count(),
            inner_edges = adjacency.edge_count(),
            backend = poisson.name(),
            "Reference geometry factorized"
        );

        Ok(Self {
            surface,
            adjacency,
            tree,
            config,
            backend,
            operators,
            frames,
            metric,
            center,
            poisson,
        })
    }

    /// Replace the reference vertex positions and rebuild everything that
    /// depends on them. The topology and spanning tree are kept.
    ///
    /// On error `self` is left unchanged.
    pub fn update(&mut self, vertices: Vec<Vector3<f64>>) -> FcmResult<()> {
        let surface = self.surface.with_vertices(vertices)?;
        surface.validate()?;

        let operators = DiscreteOperators::build(&surface, &self.adjacency)?;
        let poisson = factorize_poisson(&operators, self.backend)?;

        self.frames = FrameField::build(&surface);
        self.metric = Metric::new(
            &operators,
            self.config.rotation_weight,
            self.config.stretch_weight,
        );
        self.center = surface.center_of_gravity();
        self.operators = operators;
        self.poisson = poisson;
        self.surface = surface;

        info!(
            vertices = self.surface.vertex_count(),
            backend = self.poisson.name(),
            "Reference geometry updated"
        );
        Ok(())
    }

    #[inline]
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    #[inline]
    pub fn adjacency(&self) -> &FaceAdjacency {
        &self.adjacency
    }

    #[inline]
    pub fn spanning_tree(&self) -> &SpanningTree {
        &self.tree
    }

    #[inline]
    pub fn config(&self) -> &FcmConfig {
        &self.config
    }

    #[inline]
    pub fn operators(&self) -> &DiscreteOperators {
        &self.operators
    }

    #[inline]
    pub fn frames(&self) -> &FrameField {
        &self.frames
    }

    #[inline]
    pub fn metric(&self) -> &Metric {
        &self.metric
    }

    /// Mean of the reference vertex positions.
    #[inline]
    pub fn center_of_gravity(&self) -> Vector3<f64> {
        self.center
    }

    /// The factorized Poisson system.
    #[inline]
    pub fn poisson(&self) -> &dyn SparseSolver {
        self.poisson.as_ref()
    }

    /// Reference position of the vertex pinned after decoding.
    #[inline]
    pub fn fixed_vertex(&self) -> Vector3<f64> {
        self.surface.vertex(VertexId(self.config.init_vert as u32))
    }

    /// Number of inner edges (rotation blocks).
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.adjacency.edge_count()
    }

    /// Number of faces (stretch blocks).
    #[inline]
    pub fn face_count(&self) -> usize {
        self.surface.face_count()
    }

    /// Number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.surface.vertex_count()
    }
}

impl fmt::Debug for ReferenceGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReferenceGeometry")
            .field("vertices", &self.vertex_count())
            .field("faces", &self.face_count())
            .field("inner_edges", &self.edge_count())
            .field("config", &self.config)
            .field("backend", &self.poisson.name())
            .finish()
    }
}

/// Assemble `div·grad` plus a unit soft constraint on the first vertex
/// (removing the translational null space) and factorize it.
fn factorize_poisson(
    operators: &DiscreteOperators,
    backend: SolverBackend,
) -> FcmResult<Box<dyn SparseSolver>> {
    let laplacian = &operators.div * &operators.grad;

    let n = laplacian.nrows();
    let mut pin = CooMatrix::new(n, n);
    pin.push(0, 0, 1.0);
    let system = &laplacian + &CsrMatrix::from(&pin);

    let mut solver = backend.create();
    solver.factorize(&system)?;
    Ok(solver)
}
