//! Sparse solver interface and backend selection.
//!
//! The Poisson system of the reference geometry is factorized once and
//! then solved against many right-hand sides. Which factorization is used
//! is a build-time capability: the supernodal faer Cholesky when the
//! `faer` feature is compiled in, the nalgebra-sparse simplicial Cholesky
//! otherwise.

use fcm_types::FcmResult;
use nalgebra::DMatrix;
use nalgebra_sparse::CsrMatrix;

/// Trait for sparse symmetric positive-definite solvers.
///
/// Implementations: [`FaerSolver`](crate::faer_solver::FaerSolver) (feature
/// `faer`), [`SimplicialSolver`](crate::simplicial::SimplicialSolver).
pub trait SparseSolver: Send + Sync {
    /// Factorize the matrix. Call once (or after the reference changes).
    fn factorize(&mut self, matrix: &CsrMatrix<f64>) -> FcmResult<()>;

    /// Solve `A·X = B` for every column of `rhs` using the cached
    /// factorization.
    fn solve(&self, rhs: &DMatrix<f64>) -> FcmResult<DMatrix<f64>>;

    /// Returns true if the solver holds a valid factorization.
    fn is_factorized(&self) -> bool;

    /// Returns the backend's name.
    fn name(&self) -> &str;
}

/// Available factorization backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverBackend {
    /// Supernodal LLᵀ from `faer`.
    #[cfg(feature = "faer")]
    Faer,
    /// Simplicial LLᵀ from `nalgebra-sparse`.
    Simplicial,
}

impl SolverBackend {
    /// The preferred backend available in this build.
    #[cfg(feature = "faer")]
    pub fn detect() -> Self {
        Self::Faer
    }

    /// The preferred backend available in this build.
    #[cfg(not(feature = "faer"))]
    pub fn detect() -> Self {
        Self::Simplicial
    }

    /// Creates an unfactorized solver for this backend.
    pub fn create(self) -> Box<dyn SparseSolver> {
        match self {
            #[cfg(feature = "faer")]
            Self::Faer => Box::new(crate::faer_solver::FaerSolver::new()),
            Self::Simplicial => Box::new(crate::simplicial::SimplicialSolver::new()),
        }
    }
}

/// Checks that `matrix` is square and non-empty.
pub(crate) fn check_square(matrix: &CsrMatrix<f64>) -> FcmResult<()> {
    if matrix.nrows() != matrix.ncols() {
        return Err(fcm_types::FcmError::Factorization(format!(
            "Matrix must be square, got {}×{}",
            matrix.nrows(),
            matrix.ncols()
        )));
    }
    if matrix.nrows() == 0 {
        return Err(fcm_types::FcmError::Factorization(
            "Cannot factorize empty matrix".into(),
        ));
    }
    Ok(())
}

/// Checks that `rhs` has one row per unknown.
pub(crate) fn check_rhs(rhs: &DMatrix<f64>, dimension: usize) -> FcmResult<()> {
    if rhs.nrows() != dimension {
        return Err(fcm_types::FcmError::Solve(format!(
            "RHS rows ({}) != matrix dimension ({})",
            rhs.nrows(),
            dimension
        )));
    }
    Ok(())
}
