//! Fallback sparse Cholesky backed by `nalgebra-sparse`.
//!
//! Used when the build does not carry the faer backend. Same contract
//! as [`FaerSolver`](crate::faer_solver::FaerSolver), simplicial instead
//! of supernodal factorization.

use fcm_types::{FcmError, FcmResult};
use nalgebra::DMatrix;
use nalgebra_sparse::factorization::CscCholesky;
use nalgebra_sparse::{CscMatrix, CsrMatrix};

use crate::sparse::{SparseSolver, check_rhs, check_square};

/// Simplicial LLᵀ solver.
pub struct SimplicialSolver {
    factorization: Option<CscCholesky<f64>>,
    dimension: usize,
}

impl SimplicialSolver {
    /// Creates a new solver (unfactorized).
    pub fn new() -> Self {
        Self {
            factorization: None,
            dimension: 0,
        }
    }
}

impl Default for SimplicialSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SparseSolver for SimplicialSolver {
    fn factorize(&mut self, matrix: &CsrMatrix<f64>) -> FcmResult<()> {
        check_square(matrix)?;
        self.factorization = None;
        self.dimension = matrix.nrows();

        let csc = CscMatrix::from(matrix);
        let chol = CscCholesky::factor(&csc)
            .map_err(|e| FcmError::Factorization(format!("Cholesky factorization failed: {e:?}")))?;

        self.factorization = Some(chol);
        Ok(())
    }

    fn solve(&self, rhs: &DMatrix<f64>) -> FcmResult<DMatrix<f64>> {
        let chol = self
            .factorization
            .as_ref()
            .ok_or_else(|| FcmError::Solve("Solver not factorized. Call factorize() first.".into()))?;
        check_rhs(rhs, self.dimension)?;
        Ok(chol.solve(rhs))
    }

    fn is_factorized(&self) -> bool {
        self.factorization.is_some()
    }

    fn name(&self) -> &str {
        "nalgebra-simplicial-llt"
    }
}
