//! Sparse Cholesky solver backed by `faer`.
//!
//! Implements the [`SparseSolver`] trait using faer's supernodal LLᵀ
//! factorization.
//!
//! ## Workflow
//! 1. `factorize(matrix)`: converts CSR→CSC, computes symbolic + numeric LLᵀ
//! 2. `solve(rhs)`: forward/backward substitution (cached factorization)
//! 3. Repeat `solve()` with different RHS without re-factorizing

use faer::Side;
use faer::linalg::solvers::Solve;
use faer::sparse::SparseColMat;
use faer::sparse::Triplet;
use faer::sparse::linalg::solvers::{Llt, SymbolicLlt};
use fcm_types::{FcmError, FcmResult};
use nalgebra::DMatrix;
use nalgebra_sparse::CsrMatrix;

use crate::sparse::{SparseSolver, check_rhs, check_square};

/// Sparse Cholesky (LLᵀ) solver using `faer`.
///
/// Stores the factorization for reuse across multiple solves. The Poisson
/// operator only changes when the reference vertices are replaced, so one
/// factorization serves every decode against that reference.
pub struct FaerSolver {
    /// Cached LLᵀ factorization.
    factorization: Option<Llt<usize, f64>>,
    /// Matrix dimension (N×N).
    dimension: usize,
}

impl FaerSolver {
    /// Creates a new solver (unfactorized).
    pub fn new() -> Self {
        Self {
            factorization: None,
            dimension: 0,
        }
    }

    /// Convert a nalgebra-sparse CSR matrix to faer's CSC matrix.
    ///
    /// Builds from faer `Triplet`s, which faer assembles into CSC format.
    fn csr_to_csc(matrix: &CsrMatrix<f64>) -> FcmResult<SparseColMat<usize, f64>> {
        let triplets: Vec<Triplet<usize, usize, f64>> = matrix
            .triplet_iter()
            .map(|(row, col, &val)| Triplet { row, col, val })
            .collect();

        SparseColMat::try_new_from_triplets(matrix.nrows(), matrix.ncols(), &triplets)
            .map_err(|e| FcmError::Factorization(format!("Failed to construct faer CSC matrix: {e:?}")))
    }
}

impl Default for FaerSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SparseSolver for FaerSolver {
    fn factorize(&mut self, matrix: &CsrMatrix<f64>) -> FcmResult<()> {
        check_square(matrix)?;
        self.factorization = None;
        self.dimension = matrix.nrows();

        let csc = Self::csr_to_csc(matrix)?;

        // Symbolic analysis (ordering, fill-in prediction)
        let symbolic = SymbolicLlt::try_new(csc.symbolic().as_ref(), Side::Upper)
            .map_err(|e| FcmError::Factorization(format!("Symbolic analysis failed: {e:?}")))?;

        // Numeric factorization (using the symbolic structure)
        let llt = Llt::try_new_with_symbolic(symbolic, csc.as_ref(), Side::Upper)
            .map_err(|e| FcmError::Factorization(format!("Cholesky factorization failed: {e:?}")))?;

        self.factorization = Some(llt);
        Ok(())
    }

    fn solve(&self, rhs: &DMatrix<f64>) -> FcmResult<DMatrix<f64>> {
        let llt = self
            .factorization
            .as_ref()
            .ok_or_else(|| FcmError::Solve("Solver not factorized. Call factorize() first.".into()))?;
        check_rhs(rhs, self.dimension)?;

        let rhs_mat: faer::Mat<f64> =
            faer::Mat::from_fn(self.dimension, rhs.ncols(), |i, j| rhs[(i, j)]);

        // L Lᵀ X = B
        let sol = llt.solve(&rhs_mat);

        Ok(DMatrix::from_fn(self.dimension, rhs.ncols(), |i, j| sol[(i, j)]))
    }

    fn is_factorized(&self) -> bool {
        self.factorization.is_some()
    }

    fn name(&self) -> &str {
        "faer-supernodal-llt"
    }
}
