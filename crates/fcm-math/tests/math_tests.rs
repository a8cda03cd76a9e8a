//! Integration tests for fcm-math.

use approx::assert_relative_eq;
use fcm_math::decomposition::{polar_decomposition_in_plane, proper_rotation, svd3};
use fcm_math::simplicial::SimplicialSolver;
use fcm_math::sparse::{SolverBackend, SparseSolver};
use nalgebra::{DMatrix, Matrix3, Rotation3, Vector3};
use nalgebra_sparse::{CooMatrix, CsrMatrix};

fn csr_from_triplets(n: usize, triplets: &[(usize, usize, f64)]) -> CsrMatrix<f64> {
    let mut coo = CooMatrix::new(n, n);
    for &(r, c, v) in triplets {
        coo.push(r, c, v);
    }
    CsrMatrix::from(&coo)
}

fn all_backends() -> Vec<Box<dyn SparseSolver>> {
    let mut solvers: Vec<Box<dyn SparseSolver>> = vec![Box::new(SimplicialSolver::new())];
    #[cfg(feature = "faer")]
    solvers.push(Box::new(fcm_math::faer_solver::FaerSolver::new()));
    solvers
}

// ─── Decomposition Tests ──────────────────────────────────────

#[test]
fn svd_sorted_descending() {
    let m = Matrix3::from_diagonal(&Vector3::new(0.5, 3.0, 2.0));
    let svd = svd3(&m);
    let s = svd.singular_values;
    assert!(s[0] >= s[1] && s[1] >= s[2], "singular values not sorted: {s:?}");
    assert_relative_eq!(svd.u * Matrix3::from_diagonal(&s) * svd.v_t, m, epsilon = 1e-12);
}

#[test]
fn proper_rotation_of_rotation_is_identity_map() {
    let r = Rotation3::from_scaled_axis(Vector3::new(0.3, -0.2, 0.9)).into_inner();
    assert_relative_eq!(proper_rotation(&r), r, epsilon = 1e-12);
}

#[test]
fn proper_rotation_corrects_reflection() {
    // Reflection through the xy-plane: the raw polar factor has det -1.
    let m = Matrix3::from_diagonal(&Vector3::new(2.0, 1.0, -0.5));
    let r = proper_rotation(&m);
    assert_relative_eq!(r.determinant(), 1.0, epsilon = 1e-12);
    assert_relative_eq!(r * r.transpose(), Matrix3::identity(), epsilon = 1e-12);
    // The smallest singular direction absorbs the flip.
    assert_relative_eq!(r, Matrix3::identity(), epsilon = 1e-12);
}

#[test]
fn proper_rotation_of_rank_two_projector() {
    let n = Vector3::new(1.0, 2.0, 2.0).normalize();
    let p = Matrix3::identity() - n * n.transpose();
    assert_relative_eq!(proper_rotation(&p), Matrix3::identity(), epsilon = 1e-10);
}

#[test]
fn polar_in_plane_pins_normal_stretch() {
    // Tangent projector scaled by 2 in-plane.
    let n = Vector3::<f64>::z();
    let p = 2.0 * (Matrix3::identity() - n * n.transpose());
    let pd = polar_decomposition_in_plane(&p);
    assert_relative_eq!(pd.rotation, Matrix3::identity(), epsilon = 1e-10);
    let expected = Matrix3::from_diagonal(&Vector3::new(2.0, 2.0, 1.0));
    assert_relative_eq!(pd.stretch, expected, epsilon = 1e-10);
}

#[test]
fn polar_in_plane_rotated_block() {
    let rot = Rotation3::from_scaled_axis(Vector3::new(0.0, 0.0, 0.7)).into_inner();
    let n = Vector3::<f64>::z();
    let p = Matrix3::identity() - n * n.transpose();
    // D = S·Rᵀ with S the tangent projector
    let d = p * rot.transpose();
    let pd = polar_decomposition_in_plane(&d);
    assert_relative_eq!(pd.rotation, rot.transpose(), epsilon = 1e-10);
    assert_relative_eq!(pd.stretch, Matrix3::identity(), epsilon = 1e-10);
}

// ─── Solver Tests ─────────────────────────────────────────────

#[test]
fn identity_solve() {
    let matrix = csr_from_triplets(3, &[(0, 0, 1.0), (1, 1, 1.0), (2, 2, 1.0)]);
    for mut solver in all_backends() {
        assert!(!solver.is_factorized());
        solver.factorize(&matrix).unwrap();
        assert!(solver.is_factorized());

        let rhs = DMatrix::from_column_slice(3, 1, &[3.0, 7.0, -2.0]);
        let sol = solver.solve(&rhs).unwrap();
        assert_relative_eq!(sol, rhs, epsilon = 1e-12);
    }
}

#[test]
fn spd_matrix_multi_column_solve() {
    let triplets = [
        (0, 0, 4.0),
        (0, 1, 1.0),
        (1, 0, 1.0),
        (1, 1, 3.0),
        (1, 2, 1.0),
        (2, 1, 1.0),
        (2, 2, 2.0),
    ];
    let matrix = csr_from_triplets(3, &triplets);
    let dense = DMatrix::from_row_slice(3, 3, &[4.0, 1.0, 0.0, 1.0, 3.0, 1.0, 0.0, 1.0, 2.0]);
    let rhs = DMatrix::from_row_slice(3, 3, &[1.0, 0.0, 2.0, 2.0, 1.0, -1.0, 3.0, 0.5, 0.0]);

    for mut solver in all_backends() {
        solver.factorize(&matrix).unwrap();
        let sol = solver.solve(&rhs).unwrap();
        let residual = &dense * &sol - &rhs;
        assert!(
            residual.amax() < 1e-10,
            "{}: residual {}",
            solver.name(),
            residual.amax()
        );
    }
}

#[test]
fn large_laplacian() {
    // 100×100 path-graph Laplacian plus one pinned diagonal entry.
    let n = 100;
    let mut triplets = Vec::new();
    for i in 0..n {
        let degree = if i == 0 || i == n - 1 { 1.0 } else { 2.0 };
        triplets.push((i, i, degree));
        if i > 0 {
            triplets.push((i, i - 1, -1.0));
        }
        if i < n - 1 {
            triplets.push((i, i + 1, -1.0));
        }
    }
    triplets.push((0, 0, 1.0));
    let matrix = csr_from_triplets(n, &triplets);

    for mut solver in all_backends() {
        solver.factorize(&matrix).unwrap();
        let rhs = DMatrix::from_element(n, 1, 1.0);
        let sol = solver.solve(&rhs).unwrap();
        let residual = &matrix * &sol - &rhs;
        assert!(
            residual.amax() < 1e-8,
            "{}: max residual = {}",
            solver.name(),
            residual.amax()
        );
    }
}

#[test]
fn solve_before_factorize_fails() {
    for solver in all_backends() {
        let rhs = DMatrix::from_element(3, 1, 1.0);
        assert!(solver.solve(&rhs).is_err());
    }
}

#[test]
fn non_square_fails() {
    let mut coo = CooMatrix::new(2, 3);
    coo.push(0, 0, 1.0);
    let matrix = CsrMatrix::from(&coo);
    for mut solver in all_backends() {
        assert!(solver.factorize(&matrix).is_err());
    }
}

#[test]
fn wrong_rhs_length_fails() {
    let matrix = csr_from_triplets(2, &[(0, 0, 1.0), (1, 1, 1.0)]);
    for mut solver in all_backends() {
        solver.factorize(&matrix).unwrap();
        let rhs = DMatrix::from_element(3, 1, 1.0);
        assert!(solver.solve(&rhs).is_err());
    }
}

#[test]
fn detected_backend_solves() {
    let matrix = csr_from_triplets(2, &[(0, 0, 2.0), (1, 1, 4.0)]);
    let mut solver = SolverBackend::detect().create();
    solver.factorize(&matrix).unwrap();
    let sol = solver.solve(&DMatrix::from_column_slice(2, 1, &[2.0, 2.0])).unwrap();
    assert_relative_eq!(sol[(0, 0)], 1.0, epsilon = 1e-12);
    assert_relative_eq!(sol[(1, 0)], 0.5, epsilon = 1e-12);
}
