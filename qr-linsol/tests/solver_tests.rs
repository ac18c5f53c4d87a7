use householder_qr::utils::{from_rows, identity, matmul, zeros};
use householder_qr::{c64, BlockHouseholder, HouseholderColumn, HouseholderTran, Parallelism, QrError};
use mdarray::DTensor;
use qr_linsol::{
    AdjustableQrSolver, LinearSolver, QrHouseColSolver, QrHouseTranSolver, QrSolver, QrpSolver,
    SolverError,
};

mod common;
use common::{column, max_abs_diff, random_matrix};

fn named<S: LinearSolver<f64> + 'static>(
    name: &'static str,
    solver: S,
) -> (&'static str, Box<dyn LinearSolver<f64>>) {
    (name, Box::new(solver))
}

/// Every solver that handles full-rank tall systems
fn real_solvers() -> Vec<(&'static str, Box<dyn LinearSolver<f64>>)> {
    vec![
        named("house_col", QrHouseColSolver::<f64>::new()),
        named(
            "house_col_rayon",
            QrHouseColSolver::<f64>::new().with_parallelism(Parallelism::Rayon),
        ),
        named("house_tran", QrHouseTranSolver::<f64>::new()),
        named("generic_column", QrSolver::new(HouseholderColumn::<f64>::new())),
        named("generic_tran", QrSolver::new(HouseholderTran::<f64>::new())),
        named("generic_block", QrSolver::new(BlockHouseholder::<f64>::new(2))),
        named("qrp_basic", QrpSolver::<f64>::new(false)),
        named("qrp_minimum_norm", QrpSolver::<f64>::new(true)),
        named("adjustable", AdjustableQrSolver::<f64>::new()),
    ]
}

#[test]
fn test_known_solution() {
    let a = from_rows::<f64, _>(&[[0.0, 1.0, 2.0], [-2.0, 4.0, 9.0], [0.5, 0.0, 5.0]]);
    let b = column(&[8.0, 33.0, 15.5]);
    for (name, mut solver) in real_solvers() {
        assert_eq!(solver.set_a(&a), Ok(true), "{}", name);
        let mut x = zeros(3, 1);
        solver.solve(&b, &mut x).unwrap();
        let expected = column(&[1.0, 2.0, 3.0]);
        assert!(max_abs_diff(&x, &expected) < 1e-12, "{}: {:?}", name, x);
    }
}

#[test]
fn test_square_multiple_rhs() {
    let a = random_matrix::<f64>(7, 7, 3);
    let x_known = random_matrix::<f64>(7, 3, 4);
    let b = matmul(&a, &x_known);
    for (name, mut solver) in real_solvers() {
        assert_eq!(solver.set_a(&a), Ok(true), "{}", name);
        let mut x = zeros(7, 3);
        solver.solve(&b, &mut x).unwrap();
        assert!(max_abs_diff(&x, &x_known) < 1e-9, "{}", name);
    }
}

#[test]
fn test_polynomial_fit() {
    let t: [f64; 7] = [-1.0, -0.75, -0.5, 0.0, 0.25, 0.5, 0.75];
    let a = DTensor::<f64, 2>::from_fn([t.len(), 3], |idx| t[idx[0]].powi(idx[1] as i32));
    let y: Vec<f64> = t.iter().map(|&v| 1.0 + 1.5 * v + 1.7 * v * v).collect();
    let b = column(&y);
    for (name, mut solver) in real_solvers() {
        assert_eq!(solver.set_a(&a), Ok(true), "{}", name);
        let mut x = zeros(3, 1);
        solver.solve(&b, &mut x).unwrap();
        assert!(max_abs_diff(&x, &column(&[1.0, 1.5, 1.7])) < 1e-10, "{}", name);
    }
}

#[test]
fn test_least_squares_normal_equations() {
    let a = random_matrix::<f64>(12, 4, 21);
    let b = random_matrix::<f64>(12, 2, 22);
    for (name, mut solver) in real_solvers() {
        solver.set_a(&a).unwrap();
        let mut x = zeros(4, 2);
        solver.solve(&b, &mut x).unwrap();
        let ax = matmul(&a, &x);
        let residual = DTensor::<f64, 2>::from_fn([12, 2], |idx| ax[[idx[0], idx[1]]] - b[[idx[0], idx[1]]]);
        let at = DTensor::<f64, 2>::from_fn([4, 12], |idx| a[[idx[1], idx[0]]]);
        let normal = matmul(&at, &residual);
        assert!(max_abs_diff(&normal, &zeros(4, 2)) < 1e-12, "{}", name);
    }
}

#[test]
fn test_inverse() {
    let a = from_rows::<f64, _>(&[[5.0, 2.0, 3.0], [1.5, -2.0, 8.0], [-3.0, 4.7, -0.5]]);
    for (name, mut solver) in real_solvers() {
        solver.set_a(&a).unwrap();
        let mut inv = zeros(1, 1);
        solver.invert(&mut inv).unwrap();
        assert_eq!(*inv.shape(), (3, 3));
        assert!(max_abs_diff(&matmul(&a, &inv), &identity(3, 3)) < 1e-12, "{}", name);
    }
}

#[test]
fn test_wrong_b_rows() {
    let a = random_matrix::<f64>(5, 3, 8);
    let b = zeros::<f64>(4, 1);
    for (name, mut solver) in real_solvers() {
        solver.set_a(&a).unwrap();
        let mut x = zeros(3, 1);
        let err = solver.solve(&b, &mut x).unwrap_err();
        assert!(
            matches!(err, SolverError::Qr(QrError::DimensionMismatch { .. })),
            "{}: {:?}",
            name,
            err
        );
    }
}

#[test]
fn test_solve_before_set_a() {
    for (name, mut solver) in real_solvers() {
        let mut x = zeros(1, 1);
        assert_eq!(
            solver.solve(&zeros(3, 1), &mut x),
            Err(SolverError::NoSystem),
            "{}",
            name
        );
        assert_eq!(solver.shape(), None);
    }
}

#[test]
fn test_quality() {
    let eye = identity::<f64>(4, 4);
    let a = random_matrix::<f64>(6, 6, 30);
    let nearly_singular = from_rows::<f64, _>(&[[1.0, 1.0], [1.0, 1.0 + 1e-9]]);
    for (name, mut solver) in real_solvers() {
        solver.set_a(&eye).unwrap();
        assert!((solver.quality() - 1.0).abs() < 1e-14, "{}", name);

        solver.set_a(&a).unwrap();
        let q = solver.quality();
        assert!(q > 0.0 && q <= 1.0, "{}: {}", name, q);

        solver.set_a(&nearly_singular).unwrap();
        assert!(solver.quality() < 1e-8, "{}", name);
    }
}

#[test]
fn test_degenerate_matrix() {
    let zero = zeros::<f64>(3, 3);
    let solvers = vec![
        named("house_col", QrHouseColSolver::<f64>::new()),
        named("house_tran", QrHouseTranSolver::<f64>::new()),
        named("generic_column", QrSolver::new(HouseholderColumn::<f64>::new())),
        named("adjustable", AdjustableQrSolver::<f64>::new()),
    ];
    for (_, mut solver) in solvers {
        assert_eq!(solver.set_a(&zero), Ok(false));
        assert_eq!(solver.quality(), 0.0);
        let mut x = zeros(3, 1);
        assert_eq!(
            solver.solve(&column(&[1.0, 2.0, 3.0]), &mut x),
            Err(SolverError::DecompositionFailed)
        );
    }
}

#[test]
fn test_wide_rejected() {
    let a = random_matrix::<f64>(2, 4, 1);
    let mut solver = QrHouseColSolver::<f64>::new();
    assert_eq!(
        solver.set_a(&a),
        Err(SolverError::WideSystem { rows: 2, cols: 4 })
    );
    let mut tran = QrHouseTranSolver::<f64>::new();
    assert!(tran.set_a(&a).is_err());
}

#[test]
fn test_reset_system() {
    let mut solver = QrHouseColSolver::<f64>::new();
    solver.set_a(&random_matrix::<f64>(10, 6, 2)).unwrap();
    let a = from_rows::<f64, _>(&[[2.0, 0.0], [0.0, 4.0]]);
    assert_eq!(solver.set_a(&a), Ok(true));
    let mut x = zeros(9, 9);
    solver.solve(&column(&[2.0, 4.0]), &mut x).unwrap();
    assert!(max_abs_diff(&x, &column(&[1.0, 1.0])) < 1e-15);
}

#[test]
fn test_complex_solvers() {
    let a = random_matrix::<c64>(6, 6, 40);
    let x_known = random_matrix::<c64>(6, 2, 41);
    let b = matmul(&a, &x_known);
    let solvers: [Box<dyn LinearSolver<c64>>; 4] = [
        Box::new(QrHouseColSolver::<c64>::new()) as Box<dyn LinearSolver<c64>>,
        Box::new(QrHouseTranSolver::<c64>::new()),
        Box::new(QrSolver::new(BlockHouseholder::<c64>::new(4))),
        Box::new(QrpSolver::<c64>::new(true)),
    ];
    for mut solver in solvers {
        assert_eq!(solver.set_a(&a), Ok(true));
        let mut x = zeros(6, 2);
        solver.solve(&b, &mut x).unwrap();
        assert!(max_abs_diff(&x, &x_known) < 1e-10);
    }
}

#[test]
fn test_f32_solver() {
    let a = from_rows(&[[5.0f32, 2.0, 3.0], [1.5, -2.0, 8.0], [-3.0, 4.7, -0.5]]);
    let x_known = column(&[1.0f32, -2.0, 0.5]);
    let b = matmul(&a, &x_known);
    let mut solver = QrHouseColSolver::<f32>::new();
    assert_eq!(solver.set_a(&a), Ok(true));
    let mut x = zeros(3, 1);
    solver.solve(&b, &mut x).unwrap();
    assert!(max_abs_diff(&x, &x_known) < 1e-4);
}

#[test]
fn test_parallel_matches_sequential() {
    let a = random_matrix::<f64>(60, 40, 50);
    let b = random_matrix::<f64>(60, 8, 51);

    let mut sequential = QrHouseColSolver::<f64>::new();
    let mut parallel = QrHouseColSolver::<f64>::new().with_parallelism(Parallelism::Rayon);
    sequential.set_a(&a).unwrap();
    parallel.set_a(&a).unwrap();

    let mut x_seq = zeros(40, 8);
    let mut x_par = zeros(40, 8);
    sequential.solve(&b, &mut x_seq).unwrap();
    parallel.solve(&b, &mut x_par).unwrap();
    assert!(max_abs_diff(&x_seq, &x_par) < 1e-12);
}
