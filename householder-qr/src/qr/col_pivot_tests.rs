use super::*;
use crate::scalar::c64;
use crate::test_utils::{max_abs_diff, random_matrix, RandomGenerate};
use crate::utils::dense::{from_rows, identity, matmul, zeros};
use crate::utils::pivoting::apply_column_permutation;
use crate::utils::validation::{is_unitary, reconstruction_error};

fn low_rank<T: RandomGenerate>(m: usize, n: usize, rank: usize, seed: u64) -> DTensor<T, 2> {
    let b = random_matrix::<T>(m, rank, seed);
    let c = random_matrix::<T>(rank, n, seed + 1000);
    matmul(&b, &c)
}

fn check_pivoted_factorization<T: RandomGenerate>(qr: &mut HouseholderColPiv<T>, a: &DTensor<T, 2>)
where
    T::Real: From<f32>,
{
    let tol: T::Real = 1e-10_f32.into();
    let q = qr.q(true);
    let r = qr.r(true);
    assert!(is_unitary(&q, tol));
    let ap = matmul(a, &qr.col_pivot_matrix());
    assert!(reconstruction_error(&ap, &q, &r) < tol);
    assert!(max_abs_diff(&ap, &apply_column_permutation(a, qr.col_pivots())) == T::Real::zero());
}

#[test]
fn test_full_rank_square() {
    let a = random_matrix::<f64>(6, 4, 1);
    let mut qr = HouseholderColPiv::new();
    assert!(qr.decompose(&a));
    assert_eq!(qr.rank(), 4);
    check_pivoted_factorization(&mut qr, &a);

    // pivoting orders the diagonal of R by decreasing magnitude
    let r = qr.r(true);
    for i in 1..4 {
        assert!(r[[i, i]].abs() <= r[[i - 1, i - 1]].abs() * (1.0 + 1e-12));
    }
}

#[test]
fn test_known_rank_is_detected() {
    for (m, n, rank) in [(7, 5, 2), (5, 7, 3), (6, 6, 1), (8, 4, 4)] {
        let a = low_rank::<f64>(m, n, rank, (m * n) as u64);
        let mut qr = HouseholderColPiv::new().with_singular_threshold(1e-10);
        assert!(qr.decompose(&a));
        assert_eq!(qr.rank(), rank, "{}x{} rank {}", m, n, rank);
        check_pivoted_factorization(&mut qr, &a);

        let r = qr.r(false);
        for i in rank..m {
            for j in 0..n {
                assert_eq!(r[[i, j]], 0.0);
            }
        }
        assert!(qr.gammas()[rank..].iter().all(|&g| g == 0.0));
    }
}

#[test]
fn test_truncated_factors() {
    let a = low_rank::<f64>(7, 5, 2, 3);
    let mut qr = HouseholderColPiv::new().with_singular_threshold(1e-10);
    assert!(qr.decompose(&a));
    let (q, r) = qr.truncated();
    assert_eq!(*q.shape(), (7, 2));
    assert_eq!(*r.shape(), (2, 5));
    let ap = apply_column_permutation(&a, qr.col_pivots());
    assert!(reconstruction_error(&ap, &q, &r) < 1e-10);
}

#[test]
fn test_downdate_matches_recompute() {
    let a = low_rank::<f64>(9, 6, 3, 4);
    let mut recompute = HouseholderColPiv::new().with_singular_threshold(1e-10);
    let mut downdate = HouseholderColPiv::new()
        .with_singular_threshold(1e-10)
        .with_norm_update(NormUpdate::Downdate);
    assert!(recompute.decompose(&a));
    assert!(downdate.decompose(&a));
    assert_eq!(recompute.rank(), 3);
    assert_eq!(downdate.rank(), 3);
    check_pivoted_factorization(&mut downdate, &a);
}

#[test]
fn test_zero_matrix_has_rank_zero() {
    let a = zeros::<f64>(3, 4);
    let mut qr = HouseholderColPiv::new();
    assert!(qr.decompose(&a));
    assert_eq!(qr.rank(), 0);
    assert!(max_abs_diff(&qr.q(false), &identity(3, 3)) == 0.0);
    assert!(max_abs_diff(&qr.r(true), &zeros(3, 4)) == 0.0);
}

#[test]
fn test_truncated_factors_of_rank_zero() {
    let a = zeros::<f64>(3, 4);
    let mut qr = HouseholderColPiv::new();
    assert!(qr.decompose(&a));
    let (q, r) = qr.truncated();
    assert_eq!(*q.shape(), (3, 0));
    assert_eq!(*r.shape(), (0, 4));
    assert!(max_abs_diff(&matmul(&q, &r), &a) == 0.0);
}

#[test]
fn test_first_pivot_is_largest_column() {
    let a = from_rows::<f64, _>(&[[0.0, 1.0, 2.0], [-2.0, 4.0, 9.0], [0.5, 0.0, 5.0]]);
    let mut qr = HouseholderColPiv::new();
    assert!(qr.decompose(&a));
    assert_eq!(qr.rank(), 3);
    assert_eq!(qr.col_pivots()[0], 2);
    let mut sorted = qr.col_pivots().to_vec();
    sorted.sort_unstable();
    assert_eq!(sorted, vec![0, 1, 2]);
    check_pivoted_factorization(&mut qr, &a);
}

#[test]
fn test_complex_rank_deficient() {
    let a = low_rank::<c64>(6, 5, 2, 5);
    let mut qr = HouseholderColPiv::new().with_singular_threshold(1e-10);
    assert!(qr.decompose(&a));
    assert_eq!(qr.rank(), 2);
    check_pivoted_factorization(&mut qr, &a);
}

#[test]
fn test_rank_is_reset_between_calls() {
    let mut qr = HouseholderColPiv::new().with_singular_threshold(1e-10);
    assert!(qr.decompose(&low_rank::<f64>(5, 5, 2, 6)));
    assert_eq!(qr.rank(), 2);
    assert!(qr.decompose(&random_matrix::<f64>(4, 3, 7)));
    assert_eq!(qr.rank(), 3);
    assert_eq!(qr.col_pivots().len(), 3);
}

#[test]
fn test_apply_q_tran_to_matches_explicit_q() {
    let a = low_rank::<f64>(6, 4, 2, 8);
    let mut qr = HouseholderColPiv::new().with_singular_threshold(1e-10);
    assert!(qr.decompose(&a));
    let q = qr.q(false);
    let x0 = [1.0_f64, 2.0, -1.0, 0.5, 0.0, 3.0];
    let mut x = x0;
    qr.apply_q_tran_to(&mut x);
    for i in 0..6 {
        let expected: f64 = (0..6).map(|k| q[[k, i]] * x0[k]).sum();
        assert!((x[i] - expected).abs() < 1e-12);
    }
    assert_eq!(qr.reflector(0).len(), 6);
}

#[test]
fn test_default_threshold_scales_with_size() {
    let qr = HouseholderColPiv::<f64>::new();
    assert_eq!(qr.singular_threshold(10, 4), 10.0 * f64::EPSILON);
    let qr = qr.with_singular_threshold(1e-6);
    assert_eq!(qr.singular_threshold(10, 4), 1e-6);
}
