use nalgebra::{DMatrix, SymmetricEigen};
use ndarray::{Array1, Array2, ArrayView2};

use crate::error::{BasisError, Result};

const INVERSE_RESIDUAL_TOL: f64 = 1.0e-8;
const CONDITION_LIMIT: f64 = 1.0e14;

pub fn to_nalgebra(a: ArrayView2<f64>) -> DMatrix<f64> {
    DMatrix::from_fn(a.nrows(), a.ncols(), |i, j| a[[i, j]])
}

pub fn from_nalgebra(m: &DMatrix<f64>) -> Array2<f64> {
    Array2::from_shape_fn((m.nrows(), m.ncols()), |(i, j)| m[(i, j)])
}

fn max_abs(a: ArrayView2<f64>) -> f64 {
    a.iter().fold(0.0_f64, |acc, &v| acc.max(v.abs()))
}

/// Inverts a square matrix. Fails when the matrix is singular or so badly
/// conditioned that the computed inverse does not reproduce the identity.
pub fn invert(a: ArrayView2<f64>, label: &'static str) -> Result<Array2<f64>> {
    let n = a.nrows();
    if n != a.ncols() {
        return Err(BasisError::length_mismatch(label, n, a.ncols()));
    }
    if n == 0 {
        return Err(BasisError::EmptyNodeSet);
    }
    let inv = to_nalgebra(a)
        .try_inverse()
        .ok_or(BasisError::Singular { label })?;
    let inv = from_nalgebra(&inv);
    if inv.iter().any(|v| !v.is_finite()) {
        return Err(BasisError::Singular { label });
    }
    let scale = max_abs(a);
    if scale * max_abs(inv.view()) > CONDITION_LIMIT {
        return Err(BasisError::Singular { label });
    }
    let residual = a.dot(&inv) - Array2::<f64>::eye(n);
    if max_abs(residual.view()) > INVERSE_RESIDUAL_TOL * (n as f64) {
        return Err(BasisError::Singular { label });
    }
    Ok(inv)
}

/// Eigen-decomposition of a symmetric matrix with eigenvalues sorted ascending
/// and eigenvectors stored column-wise in the same order.
pub fn symmetric_eigen(a: ArrayView2<f64>, label: &'static str) -> Result<(Array1<f64>, Array2<f64>)> {
    let n = a.nrows();
    let eig = SymmetricEigen::try_new(to_nalgebra(a), f64::EPSILON, 0)
        .ok_or(BasisError::Eigen { label })?;
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&i, &j| eig.eigenvalues[i].total_cmp(&eig.eigenvalues[j]));
    let values = Array1::from_iter(order.iter().map(|&k| eig.eigenvalues[k]));
    let vectors = Array2::from_shape_fn((n, n), |(i, j)| eig.eigenvectors[(i, order[j])]);
    Ok((values, vectors))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_invert_round_trip() {
        let a = array![[4.0, 1.0, 0.0], [1.0, 3.0, 1.0], [0.0, 1.0, 2.0]];
        let inv = invert(a.view(), "a").unwrap();
        let eye = a.dot(&inv);
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_abs_diff_eq!(eye[[i, j]], expected, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_invert_singular() {
        let a = array![[1.0, 2.0], [2.0, 4.0]];
        let err = invert(a.view(), "rank one").unwrap_err();
        assert!(matches!(err, BasisError::Singular { label: "rank one" }));
    }

    #[test]
    fn test_symmetric_eigen_sorted() {
        let a = array![[2.0, 0.0, 0.0], [0.0, -1.0, 0.0], [0.0, 0.0, 5.0]];
        let (values, vectors) = symmetric_eigen(a.view(), "diag").unwrap();
        assert_abs_diff_eq!(values[0], -1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(values[1], 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(values[2], 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(vectors[[1, 0]].abs(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(vectors[[2, 2]].abs(), 1.0, epsilon = 1e-12);
    }
}
