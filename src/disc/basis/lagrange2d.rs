use ndarray::{Array1, Array2, ArrayView1};

use crate::disc::basis::{Basis2D, triangle::JacobiBasis2D};
use crate::error::{BasisError, Result};

/// Nodal Lagrange basis on the triangle. Lagrange polynomial j is the
/// combination of orthonormal modes with coefficients from column j of V^-1.
#[derive(Debug, Clone)]
pub struct LagrangeBasis2D {
    pub p: usize,
    pub np: usize,
    pub jb2d: JacobiBasis2D,
}

impl LagrangeBasis2D {
    pub fn new(p: usize, r: ArrayView1<f64>, s: ArrayView1<f64>) -> Result<Self> {
        let jb2d = JacobiBasis2D::new(p, r, s)?;
        Ok(Self { p, np: jb2d.np, jb2d })
    }
    fn check_points(r: ArrayView1<f64>, s: ArrayView1<f64>) -> Result<()> {
        if r.len() != s.len() {
            return Err(BasisError::length_mismatch("LagrangeBasis2D points", r.len(), s.len()));
        }
        Ok(())
    }
    fn check_index(&self, j: usize) -> Result<()> {
        if j >= self.np {
            return Err(BasisError::InvalidBasisIndex { index: j, len: self.np });
        }
        Ok(())
    }
    pub fn basis_polynomial(&self, r: ArrayView1<f64>, s: ArrayView1<f64>, j: usize) -> Result<Array1<f64>> {
        Self::check_points(r, s)?;
        self.check_index(j)?;
        Ok(JacobiBasis2D::vandermonde2d(self.p, r, s).dot(&self.jb2d.v_inv.column(j)))
    }
    pub fn basis_gradient(
        &self,
        r: ArrayView1<f64>,
        s: ArrayView1<f64>,
        j: usize,
    ) -> Result<(Array1<f64>, Array1<f64>)> {
        Self::check_points(r, s)?;
        self.check_index(j)?;
        let (vr, vs) = JacobiBasis2D::grad_vandermonde_2d(self.p, r, s);
        let coeffs = self.jb2d.v_inv.column(j);
        Ok((vr.dot(&coeffs), vs.dot(&coeffs)))
    }
    /// Rows are evaluation points, columns are Lagrange functions.
    pub fn get_interp_matrix(&self, r: ArrayView1<f64>, s: ArrayView1<f64>) -> Result<Array2<f64>> {
        Self::check_points(r, s)?;
        self.jb2d.get_interp_matrix(r, s)
    }
    pub fn get_grad_interp_matrices(
        &self,
        r: ArrayView1<f64>,
        s: ArrayView1<f64>,
    ) -> Result<(Array2<f64>, Array2<f64>)> {
        self.jb2d.get_derivative_matrices(r, s)
    }
    pub fn interpolate(&self, r: ArrayView1<f64>, s: ArrayView1<f64>, f: ArrayView1<f64>) -> Result<Array1<f64>> {
        if f.len() != self.np {
            return Err(BasisError::length_mismatch("LagrangeBasis2D interpolate", self.np, f.len()));
        }
        Ok(self.get_interp_matrix(r, s)?.dot(&f))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disc::nodes::{NodeType, reference_nodes};
    use approx::assert_abs_diff_eq;

    fn grid_points() -> (Array1<f64>, Array1<f64>) {
        let ticks = [-1.0, -0.5, 0.5, 1.0];
        let mut r = Vec::new();
        let mut s = Vec::new();
        for &a in &ticks {
            for &b in &ticks {
                r.push(a);
                s.push(b);
            }
        }
        (Array1::from(r), Array1::from(s))
    }

    #[test]
    fn test_partition_of_unity() {
        let (rr, ss) = grid_points();
        for p in 1..=6 {
            for node_type in [NodeType::Hesthaven, NodeType::Epsilon] {
                let (r, s) = reference_nodes(p, node_type).unwrap();
                let lb = LagrangeBasis2D::new(p, r.view(), s.view()).unwrap();
                let im = lb.get_interp_matrix(rr.view(), ss.view()).unwrap();
                let (imr, ims) = lb.get_grad_interp_matrices(rr.view(), ss.view()).unwrap();
                for i in 0..rr.len() {
                    assert_abs_diff_eq!(im.row(i).sum(), 1.0, epsilon = 1e-6);
                    assert_abs_diff_eq!(imr.row(i).sum(), 0.0, epsilon = 1e-6);
                    assert_abs_diff_eq!(ims.row(i).sum(), 0.0, epsilon = 1e-6);
                }
            }
        }
    }

    #[test]
    fn test_kronecker_delta() {
        let p = 3;
        let (r, s) = reference_nodes(p, NodeType::Epsilon).unwrap();
        let lb = LagrangeBasis2D::new(p, r.view(), s.view()).unwrap();
        for j in 0..lb.np {
            let phi = lb.basis_polynomial(r.view(), s.view(), j).unwrap();
            for i in 0..lb.np {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_abs_diff_eq!(phi[i], expected, epsilon = 1e-10);
            }
        }
        assert!(lb.basis_polynomial(r.view(), s.view(), lb.np).is_err());
    }

    #[test]
    fn test_interpolation_and_gradient_exact() {
        let p = 4;
        let (r, s) = reference_nodes(p, NodeType::Hesthaven).unwrap();
        let lb = LagrangeBasis2D::new(p, r.view(), s.view()).unwrap();
        let f = |r: f64, s: f64| r.powi(3) - 2.0 * r * s * s + s + 0.5;
        let fr = |r: f64, s: f64| 3.0 * r * r - 2.0 * s * s;
        let fs = |r: f64, s: f64| -4.0 * r * s + 1.0;
        let nodal = Array1::from_iter(r.iter().zip(s.iter()).map(|(&a, &b)| f(a, b)));
        let probe_r = Array1::from(vec![-0.8, -0.3, 0.2, -0.5]);
        let probe_s = Array1::from(vec![-0.9, -0.1, -0.6, 0.3]);
        let vals = lb.interpolate(probe_r.view(), probe_s.view(), nodal.view()).unwrap();
        let mut grad_r = Array1::<f64>::zeros(probe_r.len());
        let mut grad_s = Array1::<f64>::zeros(probe_r.len());
        for j in 0..lb.np {
            let (gr, gs) = lb.basis_gradient(probe_r.view(), probe_s.view(), j).unwrap();
            grad_r = grad_r + &gr * nodal[j];
            grad_s = grad_s + &gs * nodal[j];
        }
        for k in 0..probe_r.len() {
            let (a, b) = (probe_r[k], probe_s[k]);
            assert_abs_diff_eq!(vals[k], f(a, b), epsilon = 1e-10);
            assert_abs_diff_eq!(grad_r[k], fr(a, b), epsilon = 1e-8);
            assert_abs_diff_eq!(grad_s[k], fs(a, b), epsilon = 1e-8);
        }
    }
}
