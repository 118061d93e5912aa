use ndarray::{Array1, Array2, ArrayView1, ArrayView2, s};
use statrs::function::gamma::gamma;

use crate::disc::linalg;
use crate::error::{BasisError, Result};

pub mod lagrange1d;
pub mod lagrange2d;
pub mod raviart_thomas;
pub mod triangle;

/// One-dimensional orthonormal Jacobi machinery shared by every basis.
pub trait Basis {
    /// Normalised Jacobi polynomial P_n^(alpha, beta) at a single point.
    fn jacobi_p(x: f64, alpha: f64, beta: f64, n: usize) -> f64 {
        let gamma0 = 2.0_f64.powf(alpha + beta + 1.0) / (alpha + beta + 1.0)
            * gamma(alpha + 1.0)
            * gamma(beta + 1.0)
            / gamma(alpha + beta + 1.0);
        let p0 = 1.0 / gamma0.sqrt();
        if n == 0 {
            return p0;
        }
        let gamma1 = (alpha + 1.0) * (beta + 1.0) / (alpha + beta + 3.0) * gamma0;
        let p1 = ((alpha + beta + 2.0) * x * 0.5 + (alpha - beta) * 0.5) / gamma1.sqrt();
        if n == 1 {
            return p1;
        }
        // three-term recurrence, A_1 seeds a_old
        let mut a_old = 2.0 / (2.0 + alpha + beta)
            * ((alpha + 1.0) * (beta + 1.0) / (alpha + beta + 3.0)).sqrt();
        let (mut pm1, mut p) = (p0, p1);
        for i in 1..n {
            let i_f = i as f64;
            let h1 = 2.0 * i_f + alpha + beta;
            let a_new = 2.0 / (h1 + 2.0)
                * ((i_f + 1.0) * (i_f + 1.0 + alpha + beta) * (i_f + 1.0 + alpha) * (i_f + 1.0 + beta)
                    / (h1 + 1.0)
                    / (h1 + 3.0))
                    .sqrt();
            let b_new = -(alpha.powi(2) - beta.powi(2)) / h1 / (h1 + 2.0);
            let next = (-a_old * pm1 + (x - b_new) * p) / a_new;
            pm1 = p;
            p = next;
            a_old = a_new;
        }
        p
    }
    fn grad_jacobi_p(x: f64, alpha: f64, beta: f64, n: usize) -> f64 {
        if n == 0 {
            return 0.0;
        }
        let n_f = n as f64;
        (n_f * (n_f + alpha + beta + 1.0)).sqrt() * Self::jacobi_p(x, alpha + 1.0, beta + 1.0, n - 1)
    }
    fn jacobi_polynomial(x: ArrayView1<f64>, alpha: f64, beta: f64, n: usize) -> Array1<f64> {
        x.mapv(|xi| Self::jacobi_p(xi, alpha, beta, n))
    }
    fn grad_jacobi_polynomial(x: ArrayView1<f64>, alpha: f64, beta: f64, n: usize) -> Array1<f64> {
        x.mapv(|xi| Self::grad_jacobi_p(xi, alpha, beta, n))
    }
    /// Gauss quadrature of n + 1 points for the Jacobi weight (1-x)^alpha (1+x)^beta,
    /// from the Golub-Welsch eigenproblem. Points come back in ascending order.
    fn jacobi_gauss_quadrature(alpha: f64, beta: f64, n: usize) -> Result<(Array1<f64>, Array1<f64>)> {
        let mu0 = 2.0_f64.powf(alpha + beta + 1.0) * gamma(alpha + 1.0) * gamma(beta + 1.0)
            / gamma(alpha + beta + 2.0);
        if n == 0 {
            let x0 = -(alpha - beta) / (alpha + beta + 2.0);
            return Ok((Array1::from_elem(1, x0), Array1::from_elem(1, mu0)));
        }
        let dim = n + 1;
        let h1 = Array1::from_iter((0..dim).map(|k| 2.0 * k as f64 + alpha + beta));
        let mut j = Array2::<f64>::zeros((dim, dim));
        // first entry in closed form, h1[0] vanishes when alpha + beta = 0
        j[[0, 0]] = (beta - alpha) / (alpha + beta + 2.0);
        for k in 1..dim {
            j[[k, k]] = -(alpha.powi(2) - beta.powi(2)) / (h1[k] + 2.0) / h1[k];
        }
        for k in 0..dim - 1 {
            let l = k as f64 + 1.0;
            let off = 2.0 / (h1[k] + 2.0)
                * (l * (l + alpha + beta) * (l + alpha) * (l + beta) / (h1[k] + 1.0) / (h1[k] + 3.0))
                    .sqrt();
            j[[k, k + 1]] = off;
            j[[k + 1, k]] = off;
        }
        let (points, vectors) = linalg::symmetric_eigen(j.view(), "Jacobi matrix")?;
        let weights = vectors.row(0).mapv(|v| v.powi(2) * mu0);
        Ok((points, weights))
    }
    /// Gauss-Lobatto points of order n (n + 1 points including both ends).
    fn jacobi_gauss_lobatto(alpha: f64, beta: f64, n: usize) -> Result<Array1<f64>> {
        match n {
            0 => Err(BasisError::InvalidOrder {
                order: 0,
                reason: "Gauss-Lobatto rule needs at least two points",
            }),
            1 => Ok(Array1::from_vec(vec![-1.0, 1.0])),
            n_order => {
                let (x_interior, _) = Self::jacobi_gauss_quadrature(alpha + 1.0, beta + 1.0, n_order - 2)?;
                let mut x_lobatto = Array1::<f64>::zeros(n_order + 1);
                x_lobatto[0] = -1.0;
                x_lobatto[n_order] = 1.0;
                x_lobatto.slice_mut(s![1..n_order]).assign(&x_interior);
                Ok(x_lobatto)
            }
        }
    }
    fn vandermonde1d(n: usize, r: ArrayView1<f64>) -> Array2<f64> {
        let mut v = Array2::<f64>::zeros((r.len(), n + 1));
        for j in 0..n + 1 {
            v.column_mut(j).assign(&Self::jacobi_polynomial(r, 0.0, 0.0, j));
        }
        v
    }
    fn grad_vandermonde1d(n: usize, r: ArrayView1<f64>) -> Array2<f64> {
        let mut vr = Array2::<f64>::zeros((r.len(), n + 1));
        for j in 0..n + 1 {
            vr.column_mut(j).assign(&Self::grad_jacobi_polynomial(r, 0.0, 0.0, j));
        }
        vr
    }
}

/// Modal bases on the reference triangle (-1,-1), (1,-1), (-1,1).
pub trait Basis2D: Basis {
    fn vandermonde2d(n: usize, r: ArrayView1<f64>, s: ArrayView1<f64>) -> Array2<f64>;
    fn grad_vandermonde_2d(n: usize, r: ArrayView1<f64>, s: ArrayView1<f64>) -> (Array2<f64>, Array2<f64>);
    /// Nodes of order n on the equilateral triangle.
    fn nodes2d(n: usize) -> Result<(Array1<f64>, Array1<f64>)>;

    /// Dr = Vr V^-1, Ds = Vs V^-1 evaluated at (r, s).
    fn dmatrices_2d(
        n: usize,
        r: ArrayView1<f64>,
        s: ArrayView1<f64>,
        inv_v: ArrayView2<f64>,
    ) -> Result<(Array2<f64>, Array2<f64>)> {
        if r.len() != s.len() {
            return Err(BasisError::length_mismatch("dmatrices_2d", r.len(), s.len()));
        }
        let (vr, vs) = Self::grad_vandermonde_2d(n, r, s);
        if vr.ncols() != inv_v.nrows() {
            return Err(BasisError::length_mismatch("dmatrices_2d", vr.ncols(), inv_v.nrows()));
        }
        Ok((vr.dot(&inv_v), vs.dot(&inv_v)))
    }
}
