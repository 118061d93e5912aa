use std::f64::consts::PI;

use ndarray::{Array1, Array2, ArrayView1};
use tracing::debug;

use crate::disc::{
    basis::{
        Basis, Basis2D,
        lagrange1d::{LagrangeBasis1D, LobattoBasis},
    },
    frozen::Frozen,
    linalg,
};
use crate::error::{BasisError, Result};

/// Warp-and-blend optimised alpha for orders 1..=15.
const ALPOPT: [f64; 15] = [
    0.0000, 0.0000, 1.4152, 0.1001, 0.2751, 0.9800, 1.0999, 1.2832, 1.3648, 1.4773, 1.4959,
    1.5743, 1.5770, 1.6223, 1.6258,
];

/// Selects what is evaluated: the polynomial itself or one of its partials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Derivative {
    Value,
    Dr,
    Ds,
}

/// Orthonormal Jacobi (Dubiner) basis of order p bound to a nodal set.
#[derive(Debug, Clone)]
pub struct JacobiBasis2D {
    pub p: usize,
    pub np: usize,
    pub r: Array1<f64>,
    pub s: Array1<f64>,
    pub v: Frozen<Array2<f64>>,
    pub v_inv: Frozen<Array2<f64>>,
    pub vr: Frozen<Array2<f64>>,
    pub vs: Frozen<Array2<f64>>,
}

impl JacobiBasis2D {
    pub fn new(p: usize, r: ArrayView1<f64>, s: ArrayView1<f64>) -> Result<Self> {
        let np = (p + 1) * (p + 2) / 2;
        if r.len() != s.len() {
            return Err(BasisError::length_mismatch("JacobiBasis2D r/s", r.len(), s.len()));
        }
        if r.is_empty() {
            return Err(BasisError::EmptyNodeSet);
        }
        if r.len() != np {
            return Err(BasisError::length_mismatch("JacobiBasis2D nodes", np, r.len()));
        }
        crate::disc::nodes::check_distinct(r, s)?;
        let v = Self::vandermonde2d(p, r, s);
        let v_inv = linalg::invert(v.view(), "V")?;
        let (vr, vs) = Self::grad_vandermonde_2d(p, r, s);
        debug!(p, np, "built Jacobi basis");
        Ok(Self {
            p,
            np,
            r: r.to_owned(),
            s: s.to_owned(),
            v: Frozen::new("V", v),
            v_inv: Frozen::new("Vinv", v_inv),
            vr: Frozen::new("Vr", vr),
            vs: Frozen::new("Vs", vs),
        })
    }
    pub fn rs_to_ab_point(r: f64, s: f64) -> (f64, f64) {
        let a = if s != 1.0 {
            2.0 * (1.0 + r) / (1.0 - s) - 1.0
        } else {
            -1.0
        };
        (a, s)
    }
    pub fn rs_to_ab(r: ArrayView1<f64>, s: ArrayView1<f64>) -> (Array1<f64>, Array1<f64>) {
        let a = r
            .iter()
            .zip(s.iter())
            .map(|(&r_val, &s_val)| Self::rs_to_ab_point(r_val, s_val).0)
            .collect::<Array1<f64>>();
        let b = s.to_owned();
        (a, b)
    }
    fn simplex_ab(a: f64, b: f64, i: usize, j: usize) -> f64 {
        2.0_f64.sqrt()
            * Self::jacobi_p(a, 0.0, 0.0, i)
            * Self::jacobi_p(b, 2.0 * i as f64 + 1.0, 0.0, j)
            * (1.0 - b).powi(i as i32)
    }
    fn grad_simplex_ab(a: f64, b: f64, id: usize, jd: usize) -> (f64, f64) {
        let fa = Self::jacobi_p(a, 0.0, 0.0, id);
        let gb = Self::jacobi_p(b, 2.0 * id as f64 + 1.0, 0.0, jd);
        let dfa = Self::grad_jacobi_p(a, 0.0, 0.0, id);
        let dgb = Self::grad_jacobi_p(b, 2.0 * id as f64 + 1.0, 0.0, jd);
        let half_1mb = 0.5 * (1.0 - b);
        let id_i = id as i32;

        let mut dmode_dr = dfa * gb;
        let mut dmode_ds = dfa * (gb * (0.5 * (1.0 + a)));
        if id > 0 {
            dmode_dr *= half_1mb.powi(id_i - 1);
            dmode_ds *= half_1mb.powi(id_i - 1);
        }
        let mut tmp = dgb * half_1mb.powi(id_i);
        if id > 0 {
            tmp -= 0.5 * id as f64 * gb * half_1mb.powi(id_i - 1);
        }
        dmode_ds += fa * tmp;
        let scale = 2.0_f64.powf(id as f64 + 0.5);
        (dmode_dr * scale, dmode_ds * scale)
    }
    /// Orthonormal mode (i, j) on the triangle at every (r, s).
    pub fn simplex_2dp(r: ArrayView1<f64>, s: ArrayView1<f64>, i: usize, j: usize) -> Array1<f64> {
        let (a, b) = Self::rs_to_ab(r, s);
        Array1::from_iter(a.iter().zip(b.iter()).map(|(&a, &b)| Self::simplex_ab(a, b, i, j)))
    }
    pub fn grad_simplex_2dp(
        r: ArrayView1<f64>,
        s: ArrayView1<f64>,
        i: usize,
        j: usize,
    ) -> (Array1<f64>, Array1<f64>) {
        let (a, b) = Self::rs_to_ab(r, s);
        let mut dr = Array1::zeros(a.len());
        let mut ds = Array1::zeros(a.len());
        for k in 0..a.len() {
            let (d_r, d_s) = Self::grad_simplex_ab(a[k], b[k], i, j);
            dr[k] = d_r;
            ds[k] = d_s;
        }
        (dr, ds)
    }
    pub fn polynomial_term(r: f64, s: f64, i: usize, j: usize) -> f64 {
        let (a, b) = Self::rs_to_ab_point(r, s);
        Self::simplex_ab(a, b, i, j)
    }
    pub fn polynomial_term_dr(r: f64, s: f64, i: usize, j: usize) -> f64 {
        let (a, b) = Self::rs_to_ab_point(r, s);
        Self::grad_simplex_ab(a, b, i, j).0
    }
    pub fn polynomial_term_ds(r: f64, s: f64, i: usize, j: usize) -> f64 {
        let (a, b) = Self::rs_to_ab_point(r, s);
        Self::grad_simplex_ab(a, b, i, j).1
    }
    fn term(r: f64, s: f64, i: usize, j: usize, derivative: Derivative) -> f64 {
        match derivative {
            Derivative::Value => Self::polynomial_term(r, s, i, j),
            Derivative::Dr => Self::polynomial_term_dr(r, s, i, j),
            Derivative::Ds => Self::polynomial_term_ds(r, s, i, j),
        }
    }
    /// Iterates (i, j) in canonical column order for order p.
    pub fn term_pairs(p: usize) -> impl Iterator<Item = (usize, usize)> {
        (0..=p).flat_map(move |i| (0..=p - i).map(move |j| (i, j)))
    }
    pub fn term_indices(&self, k: usize) -> Option<(usize, usize)> {
        Self::term_pairs(self.p).nth(k)
    }
    pub fn term_number(&self, i: usize, j: usize) -> Option<usize> {
        Self::term_pairs(self.p).position(|pair| pair == (i, j))
    }
    /// V(R, S) V^-1: nodal values on this basis' nodes mapped to (R, S).
    pub fn get_interp_matrix(&self, r: ArrayView1<f64>, s: ArrayView1<f64>) -> Result<Array2<f64>> {
        if r.len() != s.len() {
            return Err(BasisError::length_mismatch("get_interp_matrix", r.len(), s.len()));
        }
        Ok(Self::vandermonde2d(self.p, r, s).dot(&*self.v_inv))
    }
    pub fn get_derivative_matrices(
        &self,
        r: ArrayView1<f64>,
        s: ArrayView1<f64>,
    ) -> Result<(Array2<f64>, Array2<f64>)> {
        Self::dmatrices_2d(self.p, r, s, self.v_inv.view())
    }
    /// All modal terms (or their partials) at a single point.
    pub fn get_polynomial_evaluation(&self, r: f64, s: f64, derivative: Derivative) -> Array1<f64> {
        Self::term_pairs(self.p)
            .map(|(i, j)| Self::term(r, s, i, j, derivative))
            .collect()
    }
    /// Row sums of V, Vr or Vs over the nodes.
    pub fn get_all_polynomials(&self, derivative: Derivative) -> Array1<f64> {
        let m = match derivative {
            Derivative::Value => &self.v,
            Derivative::Dr => &self.vr,
            Derivative::Ds => &self.vs,
        };
        m.rows().into_iter().map(|row| row.sum()).collect()
    }
    /// Polynomial with modal coefficients taken from column j of V^-1, which is
    /// the j-th Lagrange polynomial of the nodal set.
    pub fn get_orthogonal_polynomial_at_j(&self, r: f64, s: f64, j: usize, derivative: Derivative) -> Result<f64> {
        if j >= self.np {
            return Err(BasisError::InvalidBasisIndex { index: j, len: self.np });
        }
        let terms = self.get_polynomial_evaluation(r, s, derivative);
        Ok(terms.dot(&self.v_inv.column(j)))
    }
    pub(crate) fn orthogonal_value_and_gradient(&self, r: f64, s: f64, j: usize) -> (f64, [f64; 2]) {
        let (a, b) = Self::rs_to_ab_point(r, s);
        let coeffs = self.v_inv.column(j);
        let mut value = 0.0;
        let mut grad = [0.0, 0.0];
        for (k, (i, jj)) in Self::term_pairs(self.p).enumerate() {
            let (dr, ds) = Self::grad_simplex_ab(a, b, i, jj);
            value += coeffs[k] * Self::simplex_ab(a, b, i, jj);
            grad[0] += coeffs[k] * dr;
            grad[1] += coeffs[k] * ds;
        }
        (value, grad)
    }
    /// 1D warp for the edge of the warp-and-blend construction.
    pub fn warp_factor(n: usize, rout: ArrayView1<f64>) -> Result<Array1<f64>> {
        let lgl = LobattoBasis::new(n)?;
        let req = Array1::linspace(-1.0, 1.0, n + 1);
        let equidistant = LagrangeBasis1D::new(req.view())?;
        let warp = equidistant.get_interpolation_matrix(rout).dot(&(&lgl.xi - &req));
        let zerof = rout.mapv(|x| if x.abs() < 1.0 - 1.0e-10 { 1.0 } else { 0.0 });
        let sf = 1.0 - (&zerof * &rout).mapv(|x| x.powi(2));
        Ok(&warp / &sf + &warp * &(zerof - 1.0))
    }
    pub fn xy_to_rs(x: ArrayView1<f64>, y: ArrayView1<f64>) -> (Array1<f64>, Array1<f64>) {
        let l1 = (3.0_f64.sqrt() * &y + 1.0) / 3.0;
        let l2 = (-3.0 * &x - 3.0_f64.sqrt() * &y + 2.0) / 6.0;
        let l3 = (3.0 * &x - 3.0_f64.sqrt() * &y + 2.0) / 6.0;
        let r = -&l2 + &l3 - &l1;
        let s = -&l2 - &l3 + &l1;
        (r, s)
    }
}

impl Basis for JacobiBasis2D {}

impl Basis2D for JacobiBasis2D {
    fn vandermonde2d(n: usize, r: ArrayView1<f64>, s: ArrayView1<f64>) -> Array2<f64> {
        let mut v = Array2::<f64>::zeros((r.len(), (n + 1) * (n + 2) / 2));
        for (sk, (i, j)) in Self::term_pairs(n).enumerate() {
            v.column_mut(sk).assign(&Self::simplex_2dp(r, s, i, j));
        }
        v
    }
    fn grad_vandermonde_2d(n: usize, r: ArrayView1<f64>, s: ArrayView1<f64>) -> (Array2<f64>, Array2<f64>) {
        let np = (n + 1) * (n + 2) / 2;
        let mut v2dr = Array2::<f64>::zeros((r.len(), np));
        let mut v2ds = Array2::<f64>::zeros((r.len(), np));
        for (sk, (i, j)) in Self::term_pairs(n).enumerate() {
            let (dr, ds) = Self::grad_simplex_2dp(r, s, i, j);
            v2dr.column_mut(sk).assign(&dr);
            v2ds.column_mut(sk).assign(&ds);
        }
        (v2dr, v2ds)
    }
    fn nodes2d(n: usize) -> Result<(Array1<f64>, Array1<f64>)> {
        if n == 0 {
            return Ok((Array1::zeros(1), Array1::zeros(1)));
        }
        let alpha = if n < 16 { ALPOPT[n - 1] } else { 5.0 / 3.0 };
        let np = (n + 1) * (n + 2) / 2;

        let mut l1 = Array1::<f64>::zeros(np);
        let mut l2 = Array1::<f64>::zeros(np);
        let mut l3 = Array1::<f64>::zeros(np);
        for (sk, (i, j)) in Self::term_pairs(n).enumerate() {
            l1[sk] = i as f64 / n as f64;
            l3[sk] = j as f64 / n as f64;
            l2[sk] = 1.0 - l1[sk] - l3[sk];
        }
        let mut x = -&l2 + &l3;
        let mut y = (-&l2 - &l3 + 2.0 * &l1) / 3.0_f64.sqrt();

        let blend1 = 4.0 * &l2 * &l3;
        let blend2 = 4.0 * &l1 * &l3;
        let blend3 = 4.0 * &l1 * &l2;

        let warpf1 = Self::warp_factor(n, (&l3 - &l2).view())?;
        let warpf2 = Self::warp_factor(n, (&l1 - &l3).view())?;
        let warpf3 = Self::warp_factor(n, (&l2 - &l1).view())?;

        let warp1 = blend1 * warpf1 * (1.0 + (alpha * &l1).powi(2));
        let warp2 = blend2 * warpf2 * (1.0 + (alpha * &l2).powi(2));
        let warp3 = blend3 * warpf3 * (1.0 + (alpha * &l3).powi(2));

        x = x + &warp1 + (2.0 * PI / 3.0).cos() * &warp2 + (4.0 * PI / 3.0).cos() * &warp3;
        y = y + (2.0 * PI / 3.0).sin() * &warp2 + (4.0 * PI / 3.0).sin() * &warp3;
        Ok((x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disc::nodes::{NodeType, reference_nodes};
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn hesthaven_basis(p: usize) -> JacobiBasis2D {
        let (r, s) = reference_nodes(p, NodeType::Hesthaven).unwrap();
        JacobiBasis2D::new(p, r.view(), s.view()).unwrap()
    }

    #[test]
    fn test_rs_to_ab_apex() {
        let (a, b) = JacobiBasis2D::rs_to_ab(array![-1.0, 0.0, -1.0].view(), array![-1.0, -1.0, 1.0].view());
        assert_abs_diff_eq!(a[0], -1.0);
        assert_abs_diff_eq!(a[1], 0.0);
        assert_abs_diff_eq!(a[2], -1.0);
        assert_eq!(b, array![-1.0, -1.0, 1.0]);
    }

    #[test]
    fn test_simplex_orthonormal_under_cubature() {
        use crate::disc::cubature::Cubature2D;
        let p = 4;
        let cub = Cubature2D::new(2 * p).unwrap();
        let v = JacobiBasis2D::vandermonde2d(p, cub.r.view(), cub.s.view());
        let gram = v.t().dot(&(&v * &cub.w.view().insert_axis(ndarray::Axis(1))));
        for i in 0..gram.nrows() {
            for j in 0..gram.ncols() {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_abs_diff_eq!(gram[[i, j]], expected, epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn test_grad_simplex_matches_finite_difference() {
        let eps = 1e-6;
        let pts = [(-0.5, -0.5), (0.1, -0.7), (-0.9, 0.6), (-0.2, 0.1)];
        for p in 0..=5 {
            for (i, j) in JacobiBasis2D::term_pairs(p) {
                for &(r, s) in &pts {
                    let fd_r = (JacobiBasis2D::polynomial_term(r + eps, s, i, j)
                        - JacobiBasis2D::polynomial_term(r - eps, s, i, j))
                        / (2.0 * eps);
                    let fd_s = (JacobiBasis2D::polynomial_term(r, s + eps, i, j)
                        - JacobiBasis2D::polynomial_term(r, s - eps, i, j))
                        / (2.0 * eps);
                    assert_abs_diff_eq!(JacobiBasis2D::polynomial_term_dr(r, s, i, j), fd_r, epsilon = 1e-6);
                    assert_abs_diff_eq!(JacobiBasis2D::polynomial_term_ds(r, s, i, j), fd_s, epsilon = 1e-6);
                }
            }
        }
    }

    #[test]
    fn test_orthogonal_polynomial_at_j_is_identity() {
        for p in 1..=6 {
            let jb = hesthaven_basis(p);
            for i in 0..jb.np {
                for j in 0..jb.np {
                    let val = jb
                        .get_orthogonal_polynomial_at_j(jb.r[i], jb.s[i], j, Derivative::Value)
                        .unwrap();
                    let expected = if i == j { 1.0 } else { 0.0 };
                    assert_abs_diff_eq!(val, expected, epsilon = 1e-6);
                }
            }
        }
    }

    #[test]
    fn test_gradient_exact_for_polynomials() {
        for p in 1..=6 {
            let jb = hesthaven_basis(p);
            let (dr, ds) = jb.get_derivative_matrices(jb.r.view(), jb.s.view()).unwrap();
            for deg in 0..=p {
                for m in 0..=deg {
                    let n = deg - m;
                    // f = r^m s^n
                    let f = Array1::from_iter(jb.r.iter().zip(jb.s.iter()).map(|(&r, &s)| r.powi(m as i32) * s.powi(n as i32)));
                    let dfr = dr.dot(&f);
                    let dfs = ds.dot(&f);
                    for k in 0..jb.np {
                        let (r, s) = (jb.r[k], jb.s[k]);
                        let er = if m > 0 { m as f64 * r.powi(m as i32 - 1) * s.powi(n as i32) } else { 0.0 };
                        let es = if n > 0 { n as f64 * r.powi(m as i32) * s.powi(n as i32 - 1) } else { 0.0 };
                        assert_abs_diff_eq!(dfr[k], er, epsilon = 1e-6);
                        assert_abs_diff_eq!(dfs[k], es, epsilon = 1e-6);
                    }
                }
            }
        }
    }

    #[test]
    fn test_term_indexing() {
        let jb = hesthaven_basis(3);
        assert_eq!(jb.term_indices(0), Some((0, 0)));
        assert_eq!(jb.term_indices(3), Some((0, 3)));
        assert_eq!(jb.term_indices(4), Some((1, 0)));
        assert_eq!(jb.term_indices(9), Some((3, 0)));
        assert_eq!(jb.term_indices(10), None);
        assert_eq!(jb.term_number(2, 1), Some(8));
        assert_eq!(jb.term_number(2, 2), None);
    }

    #[test]
    fn test_interp_matrix_and_polynomial_sums() {
        let jb = hesthaven_basis(3);
        let im = jb.get_interp_matrix(jb.r.view(), jb.s.view()).unwrap();
        for i in 0..jb.np {
            for j in 0..jb.np {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_abs_diff_eq!(im[[i, j]], expected, epsilon = 1e-10);
            }
        }
        let sums = jb.get_all_polynomials(Derivative::Value);
        for k in 0..jb.np {
            let row = jb.get_polynomial_evaluation(jb.r[k], jb.s[k], Derivative::Value);
            assert_abs_diff_eq!(sums[k], row.sum(), epsilon = 1e-12);
        }
        let dr_sums = jb.get_all_polynomials(Derivative::Dr);
        let dr_row = jb.get_polynomial_evaluation(jb.r[2], jb.s[2], Derivative::Dr);
        assert_abs_diff_eq!(dr_sums[2], dr_row.sum(), epsilon = 1e-12);
    }

    #[test]
    fn test_node_count_mismatch() {
        let r = array![-1.0, 1.0];
        let s = array![-1.0, -1.0];
        assert!(matches!(
            JacobiBasis2D::new(1, r.view(), s.view()),
            Err(BasisError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn test_degenerate_nodes_fail() {
        // three collinear points cannot carry a linear basis
        let r = array![-1.0, 0.0, 1.0];
        let s = array![-1.0, -1.0, -1.0];
        assert!(matches!(
            JacobiBasis2D::new(1, r.view(), s.view()),
            Err(BasisError::Singular { .. })
        ));
        let r = array![-1.0, -1.0, 1.0];
        let s = array![-1.0, -1.0, -1.0];
        assert!(matches!(
            JacobiBasis2D::new(1, r.view(), s.view()),
            Err(BasisError::DuplicateNodes { first: 0, second: 1 })
        ));
    }
}
