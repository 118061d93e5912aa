use ndarray::{Array1, Array2, ArrayView1};

use crate::disc::basis::Basis;
use crate::disc::frozen::Frozen;
use crate::disc::linalg;
use crate::error::{BasisError, Result};

const NODE_MATCH_TOL: f64 = 1.0e-10;

/// Barycentric Lagrange basis over an arbitrary set of distinct 1D nodes.
#[derive(Debug, Clone)]
pub struct LagrangeBasis1D {
    pub p: usize,
    pub np: usize,
    pub weights: Array1<f64>,
    pub nodes: Array1<f64>,
}

impl LagrangeBasis1D {
    pub fn new(nodes: ArrayView1<f64>) -> Result<Self> {
        let np = nodes.len();
        if np == 0 {
            return Err(BasisError::EmptyNodeSet);
        }
        for j in 0..np {
            for i in j + 1..np {
                if (nodes[i] - nodes[j]).abs() < NODE_MATCH_TOL {
                    return Err(BasisError::DuplicateNodes { first: j, second: i });
                }
            }
        }
        let weights = Array1::from_iter((0..np).map(|j| {
            let mut w = 1.0;
            for i in 0..np {
                if i != j {
                    w /= nodes[j] - nodes[i];
                }
            }
            w
        }));
        Ok(Self {
            p: np - 1,
            np,
            weights,
            nodes: nodes.to_owned(),
        })
    }
    fn check_index(&self, j: usize) -> Result<()> {
        if j >= self.np {
            return Err(BasisError::InvalidBasisIndex { index: j, len: self.np });
        }
        Ok(())
    }
    /// Node polynomial prod_i (r - x_i), common to every basis function.
    fn evaluate_l(&self, r: f64) -> f64 {
        self.nodes.iter().fold(1.0, |acc, &x| acc * (r - x))
    }
    pub(crate) fn value(&self, j: usize, r: f64) -> f64 {
        if (r - self.nodes[j]).abs() < NODE_MATCH_TOL {
            return 1.0;
        }
        self.evaluate_l(r) * self.weights[j] / (r - self.nodes[j])
    }
    pub(crate) fn derivative(&self, j: usize, r: f64) -> f64 {
        if let Some(m) = self.nodes.iter().position(|&x| (r - x).abs() < NODE_MATCH_TOL) {
            if m == j {
                return (0..self.np)
                    .filter(|&k| k != j)
                    .map(|k| 1.0 / (self.nodes[j] - self.nodes[k]))
                    .sum();
            }
            return self.weights[j] / self.weights[m] / (self.nodes[m] - self.nodes[j]);
        }
        let sum: f64 = (0..self.np)
            .filter(|&k| k != j)
            .map(|k| 1.0 / (r - self.nodes[k]))
            .sum();
        self.value(j, r) * sum
    }
    /// The j-th basis polynomial at every point of `r`.
    pub fn basis_polynomial(&self, r: ArrayView1<f64>, j: usize) -> Result<Array1<f64>> {
        self.check_index(j)?;
        Ok(r.mapv(|x| self.value(j, x)))
    }
    pub fn basis_derivative(&self, r: ArrayView1<f64>, j: usize) -> Result<Array1<f64>> {
        self.check_index(j)?;
        Ok(r.mapv(|x| self.derivative(j, x)))
    }
    /// Rows are evaluation points, columns are basis functions.
    pub fn get_interpolation_matrix(&self, r: ArrayView1<f64>) -> Array2<f64> {
        Array2::from_shape_fn((r.len(), self.np), |(i, j)| self.value(j, r[i]))
    }
    pub fn get_derivative_matrix(&self, r: ArrayView1<f64>) -> Array2<f64> {
        Array2::from_shape_fn((r.len(), self.np), |(i, j)| self.derivative(j, r[i]))
    }
    pub fn interpolate(&self, r: ArrayView1<f64>, f: ArrayView1<f64>) -> Result<Array1<f64>> {
        if f.len() != self.np {
            return Err(BasisError::length_mismatch("interpolate", self.np, f.len()));
        }
        Ok(self.get_interpolation_matrix(r).dot(&f))
    }
}

/// Nodal 1D element on the Gauss-Lobatto points of [-1, 1].
#[derive(Debug, Clone)]
pub struct LobattoBasis {
    pub n: usize,
    pub xi: Array1<f64>,
    pub vandermonde: Frozen<Array2<f64>>,
    pub inv_vandermonde: Frozen<Array2<f64>>,
    pub dr: Frozen<Array2<f64>>,
}

impl Basis for LobattoBasis {}

impl LobattoBasis {
    pub fn new(n: usize) -> Result<LobattoBasis> {
        let xi = Self::jacobi_gauss_lobatto(0.0, 0.0, n)?;
        let vandermonde = Self::vandermonde1d(n, xi.view());
        let inv_vandermonde = linalg::invert(vandermonde.view(), "V1D")?;
        let dr = Self::grad_vandermonde1d(n, xi.view()).dot(&inv_vandermonde);
        Ok(LobattoBasis {
            n,
            xi,
            vandermonde: Frozen::new("V1D", vandermonde),
            inv_vandermonde: Frozen::new("V1D^-1", inv_vandermonde),
            dr: Frozen::new("Dr1D", dr),
        })
    }
}
