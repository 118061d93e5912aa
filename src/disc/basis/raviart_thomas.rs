pub mod basis_vector;
pub mod polynomial_term;

use std::ops::Range;

use ndarray::{Array1, Array2, ArrayView1, s};
use serde::Deserialize;
use tracing::debug;

use crate::disc::{
    basis::{Basis, lagrange1d::LagrangeBasis1D, triangle::JacobiBasis2D},
    frozen::Frozen,
    geometric::{Edge, Geometric2D, ReferenceTriangle},
    linalg,
    nodes::epsilon_nodes,
};
use crate::error::{BasisError, Result};
use basis_vector::BasisVector;
use polynomial_term::{BasisPolynomialTerm, PolyMultiplier, TermSpace, edge_coordinate};

/// Choice of DOF directions at the interior nodes.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RTBasisType {
    /// Cartesian unit vectors at the interior nodes.
    #[default]
    RomeroJameson,
    /// Unit vectors along E4 and E5 at the interior nodes.
    Ervin,
}

/// Where the DOF of a node lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RTFunctionType {
    Interior,
    Edge(Edge),
}

/// Raviart-Thomas element of order p on the reference triangle.
///
/// Nodes come in blocks: the interior nodes twice (one block per interior
/// direction), then p + 1 Gauss-Legendre points on each of edges 1, 2 and 3 in
/// the edge traversal order. DOF i is the value of the field at node i dotted
/// with `directions[i]`; basis function j is the one whose DOFs are delta_ij.
#[derive(Debug, Clone)]
pub struct RTElement {
    pub p: usize,
    pub np: usize,
    pub np_int: usize,
    pub np_edge: usize,
    pub basis_type: RTBasisType,
    pub r: Array1<f64>,
    pub s: Array1<f64>,
    pub directions: Vec<BasisVector>,
    pub terms: Vec<BasisPolynomialTerm>,
    pub space: TermSpace,
    /// A[i][k] = w_i . Phi_k(x_i)
    pub v: Frozen<Array2<f64>>,
    /// Coefficients of the dual basis in the spanning set.
    pub v_inv: Frozen<Array2<f64>>,
    pub v1: Frozen<Array2<f64>>,
    pub v2: Frozen<Array2<f64>>,
    pub dr1: Frozen<Array2<f64>>,
    pub dr2: Frozen<Array2<f64>>,
    pub ds1: Frozen<Array2<f64>>,
    pub ds2: Frozen<Array2<f64>>,
    pub div: Frozen<Array2<f64>>,
}

impl Basis for RTElement {}

impl RTElement {
    /// Element of order p with the interior nodes of order p - 1 pulled off the edges.
    pub fn new(p: usize, basis_type: RTBasisType) -> Result<Self> {
        let (r_int, s_int) = if p == 0 {
            (Array1::zeros(0), Array1::zeros(0))
        } else {
            epsilon_nodes(p - 1)?
        };
        Self::with_interior_nodes(p, basis_type, r_int.view(), s_int.view())
    }
    /// Element of order p on a caller-chosen interior node set of p(p+1)/2
    /// points strictly inside the triangle.
    pub fn with_interior_nodes(
        p: usize,
        basis_type: RTBasisType,
        r_int: ArrayView1<f64>,
        s_int: ArrayView1<f64>,
    ) -> Result<Self> {
        let np_int = p * (p + 1) / 2;
        let np_edge = p + 1;
        let np = (p + 1) * (p + 3);
        if r_int.len() != s_int.len() {
            return Err(BasisError::length_mismatch("RTElement interior r/s", r_int.len(), s_int.len()));
        }
        if r_int.len() != np_int {
            return Err(BasisError::length_mismatch("RTElement interior nodes", np_int, r_int.len()));
        }

        let interior = if p == 0 {
            None
        } else {
            Some(JacobiBasis2D::new(p - 1, r_int, s_int)?)
        };
        let (g, _) = Self::jacobi_gauss_quadrature(0.0, 0.0, p)?;
        let space = TermSpace {
            edge: LagrangeBasis1D::new(g.view())?,
            interior,
        };

        let mut r = Vec::with_capacity(np);
        let mut s = Vec::with_capacity(np);
        let mut directions = Vec::with_capacity(np);
        let mut terms = Vec::with_capacity(np);

        for field in [BasisVector::E4, BasisVector::E5] {
            for j in 0..np_int {
                r.push(r_int[j]);
                s.push(s_int[j]);
                terms.push(BasisPolynomialTerm::new(PolyMultiplier::Interior { j }, field));
                directions.push(match basis_type {
                    RTBasisType::RomeroJameson if field == BasisVector::E4 => BasisVector::UnitR,
                    RTBasisType::RomeroJameson => BasisVector::UnitS,
                    RTBasisType::Ervin => field.normalized_at(r_int[j], s_int[j]),
                });
            }
        }
        for (edge, field) in Edge::ALL.into_iter().zip([BasisVector::E1, BasisVector::E2, BasisVector::E3]) {
            for (j, &gj) in g.iter().enumerate() {
                let (rj, sj) = match edge {
                    Edge::One => (gj, -1.0),
                    Edge::Two => (-gj, gj),
                    Edge::Three => (-1.0, -gj),
                };
                r.push(rj);
                s.push(sj);
                terms.push(BasisPolynomialTerm::new(PolyMultiplier::Edge { edge, j }, field));
                directions.push(BasisVector::Normal(edge));
            }
        }

        let mut a = Array2::<f64>::zeros((np, np));
        let mut v1 = Array2::<f64>::zeros((np, np));
        let mut v2 = Array2::<f64>::zeros((np, np));
        let mut dr1 = Array2::<f64>::zeros((np, np));
        let mut dr2 = Array2::<f64>::zeros((np, np));
        let mut ds1 = Array2::<f64>::zeros((np, np));
        let mut ds2 = Array2::<f64>::zeros((np, np));
        for i in 0..np {
            let w = directions[i].eval(r[i], s[i]);
            for (k, term) in terms.iter().enumerate() {
                let value = term.eval(&space, r[i], s[i]);
                let jac = term.jacobian(&space, r[i], s[i]);
                a[[i, k]] = value[0] * w[0] + value[1] * w[1];
                v1[[i, k]] = value[0];
                v2[[i, k]] = value[1];
                dr1[[i, k]] = jac[0][0];
                ds1[[i, k]] = jac[0][1];
                dr2[[i, k]] = jac[1][0];
                ds2[[i, k]] = jac[1][1];
            }
        }
        let c = linalg::invert(a.view(), "RT dual system")?;
        let v1 = v1.dot(&c);
        let v2 = v2.dot(&c);
        let dr1 = dr1.dot(&c);
        let dr2 = dr2.dot(&c);
        let ds1 = ds1.dot(&c);
        let ds2 = ds2.dot(&c);
        let div = &dr1 + &ds2;
        debug!(p, np, np_int, ?basis_type, "built Raviart-Thomas element");

        Ok(Self {
            p,
            np,
            np_int,
            np_edge,
            basis_type,
            r: Array1::from_vec(r),
            s: Array1::from_vec(s),
            directions,
            terms,
            space,
            v: Frozen::new("A", a),
            v_inv: Frozen::new("C", c),
            v1: Frozen::new("V1", v1),
            v2: Frozen::new("V2", v2),
            dr1: Frozen::new("Dr1", dr1),
            dr2: Frozen::new("Dr2", dr2),
            ds1: Frozen::new("Ds1", ds1),
            ds2: Frozen::new("Ds2", ds2),
            div: Frozen::new("Div", div),
        })
    }
    /// DOFs of a vector field sampled at the element nodes.
    pub fn project_function_onto_dof(&self, s1: ArrayView1<f64>, s2: ArrayView1<f64>) -> Result<Array1<f64>> {
        if s1.len() != self.np {
            return Err(BasisError::length_mismatch("project_function_onto_dof s1", self.np, s1.len()));
        }
        if s2.len() != self.np {
            return Err(BasisError::length_mismatch("project_function_onto_dof s2", self.np, s2.len()));
        }
        Ok(Array1::from_iter(
            (0..self.np).map(|i| self.directions[i].dot(self.r[i], self.s[i], [s1[i], s2[i]])),
        ))
    }
    /// Edge coordinate of (r, s) for a 1-based edge number.
    pub fn get_edge_parameter(&self, edge: usize, r: f64, s: f64) -> Result<f64> {
        let edge = Edge::try_from(edge)?;
        Ok(edge_coordinate(edge, r, s).0)
    }
    pub fn edge_unit_normal(&self, edge: Edge) -> [f64; 2] {
        ReferenceTriangle::compute_ref_normal(edge)
    }
    pub fn interior_range(&self) -> Range<usize> {
        0..2 * self.np_int
    }
    pub fn edge_range(&self, edge: Edge) -> Range<usize> {
        let start = 2 * self.np_int + (edge.number() - 1) * self.np_edge;
        start..start + self.np_edge
    }
    fn check_index(&self, j: usize) -> Result<()> {
        if j >= self.np {
            return Err(BasisError::InvalidBasisIndex { index: j, len: self.np });
        }
        Ok(())
    }
    pub fn function_type(&self, j: usize) -> Result<RTFunctionType> {
        self.check_index(j)?;
        Ok(match self.terms[j].poly {
            PolyMultiplier::Interior { .. } => RTFunctionType::Interior,
            PolyMultiplier::Edge { edge, .. } => RTFunctionType::Edge(edge),
        })
    }
    /// DOF direction of node j.
    pub fn basis_vector_at(&self, j: usize) -> Result<[f64; 2]> {
        self.check_index(j)?;
        Ok(self.directions[j].eval(self.r[j], self.s[j]))
    }
    /// Dual basis function j at (r, s).
    pub fn evaluate_basis(&self, j: usize, r: f64, s: f64) -> Result<[f64; 2]> {
        self.check_index(j)?;
        let coeffs = self.v_inv.column(j);
        let mut value = [0.0, 0.0];
        for (k, term) in self.terms.iter().enumerate() {
            let phi = term.eval(&self.space, r, s);
            value[0] += coeffs[k] * phi[0];
            value[1] += coeffs[k] * phi[1];
        }
        Ok(value)
    }
    fn check_points(r: ArrayView1<f64>, s: ArrayView1<f64>) -> Result<()> {
        if r.len() != s.len() {
            return Err(BasisError::length_mismatch("RTElement points", r.len(), s.len()));
        }
        Ok(())
    }
    /// Both components of every basis function at (R, S); rows are points.
    pub fn get_interp_matrices(&self, r: ArrayView1<f64>, s: ArrayView1<f64>) -> Result<(Array2<f64>, Array2<f64>)> {
        Self::check_points(r, s)?;
        let mut m1 = Array2::<f64>::zeros((r.len(), self.np));
        let mut m2 = Array2::<f64>::zeros((r.len(), self.np));
        for i in 0..r.len() {
            for (k, term) in self.terms.iter().enumerate() {
                let phi = term.eval(&self.space, r[i], s[i]);
                m1[[i, k]] = phi[0];
                m2[[i, k]] = phi[1];
            }
        }
        Ok((m1.dot(&*self.v_inv), m2.dot(&*self.v_inv)))
    }
    /// Field reconstructed from its DOFs, evaluated at (R, S).
    pub fn interpolate(
        &self,
        r: ArrayView1<f64>,
        s: ArrayView1<f64>,
        dof: ArrayView1<f64>,
    ) -> Result<(Array1<f64>, Array1<f64>)> {
        if dof.len() != self.np {
            return Err(BasisError::length_mismatch("RTElement::interpolate dof", self.np, dof.len()));
        }
        let (m1, m2) = self.get_interp_matrices(r, s)?;
        Ok((m1.dot(&dof), m2.dot(&dof)))
    }
    /// Divergence of every basis function at (R, S); rows are points.
    pub fn get_divergence_matrix(&self, r: ArrayView1<f64>, s: ArrayView1<f64>) -> Result<Array2<f64>> {
        Self::check_points(r, s)?;
        let mut d = Array2::<f64>::zeros((r.len(), self.np));
        for i in 0..r.len() {
            for (k, term) in self.terms.iter().enumerate() {
                d[[i, k]] = term.divergence(&self.space, r[i], s[i]);
            }
        }
        Ok(d.dot(&*self.v_inv))
    }
    /// Node coordinates of the edge blocks, concatenated edge 1, 2, 3.
    pub fn edge_nodes(&self) -> (Array1<f64>, Array1<f64>) {
        let range = 2 * self.np_int..self.np;
        (
            self.r.slice(s![range.clone()]).to_owned(),
            self.s.slice(s![range]).to_owned(),
        )
    }
}
