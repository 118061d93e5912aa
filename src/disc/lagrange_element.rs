use ndarray::{Array1, Array2, ArrayView1};
use tracing::debug;

use crate::disc::{
    basis::lagrange2d::LagrangeBasis2D,
    cubature::Cubature2D,
    frozen::Frozen,
    nodes::{NodeType, find_nodes_along_edges, reference_nodes},
};
use crate::error::Result;

/// Nodal scalar element of order n with its mass and differentiation matrices.
#[derive(Debug, Clone)]
pub struct LagrangeElement2D {
    pub n: usize,
    pub np: usize,
    pub node_type: NodeType,
    pub r: Array1<f64>,
    pub s: Array1<f64>,
    pub basis: LagrangeBasis2D,
    pub mass_matrix: Frozen<Array2<f64>>,
    pub dr: Frozen<Array2<f64>>,
    pub ds: Frozen<Array2<f64>>,
    pub cubature: Cubature2D,
    /// Node indices on edges 1, 2, 3 in traversal order; empty for interior node sets.
    pub edge_nodes: [Vec<usize>; 3],
}

impl LagrangeElement2D {
    pub fn new(n: usize, node_type: NodeType) -> Result<Self> {
        let (r, s) = reference_nodes(n, node_type)?;
        let basis = LagrangeBasis2D::new(n, r.view(), s.view())?;
        let v_inv = &*basis.jb2d.v_inv;
        let mass_matrix = v_inv.t().dot(v_inv);
        let (dr, ds) = basis.jb2d.get_derivative_matrices(r.view(), s.view())?;
        let cubature = Cubature2D::new(2 * n)?;
        let edge_nodes = find_nodes_along_edges(r.view(), s.view());
        debug!(n, np = basis.np, ?node_type, "built Lagrange element");
        Ok(Self {
            n,
            np: basis.np,
            node_type,
            r,
            s,
            basis,
            mass_matrix: Frozen::new("M", mass_matrix),
            dr: Frozen::new("Dr", dr),
            ds: Frozen::new("Ds", ds),
            cubature,
            edge_nodes,
        })
    }
    /// Number of nodes on one edge.
    pub fn nfp(&self) -> usize {
        self.edge_nodes[0].len()
    }
    /// Derivative operators from this element's nodal values to values at (R, S).
    pub fn get_derivative_matrices(&self, r: ArrayView1<f64>, s: ArrayView1<f64>) -> Result<(Array2<f64>, Array2<f64>)> {
        self.basis.get_grad_interp_matrices(r, s)
    }
    pub fn get_interp_matrix(&self, r: ArrayView1<f64>, s: ArrayView1<f64>) -> Result<Array2<f64>> {
        self.basis.get_interp_matrix(r, s)
    }
}
