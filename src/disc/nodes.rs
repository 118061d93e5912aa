use ndarray::{Array1, ArrayView1};
use serde::Deserialize;

use crate::disc::basis::{Basis2D, triangle::JacobiBasis2D};
use crate::error::{BasisError, Result};

const DUPLICATE_NODE_TOL: f64 = 1.0e-8;

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeType {
    /// Warp-and-blend nodes, including the triangle edges.
    Hesthaven,
    /// Strictly interior nodes.
    #[default]
    Epsilon,
}

/// Warp-and-blend nodes of order n in (r, s).
pub fn hesthaven_nodes(n: usize) -> Result<(Array1<f64>, Array1<f64>)> {
    let (x, y) = JacobiBasis2D::nodes2d(n)?;
    Ok(JacobiBasis2D::xy_to_rs(x.view(), y.view()))
}

/// Warp-and-blend nodes pulled towards the centroid by 1 - 1/(n+2), so that no
/// node sits on an edge. The map is affine and keeps the set unisolvent.
pub fn epsilon_nodes(n: usize) -> Result<(Array1<f64>, Array1<f64>)> {
    let (r, s) = hesthaven_nodes(n)?;
    let contraction = 1.0 - 1.0 / (n as f64 + 2.0);
    let centroid = -1.0 / 3.0;
    let r = r.mapv(|v| centroid + contraction * (v - centroid));
    let s = s.mapv(|v| centroid + contraction * (v - centroid));
    Ok((r, s))
}

pub fn reference_nodes(n: usize, node_type: NodeType) -> Result<(Array1<f64>, Array1<f64>)> {
    match node_type {
        NodeType::Hesthaven => hesthaven_nodes(n),
        NodeType::Epsilon => epsilon_nodes(n),
    }
}

pub fn check_distinct(r: ArrayView1<f64>, s: ArrayView1<f64>) -> Result<()> {
    for i in 0..r.len() {
        for j in i + 1..r.len() {
            if (r[i] - r[j]).hypot(s[i] - s[j]) < DUPLICATE_NODE_TOL {
                return Err(BasisError::DuplicateNodes { first: i, second: j });
            }
        }
    }
    Ok(())
}

/// Node indices lying on each edge, in the edge traversal order
/// (edge 1 left to right, edge 2 right to left, edge 3 top to bottom).
pub fn find_nodes_along_edges(r: ArrayView1<f64>, s: ArrayView1<f64>) -> [Vec<usize>; 3] {
    let node_tol = 1.0e-10;
    let mut edge1: Vec<usize> = (0..r.len()).filter(|&i| (s[i] + 1.0).abs() < node_tol).collect();
    let mut edge2: Vec<usize> = (0..r.len()).filter(|&i| (r[i] + s[i]).abs() < node_tol).collect();
    let mut edge3: Vec<usize> = (0..r.len()).filter(|&i| (r[i] + 1.0).abs() < node_tol).collect();
    edge1.sort_by(|&a, &b| r[a].total_cmp(&r[b]));
    edge2.sort_by(|&a, &b| r[b].total_cmp(&r[a]));
    edge3.sort_by(|&a, &b| s[b].total_cmp(&s[a]));
    [edge1, edge2, edge3]
}
