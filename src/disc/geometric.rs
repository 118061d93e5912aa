use ndarray::{Array2, ArrayView1, ArrayView2};

use crate::error::{BasisError, Result};

/// Edges of the reference triangle, numbered counterclockwise from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    /// s = -1, traversed left to right.
    One,
    /// r + s = 0, traversed right to left.
    Two,
    /// r = -1, traversed top to bottom.
    Three,
}

impl Edge {
    pub const ALL: [Edge; 3] = [Edge::One, Edge::Two, Edge::Three];

    pub fn number(self) -> usize {
        match self {
            Edge::One => 1,
            Edge::Two => 2,
            Edge::Three => 3,
        }
    }
}

impl TryFrom<usize> for Edge {
    type Error = BasisError;
    fn try_from(number: usize) -> Result<Self> {
        match number {
            1 => Ok(Edge::One),
            2 => Ok(Edge::Two),
            3 => Ok(Edge::Three),
            _ => Err(BasisError::InvalidEdge(number)),
        }
    }
}

pub trait Geometric2D {
    /// Outward unit normal of an edge of the reference triangle.
    fn compute_ref_normal(edge: Edge) -> [f64; 2] {
        match edge {
            Edge::One => [0.0, -1.0],
            Edge::Two => {
                let sqrt2_inv = 1.0 / 2.0_f64.sqrt();
                [sqrt2_inv, sqrt2_inv]
            }
            Edge::Three => [-1.0, 0.0],
        }
    }
}

pub struct ReferenceTriangle;

impl Geometric2D for ReferenceTriangle {}

/// Maps reference points (r, s) into every element of a mesh. `etov` holds the
/// three vertex indices of each element; the result has one column per element.
pub fn calculate_element_local_geometry(
    etov: ArrayView2<usize>,
    vx: ArrayView1<f64>,
    vy: ArrayView1<f64>,
    r: ArrayView1<f64>,
    s: ArrayView1<f64>,
) -> Result<(Array2<f64>, Array2<f64>)> {
    if r.len() != s.len() {
        return Err(BasisError::length_mismatch("element geometry r/s", r.len(), s.len()));
    }
    if vx.len() != vy.len() {
        return Err(BasisError::length_mismatch("element geometry vx/vy", vx.len(), vy.len()));
    }
    if etov.ncols() != 3 {
        return Err(BasisError::length_mismatch("element geometry EToV columns", 3, etov.ncols()));
    }
    if let Some(&bad) = etov.iter().find(|&&v| v >= vx.len()) {
        return Err(BasisError::InvalidVertex {
            index: bad,
            len: vx.len(),
        });
    }
    let k = etov.nrows();
    let mut x = Array2::<f64>::zeros((r.len(), k));
    let mut y = Array2::<f64>::zeros((r.len(), k));
    for (ielem, verts) in etov.rows().into_iter().enumerate() {
        let (a, b, c) = (verts[0], verts[1], verts[2]);
        for i in 0..r.len() {
            let (wa, wb, wc) = (-(r[i] + s[i]), r[i] + 1.0, s[i] + 1.0);
            x[[i, ielem]] = 0.5 * (wa * vx[a] + wb * vx[b] + wc * vx[c]);
            y[[i, ielem]] = 0.5 * (wa * vy[a] + wb * vy[b] + wc * vy[c]);
        }
    }
    Ok((x, y))
}
