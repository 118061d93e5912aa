use crate::disc::basis::{lagrange1d::LagrangeBasis1D, raviart_thomas::basis_vector::BasisVector, triangle::JacobiBasis2D};
use crate::disc::geometric::Edge;

/// Scalar polynomial spaces the RT multipliers are drawn from.
#[derive(Debug, Clone)]
pub struct TermSpace {
    /// Lagrange basis on the edge Gauss points, in the edge coordinate.
    pub edge: LagrangeBasis1D,
    /// Nodal basis of order P-1 on the interior points; absent for P = 0.
    pub interior: Option<JacobiBasis2D>,
}

/// Scalar multiplier of one RT term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolyMultiplier {
    /// 1D Lagrange polynomial j in the edge coordinate.
    Edge { edge: Edge, j: usize },
    /// Interior nodal polynomial j.
    Interior { j: usize },
}

/// Edge coordinate xi and its gradient in (r, s).
pub fn edge_coordinate(edge: Edge, r: f64, s: f64) -> (f64, [f64; 2]) {
    match edge {
        Edge::One => (r, [1.0, 0.0]),
        Edge::Two => (s, [0.0, 1.0]),
        Edge::Three => (-s, [0.0, -1.0]),
    }
}

impl PolyMultiplier {
    pub fn value_and_gradient(&self, space: &TermSpace, r: f64, s: f64) -> (f64, [f64; 2]) {
        match *self {
            PolyMultiplier::Edge { edge, j } => {
                let (xi, dxi) = edge_coordinate(edge, r, s);
                let value = space.edge.value(j, xi);
                let d = space.edge.derivative(j, xi);
                (value, [d * dxi[0], d * dxi[1]])
            }
            PolyMultiplier::Interior { j } => match &space.interior {
                Some(basis) => basis.orthogonal_value_and_gradient(r, s, j),
                None => (0.0, [0.0, 0.0]),
            },
        }
    }
}

/// One spanning function of the RT space: a scalar multiplier times a basis vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BasisPolynomialTerm {
    pub poly: PolyMultiplier,
    pub vector: BasisVector,
}

impl BasisPolynomialTerm {
    pub fn new(poly: PolyMultiplier, vector: BasisVector) -> Self {
        Self { poly, vector }
    }
    pub fn eval(&self, space: &TermSpace, r: f64, s: f64) -> [f64; 2] {
        let (p, _) = self.poly.value_and_gradient(space, r, s);
        self.vector.project(r, s, p)
    }
    pub fn dot(&self, space: &TermSpace, r: f64, s: f64, f: [f64; 2]) -> f64 {
        let v = self.eval(space, r, s);
        v[0] * f[0] + v[1] * f[1]
    }
    /// div(p v) = grad(p) . v + p div(v)
    pub fn divergence(&self, space: &TermSpace, r: f64, s: f64) -> f64 {
        let (p, grad_p) = self.poly.value_and_gradient(space, r, s);
        self.vector.dot(r, s, grad_p) + p * self.vector.divergence(r, s)
    }
    /// [[d(pv1)/dr, d(pv1)/ds], [d(pv2)/dr, d(pv2)/ds]]
    pub fn jacobian(&self, space: &TermSpace, r: f64, s: f64) -> [[f64; 2]; 2] {
        let (p, grad_p) = self.poly.value_and_gradient(space, r, s);
        let v = self.vector.eval(r, s);
        let jv = self.vector.jacobian(r, s);
        let mut j = [[0.0; 2]; 2];
        for a in 0..2 {
            for b in 0..2 {
                j[a][b] = grad_p[b] * v[a] + p * jv[a][b];
            }
        }
        j
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disc::nodes::epsilon_nodes;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn space() -> TermSpace {
        let (r, s) = epsilon_nodes(2).unwrap();
        TermSpace {
            edge: LagrangeBasis1D::new(array![-0.5, 0.0, 0.5].view()).unwrap(),
            interior: Some(JacobiBasis2D::new(2, r.view(), s.view()).unwrap()),
        }
    }

    #[test]
    fn test_divergence_matches_finite_difference() {
        let space = space();
        let eps = 1e-6;
        let terms = [
            BasisPolynomialTerm::new(PolyMultiplier::Interior { j: 4 }, BasisVector::E4),
            BasisPolynomialTerm::new(PolyMultiplier::Interior { j: 1 }, BasisVector::E5),
            BasisPolynomialTerm::new(PolyMultiplier::Edge { edge: Edge::One, j: 0 }, BasisVector::E1),
            BasisPolynomialTerm::new(PolyMultiplier::Edge { edge: Edge::Two, j: 2 }, BasisVector::E2),
            BasisPolynomialTerm::new(PolyMultiplier::Edge { edge: Edge::Three, j: 1 }, BasisVector::E3),
        ];
        for term in terms {
            for &(r, s) in &[(-0.6, -0.2), (0.1, -0.5), (-0.3, 0.2)] {
                let fd = (term.eval(&space, r + eps, s)[0] - term.eval(&space, r - eps, s)[0]) / (2.0 * eps)
                    + (term.eval(&space, r, s + eps)[1] - term.eval(&space, r, s - eps)[1]) / (2.0 * eps);
                assert_abs_diff_eq!(term.divergence(&space, r, s), fd, epsilon = 1e-6);
                let j = term.jacobian(&space, r, s);
                assert_abs_diff_eq!(j[0][0] + j[1][1], term.divergence(&space, r, s), epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_edge_multiplier_uses_edge_coordinate() {
        let space = space();
        let poly = PolyMultiplier::Edge { edge: Edge::Three, j: 2 };
        // xi = -s on edge 3, so s = -0.5 is node 2
        let (value, grad) = poly.value_and_gradient(&space, -1.0, -0.5);
        assert_abs_diff_eq!(value, 1.0);
        let d = space.edge.derivative(2, 0.5);
        assert_abs_diff_eq!(grad[1], -d, epsilon = 1e-14);
        assert_eq!(grad[0], 0.0);
    }
}
