use ndarray::{Array1, Array2, ArrayView1, s};
use tracing::debug;

use crate::disc::{
    basis::raviart_thomas::{RTBasisType, RTElement},
    frozen::Frozen,
    lagrange_element::LagrangeElement2D,
    nodes::NodeType,
};
use crate::error::{BasisError, Result};

/// Direct flux reconstruction pair: a Lagrange solution element of order n and
/// an RT flux element of order n + 1 sharing its interior nodes with the
/// solution points.
#[derive(Debug, Clone)]
pub struct DFR2D {
    pub n: usize,
    pub solution_element: LagrangeElement2D,
    pub flux_element: RTElement,
    /// Solution nodal values to values at the RT edge nodes.
    pub flux_edge_interp: Frozen<Array2<f64>>,
    /// Rows of the RT divergence operator at the solution points.
    pub divergence_operator: Frozen<Array2<f64>>,
}

impl DFR2D {
    pub fn new(n: usize, rt_basis_type: RTBasisType) -> Result<Self> {
        let solution_element = LagrangeElement2D::new(n, NodeType::Epsilon)?;
        let flux_element = RTElement::with_interior_nodes(
            n + 1,
            rt_basis_type,
            solution_element.r.view(),
            solution_element.s.view(),
        )?;
        let (r_edge, s_edge) = flux_element.edge_nodes();
        let flux_edge_interp = solution_element.get_interp_matrix(r_edge.view(), s_edge.view())?;
        let divergence_operator = flux_element.div.slice(s![0..solution_element.np, ..]).to_owned();
        debug!(
            n,
            solution_points = solution_element.np,
            flux_points = flux_element.np,
            "built DFR element pair"
        );
        Ok(Self {
            n,
            solution_element,
            flux_element,
            flux_edge_interp: Frozen::new("FluxEdgeInterp", flux_edge_interp),
            divergence_operator: Frozen::new("DivSolution", divergence_operator),
        })
    }
    pub fn np_solution(&self) -> usize {
        self.solution_element.np
    }
    pub fn np_flux_edge(&self) -> usize {
        3 * self.flux_element.np_edge
    }
    fn check_flux(&self, fx: ArrayView1<f64>, fy: ArrayView1<f64>) -> Result<()> {
        let np = self.np_solution();
        if fx.len() != np {
            return Err(BasisError::length_mismatch("DFR2D flux fx", np, fx.len()));
        }
        if fy.len() != np {
            return Err(BasisError::length_mismatch("DFR2D flux fy", np, fy.len()));
        }
        Ok(())
    }
    /// Normal flux at the RT edge nodes, interpolated from the solution points.
    pub fn edge_normal_flux(&self, fx: ArrayView1<f64>, fy: ArrayView1<f64>) -> Result<Array1<f64>> {
        self.check_flux(fx, fy)?;
        let fx_edge = self.flux_edge_interp.dot(&fx);
        let fy_edge = self.flux_edge_interp.dot(&fy);
        let offset = 2 * self.flux_element.np_int;
        Ok(Array1::from_iter((0..self.np_flux_edge()).map(|i| {
            let k = offset + i;
            self.flux_element.directions[k].dot(
                self.flux_element.r[k],
                self.flux_element.s[k],
                [fx_edge[i], fy_edge[i]],
            )
        })))
    }
    /// RT DOFs from the flux at the solution points and a normal flux per edge node.
    pub fn assemble_flux_dof(
        &self,
        fx: ArrayView1<f64>,
        fy: ArrayView1<f64>,
        edge_normal_flux: ArrayView1<f64>,
    ) -> Result<Array1<f64>> {
        self.check_flux(fx, fy)?;
        if edge_normal_flux.len() != self.np_flux_edge() {
            return Err(BasisError::length_mismatch(
                "DFR2D edge normal flux",
                self.np_flux_edge(),
                edge_normal_flux.len(),
            ));
        }
        let rt = &self.flux_element;
        let np = self.np_solution();
        let mut dof = Array1::<f64>::zeros(rt.np);
        for k in rt.interior_range() {
            let j = k % np;
            dof[k] = rt.directions[k].dot(rt.r[k], rt.s[k], [fx[j], fy[j]]);
        }
        dof.slice_mut(s![2 * rt.np_int..]).assign(&edge_normal_flux);
        Ok(dof)
    }
    /// Flux divergence at the solution points using the element's own edge flux.
    pub fn divergence(&self, fx: ArrayView1<f64>, fy: ArrayView1<f64>) -> Result<Array1<f64>> {
        let edge_flux = self.edge_normal_flux(fx, fy)?;
        self.divergence_with_edge_flux(fx, fy, edge_flux.view())
    }
    /// Flux divergence at the solution points with a caller-supplied normal flux
    /// on the edges, such as a Riemann flux shared with the neighbours.
    pub fn divergence_with_edge_flux(
        &self,
        fx: ArrayView1<f64>,
        fy: ArrayView1<f64>,
        edge_normal_flux: ArrayView1<f64>,
    ) -> Result<Array1<f64>> {
        let dof = self.assemble_flux_dof(fx, fy, edge_normal_flux)?;
        Ok(self.divergence_operator.dot(&dof))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn flux(dfr: &DFR2D, f: impl Fn(f64, f64) -> [f64; 2]) -> (Array1<f64>, Array1<f64>) {
        let e = &dfr.solution_element;
        let values: Vec<[f64; 2]> = e.r.iter().zip(e.s.iter()).map(|(&r, &s)| f(r, s)).collect();
        (
            values.iter().map(|v| v[0]).collect(),
            values.iter().map(|v| v[1]).collect(),
        )
    }

    #[test]
    fn test_interior_nodes_are_solution_points() {
        let dfr = DFR2D::new(2, RTBasisType::RomeroJameson).unwrap();
        let np = dfr.np_solution();
        assert_eq!(dfr.flux_element.np_int, np);
        for j in 0..np {
            assert_eq!(dfr.flux_element.r[j], dfr.solution_element.r[j]);
            assert_eq!(dfr.flux_element.s[np + j], dfr.solution_element.s[j]);
        }
        assert_eq!(dfr.flux_edge_interp.shape(), &[3 * (dfr.n + 2), np]);
    }

    #[test]
    fn test_divergence_exact_for_solution_degree_flux() {
        for basis_type in [RTBasisType::RomeroJameson, RTBasisType::Ervin] {
            for n in 0..=4 {
                let dfr = DFR2D::new(n, basis_type).unwrap();
                let k = n as i32;
                let (fx, fy) = flux(&dfr, |r, s| [r.powi(k) + s.powi(k), s.powi(k) - r.powi(k)]);
                let div = dfr.divergence(fx.view(), fy.view()).unwrap();
                let e = &dfr.solution_element;
                for i in 0..e.np {
                    let kf = k as f64;
                    let exact = if k == 0 { 0.0 } else { kf * e.r[i].powi(k - 1) + kf * e.s[i].powi(k - 1) };
                    assert_abs_diff_eq!(div[i], exact, epsilon = 1e-8);
                }
            }
        }
    }

    #[test]
    fn test_divergence_with_exact_edge_flux() {
        // a flux one degree above the solution is recovered when the edge flux is exact
        let dfr = DFR2D::new(2, RTBasisType::Ervin).unwrap();
        let field = |r: f64, s: f64| [r.powi(3), r * s * s];
        let (fx, fy) = flux(&dfr, field);
        let rt = &dfr.flux_element;
        let edge_flux = Array1::from_iter((2 * rt.np_int..rt.np).map(|k| {
            rt.directions[k].dot(rt.r[k], rt.s[k], field(rt.r[k], rt.s[k]))
        }));
        let div = dfr
            .divergence_with_edge_flux(fx.view(), fy.view(), edge_flux.view())
            .unwrap();
        let e = &dfr.solution_element;
        for i in 0..e.np {
            let exact = 3.0 * e.r[i].powi(2) + 2.0 * e.r[i] * e.s[i];
            assert_abs_diff_eq!(div[i], exact, epsilon = 1e-8);
        }
    }

    #[test]
    fn test_rejects_wrong_lengths() {
        let dfr = DFR2D::new(1, RTBasisType::RomeroJameson).unwrap();
        let f = Array1::zeros(dfr.np_solution());
        let short = Array1::zeros(dfr.np_solution() - 1);
        assert!(matches!(
            dfr.divergence(short.view(), f.view()),
            Err(BasisError::LengthMismatch { .. })
        ));
        let edge = Array1::zeros(dfr.np_flux_edge() + 1);
        assert!(dfr.divergence_with_edge_flux(f.view(), f.view(), edge.view()).is_err());
    }
}
