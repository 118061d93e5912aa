use crate::disc::geometric::{Edge, Geometric2D, ReferenceTriangle};

/// Vector fields that carry the Raviart-Thomas terms and the DOF directions.
///
/// `E1`..`E3` are the lowest-order RT edge fields, each with unit normal trace
/// on its own edge and zero normal trace on the other two. `E4` and `E5` vanish
/// in normal trace on every edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BasisVector {
    E1,
    E2,
    E3,
    E4,
    E5,
    UnitR,
    UnitS,
    Normal(Edge),
    Constant([f64; 2]),
}

impl BasisVector {
    pub fn eval(&self, r: f64, s: f64) -> [f64; 2] {
        let sqrt2 = 2.0_f64.sqrt();
        match self {
            BasisVector::E1 => [0.5 * (r + 1.0), 0.5 * (s - 1.0)],
            BasisVector::E2 => [0.5 * sqrt2 * (r + 1.0), 0.5 * sqrt2 * (s + 1.0)],
            BasisVector::E3 => [0.5 * (r - 1.0), 0.5 * (s + 1.0)],
            BasisVector::E4 => {
                let f = 0.25 * (s + 1.0);
                [f * (r + 1.0), f * (s - 1.0)]
            }
            BasisVector::E5 => {
                let f = 0.25 * (r + 1.0);
                [f * (r - 1.0), f * (s + 1.0)]
            }
            BasisVector::UnitR => [1.0, 0.0],
            BasisVector::UnitS => [0.0, 1.0],
            BasisVector::Normal(edge) => ReferenceTriangle::compute_ref_normal(*edge),
            BasisVector::Constant(v) => *v,
        }
    }
    pub fn dot(&self, r: f64, s: f64, f: [f64; 2]) -> f64 {
        let v = self.eval(r, s);
        v[0] * f[0] + v[1] * f[1]
    }
    pub fn project(&self, r: f64, s: f64, scale: f64) -> [f64; 2] {
        let v = self.eval(r, s);
        [scale * v[0], scale * v[1]]
    }
    /// [[dv1/dr, dv1/ds], [dv2/dr, dv2/ds]]
    pub fn jacobian(&self, r: f64, s: f64) -> [[f64; 2]; 2] {
        let half_sqrt2 = 0.5 * 2.0_f64.sqrt();
        match self {
            BasisVector::E1 | BasisVector::E3 => [[0.5, 0.0], [0.0, 0.5]],
            BasisVector::E2 => [[half_sqrt2, 0.0], [0.0, half_sqrt2]],
            BasisVector::E4 => [[0.25 * (s + 1.0), 0.25 * (r + 1.0)], [0.0, 0.5 * s]],
            BasisVector::E5 => [[0.5 * r, 0.0], [0.25 * (s + 1.0), 0.25 * (r + 1.0)]],
            BasisVector::UnitR | BasisVector::UnitS | BasisVector::Normal(_) | BasisVector::Constant(_) => {
                [[0.0, 0.0], [0.0, 0.0]]
            }
        }
    }
    pub fn divergence(&self, r: f64, s: f64) -> f64 {
        let j = self.jacobian(r, s);
        j[0][0] + j[1][1]
    }
    /// Unit vector along the field at (r, s).
    pub fn normalized_at(&self, r: f64, s: f64) -> BasisVector {
        let v = self.eval(r, s);
        let norm = v[0].hypot(v[1]);
        BasisVector::Constant([v[0] / norm, v[1] / norm])
    }
}
