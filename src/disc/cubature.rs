use ndarray::{Array1, ArrayView1, array};
use once_cell::sync::OnceCell;
use tracing::warn;

use crate::disc::basis::Basis;
use crate::error::{BasisError, Result};

pub const MAX_CUBATURE_ORDER: usize = 28;

static CUBATURE_CACHE: [OnceCell<Cubature2D>; MAX_CUBATURE_ORDER + 1] =
    [const { OnceCell::new() }; MAX_CUBATURE_ORDER + 1];

/// Quadrature rule on the reference triangle, exact for polynomials up to `order`.
/// Weights sum to 2, the area of the triangle.
#[derive(Debug, Clone)]
pub struct Cubature2D {
    pub order: usize,
    pub r: Array1<f64>,
    pub s: Array1<f64>,
    pub w: Array1<f64>,
}

impl Basis for Cubature2D {}

impl Cubature2D {
    /// Looks up the rule for `order`. Orders above 28 are clipped to 28.
    pub fn new(order: usize) -> Result<Self> {
        let order = if order > MAX_CUBATURE_ORDER {
            warn!(requested = order, used = MAX_CUBATURE_ORDER, "cubature order clipped");
            MAX_CUBATURE_ORDER
        } else {
            order
        };
        CUBATURE_CACHE[order]
            .get_or_try_init(|| Self::build(order))
            .cloned()
    }
    pub fn len(&self) -> usize {
        self.w.len()
    }
    pub fn is_empty(&self) -> bool {
        self.w.is_empty()
    }
    /// Integral over the reference triangle of a function sampled at the cubature points.
    pub fn integrate(&self, f: ArrayView1<f64>) -> Result<f64> {
        if f.len() != self.len() {
            return Err(BasisError::length_mismatch("Cubature2D::integrate", self.len(), f.len()));
        }
        Ok(self.w.dot(&f))
    }
    fn build(order: usize) -> Result<Self> {
        let (r, s, w) = match order {
            0 | 1 => (array![-1.0 / 3.0], array![-1.0 / 3.0], array![2.0]),
            2..=7 => {
                let (r, s, w) = dunavant(order)?;
                (2.0 * &r - 1.0, 2.0 * &s - 1.0, &w * 2.0)
            }
            _ => Self::collapsed_rule(order)?,
        };
        Ok(Self { order, r, s, w })
    }
    /// Gauss-Jacobi product rule on the collapsed square (a, b), mapped back
    /// through r = (1+a)(1-b)/2 - 1, s = b.
    fn collapsed_rule(order: usize) -> Result<(Array1<f64>, Array1<f64>, Array1<f64>)> {
        let n = (order + 2) / 2;
        let (a, wa) = Self::jacobi_gauss_quadrature(0.0, 0.0, n - 1)?;
        let (b, wb) = Self::jacobi_gauss_quadrature(1.0, 0.0, n - 1)?;
        let mut r = Array1::zeros(n * n);
        let mut s = Array1::zeros(n * n);
        let mut w = Array1::zeros(n * n);
        for j in 0..n {
            for i in 0..n {
                let k = j * n + i;
                r[k] = 0.5 * (1.0 + a[i]) * (1.0 - b[j]) - 1.0;
                s[k] = b[j];
                w[k] = 0.5 * wa[i] * wb[j];
            }
        }
        Ok((r, s, w))
    }
}

/// Dunavant rules on the unit triangle with weights summing to one.
fn dunavant(order: usize) -> Result<(Array1<f64>, Array1<f64>, Array1<f64>)> {
    let rule = match order {
        2 => (
            array![0.16666666666667, 0.16666666666667, 0.66666666666667],
            array![0.16666666666667, 0.66666666666667, 0.16666666666667],
            array![0.33333333333333, 0.33333333333333, 0.33333333333333],
        ),
        3 => (
            array![0.33333333333333, 0.20000000000000, 0.20000000000000, 0.60000000000000],
            array![0.33333333333333, 0.20000000000000, 0.60000000000000, 0.20000000000000],
            array![-0.56250000000000, 0.52083333333333, 0.52083333333333, 0.52083333333333],
        ),
        4 => (
            array![
                0.44594849091597, 0.44594849091597, 0.10810301816807, 0.09157621350977,
                0.09157621350977, 0.81684757298046
            ],
            array![
                0.44594849091597, 0.10810301816807, 0.44594849091597, 0.09157621350977,
                0.81684757298046, 0.09157621350977
            ],
            array![
                0.22338158967801, 0.22338158967801, 0.22338158967801, 0.10995174365532,
                0.10995174365532, 0.10995174365532
            ],
        ),
        5 => (
            array![
                0.33333333333333, 0.47014206410511, 0.47014206410511, 0.05971587178977,
                0.10128650732346, 0.10128650732346, 0.79742698535309
            ],
            array![
                0.33333333333333, 0.47014206410511, 0.05971587178977, 0.47014206410511,
                0.10128650732346, 0.79742698535309, 0.10128650732346
            ],
            array![
                0.22500000000000, 0.13239415278851, 0.13239415278851, 0.13239415278851,
                0.12593918054483, 0.12593918054483, 0.12593918054483
            ],
        ),
        6 => (
            array![
                0.24928674517091, 0.24928674517091, 0.50142650965818, 0.06308901449150,
                0.06308901449150, 0.87382197101700, 0.31035245103378, 0.63650249912140,
                0.05314504984482, 0.63650249912140, 0.31035245103378, 0.05314504984482
            ],
            array![
                0.24928674517091, 0.50142650965818, 0.24928674517091, 0.06308901449150,
                0.87382197101700, 0.06308901449150, 0.63650249912140, 0.05314504984482,
                0.31035245103378, 0.31035245103378, 0.05314504984482, 0.63650249912140
            ],
            array![
                0.11678627572638, 0.11678627572638, 0.11678627572638, 0.05084490637021,
                0.05084490637021, 0.05084490637021, 0.08285107561837, 0.08285107561837,
                0.08285107561837, 0.08285107561837, 0.08285107561837, 0.08285107561837
            ],
        ),
        7 => (
            array![
                0.33333333333333, 0.26034596607904, 0.26034596607904, 0.47930806784192,
                0.06513010290222, 0.06513010290222, 0.86973979419557, 0.31286549600487,
                0.63844418856981, 0.04869031542532, 0.63844418856981, 0.31286549600487,
                0.04869031542532
            ],
            array![
                0.33333333333333, 0.26034596607904, 0.47930806784192, 0.26034596607904,
                0.06513010290222, 0.86973979419557, 0.06513010290222, 0.63844418856981,
                0.04869031542532, 0.31286549600487, 0.31286549600487, 0.04869031542532,
                0.63844418856981
            ],
            array![
                -0.14957004446768, 0.17561525743321, 0.17561525743321, 0.17561525743321,
                0.05334723560884, 0.05334723560884, 0.05334723560884, 0.07711376089026,
                0.07711376089026, 0.07711376089026, 0.07711376089026, 0.07711376089026,
                0.07711376089026
            ],
        ),
        _ => {
            return Err(BasisError::InvalidOrder {
                order: order as i64,
                reason: "Dunavant tables cover orders 2..=7",
            });
        }
    };
    Ok(rule)
}
