use tracing::info;

use crate::{
    disc::{cubature::Cubature2D, dfr::DFR2D, lagrange_element::LagrangeElement2D},
    error::Result,
    io::param_parser::ReferenceElementParams,
};

pub fn initialize_params_by_file(file_path: &str) -> Result<ReferenceElementParams> {
    let params = ReferenceElementParams::parse(file_path)?;
    info!(
        polynomial_order = params.polynomial_order,
        node_type = ?params.node_type,
        rt_basis_type = ?params.rt_basis_type,
        "read reference element parameters from {file_path}"
    );
    Ok(params)
}
pub fn initialize_dfr(params: &ReferenceElementParams) -> Result<DFR2D> {
    DFR2D::new(params.polynomial_order, params.rt_basis_type)
}
pub fn initialize_lagrange_element(params: &ReferenceElementParams) -> Result<LagrangeElement2D> {
    LagrangeElement2D::new(params.polynomial_order, params.node_type)
}
pub fn initialize_cubature(params: &ReferenceElementParams) -> Result<Cubature2D> {
    Cubature2D::new(params.cubature_order.unwrap_or(2 * params.polynomial_order))
}
