use std::fs;

use serde::Deserialize;

use crate::disc::{basis::raviart_thomas::RTBasisType, nodes::NodeType};
use crate::error::Result;

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ReferenceElementParams {
    pub polynomial_order: usize,
    #[serde(default)]
    pub node_type: NodeType,
    #[serde(default)]
    pub rt_basis_type: RTBasisType,
    /// Defaults to twice the polynomial order.
    #[serde(default)]
    pub cubature_order: Option<usize>,
    #[serde(default)]
    pub output_file: Option<String>,
}

impl ReferenceElementParams {
    pub fn parse(file_path: &str) -> Result<Self> {
        let file_content = fs::read_to_string(file_path)?;
        Self::from_json(&file_content)
    }
    pub fn from_json(content: &str) -> Result<Self> {
        let params: ReferenceElementParams = serde_json::from_str(content)?;
        Ok(params)
    }
}
