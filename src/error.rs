use thiserror::Error;

pub type Result<T> = std::result::Result<T, BasisError>;

/// Failures raised while building or applying reference-element operators.
#[derive(Error, Debug)]
pub enum BasisError {
    #[error("invalid polynomial order {order}: {reason}")]
    InvalidOrder { order: i64, reason: &'static str },

    #[error("length mismatch in {context}: expected {expected}, got {actual}")]
    LengthMismatch {
        context: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("empty node set")]
    EmptyNodeSet,

    #[error("nodes {first} and {second} coincide")]
    DuplicateNodes { first: usize, second: usize },

    /// Inversion of a singular or numerically degenerate matrix.
    #[error("matrix {label} is singular")]
    Singular { label: &'static str },

    #[error("invalid edge number {0}, edges are numbered 1..=3")]
    InvalidEdge(usize),

    #[error("basis index {index} out of range for a basis of size {len}")]
    InvalidBasisIndex { index: usize, len: usize },

    #[error("vertex index {index} out of range for {len} vertices")]
    InvalidVertex { index: usize, len: usize },

    #[error("eigenvalue decomposition failed for {label}")]
    Eigen { label: &'static str },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl BasisError {
    pub fn length_mismatch(context: &'static str, expected: usize, actual: usize) -> Self {
        Self::LengthMismatch {
            context,
            expected,
            actual,
        }
    }
}
