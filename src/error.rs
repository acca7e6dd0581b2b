//! Error types for the training engine
//!
//! Every fallible operation in the crate returns [`Result`]. Shape problems are
//! treated as caller errors: they are reported, never repaired.

use thiserror::Error;

/// Result type alias for this crate
pub type Result<T> = std::result::Result<T, NetError>;

/// Errors raised by layers, the network, optimizers and configuration loading.
#[derive(Error, Debug)]
pub enum NetError {
    /// Depth and layer widths do not describe a usable network
    #[error("invalid topology: {0}")]
    InvalidTopology(String),

    /// Operand dimensions are incompatible for the requested operation
    #[error("shape mismatch in {op}: {left:?} vs {right:?}")]
    ShapeMismatch {
        op: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    },

    /// A batch with zero rows reached an operation that averages over rows
    #[error("{op} requires at least one row in the batch")]
    EmptyBatch { op: &'static str },

    /// A backward context produced by one layer variant was handed to another
    #[error("backward context was not produced by a {layer} forward pass")]
    ContextMismatch { layer: &'static str },

    /// Configuration values failed validation
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl NetError {
    /// Shorthand for a [`NetError::ShapeMismatch`].
    pub fn shape_mismatch(op: &'static str, left: (usize, usize), right: (usize, usize)) -> Self {
        NetError::ShapeMismatch { op, left, right }
    }
}
