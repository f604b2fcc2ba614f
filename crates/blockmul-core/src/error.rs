//! Error type shared by every stage of a block multiplication.

/// Error type for block multiplication.
#[derive(Debug, Clone, thiserror::Error)]
pub enum BlockError {
    /// Operands violate the top-level preconditions.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// A sub-matrix had an unexpected shape.
    #[error("shape mismatch: {0}")]
    Shape(String),

    /// A decomposition or recombination combinator failed.
    #[error("policy error: {0}")]
    Policy(String),

    /// A worker pool or sampling thread could not be started.
    #[error("worker pool error: {0}")]
    Pool(String),

    /// The call was skipped because a sibling call already failed.
    #[error("call aborted after a sibling failure")]
    Aborted,

    /// Products computed by different multipliers don't match.
    #[error("result mismatch between multipliers")]
    Mismatch,
}

impl From<ndarray::ShapeError> for BlockError {
    fn from(err: ndarray::ShapeError) -> Self {
        Self::Shape(err.to_string())
    }
}
