//! Error types shared by every stage of a training run

/// Errors raised while configuring, training or persisting a ranker
#[derive(thiserror::Error, Debug)]
pub enum LtrError {
    /// Malformed or missing configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Feature vector length does not match the network input dimension
    #[error("Dimension mismatch: expected {expected} features, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Malformed line in a LETOR data file
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Failure while writing or reading a model or report
    #[error(transparent)]
    Persistence(#[from] std::io::Error),

    /// JSON (de)serialization failure
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LtrError>;
