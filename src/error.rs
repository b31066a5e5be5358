use anyhow::Error as AnyhowError;
use thiserror::Error;

/// Result alias for errors emitted by the conversion pipeline.
pub type VizResult<T> = Result<T, Ast2DotError>;

/// Structured error type for ast2dot subsystems.
#[derive(Debug, Error)]
pub enum Ast2DotError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unknown filter: {0}")]
    UnknownFilter(String),
}

impl Ast2DotError {
    /// Convert to anyhow::Error for interop with anyhow-based code.
    pub fn into_anyhow(self) -> AnyhowError {
        AnyhowError::new(self)
    }
}
