use thiserror::Error;

/// Errors surfaced by the public stitching entry points.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StitchError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}
