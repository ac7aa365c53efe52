use crate::storage::StorageError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScoringError {
    #[error("end is incomplete: {recorded} of {required} arrows recorded")]
    IncompleteEnd { recorded: usize, required: usize },
    #[error("end {0} does not exist")]
    EndNotFound(usize),
    #[error("invalid round configuration: {0}")]
    InvalidConfig(String),
    #[error("{0}")]
    Validation(String),
    #[error("raster error: {0}")]
    Raster(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("{0}")]
    Other(String),
}

impl ScoringError {
    /// Precondition failures the archer can fix; everything else is a collaborator failure.
    #[must_use]
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::IncompleteEnd { .. }
                | Self::EndNotFound(_)
                | Self::InvalidConfig(_)
                | Self::Validation(_)
        )
    }
}

impl From<StorageError> for ScoringError {
    fn from(err: StorageError) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<image::ImageError> for ScoringError {
    fn from(err: image::ImageError) -> Self {
        Self::Raster(err.to_string())
    }
}

impl From<serde_json::Error> for ScoringError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

impl From<std::io::Error> for ScoringError {
    fn from(err: std::io::Error) -> Self {
        Self::Other(err.to_string())
    }
}

impl From<String> for ScoringError {
    fn from(err: String) -> Self {
        Self::Other(err)
    }
}

impl From<&str> for ScoringError {
    fn from(err: &str) -> Self {
        Self::Other(err.to_string())
    }
}
