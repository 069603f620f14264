//! Error types for upload acceptance

use crate::phase::UploadPhase;
use sigsheet_roster::RosterError;
use std::path::PathBuf;

/// Rejection of the selected file itself
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// File exceeds the size cap
    #[error("file is {size} bytes, limit is {limit}")]
    TooLarge { size: u64, limit: u64 },

    /// Declared content type is not an image
    #[error("content type '{content_type}' is not an image")]
    NotAnImage { content_type: String },
}

/// Errors during an upload
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// Selected file rejected
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// File could not be read
    #[error("failed to read {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Operation not allowed in the current phase
    #[error("illegal upload transition: {from:?} -> {to:?}")]
    IllegalTransition { from: UploadPhase, to: UploadPhase },

    /// Roster refused the signature
    #[error("roster error: {0}")]
    Roster(#[from] RosterError),
}

impl UploadError {
    /// Create decode error for path
    pub fn decode_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Decode {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_display() {
        let err = ValidationError::TooLarge {
            size: 3_000_000,
            limit: 2_097_152,
        };
        assert_eq!(err.to_string(), "file is 3000000 bytes, limit is 2097152");
    }

    #[test]
    fn conversions() {
        let err: UploadError = ValidationError::NotAnImage {
            content_type: "text/plain".to_string(),
        }
        .into();
        assert!(matches!(err, UploadError::Validation(_)));

        let err: UploadError = RosterError::EmptyImage.into();
        assert!(matches!(err, UploadError::Roster(RosterError::EmptyImage)));
    }
}
