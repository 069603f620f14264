//! Error types for the sheet controller
//!
//! Every operation of [`Sheet`](crate::Sheet) fails with a [`SheetError`];
//! the host turns it into a [`Notice`] with [`SheetError::notice`] and never
//! lets it abort the process.

use crate::notice::{Notice, NoticeLevel};
use sigsheet_roster::{NameListError, RosterError};
use sigsheet_upload::{UploadError, ValidationError};
use std::path::PathBuf;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config document is malformed
    #[error("invalid config document: {0}")]
    Parse(#[from] toml::de::Error),

    /// Name list violates its invariants
    #[error("invalid name list: {0}")]
    Names(#[from] NameListError),

    /// UTC offset out of range
    #[error("utc offset of {0} hours is out of range")]
    InvalidOffset(i32),

    /// Other invalid setting
    #[error("invalid setting: {0}")]
    Invalid(String),
}

impl ConfigError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Export adapter failures
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Adapter could not render the grid
    #[error("render failed: {0}")]
    Render(String),

    /// Artifact could not be written
    #[error("io error writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Main sheet error type
#[derive(Debug, thiserror::Error)]
pub enum SheetError {
    /// Display name matches no roster entry
    #[error("no roster entry for '{display_name}'")]
    NoMatch { display_name: String },

    /// Participant's slot already has a signature
    #[error("signature already uploaded for {name}")]
    AlreadySigned { name: String },

    /// Another upload for the same slot is still open
    #[error("upload already in progress for {name}")]
    UploadInProgress { name: String },

    /// Export requested with no signatures
    #[error("nothing to export as {format}")]
    NothingToExport { format: String },

    /// Upload rejected
    #[error("upload failed: {0}")]
    Upload(#[from] UploadError),

    /// Roster store failure
    #[error("roster error: {0}")]
    Roster(#[from] RosterError),

    /// Export adapter failure
    #[error("{format} export failed: {source}")]
    Export {
        format: String,
        #[source]
        source: ExportError,
    },

    /// Configuration rejected
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl SheetError {
    /// Expected outcome of user input rather than a fault
    ///
    /// Business conditions are shown to the user but not logged as errors.
    #[must_use]
    pub fn is_business_rule(&self) -> bool {
        matches!(
            self,
            Self::NoMatch { .. }
                | Self::AlreadySigned { .. }
                | Self::UploadInProgress { .. }
                | Self::NothingToExport { .. }
                | Self::Upload(UploadError::Validation(_))
        ) || matches!(self, Self::Roster(e) | Self::Upload(UploadError::Roster(e)) if e.is_business_rule())
    }

    /// Persisted state was unreadable and the roster was reset in memory
    #[must_use]
    pub fn is_recovered(&self) -> bool {
        matches!(self, Self::Roster(RosterError::CorruptState { .. }))
    }

    /// Whether the host should log this at error level
    #[must_use]
    pub fn is_fault(&self) -> bool {
        !self.is_business_rule() && !self.is_recovered()
    }

    /// Message for the user
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::NoMatch { .. } => "Your name is not in the signature list.".to_string(),
            Self::AlreadySigned { name } => {
                format!("A signature has already been uploaded for {name}.")
            }
            Self::UploadInProgress { name } => {
                format!("An upload for {name} is already in progress.")
            }
            Self::NothingToExport { format } => {
                format!("No data in the table to export as {format}.")
            }
            Self::Upload(UploadError::Validation(ValidationError::TooLarge { .. })) => {
                "File size exceeds 2MB.".to_string()
            }
            Self::Upload(UploadError::Validation(ValidationError::NotAnImage { .. })) => {
                "Please upload an image file.".to_string()
            }
            Self::Upload(UploadError::Decode { .. }) => {
                "The selected file could not be read.".to_string()
            }
            Self::Upload(UploadError::IllegalTransition { .. }) => {
                "This upload is no longer active. Please sign in again.".to_string()
            }
            Self::Roster(e) | Self::Upload(UploadError::Roster(e)) => roster_message(e),
            Self::Export { format, .. } => {
                format!("Failed to generate {format}. Please try again.")
            }
            Self::Config(e) => format!("The sheet is misconfigured: {e}"),
        }
    }

    /// Notice level for the user
    #[must_use]
    pub fn level(&self) -> NoticeLevel {
        if self.is_fault() {
            NoticeLevel::Error
        } else {
            NoticeLevel::Warning
        }
    }

    /// User-facing notice for this error
    #[must_use]
    pub fn notice(&self) -> Notice {
        Notice::new(self.level(), self.user_message())
    }
}

fn roster_message(err: &RosterError) -> String {
    match err {
        RosterError::CorruptState { .. } => {
            "Saved signatures could not be read; the sheet has been reset.".to_string()
        }
        RosterError::AlreadySigned { index } => {
            format!("A signature has already been uploaded for row {}.", index.get() + 1)
        }
        RosterError::SlotOutOfRange { .. } => "That signature row does not exist.".to_string(),
        RosterError::EmptyImage => "The selected image is empty.".to_string(),
        RosterError::Encode(_) | RosterError::Storage(_) => {
            "The sheet could not be saved. Please try again.".to_string()
        }
    }
}
