//! Sigsheet Upload
//!
//! Acceptance of one signature upload for one roster slot.
//!
//! # Phases
//!
//! ```text
//! Idle → AwaitingFileSelection → Validating → Committing → Idle
//!   ↑__________________↓_____________↓  (rejection, with reason)
//! ```
//!
//! - **Begin**: slot resolved and still unsigned
//! - **Select**: size cap and image content type checked
//! - **Decode**: file read into a `data:` URL (the only await point)
//! - **Commit**: slot re-checked against the current roster, then signed
//!
//! # Example
//!
//! ```rust,ignore
//! use sigsheet_upload::{DataUrlDecoder, SelectedFile, UploadSession};
//!
//! let mut session = UploadSession::begin(slot, "Ahsan", store.roster())?;
//! session.select_file(SelectedFile::from_bytes("sig.png", "image/png", bytes))?;
//! session.decode(&DataUrlDecoder).await?;
//! session.commit(&mut store)?;
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod decode;
mod error;
mod phase;
mod session;
mod validation;

pub use decode::{DataUrlDecoder, FileDecoder};
pub use error::{UploadError, ValidationError};
pub use phase::{allowed_transitions, validate_transition, UploadPhase};
pub use session::UploadSession;
pub use validation::{
    content_type_for_path, validate_file, FileSource, SelectedFile, IMAGE_CONTENT_PREFIX,
    MAX_UPLOAD_BYTES,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
