//! Sigsheet Core - signature sheet controller
//!
//! Ties the roster store, identity matching and the upload flow together:
//! - Loads the persisted roster and re-renders on every change
//! - Resolves a signed-in user to their row by first name
//! - Drives one upload per row through validation, decoding and commit
//! - Clears the sheet and exports it through an adapter
//! - Maps every failure to a user-facing [`Notice`]
//!
//! # Example
//!
//! ```rust,ignore
//! use sigsheet_core::{Sheet, SheetConfig};
//! use sigsheet_identity::Identity;
//! use sigsheet_roster::MemoryStorage;
//! use sigsheet_upload::SelectedFile;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let sheet = Sheet::new(SheetConfig::new(), Arc::new(MemoryStorage::new()))?;
//! sheet.load()?;
//!
//! let ticket = sheet.sign_in(Identity::new("Ahsan Rahman"))?;
//! let file = SelectedFile::from_bytes("sig.png", "image/png", vec![0; 1024]);
//! let notice = sheet.submit(ticket, file).await?;
//!
//! println!("{notice}");
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod adapters;
pub mod config;
pub mod error;
pub mod export;
pub mod host;
pub mod notice;
pub mod sheet;

// Re-exports for convenience
pub use adapters::{ExportAdapter, ExportArtifact, ExportRequest, PresentationAdapter};
pub use config::{ExportConfig, SheetConfig};
pub use error::{ConfigError, ExportError, SheetError};
pub use export::export_file_name;
pub use host::{HtmlExporter, TerminalPresenter};
pub use notice::{Notice, NoticeLevel};
pub use sheet::{Sheet, UploadTicket};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for driving a sheet
    pub use crate::{Notice, Sheet, SheetConfig, SheetError, UploadTicket};
    pub use sigsheet_identity::Identity;
    pub use sigsheet_roster::{MemoryStorage, FileStorage, StorageBackend};
    pub use sigsheet_upload::SelectedFile;
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
