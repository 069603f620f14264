//! Collaborator seams
//!
//! Drawing and rasterizing the grid are left to adapters. The core hands
//! them a [`RenderModel`] and never lets them touch the roster.

use crate::error::ExportError;
use sigsheet_roster::{NameList, RenderModel, Roster, RosterChange, RosterObserver};
use std::path::PathBuf;
use std::sync::Arc;

/// Draws the grid
pub trait PresentationAdapter: Send + Sync {
    /// Replace the visible grid with `model`
    fn render(&self, model: &RenderModel);
}

/// What the export adapter is asked to produce
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    /// File name, extension included
    pub file_name: String,
    /// Render scale
    pub scale: u32,
    /// Background colour
    pub background: String,
}

/// Produced export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    /// File name
    pub file_name: String,
    /// Where it was written, if anywhere
    pub location: Option<PathBuf>,
    /// Size in bytes
    pub bytes: usize,
}

/// Rasterizes the rendered grid into an image artifact
#[cfg_attr(test, mockall::automock)]
pub trait ExportAdapter: Send + Sync {
    /// File extension of produced artifacts, without the dot
    fn extension(&self) -> &'static str;

    /// Produce the artifact
    ///
    /// # Errors
    /// Returns error if rendering or writing fails
    fn export(&self, model: &RenderModel, request: &ExportRequest) -> Result<ExportArtifact, ExportError>;
}

/// Re-renders through a presentation adapter on every roster change
pub(crate) struct PresentationObserver {
    names: NameList,
    adapter: Arc<dyn PresentationAdapter>,
}

impl PresentationObserver {
    pub(crate) fn new(names: NameList, adapter: Arc<dyn PresentationAdapter>) -> Self {
        Self { names, adapter }
    }
}

impl RosterObserver for PresentationObserver {
    fn roster_changed(&self, roster: &Roster, change: RosterChange) {
        tracing::trace!(?change, "re-rendering grid");
        self.adapter.render(&RenderModel::build(roster, &self.names));
    }
}
