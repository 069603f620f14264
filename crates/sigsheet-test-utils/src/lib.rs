//! Testing utilities for the sigsheet workspace
//!
//! Shared fixtures: sheets over in-memory storage, image files of a given
//! size, and a presenter that records what it was asked to draw.

#![allow(missing_docs)]

use parking_lot::Mutex;
use sigsheet_core::{PresentationAdapter, Sheet, SheetConfig};
use sigsheet_identity::Identity;
use sigsheet_roster::{MemoryStorage, RenderModel};
use sigsheet_upload::SelectedFile;
use std::sync::Arc;

pub const KIB: usize = 1024;
pub const MIB: usize = 1024 * KIB;

/// Names used by the two-person scenarios
pub const PAIR: [&str; 2] = ["Ahsan", "Nasa"];

pub fn pair_config() -> SheetConfig {
    SheetConfig::new().with_names(PAIR)
}

pub fn png_of(size: usize) -> SelectedFile {
    SelectedFile::from_bytes("signature.png", "image/png", vec![0x89; size])
}

pub fn jpeg_of(size: usize) -> SelectedFile {
    SelectedFile::from_bytes("signature.jpg", "image/jpeg", vec![0xff; size])
}

pub fn text_file() -> SelectedFile {
    SelectedFile::from_bytes("notes.txt", "text/plain", b"not a signature".to_vec())
}

pub fn user(display_name: &str) -> Identity {
    Identity::new(display_name).with_email(format!(
        "{}@example.com",
        display_name.split_whitespace().next().unwrap_or("user").to_lowercase()
    ))
}

/// Loaded sheet over its own storage handle
///
/// The sheet ignores notifications for its own writes.
pub fn sheet_on(storage: &MemoryStorage, config: SheetConfig) -> Sheet {
    let handle = storage.handle();
    let origin = handle.origin();
    let sheet = Sheet::new(config, Arc::new(handle)).unwrap().with_origin(origin);
    sheet.load().unwrap();
    sheet
}

pub fn pair_sheet() -> (MemoryStorage, Sheet) {
    let storage = MemoryStorage::new();
    let sheet = sheet_on(&storage, pair_config());
    (storage, sheet)
}

/// Presenter that keeps every model it was handed
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    models: Mutex<Vec<RenderModel>>,
}

impl RecordingPresenter {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn renders(&self) -> usize {
        self.models.lock().len()
    }

    pub fn last(&self) -> Option<RenderModel> {
        self.models.lock().last().cloned()
    }
}

impl PresentationAdapter for RecordingPresenter {
    fn render(&self, model: &RenderModel) {
        self.models.lock().push(model.clone());
    }
}
