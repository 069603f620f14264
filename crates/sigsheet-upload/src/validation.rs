//! Selected file metadata and acceptance checks

use crate::error::{UploadError, ValidationError};
use std::fmt;
use std::path::{Path, PathBuf};

/// Largest accepted signature file (2 MiB)
pub const MAX_UPLOAD_BYTES: u64 = 2 * 1024 * 1024;

/// Content types accepted as signatures start with this prefix
pub const IMAGE_CONTENT_PREFIX: &str = "image/";

/// Where the file contents come from
#[derive(Clone)]
pub enum FileSource {
    /// Contents already in memory
    Memory(Vec<u8>),
    /// Contents read from disk at decode time
    Path(PathBuf),
}

impl fmt::Debug for FileSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory(bytes) => write!(f, "Memory({} bytes)", bytes.len()),
            Self::Path(path) => write!(f, "Path({})", path.display()),
        }
    }
}

/// A file chosen by the participant, with its declared metadata
#[derive(Debug, Clone)]
pub struct SelectedFile {
    /// File name as chosen
    pub name: String,
    /// Declared content type
    pub content_type: String,
    /// Declared size in bytes
    pub size: u64,
    /// Contents
    pub source: FileSource,
}

impl SelectedFile {
    /// File held in memory; size is the buffer length
    #[must_use]
    pub fn from_bytes(name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            size: bytes.len() as u64,
            source: FileSource::Memory(bytes),
        }
    }

    /// File on disk; the content type is guessed from the extension unless given
    ///
    /// # Errors
    /// Returns [`UploadError::Decode`] if the file metadata cannot be read
    pub async fn from_path(path: impl AsRef<Path>, content_type: Option<String>) -> Result<Self, UploadError> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| UploadError::decode_error(path, e))?;

        Ok(Self {
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            content_type: content_type
                .or_else(|| content_type_for_path(path).map(str::to_string))
                .unwrap_or_else(|| "application/octet-stream".to_string()),
            size: metadata.len(),
            source: FileSource::Path(path.to_path_buf()),
        })
    }
}

/// Content type implied by a file extension
#[must_use]
pub fn content_type_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "heic" => "image/heic",
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        _ => return None,
    };
    Some(mime)
}

/// Check the size cap, then the content type
///
/// # Errors
/// [`ValidationError::TooLarge`] or [`ValidationError::NotAnImage`]
pub fn validate_file(file: &SelectedFile) -> Result<(), ValidationError> {
    if file.size > MAX_UPLOAD_BYTES {
        return Err(ValidationError::TooLarge {
            size: file.size,
            limit: MAX_UPLOAD_BYTES,
        });
    }
    if !file.content_type.starts_with(IMAGE_CONTENT_PREFIX) {
        return Err(ValidationError::NotAnImage {
            content_type: file.content_type.clone(),
        });
    }
    Ok(())
}
