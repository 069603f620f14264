//! File decoding into self-describing image data

use crate::error::{UploadError, ValidationError};
use crate::validation::{FileSource, SelectedFile, MAX_UPLOAD_BYTES};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use sigsheet_roster::ImageData;

/// Reads a selected file into a storable image payload
#[async_trait]
pub trait FileDecoder: Send + Sync {
    /// Decode `file`
    ///
    /// # Errors
    /// Returns error if the contents cannot be read
    async fn decode(&self, file: &SelectedFile) -> Result<ImageData, UploadError>;
}

/// Encodes the file as `data:<content type>;base64,<contents>`
#[derive(Debug, Clone, Copy, Default)]
pub struct DataUrlDecoder;

impl DataUrlDecoder {
    /// Build the data URL for raw contents
    #[must_use]
    pub fn encode(content_type: &str, bytes: &[u8]) -> String {
        format!("data:{content_type};base64,{}", STANDARD.encode(bytes))
    }
}

#[async_trait]
impl FileDecoder for DataUrlDecoder {
    async fn decode(&self, file: &SelectedFile) -> Result<ImageData, UploadError> {
        let read;
        let bytes: &[u8] = match &file.source {
            FileSource::Memory(bytes) => bytes,
            FileSource::Path(path) => {
                read = tokio::fs::read(path)
                    .await
                    .map_err(|e| UploadError::decode_error(path, e))?;
                &read
            }
        };

        // The cap applies to the bytes read, not the declared size.
        let size = bytes.len() as u64;
        if size > MAX_UPLOAD_BYTES {
            return Err(ValidationError::TooLarge {
                size,
                limit: MAX_UPLOAD_BYTES,
            }
            .into());
        }
        let url = Self::encode(&file.content_type, bytes);

        tracing::debug!(file = %file.name, encoded_len = url.len(), "file decoded");
        Ok(ImageData::new(url)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_file_to_data_url() {
        let file = SelectedFile::from_bytes("sig.png", "image/png", b"ABC".to_vec());
        let image = DataUrlDecoder.decode(&file).await.unwrap();
        assert_eq!(image.as_str(), "data:image/png;base64,QUJD");
        assert_eq!(image.media_type(), Some("image/png"));
    }

    #[tokio::test]
    async fn empty_file_still_yields_payload() {
        let file = SelectedFile::from_bytes("blank.png", "image/png", Vec::new());
        let image = DataUrlDecoder.decode(&file).await.unwrap();
        assert_eq!(image.as_str(), "data:image/png;base64,");
    }

    #[tokio::test]
    async fn actual_length_is_capped_whatever_the_declared_size() {
        let mut file = SelectedFile::from_bytes("big.png", "image/png", vec![0; 3 * 1024 * 1024]);
        file.size = 10;
        assert!(matches!(
            DataUrlDecoder.decode(&file).await,
            Err(UploadError::Validation(ValidationError::TooLarge { size: 3_145_728, .. }))
        ));
    }

    #[tokio::test]
    async fn missing_path_is_decode_error() {
        let file = SelectedFile {
            name: "gone.png".to_string(),
            content_type: "image/png".to_string(),
            size: 10,
            source: FileSource::Path("/nonexistent/sigsheet/gone.png".into()),
        };
        assert!(matches!(
            DataUrlDecoder.decode(&file).await,
            Err(UploadError::Decode { .. })
        ));
    }
}
