//! Slot primitives
//!
//! A [`Slot`] is one participant's signature record. Its name is never stored
//! here; it is looked up from the [`NameList`](crate::NameList) by index.

use crate::error::RosterError;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Position of a slot in the roster
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SlotIndex(usize);

impl SlotIndex {
    /// Create slot index
    #[inline]
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Raw position
    #[inline]
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }
}

impl Display for SlotIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for SlotIndex {
    fn from(value: usize) -> Self {
        Self(value)
    }
}

/// Non-empty self-describing image payload (usually a `data:` URL)
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ImageData(String);

impl ImageData {
    /// Wrap image data
    ///
    /// # Errors
    /// Returns [`RosterError::EmptyImage`] for an empty string
    pub fn new(data: impl Into<String>) -> Result<Self, RosterError> {
        let data = data.into();
        if data.is_empty() {
            return Err(RosterError::EmptyImage);
        }
        Ok(Self(data))
    }

    /// Payload as stored
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the stored string
    #[inline]
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }

    /// Declared media type of a `data:` URL, if the payload is one
    #[must_use]
    pub fn media_type(&self) -> Option<&str> {
        let rest = self.0.strip_prefix("data:")?;
        let header = rest.split_once(',')?.0;
        let media = header.split(';').next()?;
        (!media.is_empty()).then_some(media)
    }

    /// Payload length in bytes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; empty payloads are rejected on construction
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// Debug prints the media type and length, never the payload.
impl fmt::Debug for ImageData {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageData")
            .field("media_type", &self.media_type())
            .field("len", &self.0.len())
            .finish()
    }
}

impl AsRef<str> for ImageData {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// One participant's signature record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Slot {
    /// Opaque text carried through persistence untouched
    text: String,
    image: Option<ImageData>,
}

impl Slot {
    /// Unsigned slot
    #[inline]
    #[must_use]
    pub fn unsigned() -> Self {
        Self::default()
    }

    pub(crate) fn from_parts(text: String, image: Option<ImageData>) -> Self {
        Self { text, image }
    }

    /// Whether a signature image is present
    #[inline]
    #[must_use]
    pub fn is_signed(&self) -> bool {
        self.image.is_some()
    }

    /// Signature image
    #[inline]
    #[must_use]
    pub fn image(&self) -> Option<&ImageData> {
        self.image.as_ref()
    }

    /// Preserved text field
    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    pub(crate) fn sign(&mut self, image: ImageData) {
        self.image = Some(image);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_image_rejected() {
        assert!(matches!(ImageData::new(""), Err(RosterError::EmptyImage)));
    }

    #[test]
    fn media_type_from_data_url() {
        let image = ImageData::new("data:image/jpeg;base64,/9j/4AAQ").unwrap();
        assert_eq!(image.media_type(), Some("image/jpeg"));

        let opaque = ImageData::new("blob:1234").unwrap();
        assert_eq!(opaque.media_type(), None);
    }

    #[test]
    fn debug_hides_payload() {
        let image = ImageData::new("data:image/png;base64,QUJDRA==").unwrap();
        let debug = format!("{image:?}");
        assert!(!debug.contains("QUJDRA"));
        assert!(debug.contains("image/png"));
    }

    #[test]
    fn slot_signing() {
        let mut slot = Slot::unsigned();
        assert!(!slot.is_signed());
        slot.sign(ImageData::new("data:image/png;base64,AA==").unwrap());
        assert!(slot.is_signed());
        assert_eq!(slot.text(), "");
    }
}
