//! Sheet configuration
//!
//! Loaded from TOML; every field has a default, so an empty document is the
//! stock 15-name sheet.
//!
//! ```toml
//! names = ["Ahsan", "Nasa"]
//! storage_key = "spreadsheetData"
//!
//! [export]
//! file_prefix = "GarasiAMI_Table"
//! utc_offset_hours = 7
//! ```

use crate::error::ConfigError;
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use sigsheet_roster::{NameList, DEFAULT_NAMES, DEFAULT_STORAGE_KEY};
use std::path::Path;

/// Sheet configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetConfig {
    /// Participant names in row order
    pub names: Vec<String>,
    /// Key the roster is persisted under
    pub storage_key: String,
    /// Export settings
    pub export: ExportConfig,
}

impl SheetConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With participant names
    #[must_use]
    pub fn with_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names = names.into_iter().map(Into::into).collect();
        self
    }

    /// With storage key
    #[inline]
    #[must_use]
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// With export settings
    #[inline]
    #[must_use]
    pub fn with_export(mut self, export: ExportConfig) -> Self {
        self.export = export;
        self
    }

    /// Parse a TOML document
    ///
    /// # Errors
    /// Returns error if the document is not valid TOML for this shape
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Read and parse a TOML file
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::io_error(path, e))?;
        Self::from_toml_str(&raw)
    }

    /// Validated name list
    ///
    /// # Errors
    /// Returns error if the names violate the name list invariants
    pub fn name_list(&self) -> Result<NameList, ConfigError> {
        Ok(NameList::new(self.names.iter().cloned())?)
    }

    /// Check everything that can be checked without storage
    ///
    /// # Errors
    /// Returns the first invalid setting
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.name_list()?;
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::Invalid("storage_key must not be empty".to_string()));
        }
        self.export.offset()?;
        if self.export.scale == 0 {
            return Err(ConfigError::Invalid("export.scale must be at least 1".to_string()));
        }
        Ok(())
    }
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            names: DEFAULT_NAMES.iter().map(|n| (*n).to_string()).collect(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            export: ExportConfig::default(),
        }
    }
}

/// Export settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// File name prefix before the timestamp
    pub file_prefix: String,
    /// Offset from UTC, in hours, of the timestamp in the file name
    pub utc_offset_hours: i32,
    /// Render scale handed to the export adapter
    pub scale: u32,
    /// Background colour handed to the export adapter
    pub background: String,
}

impl ExportConfig {
    /// Timestamp offset
    ///
    /// # Errors
    /// Returns error if the offset is outside ±23 hours
    pub fn offset(&self) -> Result<FixedOffset, ConfigError> {
        self.utc_offset_hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .ok_or(ConfigError::InvalidOffset(self.utc_offset_hours))
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_prefix: "GarasiAMI_Table".to_string(),
            utc_offset_hours: 7,
            scale: 2,
            background: "#ffffff".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_document_is_default() {
        let config = SheetConfig::from_toml_str("").unwrap();
        assert_eq!(config, SheetConfig::default());
        assert_eq!(config.name_list().unwrap().len(), 15);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_document_keeps_other_defaults() {
        let config = SheetConfig::from_toml_str(
            r#"
            names = ["Ahsan", "Nasa"]

            [export]
            utc_offset_hours = 0
            "#,
        )
        .unwrap();

        assert_eq!(config.names, vec!["Ahsan", "Nasa"]);
        assert_eq!(config.storage_key, "spreadsheetData");
        assert_eq!(config.export.utc_offset_hours, 0);
        assert_eq!(config.export.file_prefix, "GarasiAMI_Table");
    }

    #[test]
    fn duplicate_names_fail_validation() {
        let config = SheetConfig::new().with_names(["Fafa", "fafa"]);
        assert!(matches!(config.validate(), Err(ConfigError::Names(_))));
    }

    #[test]
    fn bad_offset_fails_validation() {
        let config = SheetConfig::new().with_export(ExportConfig {
            utc_offset_hours: 30,
            ..ExportConfig::default()
        });
        assert!(matches!(config.validate(), Err(ConfigError::InvalidOffset(30))));
    }

    #[test]
    fn blank_key_fails_validation() {
        let config = SheetConfig::new().with_storage_key(" ");
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        assert!(matches!(
            SheetConfig::from_toml_str("names = 3"),
            Err(ConfigError::Parse(_))
        ));
    }
}
