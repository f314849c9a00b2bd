use crate::constants::{DEFAULT_JPEG_QUALITY, DEFAULT_OUTPUT_FILENAME};
use crate::types::*;
use std::path::PathBuf;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Composition settings
///
/// Page size, orientation and margin are fixed (A4 portrait, 10 mm); only
/// the output location and re-encoding quality can be changed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ComposeOptions {
    /// Where the finished PDF is written
    pub output_path: PathBuf,
    /// Quality (1-100) for images that are not already usable JPEGs
    pub jpeg_quality: u8,
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from(DEFAULT_OUTPUT_FILENAME),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl ComposeOptions {
    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options = serde_json::from_slice(&bytes)
            .map_err(|e| ComposeError::Config(format!("Failed to parse config: {}", e)))?;
        Ok(options)
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ComposeError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        if self.output_path.as_os_str().is_empty() {
            return Err(ComposeError::Config("No output path specified".to_string()));
        }

        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(ComposeError::Config(format!(
                "JPEG quality must be between 1 and 100, got {}",
                self.jpeg_quality
            )));
        }

        Ok(())
    }
}
