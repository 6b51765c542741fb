//! Configuration file loading.
//!
//! JSON is the primary format; TOML is accepted for files with a `.toml`
//! extension. A missing file is not an error: [`ConfigLoader::load_or_default`]
//! falls back to the built-in defaults. Anything else that goes wrong is
//! reported as [`OCRError::ConfigError`].

use super::errors::ConfigValidatorExt;
use super::params::OcrParams;
use crate::core::OCRError;
use std::path::Path;
use tracing::{debug, info};

/// Configuration file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML format
    Toml,
    /// JSON format
    Json,
}

impl ConfigFormat {
    /// Detect format from file extension
    pub fn from_extension(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Configuration loader for post-processing parameters
pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads parameters from `path`, or returns defaults when no file exists.
    ///
    /// # Errors
    ///
    /// Returns `OCRError::ConfigError` when the file exists but cannot be
    /// read, does not parse, or fails validation.
    pub fn load_or_default(path: Option<&Path>) -> Result<OcrParams, OCRError> {
        match path {
            Some(path) if path.exists() => Self::load_from_file(path),
            Some(path) => {
                info!(
                    "config file {} not found, using default parameters",
                    path.display()
                );
                Ok(OcrParams::default())
            }
            None => Ok(OcrParams::default()),
        }
    }

    /// Load parameters from a file.
    ///
    /// The format is taken from the extension; files without a recognized
    /// extension are parsed as JSON.
    pub fn load_from_file(path: &Path) -> Result<OcrParams, OCRError> {
        let format = ConfigFormat::from_extension(path).unwrap_or(ConfigFormat::Json);

        let content = std::fs::read_to_string(path).map_err(|e| OCRError::ConfigError {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        debug!("loading {:?} config from {}", format, path.display());
        Self::load_from_string(&content, format)
    }

    /// Load parameters from a string with specified format
    pub fn load_from_string(content: &str, format: ConfigFormat) -> Result<OcrParams, OCRError> {
        let params = match format {
            ConfigFormat::Toml => Self::load_from_toml(content)?,
            ConfigFormat::Json => Self::load_from_json(content)?,
        };
        params.validate_and_wrap_ocr_error()
    }

    /// Load parameters from TOML string
    pub fn load_from_toml(content: &str) -> Result<OcrParams, OCRError> {
        toml::from_str(content).map_err(|e| OCRError::ConfigError {
            message: format!("Failed to parse TOML config: {e}"),
        })
    }

    /// Load parameters from JSON string
    ///
    /// The document must be a JSON object.
    pub fn load_from_json(content: &str) -> Result<OcrParams, OCRError> {
        let value: serde_json::Value =
            serde_json::from_str(content).map_err(|e| OCRError::ConfigError {
                message: format!("Failed to parse JSON config: {e}"),
            })?;
        if !value.is_object() {
            return Err(OCRError::config_error(
                "JSON config doesn't match schema: top-level value must be an object",
            ));
        }
        serde_json::from_value(value).map_err(|e| OCRError::ConfigError {
            message: format!("JSON config doesn't match schema: {e}"),
        })
    }

    /// Save parameters to JSON string
    pub fn save_to_json(params: &OcrParams) -> Result<String, OCRError> {
        serde_json::to_string_pretty(params).map_err(|e| OCRError::ConfigError {
            message: format!("Failed to serialize config to JSON: {e}"),
        })
    }
}
