//! Configuration management for LogoStamp

use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};

use crate::batch::{BatchRequest, DEFAULT_LOGO_PERCENTAGE};
use crate::error::{Result, WatermarkError};
use crate::processing::{OutputEncoder, DEFAULT_JPEG_QUALITY};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// What to stamp and where
    pub batch: BatchConfig,

    /// Encoder settings
    pub output: OutputConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Batch defaults; every field can be overridden on the command line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub input_folder: Option<PathBuf>,
    pub output_folder: Option<PathBuf>,
    pub logo_path: Option<PathBuf>,

    /// Logo width as a percentage of each image's width
    pub logo_percentage: u32,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            input_folder: None,
            output_folder: None,
            logo_path: None,
            logo_percentage: DEFAULT_LOGO_PERCENTAGE,
        }
    }
}

/// Encoder configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// JPEG quality (1-100)
    pub jpeg_quality: u8,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl OutputConfig {
    pub fn encoder(&self) -> OutputEncoder {
        OutputEncoder::new().jpeg_quality(self.jpeg_quality)
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Enable JSON logging
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

/// Values given on the command line, taking precedence over the file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub input_folder: Option<PathBuf>,
    pub output_folder: Option<PathBuf>,
    pub logo_path: Option<PathBuf>,
    pub logo_percentage: Option<u32>,
    pub jpeg_quality: Option<u8>,
}

impl Config {
    /// Load configuration from file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .map_err(|e| WatermarkError::config(
                format!("Failed to read config file {:?}: {}", path.as_ref(), e)
            ))?;

        let extension = path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("");

        match extension.to_lowercase().as_str() {
            "toml" => toml::from_str(&content).map_err(Into::into),
            "yaml" | "yml" => serde_yaml::from_str(&content).map_err(Into::into),
            _ => Err(WatermarkError::config(
                "Unsupported config file format. Use .toml or .yaml"
            )),
        }
    }

    /// Save configuration to file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let extension = path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("");

        let content = match extension.to_lowercase().as_str() {
            "toml" => toml::to_string_pretty(self)
                .map_err(|e| WatermarkError::config(format!("TOML serialization failed: {}", e)))?,
            "yaml" | "yml" => serde_yaml::to_string(self)
                .map_err(|e| WatermarkError::config(format!("YAML serialization failed: {}", e)))?,
            _ => return Err(WatermarkError::config(
                "Unsupported config file format. Use .toml or .yaml"
            )),
        };

        std::fs::write(&path, content)
            .map_err(|e| WatermarkError::config(
                format!("Failed to write config file {:?}: {}", path.as_ref(), e)
            ))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.batch.logo_percentage == 0 {
            return Err(WatermarkError::config(
                "Logo percentage must be greater than 0"
            ));
        }

        if self.output.jpeg_quality == 0 || self.output.jpeg_quality > 100 {
            return Err(WatermarkError::config(
                "JPEG quality must be between 1 and 100"
            ));
        }

        if tracing_subscriber::EnvFilter::try_new(&self.logging.level).is_err() {
            return Err(WatermarkError::config(
                format!("Invalid log level: {}", self.logging.level)
            ));
        }

        Ok(())
    }

    /// Apply command line values on top of this configuration
    pub fn merge(mut self, overrides: Overrides) -> Self {
        if overrides.input_folder.is_some() {
            self.batch.input_folder = overrides.input_folder;
        }
        if overrides.output_folder.is_some() {
            self.batch.output_folder = overrides.output_folder;
        }
        if overrides.logo_path.is_some() {
            self.batch.logo_path = overrides.logo_path;
        }
        if let Some(percentage) = overrides.logo_percentage {
            self.batch.logo_percentage = percentage;
        }
        if let Some(quality) = overrides.jpeg_quality {
            self.output.jpeg_quality = quality;
        }
        self
    }

    /// Build the batch request, failing if a path is still missing
    pub fn to_request(&self) -> Result<BatchRequest> {
        let require = |value: &Option<PathBuf>, what: &str| {
            value.clone().ok_or_else(|| WatermarkError::config(
                format!("No {} given (use the command line or the [batch] section)", what)
            ))
        };

        let request = BatchRequest {
            input_folder: require(&self.batch.input_folder, "input folder")?,
            output_folder: require(&self.batch.output_folder, "output folder")?,
            logo_path: require(&self.batch.logo_path, "logo")?,
            logo_percentage: self.batch.logo_percentage,
        };
        request.validate()?;

        Ok(request)
    }
}
