//! Error types and handling for LogoStamp

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for LogoStamp operations
pub type Result<T> = std::result::Result<T, WatermarkError>;

/// Main error type for LogoStamp operations
#[derive(Debug, Error)]
pub enum WatermarkError {
    /// Configuration errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Logo path does not resolve to a file
    #[error("Logo file not found at {path:?}")]
    LogoNotFound { path: PathBuf },

    /// Logo exists but could not be decoded
    #[error("Failed to load logo {path:?}: {message}")]
    LogoLoadError { path: PathBuf, message: String },

    /// Input folder missing or unreadable
    #[error("Cannot read input folder {path:?}: {message}")]
    InputFolderError { path: PathBuf, message: String },

    /// Output folder could not be created
    #[error("Cannot create output folder {path:?}: {message}")]
    OutputFolderError { path: PathBuf, message: String },

    /// A single input image could not be loaded
    #[error("Failed to load image: {message} (file: {file:?})")]
    FileLoadError { message: String, file: PathBuf },

    /// A single output image could not be written
    #[error("Failed to write image: {message} (file: {file:?})")]
    FileWriteError { message: String, file: PathBuf },

    /// File format not supported
    #[error("Unsupported image format: {format} (file: {file:?})")]
    UnsupportedFormat {
        format: String,
        file: Option<PathBuf>,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    SerdeError(String),
}

impl WatermarkError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a new logo-not-found error
    pub fn logo_not_found(path: PathBuf) -> Self {
        Self::LogoNotFound { path }
    }

    /// Create a new logo decode error
    pub fn logo_load<S: Into<String>>(path: PathBuf, message: S) -> Self {
        Self::LogoLoadError {
            path,
            message: message.into(),
        }
    }

    /// Create a new input folder error
    pub fn input_folder<S: Into<String>>(path: PathBuf, message: S) -> Self {
        Self::InputFolderError {
            path,
            message: message.into(),
        }
    }

    /// Create a new output folder error
    pub fn output_folder<S: Into<String>>(path: PathBuf, message: S) -> Self {
        Self::OutputFolderError {
            path,
            message: message.into(),
        }
    }

    /// Create a new per-file load error
    pub fn file_load<S: Into<String>>(message: S, file: PathBuf) -> Self {
        Self::FileLoadError {
            message: message.into(),
            file,
        }
    }

    /// Create a new per-file write error
    pub fn file_write<S: Into<String>>(message: S, file: PathBuf) -> Self {
        Self::FileWriteError {
            message: message.into(),
            file,
        }
    }

    /// Create a new unsupported format error
    pub fn unsupported_format<S: Into<String>>(format: S, file: Option<PathBuf>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
            file,
        }
    }

    /// Check if this error aborts the whole batch
    pub fn is_fatal(&self) -> bool {
        match self {
            // Nothing can be stamped without a logo or a folder to read/write
            Self::LogoNotFound { .. }
            | Self::LogoLoadError { .. }
            | Self::InputFolderError { .. }
            | Self::OutputFolderError { .. } => true,

            // These affect a single file, the batch moves on
            Self::FileLoadError { .. }
            | Self::FileWriteError { .. }
            | Self::UnsupportedFormat { .. } => false,

            Self::ConfigError { .. } | Self::SerdeError(_) => true,
        }
    }

    /// Get the associated file path if available
    pub fn file_path(&self) -> Option<&PathBuf> {
        match self {
            Self::LogoNotFound { path }
            | Self::LogoLoadError { path, .. }
            | Self::InputFolderError { path, .. }
            | Self::OutputFolderError { path, .. } => Some(path),

            Self::FileLoadError { file, .. } | Self::FileWriteError { file, .. } => Some(file),

            Self::UnsupportedFormat { file, .. } => file.as_ref(),

            _ => None,
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::LogoNotFound { path } => {
                format!("Logo file not found at {}", path.display())
            }
            Self::LogoLoadError { path, message } => {
                format!("Could not read logo {}: {}", path.display(), message)
            }
            Self::InputFolderError { path, .. } => {
                format!("Input folder does not exist or cannot be read: {}", path.display())
            }
            Self::UnsupportedFormat { format, .. } => {
                format!("Unsupported image format: {}. Supported formats: PNG, JPEG, BMP, GIF", format)
            }
            other => other.to_string(),
        }
    }
}

// Convert serde errors to our error type
impl From<toml::de::Error> for WatermarkError {
    fn from(err: toml::de::Error) -> Self {
        Self::SerdeError(format!("TOML parsing error: {}", err))
    }
}

impl From<serde_yaml::Error> for WatermarkError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::SerdeError(format!("YAML parsing error: {}", err))
    }
}

/// Error context extension for turning low-level failures into per-file errors
pub trait ErrorContext<T> {
    /// Treat a failure as a load error for `file`
    fn load_context(self, file: PathBuf) -> Result<T>;

    /// Treat a failure as a write error for `file`
    fn write_context(self, file: PathBuf) -> Result<T>;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: std::fmt::Display,
{
    fn load_context(self, file: PathBuf) -> Result<T> {
        self.map_err(|e| WatermarkError::file_load(e.to_string(), file))
    }

    fn write_context(self, file: PathBuf) -> Result<T> {
        self.map_err(|e| WatermarkError::file_write(e.to_string(), file))
    }
}
