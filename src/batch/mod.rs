//! Sequential batch stamping over a folder
//!
//! One image is loaded, stamped and written before the next one starts.
//! Nothing here spawns threads; callers that need a responsive foreground
//! run [`WatermarkEngine::run`] on a worker and drain a [`ChannelSink`].

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::error::{Result, WatermarkError};
use crate::processing::{scan_directory, LogoAsset, ProcessingResult, WatermarkEngine};

pub mod progress;

pub use progress::*;

/// Default logo width as a percentage of each image's width
pub const DEFAULT_LOGO_PERCENTAGE: u32 = 15;

/// Everything one batch needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchRequest {
    pub input_folder: PathBuf,
    pub output_folder: PathBuf,
    pub logo_path: PathBuf,
    /// Logo width relative to each image's width. Intended range is 5-50;
    /// any value is accepted and sizes that collapse to zero fall back to
    /// the logo's native size.
    pub logo_percentage: u32,
}

impl BatchRequest {
    pub fn new<P: Into<PathBuf>>(input_folder: P, output_folder: P, logo_path: P) -> Self {
        Self {
            input_folder: input_folder.into(),
            output_folder: output_folder.into(),
            logo_path: logo_path.into(),
            logo_percentage: DEFAULT_LOGO_PERCENTAGE,
        }
    }

    /// Set the logo percentage
    pub fn percentage(mut self, percentage: u32) -> Self {
        self.logo_percentage = percentage;
        self
    }

    /// Reject requests a caller should not even start
    pub fn validate(&self) -> Result<()> {
        for (name, path) in [
            ("input folder", &self.input_folder),
            ("output folder", &self.output_folder),
            ("logo", &self.logo_path),
        ] {
            if path.as_os_str().is_empty() {
                return Err(WatermarkError::config(format!("No {} given", name)));
            }
        }

        if self.logo_percentage == 0 {
            return Err(WatermarkError::config("Logo percentage must be greater than 0"));
        }

        Ok(())
    }
}

/// Counters for a finished batch
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchSummary {
    /// Supported images found in the input folder
    pub total: usize,
    /// Images written, with or without the logo
    pub processed: usize,
    /// Images that could not be loaded or written
    pub failed: usize,
    /// Images written without the logo because it did not fit
    pub overlay_skipped: usize,
    /// Images where the logo fell back to its native size
    pub size_fallbacks: usize,
    pub duration: Duration,
}

impl BatchSummary {
    pub fn is_clean(&self) -> bool {
        self.failed == 0 && self.overlay_skipped == 0
    }
}

/// Run a batch with the default engine and no progress sink
pub fn run_batch(request: &BatchRequest) -> Result<BatchSummary> {
    WatermarkEngine::new().run(request, &mut NoopSink)
}

impl WatermarkEngine {
    /// Stamp every supported image in `request.input_folder`.
    ///
    /// Returns `Err` only for failures that stop the batch before any image
    /// is touched (unreadable input folder, unusable logo, output folder that
    /// cannot be created); each is also reported as a single fatal event.
    /// Per-file problems are reported to `sink` and counted in the summary.
    pub fn run(&self, request: &BatchRequest, sink: &mut dyn ProgressSink) -> Result<BatchSummary> {
        let start_time = Instant::now();

        info!("Starting batch");
        info!("Input: {:?}", request.input_folder);
        info!("Output: {:?}", request.output_folder);
        info!("Logo: {:?} at {}%", request.logo_path, request.logo_percentage);

        let files = match scan_directory(&request.input_folder) {
            Ok(files) => files,
            Err(e) => return Err(abort(sink, e)),
        };

        let logo = match LogoAsset::load(&request.logo_path) {
            Ok(logo) => logo,
            Err(e) => return Err(abort(sink, e)),
        };

        if let Err(e) = ensure_output_folder(&request.output_folder, sink) {
            return Err(abort(sink, e));
        }

        let mut summary = BatchSummary {
            total: files.len(),
            ..Default::default()
        };

        if files.is_empty() {
            info!("No supported images in {:?}", request.input_folder);
            sink.emit(ProcessingEvent::EmptyInput);
            summary.duration = start_time.elapsed();
            return Ok(summary);
        }

        info!("Found {} files to process", files.len());

        for (position, input_path) in files.iter().enumerate() {
            self.run_one(
                input_path,
                position + 1,
                &logo,
                request,
                &mut summary,
                sink,
            );
        }

        summary.duration = start_time.elapsed();
        info!(
            "Batch completed: {}/{} files written, {} failed in {:.2}s",
            summary.processed,
            summary.total,
            summary.failed,
            summary.duration.as_secs_f64()
        );

        Ok(summary)
    }

    fn run_one(
        &self,
        input_path: &Path,
        index: usize,
        logo: &LogoAsset,
        request: &BatchRequest,
        summary: &mut BatchSummary,
        sink: &mut dyn ProgressSink,
    ) {
        let filename = input_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let output_path = request.output_folder.join(&filename);

        let percentage = request.logo_percentage;
        let result = match self.process_file(input_path, output_path.as_path(), logo, percentage) {
            Ok(result) => result,
            Err(e) => {
                report_file_error(sink, summary, &filename, &e);
                return;
            }
        };

        report_placement(sink, summary, &filename, &result);

        summary.processed += 1;
        if result.logo_applied() {
            info!("Added logo to {} and saved to {:?}", filename, result.output_path);
        } else {
            info!("Saved {} without logo to {:?}", filename, result.output_path);
        }
        debug!("{} took {:?}", filename, result.processing_time);
        sink.emit(ProcessingEvent::FileProcessed {
            filename,
            index,
            total: summary.total,
        });
    }
}

fn abort(sink: &mut dyn ProgressSink, e: WatermarkError) -> WatermarkError {
    error!("Batch aborted: {}", e);
    let message = e.user_message();
    let event = match e {
        WatermarkError::LogoNotFound { .. } | WatermarkError::LogoLoadError { .. } => {
            ProcessingEvent::FatalLogoError { message }
        }
        _ => ProcessingEvent::FatalFolderError { message },
    };
    sink.emit(event);
    e
}

fn ensure_output_folder(folder: &Path, sink: &mut dyn ProgressSink) -> Result<()> {
    if folder.is_dir() {
        return Ok(());
    }

    fs::create_dir_all(folder)
        .map_err(|e| WatermarkError::output_folder(folder.to_path_buf(), e.to_string()))?;

    info!("Created output folder {:?}", folder);
    sink.emit(ProcessingEvent::FolderCreated {
        path: folder.to_path_buf(),
    });
    Ok(())
}

fn report_placement(
    sink: &mut dyn ProgressSink,
    summary: &mut BatchSummary,
    filename: &str,
    result: &ProcessingResult,
) {
    let placement = &result.placement;
    if placement.used_fallback {
        summary.size_fallbacks += 1;
        let reason = format!(
            "scaled logo would be empty on a {}px wide image",
            result.width
        );
        warn!("{}: {}", filename, reason);
        sink.emit(ProcessingEvent::LogoFallbackWarning {
            filename: filename.to_string(),
            reason,
        });
    }

    if !placement.fits {
        summary.overlay_skipped += 1;
        let reason = format!(
            "logo {}x{} at ({}, {}) does not fit in {}x{}",
            placement.logo_width,
            placement.logo_height,
            placement.offset_x,
            placement.offset_y,
            result.width,
            result.height
        );
        warn!("{}: {}", filename, reason);
        sink.emit(ProcessingEvent::FileSkippedWarning {
            filename: filename.to_string(),
            reason,
        });
    }
}

fn report_file_error(
    sink: &mut dyn ProgressSink,
    summary: &mut BatchSummary,
    filename: &str,
    e: &WatermarkError,
) {
    summary.failed += 1;
    error!("Error processing {}: {}", filename, e);
    sink.emit(ProcessingEvent::FileError {
        filename: filename.to_string(),
        message: e.user_message(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let request = BatchRequest::new("in", "out", "logo.png");
        assert_eq!(request.logo_percentage, DEFAULT_LOGO_PERCENTAGE);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_request_validation() {
        assert!(BatchRequest::new("in", "out", "logo.png").percentage(0).validate().is_err());
        assert!(BatchRequest::new("", "out", "logo.png").validate().is_err());
        assert!(BatchRequest::new("in", "out", "").validate().is_err());
        assert!(BatchRequest::new("in", "out", "logo.png").percentage(400).validate().is_ok());
    }

    #[test]
    fn test_summary_clean() {
        let summary = BatchSummary {
            total: 2,
            processed: 2,
            ..Default::default()
        };
        assert!(summary.is_clean());

        let summary = BatchSummary {
            overlay_skipped: 1,
            ..summary
        };
        assert!(!summary.is_clean());
    }
}
