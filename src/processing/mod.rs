//! Core per-image pipeline: load, stamp, encode

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::debug;

use crate::error::Result;

pub mod asset;
pub mod composite;
pub mod encode;
pub mod formats;
pub mod placement;
pub mod scan;

pub use asset::*;
pub use composite::*;
pub use encode::*;
pub use formats::*;
pub use placement::*;
pub use scan::*;

/// Runs the stamp pipeline for single files and whole batches
#[derive(Debug, Clone, Default)]
pub struct WatermarkEngine {
    compositor: Compositor,
    encoder: OutputEncoder,
}

impl WatermarkEngine {
    /// Create an engine with Lanczos3 resampling and default JPEG quality
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a differently configured encoder
    pub fn with_encoder(mut self, encoder: OutputEncoder) -> Self {
        self.encoder = encoder;
        self
    }

    pub fn encoder(&self) -> &OutputEncoder {
        &self.encoder
    }

    /// Load one image and stamp the logo onto it, without writing anything
    pub fn stamp<P: AsRef<Path>>(&self, input_path: P, logo: &LogoAsset, percentage: u32) -> Result<Composite> {
        let image = ImageAsset::load(input_path)?;
        Ok(self.compositor.composite(image, logo, percentage))
    }

    /// Stamp one file and write the result
    pub fn process_file<P: AsRef<Path>>(
        &self,
        input_path: P,
        output_path: P,
        logo: &LogoAsset,
        percentage: u32,
    ) -> Result<ProcessingResult> {
        let start_time = Instant::now();
        let input_path = input_path.as_ref();
        let output_path = output_path.as_ref();

        debug!("Processing file: {:?} -> {:?}", input_path, output_path);

        let composite = self.stamp(input_path, logo, percentage)?;
        self.encoder.write(&composite.pixels, output_path)?;

        Ok(ProcessingResult {
            input_path: input_path.to_path_buf(),
            output_path: output_path.to_path_buf(),
            width: composite.pixels.width(),
            height: composite.pixels.height(),
            placement: composite.placement,
            processing_time: start_time.elapsed(),
        })
    }
}

/// Result of stamping one image
#[derive(Debug, Clone)]
pub struct ProcessingResult {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub placement: PlacementDecision,
    pub processing_time: Duration,
}

impl ProcessingResult {
    /// Whether the logo actually ended up in the output
    pub fn logo_applied(&self) -> bool {
        self.placement.fits
    }
}
