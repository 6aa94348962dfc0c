//! LogoStamp - Batch Logo Watermarking
//!
//! Stamps a logo onto the top-left corner of every image in a folder. The
//! logo is scaled per image to a percentage of that image's width, keeps its
//! own aspect ratio and is alpha-blended at a fixed `(10, 10)` offset.
//!
//! # Features
//!
//! - **Proportional sizing**: one logo, sized for each image independently
//! - **Alpha aware**: transparent logos blend, PNG output keeps transparency
//! - **Forgiving batches**: a bad file is reported and skipped, never fatal
//! - **Format Support**: PNG, JPEG, BMP, GIF
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use logostamp::{BatchRequest, EventLog, WatermarkEngine};
//!
//! let request = BatchRequest::new("input_images", "output_images", "assets/logo.png")
//!     .percentage(15);
//!
//! let mut events = EventLog::new();
//! let summary = WatermarkEngine::new().run(&request, &mut events)?;
//!
//! println!("Stamped {} of {} images", summary.processed, summary.total);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod batch;
pub mod config;
pub mod error;
pub mod processing;

// Re-export commonly used types
pub use batch::{
    run_batch, BatchRequest, BatchSummary, ChannelSink, EventLog, NoopSink, ProcessingEvent,
    ProgressSink,
};
pub use config::Config;
pub use error::{Result, WatermarkError};
pub use processing::{LogoAsset, PlacementDecision, WatermarkEngine};

use tracing::info;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize logging from `RUST_LOG`
///
/// Safe to call more than once; only the first subscriber is installed.
pub fn init() -> Result<()> {
    if tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .finish()
    ).is_ok() {
        info!("LogoStamp v{} initialized", VERSION);
    }

    Ok(())
}

/// Initialize logging from a configuration
pub fn init_with_config(config: &Config) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_new(&config.logging.level)
        .map_err(|e| WatermarkError::config(format!("Invalid log level: {}", e)))?;

    let installed = if config.logging.json_format {
        let subscriber = tracing_subscriber::FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .finish();
        tracing::subscriber::set_global_default(subscriber).is_ok()
    } else {
        let subscriber = tracing_subscriber::FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber).is_ok()
    };

    if installed {
        info!("LogoStamp v{} initialized with custom config", VERSION);
    }

    Ok(())
}
