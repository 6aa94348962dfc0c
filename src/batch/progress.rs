//! Progress events and the sinks that receive them

use std::fmt;
use std::path::PathBuf;
use serde::Serialize;
use tokio::sync::mpsc;

/// A status record emitted while a batch runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind")]
pub enum ProcessingEvent {
    /// The output folder did not exist and was created
    FolderCreated { path: PathBuf },
    /// The logo could not be used; the batch stops here
    FatalLogoError { message: String },
    /// The input folder could not be read or the output folder created; the batch stops here
    FatalFolderError { message: String },
    /// No supported images were found
    EmptyInput,
    /// The proportional logo size collapsed to zero; native size used instead
    LogoFallbackWarning { filename: String, reason: String },
    /// The overlay was left off; the image is written unchanged
    FileSkippedWarning { filename: String, reason: String },
    /// One image was written
    FileProcessed {
        filename: String,
        index: usize,
        total: usize,
    },
    /// One image could not be loaded or written
    FileError { filename: String, message: String },
}

impl ProcessingEvent {
    /// Whether the event ends the batch
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::FatalLogoError { .. } | Self::FatalFolderError { .. })
    }

    /// Whether the event reports a warning or failure for one file
    pub fn is_file_problem(&self) -> bool {
        matches!(
            self,
            Self::LogoFallbackWarning { .. } | Self::FileSkippedWarning { .. } | Self::FileError { .. }
        )
    }
}

impl fmt::Display for ProcessingEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FolderCreated { path } => write!(f, "Created output folder {}", path.display()),
            Self::FatalLogoError { message } => write!(f, "Error: {}", message),
            Self::FatalFolderError { message } => write!(f, "Error: {}", message),
            Self::EmptyInput => write!(f, "No supported images found in the input folder"),
            Self::LogoFallbackWarning { filename, reason } => {
                write!(f, "Warning: {} ({}), using original logo size", filename, reason)
            }
            Self::FileSkippedWarning { filename, reason } => {
                write!(f, "Warning: logo not added to {} ({})", filename, reason)
            }
            Self::FileProcessed { filename, index, total } => {
                write!(f, "[{}/{}] Added logo to {}", index, total, filename)
            }
            Self::FileError { filename, message } => {
                write!(f, "Error processing {}: {}", filename, message)
            }
        }
    }
}

/// Receives events from a running batch
pub trait ProgressSink {
    fn emit(&mut self, event: ProcessingEvent);
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl ProgressSink for NoopSink {
    fn emit(&mut self, _event: ProcessingEvent) {}
}

impl<F> ProgressSink for F
where
    F: FnMut(ProcessingEvent),
{
    fn emit(&mut self, event: ProcessingEvent) {
        self(event);
    }
}

/// Keeps every event in order
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    events: Vec<ProcessingEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[ProcessingEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<ProcessingEvent> {
        self.events
    }

    /// Number of `FileProcessed` events seen
    pub fn processed_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, ProcessingEvent::FileProcessed { .. }))
            .count()
    }
}

impl ProgressSink for EventLog {
    fn emit(&mut self, event: ProcessingEvent) {
        self.events.push(event);
    }
}

/// Forwards events into a channel, for rendering on another task.
///
/// `UnboundedSender::send` never blocks, so the sink can be driven from a
/// blocking worker thread while the receiver lives on the async runtime.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: mpsc::UnboundedSender<ProcessingEvent>,
}

impl ChannelSink {
    /// Create a sink and the receiver that drains it
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ProcessingEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl ProgressSink for ChannelSink {
    fn emit(&mut self, event: ProcessingEvent) {
        // Receiver gone means nobody is watching; the batch carries on
        let _ = self.sender.send(event);
    }
}
