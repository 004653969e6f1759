/// The engine trait the processing loop drives.

use crate::events::TranscriptEvent;
use audio_pipeline::{AudioChunk, DeliveryMode};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Model file not found: {0}")]
    ModelNotFound(PathBuf),

    #[error("Engine initialization failed: {0}")]
    Initialization(String),

    #[error("Transcription failed: {0}")]
    Transcription(String),
}

/// A speech-to-text engine. Implementations own their model state and are
/// driven synchronously, one chunk at a time, from the processing loop.
pub trait SpeechEngine: Send {
    /// How this engine wants its audio delivered.
    fn delivery_mode(&self) -> DeliveryMode;

    /// Transcribe one chunk. A chunk may yield zero events (silence),
    /// partials, finals, or both.
    fn transcribe(&mut self, chunk: &AudioChunk) -> Result<Vec<TranscriptEvent>, EngineError>;
}
