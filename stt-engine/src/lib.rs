/// Speech-to-text layer for the Nova voice assistant
///
/// Defines the engine trait the pipeline drives, transcript events, a
/// Whisper-backed engine behind the `whisper` feature (with a mock used
/// when the feature is off), and a scripted engine for tests.

pub mod engine;
pub mod events;
pub mod scripted;
pub mod whisper;

// Re-export main types
pub use engine::{EngineError, SpeechEngine};
pub use events::{now_ms, TranscriptEvent, TranscriptKind};
pub use scripted::ScriptedEngine;
pub use whisper::{WhisperConfig, WhisperEngine};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
