/// Action execution layer for the Nova voice assistant
///
/// Carries out resolved intents against the host OS (launching apps,
/// opening URLs, media keys, screenshots, window control) and speaks
/// responses through whatever TTS helper the machine has.

pub mod actions;
pub mod announcer;
pub mod platform;

// Re-export main types
pub use actions::{expand_env_vars, ActionError, ActionExecutor, MediaKey, SystemActions};
pub use announcer::{Announcer, RecordingAnnouncer, TtsAnnouncer};
pub use platform::Platform;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
