/// Nova voice assistant
///
/// Wires the capture pipeline, speech engine, intent resolver and action
/// executor into one processing loop, driven by the `nova` binary.

pub mod config;
pub mod dispatch;
pub mod pipeline;

// Re-export main types
pub use config::{ConfigError, NovaConfig};
pub use dispatch::Dispatcher;
pub use pipeline::{ProcessingLoop, POLL_INTERVAL};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
