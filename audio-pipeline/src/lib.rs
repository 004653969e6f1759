/// Audio capture pipeline for the Nova voice assistant
///
/// Opens the microphone with cpal, funnels mono i16 samples through a
/// bounded drop-oldest queue, and hands fixed windows (or whatever has
/// accumulated, for streaming engines) to the speech layer.

pub mod capture;
pub mod chunk;
pub mod chunker;
pub mod sample_queue;

// Re-export main types
pub use capture::{list_input_devices, CaptureError, DeviceInfo, MicCapture, CANDIDATE_RATES};
pub use chunk::{AudioChunk, Sample};
pub use chunker::{Chunker, DeliveryMode, DEFAULT_WINDOW_SECS};
pub use sample_queue::{SampleQueue, DEFAULT_CAPACITY};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
