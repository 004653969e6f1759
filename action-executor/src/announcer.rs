/// Spoken feedback
///
/// `TtsAnnouncer` probes for whichever speech helper the machine carries
/// and serializes utterances so responses never talk over each other.
/// Speech failures are logged and swallowed; losing a confirmation line
/// must never take the assistant down.

use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

#[async_trait]
pub trait Announcer: Send + Sync {
    /// Speak (or otherwise surface) a short response to the user.
    async fn announce(&self, text: &str);
}

/// Candidate TTS helpers in preference order, with the arguments that make
/// them block until speech finishes.
const TTS_CANDIDATES: [(&str, &[&str]); 4] = [
    ("say", &[]),
    ("spd-say", &["--wait"]),
    ("espeak-ng", &[]),
    ("espeak", &[]),
];

pub struct TtsAnnouncer {
    program: Option<(PathBuf, &'static [&'static str])>,
    serial: Mutex<()>,
}

impl TtsAnnouncer {
    /// Probe PATH for a speech helper. Without one the announcer still
    /// works, logging each response instead of speaking it.
    pub fn new() -> Self {
        let program = TTS_CANDIDATES
            .iter()
            .find_map(|(name, args)| which::which(name).ok().map(|path| (path, *args)));

        match &program {
            Some((path, _)) => info!(tts = %path.display(), "speech output enabled"),
            None => warn!("no TTS helper found, responses will be logged only"),
        }

        Self {
            program,
            serial: Mutex::new(()),
        }
    }
}

impl Default for TtsAnnouncer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Announcer for TtsAnnouncer {
    async fn announce(&self, text: &str) {
        info!(response = %text, "announcing");

        let Some((program, args)) = &self.program else {
            return;
        };

        // One utterance at a time.
        let _guard = self.serial.lock().await;

        let result = Command::new(program)
            .args(*args)
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;

        match result {
            Ok(status) if status.success() => debug!("utterance spoken"),
            Ok(status) => warn!(%status, "TTS helper exited abnormally"),
            Err(e) => warn!(error = %e, "failed to run TTS helper"),
        }
    }
}

/// Test double that records everything announced.
pub struct RecordingAnnouncer {
    spoken: std::sync::Mutex<Vec<String>>,
}

impl RecordingAnnouncer {
    pub fn new() -> Self {
        Self {
            spoken: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn spoken(&self) -> Vec<String> {
        match self.spoken.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Default for RecordingAnnouncer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Announcer for RecordingAnnouncer {
    async fn announce(&self, text: &str) {
        if let Ok(mut guard) = self.spoken.lock() {
            guard.push(text.to_string());
        }
    }
}
