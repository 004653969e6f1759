/// Transcript events emitted by speech engines.

use std::time::{SystemTime, UNIX_EPOCH};

/// Partial transcripts are revisable previews; only finals carry commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscriptKind {
    Partial,
    Final,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEvent {
    pub kind: TranscriptKind,
    pub text: String,
    pub timestamp_ms: u64,
}

impl TranscriptEvent {
    pub fn partial(text: impl Into<String>) -> Self {
        Self {
            kind: TranscriptKind::Partial,
            text: text.into(),
            timestamp_ms: now_ms(),
        }
    }

    pub fn finalized(text: impl Into<String>) -> Self {
        Self {
            kind: TranscriptKind::Final,
            text: text.into(),
            timestamp_ms: now_ms(),
        }
    }

    pub fn is_final(&self) -> bool {
        self.kind == TranscriptKind::Final
    }
}

/// Milliseconds since the Unix epoch.
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
