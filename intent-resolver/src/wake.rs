/// Wake-phrase gating and session mode
///
/// The gate owns the asleep/awake state machine. Asleep, transcripts are
/// scanned for a wake phrase and everything else is dropped. Awake, the
/// next final transcript is handed back as a command with any embedded
/// wake phrase stripped out, and the session settles back to sleep after
/// dispatch unless pinned awake.

use crate::normalize::normalize;
use regex::{Regex, RegexBuilder};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum WakeGateError {
    #[error("Invalid wake phrase: {0:?}")]
    InvalidPhrase(String),
}

/// Whether the assistant is listening for a wake phrase or a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    Asleep,
    Awake,
}

/// What the gate decided about one transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Asleep and no wake phrase heard; the text is dropped.
    Ignored,

    /// A wake phrase woke the session; no command text this round.
    Woke,

    /// Awake: the transcript, wake phrase stripped, ready for routing.
    Command(String),
}

pub struct WakeGate {
    patterns: Vec<Regex>,
    mode: SessionMode,
    stay_awake: bool,
}

impl WakeGate {
    /// Compile wake phrases into word-bounded, case-insensitive patterns.
    /// Internal spaces match any whitespace run so chunk boundaries in the
    /// transcript do not defeat detection.
    pub fn new(phrases: &[String], start_awake: bool, stay_awake: bool) -> Result<Self, WakeGateError> {
        let mut patterns = Vec::with_capacity(phrases.len());
        for phrase in phrases {
            let canonical = normalize(phrase);
            if canonical.is_empty() {
                return Err(WakeGateError::InvalidPhrase(phrase.clone()));
            }
            let source = format!(r"\b{}\b", regex::escape(&canonical).replace(' ', r"\s+"));
            let pattern = RegexBuilder::new(&source)
                .case_insensitive(true)
                .build()
                .map_err(|_| WakeGateError::InvalidPhrase(phrase.clone()))?;
            patterns.push(pattern);
        }
        Ok(Self {
            patterns,
            mode: if start_awake {
                SessionMode::Awake
            } else {
                SessionMode::Asleep
            },
            stay_awake,
        })
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    /// Feed one final transcript through the gate.
    pub fn observe(&mut self, text: &str) -> GateDecision {
        match self.mode {
            SessionMode::Asleep => {
                if self.contains_wake(text) {
                    info!("wake phrase detected");
                    self.mode = SessionMode::Awake;
                    GateDecision::Woke
                } else {
                    debug!("asleep, transcript ignored");
                    GateDecision::Ignored
                }
            }
            SessionMode::Awake => GateDecision::Command(self.strip_wake(text)),
        }
    }

    /// Feed a partial transcript. Partials can only wake the session;
    /// command text waits for the final.
    pub fn observe_partial(&mut self, text: &str) -> GateDecision {
        if self.mode == SessionMode::Asleep && self.contains_wake(text) {
            info!("wake phrase detected in partial transcript");
            self.mode = SessionMode::Awake;
            return GateDecision::Woke;
        }
        GateDecision::Ignored
    }

    /// Return to sleep after a command has been dispatched, unless pinned.
    pub fn settle(&mut self) {
        if !self.stay_awake {
            self.mode = SessionMode::Asleep;
        }
    }

    fn contains_wake(&self, text: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(text))
    }

    /// Remove every wake phrase occurrence and re-normalize the remainder.
    fn strip_wake(&self, text: &str) -> String {
        let mut out = text.to_string();
        for pattern in &self.patterns {
            out = pattern.replace_all(&out, "").into_owned();
        }
        normalize(&out)
    }
}
