/// Scripted engine for tests: plays back predefined transcript events,
/// one batch per chunk, with no audio analysis at all.

use crate::engine::{EngineError, SpeechEngine};
use crate::events::TranscriptEvent;
use audio_pipeline::{AudioChunk, DeliveryMode};
use std::collections::VecDeque;

pub struct ScriptedEngine {
    batches: VecDeque<Vec<TranscriptEvent>>,
}

impl ScriptedEngine {
    /// One batch of arbitrary events per chunk.
    pub fn with_events(batches: impl IntoIterator<Item = Vec<TranscriptEvent>>) -> Self {
        Self {
            batches: batches.into_iter().collect(),
        }
    }

    /// One final transcript per chunk.
    pub fn from_finals<S: Into<String>>(finals: impl IntoIterator<Item = S>) -> Self {
        Self::with_events(
            finals
                .into_iter()
                .map(|text| vec![TranscriptEvent::finalized(text)]),
        )
    }

    pub fn remaining(&self) -> usize {
        self.batches.len()
    }
}

impl SpeechEngine for ScriptedEngine {
    fn delivery_mode(&self) -> DeliveryMode {
        DeliveryMode::Windowed
    }

    fn transcribe(&mut self, _chunk: &AudioChunk) -> Result<Vec<TranscriptEvent>, EngineError> {
        Ok(self.batches.pop_front().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::TranscriptKind;

    fn chunk() -> AudioChunk {
        AudioChunk::new(vec![0; 24_000], 16_000, 0)
    }

    #[test]
    fn test_plays_back_in_order() {
        let mut engine = ScriptedEngine::from_finals(["hey nova", "open chrome"]);
        assert_eq!(engine.remaining(), 2);

        let first = engine.transcribe(&chunk()).unwrap();
        assert_eq!(first[0].text, "hey nova");
        assert_eq!(first[0].kind, TranscriptKind::Final);

        let second = engine.transcribe(&chunk()).unwrap();
        assert_eq!(second[0].text, "open chrome");

        // Exhausted scripts read as silence.
        assert!(engine.transcribe(&chunk()).unwrap().is_empty());
    }
}
