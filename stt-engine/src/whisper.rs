/// Whisper-backed speech engine
///
/// Wraps whisper.cpp through whisper-rs. Without the `whisper` feature a
/// mock engine stands in: it validates config, logs loudly, and hears
/// only silence, which keeps the rest of the pipeline exercisable.

use crate::engine::{EngineError, SpeechEngine};
use crate::events::TranscriptEvent;
use audio_pipeline::{AudioChunk, DeliveryMode};
use std::path::PathBuf;

#[cfg(feature = "whisper")]
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

/// Whisper model configuration
#[derive(Debug, Clone)]
pub struct WhisperConfig {
    /// Path to the ggml model file
    pub model_path: PathBuf,

    /// Language to transcribe ("en", or "auto" to detect)
    pub language: String,

    /// Number of threads for inference
    pub num_threads: usize,

    /// Translate non-English speech to English
    pub translate: bool,
}

impl Default for WhisperConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("models/ggml-base.en.bin"),
            language: "en".to_string(),
            num_threads: num_cpus::get(),
            translate: false,
        }
    }
}

impl WhisperConfig {
    pub fn validate(&self) -> Result<(), EngineError> {
        // The mock never opens the file, so only the real engine cares.
        #[cfg(feature = "whisper")]
        {
            if !self.model_path.exists() {
                return Err(EngineError::ModelNotFound(self.model_path.clone()));
            }
        }

        if self.num_threads == 0 {
            return Err(EngineError::Initialization(
                "num_threads must be > 0".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(feature = "whisper")]
mod real_impl {
    use super::*;
    use tracing::{debug, info};

    pub struct WhisperEngine {
        context: WhisperContext,
        config: WhisperConfig,
    }

    impl WhisperEngine {
        pub fn new(config: WhisperConfig) -> Result<Self, EngineError> {
            config.validate()?;

            info!(model = ?config.model_path, threads = config.num_threads, "loading Whisper model");

            let model_path = config
                .model_path
                .to_str()
                .ok_or_else(|| EngineError::Initialization("non-UTF8 model path".to_string()))?;
            let context =
                WhisperContext::new_with_params(model_path, WhisperContextParameters::default())
                    .map_err(|e| EngineError::Initialization(e.to_string()))?;

            info!("Whisper model loaded");

            Ok(Self { context, config })
        }
    }

    impl SpeechEngine for WhisperEngine {
        fn delivery_mode(&self) -> DeliveryMode {
            DeliveryMode::Windowed
        }

        fn transcribe(
            &mut self,
            chunk: &AudioChunk,
        ) -> Result<Vec<TranscriptEvent>, EngineError> {
            if chunk.is_empty() {
                return Ok(Vec::new());
            }

            debug!(samples = chunk.len(), seq = chunk.seq(), "transcribing chunk");

            let audio: Vec<f32> = chunk
                .samples()
                .iter()
                .map(|&s| s as f32 / 32768.0)
                .collect();

            let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
            params.set_language(Some(&self.config.language));
            params.set_translate(self.config.translate);
            params.set_print_progress(false);
            params.set_print_special(false);
            params.set_print_realtime(false);
            params.set_n_threads(self.config.num_threads as i32);

            self.context
                .full(params, &audio)
                .map_err(|e| EngineError::Transcription(e.to_string()))?;

            let num_segments = self
                .context
                .full_n_segments()
                .map_err(|e| EngineError::Transcription(e.to_string()))?;

            let mut text = String::new();
            for i in 0..num_segments {
                let segment = self
                    .context
                    .full_get_segment_text(i)
                    .map_err(|e| EngineError::Transcription(e.to_string()))?;
                text.push_str(&segment);
            }

            let text = text.trim();
            if text.is_empty() {
                return Ok(Vec::new());
            }
            Ok(vec![TranscriptEvent::finalized(text)])
        }
    }
}

#[cfg(not(feature = "whisper"))]
mod mock_impl {
    use super::*;
    use tracing::{debug, warn};

    pub struct WhisperEngine {
        config: WhisperConfig,
    }

    impl WhisperEngine {
        pub fn new(config: WhisperConfig) -> Result<Self, EngineError> {
            config.validate()?;
            warn!("using MOCK Whisper engine (whisper feature not enabled)");
            Ok(Self { config })
        }
    }

    impl SpeechEngine for WhisperEngine {
        fn delivery_mode(&self) -> DeliveryMode {
            DeliveryMode::Windowed
        }

        fn transcribe(
            &mut self,
            chunk: &AudioChunk,
        ) -> Result<Vec<TranscriptEvent>, EngineError> {
            debug!(
                samples = chunk.len(),
                language = %self.config.language,
                "MOCK transcription, hearing silence"
            );
            Ok(Vec::new())
        }
    }
}

#[cfg(feature = "whisper")]
pub use real_impl::WhisperEngine;

#[cfg(not(feature = "whisper"))]
pub use mock_impl::WhisperEngine;
