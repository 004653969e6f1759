/// The processing loop
///
/// Polls the chunker on a fixed interval, runs each chunk through the
/// speech engine, and walks every transcript event through the wake gate,
/// confusion table, router and dispatcher. Cancellation stops the loop at
/// the next poll.

use crate::dispatch::Dispatcher;
use intent_resolver::{normalize, ConfusionTable, GateDecision, IntentRouter, WakeGate};
use std::time::Duration;
use stt_engine::{SpeechEngine, TranscriptEvent, TranscriptKind};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// How often the queue is checked for a ready chunk.
pub const POLL_INTERVAL: Duration = Duration::from_millis(200);

pub struct ProcessingLoop {
    chunker: audio_pipeline::Chunker,
    engine: Box<dyn SpeechEngine>,
    gate: WakeGate,
    confusions: ConfusionTable,
    router: IntentRouter,
    dispatcher: Dispatcher,
    cancel: CancellationToken,
}

impl ProcessingLoop {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        chunker: audio_pipeline::Chunker,
        engine: Box<dyn SpeechEngine>,
        gate: WakeGate,
        confusions: ConfusionTable,
        router: IntentRouter,
        dispatcher: Dispatcher,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            chunker,
            engine,
            gate,
            confusions,
            router,
            dispatcher,
            cancel,
        }
    }

    /// Run until cancelled.
    pub async fn run(mut self) {
        info!("processing loop started");
        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    info!("processing loop stopping");
                    return;
                }
                _ = tokio::time::sleep(POLL_INTERVAL) => {}
            }

            while let Some(chunk) = self.chunker.poll() {
                let events = match self.engine.transcribe(&chunk) {
                    Ok(events) => events,
                    Err(e) => {
                        warn!(seq = chunk.seq(), error = %e, "transcription failed, chunk skipped");
                        self.dispatcher.report_hearing_failure().await;
                        continue;
                    }
                };
                for event in &events {
                    self.handle_event(event).await;
                }
            }
        }
    }

    /// Walk one transcript event through gate, correction, routing and
    /// dispatch.
    pub async fn handle_event(&mut self, event: &TranscriptEvent) {
        let canonical = normalize(&event.text);
        if canonical.is_empty() {
            return;
        }

        match event.kind {
            TranscriptKind::Partial => {
                if self.gate.observe_partial(&canonical) == GateDecision::Woke {
                    self.dispatcher.acknowledge_wake().await;
                }
            }
            TranscriptKind::Final => match self.gate.observe(&canonical) {
                GateDecision::Ignored => {}
                GateDecision::Woke => self.dispatcher.acknowledge_wake().await,
                GateDecision::Command(stripped) => {
                    let corrected = self.confusions.apply(&stripped);
                    if corrected.is_empty() {
                        // The whole utterance was the wake phrase; keep
                        // listening for the actual command.
                        debug!("wake phrase only, awaiting command");
                        return;
                    }
                    let intent = self.router.route(&corrected);
                    debug!(transcript = %corrected, ?intent, "command resolved");
                    self.dispatcher.dispatch(intent).await;
                    self.gate.settle();
                }
            },
        }
    }
}
