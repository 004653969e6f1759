/// Nova assistant binary
///
/// Stands the whole pipeline up: microphone capture, speech engine, wake
/// gating, intent resolution and action dispatch, then runs until Ctrl+C.

use action_executor::{Announcer, SystemActions, TtsAnnouncer};
use audio_pipeline::{list_input_devices, Chunker, MicCapture, SampleQueue, CANDIDATE_RATES};
use clap::Parser;
use intent_resolver::{ConfusionTable, IntentRouter, WakeGate};
use nova_assistant::{Dispatcher, NovaConfig, ProcessingLoop};
use std::path::PathBuf;
use std::sync::Arc;
use stt_engine::{SpeechEngine, WhisperConfig, WhisperEngine};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "nova", version, about = "Nova wake-word voice assistant")]
struct Cli {
    /// List input devices and exit
    #[arg(long)]
    list_devices: bool,

    /// Input device index (defaults to the system default device)
    #[arg(long)]
    device: Option<usize>,

    /// Path to a JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path to the Whisper model file
    #[arg(long)]
    model: Option<PathBuf>,

    /// Verbose logging
    #[arg(long)]
    debug: bool,

    /// Skip wake phrases entirely and treat every utterance as a command
    #[arg(long)]
    bypass_wake: bool,
}

fn init_tracing(debug: bool) {
    let default_filter = if debug {
        "nova_assistant=debug,audio_pipeline=debug,stt_engine=debug,intent_resolver=debug,action_executor=debug"
    } else {
        "info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn fatal(message: &str, error: impl std::fmt::Display) -> ! {
    error!("{message}: {error}");
    std::process::exit(1);
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    if cli.list_devices {
        match list_input_devices() {
            Ok(devices) => {
                for device in devices {
                    let marker = if device.default { " (default)" } else { "" };
                    println!("{}: {}{}", device.index, device.name, marker);
                }
            }
            Err(e) => fatal("Failed to enumerate input devices", e),
        }
        return;
    }

    let mut config = match &cli.config {
        Some(path) => match NovaConfig::load(path) {
            Ok(config) => config,
            Err(e) => fatal("Failed to load config", e),
        },
        None => NovaConfig::default(),
    };
    if cli.bypass_wake {
        config.start_awake = true;
        config.stay_awake = true;
    }
    if let Err(e) = config.validate() {
        fatal("Invalid configuration", e);
    }

    // Engine init comes first so a missing model fails before the
    // microphone is touched.
    let whisper_config = WhisperConfig {
        model_path: cli
            .model
            .clone()
            .unwrap_or_else(|| WhisperConfig::default().model_path),
        ..WhisperConfig::default()
    };
    let engine: Box<dyn SpeechEngine> = match WhisperEngine::new(whisper_config) {
        Ok(engine) => Box::new(engine),
        Err(e) => fatal("Failed to initialize speech engine", e),
    };

    let gate = match WakeGate::new(&config.wake_phrases, config.start_awake, config.stay_awake) {
        Ok(gate) => gate,
        Err(e) => fatal("Invalid wake phrase", e),
    };
    let confusions = match ConfusionTable::new(config.confusions.iter()) {
        Ok(table) => table,
        Err(e) => fatal("Invalid confusion table", e),
    };
    let router = match IntentRouter::new(
        config.apps.clone(),
        config.sites.clone(),
        config.app_aliases.clone(),
        config.site_aliases.clone(),
    ) {
        Ok(router) => router,
        Err(e) => fatal("Invalid command grammar", e),
    };

    // The capture rate is unknown until the device opens, so size the
    // queue for the largest candidate rate to guarantee a full window
    // always fits.
    let max_rate = CANDIDATE_RATES.into_iter().max().unwrap_or(48_000);
    let queue = Arc::new(SampleQueue::with_capacity(
        SampleQueue::capacity_for_window(max_rate, config.window_secs),
    ));
    let mut capture = match MicCapture::start(cli.device, &CANDIDATE_RATES, Arc::clone(&queue)) {
        Ok(capture) => capture,
        Err(e) => fatal("Failed to start microphone capture", e),
    };

    let chunker = Chunker::with_window(
        Arc::clone(&queue),
        engine.delivery_mode(),
        capture.sample_rate(),
        config.window_secs,
    );

    let announcer = Arc::new(TtsAnnouncer::new());
    let dispatcher = Dispatcher::new(
        Arc::new(SystemActions::new()),
        announcer.clone(),
        config.apps.clone(),
        config.sites.clone(),
        config.screenshot_dir.clone(),
    );

    let cancel = CancellationToken::new();
    let looper = ProcessingLoop::new(
        chunker,
        engine,
        gate,
        confusions,
        router,
        dispatcher,
        cancel.clone(),
    );

    announcer.announce("Nova online").await;
    info!("Nova is listening (Ctrl+C to stop)");

    let task = tokio::spawn(looper.run());

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to wait for Ctrl+C: {e}");
    }

    info!("shutting down");
    capture.stop();
    cancel.cancel();
    let _ = task.await;
}
