/// Intent resolution core for the Nova voice assistant
///
/// Turns noisy transcripts into typed intents: normalization, phonetic
/// confusion correction, wake gating, intent routing and fuzzy target
/// resolution against the injected app/site registries.

pub mod intent;
pub mod normalize;
pub mod registry;
pub mod resolver;
pub mod router;
pub mod wake;

// Re-export main types
pub use intent::Intent;
pub use normalize::{normalize, ConfusionError, ConfusionTable};
pub use registry::{AliasTable, Registry, RegistryEntry, RegistryError};
pub use resolver::{resolve_target, resolve_target_with_cutoff, SIMILARITY_CUTOFF};
pub use router::{IntentRouter, RouterError, INTENT_VERBS};
pub use wake::{GateDecision, SessionMode, WakeGate, WakeGateError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
