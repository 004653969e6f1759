/// Registries and alias tables consumed by the resolver
///
/// A registry is an ordered mapping from canonical key to payload (a
/// filesystem path or URL). Insertion order is the defined iteration
/// order; the fuzzy resolver's tie-break depends on it, so a plain map
/// type is not a substitute.

use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Duplicate registry key: {0}")]
    DuplicateKey(String),

    #[error("Empty registry key")]
    EmptyKey,
}

/// One registry row: canonical key and its launch target.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistryEntry {
    pub key: String,
    pub target: String,
}

/// Ordered key → payload mapping, loaded once at startup, read-only after.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct Registry {
    entries: Vec<RegistryEntry>,
}

impl Registry {
    /// Build from `(key, target)` pairs, keeping the first occurrence of a
    /// duplicated key.
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut registry = Self::default();
        for (key, target) in entries {
            let key = key.into();
            if registry.contains(&key) {
                warn!(%key, "duplicate registry key ignored");
                continue;
            }
            registry.entries.push(RegistryEntry {
                key,
                target: target.into(),
            });
        }
        registry
    }

    /// Check the uniqueness invariant; deserialized registries bypass
    /// `from_entries`, so config loading calls this.
    pub fn validate(&self) -> Result<(), RegistryError> {
        let mut seen = HashMap::new();
        for entry in &self.entries {
            if entry.key.trim().is_empty() {
                return Err(RegistryError::EmptyKey);
            }
            if seen.insert(entry.key.as_str(), ()).is_some() {
                return Err(RegistryError::DuplicateKey(entry.key.clone()));
            }
        }
        Ok(())
    }

    /// Payload for an exact key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.target.as_str())
    }

    /// The stored key matching `key` exactly, borrowed from the registry.
    pub fn canonical_key(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.key.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|e| e.key == key)
    }

    /// Keys in definition order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Free-form phrase → canonical registry key substitutions, applied before
/// fuzzy matching.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct AliasTable(HashMap<String, String>);

impl AliasTable {
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// The canonical form of `phrase`, or `phrase` itself when unaliased.
    pub fn canonical<'a>(&'a self, phrase: &'a str) -> &'a str {
        self.0.get(phrase).map(String::as_str).unwrap_or(phrase)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
