/// Transcript normalization and phonetic confusion correction
///
/// Raw ASR output is lowercased and whitespace-collapsed before any
/// matching happens. The confusion table then rewrites known
/// mis-transcriptions, longest key first so multi-word entries are never
/// corrupted by their shorter fragments.

use regex::Regex;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum ConfusionError {
    #[error("Invalid confusion key: {0:?}")]
    InvalidKey(String),
}

/// Lowercase, collapse internal whitespace runs, trim ends.
///
/// Pure and idempotent: `normalize(normalize(x)) == normalize(x)`.
pub fn normalize(raw: &str) -> String {
    raw.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

struct ConfusionRule {
    key: String,
    pattern: Regex,
    correction: String,
}

/// Static corrections for commonly mis-transcribed tokens and phrases.
///
/// Entries are applied as whole-word substitutions in longest-key-first
/// order. Corrections may be empty (filler removal). `apply` is idempotent
/// as long as no correction re-triggers the table; the constructor checks
/// this and warns about violating entries.
pub struct ConfusionTable {
    rules: Vec<ConfusionRule>,
}

impl ConfusionTable {
    /// Build a table from `(mis-heard, correction)` pairs. Keys and
    /// corrections are normalized; empty keys are rejected.
    pub fn new<I, K, V>(entries: I) -> Result<Self, ConfusionError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut rules = Vec::new();
        for (key, correction) in entries {
            let key = normalize(key.as_ref());
            if key.is_empty() {
                return Err(ConfusionError::InvalidKey(key));
            }
            let pattern = Regex::new(&format!(r"\b{}\b", regex::escape(&key)))
                .map_err(|_| ConfusionError::InvalidKey(key.clone()))?;
            rules.push(ConfusionRule {
                key,
                pattern,
                correction: normalize(correction.as_ref()),
            });
        }

        // Longest key first; ties broken alphabetically so application
        // order is deterministic regardless of the source map's iteration.
        rules.sort_by(|a, b| b.key.len().cmp(&a.key.len()).then(a.key.cmp(&b.key)));

        let table = Self { rules };
        for rule in &table.rules {
            if !rule.correction.is_empty() {
                let reapplied = table.substitute(&rule.correction);
                if normalize(&reapplied) != rule.correction {
                    warn!(
                        correction = %rule.correction,
                        rewritten = %normalize(&reapplied),
                        "confusion correction re-triggers the table; apply() will not be idempotent for it"
                    );
                }
            }
        }
        debug!(rules = table.rules.len(), "confusion table loaded");
        Ok(table)
    }

    /// Empty table; `apply` becomes normalization only.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Apply every correction to already-normalized text, then re-collapse
    /// whitespace left behind by filler removal.
    pub fn apply(&self, canonical: &str) -> String {
        normalize(&self.substitute(canonical))
    }

    fn substitute(&self, text: &str) -> String {
        let mut out = text.to_string();
        for rule in &self.rules {
            if rule.pattern.is_match(&out) {
                out = rule
                    .pattern
                    .replace_all(&out, regex::NoExpand(&rule.correction))
                    .into_owned();
            }
        }
        out
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
