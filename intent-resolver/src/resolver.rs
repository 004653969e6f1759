/// Fuzzy target resolution against a registry
///
/// Exact matches (after alias substitution) short-circuit; otherwise the
/// registry keys are scanned with normalized Levenshtein similarity and the
/// best key at or above the cutoff wins. Ties prefer the shorter key, then
/// the earlier registry entry, so resolution is deterministic.

use crate::registry::{AliasTable, Registry};
use tracing::debug;

/// Minimum normalized similarity for a fuzzy match to count.
pub const SIMILARITY_CUTOFF: f64 = 0.7;

/// Resolve a spoken phrase to a canonical registry key using the default
/// cutoff. Returns `None` when nothing scores high enough.
pub fn resolve_target<'a>(
    phrase: &str,
    registry: &'a Registry,
    aliases: &AliasTable,
) -> Option<&'a str> {
    resolve_target_with_cutoff(phrase, registry, aliases, SIMILARITY_CUTOFF)
}

pub fn resolve_target_with_cutoff<'a>(
    phrase: &str,
    registry: &'a Registry,
    aliases: &AliasTable,
    cutoff: f64,
) -> Option<&'a str> {
    let phrase = phrase.trim().to_lowercase();
    if phrase.is_empty() {
        return None;
    }
    let candidate = aliases.canonical(&phrase);

    if let Some(key) = registry.canonical_key(candidate) {
        return Some(key);
    }

    let mut best: Option<(&str, f64)> = None;
    for key in registry.keys() {
        let score = strsim::normalized_levenshtein(candidate, key);
        let better = match best {
            None => true,
            Some((best_key, best_score)) => {
                score > best_score || (score == best_score && key.len() < best_key.len())
            }
        };
        if better {
            best = Some((key, score));
        }
    }

    match best {
        Some((key, score)) if score >= cutoff => {
            debug!(%phrase, %key, score, "fuzzy registry match");
            Some(key)
        }
        Some((key, score)) => {
            debug!(%phrase, nearest = %key, score, cutoff, "no registry match above cutoff");
            None
        }
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apps() -> Registry {
        Registry::from_entries([
            ("chrome", "google-chrome"),
            ("edge", "microsoft-edge"),
            ("vscode", "code"),
            ("calculator", "gnome-calculator"),
        ])
    }

    fn aliases() -> AliasTable {
        AliasTable::from_entries([("google", "chrome"), ("visual studio code", "vscode")])
    }

    #[test]
    fn test_exact_key() {
        assert_eq!(resolve_target("chrome", &apps(), &aliases()), Some("chrome"));
    }

    #[test]
    fn test_alias_before_matching() {
        assert_eq!(resolve_target("google", &apps(), &aliases()), Some("chrome"));
        assert_eq!(
            resolve_target("Visual Studio Code", &apps(), &aliases()),
            Some("vscode")
        );
    }

    #[test]
    fn test_fuzzy_near_miss() {
        assert_eq!(resolve_target("chrom", &apps(), &aliases()), Some("chrome"));
        assert_eq!(
            resolve_target("calculater", &apps(), &aliases()),
            Some("calculator")
        );
    }

    #[test]
    fn test_below_cutoff() {
        assert_eq!(resolve_target("zzzznotreal", &apps(), &aliases()), None);
        assert_eq!(resolve_target("", &apps(), &aliases()), None);
    }

    #[test]
    fn test_deterministic() {
        let registry = apps();
        let aliases = aliases();
        let first = resolve_target("chrom", &registry, &aliases);
        for _ in 0..10 {
            assert_eq!(resolve_target("chrom", &registry, &aliases), first);
        }
    }

    #[test]
    fn test_tie_prefers_earlier_entry() {
        // "aa" scores 0.5 against both keys; insertion order decides.
        let registry = Registry::from_entries([("ab", "first"), ("ac", "second")]);
        let empty = AliasTable::default();
        assert_eq!(
            resolve_target_with_cutoff("aa", &registry, &empty, 0.4),
            Some("ab")
        );
    }

    #[test]
    fn test_tie_prefers_shorter_key() {
        // "abcd" scores 0.5 against both keys; the shorter key wins even
        // though the longer one comes first.
        let registry = Registry::from_entries([("abcdcdcd", "long"), ("ab", "short")]);
        let empty = AliasTable::default();
        assert_eq!(
            resolve_target_with_cutoff("abcd", &registry, &empty, 0.4),
            Some("ab")
        );
    }
}
