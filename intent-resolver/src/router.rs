/// Command grammar and intent routing
///
/// The grammar is an ordered table of anchored patterns; the first match
/// wins. Before any pattern runs, the leading token is checked against the
/// command verb allow-list so free conversation near the microphone never
/// reaches dispatch.

use crate::intent::Intent;
use crate::registry::{AliasTable, Registry};
use crate::resolver::resolve_target;
use regex::Regex;
use thiserror::Error;
use tracing::debug;

/// Leading tokens that may begin a command. Anything else is dropped
/// before pattern matching.
pub const INTENT_VERBS: [&str; 12] = [
    "open",
    "launch",
    "start",
    "search",
    "google",
    "lookup",
    "close",
    "time",
    "what",
    "volume",
    "mute",
    "screenshot",
];

#[derive(Error, Debug)]
pub enum RouterError {
    #[error("Invalid command pattern: {0}")]
    InvalidPattern(String),
}

struct Rule {
    pattern: Regex,
    build: fn(&IntentRouter, &str) -> Intent,
}

/// Maps corrected command text to a typed intent, resolving open targets
/// against the injected registries.
pub struct IntentRouter {
    apps: Registry,
    sites: Registry,
    app_aliases: AliasTable,
    site_aliases: AliasTable,
    rules: Vec<Rule>,
}

impl IntentRouter {
    pub fn new(
        apps: Registry,
        sites: Registry,
        app_aliases: AliasTable,
        site_aliases: AliasTable,
    ) -> Result<Self, RouterError> {
        let table: [(&str, fn(&IntentRouter, &str) -> Intent); 9] = [
            (r"^(?:search for|google|lookup)\s+(.+)$", Self::build_search),
            (r"^close\s+(.+)$", Self::build_close),
            (r"^(?:open|launch|start)\s+(.+)$", Self::build_open),
            (r"^(?:what\s+time\s+is\s+it|time)$", Self::build_time),
            (r"^(?:volume up|increase volume)$", Self::build_volume_up),
            (r"^(?:volume down|decrease volume)$", Self::build_volume_down),
            (r"^(?:mute|mute volume)$", Self::build_mute),
            (r"^(?:take a screenshot|screenshot)$", Self::build_screenshot),
            // Bare "google <x>" with nothing openable reads as a search.
            (r"^google\s+(.+)$", Self::build_search),
        ];

        let mut rules = Vec::with_capacity(table.len());
        for (source, build) in table {
            let pattern = Regex::new(source)
                .map_err(|e| RouterError::InvalidPattern(format!("{source}: {e}")))?;
            rules.push(Rule { pattern, build });
        }

        Ok(Self {
            apps,
            sites,
            app_aliases,
            site_aliases,
            rules,
        })
    }

    /// Route corrected, wake-stripped text to an intent. Never fails; text
    /// that resolves to nothing comes back as `Intent::Unresolved`.
    pub fn route(&self, corrected: &str) -> Intent {
        let text = corrected.trim();
        if text.is_empty() {
            return Intent::Unresolved;
        }

        let leading = text.split_whitespace().next().unwrap_or("");
        if !INTENT_VERBS.contains(&leading) {
            debug!(%leading, "leading token is not a command verb");
            return Intent::Unresolved;
        }

        for rule in &self.rules {
            if let Some(caps) = rule.pattern.captures(text) {
                let remainder = caps.get(1).map(|m| m.as_str()).unwrap_or("");
                return (rule.build)(self, remainder);
            }
        }

        debug!(%text, "no grammar rule matched");
        Intent::Unresolved
    }

    fn build_search(&self, remainder: &str) -> Intent {
        Intent::Search {
            query: remainder.trim().to_string(),
        }
    }

    fn build_close(&self, _remainder: &str) -> Intent {
        Intent::Close
    }

    /// Two-pass open resolution: app registry first, then site registry,
    /// then a "google <query>" remainder falls through to search.
    fn build_open(&self, remainder: &str) -> Intent {
        let target = Self::trim_qualifiers(remainder);

        if let Some(key) = resolve_target(target, &self.apps, &self.app_aliases) {
            return Intent::OpenApp {
                key: key.to_string(),
            };
        }

        if let Some(key) = resolve_target(target, &self.sites, &self.site_aliases) {
            return Intent::OpenSite {
                key: key.to_string(),
            };
        }

        if let Some(query) = target.strip_prefix("google ") {
            return Intent::Search {
                query: query.trim().to_string(),
            };
        }

        Intent::UnknownApp {
            phrase: target.to_string(),
        }
    }

    fn build_time(&self, _remainder: &str) -> Intent {
        Intent::Time
    }

    fn build_volume_up(&self, _remainder: &str) -> Intent {
        Intent::VolumeUp
    }

    fn build_volume_down(&self, _remainder: &str) -> Intent {
        Intent::VolumeDown
    }

    fn build_mute(&self, _remainder: &str) -> Intent {
        Intent::Mute
    }

    fn build_screenshot(&self, _remainder: &str) -> Intent {
        Intent::Screenshot
    }

    /// Drop trailing " for ..." and " on ..." qualifiers from an open
    /// target ("open spotify for me" names spotify).
    fn trim_qualifiers(remainder: &str) -> &str {
        let head = remainder.split(" for ").next().unwrap_or(remainder);
        head.split(" on ").next().unwrap_or(head).trim()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn router() -> IntentRouter {
        let apps = Registry::from_entries([
            ("chrome", "google-chrome"),
            ("vscode", "code"),
            ("spotify", "spotify"),
        ]);
        let sites = Registry::from_entries([
            ("google", "https://www.google.com"),
            ("youtube", "https://www.youtube.com"),
            ("google drive", "https://drive.google.com"),
        ]);
        let app_aliases = AliasTable::from_entries([("google", "chrome"), ("code", "vscode")]);
        let site_aliases = AliasTable::from_entries([("yt", "youtube"), ("drive", "google drive")]);
        IntentRouter::new(apps, sites, app_aliases, site_aliases).unwrap()
    }

    #[test]
    fn test_gate_rejects_non_command_speech() {
        assert_eq!(router().route("the weather is nice"), Intent::Unresolved);
        assert_eq!(router().route("please open chrome"), Intent::Unresolved);
        assert_eq!(router().route(""), Intent::Unresolved);
    }

    #[test]
    fn test_search() {
        assert_eq!(
            router().route("search for pizza near me"),
            Intent::Search {
                query: "pizza near me".to_string()
            }
        );
        assert_eq!(
            router().route("google rust programming"),
            Intent::Search {
                query: "rust programming".to_string()
            }
        );
    }

    #[test]
    fn test_open_app_before_site() {
        let r = router();
        assert_eq!(
            r.route("open chrome"),
            Intent::OpenApp {
                key: "chrome".to_string()
            }
        );
        // "google" is an app alias, so the app pass claims it before the
        // site registry can.
        assert_eq!(
            r.route("open google"),
            Intent::OpenApp {
                key: "chrome".to_string()
            }
        );
    }

    #[test]
    fn test_open_site() {
        let r = router();
        assert_eq!(
            r.route("open youtube"),
            Intent::OpenSite {
                key: "youtube".to_string()
            }
        );
        assert_eq!(
            r.route("open google drive"),
            Intent::OpenSite {
                key: "google drive".to_string()
            }
        );
    }

    #[test]
    fn test_open_qualifiers_trimmed() {
        assert_eq!(
            router().route("open spotify for me"),
            Intent::OpenApp {
                key: "spotify".to_string()
            }
        );
    }

    #[test]
    fn test_open_unknown_app() {
        assert_eq!(
            router().route("open zzzznotreal"),
            Intent::UnknownApp {
                phrase: "zzzznotreal".to_string()
            }
        );
    }

    #[test]
    fn test_open_google_query_falls_through_to_search() {
        assert_eq!(
            router().route("open google best pizza recipe"),
            Intent::Search {
                query: "best pizza recipe".to_string()
            }
        );
    }

    #[test_case("what time is it", Intent::Time ; "spoken_form")]
    #[test_case("time", Intent::Time ; "bare_form")]
    #[test_case("volume up", Intent::VolumeUp ; "volume_up")]
    #[test_case("volume down", Intent::VolumeDown ; "volume_down")]
    #[test_case("mute", Intent::Mute ; "mute")]
    #[test_case("screenshot", Intent::Screenshot ; "screenshot")]
    fn test_fixed_commands(text: &str, expected: Intent) {
        assert_eq!(router().route(text), expected);
    }

    #[test]
    fn test_close() {
        assert_eq!(router().route("close spotify"), Intent::Close);
        // Bare "close" names no window and resolves to nothing.
        assert_eq!(router().route("close"), Intent::Unresolved);
    }

    #[test]
    fn test_launch_and_start_synonyms() {
        assert_eq!(
            router().route("launch vscode"),
            Intent::OpenApp {
                key: "vscode".to_string()
            }
        );
        assert_eq!(
            router().route("start spotify"),
            Intent::OpenApp {
                key: "spotify".to_string()
            }
        );
    }
}
