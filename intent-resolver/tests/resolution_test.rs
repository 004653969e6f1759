/// End-to-end resolution tests: raw transcript through normalization,
/// confusion correction, wake gating and routing to a typed intent.

use intent_resolver::{
    normalize, AliasTable, ConfusionTable, GateDecision, Intent, IntentRouter, Registry,
    SessionMode, WakeGate,
};

struct Resolver {
    gate: WakeGate,
    confusions: ConfusionTable,
    router: IntentRouter,
}

fn resolver(start_awake: bool, stay_awake: bool) -> Resolver {
    let wake_phrases: Vec<String> = ["hey nova", "hello nova", "hey noah", "hey novaa"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let apps = Registry::from_entries([
        ("chrome", "google-chrome"),
        ("vscode", "code"),
        ("spotify", "spotify"),
        ("calculator", "gnome-calculator"),
    ]);
    let sites = Registry::from_entries([
        ("google", "https://www.google.com"),
        ("youtube", "https://www.youtube.com"),
        ("gmail", "https://mail.google.com"),
        ("google drive", "https://drive.google.com"),
    ]);
    let app_aliases = AliasTable::from_entries([("google", "chrome"), ("code", "vscode")]);
    let site_aliases = AliasTable::from_entries([("yt", "youtube"), ("mail", "gmail")]);
    let confusions = ConfusionTable::new([
        ("grown", "chrome"),
        ("goal", "chrome"),
        ("rome", "chrome"),
        ("googly", "google"),
        ("blows", "close"),
    ])
    .unwrap();

    Resolver {
        gate: WakeGate::new(&wake_phrases, start_awake, stay_awake).unwrap(),
        confusions,
        router: IntentRouter::new(apps, sites, app_aliases, site_aliases).unwrap(),
    }
}

/// Run one final transcript through the whole chain, settling afterwards
/// the way the dispatcher does.
fn feed(r: &mut Resolver, raw: &str) -> Option<Intent> {
    let canonical = normalize(raw);
    if canonical.is_empty() {
        return None;
    }
    match r.gate.observe(&canonical) {
        GateDecision::Ignored | GateDecision::Woke => None,
        GateDecision::Command(stripped) => {
            let corrected = r.confusions.apply(&stripped);
            if corrected.is_empty() {
                return None;
            }
            let intent = r.router.route(&corrected);
            r.gate.settle();
            Some(intent)
        }
    }
}

#[test]
fn test_asleep_speech_never_resolves() {
    let mut r = resolver(false, false);
    assert_eq!(feed(&mut r, "open chrome"), None);
    assert_eq!(feed(&mut r, "search for pizza"), None);
    assert_eq!(r.gate.mode(), SessionMode::Asleep);
}

#[test]
fn test_wake_then_command_then_sleep() {
    let mut r = resolver(false, false);
    assert_eq!(feed(&mut r, "Hey Nova"), None);
    assert_eq!(r.gate.mode(), SessionMode::Awake);

    assert_eq!(
        feed(&mut r, "search for pizza near me"),
        Some(Intent::Search {
            query: "pizza near me".to_string()
        })
    );
    assert_eq!(r.gate.mode(), SessionMode::Asleep);

    // Back asleep, the next command without a wake phrase is dropped.
    assert_eq!(feed(&mut r, "open chrome"), None);
}

#[test]
fn test_single_utterance_wake_and_command() {
    let mut r = resolver(false, false);
    // Waking and commanding in one breath takes two finals: the first
    // wakes, the second carries the command.
    assert_eq!(feed(&mut r, "hey nova open youtube"), None);
    assert_eq!(
        feed(&mut r, "hey nova open youtube"),
        Some(Intent::OpenSite {
            key: "youtube".to_string()
        })
    );
}

#[test]
fn test_confusion_correction_reaches_router() {
    let mut r = resolver(true, true);
    assert_eq!(
        feed(&mut r, "open grown"),
        Some(Intent::OpenApp {
            key: "chrome".to_string()
        })
    );
    assert_eq!(
        feed(&mut r, "blows that window"),
        Some(Intent::Close)
    );
}

#[test]
fn test_fuzzy_app_resolution() {
    let mut r = resolver(true, true);
    assert_eq!(
        feed(&mut r, "open calculater"),
        Some(Intent::OpenApp {
            key: "calculator".to_string()
        })
    );
}

#[test]
fn test_unknown_open_target() {
    let mut r = resolver(true, false);
    assert_eq!(
        feed(&mut r, "open zzzznotreal"),
        Some(Intent::UnknownApp {
            phrase: "zzzznotreal".to_string()
        })
    );
    // Even a failed resolution settles the session.
    assert_eq!(r.gate.mode(), SessionMode::Asleep);
}

#[test]
fn test_non_command_while_awake_is_unresolved() {
    let mut r = resolver(true, false);
    assert_eq!(
        feed(&mut r, "the weather is nice today"),
        Some(Intent::Unresolved)
    );
    assert_eq!(r.gate.mode(), SessionMode::Asleep);
}

#[test]
fn test_stay_awake_handles_consecutive_commands() {
    let mut r = resolver(true, true);
    assert_eq!(
        feed(&mut r, "open chrome"),
        Some(Intent::OpenApp {
            key: "chrome".to_string()
        })
    );
    assert_eq!(feed(&mut r, "what time is it"), Some(Intent::Time));
    assert_eq!(feed(&mut r, "volume up"), Some(Intent::VolumeUp));
    assert_eq!(r.gate.mode(), SessionMode::Awake);
}

#[test]
fn test_wake_phrase_alone_while_awake_is_no_command() {
    let mut r = resolver(false, true);
    assert_eq!(feed(&mut r, "hey nova"), None);
    // Awake now; a bare repeated wake phrase strips to nothing.
    assert_eq!(feed(&mut r, "hey nova"), None);
    assert_eq!(r.gate.mode(), SessionMode::Awake);
}
