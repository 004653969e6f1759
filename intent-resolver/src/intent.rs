/// Typed meaning of a spoken command, ready for dispatch.

/// Resolved command intent. Constructed once by the router, consumed once
/// by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Web search for a free-form query.
    Search { query: String },

    /// Launch a registered application (key is canonical registry key).
    OpenApp { key: String },

    /// Open a registered website (key is canonical registry key).
    OpenSite { key: String },

    /// Close the foreground window. Any spoken target name is advisory only.
    Close,

    /// Report the current time.
    Time,

    /// Raise system volume.
    VolumeUp,

    /// Lower system volume.
    VolumeDown,

    /// Mute system audio.
    Mute,

    /// Capture a screenshot.
    Screenshot,

    /// An "open" remainder that matched neither registry; the dispatcher
    /// tells the user no app like `phrase` was found.
    UnknownApp { phrase: String },

    /// Text that passed to the router but resolved to no command.
    Unresolved,
}
