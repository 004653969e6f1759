/// OS actions behind an async trait
///
/// `SystemActions` shells out to per-platform helpers (xdg-open, xdotool,
/// osascript and friends) with stdio nulled. Each method reports missing
/// tooling as `ActionError::Unavailable` so the dispatcher can tell the
/// user instead of failing silently.

use crate::platform::Platform;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum ActionError {
    #[error("{0} is not available on this system")]
    Unavailable(&'static str),

    #[error("Failed to launch {0}")]
    LaunchFailed(String),

    #[error("Helper tool failed: {0}")]
    ToolFailed(String),
}

/// Media control keys the executor can press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKey {
    VolumeUp,
    VolumeDown,
    Mute,
}

/// Everything the dispatcher can do to the host OS.
#[async_trait]
pub trait ActionExecutor: Send + Sync {
    /// Launch an application by command name or path.
    async fn open_application(&self, command: &str) -> Result<(), ActionError>;

    /// Open a URL in the default browser.
    async fn open_url(&self, url: &str) -> Result<(), ActionError>;

    /// Press a media key.
    async fn send_media_key(&self, key: MediaKey) -> Result<(), ActionError>;

    /// Capture the screen to `path`.
    async fn capture_screenshot(&self, path: &Path) -> Result<(), ActionError>;

    /// Close the foreground window.
    async fn close_foreground_window(&self) -> Result<(), ActionError>;
}

/// Real executor backed by platform helper tools.
pub struct SystemActions {
    platform: Platform,
}

impl SystemActions {
    pub fn new() -> Self {
        Self {
            platform: Platform::current(),
        }
    }

    pub fn with_platform(platform: Platform) -> Self {
        Self { platform }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// First candidate tool present on PATH.
    fn find_tool(candidates: &[&str]) -> Option<PathBuf> {
        candidates.iter().find_map(|c| which::which(c).ok())
    }

    /// Run a helper to completion with stdio detached.
    async fn run_tool(program: &Path, args: &[&str]) -> Result<(), ActionError> {
        debug!(program = %program.display(), ?args, "running helper tool");
        let status = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|e| ActionError::ToolFailed(format!("{}: {e}", program.display())))?;

        if status.success() {
            Ok(())
        } else {
            Err(ActionError::ToolFailed(format!(
                "{} exited with {status}",
                program.display()
            )))
        }
    }

    /// Spawn a long-lived program and leave it running.
    fn spawn_detached(command: &str, args: &[&str]) -> Result<(), ActionError> {
        let expanded = expand_env_vars(command);
        Command::new(&expanded)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|_| ActionError::LaunchFailed(expanded))?;
        Ok(())
    }
}

impl Default for SystemActions {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ActionExecutor for SystemActions {
    async fn open_application(&self, command: &str) -> Result<(), ActionError> {
        info!(%command, "launching application");
        Self::spawn_detached(command, &[])
    }

    async fn open_url(&self, url: &str) -> Result<(), ActionError> {
        info!(%url, "opening url");
        match self.platform {
            Platform::Linux => {
                let opener = Self::find_tool(&["xdg-open"])
                    .ok_or(ActionError::Unavailable("URL opening"))?;
                Self::run_tool(&opener, &[url]).await
            }
            Platform::MacOS => {
                let opener =
                    Self::find_tool(&["open"]).ok_or(ActionError::Unavailable("URL opening"))?;
                Self::run_tool(&opener, &[url]).await
            }
            Platform::Windows => {
                let cmd = Self::find_tool(&["cmd"])
                    .ok_or(ActionError::Unavailable("URL opening"))?;
                Self::run_tool(&cmd, &["/C", "start", "", url]).await
            }
            Platform::Unknown => Err(ActionError::Unavailable("URL opening")),
        }
    }

    async fn send_media_key(&self, key: MediaKey) -> Result<(), ActionError> {
        match self.platform {
            Platform::Linux => {
                let xdotool = Self::find_tool(&["xdotool"])
                    .ok_or(ActionError::Unavailable("Media key control"))?;
                let keysym = match key {
                    MediaKey::VolumeUp => "XF86AudioRaiseVolume",
                    MediaKey::VolumeDown => "XF86AudioLowerVolume",
                    MediaKey::Mute => "XF86AudioMute",
                };
                Self::run_tool(&xdotool, &["key", keysym]).await
            }
            Platform::MacOS => {
                let osascript = Self::find_tool(&["osascript"])
                    .ok_or(ActionError::Unavailable("Media key control"))?;
                let script = match key {
                    MediaKey::VolumeUp => {
                        "set volume output volume ((output volume of (get volume settings)) + 6)"
                    }
                    MediaKey::VolumeDown => {
                        "set volume output volume ((output volume of (get volume settings)) - 6)"
                    }
                    MediaKey::Mute => "set volume with output muted",
                };
                Self::run_tool(&osascript, &["-e", script]).await
            }
            Platform::Windows | Platform::Unknown => {
                Err(ActionError::Unavailable("Media key control"))
            }
        }
    }

    async fn capture_screenshot(&self, path: &Path) -> Result<(), ActionError> {
        let target = path.to_str().ok_or(ActionError::Unavailable("Screenshot"))?;
        match self.platform {
            Platform::Linux => {
                if let Some(tool) = Self::find_tool(&["gnome-screenshot"]) {
                    return Self::run_tool(&tool, &["-f", target]).await;
                }
                if let Some(tool) = Self::find_tool(&["scrot", "maim"]) {
                    return Self::run_tool(&tool, &[target]).await;
                }
                Err(ActionError::Unavailable("Screenshot"))
            }
            Platform::MacOS => {
                let tool = Self::find_tool(&["screencapture"])
                    .ok_or(ActionError::Unavailable("Screenshot"))?;
                Self::run_tool(&tool, &["-x", target]).await
            }
            Platform::Windows | Platform::Unknown => Err(ActionError::Unavailable("Screenshot")),
        }
    }

    async fn close_foreground_window(&self) -> Result<(), ActionError> {
        match self.platform {
            Platform::Linux => {
                let xdotool = Self::find_tool(&["xdotool"])
                    .ok_or(ActionError::Unavailable("Window control"))?;
                Self::run_tool(&xdotool, &["getactivewindow", "windowclose"]).await
            }
            Platform::MacOS => {
                let osascript = Self::find_tool(&["osascript"])
                    .ok_or(ActionError::Unavailable("Window control"))?;
                let script = r#"tell application "System Events" to keystroke "w" using command down"#;
                Self::run_tool(&osascript, &["-e", script]).await
            }
            Platform::Windows | Platform::Unknown => {
                Err(ActionError::Unavailable("Window control"))
            }
        }
    }
}

/// Expand `$VAR` and `%VAR%` references against the process environment.
/// Unknown variables are left as written.
pub fn expand_env_vars(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '$' => {
                let mut name = String::new();
                while let Some(&next) = chars.peek() {
                    if next.is_alphanumeric() || next == '_' {
                        name.push(next);
                        chars.next();
                    } else {
                        break;
                    }
                }
                if name.is_empty() {
                    out.push('$');
                } else {
                    match std::env::var(&name) {
                        Ok(value) => out.push_str(&value),
                        Err(_) => {
                            out.push('$');
                            out.push_str(&name);
                        }
                    }
                }
            }
            '%' => {
                let mut name = String::new();
                let mut closed = false;
                while let Some(&next) = chars.peek() {
                    if next == '%' {
                        chars.next();
                        closed = true;
                        break;
                    }
                    if next.is_alphanumeric() || next == '_' {
                        name.push(next);
                        chars.next();
                    } else {
                        break;
                    }
                }
                if closed && !name.is_empty() {
                    match std::env::var(&name) {
                        Ok(value) => out.push_str(&value),
                        Err(_) => {
                            out.push('%');
                            out.push_str(&name);
                            out.push('%');
                        }
                    }
                } else {
                    out.push('%');
                    out.push_str(&name);
                    if closed {
                        out.push('%');
                    }
                }
            }
            _ => out.push(c),
        }
    }

    out
}
