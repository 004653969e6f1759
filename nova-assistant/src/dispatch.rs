/// Intent dispatch
///
/// Turns a resolved intent into OS actions plus a spoken confirmation.
/// Action failures become apologetic announcements, never crashes; the
/// microphone loop has to keep running whatever the desktop does.

use action_executor::{ActionError, ActionExecutor, Announcer, MediaKey};
use chrono::Local;
use intent_resolver::{Intent, Registry};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct Dispatcher {
    executor: Arc<dyn ActionExecutor>,
    announcer: Arc<dyn Announcer>,
    apps: Registry,
    sites: Registry,
    screenshot_dir: Option<PathBuf>,
}

impl Dispatcher {
    pub fn new(
        executor: Arc<dyn ActionExecutor>,
        announcer: Arc<dyn Announcer>,
        apps: Registry,
        sites: Registry,
        screenshot_dir: Option<PathBuf>,
    ) -> Self {
        Self {
            executor,
            announcer,
            apps,
            sites,
            screenshot_dir,
        }
    }

    /// Carry out one intent and speak the outcome.
    pub async fn dispatch(&self, intent: Intent) {
        debug!(?intent, "dispatching");
        match intent {
            Intent::Search { query } => self.web_search(&query).await,
            Intent::OpenApp { key } => self.open_app(&key).await,
            Intent::OpenSite { key } => self.open_site(&key).await,
            Intent::Close => self.close_window().await,
            Intent::Time => self.tell_time().await,
            Intent::VolumeUp => self.media_key(MediaKey::VolumeUp, "Volume up.").await,
            Intent::VolumeDown => self.media_key(MediaKey::VolumeDown, "Volume down.").await,
            Intent::Mute => self.media_key(MediaKey::Mute, "Muted.").await,
            Intent::Screenshot => self.screenshot().await,
            Intent::UnknownApp { phrase } => {
                self.announcer
                    .announce(&format!("I couldn't find an app like {phrase}."))
                    .await;
            }
            Intent::Unresolved => {
                self.announcer
                    .announce("Sorry, I didn't catch a command.")
                    .await;
            }
        }
    }

    /// Spoken acknowledgement when a wake phrase lands.
    pub async fn acknowledge_wake(&self) {
        self.announcer.announce("Ready").await;
    }

    /// Spoken notice when a transcription call fails; the chunk is lost
    /// but the user should know they were not heard.
    pub async fn report_hearing_failure(&self) {
        self.announcer.announce("Sorry, I didn't catch that.").await;
    }

    async fn web_search(&self, query: &str) {
        let url = format!(
            "https://www.google.com/search?q={}",
            query.replace(' ', "+")
        );
        match self.executor.open_url(&url).await {
            Ok(()) => {
                self.announcer
                    .announce(&format!("Searching for {query}."))
                    .await
            }
            Err(e) => self.report(e, "search").await,
        }
    }

    async fn open_app(&self, key: &str) {
        let Some(command) = self.apps.get(key) else {
            // The router only emits keys it resolved, so a miss here means
            // the registries were swapped out from under it.
            warn!(%key, "app key missing from registry");
            self.announcer
                .announce(&format!("I couldn't find an app like {key}."))
                .await;
            return;
        };
        match self.executor.open_application(command).await {
            Ok(()) => self.announcer.announce(&format!("Opening {key}.")).await,
            Err(e) => {
                warn!(%key, error = %e, "app launch failed");
                self.announcer
                    .announce(&format!("Couldn't open {key}."))
                    .await;
            }
        }
    }

    async fn open_site(&self, key: &str) {
        let Some(url) = self.sites.get(key) else {
            warn!(%key, "site key missing from registry");
            self.announcer
                .announce(&format!("I couldn't find an app like {key}."))
                .await;
            return;
        };
        match self.executor.open_url(url).await {
            Ok(()) => self.announcer.announce(&format!("Opening {key}.")).await,
            Err(e) => self.report(e, "open").await,
        }
    }

    async fn close_window(&self) {
        match self.executor.close_foreground_window().await {
            Ok(()) => self.announcer.announce("Closed.").await,
            Err(e) => self.report(e, "close").await,
        }
    }

    async fn tell_time(&self) {
        let now = Local::now().format("%I:%M %p");
        self.announcer.announce(&format!("It's {now}.")).await;
    }

    async fn media_key(&self, key: MediaKey, confirmation: &str) {
        match self.executor.send_media_key(key).await {
            Ok(()) => self.announcer.announce(confirmation).await,
            Err(e) => self.report(e, "volume control").await,
        }
    }

    async fn screenshot(&self) {
        let dir = self
            .screenshot_dir
            .clone()
            .or_else(dirs::picture_dir)
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        if let Err(e) = std::fs::create_dir_all(&dir) {
            warn!(dir = %dir.display(), error = %e, "cannot create screenshot directory");
            self.announcer.announce("Couldn't take a screenshot.").await;
            return;
        }

        let filename = Local::now()
            .format("nova_screenshot_%Y%m%d_%H%M%S.png")
            .to_string();
        let path = dir.join(filename);

        match self.executor.capture_screenshot(&path).await {
            Ok(()) => self.announcer.announce("Screenshot saved.").await,
            Err(e) => self.report(e, "screenshot").await,
        }
    }

    async fn report(&self, error: ActionError, what: &str) {
        warn!(%error, what, "action failed");
        let message = match error {
            ActionError::Unavailable(capability) => {
                format!("{capability} is not available here.")
            }
            _ => format!("Sorry, the {what} didn't work."),
        };
        self.announcer.announce(&message).await;
    }
}
