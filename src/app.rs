// SPDX-License-Identifier: MPL-2.0

//! Clock Application Core
//!
//! [`ClockApp`] owns the one live [`Settings`] value and is the only thing
//! that writes to it. Everything that can change the settings (the tick
//! timer, network results, color picks, the preferences form) arrives as an
//! [`Event`] and goes through [`ClockApp::update`], which answers with a
//! [`Command`] for the event loop to carry out.
//!
//! # Source Precedence
//!
//! 1. Hard-coded defaults
//! 2. The local settings file (created with the defaults on first run)
//! 3. The network settings file, if `use-net-settings` is on
//!
//! Each source is a partial patch over the previous one.

use std::path::PathBuf;

use crate::config::{Rgb, Settings};
use crate::error::LoadError;
use crate::loader::{self, Fetch};
use crate::preferences::{self, Outcome, PreferenceForm};
use crate::scheduler::{PollAction, PollScheduler};
use crate::store;

// ============================================================================
// Message Types
// ============================================================================

/// Inputs to the application.
#[derive(Debug)]
pub enum Event {
    /// The refresh interval elapsed.
    Tick,

    /// A background color was picked.
    PickBackground(Rgb),

    /// A text color was picked.
    PickForeground(Rgb),

    /// Open the preferences form from the current settings.
    OpenPreferences,

    /// Input for the open preferences form.
    Preference(preferences::Message),

    /// The fetch worker finished a request.
    NetworkFetched(Result<String, LoadError>),

    /// Fetch the network settings now.
    ReloadNetwork,

    /// Save menu action.
    Save,

    /// Save and quit.
    Exit,

    /// Something on screen changed outside the settings (typed input,
    /// terminal resize).
    Redraw,
}

/// Work the event loop must perform after an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    None,
    /// Fetch settings text from this URL and report back with
    /// [`Event::NetworkFetched`].
    Fetch(String),
    Exit,
}

/// Outcome of the last settings pass, shown as a title suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    Error(&'static str),
}

// ============================================================================
// Application Model
// ============================================================================

pub struct ClockApp {
    /// Live configuration
    settings: Settings,
    /// Local settings file, written on every save
    settings_path: PathBuf,
    /// Network poll timing
    scheduler: PollScheduler,
    /// Result of the most recent apply
    status: Status,
    /// Preferences form, while open
    preferences: Option<PreferenceForm>,
}

impl ClockApp {
    /// Start from defaults without reading any source.
    pub fn new(settings_path: impl Into<PathBuf>) -> Self {
        let settings = Settings::default();
        Self {
            scheduler: PollScheduler::new(&settings),
            settings,
            settings_path: settings_path.into(),
            status: Status::Ok,
            preferences: None,
        }
    }

    /// Build the startup settings: defaults, then the local file, then the
    /// network file when enabled. The network request blocks.
    pub fn load(settings_path: impl Into<PathBuf>, fetcher: &dyn Fetch) -> Self {
        let mut app = Self::new(settings_path);

        match loader::load_or_bootstrap(&app.settings_path) {
            Ok(text) => {
                app.apply_payload(&text, "file");
            }
            Err(e) => log::error!("Could not load local settings, using defaults: {}", e),
        }

        if app.settings.use_net_settings {
            let url = app.settings.settings_url.clone();
            match fetcher.fetch(&url) {
                Ok(text) => {
                    app.apply_payload(&text, "network");
                }
                Err(e) => log::warn!("Network settings unavailable at startup: {}", e),
            }
        }

        log::info!(
            "Settings loaded: title={:?}, query={}s, refresh={}ms, net={}",
            app.settings.title,
            app.settings.query_interval,
            app.settings.refresh_interval,
            app.settings.use_net_settings
        );
        app
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn preferences(&self) -> Option<&PreferenceForm> {
        self.preferences.as_ref()
    }

    /// Title to display, with an error marker when the last pass failed.
    pub fn display_title(&self) -> String {
        match self.status {
            Status::Ok => self.settings.title.clone(),
            Status::Error(marker) => format!("{} - {}", self.settings.title, marker),
        }
    }

    /// Handle one event.
    pub fn update(&mut self, event: Event) -> Command {
        match event {
            Event::Tick => {
                if !self.settings.use_net_settings {
                    self.scheduler.reset();
                    return Command::None;
                }
                if self.scheduler.tick() == PollAction::Poll {
                    log::info!("Polling network settings");
                    return Command::Fetch(self.settings.settings_url.clone());
                }
            }
            Event::PickBackground(color) => {
                self.settings.background = color;
                self.persist();
            }
            Event::PickForeground(color) => {
                self.settings.foreground = color;
                self.persist();
            }
            Event::OpenPreferences => {
                self.preferences = Some(PreferenceForm::from_settings(&self.settings));
            }
            Event::Preference(message) => return self.update_preferences(message),
            Event::NetworkFetched(result) => self.finish_fetch(result),
            Event::ReloadNetwork => {
                if self.settings.use_net_settings {
                    return self.request_reload();
                }
                log::info!("Reload ignored, network settings are disabled");
            }
            Event::Save => self.persist(),
            Event::Exit => {
                self.persist();
                return Command::Exit;
            }
            Event::Redraw => {}
        }
        Command::None
    }

    fn update_preferences(&mut self, message: preferences::Message) -> Command {
        let Some(form) = self.preferences.as_mut() else {
            log::warn!("Preference input with no form open: {:?}", message);
            return Command::None;
        };

        match form.update(message) {
            Outcome::Editing => Command::None,
            Outcome::Cancel => {
                self.preferences = None;
                Command::None
            }
            Outcome::Save => {
                if let Some(form) = self.preferences.take() {
                    form.apply_to(&mut self.settings);
                }
                self.scheduler.reconfigure(&self.settings);
                let command = if self.settings.use_net_settings {
                    self.request_reload()
                } else {
                    Command::None
                };
                self.persist();
                command
            }
        }
    }

    fn request_reload(&mut self) -> Command {
        if self.scheduler.begin() {
            Command::Fetch(self.settings.settings_url.clone())
        } else {
            log::debug!("Network fetch already running");
            Command::None
        }
    }

    fn finish_fetch(&mut self, result: Result<String, LoadError>) {
        let success = match result {
            Ok(_) if !self.settings.use_net_settings => {
                log::info!("Discarding network settings, network settings were disabled");
                true
            }
            Ok(text) => self.apply_payload(&text, "network"),
            Err(e) => {
                log::warn!("Failed to fetch network settings: {}", e);
                false
            }
        };
        self.scheduler.complete(success);
    }

    /// Apply a payload and record the outcome. Returns whether it parsed.
    fn apply_payload(&mut self, text: &str, source: &str) -> bool {
        let result = store::apply(text, &mut self.settings);
        self.scheduler.reconfigure(&self.settings);

        match result {
            Ok(()) => {
                log::debug!("Applied {} settings", source);
                self.status = Status::Ok;
                true
            }
            Err(e) => {
                log::error!("Error in {} settings: {}", source, e);
                self.status = Status::Error(e.title_marker());
                false
            }
        }
    }

    fn persist(&self) {
        if let Err(e) = loader::save(&self.settings_path, &self.settings) {
            log::error!("Unable to save settings: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_payload;
    use std::fs;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Serves a fixed body, or fails when there is none.
    struct StubFetch {
        body: Option<String>,
        calls: Arc<AtomicUsize>,
    }

    impl StubFetch {
        fn serving(body: Option<&str>) -> Self {
            Self { body: body.map(str::to_string), calls: Arc::default() }
        }
    }

    impl Fetch for StubFetch {
        fn fetch(&self, url: &str) -> Result<String, LoadError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.body
                .clone()
                .ok_or(LoadError::Status { url: url.to_string(), status: 503 })
        }
    }

    fn offline() -> Result<String, LoadError> {
        Err(LoadError::Status { url: "http://test".into(), status: 500 })
    }

    fn write_settings(dir: &tempfile::TempDir, text: &str) -> PathBuf {
        let path = dir.path().join("clock_settings");
        fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn first_run_bootstraps_the_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clock_settings");

        let app = ClockApp::load(&path, &StubFetch::serving(None));

        assert_eq!(fs::read_to_string(&path).unwrap(), default_payload());
        assert_eq!(app.settings(), &Settings::default());
        assert_eq!(app.status(), Status::Ok);
    }

    #[test]
    fn network_patch_overrides_file_fields_it_mentions() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_settings(&dir, "title::File%Clock\nquery-interval::30\nuse-net-settings::true\n");

        let app = ClockApp::load(&path, &StubFetch::serving(Some("query-interval::90\n")));

        assert_eq!(app.settings().title, "File Clock");
        assert_eq!(app.settings().query_interval.get(), 90);
    }

    #[test]
    fn network_is_skipped_when_disabled_in_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_settings(&dir, "use-net-settings::false\n");
        let fetch = StubFetch::serving(Some("title::Remote\n"));
        let calls = Arc::clone(&fetch.calls);

        let app = ClockApp::load(&path, &fetch);

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_ne!(app.settings().title, "Remote");
    }

    #[test]
    fn parse_error_marks_title_until_next_success() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_settings(&dir, "title::Desk\nrefresh-interval::fast\nuse-net-settings::false\n");

        let mut app = ClockApp::load(&path, &StubFetch::serving(None));
        assert_eq!(app.display_title(), "Desk - Parse Error");
        assert!(app.settings().use_net_settings, "fields after the bad line stay unapplied");

        app.update(Event::ReloadNetwork);
        app.update(Event::NetworkFetched(Ok("title::Desk\n".into())));
        assert_eq!(app.display_title(), "Desk");
    }

    #[test]
    fn failed_poll_doubles_the_next_wait() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_settings(&dir, "query-interval::1\nrefresh-interval::500\n");
        let mut app = ClockApp::load(&path, &StubFetch::serving(Some("")));

        let ticks_until_fetch = |app: &mut ClockApp| {
            (1..=100)
                .find(|_| matches!(app.update(Event::Tick), Command::Fetch(_)))
                .expect("never polled")
        };

        assert_eq!(ticks_until_fetch(&mut app), 2);
        app.update(Event::NetworkFetched(offline()));
        assert_eq!(ticks_until_fetch(&mut app), 4);
        app.update(Event::NetworkFetched(Ok(String::new())));
        assert_eq!(ticks_until_fetch(&mut app), 2);
    }

    #[test]
    fn no_polling_while_network_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_settings(&dir, "query-interval::1\nuse-net-settings::false\n");
        let mut app = ClockApp::load(&path, &StubFetch::serving(None));

        for _ in 0..20 {
            assert_eq!(app.update(Event::Tick), Command::None);
        }
        assert_eq!(app.update(Event::ReloadNetwork), Command::None);
    }

    #[test]
    fn redraw_does_not_advance_polling() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_settings(&dir, "query-interval::1\nrefresh-interval::500\n");
        let mut app = ClockApp::load(&path, &StubFetch::serving(Some("")));

        for _ in 0..50 {
            assert_eq!(app.update(Event::Redraw), Command::None);
        }
        assert_eq!(app.update(Event::Tick), Command::None);
        assert!(matches!(app.update(Event::Tick), Command::Fetch(_)));
    }

    #[test]
    fn oversized_query_interval_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_settings(&dir, "use-net-settings::false\nquery-interval::99999999999\n");
        let app = ClockApp::load(&path, &StubFetch::serving(None));

        assert!(app.display_title().ends_with(" - Parse Error"));
        assert_eq!(app.settings().query_interval.get(), 60);
    }

    #[test]
    fn color_pick_is_saved_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_settings(&dir, "use-net-settings::false\n");
        let mut app = ClockApp::load(&path, &StubFetch::serving(None));

        app.update(Event::PickBackground(Rgb::new(10, 20, 30)));
        app.update(Event::PickForeground(Rgb::new(200, 210, 220)));

        let mut reread = Settings::default();
        store::apply(&fs::read_to_string(&path).unwrap(), &mut reread).unwrap();
        assert_eq!(reread.background, Rgb::new(10, 20, 30));
        assert_eq!(reread.foreground, Rgb::new(200, 210, 220));
    }

    #[test]
    fn saving_with_network_settings_keeps_local_lines() {
        let dir = tempfile::tempdir().unwrap();
        let local = "title::Local\nuse-net-settings::true\n";
        let path = write_settings(&dir, local);
        let mut app = ClockApp::load(&path, &StubFetch::serving(Some("title::Remote\n")));
        assert_eq!(app.settings().title, "Remote");

        assert_eq!(app.update(Event::Exit), Command::Exit);
        assert_eq!(fs::read_to_string(&path).unwrap(), local);
    }

    #[test]
    fn preference_save_applies_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_settings(&dir, "use-net-settings::false\n");
        let mut app = ClockApp::load(&path, &StubFetch::serving(None));

        app.update(Event::OpenPreferences);
        app.update(Event::Preference(preferences::Message::UpdateTitle("Den Clock".into())));
        app.update(Event::Preference(preferences::Message::UpdateQueryInterval("5".into())));
        assert_eq!(app.update(Event::Preference(preferences::Message::Save)), Command::None);

        assert!(app.preferences().is_none());
        assert_eq!(app.settings().title, "Den Clock");
        let saved = fs::read_to_string(&path).unwrap();
        assert!(saved.contains("title::Den%Clock\n"));
        assert!(saved.contains("query-interval::5\n"));
    }

    #[test]
    fn enabling_network_in_preferences_reloads_immediately() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_settings(&dir, "use-net-settings::false\nsettings-url::http://example.org/s\n");
        let mut app = ClockApp::load(&path, &StubFetch::serving(None));

        app.update(Event::OpenPreferences);
        app.update(Event::Preference(preferences::Message::ToggleUseNet(true)));
        let command = app.update(Event::Preference(preferences::Message::Save));

        assert_eq!(command, Command::Fetch("http://example.org/s".into()));
        assert!(app.settings().use_net_settings);
    }

    #[test]
    fn cancel_discards_preference_edits() {
        let mut app = ClockApp::new("unused");
        app.update(Event::OpenPreferences);
        app.update(Event::Preference(preferences::Message::ToggleUseNet(false)));
        app.update(Event::Preference(preferences::Message::UpdateTitle("Nope".into())));
        app.update(Event::Preference(preferences::Message::Cancel));

        assert!(app.preferences().is_none());
        assert_eq!(app.settings(), &Settings::default());
    }
}
