// SPDX-License-Identifier: MPL-2.0

//! Preferences form
//!
//! Holds the text the user is typing for each editable setting. Nothing
//! touches the live [`Settings`] until the form is saved; cancelling simply
//! drops it.

use crate::config::{DELIMITER, Settings, extended_state};

/// Editable snapshot of the settings shown in the preferences form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferenceForm {
    /// Load settings from the URL below instead of editing them here
    pub use_net_settings: bool,
    /// Title text input
    pub title_input: String,
    /// Extended-state text input
    pub extended_state_input: String,
    /// Refresh interval text input (milliseconds)
    pub refresh_interval_input: String,
    /// Settings URL text input
    pub settings_url_input: String,
    /// Query interval text input (seconds)
    pub query_interval_input: String,
}

/// Messages emitted by the preferences form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    ToggleUseNet(bool),
    UpdateTitle(String),
    UpdateExtendedState(String),
    UpdateRefreshInterval(String),
    UpdateSettingsUrl(String),
    UpdateQueryInterval(String),
    Save,
    Cancel,
}

/// What the owner of the form should do after a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Keep the form open
    Editing,
    /// Commit the form to the settings and close it
    Save,
    /// Close without committing
    Cancel,
}

impl PreferenceForm {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            use_net_settings: settings.use_net_settings,
            title_input: settings.title.clone(),
            extended_state_input: settings.extended_state.to_string(),
            refresh_interval_input: settings.refresh_interval.to_string(),
            settings_url_input: settings.settings_url.clone(),
            query_interval_input: settings.query_interval.to_string(),
        }
    }

    /// Text fields are read-only while network settings are in use.
    pub fn fields_editable(&self) -> bool {
        !self.use_net_settings
    }

    pub fn update(&mut self, message: Message) -> Outcome {
        let field = match message {
            Message::ToggleUseNet(enabled) => {
                self.use_net_settings = enabled;
                return Outcome::Editing;
            }
            Message::Save => return Outcome::Save,
            Message::Cancel => return Outcome::Cancel,
            Message::UpdateTitle(value) => (&mut self.title_input, value),
            Message::UpdateExtendedState(value) => (&mut self.extended_state_input, value),
            Message::UpdateRefreshInterval(value) => (&mut self.refresh_interval_input, value),
            Message::UpdateSettingsUrl(value) => (&mut self.settings_url_input, value),
            Message::UpdateQueryInterval(value) => (&mut self.query_interval_input, value),
        };

        if self.use_net_settings {
            log::warn!("Preference fields are read-only while network settings are enabled");
        } else {
            let (input, value) = field;
            *input = value;
        }
        Outcome::Editing
    }

    /// Write the form into `settings`.
    ///
    /// Each field is checked on its own; a bad value is logged and that field
    /// keeps its current setting.
    pub fn apply_to(&self, settings: &mut Settings) {
        match normalize_title(&self.title_input) {
            Ok(title) => settings.title = title,
            Err(reason) => log::error!("Rejecting title {:?}: {}", self.title_input, reason),
        }

        match self.extended_state_input.trim().parse::<i32>() {
            Ok(state) => settings.extended_state = state,
            Err(e) => log::error!(
                "Error retrieving integer from extended state field {:?}: {}",
                self.extended_state_input,
                e
            ),
        }

        settings.use_net_settings = self.use_net_settings;

        match self.query_interval_input.trim().parse::<i32>() {
            Ok(seconds) => {
                settings.set_query_interval(seconds);
            }
            Err(e) => log::error!(
                "Error retrieving integer from query interval field {:?}: {}",
                self.query_interval_input,
                e
            ),
        }

        match self.refresh_interval_input.trim().parse::<i64>() {
            Ok(millis) => {
                settings.set_refresh_interval(millis);
            }
            Err(e) => log::error!(
                "Error retrieving integer from refresh interval field {:?}: {}",
                self.refresh_interval_input,
                e
            ),
        }

        settings.settings_url = self.settings_url_input.clone();
    }

    /// Rows of `(label, value)` for display.
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        let state_label = self
            .extended_state_input
            .trim()
            .parse::<i32>()
            .map(extended_state::describe)
            .unwrap_or("invalid");

        vec![
            ("Use Web Settings", if self.use_net_settings { "on" } else { "off" }.to_string()),
            ("Title", self.title_input.clone()),
            ("Extended State", format!("{} ({})", self.extended_state_input, state_label)),
            ("Refresh Interval", self.refresh_interval_input.clone()),
            ("URL Settings File", self.settings_url_input.clone()),
            ("Query Interval", self.query_interval_input.clone()),
        ]
    }
}

/// Make a title storable: every whitespace character becomes a plain space,
/// since only spaces survive the file's whitespace stripping.
fn normalize_title(input: &str) -> Result<String, &'static str> {
    if input.trim().is_empty() {
        return Err("title is empty");
    }
    if input.contains(DELIMITER) {
        return Err("title contains the settings delimiter");
    }
    Ok(input.chars().map(|c| if c.is_whitespace() { ' ' } else { c }).collect())
}
