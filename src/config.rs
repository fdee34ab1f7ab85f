// SPDX-License-Identifier: MPL-2.0

//! Clock settings record and its text serialization.
//!
//! A single [`Settings`] value is owned by the application for its whole
//! lifetime. It starts from [`Settings::default`], is patched by the local
//! settings file and then (optionally) by the network settings file. See
//! [`crate::store::apply`] for the reading side of the `key::value` format.
//!
//! # File Format
//!
//! ```text
//! background-color::(45,54,45)
//! font-color::(155,172,134)
//! title::Clock%v2.6.0
//! extended-state::6
//! query-interval::60
//! refresh-interval::500
//! settings-url::http://nateshot.homenet.org:8025/clock_settings.txt
//! use-net-settings::true
//! ```

use std::fmt;
use std::num::{NonZeroU32, NonZeroU64};
use std::time::Duration;

// ============================================================================
// Constants
// ============================================================================

/// Separator between key and value on every settings line.
pub const DELIMITER: &str = "::";

/// Local settings file, relative to the working directory.
pub const DEFAULT_FILEPATH: &str = "clock_settings";

/// Network settings file used until a source overrides `settings-url`.
pub const DEFAULT_SETTINGS_URL: &str = "http://nateshot.homenet.org:8025/clock_settings.txt";

/// Stand-in for a literal space inside a stored title.
pub const SPACE_PLACEHOLDER: char = '%';

/// Crate version, shown in the default title.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Recognized setting keys, in serialization order.
pub mod keys {
    pub const BACKGROUND_COLOR: &str = "background-color";
    pub const FONT_COLOR: &str = "font-color";
    pub const TITLE: &str = "title";
    pub const EXTENDED_STATE: &str = "extended-state";
    pub const QUERY_INTERVAL: &str = "query-interval";
    pub const REFRESH_INTERVAL: &str = "refresh-interval";
    pub const SETTINGS_URL: &str = "settings-url";
    pub const USE_NET_SETTINGS: &str = "use-net-settings";
}

/// Named window-state bits. The value itself is stored as a plain integer.
pub mod extended_state {
    pub const NORMAL: i32 = 0;
    pub const ICONIFIED: i32 = 1;
    pub const MAXIMIZED_HORIZ: i32 = 2;
    pub const MAXIMIZED_VERT: i32 = 4;
    pub const MAXIMIZED_BOTH: i32 = 6;

    /// Human-readable label for a state value.
    pub fn describe(state: i32) -> &'static str {
        match state {
            NORMAL => "normal",
            ICONIFIED => "iconified",
            MAXIMIZED_HORIZ => "maximized horizontally",
            MAXIMIZED_VERT => "maximized vertically",
            MAXIMIZED_BOTH => "maximized",
            _ => "custom",
        }
    }
}

// ============================================================================
// Color
// ============================================================================

/// An 8-bit RGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build a color from arbitrary integers, clamping each channel to 0..=255.
    pub fn clamped(r: i64, g: i64, b: i64) -> Self {
        let clamp = |v: i64| v.clamp(0, 255) as u8;
        Self::new(clamp(r), clamp(g), clamp(b))
    }
}

/// Formats as `(r,g,b)`, the same syntax the settings file uses.
impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.r, self.g, self.b)
    }
}

// ============================================================================
// Settings
// ============================================================================

/// Complete clock configuration.
///
/// Intervals are `NonZero` so a zero or negative value can never be stored;
/// the parsers drop such inputs and keep the previous value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Window title, with real spaces
    pub title: String,
    /// Background color of the clock face
    pub background: Rgb,
    /// Text color for time and date
    pub foreground: Rgb,
    /// Window-state bitmask (see [`extended_state`])
    pub extended_state: i32,
    /// Seconds between network settings polls
    pub query_interval: NonZeroU32,
    /// Milliseconds between display refreshes
    pub refresh_interval: NonZeroU64,
    /// Where network settings are fetched from
    pub settings_url: String,
    /// Whether the network settings file is consulted at all
    pub use_net_settings: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            title: format!("Clock v{VERSION}"),
            background: Rgb::new(45, 54, 45),
            foreground: Rgb::new(155, 172, 134),
            extended_state: extended_state::MAXIMIZED_BOTH,
            query_interval: NonZeroU32::new(60).unwrap_or(NonZeroU32::MIN),
            refresh_interval: NonZeroU64::new(500).unwrap_or(NonZeroU64::MIN),
            settings_url: DEFAULT_SETTINGS_URL.to_string(),
            use_net_settings: true,
        }
    }
}

impl Settings {
    /// Set the query interval. Non-positive values are rejected and leave
    /// the current interval in place; returns whether the value was taken.
    pub fn set_query_interval(&mut self, seconds: i32) -> bool {
        match u32::try_from(seconds).ok().and_then(NonZeroU32::new) {
            Some(interval) => {
                self.query_interval = interval;
                true
            }
            None => {
                log::warn!("Ignoring non-positive query interval: {}", seconds);
                false
            }
        }
    }

    /// Set the refresh interval, with the same rejection rule as
    /// [`Settings::set_query_interval`].
    pub fn set_refresh_interval(&mut self, millis: i64) -> bool {
        match u64::try_from(millis).ok().and_then(NonZeroU64::new) {
            Some(interval) => {
                self.refresh_interval = interval;
                true
            }
            None => {
                log::warn!("Ignoring non-positive refresh interval: {}", millis);
                false
            }
        }
    }

    /// Refresh interval as a sleep duration.
    pub fn tick_duration(&self) -> Duration {
        Duration::from_millis(self.refresh_interval.get())
    }

    /// Serialize every field as `key::value` lines, each newline-terminated.
    pub fn to_settings_text(&self) -> String {
        let lines = [
            (keys::BACKGROUND_COLOR, self.background.to_string()),
            (keys::FONT_COLOR, self.foreground.to_string()),
            (keys::TITLE, escape_title(&self.title)),
            (keys::EXTENDED_STATE, self.extended_state.to_string()),
            (keys::QUERY_INTERVAL, self.query_interval.to_string()),
            (keys::REFRESH_INTERVAL, self.refresh_interval.to_string()),
            (keys::SETTINGS_URL, self.settings_url.clone()),
            (keys::USE_NET_SETTINGS, self.use_net_settings.to_string()),
        ];

        lines
            .iter()
            .map(|(key, value)| format!("{key}{DELIMITER}{value}\n"))
            .collect()
    }
}

/// The payload written when no settings file exists yet.
pub fn default_payload() -> String {
    Settings::default().to_settings_text()
}

/// Replace spaces with the placeholder so the title survives whitespace
/// stripping on read.
pub fn escape_title(title: &str) -> String {
    title.replace(' ', &SPACE_PLACEHOLDER.to_string())
}

/// Inverse of [`escape_title`].
pub fn unescape_title(stored: &str) -> String {
    stored.replace(SPACE_PLACEHOLDER, " ")
}
