// SPDX-License-Identifier: MPL-2.0

//! Command input
//!
//! Keys are read one at a time from the raw-mode terminal and collected into
//! a command line; Enter turns the line into an application event. This
//! plays the part of the menus, color picker and preference dialog.
//!
//! | Command            | Event                                  |
//! |--------------------|----------------------------------------|
//! | `bg R,G,B`         | pick background color                  |
//! | `fg R,G,B`         | pick text color                        |
//! | `prefs`            | open the preferences form              |
//! | `title TEXT`       | edit the title field                   |
//! | `state N`          | edit the extended-state field          |
//! | `query N`          | edit the query interval field          |
//! | `refresh N`        | edit the refresh interval field        |
//! | `url URL`          | edit the settings URL field            |
//! | `net on` / `off`   | toggle web settings                    |
//! | `apply` / `cancel` | close the form, saving or discarding   |
//! | `save`             | save settings to the local file        |
//! | `reload`           | fetch network settings now             |
//! | `quit` / `exit`    | save and quit                          |
//!
//! Ctrl-C, Ctrl-D and the termination signals also save and quit.

use std::io;
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use std::thread;

use crossterm::event::{self as term, Event as TermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use signal_hook::consts::signal::{SIGHUP, SIGINT, SIGTERM};
use signal_hook::iterator::Signals;

use crate::app::Event;
use crate::config::keys;
use crate::preferences::Message;
use crate::store;

/// Parse one command line. Unknown or malformed commands yield `None`.
pub fn parse_command(line: &str) -> Option<Event> {
    let line = line.trim();
    let (command, arg) = match line.split_once(char::is_whitespace) {
        Some((command, arg)) => (command, arg.trim()),
        None => (line, ""),
    };

    let event = match command.to_lowercase().as_str() {
        "" => return None,
        "bg" | "background" => Event::PickBackground(parse_color(keys::BACKGROUND_COLOR, arg)?),
        "fg" | "foreground" => Event::PickForeground(parse_color(keys::FONT_COLOR, arg)?),
        "prefs" | "preferences" => Event::OpenPreferences,
        "title" => Event::Preference(Message::UpdateTitle(arg.to_string())),
        "state" => Event::Preference(Message::UpdateExtendedState(arg.to_string())),
        "query" => Event::Preference(Message::UpdateQueryInterval(arg.to_string())),
        "refresh" => Event::Preference(Message::UpdateRefreshInterval(arg.to_string())),
        "url" => Event::Preference(Message::UpdateSettingsUrl(arg.to_string())),
        "net" => Event::Preference(Message::ToggleUseNet(parse_switch(arg)?)),
        "apply" => Event::Preference(Message::Save),
        "cancel" => Event::Preference(Message::Cancel),
        "save" => Event::Save,
        "reload" => Event::ReloadNetwork,
        "quit" | "exit" => Event::Exit,
        other => {
            log::warn!("Unknown command: {}", other);
            return None;
        }
    };
    Some(event)
}

fn parse_color(key: &str, arg: &str) -> Option<crate::config::Rgb> {
    let compact: String = arg.chars().filter(|c| !c.is_whitespace()).collect();
    store::parse_color(key, &compact)
        .map_err(|e| log::warn!("Ignoring color command: {}", e))
        .ok()
}

fn parse_switch(arg: &str) -> Option<bool> {
    match arg.to_lowercase().as_str() {
        "on" | "true" | "yes" => Some(true),
        "off" | "false" | "no" => Some(false),
        other => {
            log::warn!("Expected on/off, got {:?}", other);
            None
        }
    }
}

// ============================================================================
// Line Editing
// ============================================================================

/// Result of feeding one key to a [`LineEditor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The line changed or the key was ignored
    Pending,
    /// Enter was pressed; the finished line
    Submit(String),
    /// Ctrl-C or Ctrl-D
    Interrupt,
}

/// The command line being typed.
#[derive(Debug, Default)]
pub struct LineEditor {
    buffer: String,
}

impl LineEditor {
    pub fn line(&self) -> &str {
        &self.buffer
    }

    pub fn handle(&mut self, key: KeyEvent) -> KeyOutcome {
        if key.kind != KeyEventKind::Press {
            return KeyOutcome::Pending;
        }

        let control = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c' | 'd') if control => return KeyOutcome::Interrupt,
            KeyCode::Char(c) if !control => self.buffer.push(c),
            KeyCode::Backspace => {
                self.buffer.pop();
            }
            KeyCode::Esc => self.buffer.clear(),
            KeyCode::Enter => return KeyOutcome::Submit(std::mem::take(&mut self.buffer)),
            _ => {}
        }
        KeyOutcome::Pending
    }
}

// ============================================================================
// Event Sources
// ============================================================================

/// Read keys on a background thread.
///
/// Every key produces an event so the echoed line is redrawn at once;
/// `echo` always holds the line typed so far.
pub fn spawn_reader(events: Sender<Event>, echo: Arc<Mutex<String>>) {
    thread::spawn(move || {
        let mut editor = LineEditor::default();
        loop {
            let event = match term::read() {
                Ok(TermEvent::Key(key)) => match editor.handle(key) {
                    KeyOutcome::Pending => Event::Redraw,
                    KeyOutcome::Submit(line) => parse_command(&line).unwrap_or(Event::Redraw),
                    KeyOutcome::Interrupt => {
                        log::info!("Interrupted from keyboard");
                        Event::Exit
                    }
                },
                Ok(TermEvent::Resize(..)) => Event::Redraw,
                Ok(_) => continue,
                Err(e) => {
                    log::error!("Failed to read terminal input: {}", e);
                    break;
                }
            };

            if let Ok(mut shown) = echo.lock() {
                shown.clear();
                shown.push_str(editor.line());
            }
            if events.send(event).is_err() {
                break;
            }
        }
        log::info!("Command input closed");
    });
}

/// Turn SIGINT, SIGTERM and SIGHUP into [`Event::Exit`], so the settings are
/// saved and the terminal restored on the normal exit path.
pub fn spawn_signal_listener(events: Sender<Event>) -> io::Result<()> {
    let mut signals = Signals::new([SIGINT, SIGTERM, SIGHUP])?;
    thread::spawn(move || {
        for signal in &mut signals {
            log::info!("Received signal {}, exiting", signal);
            if events.send(Event::Exit).is_err() {
                break;
            }
        }
    });
    Ok(())
}
