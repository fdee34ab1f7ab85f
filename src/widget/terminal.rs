// SPDX-License-Identifier: MPL-2.0

//! Terminal session
//!
//! The clock runs with the terminal in raw mode so keys arrive one at a
//! time. Whatever ends the session (quit, a signal, a panic) must leave the
//! terminal cooked, with default colors and a visible cursor.

use std::io::{self, Write};
use std::panic;

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::execute;
use crossterm::style::ResetColor;
use crossterm::terminal::{self, Clear, ClearType};

/// Puts the terminal in raw mode and restores it on drop.
pub struct TerminalGuard {
    _private: (),
}

impl TerminalGuard {
    /// Enter raw mode and hide the cursor.
    ///
    /// A terminal that refuses raw mode (output redirected, no tty) is not
    /// fatal; keys are then delivered however the terminal sends them.
    pub fn enter() -> Self {
        if let Err(e) = terminal::enable_raw_mode() {
            log::warn!("Raw mode unavailable: {}", e);
        }
        if let Err(e) = execute!(io::stdout(), Hide) {
            log::warn!("Failed to hide cursor: {}", e);
        }
        Self { _private: () }
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        restore();
    }
}

/// Leave raw mode, reset colors, clear the painted face and show the cursor.
///
/// Safe to call more than once.
pub fn restore() {
    if let Err(e) = terminal::disable_raw_mode() {
        log::warn!("Failed to leave raw mode: {}", e);
    }
    let mut stdout = io::stdout();
    if let Err(e) = reset_screen(&mut stdout) {
        log::warn!("Failed to reset terminal: {}", e);
    }
}

fn reset_screen(out: &mut impl Write) -> io::Result<()> {
    execute!(out, ResetColor, Clear(ClearType::All), MoveTo(0, 0), Show)
}

/// Restore the terminal before the default panic report is printed, so the
/// message lands on a cooked, unpainted screen.
pub fn install_panic_hook() {
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        restore();
        log::error!("Panic: {}", info);
        default_hook(info);
    }));
}
