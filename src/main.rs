// SPDX-License-Identifier: MPL-2.0

//! Desk Clock - Entry Point
//!
//! Loads the settings (defaults, then `clock_settings`, then the network copy
//! when enabled), then runs the event loop:
//!
//! - every refresh interval a `Tick` redraws the clock and may schedule a poll
//! - polls run on the fetch worker and come back as events
//! - keys typed in the terminal and termination signals arrive as events
//!
//! Logging goes to a file because stdout carries the clock face. The
//! terminal is restored on every way out: quit, signal, error or panic.

use std::error::Error;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::PathBuf;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use desk_clock::config::DEFAULT_FILEPATH;
use desk_clock::loader::HttpFetcher;
use desk_clock::remote::FetchWorker;
use desk_clock::widget::{RenderParams, input, renderer, terminal};
use desk_clock::{ClockApp, Command, Event};

/// Log file location, shared between runs.
///
/// Falls back to `/tmp` if the cache directory cannot be determined.
fn log_path() -> PathBuf {
    let mut path = dirs::cache_dir().unwrap_or_else(|| PathBuf::from("/tmp"));
    path.push("desk-clock");
    fs::create_dir_all(&path).ok();
    path.push("desk-clock.log");
    path
}

fn init_logging() {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));

    let path = log_path();
    match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        Err(e) => eprintln!("Cannot open log file {:?} ({}), logging to stderr", path, e),
    }

    builder.init();
}

fn draw(app: &ClockApp, command_line: &Mutex<String>, out: &mut impl io::Write) -> io::Result<()> {
    let now = chrono::Local::now();
    let settings = app.settings();
    let title = app.display_title();
    let typed = command_line.lock().map(|line| line.clone()).unwrap_or_default();

    renderer::draw(
        out,
        &RenderParams {
            title: &title,
            background: settings.background,
            foreground: settings.foreground,
            time: renderer::format_time(&now),
            date: renderer::format_date(&now),
            preferences: app.preferences(),
            command_line: &typed,
        },
    )
}

fn main() -> Result<(), Box<dyn Error>> {
    init_logging();
    log::info!("Starting Desk Clock v{}", desk_clock::config::VERSION);

    let fetcher = HttpFetcher::new()?;
    let mut app = ClockApp::load(DEFAULT_FILEPATH, &fetcher);

    let (events, incoming) = mpsc::channel();
    let worker = FetchWorker::spawn(fetcher, events.clone());
    if let Err(e) = input::spawn_signal_listener(events.clone()) {
        log::warn!("Signal handling unavailable: {}", e);
    }

    terminal::install_panic_hook();
    let _terminal = terminal::TerminalGuard::enter();

    let command_line = Arc::new(Mutex::new(String::new()));
    input::spawn_reader(events, Arc::clone(&command_line));

    let mut stdout = io::stdout();
    let mut next_tick = Instant::now() + app.settings().tick_duration();
    draw(&app, &command_line, &mut stdout)?;

    loop {
        let timeout = next_tick.saturating_duration_since(Instant::now());
        let event = match incoming.recv_timeout(timeout) {
            Ok(event) => event,
            Err(RecvTimeoutError::Timeout) => {
                next_tick = Instant::now() + app.settings().tick_duration();
                Event::Tick
            }
            Err(RecvTimeoutError::Disconnected) => {
                log::warn!("All event sources closed");
                Event::Exit
            }
        };

        match app.update(event) {
            Command::None => {}
            Command::Fetch(url) => worker.request(url),
            Command::Exit => break,
        }

        draw(&app, &command_line, &mut stdout)?;
    }

    log::info!("Desk Clock exiting");
    Ok(())
}
