// SPDX-License-Identifier: MPL-2.0

//! Rendering module for the clock face
//!
//! Queues one frame of crossterm commands: the window title goes to the
//! terminal title bar, the clock face is a fixed-width box painted in the
//! configured 24-bit colors, and the command being typed sits below it.

use std::fmt;
use std::io::{self, Write};

use chrono::{DateTime, TimeZone};
use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType, SetTitle};

use crate::config::Rgb;
use crate::preferences::PreferenceForm;

/// Width of the painted clock face, in columns.
const FACE_WIDTH: usize = 44;

/// Parameters for rendering one frame
pub struct RenderParams<'a> {
    pub title: &'a str,
    pub background: Rgb,
    pub foreground: Rgb,
    pub time: String,
    pub date: String,
    pub preferences: Option<&'a PreferenceForm>,
    /// Command typed so far, echoed under the face
    pub command_line: &'a str,
}

/// 24-hour clock time, `HH:MM:SS`.
pub fn format_time<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    now.format("%H:%M:%S").to_string()
}

/// Full weekday, short month, day and year, e.g. `Monday, Oct 19, 2026`.
pub fn format_date<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    now.format("%A, %b %-d, %Y").to_string()
}

/// Queue one complete frame into a byte buffer.
pub fn render_frame(params: &RenderParams) -> io::Result<Vec<u8>> {
    let title = strip_controls(params.title);
    let mut frame = Vec::new();

    queue!(frame, SetTitle(&title), MoveTo(0, 0), Clear(ClearType::All))?;

    let mut lines = vec![
        String::new(),
        title.clone(),
        String::new(),
        params.time.clone(),
        params.date.clone(),
        String::new(),
    ];

    if let Some(form) = params.preferences {
        lines.push("Clock Settings".to_string());
        for (label, value) in form.rows() {
            lines.push(format!("{label}: {}", strip_controls(&value)));
        }
        if !form.fields_editable() {
            lines.push("(fields locked while web settings are on)".to_string());
        }
        lines.push("apply | cancel".to_string());
        lines.push(String::new());
    }

    for line in lines {
        let line: String = line.chars().take(FACE_WIDTH).collect();
        queue!(
            frame,
            SetBackgroundColor(term_color(params.background)),
            SetForegroundColor(term_color(params.foreground)),
            Print(format!("{line:^FACE_WIDTH$}")),
            ResetColor,
            Print("\r\n"),
        )?;
    }

    queue!(frame, Print(format!("> {}", strip_controls(params.command_line))))?;
    Ok(frame)
}

/// Write a frame to `out` and flush it.
pub fn draw(out: &mut impl Write, params: &RenderParams) -> io::Result<()> {
    out.write_all(&render_frame(params)?)?;
    out.flush()
}

fn term_color(color: Rgb) -> Color {
    Color::Rgb { r: color.r, g: color.g, b: color.b }
}

/// Titles can come from the network; never pass escapes through.
fn strip_controls(text: &str) -> String {
    text.chars().filter(|c| !c.is_control()).collect()
}
