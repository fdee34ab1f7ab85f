// SPDX-License-Identifier: MPL-2.0

//! # Settings Store
//!
//! Applies a `key::value` payload onto a [`Settings`] value.
//!
//! ## Line Handling
//!
//! Every line is stripped of all whitespace first, then:
//!
//! - empty lines are skipped
//! - lines whose first character is not a letter are comments (`#`, `//`, ...)
//! - lines that do not split into exactly one key and one value are skipped
//! - keys are matched case-insensitively, unknown keys are ignored
//!
//! ## Patch Semantics
//!
//! Only the keys present in the payload are written. Applying the network
//! payload after the file payload therefore overrides just what the network
//! mentions.
//!
//! ## Errors
//!
//! A bad number, boolean or color aborts the pass with [`ParseError`]. Keys
//! that appeared before the bad line have already been written.

use crate::config::{DELIMITER, Rgb, Settings, keys, unescape_title};
use crate::error::ParseError;

/// Apply every recognized line of `text` to `target`.
pub fn apply(text: &str, target: &mut Settings) -> Result<(), ParseError> {
    for raw in text.lines() {
        let line: String = raw.chars().filter(|c| !c.is_whitespace()).collect();

        let Some(first) = line.chars().next() else {
            continue;
        };
        if !first.is_alphabetic() {
            log::trace!("Skipping comment line: {}", line);
            continue;
        }

        let Some((key, value)) = split_line(&line) else {
            log::debug!("Skipping malformed settings line: {}", line);
            continue;
        };

        apply_entry(&key.to_lowercase(), value, target)?;
    }

    Ok(())
}

/// Split on the delimiter, requiring exactly two non-empty parts.
fn split_line(line: &str) -> Option<(&str, &str)> {
    let mut parts = line.split(DELIMITER);
    let key = parts.next()?;
    let value = parts.next()?;
    if parts.next().is_some() || key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key, value))
}

fn apply_entry(key: &str, value: &str, target: &mut Settings) -> Result<(), ParseError> {
    match key {
        keys::BACKGROUND_COLOR => target.background = parse_color(key, value)?,
        keys::FONT_COLOR => target.foreground = parse_color(key, value)?,
        keys::TITLE => target.title = unescape_title(value),
        keys::EXTENDED_STATE => target.extended_state = parse_number(key, value)?,
        keys::QUERY_INTERVAL => {
            target.set_query_interval(parse_number::<i32>(key, value)?);
        }
        keys::REFRESH_INTERVAL => {
            target.set_refresh_interval(parse_number(key, value)?);
        }
        keys::SETTINGS_URL => target.settings_url = value.to_string(),
        keys::USE_NET_SETTINGS => target.use_net_settings = parse_bool(key, value)?,
        other => log::debug!("Ignoring unknown settings key: {}", other),
    }
    Ok(())
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidNumber {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ParseError> {
    if value.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if value.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(ParseError::InvalidBoolean {
            key: key.to_string(),
            value: value.to_string(),
        })
    }
}

/// Parse `(r,g,b)` and clamp every channel into range.
///
/// Components beyond the third are ignored.
pub fn parse_color(key: &str, value: &str) -> Result<Rgb, ParseError> {
    let inner = value.strip_prefix('(').unwrap_or(value);
    let inner = inner.strip_suffix(')').unwrap_or(inner);

    let mut channels = inner.split(',');
    let mut next = || -> Result<i64, ParseError> {
        let channel = channels.next().ok_or_else(|| ParseError::MalformedColor {
            key: key.to_string(),
            value: value.to_string(),
        })?;
        parse_number(key, channel)
    };

    let (r, g, b) = (next()?, next()?, next()?);
    Ok(Rgb::clamped(r, g, b))
}
