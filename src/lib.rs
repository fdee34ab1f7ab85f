// SPDX-License-Identifier: MPL-2.0

//! Desk Clock
//!
//! A clock face whose colors, title and timing come from a small `key::value`
//! settings file, optionally overridden by a copy hosted on the network and
//! re-polled on a schedule.
//!
//! # Modules
//!
//! - [`config`]: the settings record, defaults and serialization
//! - [`store`]: applying a settings payload onto the record
//! - [`loader`]: reading and writing the local file, fetching the URL
//! - [`scheduler`]: when to re-poll the network, with back-off
//! - [`app`]: the single owner of the settings and its event dispatch
//! - [`preferences`]: the preferences form
//! - [`remote`]: background fetch thread
//! - [`widget`]: terminal rendering and command input

pub mod app;
pub mod config;
pub mod error;
pub mod loader;
pub mod preferences;
pub mod remote;
pub mod scheduler;
pub mod store;
pub mod widget;

pub use app::{ClockApp, Command, Event};
pub use config::{Rgb, Settings};
pub use error::{LoadError, ParseError};
