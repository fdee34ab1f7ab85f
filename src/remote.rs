// SPDX-License-Identifier: MPL-2.0

//! # Network Fetch Worker
//!
//! Network settings are downloaded on a background thread so a slow or
//! hanging server never freezes the clock display.
//!
//! ## Threading Model
//!
//! - The event loop sends URLs through [`FetchWorker::request`]
//! - The worker thread fetches them one at a time, in order
//! - Each result comes back as [`Event::NetworkFetched`] on the event channel
//!
//! The worker never touches the settings; the event loop applies results, so
//! there is still exactly one writer.

use std::sync::mpsc::{self, Sender};
use std::thread;

use crate::app::Event;
use crate::loader::Fetch;

pub struct FetchWorker {
    requests: Sender<String>,
}

impl FetchWorker {
    /// Spawn the worker thread. It exits when either channel closes.
    pub fn spawn<F: Fetch>(fetcher: F, events: Sender<Event>) -> Self {
        let (requests, incoming) = mpsc::channel::<String>();

        thread::spawn(move || {
            for url in incoming {
                log::info!("Background: fetching network settings from {}", url);
                let result = fetcher.fetch(&url);
                if let Err(e) = &result {
                    log::debug!("Background: fetch failed: {}", e);
                }
                if events.send(Event::NetworkFetched(result)).is_err() {
                    break;
                }
            }
            log::debug!("Fetch worker stopped");
        });

        Self { requests }
    }

    /// Queue a fetch of `url`.
    pub fn request(&self, url: String) {
        if self.requests.send(url).is_err() {
            log::error!("Fetch worker is gone, network settings will not refresh");
        }
    }
}
