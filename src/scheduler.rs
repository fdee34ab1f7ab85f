// SPDX-License-Identifier: MPL-2.0

//! Network poll scheduling.
//!
//! The scheduler counts display ticks. Once a full query interval's worth of
//! ticks has passed it asks for a poll, then waits for the result:
//!
//! - success resets the counter to zero, so the next poll is one interval away
//! - failure sets the counter to minus one interval, so the next poll is two
//!   intervals away
//!
//! The back-off is a single step. Consecutive failures each wait two
//! intervals, they never compound further.

use crate::config::Settings;

/// What the caller should do after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollAction {
    Idle,
    Poll,
}

#[derive(Debug, Clone)]
pub struct PollScheduler {
    ticks_since_poll: i64,
    tick_interval_ms: u64,
    query_interval_secs: u32,
    in_flight: bool,
}

impl PollScheduler {
    pub fn new(settings: &Settings) -> Self {
        Self {
            ticks_since_poll: 0,
            tick_interval_ms: settings.refresh_interval.get(),
            query_interval_secs: settings.query_interval.get(),
            in_flight: false,
        }
    }

    /// Pick up interval changes. The tick counter is left alone.
    pub fn reconfigure(&mut self, settings: &Settings) {
        self.tick_interval_ms = settings.refresh_interval.get();
        self.query_interval_secs = settings.query_interval.get();
    }

    /// Ticks in one query interval.
    ///
    /// Ticks per second are truncated like the interval itself but never drop
    /// below one, so slow refresh rates still poll.
    pub fn threshold(&self) -> i64 {
        let ticks_per_second = (1000 / self.tick_interval_ms).max(1);
        i64::from(self.query_interval_secs) * ticks_per_second as i64
    }

    /// Count one tick. Returns [`PollAction::Poll`] when a fetch is due; no
    /// further polls are requested until [`PollScheduler::complete`] is called.
    pub fn tick(&mut self) -> PollAction {
        if self.in_flight {
            return PollAction::Idle;
        }

        self.ticks_since_poll += 1;
        if self.ticks_since_poll >= self.threshold() {
            self.in_flight = true;
            PollAction::Poll
        } else {
            PollAction::Idle
        }
    }

    /// Start a fetch outside the tick schedule. Returns `false` if one is
    /// already running.
    pub fn begin(&mut self) -> bool {
        if self.in_flight {
            return false;
        }
        self.in_flight = true;
        true
    }

    /// Record the outcome of the running fetch.
    pub fn complete(&mut self, success: bool) {
        self.in_flight = false;
        self.ticks_since_poll = if success { 0 } else { -self.threshold() };
        log::debug!(
            "Poll {}; next poll in {} ticks",
            if success { "succeeded" } else { "failed" },
            self.threshold() - self.ticks_since_poll
        );
    }

    /// Forget any progress towards the next poll.
    pub fn reset(&mut self) {
        self.ticks_since_poll = 0;
        self.in_flight = false;
    }

    #[cfg(test)]
    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }
}
