//! Timer state machine.
//!
//! The controller only counts. Delivering ticks is the scheduler's job:
//! each `start` opens a new epoch, and a tick carrying any other epoch is
//! stale. Restarting the timer therefore cancels every tick stream that
//! was scheduled before it.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::TimerDisplay;

/// Result of delivering one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TickOutcome {
    /// Timer stopped, or the tick belongs to an earlier epoch.
    Stale,
    /// Counters advanced; keep ticking.
    Ticked,
    /// Countdown reached zero. The timer has stopped itself.
    Expired,
}

/// Elapsed / remaining seconds for one session.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerController {
    elapsed_secs: u32,
    remaining_secs: u32,
    countdown_secs: Option<u32>,
    active: bool,
    epoch: u64,
}

impl TimerController {
    /// Create a stopped timer for the given countdown (or none).
    #[must_use]
    pub fn new(countdown_secs: Option<u32>) -> Self {
        Self {
            elapsed_secs: 0,
            remaining_secs: countdown_secs.unwrap_or(0),
            countdown_secs,
            active: false,
            epoch: 0,
        }
    }

    /// Stop and zero the counters, keeping the epoch sequence.
    pub fn reset(&mut self, countdown_secs: Option<u32>) {
        self.active = false;
        self.elapsed_secs = 0;
        self.remaining_secs = countdown_secs.unwrap_or(0);
        self.countdown_secs = countdown_secs;
    }

    /// Start ticking and return the epoch new ticks must carry.
    ///
    /// Any earlier tick source is implicitly cancelled.
    pub fn start(&mut self) -> u64 {
        self.epoch += 1;
        self.active = true;
        debug!(target: "timer", epoch = self.epoch, countdown = ?self.countdown_secs, "timer started");
        self.epoch
    }

    /// Halt ticking. Idempotent; counters are kept.
    pub fn stop(&mut self) {
        if self.active {
            debug!(target: "timer", epoch = self.epoch, elapsed = self.elapsed_secs, "timer stopped");
        }
        self.active = false;
    }

    /// Deliver one tick from the source opened at `epoch`.
    pub fn tick(&mut self, epoch: u64) -> TickOutcome {
        self.tick_many(epoch, 1).1
    }

    /// Deliver up to `count` ticks from the source opened at `epoch`.
    ///
    /// Stops at the tick that expires the countdown. Returns how many ticks
    /// were applied and the outcome of the last one. The elapsed counter
    /// saturates.
    pub fn tick_many(&mut self, epoch: u64, count: u64) -> (u64, TickOutcome) {
        if !self.active || epoch != self.epoch || count == 0 {
            return (0, TickOutcome::Stale);
        }

        let applied = match self.countdown_secs {
            Some(_) => count.min(u64::from(self.remaining_secs.max(1))),
            None => count,
        };
        let secs = u32::try_from(applied).unwrap_or(u32::MAX);
        self.elapsed_secs = self.elapsed_secs.saturating_add(secs);

        if self.countdown_secs.is_some() {
            self.remaining_secs = self.remaining_secs.saturating_sub(secs);
            trace!(target: "timer", applied, elapsed = self.elapsed_secs, remaining = self.remaining_secs, "tick");
            if self.remaining_secs == 0 {
                self.active = false;
                debug!(target: "timer", elapsed = self.elapsed_secs, "countdown expired");
                return (applied, TickOutcome::Expired);
            }
        } else {
            trace!(target: "timer", applied, elapsed = self.elapsed_secs, "tick");
        }

        (applied, TickOutcome::Ticked)
    }

    #[must_use]
    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }

    /// Seconds left on the countdown. Zero for untimed modes.
    #[must_use]
    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    #[must_use]
    pub fn has_countdown(&self) -> bool {
        self.countdown_secs.is_some()
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    #[must_use]
    pub fn display(&self) -> TimerDisplay {
        TimerDisplay {
            elapsed: self.elapsed_secs,
            remaining: self.remaining_secs,
            has_countdown: self.has_countdown(),
        }
    }
}
