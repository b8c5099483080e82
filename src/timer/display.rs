//! Read-only view of the clock for the UI.

use serde::{Deserialize, Serialize};

/// Format seconds as `m:ss`.
///
/// ```
/// use memory_match::timer::format_clock;
///
/// assert_eq!(format_clock(0), "0:00");
/// assert_eq!(format_clock(75), "1:15");
/// assert_eq!(format_clock(3600), "60:00");
/// ```
#[must_use]
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// How close a countdown is to running out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerUrgency {
    Normal,
    /// 30 seconds or less.
    Warning,
    /// 10 seconds or less.
    Critical,
}

/// Snapshot of the clock.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerDisplay {
    pub elapsed: u32,
    /// Only meaningful when `has_countdown`.
    pub remaining: u32,
    pub has_countdown: bool,
}

impl TimerDisplay {
    /// The figure a clock face should show: remaining time when counting
    /// down, elapsed time otherwise.
    #[must_use]
    pub fn shown_seconds(&self) -> u32 {
        if self.has_countdown {
            self.remaining
        } else {
            self.elapsed
        }
    }

    #[must_use]
    pub fn urgency(&self) -> TimerUrgency {
        if !self.has_countdown {
            return TimerUrgency::Normal;
        }
        match self.remaining {
            0..=10 => TimerUrgency::Critical,
            11..=30 => TimerUrgency::Warning,
            _ => TimerUrgency::Normal,
        }
    }
}

impl std::fmt::Display for TimerDisplay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&format_clock(self.shown_seconds()))
    }
}
