//! Game clock: elapsed and countdown seconds, driven by a 1 Hz tick.

mod controller;
mod display;

pub use controller::{TickOutcome, TimerController};
pub use display::{format_clock, TimerDisplay, TimerUrgency};
