//! Selection and match resolution.
//!
//! [`MatchEngine`] owns the board and the single "first selected" pointer.
//! It decides matches immediately; anything that must wait (the win check,
//! flipping a mismatch back) is returned to the caller to schedule.

mod match_engine;

pub use match_engine::{EngineState, MatchEngine, MismatchResolution, SelectOutcome};
