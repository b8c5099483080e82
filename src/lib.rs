//! # memory-match
//!
//! A matching-pairs card game engine.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: Every shuffle draws from one seeded stream, so a
//!    seed plus a sequence of taps and time steps replays a game exactly.
//!
//! 2. **Host-Driven Time**: The engine never sleeps or spawns threads. The
//!    host reports elapsed time via `SessionController::advance` and every
//!    deferred effect fires from the event queue.
//!
//! 3. **Modes as Policy**: A mode is data (`ModePolicy`) that the match
//!    engine consults, not a branch scattered through the rules.
//!
//! ## Architecture
//!
//! - **Session-Tagged Events**: Each deferred event carries the session id
//!   that scheduled it. Starting, resetting or abandoning a game bumps the
//!   id, so callbacks from an old game can never touch the new one.
//!
//! - **Persistent Data Structures**: The board is an `im::Vector`, so a
//!   per-frame snapshot is an O(1) clone.
//!
//! ## Modules
//!
//! - `core`: RNG, configuration, errors
//! - `cards`: Card identity, content and flags
//! - `board`: Dealing, pairing queries, reshuffles
//! - `modes`: The four play modes and their mismatch policy
//! - `engine`: Selection state machine
//! - `timer`: Elapsed/countdown clock and its display
//! - `schedule`: Virtual-time event queue
//! - `session`: Top-level controller and snapshots

pub mod core;
pub mod cards;
pub mod board;
pub mod modes;
pub mod engine;
pub mod timer;
pub mod schedule;
pub mod session;

#[cfg(feature = "python")]
pub mod python;

// Re-export commonly used types
pub use crate::core::{
    GameRng, GameRngState,
    SessionConfig, Timings, DEFAULT_CONTENT_POOL, DEFAULT_PAIR_OPTIONS,
    ConfigError, GameError, IndexError,
};

pub use crate::cards::{Card, CardId, Symbol};

pub use crate::board::Board;

pub use crate::modes::{Mode, ModePolicy, MismatchEffect};

pub use crate::engine::{EngineState, MatchEngine, MismatchResolution, SelectOutcome};

pub use crate::timer::{TimerController, TimerDisplay, TimerUrgency, TickOutcome, format_clock};

pub use crate::schedule::{DeferredEvent, EventId, EventQueue, ScheduledEvent};

pub use crate::session::{SessionController, SessionPhase, SessionSnapshot, TapOutcome};
