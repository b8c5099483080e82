//! Top-level session: phase machine, commands and queries for the UI.
//!
//! The UI collaborator only ever talks to [`SessionController`]: it sends
//! commands (`start_game`, `tap_card`, `reset`, `abandon`), advances the
//! clock with `advance`, and renders [`SessionSnapshot`]s.

mod controller;
mod snapshot;

pub use controller::{SessionController, SessionPhase, TapOutcome};
pub use snapshot::SessionSnapshot;
