//! Play modes and the per-mode behaviour table.
//!
//! Every per-mode decision the engine makes goes through [`ModePolicy`],
//! looked up once from the [`Mode`] instead of branching on the mode at
//! each call site.

mod mode;
mod policy;

pub use mode::Mode;
pub use policy::{MismatchEffect, ModePolicy};
