//! Core building blocks shared by every other module: the seeded RNG,
//! session configuration and the error types.

pub mod config;
pub mod error;
pub mod rng;

pub use config::{SessionConfig, Timings, DEFAULT_CONTENT_POOL, DEFAULT_PAIR_OPTIONS};
pub use error::{ConfigError, GameError, IndexError};
pub use rng::{GameRng, GameRngState};
