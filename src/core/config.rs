//! Session configuration.
//!
//! The UI owns the content pool, the pair-count choices and the pacing
//! delays; it hands them to the engine through `SessionConfig`.

use serde::{Deserialize, Serialize};

use crate::cards::Symbol;

/// Symbols dealt when the caller does not supply its own pool.
pub const DEFAULT_CONTENT_POOL: [&str; 12] = [
    "🐶", "🐱", "🐭", "🐹", "🐰", "🦊", "🐻", "🐼", "🐨", "🦁", "🐯", "🐸",
];

/// Pair counts offered by default.
pub const DEFAULT_PAIR_OPTIONS: [usize; 6] = [2, 4, 6, 8, 10, 12];

/// Delays used by the session's scheduler, in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timings {
    /// Period of the game clock.
    pub tick_interval_ms: u64,
    /// Pause after a match before checking for a win.
    pub match_check_delay_ms: u64,
    /// How long a mismatched pair stays visible before flipping back.
    pub mismatch_flip_delay_ms: u64,
    /// Time from expiry until the shaking flag is raised.
    pub loss_shake_delay_ms: u64,
    /// Time from expiry until the session is marked lost.
    pub loss_phase_delay_ms: u64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1000,
            match_check_delay_ms: 400,
            mismatch_flip_delay_ms: 600,
            loss_shake_delay_ms: 300,
            loss_phase_delay_ms: 1500,
        }
    }
}

/// Configuration for a [`SessionController`](crate::session::SessionController).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Symbols to deal from, in preference order.
    pub content_pool: Vec<Symbol>,

    /// Pair counts a game may be started with.
    pub pair_options: Vec<usize>,

    /// Seed for shuffling. `None` draws a fresh seed per controller.
    pub seed: Option<u64>,

    /// Scheduler delays.
    pub timings: Timings,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            content_pool: DEFAULT_CONTENT_POOL.iter().map(|s| Symbol::from(*s)).collect(),
            pair_options: DEFAULT_PAIR_OPTIONS.to_vec(),
            seed: None,
            timings: Timings::default(),
        }
    }
}

impl SessionConfig {
    /// Use a custom content pool.
    #[must_use]
    pub fn with_content_pool<I, S>(mut self, pool: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Symbol>,
    {
        self.content_pool = pool.into_iter().map(Into::into).collect();
        self
    }

    /// Restrict the allowed pair counts.
    #[must_use]
    pub fn with_pair_options(mut self, options: impl Into<Vec<usize>>) -> Self {
        self.pair_options = options.into();
        self
    }

    /// Fix the shuffle seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Override the scheduler delays.
    #[must_use]
    pub fn with_timings(mut self, timings: Timings) -> Self {
        self.timings = timings;
        self
    }

    /// Whether `pair_count` is one of the configured options.
    #[must_use]
    pub fn allows_pair_count(&self, pair_count: usize) -> bool {
        pair_count > 0 && self.pair_options.contains(&pair_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SessionConfig::default();
        assert_eq!(config.content_pool.len(), 12);
        assert_eq!(config.content_pool[0], Symbol::from("🐶"));
        assert_eq!(config.pair_options, vec![2, 4, 6, 8, 10, 12]);
        assert_eq!(config.seed, None);
        assert_eq!(config.timings.tick_interval_ms, 1000);
        assert_eq!(config.timings.mismatch_flip_delay_ms, 600);
    }

    #[test]
    fn test_builder_pattern() {
        let config = SessionConfig::default()
            .with_content_pool(["A", "B", "C"])
            .with_pair_options([2, 3])
            .with_seed(99);

        assert_eq!(config.content_pool.len(), 3);
        assert_eq!(config.seed, Some(99));
        assert!(config.allows_pair_count(3));
        assert!(!config.allows_pair_count(4));
        assert!(!config.allows_pair_count(0));
    }

    #[test]
    fn test_serialization() {
        let config = SessionConfig::default().with_seed(5);
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: SessionConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }
}
