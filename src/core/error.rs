//! Error types.
//!
//! Only genuine failures are errors. A tap on a matched or face-up card, or
//! a tap while no game is running, is ordinary timing noise and is reported
//! as `TapOutcome::Ignored` instead.

use serde::{Deserialize, Serialize};

/// A game could not be configured as requested. No board is produced.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ConfigError {
    /// The content pool has fewer distinct symbols than requested pairs.
    InsufficientContent { requested: usize, available: usize },
    /// The pair count is zero or not one of the configured options.
    UnsupportedPairCount { requested: usize },
    /// A countdown mode was configured with zero seconds.
    ZeroDuration,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InsufficientContent {
                requested,
                available,
            } => write!(
                f,
                "requested {requested} pairs but the content pool only has {available} distinct symbols"
            ),
            ConfigError::UnsupportedPairCount { requested } => {
                write!(f, "unsupported pair count {requested}")
            }
            ConfigError::ZeroDuration => write!(f, "countdown duration must be at least one second"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// A tap addressed a position outside the board. Engine state is unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexError {
    pub index: usize,
    pub len: usize,
}

impl std::fmt::Display for IndexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "card index {} out of range for board of {} cards", self.index, self.len)
    }
}

impl std::error::Error for IndexError {}

/// Union of every error the engine can report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameError {
    Config(ConfigError),
    Index(IndexError),
}

impl std::fmt::Display for GameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameError::Config(e) => write!(f, "configuration error: {e}"),
            GameError::Index(e) => write!(f, "index error: {e}"),
        }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GameError::Config(e) => Some(e),
            GameError::Index(e) => Some(e),
        }
    }
}

impl From<ConfigError> for GameError {
    fn from(e: ConfigError) -> Self {
        GameError::Config(e)
    }
}

impl From<IndexError> for GameError {
    fn from(e: IndexError) -> Self {
        GameError::Index(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let e = ConfigError::InsufficientContent {
            requested: 8,
            available: 6,
        };
        assert_eq!(
            e.to_string(),
            "requested 8 pairs but the content pool only has 6 distinct symbols"
        );

        let e = IndexError { index: 12, len: 12 };
        assert_eq!(e.to_string(), "card index 12 out of range for board of 12 cards");
    }

    #[test]
    fn test_game_error_wraps_source() {
        use std::error::Error;

        let err: GameError = ConfigError::ZeroDuration.into();
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("configuration error"));

        let err: GameError = IndexError { index: 3, len: 2 }.into();
        assert_eq!(err, GameError::Index(IndexError { index: 3, len: 2 }));
    }

    #[test]
    fn test_config_error_serialization() {
        let e = ConfigError::UnsupportedPairCount { requested: 3 };
        let json = serde_json::to_string(&e).unwrap();
        assert!(json.contains("UnsupportedPairCount"));
        let back: ConfigError = serde_json::from_str(&json).unwrap();
        assert_eq!(e, back);
    }
}
