//! The four play modes.

use serde::{Deserialize, Serialize};

use crate::core::ConfigError;

/// Play mode, fixed for the lifetime of a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "mode", content = "seconds")]
pub enum Mode {
    /// No countdown, no penalties.
    #[default]
    FreePlay,
    /// Countdown; running out loses.
    Challenge(u32),
    /// Countdown; every mismatch reshuffles the unmatched cards.
    Impossible(u32),
    /// Optional countdown; every mismatch wipes all progress and rebuilds the board.
    Genie(Option<u32>),
}

impl Mode {
    /// Countdown length in seconds, if this mode has one.
    #[must_use]
    pub fn duration_secs(&self) -> Option<u32> {
        match *self {
            Mode::FreePlay => None,
            Mode::Challenge(s) | Mode::Impossible(s) => Some(s),
            Mode::Genie(s) => s,
        }
    }

    #[must_use]
    pub fn has_countdown(&self) -> bool {
        self.duration_secs().is_some()
    }

    /// Short display name.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Mode::FreePlay => "Free Play",
            Mode::Challenge(_) => "Challenge",
            Mode::Impossible(_) => "Impossible",
            Mode::Genie(_) => "Genie Mode",
        }
    }

    /// Check the mode is playable and normalise it.
    ///
    /// Challenge and Impossible need a non-zero countdown. A Genie
    /// countdown of zero means the player did not set a timer.
    pub fn validated(self) -> Result<Self, ConfigError> {
        match self {
            Mode::Challenge(0) | Mode::Impossible(0) => Err(ConfigError::ZeroDuration),
            Mode::Genie(Some(0)) => Ok(Mode::Genie(None)),
            other => Ok(other),
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.duration_secs() {
            Some(s) => write!(f, "{} ({}s)", self.label(), s),
            None => f.write_str(self.label()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_durations() {
        assert_eq!(Mode::FreePlay.duration_secs(), None);
        assert_eq!(Mode::Challenge(60).duration_secs(), Some(60));
        assert_eq!(Mode::Impossible(90).duration_secs(), Some(90));
        assert_eq!(Mode::Genie(Some(30)).duration_secs(), Some(30));
        assert_eq!(Mode::Genie(None).duration_secs(), None);

        assert!(!Mode::FreePlay.has_countdown());
        assert!(Mode::Challenge(1).has_countdown());
        assert!(!Mode::Genie(None).has_countdown());
    }

    #[test]
    fn test_validated() {
        assert_eq!(Mode::Challenge(0).validated(), Err(ConfigError::ZeroDuration));
        assert_eq!(Mode::Impossible(0).validated(), Err(ConfigError::ZeroDuration));
        assert_eq!(Mode::Genie(Some(0)).validated(), Ok(Mode::Genie(None)));
        assert_eq!(Mode::Challenge(5).validated(), Ok(Mode::Challenge(5)));
        assert_eq!(Mode::FreePlay.validated(), Ok(Mode::FreePlay));
    }

    #[test]
    fn test_display() {
        assert_eq!(Mode::FreePlay.to_string(), "Free Play");
        assert_eq!(Mode::Challenge(60).to_string(), "Challenge (60s)");
        assert_eq!(Mode::Genie(None).to_string(), "Genie Mode");
    }

    #[test]
    fn test_serialization() {
        for mode in [
            Mode::FreePlay,
            Mode::Challenge(60),
            Mode::Impossible(45),
            Mode::Genie(Some(10)),
            Mode::Genie(None),
        ] {
            let json = serde_json::to_string(&mode).unwrap();
            let back: Mode = serde_json::from_str(&json).unwrap();
            assert_eq!(mode, back);
        }
    }
}
