//! Per-mode behaviour table.

use serde::{Deserialize, Serialize};

use super::Mode;
use crate::board::Board;
use crate::core::GameRng;

/// What happens to the board once a mismatch has flipped back.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MismatchEffect {
    /// Board is left as it is.
    Nothing,
    /// Symbols among unmatched positions are reshuffled.
    ReshuffleUnmatched,
    /// Whole board is rebuilt and every match is undone.
    RebuildBoard,
}

impl MismatchEffect {
    /// Whether this effect moves symbols around.
    ///
    /// Open cards must be closed before any such effect runs, or a card left
    /// face-up across the reshuffle would show a symbol its pair no longer has.
    #[must_use]
    pub fn reshuffles(self) -> bool {
        !matches!(self, MismatchEffect::Nothing)
    }

    /// Apply the effect to `board`.
    pub fn apply(self, board: &mut Board, rng: &mut GameRng) {
        match self {
            MismatchEffect::Nothing => {}
            MismatchEffect::ReshuffleUnmatched => board.reshuffle_partial(rng),
            MismatchEffect::RebuildBoard => board.reshuffle_full(rng),
        }
    }
}

/// Resolved behaviour for one mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModePolicy {
    /// Countdown length, or `None` when only elapsed time is tracked.
    pub countdown_secs: Option<u32>,
    /// Board effect after a mismatch resolves.
    pub on_mismatch: MismatchEffect,
}

impl ModePolicy {
    #[must_use]
    pub fn for_mode(mode: Mode) -> Self {
        let on_mismatch = match mode {
            Mode::FreePlay | Mode::Challenge(_) => MismatchEffect::Nothing,
            Mode::Impossible(_) => MismatchEffect::ReshuffleUnmatched,
            Mode::Genie(_) => MismatchEffect::RebuildBoard,
        };
        Self {
            countdown_secs: mode.duration_secs(),
            on_mismatch,
        }
    }

    #[must_use]
    pub fn has_countdown(&self) -> bool {
        self.countdown_secs.is_some()
    }
}

impl From<Mode> for ModePolicy {
    fn from(mode: Mode) -> Self {
        Self::for_mode(mode)
    }
}
