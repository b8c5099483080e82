//! Detached view of a session for rendering.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::SessionPhase;
use crate::cards::Card;
use crate::engine::EngineState;
use crate::modes::Mode;
use crate::timer::TimerDisplay;

/// Everything the UI needs to draw one frame.
///
/// `cards` shares structure with the live board, so taking a snapshot per
/// frame is cheap.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id: u64,
    pub phase: SessionPhase,
    pub mode: Mode,
    pub cards: Vector<Card>,
    pub board_generation: u64,
    pub timer: TimerDisplay,
    pub shaking: bool,
    pub engine_state: EngineState,
}

impl SessionSnapshot {
    /// Identity for the rendered grid. Changes whenever the board is rebuilt
    /// or a new game starts, so a view keyed on it re-creates its cards.
    #[must_use]
    pub fn view_id(&self) -> (u64, u64) {
        (self.session_id, self.board_generation)
    }

    /// Number of matched pairs shown.
    #[must_use]
    pub fn matched_pairs(&self) -> usize {
        self.cards.iter().filter(|c| c.matched).count() / 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SessionConfig;
    use crate::session::SessionController;

    #[test]
    fn test_view_id_changes_on_rebuild() {
        let mut session = SessionController::new(SessionConfig::default().with_seed(3));
        session.start_game(Mode::FreePlay, 2).unwrap();
        let first = session.snapshot().view_id();

        session.reset().unwrap();
        let second = session.snapshot().view_id();
        assert_ne!(first, second);
    }

    #[test]
    fn test_snapshot_serialization() {
        let mut session = SessionController::new(SessionConfig::default().with_seed(3));
        session.start_game(Mode::Genie(Some(20)), 4).unwrap();
        session.tap_card(0).unwrap();

        let snapshot = session.snapshot();
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: SessionSnapshot = serde_json::from_str(&json).unwrap();

        assert_eq!(snapshot, back);
        assert_eq!(back.cards.len(), 8);
        assert!(back.cards[0].face_up);
        assert_eq!(back.matched_pairs(), 0);
    }
}
