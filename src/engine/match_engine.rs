//! Match engine state machine.
//!
//! ```text
//!   Idle --select--> OneSelected --select(match)----> Idle
//!                         |
//!                         +--select(mismatch)--> Resolving --resolve--> Idle
//! ```
//!
//! A tap while `Resolving` is accepted and starts a new selection. A
//! pending resolution only flips back its own pair, and only if neither
//! card has since been reused in a newer mismatch. A reshuffling mode
//! force-closes every open card before it moves symbols.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::debug;

use crate::board::Board;
use crate::cards::Card;
use crate::core::{GameRng, IndexError};
use crate::modes::{MismatchEffect, ModePolicy};

/// Where the engine is in a selection cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    /// No selection and nothing pending.
    Idle,
    /// One card is face-up awaiting its partner.
    OneSelected { first: usize },
    /// No selection, at least one mismatch waiting to flip back.
    Resolving,
}

/// Result of one `select` call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectOutcome {
    /// The card was already face-up or matched. Nothing changed.
    Ignored,
    /// The card is now the first of a pair.
    FirstSelected { index: usize },
    /// Both cards are now matched. Caller should schedule a win check.
    Matched { first: usize, second: usize },
    /// Both cards are flagged mismatched. Caller should schedule the flip-back.
    Mismatched { first: usize, second: usize },
}

/// What a mismatch resolution did to the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MismatchResolution {
    /// Cards of the pair that were still showing and got flipped back.
    pub flipped_back: usize,
    /// Effect the mode applied afterwards.
    pub effect: MismatchEffect,
}

/// A mismatch waiting for its flip-back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PendingMismatch {
    first: usize,
    second: usize,
    /// Cleared when either card joins a newer mismatch.
    owns_cards: bool,
}

impl PendingMismatch {
    fn involves(&self, index: usize) -> bool {
        self.first == index || self.second == index
    }
}

/// Board plus selection state for one session.
#[derive(Clone, Debug)]
pub struct MatchEngine {
    board: Board,
    policy: ModePolicy,
    selection: Option<usize>,
    /// Unresolved mismatches in the order they were made.
    pending: SmallVec<[PendingMismatch; 4]>,
}

impl MatchEngine {
    #[must_use]
    pub fn new(board: Board, policy: ModePolicy) -> Self {
        Self {
            board,
            policy,
            selection: None,
            pending: SmallVec::new(),
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn policy(&self) -> ModePolicy {
        self.policy
    }

    /// Index of the first-selected card, if any.
    #[must_use]
    pub fn selection(&self) -> Option<usize> {
        self.selection
    }

    #[must_use]
    pub fn state(&self) -> EngineState {
        match self.selection {
            Some(first) => EngineState::OneSelected { first },
            None if self.pending.iter().any(|p| p.owns_cards) => EngineState::Resolving,
            None => EngineState::Idle,
        }
    }

    #[must_use]
    pub fn is_all_matched(&self) -> bool {
        self.board.is_all_matched()
    }

    /// Tap the card at `index`.
    ///
    /// Out-of-range indices are an error; taps on face-up or matched cards
    /// are ignored without changing anything.
    pub fn select(&mut self, index: usize) -> Result<SelectOutcome, IndexError> {
        let len = self.board.len();
        let Some(card) = self.board.get(index) else {
            return Err(IndexError { index, len });
        };
        if !card.is_selectable() {
            return Ok(SelectOutcome::Ignored);
        }

        let first = self
            .selection
            .take()
            .filter(|&p| self.board.get(p).is_some_and(Card::is_open));

        let Some(first) = first else {
            self.board.close_stray(Some(index));
            self.flip_up(index);
            self.selection = Some(index);
            debug!(target: "engine", index, "first card selected");
            return Ok(SelectOutcome::FirstSelected { index });
        };

        self.flip_up(index);
        let same = self.board.get(first).map(|c| &c.content) == self.board.get(index).map(|c| &c.content);

        if same {
            self.release_cards(first, index);
            for i in [first, index] {
                if let Some(card) = self.board.card_mut(i) {
                    card.matched = true;
                }
            }
            debug!(target: "engine", first, second = index, "matched");
            Ok(SelectOutcome::Matched {
                first,
                second: index,
            })
        } else {
            for i in [first, index] {
                if let Some(card) = self.board.card_mut(i) {
                    card.mismatched = true;
                }
            }
            self.release_cards(first, index);
            self.pending.push(PendingMismatch {
                first,
                second: index,
                owns_cards: true,
            });
            debug!(target: "engine", first, second = index, "mismatched");
            Ok(SelectOutcome::Mismatched {
                first,
                second: index,
            })
        }
    }

    /// Close every open card except `except` and drop the selection.
    pub fn close_stray(&mut self, except: Option<usize>) -> usize {
        self.selection = None;
        self.board.close_stray(except)
    }

    /// Finish a mismatch scheduled by an earlier `select`.
    ///
    /// Resolutions arrive in the order the mismatches were made. The pair
    /// is flipped back only if neither card was reused in a newer mismatch,
    /// and only cards still flagged mismatched are closed. The mode's
    /// mismatch effect is applied either way. Reshuffling effects close
    /// every open card and drop the selection first.
    pub fn resolve_mismatch(&mut self, first: usize, second: usize, rng: &mut GameRng) -> MismatchResolution {
        let owns_cards = match self.pending.iter().position(|p| p.first == first && p.second == second) {
            Some(pos) => self.pending.remove(pos).owns_cards,
            None => false,
        };

        let mut flipped_back = 0;
        if owns_cards {
            for i in [first, second] {
                if let Some(card) = self.board.card_mut(i) {
                    if card.mismatched && !card.matched {
                        card.close();
                        flipped_back += 1;
                    }
                }
            }
        }

        let effect = self.policy.on_mismatch;
        if effect.reshuffles() {
            self.close_stray(None);
            effect.apply(&mut self.board, rng);
        }

        debug!(target: "engine", first, second, flipped_back, ?effect, "mismatch resolved");
        MismatchResolution {
            flipped_back,
            effect,
        }
    }

    /// Turn every unmatched card face-up, drop the selection and forget
    /// pending mismatches.
    pub fn reveal_all(&mut self) {
        self.selection = None;
        self.pending.clear();
        self.board.reveal_all();
    }

    /// Older pending mismatches stop owning cards that were just reused.
    fn release_cards(&mut self, first: usize, second: usize) {
        for older in self.pending.iter_mut().filter(|p| p.involves(first) || p.involves(second)) {
            older.owns_cards = false;
        }
    }

    fn flip_up(&mut self, index: usize) {
        if let Some(card) = self.board.card_mut(index) {
            card.face_up = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modes::Mode;

    fn engine(mode: Mode) -> MatchEngine {
        MatchEngine::new(Board::from_layout(["A", "B", "A", "B"]), ModePolicy::for_mode(mode))
    }

    #[test]
    fn test_first_selection() {
        let mut engine = engine(Mode::FreePlay);
        assert_eq!(engine.state(), EngineState::Idle);

        assert_eq!(engine.select(0), Ok(SelectOutcome::FirstSelected { index: 0 }));
        assert!(engine.board().get(0).unwrap().face_up);
        assert_eq!(engine.state(), EngineState::OneSelected { first: 0 });
    }

    #[test]
    fn test_match_returns_to_idle() {
        let mut engine = engine(Mode::FreePlay);
        engine.select(0).unwrap();

        assert_eq!(engine.select(2), Ok(SelectOutcome::Matched { first: 0, second: 2 }));
        for i in [0, 2] {
            let card = engine.board().get(i).unwrap();
            assert!(card.matched && card.face_up);
        }
        assert_eq!(engine.state(), EngineState::Idle);
        assert!(!engine.is_all_matched());

        engine.select(1).unwrap();
        engine.select(3).unwrap();
        assert!(engine.is_all_matched());
    }

    #[test]
    fn test_mismatch_then_resolve() {
        let mut engine = engine(Mode::Challenge(30));
        engine.select(0).unwrap();

        assert_eq!(engine.select(1), Ok(SelectOutcome::Mismatched { first: 0, second: 1 }));
        assert!(engine.board().get(0).unwrap().mismatched);
        assert!(engine.board().get(1).unwrap().mismatched);
        assert_eq!(engine.state(), EngineState::Resolving);

        let before = engine.board().generation();
        let resolution = engine.resolve_mismatch(0, 1, &mut GameRng::new(1));
        assert_eq!(resolution.flipped_back, 2);
        assert_eq!(resolution.effect, MismatchEffect::Nothing);
        assert_eq!(engine.state(), EngineState::Idle);
        assert!(engine.board().cards().iter().all(Card::is_selectable));
        assert_eq!(engine.board().generation(), before);

        let layout: Vec<&str> = engine.board().cards().iter().map(|c| c.content.as_str()).collect();
        assert_eq!(layout, vec!["A", "B", "A", "B"]);
    }

    #[test]
    fn test_taps_on_face_up_or_matched_are_ignored() {
        let mut engine = engine(Mode::FreePlay);
        engine.select(0).unwrap();
        let before = engine.board().clone();

        assert_eq!(engine.select(0), Ok(SelectOutcome::Ignored));
        assert_eq!(engine.board(), &before);
        assert_eq!(engine.state(), EngineState::OneSelected { first: 0 });

        engine.select(2).unwrap();
        let before = engine.board().clone();
        assert_eq!(engine.select(2), Ok(SelectOutcome::Ignored));
        assert_eq!(engine.board(), &before);
    }

    #[test]
    fn test_out_of_range_is_an_error() {
        let mut engine = engine(Mode::FreePlay);
        assert_eq!(engine.select(4), Err(IndexError { index: 4, len: 4 }));
        assert_eq!(engine.state(), EngineState::Idle);
    }

    #[test]
    fn test_tap_during_resolution_closes_mismatched_pair() {
        let mut engine = engine(Mode::FreePlay);
        engine.select(0).unwrap();
        engine.select(1).unwrap();

        // Player taps card 2 before the flip-back fires.
        assert_eq!(engine.select(2), Ok(SelectOutcome::FirstSelected { index: 2 }));
        assert!(!engine.board().get(0).unwrap().face_up);
        assert!(!engine.board().get(1).unwrap().face_up);

        let resolution = engine.resolve_mismatch(0, 1, &mut GameRng::new(1));
        assert_eq!(resolution.flipped_back, 0);
        assert!(engine.board().get(2).unwrap().face_up);
        assert_eq!(engine.state(), EngineState::OneSelected { first: 2 });
    }

    #[test]
    fn test_late_flip_back_never_hides_a_match() {
        let mut engine = engine(Mode::FreePlay);
        engine.select(0).unwrap();
        engine.select(1).unwrap();

        // Before the flip-back, the player reopens card 0 and matches it.
        engine.select(2).unwrap();
        engine.select(0).unwrap();
        assert!(engine.board().get(0).unwrap().matched);

        engine.resolve_mismatch(0, 1, &mut GameRng::new(1));
        let card = engine.board().get(0).unwrap();
        assert!(card.matched && card.face_up);
    }

    #[test]
    fn test_impossible_reshuffles_unmatched() {
        let mut engine = MatchEngine::new(
            Board::from_layout(["A", "B", "A", "B", "C", "C"]),
            ModePolicy::for_mode(Mode::Impossible(60)),
        );
        engine.select(0).unwrap();
        engine.select(2).unwrap();
        engine.select(1).unwrap();
        engine.select(4).unwrap();
        // Stray tap during the window.
        engine.select(3).unwrap();

        let resolution = engine.resolve_mismatch(1, 4, &mut GameRng::new(9));
        assert_eq!(resolution.effect, MismatchEffect::ReshuffleUnmatched);
        assert_eq!(engine.state(), EngineState::Idle);
        assert_eq!(engine.board().generation(), 2);
        assert!(engine.board().is_paired());
        assert!(engine.board().get(0).unwrap().matched);
        assert!(engine.board().get(2).unwrap().matched);
        assert!(engine.board().open_indices().is_empty());
    }

    #[test]
    fn test_genie_rebuilds_board() {
        let mut engine = MatchEngine::new(
            Board::from_layout(["A", "B", "A", "B", "C", "C"]),
            ModePolicy::for_mode(Mode::Genie(Some(30))),
        );
        engine.select(0).unwrap();
        engine.select(2).unwrap();
        engine.select(1).unwrap();
        engine.select(4).unwrap();

        let resolution = engine.resolve_mismatch(1, 4, &mut GameRng::new(5));
        assert_eq!(resolution.effect, MismatchEffect::RebuildBoard);
        assert_eq!(engine.board().matched_pairs(), 0);
        assert!(engine.board().is_paired());
        assert!(!engine.is_all_matched());
    }

    #[test]
    fn test_reveal_all_drops_selection() {
        let mut engine = engine(Mode::Challenge(10));
        engine.select(0).unwrap();
        engine.reveal_all();
        assert_eq!(engine.state(), EngineState::Idle);
        assert!(engine.board().cards().iter().all(|c| c.face_up));
    }

    #[test]
    fn test_reveal_all_clears_pending_mismatch() {
        let mut engine = engine(Mode::Challenge(10));
        engine.select(0).unwrap();
        engine.select(1).unwrap();
        assert_eq!(engine.state(), EngineState::Resolving);

        engine.reveal_all();
        assert_eq!(engine.state(), EngineState::Idle);
        assert!(engine.board().cards().iter().all(|c| c.face_up && !c.mismatched));
    }

    #[test]
    fn test_older_resolution_leaves_reused_card_alone() {
        let mut engine = MatchEngine::new(
            Board::from_layout(["A", "B", "C", "A", "B", "C"]),
            ModePolicy::for_mode(Mode::FreePlay),
        );
        engine.select(0).unwrap();
        engine.select(1).unwrap();

        // Card 0 is reused in a second mismatch before the first flips back.
        engine.select(2).unwrap();
        assert_eq!(engine.select(0), Ok(SelectOutcome::Mismatched { first: 2, second: 0 }));

        let resolution = engine.resolve_mismatch(0, 1, &mut GameRng::new(1));
        assert_eq!(resolution.flipped_back, 0);
        for i in [0, 2] {
            let card = engine.board().get(i).unwrap();
            assert!(card.face_up && card.mismatched);
        }
        assert_eq!(engine.state(), EngineState::Resolving);

        let resolution = engine.resolve_mismatch(2, 0, &mut GameRng::new(1));
        assert_eq!(resolution.flipped_back, 2);
        assert!(engine.board().cards().iter().all(Card::is_selectable));
        assert_eq!(engine.state(), EngineState::Idle);
    }
}
