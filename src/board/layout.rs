//! Board storage and reshuffling.
//!
//! Cards live in an `im::Vector`, so handing a snapshot to the UI is an
//! O(1) clone that shares structure with the live board.
//!
//! ## Pairing invariant
//!
//! At rest every symbol on the board appears on exactly two cards. Both
//! reshuffles redistribute an existing multiset of symbols, so the
//! invariant holds again as soon as either returns.
//!
//! ```
//! use memory_match::board::Board;
//! use memory_match::cards::Symbol;
//! use memory_match::core::GameRng;
//!
//! let pool: Vec<Symbol> = ["A", "B", "C"].into_iter().map(Symbol::from).collect();
//! let mut rng = GameRng::new(1);
//!
//! let board = Board::deal(3, &pool, &mut rng).unwrap();
//! assert_eq!(board.len(), 6);
//! assert!(board.is_paired());
//! ```

use im::Vector;
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use tracing::debug;

use crate::cards::{Card, CardId, Symbol};
use crate::core::{ConfigError, GameRng};

/// Ordered collection of cards plus a rebuild counter.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Board {
    cards: Vector<Card>,
    /// Bumped on every deal and reshuffle. Only used for UI view identity.
    generation: u64,
}

impl Board {
    /// Deal a fresh, shuffled board of `pair_count` pairs.
    ///
    /// Takes the first `pair_count` distinct symbols of `pool`, creates two
    /// face-down cards for each with sequential ids, then shuffles.
    pub fn deal(pair_count: usize, pool: &[Symbol], rng: &mut GameRng) -> Result<Self, ConfigError> {
        if pair_count == 0 {
            return Err(ConfigError::UnsupportedPairCount { requested: 0 });
        }

        let mut seen = FxHashSet::default();
        let distinct: Vec<&Symbol> = pool.iter().filter(|s| seen.insert(*s)).collect();
        if distinct.len() < pair_count {
            return Err(ConfigError::InsufficientContent {
                requested: pair_count,
                available: distinct.len(),
            });
        }

        let mut cards = Vec::with_capacity(pair_count * 2);
        for (i, symbol) in distinct.into_iter().take(pair_count).enumerate() {
            let first = (i * 2) as u32;
            cards.push(Card::new(CardId::new(first), symbol.clone()));
            cards.push(Card::new(CardId::new(first + 1), symbol.clone()));
        }
        rng.shuffle(&mut cards);

        debug!(target: "board", pair_count, "dealt board");
        Ok(Self {
            cards: Vector::from(cards),
            generation: 1,
        })
    }

    /// Build an unshuffled board with the given symbols in order.
    ///
    /// Ids are assigned 0, 1, 2, ... in layout order. The layout is not
    /// checked for pairing; see [`Board::is_paired`].
    #[must_use]
    pub fn from_layout<I, S>(layout: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Symbol>,
    {
        let cards = layout
            .into_iter()
            .enumerate()
            .map(|(i, s)| Card::new(CardId::new(i as u32), s.into()))
            .collect();
        Self {
            cards,
            generation: 1,
        }
    }

    // === Queries ===

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Card> {
        self.cards.get(index)
    }

    /// Live view of the cards in board order.
    #[must_use]
    pub fn cards(&self) -> &Vector<Card> {
        &self.cards
    }

    /// Detached copy of the cards for a renderer. O(1).
    #[must_use]
    pub fn snapshot(&self) -> Vector<Card> {
        self.cards.clone()
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True iff the board has cards and every one is matched.
    #[must_use]
    pub fn is_all_matched(&self) -> bool {
        !self.cards.is_empty() && self.cards.iter().all(|c| c.matched)
    }

    /// Number of matched pairs on the board.
    #[must_use]
    pub fn matched_pairs(&self) -> usize {
        self.cards.iter().filter(|c| c.matched).count() / 2
    }

    /// Positions of face-up, unmatched cards.
    #[must_use]
    pub fn open_indices(&self) -> SmallVec<[usize; 4]> {
        self.cards
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_open())
            .map(|(i, _)| i)
            .collect()
    }

    /// How many cards carry each symbol.
    #[must_use]
    pub fn symbol_counts(&self) -> FxHashMap<&Symbol, usize> {
        let mut counts = FxHashMap::default();
        for card in &self.cards {
            *counts.entry(&card.content).or_insert(0) += 1;
        }
        counts
    }

    /// Every symbol present appears on exactly two cards.
    #[must_use]
    pub fn is_paired(&self) -> bool {
        self.symbol_counts().values().all(|&n| n == 2)
    }

    // === Mutation ===

    pub(crate) fn card_mut(&mut self, index: usize) -> Option<&mut Card> {
        self.cards.get_mut(index)
    }

    /// Close every open card except `except`.
    ///
    /// Returns how many cards were closed. Callers holding a selection must
    /// clear it; [`MatchEngine::close_stray`](crate::engine::MatchEngine::close_stray)
    /// does both.
    pub fn close_stray(&mut self, except: Option<usize>) -> usize {
        let mut closed = 0;
        for i in self.open_indices() {
            if Some(i) == except {
                continue;
            }
            if let Some(card) = self.cards.get_mut(i) {
                card.close();
                closed += 1;
            }
        }
        closed
    }

    /// Shuffle the symbols among the unmatched positions (Impossible mode).
    ///
    /// Matched cards are untouched; unmatched cards keep their ids and are
    /// returned face-down.
    pub fn reshuffle_partial(&mut self, rng: &mut GameRng) {
        let positions: Vec<usize> = self
            .cards
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.matched)
            .map(|(i, _)| i)
            .collect();

        let mut contents: Vec<Symbol> = positions
            .iter()
            .map(|&i| self.cards[i].content.clone())
            .collect();
        rng.shuffle(&mut contents);

        for (&i, content) in positions.iter().zip(contents) {
            self.cards[i].redeal(content);
        }
        self.generation += 1;

        debug!(
            target: "board",
            generation = self.generation,
            unmatched = positions.len(),
            "reshuffled unmatched cards"
        );
    }

    /// Rebuild the whole board from its symbols (Genie mode).
    ///
    /// Every card, matched or not, is dealt again face-down with fresh
    /// sequential ids and the order is shuffled. All match progress is lost.
    pub fn reshuffle_full(&mut self, rng: &mut GameRng) {
        let mut cards: Vec<Card> = self
            .cards
            .iter()
            .enumerate()
            .map(|(i, c)| Card::new(CardId::new(i as u32), c.content.clone()))
            .collect();
        rng.shuffle(&mut cards);

        self.cards = Vector::from(cards);
        self.generation += 1;

        debug!(target: "board", generation = self.generation, "rebuilt entire board");
    }

    /// Turn every unmatched card face-up (time expiry).
    ///
    /// Mismatch highlights are dropped: no flip-back will run after this.
    pub fn reveal_all(&mut self) {
        for card in self.cards.iter_mut().filter(|c| !c.matched) {
            card.face_up = true;
            card.mismatched = false;
        }
    }
}
