//! A single card on the board.
//!
//! A card never shows `matched` while face-down: matched cards stay
//! face-up until the board is rebuilt. `mismatched` is only set between a
//! failed comparison and the deferred flip-back.

use serde::{Deserialize, Serialize};

/// Identifier for a card, unique and stable within one board.
///
/// Ids survive an Impossible-mode reshuffle; a Genie reshuffle reassigns them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// The matching key printed on a card (an emoji in the default pool).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One card: immutable identity plus display state.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub content: Symbol,
    pub face_up: bool,
    pub matched: bool,
    /// Transient highlight between a failed comparison and flip-back.
    pub mismatched: bool,
}

impl Card {
    /// Create a face-down, unmatched card.
    #[must_use]
    pub fn new(id: CardId, content: Symbol) -> Self {
        Self {
            id,
            content,
            face_up: false,
            matched: false,
            mismatched: false,
        }
    }

    /// Face-up but not yet matched.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.face_up && !self.matched
    }

    /// A tap on this card would do something.
    #[must_use]
    pub fn is_selectable(&self) -> bool {
        !self.face_up && !self.matched
    }

    /// Turn face-down and drop the mismatch highlight.
    pub fn close(&mut self) {
        self.face_up = false;
        self.mismatched = false;
    }

    /// Put a new symbol on this card and return it to its dealt state.
    pub fn redeal(&mut self, content: Symbol) {
        self.content = content;
        self.face_up = false;
        self.matched = false;
        self.mismatched = false;
    }
}
