//! Card model: identity, matching key and display state.
//!
//! ## Key Types
//!
//! - `CardId`: Stable identifier for a card within one board
//! - `Symbol`: The matching key; exactly two cards per board share one
//! - `Card`: Identity plus the mutable face-up / matched / mismatched flags

pub mod card;

pub use card::{Card, CardId, Symbol};
