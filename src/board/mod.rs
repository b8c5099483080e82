//! The board: an ordered run of cards and the operations that deal,
//! close, reveal and reshuffle them.

mod layout;

pub use layout::Board;
