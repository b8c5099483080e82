//! Python bindings for the memory-match engine.
//!
//! # Quick Start
//!
//! ```python
//! import memory_match as mm
//!
//! game = mm.MemoryGame(seed=42)
//! game.start_game("challenge", pair_count=6, seconds=60)
//!
//! game.tap_card(0)
//! game.advance(1000)
//! print(game.timer, [c.content for c in game.cards])
//! ```

use pyo3::prelude::*;

mod py_core;
mod py_session;

pub use py_core::*;
pub use py_session::*;

/// memory_match: a matching-pairs card game engine.
#[pymodule]
fn memory_match(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyCard>()?;
    m.add_class::<PyTimer>()?;
    m.add_class::<PyMemoryGame>()?;
    Ok(())
}
