//! Session bindings for Python.

use pyo3::exceptions::{PyIndexError, PyValueError};
use pyo3::prelude::*;

use crate::core::{GameError, SessionConfig};
use crate::engine::SelectOutcome;
use crate::modes::Mode;
use crate::session::{SessionController, SessionPhase};

use super::py_core::{PyCard, PyTimer};

/// Parse a mode name as used from Python.
fn parse_mode(name: &str, seconds: Option<u32>) -> PyResult<Mode> {
    let need_seconds = || {
        seconds.ok_or_else(|| PyValueError::new_err(format!("mode '{name}' requires seconds")))
    };
    match name.to_ascii_lowercase().as_str() {
        "free_play" | "freeplay" | "free" => Ok(Mode::FreePlay),
        "challenge" => Ok(Mode::Challenge(need_seconds()?)),
        "impossible" => Ok(Mode::Impossible(need_seconds()?)),
        "genie" => Ok(Mode::Genie(seconds)),
        _ => Err(PyValueError::new_err(format!("unknown mode '{name}'"))),
    }
}

/// Map an engine error to the matching Python exception.
fn to_py_err(err: impl Into<GameError>) -> PyErr {
    match err.into() {
        err @ GameError::Config(_) => PyValueError::new_err(err.to_string()),
        err @ GameError::Index(_) => PyIndexError::new_err(err.to_string()),
    }
}

fn phase_name(phase: SessionPhase) -> &'static str {
    match phase {
        SessionPhase::Setup => "setup",
        SessionPhase::Playing => "playing",
        SessionPhase::Won => "won",
        SessionPhase::Lost => "lost",
    }
}

/// Python wrapper for SessionController.
///
/// Time only moves when `advance` is called.
#[pyclass(name = "MemoryGame")]
pub struct PyMemoryGame {
    session: SessionController,
}

#[pymethods]
impl PyMemoryGame {
    /// Create a new game in the setup phase.
    ///
    /// # Arguments
    /// - seed: RNG seed for deterministic shuffles; random if omitted
    /// - content: Symbols to deal from; the built-in pool if omitted
    #[new]
    #[pyo3(signature = (seed = None, content = None))]
    fn new(seed: Option<u64>, content: Option<Vec<String>>) -> Self {
        let mut config = SessionConfig::default();
        if let Some(seed) = seed {
            config = config.with_seed(seed);
        }
        if let Some(content) = content {
            config = config.with_content_pool(content);
        }
        Self {
            session: SessionController::new(config),
        }
    }

    /// Deal a board and start playing.
    ///
    /// Raises ValueError for an unknown mode or an invalid configuration.
    #[pyo3(signature = (mode = "free_play", pair_count = 6, seconds = None))]
    fn start_game(&mut self, mode: &str, pair_count: usize, seconds: Option<u32>) -> PyResult<()> {
        let mode = parse_mode(mode, seconds)?;
        self.session.start_game(mode, pair_count).map_err(to_py_err)
    }

    /// Tap a card.
    ///
    /// Returns "ignored", "first", "matched" or "mismatched".
    fn tap_card(&mut self, index: usize) -> PyResult<&'static str> {
        let outcome = self.session.tap_card(index).map_err(to_py_err)?;
        Ok(match outcome {
            SelectOutcome::Ignored => "ignored",
            SelectOutcome::FirstSelected { .. } => "first",
            SelectOutcome::Matched { .. } => "matched",
            SelectOutcome::Mismatched { .. } => "mismatched",
        })
    }

    /// Re-deal with the same mode and pair count.
    fn reset(&mut self) -> PyResult<()> {
        self.session.reset().map_err(to_py_err)
    }

    /// Return to the setup phase.
    fn abandon(&mut self) {
        self.session.abandon();
    }

    /// Let `elapsed_ms` milliseconds pass.
    fn advance(&mut self, elapsed_ms: u64) {
        self.session.advance(elapsed_ms);
    }

    #[getter]
    fn phase(&self) -> &'static str {
        phase_name(self.session.phase())
    }

    #[getter]
    fn mode(&self) -> String {
        self.session.mode().to_string()
    }

    #[getter]
    fn session_id(&self) -> u64 {
        self.session.session_id()
    }

    #[getter]
    fn seed(&self) -> u64 {
        self.session.seed()
    }

    #[getter]
    fn cards(&self) -> Vec<PyCard> {
        self.session.board_snapshot().into_iter().map(PyCard).collect()
    }

    #[getter]
    fn timer(&self) -> PyTimer {
        PyTimer(self.session.timer_display())
    }

    #[getter]
    fn shaking(&self) -> bool {
        self.session.is_shaking()
    }

    /// (session_id, board_generation); changes whenever the grid is rebuilt.
    #[getter]
    fn view_id(&self) -> (u64, u64) {
        (self.session.session_id(), self.session.board_generation())
    }

    fn __repr__(&self) -> String {
        format!(
            "MemoryGame(phase={}, mode={}, cards={})",
            phase_name(self.session.phase()),
            self.session.mode(),
            self.session.board_snapshot().len()
        )
    }
}
