//! Card and clock bindings for Python.

use pyo3::prelude::*;

use crate::cards::Card;
use crate::timer::{TimerDisplay, TimerUrgency};

/// Python wrapper for Card.
#[pyclass(name = "Card")]
#[derive(Clone, Debug)]
pub struct PyCard(pub Card);

#[pymethods]
impl PyCard {
    /// Stable card ID.
    #[getter]
    fn id(&self) -> u32 {
        self.0.id.raw()
    }

    #[getter]
    fn content(&self) -> String {
        self.0.content.to_string()
    }

    #[getter]
    fn face_up(&self) -> bool {
        self.0.face_up
    }

    #[getter]
    fn matched(&self) -> bool {
        self.0.matched
    }

    #[getter]
    fn mismatched(&self) -> bool {
        self.0.mismatched
    }

    fn __repr__(&self) -> String {
        format!(
            "Card(id={}, content={:?}, face_up={}, matched={})",
            self.0.id.raw(),
            self.0.content.as_str(),
            self.0.face_up,
            self.0.matched
        )
    }

    fn __eq__(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

/// Python wrapper for TimerDisplay.
#[pyclass(name = "Timer")]
#[derive(Clone, Copy, Debug)]
pub struct PyTimer(pub TimerDisplay);

#[pymethods]
impl PyTimer {
    #[getter]
    fn elapsed(&self) -> u32 {
        self.0.elapsed
    }

    #[getter]
    fn remaining(&self) -> u32 {
        self.0.remaining
    }

    #[getter]
    fn has_countdown(&self) -> bool {
        self.0.has_countdown
    }

    /// "normal", "warning" or "critical".
    #[getter]
    fn urgency(&self) -> &'static str {
        match self.0.urgency() {
            TimerUrgency::Normal => "normal",
            TimerUrgency::Warning => "warning",
            TimerUrgency::Critical => "critical",
        }
    }

    fn __str__(&self) -> String {
        self.0.to_string()
    }

    fn __repr__(&self) -> String {
        format!(
            "Timer(elapsed={}, remaining={}, has_countdown={})",
            self.0.elapsed, self.0.remaining, self.0.has_countdown
        )
    }
}
