//! Time-ordered event queue.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::trace;

/// Unique identifier for a scheduled event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EventId(pub u64);

impl EventId {
    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Event({})", self.0)
    }
}

/// What should happen when an event comes due.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeferredEvent {
    /// One clock tick from the timer opened at `epoch`.
    TimerTick { epoch: u64 },
    /// Check whether the last match finished the board.
    WinCheck,
    /// Flip a mismatched pair back and apply the mode's mismatch effect.
    ResolveMismatch { first: usize, second: usize },
    /// Raise the shaking flag after time ran out.
    LossShake,
    /// Move the session to `Lost`.
    LossFinal,
}

/// An event waiting in the queue.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledEvent {
    pub id: EventId,
    /// Virtual time at which the event fires.
    pub due_ms: u64,
    /// Session that scheduled the event.
    pub session: u64,
    pub event: DeferredEvent,
}

/// Events ordered by due time, ties broken by scheduling order.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EventQueue {
    now_ms: u64,
    entries: VecDeque<ScheduledEvent>,
    next_id: u64,
}

impl EventQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pending events in firing order.
    pub fn pending(&self) -> impl Iterator<Item = &ScheduledEvent> {
        self.entries.iter()
    }

    /// Due time of the earliest pending event.
    #[must_use]
    pub fn next_due(&self) -> Option<u64> {
        self.entries.front().map(|e| e.due_ms)
    }

    /// Schedule `event` to fire `delay_ms` after the current time.
    ///
    /// Due times saturate at `u64::MAX`.
    pub fn schedule(&mut self, delay_ms: u64, session: u64, event: DeferredEvent) -> EventId {
        let id = EventId(self.next_id);
        self.next_id += 1;

        let due_ms = self.now_ms.saturating_add(delay_ms);
        // Later ids always sort after equal due times.
        let pos = self.entries.partition_point(|e| e.due_ms <= due_ms);
        self.entries.insert(
            pos,
            ScheduledEvent {
                id,
                due_ms,
                session,
                event,
            },
        );

        trace!(target: "schedule", %id, due_ms, session, ?event, "scheduled");
        id
    }

    /// Remove and return the earliest event due at or before `until_ms`,
    /// moving the clock to its due time.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<ScheduledEvent> {
        if self.entries.front()?.due_ms > until_ms {
            return None;
        }
        let entry = self.entries.pop_front()?;
        self.now_ms = self.now_ms.max(entry.due_ms);
        Some(entry)
    }

    /// Move the clock forward to `to_ms`. Never moves backwards.
    pub fn advance_clock(&mut self, to_ms: u64) {
        self.now_ms = self.now_ms.max(to_ms);
    }

    /// Drop every pending event.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
