//! Deferred events on a virtual millisecond clock.
//!
//! All asynchronous behaviour of a session (clock ticks, the win check
//! after a match, mismatch flip-back, loss pacing) is modelled as
//! [`ScheduledEvent`]s in one [`EventQueue`]. The host advances the clock;
//! the session pops due events one at a time and handles each
//! synchronously, so no handler ever observes a half-applied mutation.
//!
//! Every event carries the id of the session that scheduled it. Handlers
//! drop events whose session id is no longer current.

mod queue;

pub use queue::{DeferredEvent, EventId, EventQueue, ScheduledEvent};
