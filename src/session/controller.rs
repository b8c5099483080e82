//! Session controller.
//!
//! ## Phases
//!
//! ```text
//!   Setup --start_game--> Playing --all matched--> Won
//!                           |  ^                    |
//!                           |  +------reset---------+
//!                           +----time expired-----> Lost
//!   any --abandon--> Setup
//! ```
//!
//! ## Time
//!
//! The host calls [`SessionController::advance`] with wall-clock time that
//! has passed. Due events (clock ticks, win checks, mismatch flip-backs,
//! loss pacing) are handled one at a time in due order, including events
//! scheduled by earlier handlers within the same call.
//!
//! ## Example
//!
//! ```
//! use memory_match::core::SessionConfig;
//! use memory_match::modes::Mode;
//! use memory_match::session::{SessionController, SessionPhase};
//!
//! let mut session = SessionController::new(SessionConfig::default().with_seed(1));
//! session.start_game(Mode::Challenge(30), 2).unwrap();
//! assert_eq!(session.phase(), SessionPhase::Playing);
//!
//! session.advance(30_000);
//! session.advance(1_500);
//! assert_eq!(session.phase(), SessionPhase::Lost);
//! ```

use im::Vector;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};

use super::SessionSnapshot;
use crate::board::Board;
use crate::cards::Card;
use crate::core::{ConfigError, GameRng, IndexError, SessionConfig};
use crate::engine::{EngineState, MatchEngine, SelectOutcome};
use crate::modes::{Mode, ModePolicy};
use crate::schedule::{DeferredEvent, EventQueue, ScheduledEvent};
use crate::timer::{TickOutcome, TimerController, TimerDisplay};

/// Result of a tap, as seen by the UI.
pub type TapOutcome = SelectOutcome;

/// Top-level phase of a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionPhase {
    /// No game running; waiting for `start_game`.
    #[default]
    Setup,
    Playing,
    Won,
    Lost,
}

impl SessionPhase {
    /// Won or Lost.
    #[must_use]
    pub fn is_finished(self) -> bool {
        matches!(self, SessionPhase::Won | SessionPhase::Lost)
    }
}

/// Coordinates the match engine, the timer and the event queue.
#[derive(Debug)]
pub struct SessionController {
    config: SessionConfig,
    rng: GameRng,
    queue: EventQueue,

    /// Bumped on every start and abandon; events from older sessions are dropped.
    session_id: u64,
    phase: SessionPhase,
    mode: Mode,
    pair_count: usize,
    engine: Option<MatchEngine>,
    timer: TimerController,

    /// Countdown hit zero; the loss sequence is running.
    time_up: bool,
    /// Presentational flag raised partway through the loss sequence.
    shaking: bool,
}

impl SessionController {
    /// Create a controller in `Setup`.
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => GameRng::new(seed),
            None => GameRng::from_random_seed(),
        };
        info!(target: "session", seed = rng.seed(), "session controller created");

        Self {
            config,
            rng,
            queue: EventQueue::new(),
            session_id: 0,
            phase: SessionPhase::Setup,
            mode: Mode::default(),
            pair_count: 0,
            engine: None,
            timer: TimerController::default(),
            time_up: false,
            shaking: false,
        }
    }

    // === Commands ===

    /// Deal a new board and start playing.
    ///
    /// On error nothing changes: the previous session, if any, keeps running.
    #[instrument(level = "debug", target = "session", skip(self))]
    pub fn start_game(&mut self, mode: Mode, pair_count: usize) -> Result<(), ConfigError> {
        let mode = mode.validated().map_err(|e| {
            warn!(target: "session", error = %e, "rejected mode");
            e
        })?;
        if !self.config.allows_pair_count(pair_count) {
            warn!(target: "session", pair_count, "rejected pair count");
            return Err(ConfigError::UnsupportedPairCount {
                requested: pair_count,
            });
        }
        let board = Board::deal(pair_count, &self.config.content_pool, &mut self.rng).map_err(|e| {
            warn!(target: "session", error = %e, "could not deal board");
            e
        })?;

        self.timer.stop();
        self.queue.clear();
        self.session_id += 1;

        let policy = ModePolicy::for_mode(mode);
        self.engine = Some(MatchEngine::new(board, policy));
        self.mode = mode;
        self.pair_count = pair_count;
        self.time_up = false;
        self.shaking = false;
        self.timer.reset(policy.countdown_secs);
        self.phase = SessionPhase::Playing;

        let epoch = self.timer.start();
        self.schedule(self.tick_interval_ms(), DeferredEvent::TimerTick { epoch });

        info!(target: "session", session = self.session_id, %mode, pair_count, "game started");
        Ok(())
    }

    /// Tap the card at `index`.
    ///
    /// Out-of-range indices are an error. Taps outside `Playing`, after the
    /// countdown expired, or on face-up / matched cards are ignored.
    pub fn tap_card(&mut self, index: usize) -> Result<TapOutcome, IndexError> {
        let Some(engine) = self.engine.as_mut() else {
            return Ok(SelectOutcome::Ignored);
        };
        let len = engine.board().len();
        if index >= len {
            return Err(IndexError { index, len });
        }
        if self.phase != SessionPhase::Playing || self.time_up {
            trace!(target: "session", index, phase = ?self.phase, "tap ignored");
            return Ok(SelectOutcome::Ignored);
        }

        let outcome = engine.select(index)?;
        match outcome {
            SelectOutcome::Matched { .. } => {
                self.schedule(self.config.timings.match_check_delay_ms, DeferredEvent::WinCheck);
            }
            SelectOutcome::Mismatched { first, second } => {
                self.schedule(
                    self.config.timings.mismatch_flip_delay_ms,
                    DeferredEvent::ResolveMismatch { first, second },
                );
            }
            SelectOutcome::Ignored | SelectOutcome::FirstSelected { .. } => {}
        }
        Ok(outcome)
    }

    /// Re-deal with the same mode and pair count.
    ///
    /// Does nothing in `Setup`.
    #[instrument(level = "debug", target = "session", skip(self))]
    pub fn reset(&mut self) -> Result<(), ConfigError> {
        if self.phase == SessionPhase::Setup {
            return Ok(());
        }
        self.timer.stop();
        self.start_game(self.mode, self.pair_count)
    }

    /// Drop the current game and return to `Setup`.
    #[instrument(level = "debug", target = "session", skip(self))]
    pub fn abandon(&mut self) {
        self.timer.stop();
        self.queue.clear();
        self.session_id += 1;
        self.engine = None;
        self.timer.reset(None);
        self.time_up = false;
        self.shaking = false;
        self.phase = SessionPhase::Setup;
        info!(target: "session", session = self.session_id, "returned to setup");
    }

    /// Let `elapsed_ms` of wall-clock time pass, firing every event that
    /// comes due.
    ///
    /// Clock ticks with nothing else due in between are delivered in one
    /// batch, so a long jump costs the same as a short one.
    pub fn advance(&mut self, elapsed_ms: u64) {
        let target = self.queue.now_ms().saturating_add(elapsed_ms);
        while let Some(event) = self.queue.pop_due(target) {
            self.dispatch(event, target);
        }
        self.queue.advance_clock(target);
    }

    // === Queries ===

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn pair_count(&self) -> usize {
        self.pair_count
    }

    #[must_use]
    pub fn session_id(&self) -> u64 {
        self.session_id
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Seed of the shuffle stream, for reproducing a game.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    /// Cards in board order. Empty in `Setup`.
    #[must_use]
    pub fn board_snapshot(&self) -> Vector<Card> {
        self.engine
            .as_ref()
            .map(|e| e.board().snapshot())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn board_generation(&self) -> u64 {
        self.engine.as_ref().map_or(0, |e| e.board().generation())
    }

    #[must_use]
    pub fn engine_state(&self) -> EngineState {
        self.engine.as_ref().map_or(EngineState::Idle, MatchEngine::state)
    }

    #[must_use]
    pub fn timer_display(&self) -> TimerDisplay {
        self.timer.display()
    }

    #[must_use]
    pub fn is_shaking(&self) -> bool {
        self.shaking
    }

    /// Countdown has expired and the loss sequence is under way (or done).
    #[must_use]
    pub fn is_time_up(&self) -> bool {
        self.time_up
    }

    /// Virtual time of the event queue.
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.queue.now_ms()
    }

    /// Events waiting to fire, in firing order.
    pub fn pending_events(&self) -> impl Iterator<Item = &ScheduledEvent> {
        self.queue.pending()
    }

    /// Everything a renderer needs, detached from the live session.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.session_id,
            phase: self.phase,
            mode: self.mode,
            cards: self.board_snapshot(),
            board_generation: self.board_generation(),
            timer: self.timer_display(),
            shaking: self.shaking,
            engine_state: self.engine_state(),
        }
    }

    // === Event handling ===

    fn schedule(&mut self, delay_ms: u64, event: DeferredEvent) {
        self.queue.schedule(delay_ms, self.session_id, event);
    }

    fn tick_interval_ms(&self) -> u64 {
        self.config.timings.tick_interval_ms.max(1)
    }

    fn dispatch(&mut self, scheduled: ScheduledEvent, until_ms: u64) {
        if scheduled.session != self.session_id {
            trace!(target: "session", id = %scheduled.id, "dropped stale event");
            return;
        }

        match scheduled.event {
            DeferredEvent::TimerTick { epoch } => self.on_tick(epoch, until_ms),
            DeferredEvent::WinCheck => self.check_for_win(),
            DeferredEvent::ResolveMismatch { first, second } => {
                if !self.accepts_play() {
                    return;
                }
                let Some(engine) = self.engine.as_mut() else {
                    return;
                };
                let resolution = engine.resolve_mismatch(first, second, &mut self.rng);
                if resolution.effect.reshuffles() {
                    self.check_for_win();
                }
            }
            DeferredEvent::LossShake => {
                if self.phase == SessionPhase::Playing {
                    self.shaking = true;
                }
            }
            DeferredEvent::LossFinal => {
                if self.phase == SessionPhase::Playing {
                    self.phase = SessionPhase::Lost;
                    info!(
                        target: "session",
                        session = self.session_id,
                        matched_pairs = self.engine.as_ref().map_or(0, |e| e.board().matched_pairs()),
                        "game lost"
                    );
                }
            }
        }
    }

    fn accepts_play(&self) -> bool {
        self.phase == SessionPhase::Playing && !self.time_up
    }

    fn check_for_win(&mut self) {
        if !self.accepts_play() {
            return;
        }
        if self.engine.as_ref().is_some_and(MatchEngine::is_all_matched) {
            self.timer.stop();
            self.phase = SessionPhase::Won;
            let clock = self.timer.display();
            info!(
                target: "session",
                session = self.session_id,
                elapsed = clock.elapsed,
                remaining = clock.remaining,
                "game won"
            );
        }
    }

    /// Deliver the tick that just came due, plus every later tick up to
    /// `until_ms` when no other event is due before then.
    fn on_tick(&mut self, epoch: u64, until_ms: u64) {
        let interval = self.tick_interval_ms();
        let due = self.queue.now_ms();
        let count = match self.queue.next_due() {
            Some(next) if next <= until_ms => 1,
            _ => 1 + until_ms.saturating_sub(due) / interval,
        };

        let (applied, outcome) = self.timer.tick_many(epoch, count);
        if applied > 1 {
            self.queue
                .advance_clock(due.saturating_add((applied - 1).saturating_mul(interval)));
        }

        match outcome {
            TickOutcome::Stale => {}
            TickOutcome::Ticked => {
                if self.queue.now_ms().checked_add(interval).is_some() {
                    self.schedule(interval, DeferredEvent::TimerTick { epoch });
                } else {
                    self.timer.stop();
                    warn!(target: "session", session = self.session_id, "virtual clock exhausted, timer stopped");
                }
            }
            TickOutcome::Expired => self.on_time_expired(),
        }
    }

    fn on_time_expired(&mut self) {
        self.timer.stop();
        self.time_up = true;
        if let Some(engine) = self.engine.as_mut() {
            engine.reveal_all();
        }
        debug!(target: "session", session = self.session_id, "time expired, board revealed");

        let timings = self.config.timings;
        self.schedule(timings.loss_shake_delay_ms, DeferredEvent::LossShake);
        self.schedule(timings.loss_phase_delay_ms, DeferredEvent::LossFinal);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> SessionController {
        SessionController::new(SessionConfig::default().with_seed(42))
    }

    fn partner_of(session: &SessionController, index: usize) -> usize {
        let cards = session.board_snapshot();
        let content = &cards[index].content;
        (0..cards.len())
            .find(|&i| i != index && &cards[i].content == content)
            .unwrap()
    }

    fn non_partner_of(session: &SessionController, index: usize) -> usize {
        let cards = session.board_snapshot();
        let content = &cards[index].content;
        (0..cards.len())
            .find(|&i| i != index && &cards[i].content != content && !cards[i].matched)
            .unwrap()
    }

    #[test]
    fn test_new_session_is_in_setup() {
        let session = session();
        assert_eq!(session.phase(), SessionPhase::Setup);
        assert!(session.board_snapshot().is_empty());
        assert_eq!(session.seed(), 42);
    }

    #[test]
    fn test_start_game() {
        let mut session = session();
        session.start_game(Mode::Challenge(60), 6).unwrap();

        assert_eq!(session.phase(), SessionPhase::Playing);
        assert_eq!(session.mode(), Mode::Challenge(60));
        assert_eq!(session.board_snapshot().len(), 12);
        assert_eq!(
            session.timer_display(),
            TimerDisplay {
                elapsed: 0,
                remaining: 60,
                has_countdown: true
            }
        );
        assert_eq!(session.pending_events().count(), 1);
    }

    #[test]
    fn test_start_game_rejects_bad_config() {
        let mut session = session();
        assert_eq!(
            session.start_game(Mode::FreePlay, 3),
            Err(ConfigError::UnsupportedPairCount { requested: 3 })
        );
        assert_eq!(session.start_game(Mode::Challenge(0), 2), Err(ConfigError::ZeroDuration));
        assert_eq!(session.phase(), SessionPhase::Setup);
        assert_eq!(session.session_id(), 0);

        let mut short = SessionController::new(
            SessionConfig::default().with_seed(1).with_content_pool(["A", "B"]),
        );
        assert_eq!(
            short.start_game(Mode::FreePlay, 4),
            Err(ConfigError::InsufficientContent {
                requested: 4,
                available: 2
            })
        );
        assert!(short.board_snapshot().is_empty());
    }

    #[test]
    fn test_tap_outside_playing_is_ignored() {
        let mut session = session();
        assert_eq!(session.tap_card(0), Ok(SelectOutcome::Ignored));
    }

    #[test]
    fn test_tap_out_of_range() {
        let mut session = session();
        session.start_game(Mode::FreePlay, 2).unwrap();
        let before = session.snapshot();

        assert_eq!(session.tap_card(4), Err(IndexError { index: 4, len: 4 }));
        assert_eq!(session.snapshot(), before);
    }

    #[test]
    fn test_match_wins_after_delay() {
        let mut session = session();
        session.start_game(Mode::FreePlay, 2).unwrap();

        for first in [0, 1, 2, 3] {
            if session.board_snapshot()[first].matched {
                continue;
            }
            let second = partner_of(&session, first);
            session.tap_card(first).unwrap();
            assert!(matches!(session.tap_card(second), Ok(SelectOutcome::Matched { .. })));
        }

        assert_eq!(session.phase(), SessionPhase::Playing);
        session.advance(399);
        assert_eq!(session.phase(), SessionPhase::Playing);
        session.advance(1);
        assert_eq!(session.phase(), SessionPhase::Won);
    }

    #[test]
    fn test_mismatch_flips_back() {
        let mut session = session();
        session.start_game(Mode::FreePlay, 4).unwrap();

        let second = non_partner_of(&session, 0);
        session.tap_card(0).unwrap();
        assert!(matches!(session.tap_card(second), Ok(SelectOutcome::Mismatched { .. })));
        assert_eq!(session.engine_state(), EngineState::Resolving);

        session.advance(600);
        let cards = session.board_snapshot();
        assert!(!cards[0].face_up && !cards[0].mismatched);
        assert!(!cards[second].face_up && !cards[second].mismatched);
        assert_eq!(session.engine_state(), EngineState::Idle);
    }

    #[test]
    fn test_timer_ticks() {
        let mut session = session();
        session.start_game(Mode::FreePlay, 2).unwrap();
        session.advance(3_500);
        assert_eq!(session.timer_display().elapsed, 3);
        assert!(!session.timer_display().has_countdown);
    }

    #[test]
    fn test_timeout_sequence() {
        let mut session = session();
        session.start_game(Mode::Challenge(1), 2).unwrap();

        session.advance(1_000);
        assert_eq!(session.timer_display().remaining, 0);
        assert!(session.is_time_up());
        assert!(session.board_snapshot().iter().all(|c| c.face_up));
        assert_eq!(session.phase(), SessionPhase::Playing);
        assert!(!session.is_shaking());

        session.advance(300);
        assert!(session.is_shaking());
        assert_eq!(session.phase(), SessionPhase::Playing);

        session.advance(1_200);
        assert_eq!(session.phase(), SessionPhase::Lost);
        assert_eq!(session.timer_display().elapsed, 1);
    }

    #[test]
    fn test_abandon_discards_pending_events() {
        let mut session = session();
        session.start_game(Mode::Challenge(1), 2).unwrap();
        session.abandon();

        assert_eq!(session.phase(), SessionPhase::Setup);
        assert!(session.board_snapshot().is_empty());
        assert_eq!(session.pending_events().count(), 0);

        session.advance(5_000);
        assert_eq!(session.phase(), SessionPhase::Setup);
    }

    #[test]
    fn test_reset_redeals() {
        let mut session = session();
        session.start_game(Mode::Impossible(30), 4).unwrap();
        session.advance(2_000);
        let old_id = session.session_id();

        session.reset().unwrap();
        assert_eq!(session.phase(), SessionPhase::Playing);
        assert_eq!(session.mode(), Mode::Impossible(30));
        assert_eq!(session.session_id(), old_id + 1);
        assert_eq!(session.timer_display().elapsed, 0);
        assert_eq!(session.timer_display().remaining, 30);
    }

    #[test]
    fn test_reset_in_setup_is_noop() {
        let mut session = session();
        session.reset().unwrap();
        assert_eq!(session.phase(), SessionPhase::Setup);
        assert_eq!(session.session_id(), 0);
    }
}
