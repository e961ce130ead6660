//! Phase scheduler implementation.
//!
//! The scheduler is a tick-driven state machine. It does not own a clock -
//! something else calls `tick()` once per elapsed second (see
//! [`SessionRunner`](super::SessionRunner) for the owned tick task).
//!
//! ## State Transitions
//!
//! ```text
//! Preparing (5s) -> Working (work_secs) -> Finished
//!      \________________ stop() ______________/
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut scheduler = PhaseScheduler::start(60, AudioProfile::Standard, cues, |c| {
//!     println!("done, manual = {}", c.was_manual());
//! })?;
//! // Once per second:
//! scheduler.tick(); // Returns Some(Event) on a phase change or completion
//! ```

use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use super::phase::{Completion, Phase, COUNTDOWN_SECS, PREPARE_SECS};
use crate::cue::{AudioProfile, CueEmitter, CueKind};
use crate::error::ValidationError;
use crate::events::Event;

/// Completion callback. Boxed `FnOnce`, so it can run at most once.
///
/// It runs inside `stop()` or `tick()`. Under a [`SessionRunner`] that means
/// the runner's scheduler lock is held, so the callback must not call
/// [`SessionRunner::stop`], [`SessionRunner::snapshot`] or
/// [`StopHandle::stop`](super::StopHandle::stop); those would deadlock.
/// Hand the result off instead, e.g. through a `oneshot` sender.
///
/// [`SessionRunner`]: super::SessionRunner
/// [`SessionRunner::stop`]: super::SessionRunner::stop
/// [`SessionRunner::snapshot`]: super::SessionRunner::snapshot
pub type OnComplete = Box<dyn FnOnce(Completion) + Send>;

/// Timer state machine for a single session.
pub struct PhaseScheduler {
    work_secs: u64,
    profile: AudioProfile,
    phase: Phase,
    /// Seconds left in the current phase.
    remaining_secs: u64,
    running: bool,
    mute_countdown: bool,
    cues: Arc<dyn CueEmitter>,
    /// Taken on the first terminal transition.
    on_complete: Option<OnComplete>,
}

impl PhaseScheduler {
    /// Begin a session in `Preparing` with five seconds on the clock.
    ///
    /// `on_complete` fires once with the session's [`Completion`]; see
    /// [`OnComplete`] for what it may not do.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidDuration`] if `work_secs` is not
    /// positive. Nothing is created and no cue is played in that case.
    pub fn start<F>(
        work_secs: i64,
        profile: AudioProfile,
        cues: Arc<dyn CueEmitter>,
        on_complete: F,
    ) -> Result<Self, ValidationError>
    where
        F: FnOnce(Completion) + Send + 'static,
    {
        if work_secs <= 0 {
            return Err(ValidationError::InvalidDuration { secs: work_secs });
        }
        info!(work_secs, %profile, "session started");
        Ok(Self {
            work_secs: work_secs as u64,
            profile,
            phase: Phase::Preparing,
            remaining_secs: PREPARE_SECS,
            running: true,
            mute_countdown: false,
            cues,
            on_complete: Some(Box::new(on_complete)),
        })
    }

    /// Silence the 3-2-1 countdown cues. Start and complete cues still play.
    pub fn with_countdown_muted(mut self, muted: bool) -> Self {
        self.mute_countdown = muted;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn work_secs(&self) -> u64 {
        self.work_secs
    }

    pub fn profile(&self) -> AudioProfile {
        self.profile
    }

    /// Length of the current phase in seconds.
    pub fn phase_total_secs(&self) -> u64 {
        match self.phase {
            Phase::Preparing => PREPARE_SECS,
            Phase::Working | Phase::Finished => self.work_secs,
        }
    }

    /// 0.0 .. 1.0 progress within the current phase.
    pub fn progress(&self) -> f64 {
        if self.phase == Phase::Finished {
            return 1.0;
        }
        let total = self.phase_total_secs();
        if total == 0 {
            return 0.0;
        }
        (total - self.remaining_secs) as f64 / total as f64
    }

    /// The event announcing this session.
    pub fn start_event(&self) -> Event {
        Event::SessionStarted {
            work_secs: self.work_secs,
            profile: self.profile,
            at: Utc::now(),
        }
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            phase: self.phase,
            remaining_secs: self.remaining_secs,
            phase_total_secs: self.phase_total_secs(),
            progress: self.progress(),
            is_running: self.running,
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// End the session early. Fires the callback with `Completion::Manual`.
    ///
    /// Returns `None` if the session has already finished.
    pub fn stop(&mut self) -> Option<Event> {
        if !self.running {
            return None;
        }
        Some(self.finish(Completion::Manual))
    }

    /// Advance by one second. Returns the phase change or completion, if any.
    ///
    /// A no-op once the session has finished.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.running {
            return None;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        debug!(phase = ?self.phase, remaining = self.remaining_secs, "tick");

        let event = if self.remaining_secs > 0 {
            None
        } else {
            match self.phase {
                Phase::Preparing => {
                    self.phase = Phase::Working;
                    self.remaining_secs = self.work_secs;
                    info!(remaining = self.remaining_secs, "work interval started");
                    self.cues.emit(self.profile, CueKind::Start);
                    Some(Event::PhaseChanged {
                        from: Phase::Preparing,
                        to: Phase::Working,
                        remaining_secs: self.remaining_secs,
                        at: Utc::now(),
                    })
                }
                Phase::Working => return Some(self.finish(Completion::Automatic)),
                Phase::Finished => None,
            }
        };

        self.countdown_cue();
        event
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn countdown_cue(&self) {
        if self.mute_countdown || self.phase != Phase::Working {
            return;
        }
        if (1..=COUNTDOWN_SECS).contains(&self.remaining_secs) {
            self.cues.emit(self.profile, CueKind::Countdown);
        }
    }

    fn finish(&mut self, completion: Completion) -> Event {
        self.phase = Phase::Finished;
        self.running = false;
        self.remaining_secs = 0;
        if completion == Completion::Automatic {
            self.cues.emit(self.profile, CueKind::Complete);
        }
        info!(?completion, "session finished");
        if let Some(on_complete) = self.on_complete.take() {
            on_complete(completion);
        }
        Event::SessionCompleted {
            completion,
            at: Utc::now(),
        }
    }
}

impl fmt::Debug for PhaseScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhaseScheduler")
            .field("work_secs", &self.work_secs)
            .field("profile", &self.profile)
            .field("phase", &self.phase)
            .field("remaining_secs", &self.remaining_secs)
            .field("running", &self.running)
            .field("mute_countdown", &self.mute_countdown)
            .finish_non_exhaustive()
    }
}
