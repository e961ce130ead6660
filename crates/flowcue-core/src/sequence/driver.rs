//! Runs a [`Sequence`] one session at a time.
//!
//! After an automatic completion the driver waits a short grace period (so the
//! completion cue can finish) and starts the next activity. A manual stop
//! ends the whole run; it never chains.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::{oneshot, Notify};
use tracing::info;

use super::Sequence;
use crate::cue::CueEmitter;
use crate::error::ValidationError;
use crate::events::Event;
use crate::storage::Config;
use crate::timer::{
    Completion, KeepAwake, NoopKeepAwake, PhaseScheduler, RunnerOptions, SessionRunner,
    StopHandle, DEFAULT_TICK,
};

/// Delay between an automatic completion and the next start.
pub const DEFAULT_GRACE: Duration = Duration::from_millis(1500);

pub struct DriverOptions {
    pub tick: Duration,
    pub grace: Duration,
    /// Chain into the next activity after an automatic completion.
    pub auto_advance: bool,
    pub mute_countdown: bool,
    pub events: Option<UnboundedSender<Event>>,
    pub keep_awake: Arc<dyn KeepAwake>,
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self {
            tick: DEFAULT_TICK,
            grace: DEFAULT_GRACE,
            auto_advance: true,
            mute_countdown: false,
            events: None,
            keep_awake: Arc::new(NoopKeepAwake),
        }
    }
}

impl DriverOptions {
    /// Timing and chaining taken from the user's configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            tick: config.timer.tick(),
            grace: config.sequence.grace(),
            auto_advance: config.sequence.auto_advance,
            mute_countdown: config.audio.mute_countdown,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityOutcome {
    pub index: usize,
    pub name: String,
    pub completion: Completion,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SequenceReport {
    pub outcomes: Vec<ActivityOutcome>,
}

impl SequenceReport {
    /// True when the run ended because someone pressed stop.
    pub fn stopped_early(&self) -> bool {
        self.outcomes
            .last()
            .map(|o| o.completion.was_manual())
            .unwrap_or(false)
    }
}

/// Stops whatever the driver is doing: the live session, or the grace wait
/// before the next one.
#[derive(Clone, Default)]
pub struct SequenceStop {
    inner: Arc<StopState>,
}

#[derive(Default)]
struct StopState {
    requested: AtomicBool,
    current: Mutex<Option<StopHandle>>,
    wake: Notify,
}

impl SequenceStop {
    pub fn stop(&self) {
        self.inner.requested.store(true, Ordering::SeqCst);
        let current = self
            .inner
            .current
            .lock()
            .ok()
            .and_then(|mut slot| slot.take());
        if let Some(handle) = current {
            handle.stop();
        }
        self.inner.wake.notify_waiters();
    }

    pub fn is_requested(&self) -> bool {
        self.inner.requested.load(Ordering::SeqCst)
    }

    fn attach(&self, handle: StopHandle) {
        let Ok(mut slot) = self.inner.current.lock() else {
            handle.stop();
            return;
        };
        // Checked under the slot lock: a stop requested before this point
        // never sees the handle, so it is applied here instead.
        if self.is_requested() {
            drop(slot);
            handle.stop();
            return;
        }
        *slot = Some(handle);
    }

    /// Forget a stop that has already ended a run.
    fn clear(&self) {
        self.inner.requested.store(false, Ordering::SeqCst);
    }

    fn detach(&self) {
        if let Ok(mut slot) = self.inner.current.lock() {
            *slot = None;
        }
    }
}

pub struct SequenceDriver {
    cues: Arc<dyn CueEmitter>,
    options: DriverOptions,
    stop: SequenceStop,
}

impl SequenceDriver {
    pub fn new(cues: Arc<dyn CueEmitter>, options: DriverOptions) -> Self {
        Self {
            cues,
            options,
            stop: SequenceStop::default(),
        }
    }

    pub fn stop_handle(&self) -> SequenceStop {
        self.stop.clone()
    }

    /// Run `sequence` starting at activity `from`.
    ///
    /// A stop requested before the call ends the run before its first
    /// activity. Once `run` returns, the stop is cleared and the driver can
    /// run again.
    ///
    /// # Errors
    ///
    /// `OutOfBounds` if `from` is past the end; `InvalidDuration` if an
    /// activity cannot be started.
    pub async fn run(
        &self,
        sequence: &Sequence,
        from: usize,
    ) -> Result<SequenceReport, ValidationError> {
        let result = self.run_from(sequence, from).await;
        self.stop.clear();
        result
    }

    async fn run_from(
        &self,
        sequence: &Sequence,
        from: usize,
    ) -> Result<SequenceReport, ValidationError> {
        if from >= sequence.len() {
            return Err(ValidationError::OutOfBounds {
                collection: "sequence".into(),
                index: from,
                len: sequence.len(),
            });
        }

        let mut report = SequenceReport::default();
        let mut index = from;

        while !self.stop.is_requested() {
            let activity = &sequence.activities()[index];
            let completion = self.run_one(index, sequence).await?;
            report.outcomes.push(ActivityOutcome {
                index,
                name: activity.name.clone(),
                completion,
            });

            if completion.was_manual() || !self.options.auto_advance {
                break;
            }
            if sequence.next_after(index).is_none() {
                break;
            }

            // Registered before the flag check so a stop in between still wakes us.
            let wake = self.stop.inner.wake.notified();
            tokio::pin!(wake);
            wake.as_mut().enable();
            if self.stop.is_requested() {
                break;
            }

            info!(grace_ms = self.options.grace.as_millis() as u64, "chaining to next activity");
            tokio::select! {
                _ = tokio::time::sleep(self.options.grace) => {}
                _ = wake => {}
            }
            index += 1;
        }

        self.send(Event::SequenceFinished {
            completed: report.outcomes.len(),
            at: Utc::now(),
        });
        Ok(report)
    }

    async fn run_one(&self, index: usize, sequence: &Sequence) -> Result<Completion, ValidationError> {
        let activity = &sequence.activities()[index];
        let secs = i64::try_from(activity.duration_secs).unwrap_or(i64::MAX);

        let (tx, rx) = oneshot::channel();
        let scheduler = PhaseScheduler::start(secs, activity.profile, Arc::clone(&self.cues), move |c| {
            let _ = tx.send(c);
        })?
        .with_countdown_muted(self.options.mute_countdown);

        info!(index, name = %activity.name, secs = activity.duration_secs, "starting activity");
        self.send(Event::ActivityStarted {
            index,
            name: activity.name.clone(),
            work_secs: activity.duration_secs,
            profile: activity.profile,
            at: Utc::now(),
        });

        let runner = SessionRunner::spawn(
            scheduler,
            RunnerOptions {
                period: self.options.tick,
                events: self.options.events.clone(),
                keep_awake: Arc::clone(&self.options.keep_awake),
            },
        );
        self.stop.attach(runner.stop_handle());

        // The sender only disappears if the session was torn down without
        // completing, which from the driver's side is a stop.
        let completion = rx.await.unwrap_or(Completion::Manual);

        self.stop.detach();
        drop(runner);
        Ok(completion)
    }

    fn send(&self, event: Event) {
        if let Some(tx) = &self.options.events {
            let _ = tx.send(event);
        }
    }
}
