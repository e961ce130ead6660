//! Owned tick source for a [`PhaseScheduler`].
//!
//! A runner spawns one Tokio task per session that ticks the scheduler once
//! per period. The task is the only thing that ticks, so ticks never overlap.
//! It is released on every exit path:
//!
//! - natural completion: the task sees the scheduler stop running and exits
//! - [`SessionRunner::stop`] / [`StopHandle::stop`]: the scheduler is stopped
//!   under its lock, then the task is aborted
//! - drop: the task is aborted and the completion callback never fires

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::{AbortHandle, JoinHandle};
use tokio::time::{interval_at, Instant};
use tracing::{debug, warn};

use super::engine::PhaseScheduler;
use super::keep_awake::{KeepAwake, NoopKeepAwake};
use crate::events::Event;

pub const DEFAULT_TICK: Duration = Duration::from_secs(1);

pub struct RunnerOptions {
    /// One tick per period.
    pub period: Duration,
    /// Receives every event the session produces, plus a snapshot per tick.
    pub events: Option<UnboundedSender<Event>>,
    pub keep_awake: Arc<dyn KeepAwake>,
}

impl Default for RunnerOptions {
    fn default() -> Self {
        Self {
            period: DEFAULT_TICK,
            events: None,
            keep_awake: Arc::new(NoopKeepAwake),
        }
    }
}

/// A running session and its tick task.
pub struct SessionRunner {
    scheduler: Arc<Mutex<PhaseScheduler>>,
    ticker: JoinHandle<()>,
    events: Option<UnboundedSender<Event>>,
}

impl SessionRunner {
    /// Start ticking `scheduler` on the current Tokio runtime.
    ///
    /// The first tick lands one full period after this call.
    pub fn spawn(scheduler: PhaseScheduler, options: RunnerOptions) -> Self {
        let RunnerOptions {
            period,
            events,
            keep_awake,
        } = options;

        send(&events, scheduler.start_event());
        send(&events, scheduler.snapshot());

        let awake = match keep_awake.acquire() {
            Ok(guard) => Some(guard),
            Err(e) => {
                warn!(error = %e, "could not keep display awake, continuing");
                None
            }
        };

        let shared = Arc::new(Mutex::new(scheduler));
        let task_scheduler = Arc::clone(&shared);
        let task_events = events.clone();

        let ticker = tokio::spawn(async move {
            let _awake = awake;
            let mut interval = interval_at(Instant::now() + period, period);
            loop {
                interval.tick().await;
                let (event, snapshot, running) = {
                    let Ok(mut s) = task_scheduler.lock() else {
                        warn!("scheduler lock poisoned, stopping tick task");
                        break;
                    };
                    let event = s.tick();
                    (event, s.snapshot(), s.is_running())
                };
                if let Some(event) = event {
                    send(&task_events, event);
                }
                send(&task_events, snapshot);
                if !running {
                    break;
                }
            }
            debug!("tick task finished");
        });

        Self {
            scheduler: shared,
            ticker,
            events,
        }
    }

    /// Current state of the session.
    pub fn snapshot(&self) -> Option<Event> {
        self.scheduler.lock().ok().map(|s| s.snapshot())
    }

    pub fn is_running(&self) -> bool {
        self.scheduler
            .lock()
            .map(|s| s.is_running())
            .unwrap_or(false)
    }

    /// Stop early. See [`StopHandle::stop`].
    pub fn stop(&self) -> Option<Event> {
        self.stop_handle().stop()
    }

    /// A cloneable way to stop this session from elsewhere.
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            scheduler: Arc::clone(&self.scheduler),
            ticker: self.ticker.abort_handle(),
            events: self.events.clone(),
        }
    }
}

impl Drop for SessionRunner {
    fn drop(&mut self) {
        self.ticker.abort();
    }
}

pub struct StopHandle {
    scheduler: Arc<Mutex<PhaseScheduler>>,
    ticker: AbortHandle,
    events: Option<UnboundedSender<Event>>,
}

impl StopHandle {
    /// Finish the session as a manual completion and cancel its tick task.
    ///
    /// The scheduler is stopped before the task is aborted, so a tick that is
    /// already waiting on the lock finds the session finished and does
    /// nothing. Returns `None` if the session had already ended.
    pub fn stop(&self) -> Option<Event> {
        let event = match self.scheduler.lock() {
            Ok(mut s) => s.stop(),
            Err(_) => None,
        };
        self.ticker.abort();
        if let Some(event) = &event {
            send(&self.events, event.clone());
        }
        event
    }
}

fn send(events: &Option<UnboundedSender<Event>>, event: Event) {
    if let Some(tx) = events {
        // Receiver gone means nobody is rendering; the session carries on.
        let _ = tx.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cue::{AudioProfile, CueKind, MemoryEmitter};
    use crate::error::CoreError;
    use crate::timer::AwakeGuard;
    use crate::timer::{Completion, Phase};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::{mpsc, oneshot};

    fn scheduler(
        secs: i64,
        cues: Arc<MemoryEmitter>,
    ) -> (PhaseScheduler, oneshot::Receiver<Completion>) {
        let (tx, rx) = oneshot::channel();
        let s = PhaseScheduler::start(secs, AudioProfile::Standard, cues, move |c| {
            let _ = tx.send(c);
        })
        .unwrap();
        (s, rx)
    }

    #[tokio::test(start_paused = true)]
    async fn completes_after_prepare_plus_work() {
        let cues = Arc::new(MemoryEmitter::new());
        let (s, done) = scheduler(3, cues.clone());
        let started = Instant::now();
        let runner = SessionRunner::spawn(s, RunnerOptions::default());

        let completion = done.await.unwrap();
        assert_eq!(completion, Completion::Automatic);
        assert_eq!(started.elapsed(), Duration::from_secs(8));
        assert!(!runner.is_running());
        assert_eq!(cues.count(CueKind::Complete), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn runner_is_usable_once_callback_hands_off() {
        let cues = Arc::new(MemoryEmitter::new());
        let (s, done) = scheduler(30, cues);
        let runner = SessionRunner::spawn(s, RunnerOptions::default());
        let stop = runner.stop_handle();

        // The callback only sends; the receiver side is free to lock again.
        let waiter = tokio::spawn(async move {
            let completion = done.await.unwrap();
            (completion, stop.stop())
        });
        tokio::time::sleep(Duration::from_millis(1_500)).await;
        assert!(runner.stop().is_some());

        let (completion, second) = waiter.await.unwrap();
        assert_eq!(completion, Completion::Manual);
        assert!(second.is_none());
        assert!(matches!(
            runner.snapshot(),
            Some(Event::StateSnapshot { phase: Phase::Finished, .. })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn stop_cancels_further_ticks() {
        let cues = Arc::new(MemoryEmitter::new());
        let (s, done) = scheduler(30, cues.clone());
        let runner = SessionRunner::spawn(s, RunnerOptions::default());

        tokio::time::sleep(Duration::from_millis(2_500)).await;
        let event = runner.stop();
        assert_eq!(event.and_then(|e| e.completion()), Some(Completion::Manual));
        assert_eq!(done.await.unwrap(), Completion::Manual);

        let frozen = runner.snapshot();
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(
            frozen.map(|e| remaining(&e)),
            runner.snapshot().map(|e| remaining(&e))
        );
        assert!(cues.cues().is_empty());
        assert!(runner.stop().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_runner_never_completes() {
        let cues = Arc::new(MemoryEmitter::new());
        let (s, done) = scheduler(5, cues.clone());
        let runner = SessionRunner::spawn(s, RunnerOptions::default());
        tokio::time::sleep(Duration::from_secs(2)).await;
        drop(runner);

        // Sender side is dropped with the scheduler, never fired.
        assert!(done.await.is_err());
        assert!(cues.cues().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn events_stream_phase_changes_and_snapshots() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let (s, done) = scheduler(1, Arc::new(MemoryEmitter::new()));
        let _runner = SessionRunner::spawn(
            s,
            RunnerOptions {
                events: Some(tx),
                ..RunnerOptions::default()
            },
        );
        done.await.unwrap();

        let mut events = Vec::new();
        while let Ok(e) = rx.try_recv() {
            events.push(e);
        }
        assert!(matches!(events[0], Event::SessionStarted { work_secs: 1, .. }));
        assert!(events.iter().any(|e| matches!(
            e,
            Event::PhaseChanged {
                to: Phase::Working,
                ..
            }
        )));
        assert!(events
            .iter()
            .any(|e| e.completion() == Some(Completion::Automatic)));
        // start snapshot + one per tick
        let snapshots = events
            .iter()
            .filter(|e| matches!(e, Event::StateSnapshot { .. }))
            .count();
        assert_eq!(snapshots, 1 + 6);
    }

    struct CountingKeepAwake(Arc<AtomicUsize>);

    impl KeepAwake for CountingKeepAwake {
        fn acquire(&self) -> Result<AwakeGuard, CoreError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            let held = Arc::clone(&self.0);
            Ok(AwakeGuard::new(move || {
                held.fetch_sub(1, Ordering::SeqCst);
            }))
        }
    }

    struct FailingKeepAwake;

    impl KeepAwake for FailingKeepAwake {
        fn acquire(&self) -> Result<AwakeGuard, CoreError> {
            Err(CoreError::Custom("no wake lock".into()))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn keep_awake_released_when_session_ends() {
        let held = Arc::new(AtomicUsize::new(0));
        let (s, done) = scheduler(1, Arc::new(MemoryEmitter::new()));
        let runner = SessionRunner::spawn(
            s,
            RunnerOptions {
                keep_awake: Arc::new(CountingKeepAwake(Arc::clone(&held))),
                ..RunnerOptions::default()
            },
        );
        assert_eq!(held.load(Ordering::SeqCst), 1);
        done.await.unwrap();
        tokio::task::yield_now().await;
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(held.load(Ordering::SeqCst), 0);
        drop(runner);
    }

    #[tokio::test(start_paused = true)]
    async fn keep_awake_failure_does_not_abort_session() {
        let (s, done) = scheduler(1, Arc::new(MemoryEmitter::new()));
        let _runner = SessionRunner::spawn(
            s,
            RunnerOptions {
                keep_awake: Arc::new(FailingKeepAwake),
                ..RunnerOptions::default()
            },
        );
        assert_eq!(done.await.unwrap(), Completion::Automatic);
    }

    fn remaining(event: &Event) -> u64 {
        match event {
            Event::StateSnapshot { remaining_secs, .. } => *remaining_secs,
            _ => panic!("Expected StateSnapshot"),
        }
    }
}
