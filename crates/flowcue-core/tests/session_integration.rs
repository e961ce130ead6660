//! Integration tests for running sessions and sequences through the public API.
//!
//! Time is paused, so a 3-second work interval finishes instantly.

use std::sync::Arc;
use std::time::Duration;

use flowcue_core::sequence::DriverOptions;
use flowcue_core::timer::RunnerOptions;
use flowcue_core::{
    Activity, AudioProfile, Completion, CueKind, Event, MemoryEmitter, Phase, PhaseScheduler,
    Sequence, SequenceDriver, SessionRunner,
};
use tokio::sync::{mpsc, oneshot};

#[tokio::test(start_paused = true)]
async fn test_full_session_cue_order() {
    let cues = Arc::new(MemoryEmitter::new());
    let (done_tx, done_rx) = oneshot::channel();
    let (events_tx, mut events_rx) = mpsc::unbounded_channel();

    let scheduler = PhaseScheduler::start(3, AudioProfile::Gentle, cues.clone(), move |c| {
        let _ = done_tx.send(c);
    })
    .unwrap();
    let runner = SessionRunner::spawn(
        scheduler,
        RunnerOptions {
            events: Some(events_tx),
            ..RunnerOptions::default()
        },
    );

    assert_eq!(done_rx.await.unwrap(), Completion::Automatic);
    drop(runner);

    let kinds: Vec<CueKind> = cues.cues().into_iter().map(|(_, k)| k).collect();
    assert_eq!(
        kinds,
        vec![
            CueKind::Start,
            CueKind::Countdown,
            CueKind::Countdown,
            CueKind::Countdown,
            CueKind::Complete,
        ]
    );
    assert!(cues.cues().iter().all(|(p, _)| *p == AudioProfile::Gentle));

    let mut phases = Vec::new();
    let mut completions = Vec::new();
    while let Some(event) = events_rx.recv().await {
        match event {
            Event::PhaseChanged { to, .. } => phases.push(to),
            other => completions.extend(other.completion()),
        }
    }
    assert_eq!(phases, vec![Phase::Working]);
    assert_eq!(completions, vec![Completion::Automatic]);
}

#[tokio::test(start_paused = true)]
async fn test_stop_during_get_ready_is_silent() {
    let cues = Arc::new(MemoryEmitter::new());
    let (done_tx, done_rx) = oneshot::channel();
    let scheduler = PhaseScheduler::start(60, AudioProfile::Standard, cues.clone(), move |c| {
        let _ = done_tx.send(c);
    })
    .unwrap();
    let runner = SessionRunner::spawn(scheduler, RunnerOptions::default());

    tokio::time::sleep(Duration::from_millis(2_500)).await;
    assert!(runner.stop().is_some());
    assert!(runner.stop().is_none());

    assert_eq!(done_rx.await.unwrap(), Completion::Manual);
    assert!(cues.cues().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_sequence_from_parsed_activities() {
    let activities: Vec<Activity> = ["Plank:2", "Rest:1:gentle"]
        .iter()
        .map(|s| s.parse().unwrap())
        .collect();
    let sequence = Sequence::new(activities).unwrap();
    let cues = Arc::new(MemoryEmitter::new());

    let driver = SequenceDriver::new(
        cues.clone(),
        DriverOptions {
            grace: Duration::from_millis(100),
            ..DriverOptions::default()
        },
    );
    let report = driver.run(&sequence, 0).await.unwrap();

    assert_eq!(report.outcomes.len(), 2);
    assert!(!report.stopped_early());
    assert_eq!(cues.count(CueKind::Start), 2);
    assert_eq!(cues.count(CueKind::Complete), 2);
    // Plank uses the default profile for parsed activities.
    assert_eq!(cues.cues()[0], (AudioProfile::Gentle, CueKind::Start));
}

#[test]
fn test_invalid_duration_rejected_without_cues() {
    let cues = Arc::new(MemoryEmitter::new());
    for secs in [0, -1] {
        let result = PhaseScheduler::start(secs, AudioProfile::Standard, cues.clone(), |_| {});
        assert!(result.is_err());
    }
    assert!(cues.cues().is_empty());
}
