//! Shared plumbing for commands that run sessions: runtime, cue output and
//! event printing.

use std::sync::Arc;
use std::time::Duration;

use flowcue_core::cue::plan_for;
use flowcue_core::{AudioProfile, Completion, Config, CueEmitter, CueKind, Event, LogEmitter, Phase};
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::task::JoinHandle;

pub type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

pub fn runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
}

/// Pick the cue output for this run.
pub fn emitter(config: &Config, silent: bool) -> Arc<dyn CueEmitter> {
    if silent || !config.audio.enabled {
        return Arc::new(LogEmitter);
    }
    speaker(config)
}

#[cfg(feature = "playback")]
fn speaker(config: &Config) -> Arc<dyn CueEmitter> {
    Arc::new(flowcue_core::cue::PlaybackEmitter::new(
        config.audio.sample_rate,
        config.audio.gain(),
    ))
}

#[cfg(not(feature = "playback"))]
fn speaker(_config: &Config) -> Arc<dyn CueEmitter> {
    tracing::warn!("built without the `playback` feature, cues are logged only");
    Arc::new(LogEmitter)
}

/// How long to keep the process alive after a run so the final cue can play.
pub fn cue_tail(config: &Config, silent: bool, last: Option<(AudioProfile, Completion)>) -> Duration {
    match last {
        Some((profile, Completion::Automatic)) if !silent && config.audio.enabled => {
            Duration::from_secs_f32(plan_for(profile, CueKind::Complete).duration_secs())
        }
        _ => Duration::ZERO,
    }
}

/// Print events as they arrive. The task ends once every sender is dropped.
pub fn spawn_printer(json: bool) -> (UnboundedSender<Event>, JoinHandle<()>) {
    let (tx, mut rx) = mpsc::unbounded_channel::<Event>();
    let handle = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            if let Some(line) = render(&event, json) {
                println!("{line}");
            }
        }
    });
    (tx, handle)
}

fn render(event: &Event, json: bool) -> Option<String> {
    if json {
        return serde_json::to_string(event).ok();
    }
    let line = match event {
        Event::SessionStarted {
            work_secs, profile, ..
        } => format!("session: {} of work, {profile} cues", format_time(*work_secs)),
        Event::ActivityStarted {
            index,
            name,
            work_secs,
            profile,
            ..
        } => format!(
            "== {}. {name} ({}, {profile}) ==",
            index + 1,
            format_time(*work_secs)
        ),
        Event::PhaseChanged { to, .. } => format!("-- {} --", to.label()),
        Event::StateSnapshot {
            phase: Phase::Finished,
            ..
        } => return None,
        Event::StateSnapshot {
            phase,
            remaining_secs,
            progress,
            ..
        } => format!(
            "{:<9} {:>5}  {}",
            phase.label(),
            format_time(*remaining_secs),
            progress_bar(*progress, 20)
        ),
        Event::SessionCompleted { completion, .. } => match completion {
            Completion::Automatic => "done".to_string(),
            Completion::Manual => "stopped".to_string(),
        },
        Event::SequenceFinished { completed, .. } => {
            format!("sequence finished: {completed} activities")
        }
    };
    Some(line)
}

/// `m:ss`
pub fn format_time(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

fn progress_bar(progress: f64, width: usize) -> String {
    let filled = ((progress.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    format!("[{}{}]", "#".repeat(filled), ".".repeat(width - filled))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn format_time_pads_seconds() {
        assert_eq!(format_time(0), "0:00");
        assert_eq!(format_time(65), "1:05");
        assert_eq!(format_time(300), "5:00");
    }

    #[test]
    fn progress_bar_fills_proportionally() {
        assert_eq!(progress_bar(0.0, 4), "[....]");
        assert_eq!(progress_bar(0.5, 4), "[##..]");
        assert_eq!(progress_bar(2.0, 4), "[####]");
    }

    #[test]
    fn finished_snapshots_are_not_printed() {
        let event = Event::StateSnapshot {
            phase: Phase::Finished,
            remaining_secs: 0,
            phase_total_secs: 10,
            progress: 1.0,
            is_running: false,
            at: Utc::now(),
        };
        assert!(render(&event, false).is_none());
        assert!(render(&event, true).unwrap().contains("\"type\":\"StateSnapshot\""));
    }

    #[test]
    fn cue_tail_only_after_audible_automatic_finish() {
        let config = Config::default();
        let gentle = Some((AudioProfile::Gentle, Completion::Automatic));
        assert!(cue_tail(&config, false, gentle) > Duration::from_secs(1));
        assert_eq!(cue_tail(&config, true, gentle), Duration::ZERO);
        assert_eq!(
            cue_tail(&config, false, Some((AudioProfile::Gentle, Completion::Manual))),
            Duration::ZERO
        );
    }
}
