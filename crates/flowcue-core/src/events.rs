use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cue::AudioProfile;
use crate::timer::{Completion, Phase};

/// Every state change of a session produces an Event.
/// Drivers render them; the CLI prints them as JSON lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SessionStarted {
        work_secs: u64,
        profile: AudioProfile,
        at: DateTime<Utc>,
    },
    PhaseChanged {
        from: Phase,
        to: Phase,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    SessionCompleted {
        completion: Completion,
        at: DateTime<Utc>,
    },
    /// A sequence moved on to its next activity.
    ActivityStarted {
        index: usize,
        name: String,
        work_secs: u64,
        profile: AudioProfile,
        at: DateTime<Utc>,
    },
    /// A sequence run ended, by running out of activities or by a stop.
    SequenceFinished {
        completed: usize,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        phase: Phase,
        remaining_secs: u64,
        phase_total_secs: u64,
        /// 0.0 .. 1.0 within the current phase.
        progress: f64,
        is_running: bool,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// The completion carried by a `SessionCompleted` event.
    pub fn completion(&self) -> Option<Completion> {
        match self {
            Event::SessionCompleted { completion, .. } => Some(*completion),
            _ => None,
        }
    }
}
