use serde::{Deserialize, Serialize};

/// Length of the get-ready countdown before every work interval.
pub const PREPARE_SECS: u64 = 5;

/// Countdown cues play while this many seconds or fewer remain in `Working`.
pub const COUNTDOWN_SECS: u64 = 3;

/// What the timer is currently counting toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Get-ready countdown, always [`PREPARE_SECS`] long.
    Preparing,
    /// The work interval itself.
    Working,
    /// Terminal. No further ticks are processed.
    Finished,
}

impl Phase {
    pub fn label(self) -> &'static str {
        match self {
            Phase::Preparing => "GET READY",
            Phase::Working => "WORK",
            Phase::Finished => "DONE",
        }
    }
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Completion {
    /// The driver called `stop()`.
    Manual,
    /// The work interval ran out.
    Automatic,
}

impl Completion {
    pub fn was_manual(self) -> bool {
        matches!(self, Completion::Manual)
    }
}
