//! Audio cues.
//!
//! A cue is a short synthesized sound identified by an [`AudioProfile`] and a
//! [`CueKind`]. The [`table`] maps each pair to a [`CuePlan`], the [`synth`]
//! module renders plans to samples, and a [`CueEmitter`] delivers them.
//!
//! Emitters are fire-and-forget: `emit` returns immediately and never reports
//! failure to the caller. A timer with no sound still completes on schedule.

mod emitter;
#[cfg(feature = "playback")]
mod playback;
pub mod synth;
pub mod table;
pub mod wav;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use emitter::{LogEmitter, MemoryEmitter};
#[cfg(feature = "playback")]
pub use playback::PlaybackEmitter;
pub use table::{plan_for, CuePlan, Envelope, Pitch, Voice, Waveform};

/// Sound family used for every cue of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioProfile {
    /// Sharp electronic beeps.
    #[serde(alias = "high")]
    Standard,
    /// Soft chimes and gongs.
    Gentle,
}

impl AudioProfile {
    pub const ALL: [AudioProfile; 2] = [AudioProfile::Standard, AudioProfile::Gentle];

    pub fn as_str(self) -> &'static str {
        match self {
            AudioProfile::Standard => "standard",
            AudioProfile::Gentle => "gentle",
        }
    }
}

impl fmt::Display for AudioProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AudioProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" | "high" => Ok(AudioProfile::Standard),
            "gentle" => Ok(AudioProfile::Gentle),
            other => Err(format!("unknown audio profile: {other}")),
        }
    }
}

/// The timer event a cue announces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CueKind {
    /// One of the last three seconds of the work interval.
    Countdown,
    /// The work interval begins.
    Start,
    /// The work interval ran out.
    Complete,
}

impl CueKind {
    pub const ALL: [CueKind; 3] = [CueKind::Countdown, CueKind::Start, CueKind::Complete];

    pub fn as_str(self) -> &'static str {
        match self {
            CueKind::Countdown => "countdown",
            CueKind::Start => "start",
            CueKind::Complete => "complete",
        }
    }
}

impl fmt::Display for CueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CueKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "countdown" => Ok(CueKind::Countdown),
            "start" => Ok(CueKind::Start),
            "complete" => Ok(CueKind::Complete),
            other => Err(format!("unknown cue kind: {other}")),
        }
    }
}

/// Delivers cues somewhere: speakers, a log, a test buffer.
///
/// Implementations must return promptly and must swallow their own failures.
pub trait CueEmitter: Send + Sync {
    fn emit(&self, profile: AudioProfile, kind: CueKind);
}
