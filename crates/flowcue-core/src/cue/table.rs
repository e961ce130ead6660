//! Cue lookup table.
//!
//! Every (profile, kind) pair maps to a static [`CuePlan`]: one or more
//! oscillator voices, each with its own waveform, pitch plan, start offset,
//! length and gain envelope. Values here are presentation data and can be
//! tuned freely; what matters is the shape (waveform family, pitch direction,
//! pulse count and spacing).
//!
//! | profile  | kind      | voices                                            |
//! |----------|-----------|---------------------------------------------------|
//! | standard | countdown | sine 880 Hz, 0.5 s, flat then fast decay          |
//! | standard | start     | sawtooth 660 -> 440 Hz, 0.8 s, sustain then decay |
//! | standard | complete  | square 880 Hz pulses at 0 / 0.4 / 0.8 s           |
//! | gentle   | countdown | sine 440 Hz, 1.0 s, slow rise then slow decay     |
//! | gentle   | start     | sine 220 Hz, 3.0 s, rise then long decay          |
//! | gentle   | complete  | sine arpeggio A4 C#5 E5 at 0 / 0.2 / 0.4 s        |

use serde::Serialize;

use super::{AudioProfile, CueKind};

/// Gain an exponential decay ends on (an exponential ramp can't reach zero).
pub const DECAY_FLOOR: f32 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    Sine,
    Sawtooth,
    Square,
}

/// Frequency over the life of a voice.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "plan", rename_all = "lowercase")]
pub enum Pitch {
    Constant { hz: f32 },
    /// Linear glide across the whole voice.
    Sweep { from_hz: f32, to_hz: f32 },
}

impl Pitch {
    /// Frequency `t` seconds into a voice lasting `duration` seconds.
    pub fn hz_at(&self, t: f32, duration: f32) -> f32 {
        match *self {
            Pitch::Constant { hz } => hz,
            Pitch::Sweep { from_hz, to_hz } => {
                if duration <= 0.0 {
                    return to_hz;
                }
                let frac = (t / duration).clamp(0.0, 1.0);
                from_hz + (to_hz - from_hz) * frac
            }
        }
    }
}

/// Gain over the life of a voice.
///
/// Starts at `initial`, ramps linearly to `peak` by `attack`, holds `peak`
/// until `hold`, then decays exponentially to [`DECAY_FLOOR`] at the end of
/// the voice. Times are seconds from the voice start; `attack <= hold`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Envelope {
    pub initial: f32,
    pub peak: f32,
    pub attack: f32,
    pub hold: f32,
}

impl Envelope {
    pub fn gain_at(&self, t: f32, duration: f32) -> f32 {
        if t < 0.0 || t >= duration {
            return 0.0;
        }
        if t < self.attack {
            return self.initial + (self.peak - self.initial) * (t / self.attack);
        }
        let release = duration - self.hold;
        if t < self.hold || release <= 0.0 || self.peak <= 0.0 {
            return self.peak;
        }
        let frac = (t - self.hold) / release;
        self.peak * (DECAY_FLOOR / self.peak).powf(frac)
    }
}

/// One oscillator inside a cue.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Voice {
    pub waveform: Waveform,
    pub pitch: Pitch,
    /// Seconds after the cue starts.
    pub offset: f32,
    /// Seconds.
    pub duration: f32,
    pub envelope: Envelope,
}

impl Voice {
    pub fn end(&self) -> f32 {
        self.offset + self.duration
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CuePlan {
    pub profile: AudioProfile,
    pub kind: CueKind,
    pub voices: &'static [Voice],
}

impl CuePlan {
    /// Seconds until the last voice falls silent.
    pub fn duration_secs(&self) -> f32 {
        self.voices.iter().map(Voice::end).fold(0.0, f32::max)
    }
}

/// Rise over 0.1 s to a soft peak, then decay. Used by pulses and chord notes.
const TONE: Envelope = Envelope {
    initial: 0.0,
    peak: 0.1,
    attack: 0.1,
    hold: 0.1,
};

const fn tone(waveform: Waveform, hz: f32, offset: f32, duration: f32) -> Voice {
    Voice {
        waveform,
        pitch: Pitch::Constant { hz },
        offset,
        duration,
        envelope: TONE,
    }
}

const STANDARD_COUNTDOWN: &[Voice] = &[Voice {
    waveform: Waveform::Sine,
    pitch: Pitch::Constant { hz: 880.0 },
    offset: 0.0,
    duration: 0.5,
    envelope: Envelope {
        initial: 0.1,
        peak: 0.1,
        attack: 0.0,
        hold: 0.0,
    },
}];

const STANDARD_START: &[Voice] = &[Voice {
    waveform: Waveform::Sawtooth,
    pitch: Pitch::Sweep {
        from_hz: 660.0,
        to_hz: 440.0,
    },
    offset: 0.0,
    duration: 0.8,
    envelope: Envelope {
        initial: 0.1,
        peak: 0.1,
        attack: 0.0,
        hold: 0.6,
    },
}];

const STANDARD_COMPLETE: &[Voice] = &[
    tone(Waveform::Square, 880.0, 0.0, 0.3),
    tone(Waveform::Square, 880.0, 0.4, 0.3),
    tone(Waveform::Square, 880.0, 0.8, 0.6),
];

const GENTLE_COUNTDOWN: &[Voice] = &[Voice {
    waveform: Waveform::Sine,
    pitch: Pitch::Constant { hz: 440.0 },
    offset: 0.0,
    duration: 1.0,
    envelope: Envelope {
        initial: 0.0,
        peak: 0.2,
        attack: 0.1,
        hold: 0.1,
    },
}];

const GENTLE_START: &[Voice] = &[Voice {
    waveform: Waveform::Sine,
    pitch: Pitch::Constant { hz: 220.0 },
    offset: 0.0,
    duration: 3.0,
    envelope: Envelope {
        initial: 0.0,
        peak: 0.5,
        attack: 0.2,
        hold: 0.2,
    },
}];

// A major triad: A4, C#5, E5.
const GENTLE_COMPLETE: &[Voice] = &[
    tone(Waveform::Sine, 440.0, 0.0, 1.5),
    tone(Waveform::Sine, 554.37, 0.2, 1.5),
    tone(Waveform::Sine, 659.25, 0.4, 1.5),
];

/// Look up the plan for a cue.
pub fn plan_for(profile: AudioProfile, kind: CueKind) -> CuePlan {
    let voices = match (profile, kind) {
        (AudioProfile::Standard, CueKind::Countdown) => STANDARD_COUNTDOWN,
        (AudioProfile::Standard, CueKind::Start) => STANDARD_START,
        (AudioProfile::Standard, CueKind::Complete) => STANDARD_COMPLETE,
        (AudioProfile::Gentle, CueKind::Countdown) => GENTLE_COUNTDOWN,
        (AudioProfile::Gentle, CueKind::Start) => GENTLE_START,
        (AudioProfile::Gentle, CueKind::Complete) => GENTLE_COMPLETE,
    };
    CuePlan {
        profile,
        kind,
        voices,
    }
}

/// Every plan in the table, profile-major.
pub fn all_plans() -> Vec<CuePlan> {
    AudioProfile::ALL
        .iter()
        .flat_map(|&p| CueKind::ALL.iter().map(move |&k| plan_for(p, k)))
        .collect()
}
