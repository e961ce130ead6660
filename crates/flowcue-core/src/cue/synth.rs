//! Offline cue synthesis.
//!
//! Renders a [`CuePlan`] to mono `f32` samples. Voices are mixed additively at
//! their offsets; each keeps its own phase accumulator so pitch sweeps stay
//! continuous.

use std::f32::consts::TAU;

use super::table::{CuePlan, Voice, Waveform};

pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// Render a plan at `sample_rate`, scaled by `volume` (0.0 ..= 1.0).
///
/// The buffer is as long as the last voice; output is clamped to [-1, 1].
pub fn render(plan: &CuePlan, sample_rate: u32, volume: f32) -> Vec<f32> {
    let rate = sample_rate.max(1) as f32;
    let len = (plan.duration_secs() * rate).ceil() as usize;
    let mut out = vec![0.0f32; len];
    let volume = volume.clamp(0.0, 1.0);

    for voice in plan.voices {
        render_voice(voice, rate, volume, &mut out);
    }
    for s in &mut out {
        *s = s.clamp(-1.0, 1.0);
    }
    out
}

fn render_voice(voice: &Voice, rate: f32, volume: f32, out: &mut [f32]) {
    let start = (voice.offset * rate).round() as usize;
    let count = (voice.duration * rate).round() as usize;
    let mut phase = 0.0f32;

    for i in 0..count {
        let Some(slot) = out.get_mut(start + i) else {
            break;
        };
        let t = i as f32 / rate;
        let gain = voice.envelope.gain_at(t, voice.duration);
        *slot += oscillator(voice.waveform, phase) * gain * volume;

        phase += voice.pitch.hz_at(t, voice.duration) / rate;
        phase -= phase.floor();
    }
}

/// One sample of `waveform` at normalized phase `phase` (0.0 .. 1.0).
fn oscillator(waveform: Waveform, phase: f32) -> f32 {
    match waveform {
        Waveform::Sine => (TAU * phase).sin(),
        Waveform::Sawtooth => 2.0 * phase - 1.0,
        Waveform::Square => {
            if phase < 0.5 {
                1.0
            } else {
                -1.0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cue::{plan_for, AudioProfile, CueKind};

    const RATE: u32 = 8_000;

    fn peak(samples: &[f32]) -> f32 {
        samples.iter().fold(0.0f32, |m, s| m.max(s.abs()))
    }

    #[test]
    fn length_matches_last_voice_end() {
        let plan = plan_for(AudioProfile::Standard, CueKind::Complete);
        let samples = render(&plan, RATE, 1.0);
        // Last pulse starts at 0.8 s and lasts 0.6 s.
        let expected = (1.4 * RATE as f32) as i64;
        assert!((samples.len() as i64 - expected).abs() <= 1);
    }

    #[test]
    fn samples_stay_in_range() {
        for plan in crate::cue::table::all_plans() {
            let samples = render(&plan, RATE, 1.0);
            assert!(samples.iter().all(|s| (-1.0..=1.0).contains(s)));
            assert!(peak(&samples) > 0.0, "{:?}/{:?} rendered silence", plan.profile, plan.kind);
        }
    }

    #[test]
    fn gap_between_pulses_is_silent() {
        let plan = plan_for(AudioProfile::Standard, CueKind::Complete);
        let samples = render(&plan, RATE, 1.0);
        // First pulse ends at 0.3 s, second starts at 0.4 s.
        let gap = &samples[(0.31 * RATE as f32) as usize..(0.39 * RATE as f32) as usize];
        assert_eq!(peak(gap), 0.0);
    }

    #[test]
    fn volume_scales_output() {
        let plan = plan_for(AudioProfile::Gentle, CueKind::Start);
        let full = peak(&render(&plan, RATE, 1.0));
        let half = peak(&render(&plan, RATE, 0.5));
        assert!((half - full * 0.5).abs() < 1e-4);
        assert_eq!(peak(&render(&plan, RATE, 0.0)), 0.0);
    }

    #[test]
    fn oscillator_shapes() {
        assert!(oscillator(Waveform::Sine, 0.25) > 0.99);
        assert_eq!(oscillator(Waveform::Sawtooth, 0.0), -1.0);
        assert_eq!(oscillator(Waveform::Square, 0.75), -1.0);
    }
}
