//! Speaker output through `rodio`.
//!
//! The output stream is not `Send`, so it lives on a dedicated audio thread.
//! [`PlaybackEmitter::emit`] only pushes the cue onto a channel; the audio
//! thread renders it and hands it to the mixer, where overlapping cues play
//! side by side.

use std::sync::mpsc::{self, Sender};
use std::thread;

use rodio::buffer::SamplesBuffer;
use rodio::OutputStream;
use tracing::{debug, warn};

use super::synth::render;
use super::table::{plan_for, CuePlan};
use super::{AudioProfile, CueEmitter, CueKind};
use crate::error::CueError;

pub struct PlaybackEmitter {
    tx: Sender<CuePlan>,
}

impl PlaybackEmitter {
    /// Start the audio thread. Never fails: without a usable device every cue
    /// is dropped with a warning.
    pub fn new(sample_rate: u32, volume: f32) -> Self {
        let (tx, rx) = mpsc::channel::<CuePlan>();

        let spawned = thread::Builder::new()
            .name("flowcue-audio".into())
            .spawn(move || {
                let (_stream, handle) = match OutputStream::try_default() {
                    Ok(pair) => pair,
                    Err(e) => {
                        let err = CueError::DeviceNotAvailable(e.to_string());
                        warn!(error = %err, "audio output unavailable, cues will be silent");
                        return;
                    }
                };
                for plan in rx {
                    let samples = render(&plan, sample_rate, volume);
                    let source = SamplesBuffer::new(1, sample_rate, samples);
                    if let Err(e) = handle.play_raw(source) {
                        let err = CueError::PlaybackFailed(e.to_string());
                        warn!(profile = %plan.profile, kind = %plan.kind, error = %err, "cue dropped");
                    }
                }
            });

        if let Err(e) = spawned {
            warn!(error = %e, "failed to start audio thread, cues will be silent");
        }

        Self { tx }
    }
}

impl CueEmitter for PlaybackEmitter {
    fn emit(&self, profile: AudioProfile, kind: CueKind) {
        if self.tx.send(plan_for(profile, kind)).is_err() {
            debug!(%profile, %kind, "audio thread gone, cue skipped");
        }
    }
}
