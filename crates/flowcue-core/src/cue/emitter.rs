use std::sync::Mutex;

use tracing::info;

use super::{AudioProfile, CueEmitter, CueKind};

/// Emitter used when sound is switched off: cues only show up in the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogEmitter;

impl CueEmitter for LogEmitter {
    fn emit(&self, profile: AudioProfile, kind: CueKind) {
        info!(%profile, %kind, "cue (silent)");
    }
}

/// Records every cue it is asked to emit, in order.
#[derive(Debug, Default)]
pub struct MemoryEmitter {
    cues: Mutex<Vec<(AudioProfile, CueKind)>>,
}

impl MemoryEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything emitted so far.
    pub fn cues(&self) -> Vec<(AudioProfile, CueKind)> {
        self.cues
            .lock()
            .map(|c| c.clone())
            .unwrap_or_default()
    }

    pub fn count(&self, kind: CueKind) -> usize {
        self.cues().iter().filter(|(_, k)| *k == kind).count()
    }

    /// Take and clear the recorded cues.
    pub fn drain(&self) -> Vec<(AudioProfile, CueKind)> {
        self.cues
            .lock()
            .map(|mut c| std::mem::take(&mut *c))
            .unwrap_or_default()
    }
}

impl CueEmitter for MemoryEmitter {
    fn emit(&self, profile: AudioProfile, kind: CueKind) {
        if let Ok(mut cues) = self.cues.lock() {
            cues.push((profile, kind));
        }
    }
}
