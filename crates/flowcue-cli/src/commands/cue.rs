use std::path::PathBuf;
use std::time::Duration;

use clap::Subcommand;
use flowcue_core::cue::table::all_plans;
use flowcue_core::cue::{plan_for, wav};
use flowcue_core::{AudioProfile, Config, CueKind};

use crate::session::{self, CliResult};

#[derive(Subcommand)]
pub enum CueAction {
    /// List every cue with its voices as JSON
    List,
    /// Play one cue through the default output device
    Play {
        /// standard or gentle
        profile: AudioProfile,
        /// countdown, start or complete
        kind: CueKind,
    },
    /// Render one cue to a 16-bit mono WAV file
    Export {
        profile: AudioProfile,
        kind: CueKind,
        /// Output path
        path: PathBuf,
        /// Override the configured sample rate
        #[arg(long)]
        sample_rate: Option<u32>,
    },
}

pub fn run(action: CueAction) -> CliResult {
    match action {
        CueAction::List => {
            println!("{}", serde_json::to_string_pretty(&all_plans())?);
        }
        CueAction::Play { profile, kind } => {
            let config = Config::load_or_default();
            let cues = session::emitter(&config, false);
            cues.emit(profile, kind);
            // Playback is fire-and-forget; keep the process up until it ends.
            let plan = plan_for(profile, kind);
            std::thread::sleep(Duration::from_secs_f32(plan.duration_secs()));
        }
        CueAction::Export {
            profile,
            kind,
            path,
            sample_rate,
        } => {
            let config = Config::load_or_default();
            let rate = sample_rate.unwrap_or(config.audio.sample_rate);
            if rate == 0 {
                return Err("sample rate must be positive".into());
            }
            wav::export(&plan_for(profile, kind), &path, rate, config.audio.gain())?;
            println!("wrote {}", path.display());
        }
    }
    Ok(())
}
