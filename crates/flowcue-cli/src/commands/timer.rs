use clap::Subcommand;
use flowcue_core::timer::RunnerOptions;
use flowcue_core::{AudioProfile, Completion, Config, PhaseScheduler, SessionRunner};
use tokio::sync::oneshot;

use crate::session::{self, CliResult};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run one activity: 5 s get-ready, then the work interval
    Run {
        /// Work interval in seconds
        #[arg(long, allow_hyphen_values = true)]
        duration: i64,
        /// Cue profile: standard or gentle
        #[arg(long, default_value = "standard")]
        profile: AudioProfile,
        /// Label shown when the session starts
        #[arg(long)]
        name: Option<String>,
        /// Skip the 3-2-1 countdown cues
        #[arg(long)]
        mute_countdown: bool,
        /// Log cues instead of playing them
        #[arg(long)]
        silent: bool,
        /// Print events as JSON lines
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: TimerAction) -> CliResult {
    match action {
        TimerAction::Run {
            duration,
            profile,
            name,
            mute_countdown,
            silent,
            json,
        } => {
            let config = Config::load_or_default();
            let cues = session::emitter(&config, silent);

            let (done_tx, done_rx) = oneshot::channel();
            // Rejected here, before any runtime or output exists.
            let scheduler = PhaseScheduler::start(duration, profile, cues, move |c| {
                let _ = done_tx.send(c);
            })?
            .with_countdown_muted(mute_countdown || config.audio.mute_countdown);

            if let Some(name) = name.filter(|n| !n.is_empty()) {
                if !json {
                    println!("== {name} ==");
                }
            }

            let rt = session::runtime()?;
            let completion = rt.block_on(async {
                let (events, printer) = session::spawn_printer(json);
                let runner = SessionRunner::spawn(
                    scheduler,
                    RunnerOptions {
                        period: config.timer.tick(),
                        events: Some(events),
                        ..RunnerOptions::default()
                    },
                );

                let stop = runner.stop_handle();
                let interrupt = tokio::spawn(async move {
                    if tokio::signal::ctrl_c().await.is_ok() {
                        stop.stop();
                    }
                });

                let completion = done_rx.await.unwrap_or(Completion::Manual);
                interrupt.abort();
                drop(runner);
                let _ = printer.await;

                tokio::time::sleep(session::cue_tail(&config, silent, Some((profile, completion))))
                    .await;
                completion
            });

            if completion.was_manual() {
                tracing::info!("timer stopped before the work interval ended");
            }
        }
    }
    Ok(())
}
