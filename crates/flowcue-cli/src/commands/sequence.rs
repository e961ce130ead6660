use clap::Subcommand;
use flowcue_core::sequence::DriverOptions;
use flowcue_core::{Activity, Config, Sequence, SequenceDriver};

use crate::session::{self, CliResult};

#[derive(Subcommand)]
pub enum SequenceAction {
    /// Run activities back to back. Without --activity the built-in yoga
    /// sequence is used.
    Run {
        /// Activity as NAME:SECONDS[:PROFILE], repeatable
        #[arg(long = "activity", value_name = "NAME:SECONDS[:PROFILE]")]
        activities: Vec<Activity>,
        /// Zero-based index of the first activity
        #[arg(long, default_value_t = 0)]
        from: usize,
        /// Stop after the first activity instead of chaining
        #[arg(long)]
        no_chain: bool,
        /// Skip the 3-2-1 countdown cues
        #[arg(long)]
        mute_countdown: bool,
        /// Log cues instead of playing them
        #[arg(long)]
        silent: bool,
        /// Print events and the final report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the built-in sequence
    Show,
}

pub fn run(action: SequenceAction) -> CliResult {
    match action {
        SequenceAction::Run {
            activities,
            from,
            no_chain,
            mute_countdown,
            silent,
            json,
        } => {
            let sequence = if activities.is_empty() {
                Sequence::default_yoga()
            } else {
                Sequence::new(activities)?
            };
            let config = Config::load_or_default();
            let cues = session::emitter(&config, silent);

            let rt = session::runtime()?;
            let report = rt.block_on(async {
                let (events, printer) = session::spawn_printer(json);
                let mut options = DriverOptions::from_config(&config);
                options.events = Some(events);
                options.auto_advance &= !no_chain;
                options.mute_countdown |= mute_countdown;

                let driver = SequenceDriver::new(cues, options);
                let stop = driver.stop_handle();
                let interrupt = tokio::spawn(async move {
                    if tokio::signal::ctrl_c().await.is_ok() {
                        stop.stop();
                    }
                });

                let report = driver.run(&sequence, from).await;
                interrupt.abort();
                drop(driver);
                let _ = printer.await;

                if let Ok(report) = &report {
                    let last = report.outcomes.last().map(|o| {
                        (sequence.activities()[o.index].profile, o.completion)
                    });
                    tokio::time::sleep(session::cue_tail(&config, silent, last)).await;
                }
                report
            })?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else if report.stopped_early() {
                println!("stopped after {} activities", report.outcomes.len());
            }
        }
        SequenceAction::Show => {
            let sequence = Sequence::default_yoga();
            println!("{}", serde_json::to_string_pretty(&sequence)?);
        }
    }
    Ok(())
}
