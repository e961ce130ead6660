use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod session;

#[derive(Parser)]
#[command(name = "flowcue-cli", version, about = "flowcue interval timer CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single timed activity
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Run activities back to back
    Sequence {
        #[command(subcommand)]
        action: commands::sequence::SequenceAction,
    },
    /// Inspect, play and export audio cues
    Cue {
        #[command(subcommand)]
        action: commands::cue::CueAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    // Logs go to stderr so JSON on stdout stays machine-readable.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Timer { action } => commands::timer::run(action),
        Commands::Sequence { action } => commands::sequence::run(action),
        Commands::Cue { action } => commands::cue::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
