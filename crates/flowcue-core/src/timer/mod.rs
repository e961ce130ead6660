mod engine;
mod keep_awake;
mod phase;
mod runner;

pub use engine::{OnComplete, PhaseScheduler};
pub use keep_awake::{AwakeGuard, KeepAwake, NoopKeepAwake};
pub use phase::{Completion, Phase, COUNTDOWN_SECS, PREPARE_SECS};
pub use runner::{RunnerOptions, SessionRunner, StopHandle, DEFAULT_TICK};
