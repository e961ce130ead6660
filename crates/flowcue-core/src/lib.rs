//! # flowcue Core Library
//!
//! This library provides the core logic for flowcue, an interval timer for
//! guided workout and yoga sessions. All operations are available via a
//! standalone CLI binary built on the same library.
//!
//! ## Architecture
//!
//! - **Phase Scheduler**: A tick-driven state machine (get ready, work,
//!   finished) that plays cues at fixed points and reports completion once
//! - **Session Runner**: The owned, cancelable one-second tick task
//! - **Cues**: Lookup table of synthesized sounds keyed by profile and kind,
//!   an offline synthesizer, and fire-and-forget emitters
//! - **Sequences**: Ordered activity lists and the driver that chains them
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`PhaseScheduler`]: Core timer state machine
//! - [`SessionRunner`]: Tick source for one session
//! - [`CueEmitter`]: Trait for anything that can play a cue
//! - [`SequenceDriver`]: Runs activities back to back
//! - [`Config`]: Application configuration management

pub mod cue;
pub mod error;
pub mod events;
pub mod sequence;
pub mod storage;
pub mod timer;

pub use cue::{AudioProfile, CueEmitter, CueKind, LogEmitter, MemoryEmitter};
pub use error::{ConfigError, CoreError, CueError, ValidationError};
pub use events::Event;
pub use sequence::{Activity, Sequence, SequenceDriver, SequenceReport};
pub use storage::Config;
pub use timer::{Completion, Phase, PhaseScheduler, SessionRunner};
