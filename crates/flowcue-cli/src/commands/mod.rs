pub mod config;
pub mod cue;
pub mod sequence;
pub mod timer;
