//! Export a rendered cue as a 16-bit mono WAV file.

use std::path::Path;

use super::synth::render;
use super::table::CuePlan;
use crate::error::CueError;

pub fn export(plan: &CuePlan, path: &Path, sample_rate: u32, volume: f32) -> Result<(), CueError> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let fail = |e: hound::Error| CueError::ExportFailed {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    let mut writer = hound::WavWriter::create(path, spec).map_err(fail)?;
    for sample in render(plan, sample_rate, volume) {
        writer
            .write_sample((sample * i16::MAX as f32) as i16)
            .map_err(fail)?;
    }
    writer.finalize().map_err(fail)?;
    Ok(())
}
