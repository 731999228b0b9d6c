//! Pure inspection of produced files and buffers.

use mastercheck_core::error::{CheckError, Result};
use mastercheck_core::media::{ProcessingResult, frames_to_duration};
use mastercheck_pipeline::{DecodedAudio, SymphoniaDecoder};
use std::path::Path;

/// Size of the artifact at `path`; missing files and empty files are both failures.
pub fn artifact_size(path: &Path) -> Result<u64> {
    let metadata = std::fs::metadata(path)
        .map_err(|_| CheckError::ArtifactNotProduced(path.display().to_string()))?;
    if !metadata.is_file() {
        return Err(CheckError::ArtifactNotProduced(path.display().to_string()));
    }
    if metadata.len() == 0 {
        return Err(CheckError::ArtifactInvalid(format!(
            "{} is empty",
            path.display()
        )));
    }
    Ok(metadata.len())
}

pub fn check_duration(actual_secs: f64, expected_secs: f64, tolerance_secs: f64) -> Result<()> {
    if (actual_secs - expected_secs).abs() <= tolerance_secs {
        Ok(())
    } else {
        Err(CheckError::ArtifactInvalid(format!(
            "decoded duration {actual_secs:.3}s is not within {tolerance_secs}s of {expected_secs}s"
        )))
    }
}

pub fn check_sample_rate(actual: u32, expected: u32) -> Result<()> {
    if actual == expected {
        Ok(())
    } else {
        Err(CheckError::ArtifactInvalid(format!(
            "sample rate {actual} Hz does not match declared output rate {expected} Hz"
        )))
    }
}

/// Describes a buffer decoded from `source`.
pub fn inspect_buffer(source: &Path, audio: &DecodedAudio) -> Result<ProcessingResult> {
    let byte_size = artifact_size(source)?;
    let frames = audio.frames() as u64;
    Ok(ProcessingResult {
        artifact: source.to_path_buf(),
        byte_size,
        sample_count: frames,
        sample_rate: audio.sample_rate,
        channels: audio.channels,
        duration: frames_to_duration(frames, audio.sample_rate),
    })
}

/// Decodes the artifact at `path` and describes it.
pub fn inspect_artifact(path: &Path) -> Result<ProcessingResult> {
    artifact_size(path)?;
    let audio = SymphoniaDecoder::open(path)
        .and_then(SymphoniaDecoder::decode_all)
        .map_err(|e| CheckError::ArtifactInvalid(format!("{}: {e}", path.display())))?;
    inspect_buffer(path, &audio)
}
