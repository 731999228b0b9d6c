use crate::decoder::DecodedAudio;
use mastercheck_core::error::{CheckError, Result};
use std::path::{Path, PathBuf};

/// Sample encoding of a WAV result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PcmSubtype {
    Pcm16,
    Pcm24,
    Float32,
}

/// One output artifact requested from [`crate::Pipeline::process`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultSpec {
    pub path: PathBuf,
    pub subtype: PcmSubtype,
}

impl ResultSpec {
    pub fn pcm16(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            subtype: PcmSubtype::Pcm16,
        }
    }

    pub fn pcm24(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            subtype: PcmSubtype::Pcm24,
        }
    }

    pub fn float32(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            subtype: PcmSubtype::Float32,
        }
    }
}

/// Writes `audio` to `spec.path` as a WAV file in the requested subtype.
pub fn write_result(audio: &DecodedAudio, spec: &ResultSpec) -> Result<()> {
    let (bits_per_sample, sample_format) = match spec.subtype {
        PcmSubtype::Pcm16 => (16, hound::SampleFormat::Int),
        PcmSubtype::Pcm24 => (24, hound::SampleFormat::Int),
        PcmSubtype::Float32 => (32, hound::SampleFormat::Float),
    };
    let wav_spec = hound::WavSpec {
        channels: audio.channels,
        sample_rate: audio.sample_rate,
        bits_per_sample,
        sample_format,
    };

    let mut writer = hound::WavWriter::create(&spec.path, wav_spec)
        .map_err(|e| write_error(&spec.path, e))?;

    match spec.subtype {
        PcmSubtype::Pcm16 => {
            for &s in &audio.samples {
                writer
                    .write_sample(quantize(s, i16::MAX as f32) as i16)
                    .map_err(|e| write_error(&spec.path, e))?;
            }
        }
        PcmSubtype::Pcm24 => {
            for &s in &audio.samples {
                writer
                    .write_sample(quantize(s, 8_388_607.0))
                    .map_err(|e| write_error(&spec.path, e))?;
            }
        }
        PcmSubtype::Float32 => {
            for &s in &audio.samples {
                writer
                    .write_sample(s.clamp(-1.0, 1.0))
                    .map_err(|e| write_error(&spec.path, e))?;
            }
        }
    }

    writer.finalize().map_err(|e| write_error(&spec.path, e))?;
    tracing::debug!(path = %spec.path.display(), subtype = ?spec.subtype, "result written");
    Ok(())
}

fn quantize(sample: f32, full_scale: f32) -> i32 {
    (sample.clamp(-1.0, 1.0) * full_scale).round() as i32
}

fn write_error(path: &Path, e: hound::Error) -> CheckError {
    CheckError::PipelineProcessingFailure(format!("Failed to write {}: {}", path.display(), e))
}
