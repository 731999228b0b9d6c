use crate::decoder::DecodedAudio;
use mastercheck_core::error::{CheckError, Result};

/// Algorithm that shapes a target track after a reference track.
pub trait Mastering: Send + Sync {
    fn master(&self, target: &DecodedAudio, reference: &DecodedAudio) -> Result<DecodedAudio>;
}

/// Matches the target's RMS level to the reference and hard-clips to full scale.
///
/// A silent target has no level to match and passes through at unity gain.
#[derive(Debug, Clone, Copy, Default)]
pub struct LevelMatch;

impl Mastering for LevelMatch {
    fn master(&self, target: &DecodedAudio, reference: &DecodedAudio) -> Result<DecodedAudio> {
        if target.sample_rate != reference.sample_rate {
            return Err(CheckError::PipelineProcessingFailure(format!(
                "sample rate mismatch: target {} Hz, reference {} Hz",
                target.sample_rate, reference.sample_rate
            )));
        }

        let target_rms = rms(&target.samples);
        let gain = if target_rms <= f32::EPSILON {
            1.0
        } else {
            rms(&reference.samples) / target_rms
        };
        tracing::debug!(gain, "level match gain");

        Ok(DecodedAudio {
            samples: target
                .samples
                .iter()
                .map(|&s| (s * gain).clamp(-1.0, 1.0))
                .collect(),
            channels: target.channels,
            sample_rate: target.sample_rate,
        })
    }
}

pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f32 = samples.iter().map(|&s| s * s).sum();
    (sum / samples.len() as f32).sqrt()
}
