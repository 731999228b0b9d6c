//! Format-agnostic decode adapter.
//!
//! Files are decoded natively first. When the native decoder cannot handle a file,
//! the codec tool converts it into a float WAV in the caller's scratch directory and
//! that copy is decoded instead. The result is always stereo at the pipeline rate.

use crate::decoder::{DecodedAudio, SymphoniaDecoder};
use crate::resample::resample;
use mastercheck_core::error::{CheckError, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct Loader {
    codec_binary: PathBuf,
    sample_rate: u32,
}

impl Loader {
    pub fn new(codec_binary: impl Into<PathBuf>, sample_rate: u32) -> Self {
        Self {
            codec_binary: codec_binary.into(),
            sample_rate,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Decodes `path`, labelling diagnostics with `label` (e.g. "TARGET").
    pub fn load(&self, path: &Path, label: &str, scratch_dir: &Path) -> Result<DecodedAudio> {
        debug!(path = %path.display(), label, "loading");

        if !path.is_file() {
            return Err(CheckError::DecodeAdapterFailure(format!(
                "{label}: file not found: {}",
                path.display()
            )));
        }

        let audio = match SymphoniaDecoder::open(path).and_then(SymphoniaDecoder::decode_all) {
            Ok(audio) => audio,
            Err(native) => {
                warn!(label, "native decoding failed ({native}), converting with codec tool");
                self.decode_via_codec_tool(path, label, scratch_dir)
                    .map_err(|bridge| {
                        CheckError::DecodeAdapterFailure(format!(
                            "{label}: {native}; codec tool fallback: {bridge}"
                        ))
                    })?
            }
        };

        if audio.is_empty() {
            return Err(CheckError::DecodeAdapterFailure(format!(
                "{label}: audio stream is empty"
            )));
        }

        let audio = match audio.channels {
            1 => mono_to_stereo(audio),
            2 => audio,
            n => {
                return Err(CheckError::DecodeAdapterFailure(format!(
                    "{label}: {n} channels are not supported, expected mono or stereo"
                )));
            }
        };

        if audio.sample_rate != self.sample_rate {
            info!(
                label,
                from = audio.sample_rate,
                to = self.sample_rate,
                "resampling"
            );
        }
        resample(audio, self.sample_rate).map_err(|e| {
            CheckError::DecodeAdapterFailure(format!("{label}: {e}"))
        })
    }

    fn decode_via_codec_tool(
        &self,
        path: &Path,
        label: &str,
        scratch_dir: &Path,
    ) -> Result<DecodedAudio> {
        let converted = scratch_dir.join(format!("{}.wav", label.to_ascii_lowercase()));

        let output = Command::new(&self.codec_binary)
            .arg("-y")
            .arg("-i")
            .arg(path)
            .arg("-vn")
            .arg("-acodec")
            .arg("pcm_f32le")
            .arg(&converted)
            .stdout(Stdio::null())
            .output()
            .map_err(|e| {
                CheckError::DecodeAdapterFailure(format!(
                    "Failed to execute {}: {e}",
                    self.codec_binary.display()
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let last_line = stderr.lines().last().unwrap_or("").trim();
            return Err(CheckError::DecodeAdapterFailure(format!(
                "{} exited with {}: {last_line}",
                self.codec_binary.display(),
                output.status
            )));
        }

        SymphoniaDecoder::open(&converted)?.decode_all()
    }
}

fn mono_to_stereo(audio: DecodedAudio) -> DecodedAudio {
    let samples = audio.samples.iter().flat_map(|&s| [s, s]).collect();
    DecodedAudio {
        samples,
        channels: 2,
        sample_rate: audio.sample_rate,
    }
}
