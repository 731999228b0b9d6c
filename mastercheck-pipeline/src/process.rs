use crate::decoder::DecodedAudio;
use crate::loader::Loader;
use crate::mastering::{LevelMatch, Mastering};
use crate::writer::{ResultSpec, write_result};
use mastercheck_core::error::{CheckError, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, instrument};

/// Surface of the processing library that the harness exercises.
pub trait Pipeline: Send + Sync {
    /// Sample rate every decoded buffer and written result is delivered at.
    fn output_sample_rate(&self) -> u32;

    /// Decode adapter: turns an encoded file into a raw sample buffer.
    fn load(&self, path: &Path, label: &str, scratch_dir: &Path) -> Result<DecodedAudio>;

    /// Full workflow: masters `target` after `reference` and writes every requested result.
    fn process(&self, target: &Path, reference: &Path, results: &[ResultSpec]) -> Result<()>;
}

/// Decode, master and write, with scratch files kept in a private temporary directory.
pub struct MasteringPipeline {
    loader: Loader,
    mastering: Arc<dyn Mastering>,
}

impl MasteringPipeline {
    pub fn new(codec_binary: impl Into<PathBuf>, sample_rate: u32) -> Self {
        Self::with_mastering(codec_binary, sample_rate, Arc::new(LevelMatch))
    }

    pub fn with_mastering(
        codec_binary: impl Into<PathBuf>,
        sample_rate: u32,
        mastering: Arc<dyn Mastering>,
    ) -> Self {
        Self {
            loader: Loader::new(codec_binary, sample_rate),
            mastering,
        }
    }
}

impl Pipeline for MasteringPipeline {
    fn output_sample_rate(&self) -> u32 {
        self.loader.sample_rate()
    }

    fn load(&self, path: &Path, label: &str, scratch_dir: &Path) -> Result<DecodedAudio> {
        self.loader.load(path, label, scratch_dir)
    }

    #[instrument(skip_all, fields(target = %target.display(), reference = %reference.display()))]
    fn process(&self, target: &Path, reference: &Path, results: &[ResultSpec]) -> Result<()> {
        if results.is_empty() {
            return Err(CheckError::PipelineProcessingFailure(
                "at least one result must be requested".to_string(),
            ));
        }

        let scratch = tempfile::Builder::new()
            .prefix("mastercheck-pipeline-")
            .tempdir()
            .map_err(|e| {
                CheckError::PipelineProcessingFailure(format!("Failed to create scratch dir: {e}"))
            })?;

        let target_audio = self.loader.load(target, "TARGET", scratch.path())?;
        let reference_audio = self.loader.load(reference, "REFERENCE", scratch.path())?;
        info!(
            target_frames = target_audio.frames(),
            reference_frames = reference_audio.frames(),
            "tracks loaded"
        );

        let mastered = self.mastering.master(&target_audio, &reference_audio)?;

        for spec in results {
            write_result(&mastered, spec)?;
            info!(path = %spec.path.display(), "result saved");
        }
        Ok(())
    }
}
