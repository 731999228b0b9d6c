//! Durable sample files for manual testing outside the harness.

use crate::synth::synthesize;
use crate::tool::CodecTool;
use crate::workflow::group_thousands;
use mastercheck_core::config::{FixtureConfig, PublishConfig};
use mastercheck_core::error::CheckError;
use mastercheck_core::media::TargetFormat;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

/// One sample to publish.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSpec {
    pub filename: String,
    pub frequency: u32,
    pub description: String,
}

impl SampleSpec {
    pub fn new(filename: impl Into<String>, frequency: u32, description: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            frequency,
            description: description.into(),
        }
    }
}

/// The target/reference pair at the tested frequencies, named `<prefix>_test_<role>.<ext>`.
pub fn default_samples(
    prefix: &str,
    fixtures: &FixtureConfig,
    format: &TargetFormat,
) -> Vec<SampleSpec> {
    let ext = &format.extension;
    let target = fixtures.target_frequency;
    let reference = fixtures.reference_frequency;
    vec![
        SampleSpec::new(
            format!("{prefix}_test_target.{ext}"),
            target,
            format!("Target file ({target}Hz sine wave)"),
        ),
        SampleSpec::new(
            format!("{prefix}_test_reference.{ext}"),
            reference,
            format!("Reference file ({reference}Hz sine wave)"),
        ),
    ]
}

#[derive(Debug, Default)]
pub struct PublishOutcome {
    pub created: Vec<PathBuf>,
    pub failures: Vec<CheckError>,
}

impl PublishOutcome {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Synthesizes every sample into `directory`, creating it if absent.
///
/// A failing sample is recorded and the remaining samples are still attempted.
#[instrument(skip_all, fields(directory = %directory.display()))]
pub async fn publish(
    tool: &CodecTool,
    directory: &Path,
    samples: &[SampleSpec],
    duration_secs: f64,
    format: &TargetFormat,
) -> PublishOutcome {
    let mut outcome = PublishOutcome::default();

    if let Err(e) = tokio::fs::create_dir_all(directory).await {
        let err = CheckError::PublishIOFailure(format!(
            "cannot create {}: {e}",
            directory.display()
        ));
        warn!("{}", err);
        outcome.failures.push(err);
        return outcome;
    }

    for sample in samples {
        let path = directory.join(&sample.filename);
        info!("Creating {}...", sample.description);
        match synthesize(tool, &path, sample.frequency, duration_secs, format).await {
            Ok(()) => {
                let size = tokio::fs::metadata(&path).await.map(|m| m.len()).unwrap_or(0);
                info!(
                    "Created: {} ({} bytes)",
                    path.display(),
                    group_thousands(size)
                );
                outcome.created.push(path);
            }
            Err(e) => {
                let err = CheckError::PublishIOFailure(format!("{}: {e}", sample.filename));
                warn!("Failed to create {}: {}", sample.filename, e);
                outcome.failures.push(err);
            }
        }
    }

    outcome
}

/// Publishes the default samples as configured.
pub async fn publish_defaults(
    tool: &CodecTool,
    config: &PublishConfig,
    fixtures: &FixtureConfig,
    format: &TargetFormat,
) -> PublishOutcome {
    info!(
        "Creating sample {} files for manual testing",
        format.display_name()
    );
    let samples = default_samples(&config.prefix, fixtures, format);
    publish(
        tool,
        config.directory.as_std_path(),
        &samples,
        config.duration_secs,
        format,
    )
    .await
}
