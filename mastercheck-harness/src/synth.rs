//! Fixture synthesis through the codec tool's signal generator.

use crate::tool::CodecTool;
use mastercheck_core::error::{CheckError, Result};
use mastercheck_core::media::TargetFormat;
use std::path::Path;
use std::process::Stdio;
use tracing::{debug, instrument};

/// Renders a sine at `frequency` Hz for `duration_secs` straight into `format` at `path`.
///
/// An existing file at `path` is overwritten. A zero-byte result counts as failure
/// and is removed.
#[instrument(
    skip_all,
    fields(tool = %tool.name(), path = %path.display(), frequency = frequency, duration_secs = duration_secs)
)]
pub async fn synthesize(
    tool: &CodecTool,
    path: &Path,
    frequency: u32,
    duration_secs: f64,
    format: &TargetFormat,
) -> Result<()> {
    if frequency == 0 {
        return Err(CheckError::FixtureSynthesisFailed(
            "frequency must be positive".to_owned(),
        ));
    }
    if !duration_secs.is_finite() || duration_secs <= 0.0 {
        return Err(CheckError::FixtureSynthesisFailed(format!(
            "invalid duration {duration_secs}s"
        )));
    }

    let source = format!("sine=frequency={frequency}:duration={duration_secs}");
    let mut cmd = tool.command();
    cmd.arg("-f")
        .arg("lavfi")
        .arg("-i")
        .arg(&source)
        .arg("-acodec")
        .arg(&format.encoder)
        .arg("-y")
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    debug!(source = %source, encoder = %format.encoder, "synthesizing fixture");

    let status = cmd.status().await.map_err(|e| {
        CheckError::FixtureSynthesisFailed(format!("failed to execute {}: {e}", tool.name()))
    })?;

    if !status.success() {
        return Err(CheckError::FixtureSynthesisFailed(format!(
            "{} exited with {status} while creating {}",
            tool.name(),
            path.display()
        )));
    }

    let size = tokio::fs::metadata(path).await.map(|m| m.len()).unwrap_or(0);
    if size == 0 {
        let _ = tokio::fs::remove_file(path).await;
        return Err(CheckError::FixtureSynthesisFailed(format!(
            "{} produced an empty file at {}",
            tool.name(),
            path.display()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_rejects_zero_frequency() {
        let dir = tempfile::tempdir().unwrap();
        let err = synthesize(
            &CodecTool::at("ffmpeg"),
            &dir.path().join("x.mp3"),
            0,
            1.0,
            &TargetFormat::mp3(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CheckError::FixtureSynthesisFailed(_)));
    }

    #[tokio::test]
    async fn test_rejects_non_finite_duration() {
        let dir = tempfile::tempdir().unwrap();
        let err = synthesize(
            &CodecTool::at("ffmpeg"),
            &dir.path().join("x.mp3"),
            440,
            f64::NAN,
            &TargetFormat::mp3(),
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("invalid duration"));
    }

    #[tokio::test]
    async fn test_missing_tool_reports_its_own_diagnostic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x.mp3");
        let err = synthesize(
            &CodecTool::at("/nonexistent/bin/ffmpeg"),
            &path,
            440,
            1.0,
            &TargetFormat::mp3(),
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("failed to execute ffmpeg"));
        assert!(!path.exists());
    }
}
