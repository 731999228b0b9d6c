//! Shared helpers for harness integration tests.
//!
//! Fake pipelines stand in for the real one so failure paths can be driven
//! without FFmpeg. On unix, fake codec tools are small shell scripts.
#![allow(dead_code)]

use camino::Utf8PathBuf;
use mastercheck_core::config::Config;
use mastercheck_core::error::{CheckError, Result};
use mastercheck_harness::CodecTool;
use mastercheck_pipeline::writer::write_result;
use mastercheck_pipeline::{DecodedAudio, Pipeline, ResultSpec};
use std::path::Path;

pub const RATE: u32 = 44100;

/// Config with publishing pointed into `dir` and short fixtures.
pub fn test_config(dir: &Path) -> Config {
    let mut config = Config::default();
    config.fixtures.duration_secs = 1.0;
    config.publish.duration_secs = 1.0;
    config.publish.directory =
        Utf8PathBuf::try_from(dir.join("published")).expect("temp dir is UTF-8");
    config.pipeline.sample_rate = RATE;
    config
}

pub fn is_ffmpeg_available() -> bool {
    std::process::Command::new("ffmpeg")
        .arg("-version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Pipeline that decodes every file to silence of the configured length.
pub struct SilentPipeline {
    pub duration_secs: f64,
}

impl SilentPipeline {
    fn silence(&self) -> DecodedAudio {
        let frames = (self.duration_secs * RATE as f64).round() as usize;
        DecodedAudio {
            samples: vec![0.0; frames * 2],
            channels: 2,
            sample_rate: RATE,
        }
    }
}

impl Pipeline for SilentPipeline {
    fn output_sample_rate(&self) -> u32 {
        RATE
    }

    fn load(&self, path: &Path, _label: &str, _scratch_dir: &Path) -> Result<DecodedAudio> {
        if !path.exists() {
            return Err(CheckError::DecodeAdapterFailure(format!(
                "{} does not exist",
                path.display()
            )));
        }
        Ok(self.silence())
    }

    fn process(&self, _target: &Path, _reference: &Path, results: &[ResultSpec]) -> Result<()> {
        let audio = self.silence();
        for spec in results {
            write_result(&audio, spec)?;
        }
        Ok(())
    }
}

/// Pipeline whose every call fails.
pub struct FailingPipeline;

impl Pipeline for FailingPipeline {
    fn output_sample_rate(&self) -> u32 {
        RATE
    }

    fn load(&self, _path: &Path, label: &str, _scratch_dir: &Path) -> Result<DecodedAudio> {
        Err(CheckError::DecodeAdapterFailure(format!(
            "{label}: unsupported stream"
        )))
    }

    fn process(&self, _target: &Path, _reference: &Path, _results: &[ResultSpec]) -> Result<()> {
        Err(CheckError::PipelineProcessingFailure(
            "reference is too quiet".to_owned(),
        ))
    }
}

/// Pipeline that returns without writing the requested result.
pub struct NoOutputPipeline;

impl Pipeline for NoOutputPipeline {
    fn output_sample_rate(&self) -> u32 {
        RATE
    }

    fn load(&self, path: &Path, label: &str, scratch_dir: &Path) -> Result<DecodedAudio> {
        SilentPipeline { duration_secs: 1.0 }.load(path, label, scratch_dir)
    }

    fn process(&self, _target: &Path, _reference: &Path, _results: &[ResultSpec]) -> Result<()> {
        Ok(())
    }
}

/// Pipeline that panics inside every call.
pub struct PanickingPipeline;

impl Pipeline for PanickingPipeline {
    fn output_sample_rate(&self) -> u32 {
        RATE
    }

    fn load(&self, _path: &Path, _label: &str, _scratch_dir: &Path) -> Result<DecodedAudio> {
        panic!("decoder state corrupted")
    }

    fn process(&self, _target: &Path, _reference: &Path, _results: &[ResultSpec]) -> Result<()> {
        panic!("mastering stage corrupted")
    }
}

/// Shell script standing in for FFmpeg: answers `-version`, and otherwise writes a
/// few bytes to its last argument.
#[cfg(unix)]
pub const WORKING_TOOL: &str = r#"#!/bin/sh
if [ "$1" = "-version" ]; then
    echo "ffmpeg version 6.1-fake Copyright (c) the FFmpeg developers"
    echo "configuration: --enable-gpl --enable-libmp3lame"
    exit 0
fi
for last; do :; done
printf 'ID3fakeaudio' > "$last"
exit 0
"#;

/// Exits successfully but leaves its output file empty.
#[cfg(unix)]
pub const EMPTY_TOOL: &str = r#"#!/bin/sh
for last; do :; done
: > "$last"
exit 0
"#;

#[cfg(unix)]
pub const HANGING_TOOL: &str = "#!/bin/sh\nsleep 30\n";

#[cfg(unix)]
pub const BROKEN_TOOL: &str = "#!/bin/sh\necho 'segmentation fault' >&2\nexit 139\n";

#[cfg(unix)]
pub const NO_ENCODER_TOOL: &str = r#"#!/bin/sh
if [ "$1" = "-version" ]; then
    echo "ffmpeg version 6.1-minimal"
    echo "configuration: --disable-everything --enable-gpl"
    exit 0
fi
exit 1
"#;

/// Installs `script` as an executable named `ffmpeg` under `dir`.
#[cfg(unix)]
pub fn fake_tool(dir: &Path, script: &str) -> CodecTool {
    use std::os::unix::fs::PermissionsExt;

    let bin = dir.join("bin");
    std::fs::create_dir_all(&bin).unwrap();
    let path = bin.join("ffmpeg");
    std::fs::write(&path, script).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    CodecTool::at(path)
}
