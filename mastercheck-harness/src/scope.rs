//! Ephemeral per-unit working directories and the fixtures that live in them.

use crate::synth::synthesize;
use crate::tool::CodecTool;
use mastercheck_core::error::Result;
use mastercheck_core::media::TargetFormat;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::debug;

/// Working directory owned by one test unit.
///
/// The directory and everything in it is deleted when the scope is dropped, which
/// happens on every exit path of the unit, including unwinding.
#[derive(Debug)]
pub struct UnitScope {
    unit: String,
    dir: TempDir,
}

impl UnitScope {
    pub fn acquire(unit: &str) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(&format!("mastercheck-{unit}-"))
            .tempdir()?;
        debug!(unit, dir = %dir.path().display(), "scope acquired");
        Ok(Self {
            unit: unit.to_owned(),
            dir,
        })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn file(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Synthesizes `<stem>.<ext>` inside this scope.
    pub async fn synthesize(
        &self,
        tool: &CodecTool,
        stem: &str,
        frequency: u32,
        duration_secs: f64,
        format: &TargetFormat,
    ) -> Result<Fixture<'_>> {
        let path = self.file(&format!("{stem}.{}", format.extension));
        synthesize(tool, &path, frequency, duration_secs, format).await?;
        Ok(Fixture {
            path,
            frequency,
            duration_secs,
            format: format.clone(),
            _scope: PhantomData,
        })
    }
}

impl Drop for UnitScope {
    fn drop(&mut self) {
        debug!(unit = %self.unit, dir = %self.dir.path().display(), "scope released");
    }
}

/// Synthetic audio file that cannot outlive the scope it was created in.
#[derive(Debug)]
pub struct Fixture<'scope> {
    path: PathBuf,
    frequency: u32,
    duration_secs: f64,
    format: TargetFormat,
    _scope: PhantomData<&'scope UnitScope>,
}

impl Fixture<'_> {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn frequency(&self) -> u32 {
        self.frequency
    }

    pub fn duration_secs(&self) -> f64 {
        self.duration_secs
    }

    pub fn format(&self) -> &TargetFormat {
        &self.format
    }
}
