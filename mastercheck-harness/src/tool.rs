//! Location of the external codec tool.

use mastercheck_core::config::CodecConfig;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct CodecTool {
    name: String,
    program: PathBuf,
}

impl CodecTool {
    /// Resolves the configured binary against the extra search paths, then `PATH`.
    ///
    /// An unresolvable binary keeps its bare name so every later invocation fails
    /// with its own "not found" diagnostic instead of aborting the run here.
    pub fn resolve(config: &CodecConfig) -> Self {
        let name = Path::new(&config.binary)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&config.binary)
            .to_owned();

        let program = match which::which_in(&config.binary, search_path(config), current_dir()) {
            Ok(path) => {
                debug!(tool = %name, path = %path.display(), "codec tool resolved");
                path
            }
            Err(e) => {
                debug!(tool = %name, "codec tool not resolved: {}", e);
                PathBuf::from(&config.binary)
            }
        };

        Self { name, program }
    }

    /// Uses `program` as-is, without any lookup.
    pub fn at(program: impl Into<PathBuf>) -> Self {
        let program = program.into();
        let name = program
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("codec")
            .to_owned();
        Self { name, program }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.kill_on_drop(true);
        cmd
    }
}

fn search_path(config: &CodecConfig) -> Option<OsString> {
    let extra = config.search_paths.iter().map(|p| PathBuf::from(p.as_std_path()));
    let system = std::env::var_os("PATH")
        .map(|p| std::env::split_paths(&p).collect::<Vec<_>>())
        .unwrap_or_default();
    std::env::join_paths(extra.chain(system)).ok()
}

fn current_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}
