use crate::error::{CheckError, Result};
use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub codec: CodecConfig,
    #[serde(default)]
    pub fixtures: FixtureConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
    #[serde(default)]
    pub publish: PublishConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// External codec tool and the encoder plugin the format under test needs.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CodecConfig {
    #[serde(default = "default_binary")]
    pub binary: String,
    /// Directories consulted before `PATH` when resolving `binary`.
    #[serde(default)]
    pub search_paths: Vec<Utf8PathBuf>,
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_secs: u64,
    #[serde(default = "default_encoder")]
    pub encoder: String,
    #[serde(default = "default_extension")]
    pub extension: String,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct FixtureConfig {
    #[serde(default = "default_target_frequency")]
    pub target_frequency: u32,
    #[serde(default = "default_reference_frequency")]
    pub reference_frequency: u32,
    #[serde(default = "default_fixture_duration")]
    pub duration_secs: f64,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct ValidationConfig {
    #[serde(default = "default_duration_tolerance")]
    pub duration_tolerance_secs: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PublishConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_publish_dir")]
    pub directory: Utf8PathBuf,
    #[serde(default = "default_prefix")]
    pub prefix: String,
    #[serde(default = "default_publish_duration")]
    pub duration_secs: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReportConfig {
    #[serde(default = "default_interface_url")]
    pub interface_url: String,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct PipelineConfig {
    /// Declared output rate of the pipeline under test.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            search_paths: Vec::new(),
            probe_timeout_secs: default_probe_timeout(),
            encoder: default_encoder(),
            extension: default_extension(),
        }
    }
}

impl CodecConfig {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self {
            target_frequency: default_target_frequency(),
            reference_frequency: default_reference_frequency(),
            duration_secs: default_fixture_duration(),
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            duration_tolerance_secs: default_duration_tolerance(),
        }
    }
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            directory: default_publish_dir(),
            prefix: default_prefix(),
            duration_secs: default_publish_duration(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            interface_url: default_interface_url(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
        }
    }
}

// Default value functions
fn default_binary() -> String {
    "ffmpeg".to_owned()
}

const fn default_probe_timeout() -> u64 {
    5
}

fn default_encoder() -> String {
    "libmp3lame".to_owned()
}

fn default_extension() -> String {
    "mp3".to_owned()
}

const fn default_target_frequency() -> u32 {
    440
}

const fn default_reference_frequency() -> u32 {
    880
}

const fn default_fixture_duration() -> f64 {
    2.0
}

const fn default_duration_tolerance() -> f64 {
    0.05
}

fn default_true() -> bool {
    true
}

fn default_publish_dir() -> Utf8PathBuf {
    dirs::download_dir()
        .or_else(|| dirs::home_dir().map(|p| p.join("Downloads")))
        .and_then(|p| Utf8PathBuf::try_from(p).ok())
        .unwrap_or_else(|| Utf8PathBuf::from("~/Downloads"))
}

fn default_prefix() -> String {
    "mastercheck".to_owned()
}

const fn default_publish_duration() -> f64 {
    5.0
}

fn default_interface_url() -> String {
    "http://127.0.0.1:8360".to_owned()
}

const fn default_sample_rate() -> u32 {
    44100
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::candidates()
            .into_iter()
            .find(|p| p.exists())
            .ok_or_else(|| CheckError::Config("Config file not found".to_owned()))?;
        Self::load_from_path(&config_path)
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| CheckError::Config(format!("Failed to read config: {}", e)))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(content)
            .map_err(|e| CheckError::Config(format!("Failed to parse config: {}", e)))?;

        config.expand_paths();
        config.validate()?;
        Ok(config)
    }

    /// Loads the first config file found, or defaults when there is none.
    ///
    /// A file that exists but cannot be read, parsed or validated is an error.
    pub fn load_or_default() -> Result<Self> {
        Self::load_first_of(Self::candidates())
    }

    fn load_first_of(candidates: impl IntoIterator<Item = PathBuf>) -> Result<Self> {
        match candidates.into_iter().find(|p| p.exists()) {
            Some(path) => {
                tracing::debug!("Loading configuration from {}", path.display());
                Self::load_from_path(&path).map_err(|e| match e {
                    CheckError::Config(msg) => {
                        CheckError::Config(format!("{}: {msg}", path.display()))
                    }
                    other => other,
                })
            }
            None => {
                tracing::debug!("No config file found, using default configuration");
                let mut config = Self::default();
                config.expand_paths();
                Ok(config)
            }
        }
    }

    fn candidates() -> Vec<PathBuf> {
        [
            dirs::config_dir().map(|p| p.join("mastercheck/mastercheck.toml")),
            Some(PathBuf::from("/etc/mastercheck/mastercheck.toml")),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    fn expand_paths(&mut self) {
        fn expand_tilde(path: &Utf8PathBuf) -> Utf8PathBuf {
            let path_str = path.as_str();
            if path_str.starts_with("~/") {
                if let Some(home) = dirs::home_dir() {
                    if let Some(home_str) = home.to_str() {
                        return Utf8PathBuf::from(path_str.replacen("~", home_str, 1));
                    }
                }
            }
            path.clone()
        }

        self.publish.directory = expand_tilde(&self.publish.directory);
        self.codec.search_paths = self.codec.search_paths.iter().map(expand_tilde).collect();
    }

    fn validate(&self) -> Result<()> {
        if self.codec.binary.trim().is_empty() {
            return Err(CheckError::Config("codec.binary must not be empty".to_owned()));
        }
        if self.codec.probe_timeout_secs == 0 {
            return Err(CheckError::Config(
                "codec.probe_timeout_secs must be positive".to_owned(),
            ));
        }
        if self.fixtures.target_frequency == 0 || self.fixtures.reference_frequency == 0 {
            return Err(CheckError::Config("fixture frequencies must be positive".to_owned()));
        }
        if self.fixtures.duration_secs <= 0.0 || self.publish.duration_secs <= 0.0 {
            return Err(CheckError::Config("fixture durations must be positive".to_owned()));
        }
        if self.validation.duration_tolerance_secs < 0.0 {
            return Err(CheckError::Config(
                "validation.duration_tolerance_secs must not be negative".to_owned(),
            ));
        }
        if self.pipeline.sample_rate == 0 {
            return Err(CheckError::Config("pipeline.sample_rate must be positive".to_owned()));
        }
        Ok(())
    }
}
