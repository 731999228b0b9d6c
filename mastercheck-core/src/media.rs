use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Duration;

/// Compressed format the harness exercises.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetFormat {
    pub extension: String,
    pub encoder: String,
}

impl TargetFormat {
    pub fn new(extension: impl Into<String>, encoder: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
            encoder: encoder.into(),
        }
    }

    pub fn mp3() -> Self {
        Self::new("mp3", "libmp3lame")
    }

    pub fn display_name(&self) -> String {
        self.extension.to_ascii_uppercase()
    }
}

/// What the codec tool reported about itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityReport {
    pub tool_present: bool,
    pub version: String,
    pub encoders: BTreeSet<String>,
}

impl CapabilityReport {
    /// An absent tool supports nothing, whatever its listing says.
    pub fn supports(&self, encoder: &str) -> bool {
        self.tool_present && self.encoders.contains(encoder)
    }
}

/// Shape of a decoded artifact or buffer, used as a correctness proxy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingResult {
    pub artifact: PathBuf,
    pub byte_size: u64,
    pub sample_count: u64,
    pub sample_rate: u32,
    pub channels: u16,
    pub duration: Duration,
}

impl ProcessingResult {
    pub fn duration_secs(&self) -> f64 {
        self.duration.as_secs_f64()
    }
}

/// Duration of `frames` samples per channel at `sample_rate`.
pub fn frames_to_duration(frames: u64, sample_rate: u32) -> Duration {
    if sample_rate == 0 {
        return Duration::ZERO;
    }
    Duration::from_secs_f64(frames as f64 / sample_rate as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frames_to_duration() {
        assert_eq!(frames_to_duration(88200, 44100), Duration::from_secs(2));
        assert_eq!(frames_to_duration(100, 0), Duration::ZERO);
    }

    #[test]
    fn test_capability_supports() {
        let report = CapabilityReport {
            tool_present: true,
            version: "ffmpeg version 6.1".into(),
            encoders: ["libmp3lame".to_owned()].into_iter().collect(),
        };
        assert!(report.supports("libmp3lame"));
        assert!(!report.supports("libopus"));
    }

    #[test]
    fn test_absent_tool_supports_nothing() {
        let report = CapabilityReport {
            tool_present: false,
            version: String::new(),
            encoders: ["libmp3lame".to_owned()].into_iter().collect(),
        };
        assert!(!report.supports("libmp3lame"));
    }

    #[test]
    fn test_display_name() {
        assert_eq!(TargetFormat::mp3().display_name(), "MP3");
    }
}
