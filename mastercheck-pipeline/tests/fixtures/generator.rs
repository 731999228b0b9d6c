/// FFmpeg-based MP3 fixture generator
///
/// Renders sine waves straight into MP3. Callers skip their test when FFmpeg
/// is not installed.
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

pub fn is_ffmpeg_available() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Generate `<dir>/<name>.mp3` holding a sine at `frequency` for `duration_secs`
pub fn generate_mp3_sine(
    dir: &Path,
    name: &str,
    frequency: u32,
    duration_secs: f32,
) -> Result<PathBuf, String> {
    let output_path = dir.join(format!("{name}.mp3"));
    let output = Command::new("ffmpeg")
        .arg("-y")
        .arg("-f")
        .arg("lavfi")
        .arg("-i")
        .arg(format!("sine=frequency={frequency}:duration={duration_secs}"))
        .arg("-codec:a")
        .arg("libmp3lame")
        .arg(&output_path)
        .output()
        .map_err(|e| format!("Failed to execute FFmpeg: {e}"))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!("FFmpeg failed: {stderr}"));
    }

    Ok(output_path)
}
