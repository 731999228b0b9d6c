/// Reference audio patterns for decoder validation
///
/// Provides mathematically verifiable audio patterns written to disk as WAV
/// so decoder tests run without any external tool.
use std::f32::consts::PI;
use std::path::Path;

/// Generate an interleaved sine wave at `amplitude`
pub fn generate_sine(
    frequency: f32,
    sample_rate: u32,
    channels: u16,
    duration_secs: f32,
    amplitude: f32,
) -> Vec<f32> {
    let num_frames = (sample_rate as f32 * duration_secs) as usize;
    let mut samples = Vec::with_capacity(num_frames * channels as usize);

    for frame in 0..num_frames {
        let t = frame as f32 / sample_rate as f32;
        let value = amplitude * (2.0 * PI * frequency * t).sin();
        for _ in 0..channels {
            samples.push(value);
        }
    }

    samples
}

/// Write interleaved samples as a 16-bit WAV file
pub fn write_wav(path: &Path, samples: &[f32], sample_rate: u32, channels: u16) {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).expect("Failed to create WAV");
    for &s in samples {
        writer
            .write_sample((s * i16::MAX as f32) as i16)
            .expect("Failed to write sample");
    }
    writer.finalize().expect("Failed to finalize WAV");
}

/// Write a sine WAV fixture and return its frame count
#[allow(dead_code)]
pub fn write_sine_wav(
    path: &Path,
    frequency: f32,
    sample_rate: u32,
    channels: u16,
    duration_secs: f32,
) -> usize {
    let samples = generate_sine(frequency, sample_rate, channels, duration_secs, 0.5);
    write_wav(path, &samples, sample_rate, channels);
    samples.len() / channels as usize
}

/// Calculate RMS (Root Mean Square) of samples
#[allow(dead_code)]
pub fn calculate_rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f32 = samples.iter().map(|&s| s * s).sum();
    (sum / samples.len() as f32).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_sine_length() {
        let samples = generate_sine(440.0, 44100, 2, 1.0, 0.5);
        assert_eq!(samples.len(), 44100 * 2);
    }

    #[test]
    fn test_rms_of_sine() {
        let samples = generate_sine(440.0, 44100, 1, 1.0, 1.0);
        assert!((calculate_rms(&samples) - 0.707).abs() < 0.01);
    }
}
