//! Sample-rate conversion onto the pipeline's internal rate.

use crate::decoder::DecodedAudio;
use mastercheck_core::error::{CheckError, Result};
use rubato::{FftFixedIn, Resampler};

const CHUNK_FRAMES: usize = 1024;
const MAX_FLUSHES: usize = 4;

/// Converts `audio` to `target_rate`, returning it untouched when the rates already agree.
pub fn resample(audio: DecodedAudio, target_rate: u32) -> Result<DecodedAudio> {
    if audio.sample_rate == target_rate || audio.is_empty() {
        return Ok(audio);
    }

    let channels = audio.channels as usize;
    let frames = audio.frames();
    let planar = deinterleave(&audio.samples, channels);

    let mut resampler = FftFixedIn::<f32>::new(
        audio.sample_rate as usize,
        target_rate as usize,
        CHUNK_FRAMES,
        2,
        channels,
    )
    .map_err(|e| CheckError::PipelineProcessingFailure(format!("Resampler setup failed: {}", e)))?;

    let mut output: Vec<Vec<f32>> = vec![Vec::new(); channels];
    let append = |output: &mut Vec<Vec<f32>>, block: Vec<Vec<f32>>| {
        for (dst, src) in output.iter_mut().zip(block) {
            dst.extend(src);
        }
    };

    // The resampler rounds the requested chunk up to a multiple of its FFT size
    let chunk = resampler.input_frames_next();
    let mut pos = 0;
    while pos + chunk <= frames {
        let block: Vec<&[f32]> = planar.iter().map(|c| &c[pos..pos + chunk]).collect();
        append(&mut output, resampler.process(&block, None).map_err(resample_error)?);
        pos += chunk;
    }
    if pos < frames {
        let block: Vec<&[f32]> = planar.iter().map(|c| &c[pos..]).collect();
        append(
            &mut output,
            resampler.process_partial(Some(block.as_slice()), None).map_err(resample_error)?,
        );
    }

    let delay = resampler.output_delay();
    let expected =
        (frames as f64 * target_rate as f64 / audio.sample_rate as f64).round() as usize;

    // Flush the filter tail so the delay can be trimmed off the front
    for _ in 0..MAX_FLUSHES {
        if output[0].len() >= delay + expected {
            break;
        }
        append(
            &mut output,
            resampler
                .process_partial::<&[f32]>(None, None)
                .map_err(resample_error)?,
        );
    }

    let trimmed: Vec<Vec<f32>> = output
        .into_iter()
        .map(|c| c.into_iter().skip(delay).take(expected).collect())
        .collect();

    Ok(DecodedAudio {
        samples: interleave(&trimmed),
        channels: audio.channels,
        sample_rate: target_rate,
    })
}

fn resample_error(e: rubato::ResampleError) -> CheckError {
    CheckError::PipelineProcessingFailure(format!("Resampling failed: {}", e))
}

fn deinterleave(samples: &[f32], channels: usize) -> Vec<Vec<f32>> {
    let mut planar = vec![Vec::with_capacity(samples.len() / channels.max(1)); channels];
    for frame in samples.chunks_exact(channels) {
        for (ch, &s) in frame.iter().enumerate() {
            planar[ch].push(s);
        }
    }
    planar
}

fn interleave(planar: &[Vec<f32>]) -> Vec<f32> {
    let frames = planar.iter().map(Vec::len).min().unwrap_or(0);
    let mut samples = Vec::with_capacity(frames * planar.len());
    for i in 0..frames {
        for channel in planar {
            samples.push(channel[i]);
        }
    }
    samples
}
