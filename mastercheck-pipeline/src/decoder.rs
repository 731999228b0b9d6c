use mastercheck_core::error::{CheckError, Result};
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{CODEC_TYPE_NULL, DecoderOptions};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Interleaved f32 samples with their layout.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    pub samples: Vec<f32>,
    pub channels: u16,
    pub sample_rate: u32,
}

impl DecodedAudio {
    /// Number of frames (samples per channel).
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            0
        } else {
            self.samples.len() / self.channels as usize
        }
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            0.0
        } else {
            self.frames() as f64 / self.sample_rate as f64
        }
    }

    pub fn is_empty(&self) -> bool {
        self.frames() == 0
    }
}

/// Symphonia-based audio decoder
pub struct SymphoniaDecoder {
    reader: Box<dyn FormatReader>,
    decoder: Box<dyn symphonia::core::codecs::Decoder>,
    track_id: u32,
    sample_rate: u32,
    channels: Option<u16>,
    total_frames: Option<u64>,
    current_frame: usize,
    sample_buf: Option<SampleBuffer<f32>>,
}

impl SymphoniaDecoder {
    pub fn open(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .map_err(|e| CheckError::DecodeAdapterFailure(format!("Failed to open file: {}", e)))?;

        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        let mut hint = Hint::new();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext);
        }

        // Gapless trimming drops encoder delay and padding from lossy streams
        let format_opts = FormatOptions {
            enable_gapless: true,
            ..Default::default()
        };

        let probed = symphonia::default::get_probe()
            .format(&hint, mss, &format_opts, &MetadataOptions::default())
            .map_err(|e| {
                CheckError::DecodeAdapterFailure(format!("Failed to probe format: {}", e))
            })?;

        let reader = probed.format;

        let track = reader
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| CheckError::DecodeAdapterFailure("No audio tracks found".to_string()))?;

        let track_id = track.id;
        let codec_params = &track.codec_params;

        let sample_rate = codec_params.sample_rate.ok_or_else(|| {
            CheckError::DecodeAdapterFailure("Sample rate not available".to_string())
        })?;

        // Channels might not be available until after decoding starts
        let channels = codec_params.channels.map(|ch| ch.count() as u16);
        let total_frames = codec_params.n_frames;

        let decoder = symphonia::default::get_codecs()
            .make(codec_params, &DecoderOptions::default())
            .map_err(|e| {
                CheckError::DecodeAdapterFailure(format!("Failed to create decoder: {}", e))
            })?;

        Ok(Self {
            reader,
            decoder,
            track_id,
            sample_rate,
            channels,
            total_frames,
            current_frame: 0,
            sample_buf: None,
        })
    }

    /// Fills `buffer` with interleaved samples, returning how many were written.
    /// Zero means end of stream.
    pub fn read(&mut self, buffer: &mut [f32]) -> Result<usize> {
        let mut samples_written = 0;

        while samples_written < buffer.len() {
            if let Some(ref sample_buf) = self.sample_buf {
                let total_samples = sample_buf.samples().len();
                let samples_available = total_samples - self.current_frame;
                let samples_to_copy = (buffer.len() - samples_written).min(samples_available);

                if samples_to_copy > 0 {
                    let src_offset = self.current_frame;
                    buffer[samples_written..samples_written + samples_to_copy].copy_from_slice(
                        &sample_buf.samples()[src_offset..src_offset + samples_to_copy],
                    );

                    samples_written += samples_to_copy;
                    self.current_frame += samples_to_copy;
                }

                if self.current_frame >= total_samples {
                    self.sample_buf = None;
                    self.current_frame = 0;
                }

                if samples_written >= buffer.len() {
                    break;
                }
            }

            let packet = match self.reader.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    break;
                }
                Err(SymphoniaError::ResetRequired) => {
                    self.decoder.reset();
                    continue;
                }
                Err(e) => {
                    tracing::error!("Failed to read packet: {}", e);
                    return Err(CheckError::DecodeAdapterFailure(format!(
                        "Failed to read packet: {}",
                        e
                    )));
                }
            };

            if packet.track_id() != self.track_id {
                continue;
            }

            let decoded = match self.decoder.decode(&packet) {
                Ok(decoded) => decoded,
                Err(SymphoniaError::DecodeError(e)) => {
                    tracing::debug!("Skipping undecodable packet: {}", e);
                    continue;
                }
                Err(e) => {
                    return Err(CheckError::DecodeAdapterFailure(format!(
                        "Failed to decode packet: {}",
                        e
                    )));
                }
            };

            let spec = *decoded.spec();
            let capacity = decoded.capacity() as u64;

            if self.channels.is_none() {
                self.channels = Some(spec.channels.count() as u16);
            }

            let mut new_sample_buf = SampleBuffer::<f32>::new(capacity, spec);
            new_sample_buf.copy_interleaved_ref(decoded);

            self.sample_buf = Some(new_sample_buf);
            self.current_frame = 0;
        }

        Ok(samples_written)
    }

    /// Decodes the remainder of the stream into memory.
    pub fn decode_all(mut self) -> Result<DecodedAudio> {
        let mut samples = Vec::new();
        let mut buffer = vec![0.0f32; 4096];

        loop {
            let samples_read = self.read(&mut buffer)?;
            if samples_read == 0 {
                break;
            }
            samples.extend_from_slice(&buffer[..samples_read]);
        }

        Ok(DecodedAudio {
            samples,
            channels: self.channels(),
            sample_rate: self.sample_rate,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels.unwrap_or(2)
    }

    /// Frame count declared by the container, when it carries one.
    pub fn total_frames(&self) -> Option<u64> {
        self.total_frames
    }
}
