//! WAV file reading and writing.

use crate::{Error, Result};
use hound::{SampleFormat, WavReader, WavWriter};
use ndarray::Array2;
use pitchlab_core::Waveform;
use std::path::Path;

/// Bit depths accepted by [`write_wav`]. 32 means IEEE float, the rest are PCM.
pub const SUPPORTED_BIT_DEPTHS: [u16; 4] = [8, 16, 24, 32];

/// WAV audio encoding format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WavFormat {
    /// Linear PCM (integer samples).
    Pcm,
    /// IEEE 754 floating-point samples.
    IeeeFloat,
}

/// WAV file metadata extracted without loading sample data.
#[derive(Debug, Clone)]
pub struct WavInfo {
    /// Number of audio channels (1 = mono, 2 = stereo).
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bit depth per sample.
    pub bits_per_sample: u16,
    /// Total number of sample frames (samples per channel).
    pub num_frames: u64,
    /// Duration in seconds.
    pub duration_secs: f64,
    /// Audio encoding format.
    pub format: WavFormat,
}

/// Read WAV metadata without loading sample data.
pub fn read_wav_info<P: AsRef<Path>>(path: P) -> Result<WavInfo> {
    let reader = WavReader::open(path)?;
    let spec = reader.spec();
    let total_samples = u64::from(reader.len()); // total across all channels
    let num_frames = total_samples / u64::from(spec.channels);
    let duration_secs = num_frames as f64 / f64::from(spec.sample_rate);

    let format = match spec.sample_format {
        SampleFormat::Float => WavFormat::IeeeFloat,
        SampleFormat::Int => WavFormat::Pcm,
    };

    Ok(WavInfo {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        bits_per_sample: spec.bits_per_sample,
        num_frames,
        duration_secs,
        format,
    })
}

/// WAV file specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavSpec {
    /// Number of audio channels (1 = mono, 2 = stereo).
    pub channels: u16,
    /// Sample rate in Hz (e.g., 16000, 44100).
    pub sample_rate: u32,
    /// Bit depth per sample (8, 16, 24, or 32 for float).
    pub bits_per_sample: u16,
}

impl Default for WavSpec {
    fn default() -> Self {
        Self {
            channels: 1,
            sample_rate: 16000,
            bits_per_sample: 16,
        }
    }
}

impl From<hound::WavSpec> for WavSpec {
    fn from(spec: hound::WavSpec) -> Self {
        Self {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
        }
    }
}

impl From<WavSpec> for hound::WavSpec {
    fn from(spec: WavSpec) -> Self {
        hound::WavSpec {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
            sample_format: if spec.bits_per_sample == 32 {
                SampleFormat::Float
            } else {
                SampleFormat::Int
            },
        }
    }
}

/// Decode every sample, interleaved, scaled to [-1, 1).
fn read_interleaved<P: AsRef<Path>>(path: P) -> Result<(Vec<f32>, WavSpec)> {
    let reader = WavReader::open(path)?;
    let spec = WavSpec::from(reader.spec());

    let samples: Vec<f32> = match reader.spec().sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
    };

    tracing::debug!(
        "read wav: {} samples, {} ch, {} Hz, {} bit",
        samples.len(),
        spec.channels,
        spec.sample_rate,
        spec.bits_per_sample
    );
    Ok((samples, spec))
}

/// Read a WAV file and return samples as f32 along with the spec.
///
/// Multi-channel files are mixed down to mono by averaging channels.
///
/// # Example
/// ```ignore
/// let (samples, spec) = read_wav("input.wav")?;
/// println!("Loaded {} samples at {} Hz", samples.len(), spec.sample_rate);
/// ```
pub fn read_wav<P: AsRef<Path>>(path: P) -> Result<(Vec<f32>, WavSpec)> {
    let (samples, spec) = read_interleaved(path)?;
    let channels = usize::from(spec.channels);

    let mono_samples = if channels > 1 {
        samples
            .chunks(channels)
            .map(|chunk| chunk.iter().sum::<f32>() / channels as f32)
            .collect()
    } else {
        samples
    };

    Ok((mono_samples, spec))
}

/// Read a WAV file keeping channels apart, as a `[channel, frame]` array.
///
/// A trailing partial frame (possible only in a truncated file) is dropped.
pub fn read_wav_channels<P: AsRef<Path>>(path: P) -> Result<(Array2<f32>, WavSpec)> {
    let (samples, spec) = read_interleaved(path)?;
    let channels = usize::from(spec.channels);
    let frames = samples.len() / channels;

    let mut audio = Array2::zeros((channels, frames));
    for (frame, chunk) in samples.chunks_exact(channels).enumerate() {
        for (channel, &sample) in chunk.iter().enumerate() {
            audio[[channel, frame]] = sample;
        }
    }

    Ok((audio, spec))
}

/// Read a WAV file as a mono [`Waveform`].
pub fn read_waveform<P: AsRef<Path>>(path: P) -> Result<Waveform> {
    let (samples, spec) = read_wav(path)?;
    Ok(Waveform::new(samples, spec.sample_rate)?)
}

/// Write samples to a WAV file.
///
/// `samples` are interleaved when `spec.channels > 1`. Integer formats clamp
/// to full scale; a warning is logged when any sample had to be clipped.
///
/// # Example
/// ```ignore
/// let samples = vec![0.0f32; 16000]; // 1 second of silence
/// let spec = WavSpec { sample_rate: 16000, ..Default::default() };
/// write_wav("output.wav", &samples, spec)?;
/// ```
pub fn write_wav<P: AsRef<Path>>(path: P, samples: &[f32], spec: WavSpec) -> Result<()> {
    if !SUPPORTED_BIT_DEPTHS.contains(&spec.bits_per_sample) {
        return Err(Error::UnsupportedFormat(format!(
            "{}-bit samples (expected one of {:?})",
            spec.bits_per_sample, SUPPORTED_BIT_DEPTHS
        )));
    }

    let path = path.as_ref();
    let hound_spec = hound::WavSpec::from(spec);
    let mut writer = WavWriter::create(path, hound_spec)?;

    if spec.bits_per_sample == 32 {
        for &sample in samples {
            writer.write_sample(sample)?;
        }
    } else {
        let max_val = (1i32 << (spec.bits_per_sample - 1)) as f32;
        let mut clipped = 0usize;
        for &sample in samples {
            let scaled = sample * max_val;
            if scaled < -max_val || scaled > max_val - 1.0 {
                clipped += 1;
            }
            let int_sample = scaled.clamp(-max_val, max_val - 1.0) as i32;
            writer.write_sample(int_sample)?;
        }
        if clipped > 0 {
            tracing::warn!(
                "{}: clipped {clipped} of {} samples to {}-bit full scale",
                path.display(),
                samples.len(),
                spec.bits_per_sample
            );
        }
    }

    writer.finalize()?;
    Ok(())
}

/// Write a [`Waveform`] as a mono WAV file.
///
/// With `normalize` the waveform is first divided by its peak absolute
/// value, so synthesized chords that sum above 1.0 do not clip.
pub fn write_waveform<P: AsRef<Path>>(
    path: P,
    waveform: &Waveform,
    bits_per_sample: u16,
    normalize: bool,
) -> Result<()> {
    let spec = WavSpec {
        channels: 1,
        sample_rate: waveform.sample_rate(),
        bits_per_sample,
    };

    if normalize {
        write_wav(path, waveform.normalized().samples(), spec)
    } else {
        write_wav(path, waveform.samples(), spec)
    }
}
