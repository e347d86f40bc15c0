//! STFT-based spectrogram generation
//!
//! [`SpectrogramEngine`] slices mono audio into overlapping frames, windows
//! each one, and keeps the non-negative half of its DFT raised to a power.
//! The result is a [`Spectrogram`] laid out `[frequency_bin, time_frame]`.
//! The same engine carries a mel filterbank and a dB scaler so that
//! [`SpectrogramEngine::analyze`] runs the whole chain in one call.

use crate::channels::to_mono;
use crate::db::{DecibelScaler, ValueScale};
use crate::fft::{Fft, Window};
use crate::mel::{MelFilterbank, MelSpectrogram};
use ndarray::{Array2, ArrayView1, ArrayView2};
use pitchlab_core::{Error, Result};
use rustfft::num_complex::Complex;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Frame geometry shared by a spectrogram and the engine that made it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLayout {
    n_fft: usize,
    hop_size: usize,
    sample_rate: u32,
}

impl FrameLayout {
    /// Create a layout; every field must be non-zero.
    pub fn new(n_fft: usize, hop_size: usize, sample_rate: u32) -> Result<Self> {
        if n_fft == 0 {
            return Err(Error::degenerate("n_fft must be greater than zero"));
        }
        if hop_size == 0 {
            return Err(Error::degenerate("hop size must be greater than zero"));
        }
        if sample_rate == 0 {
            return Err(Error::degenerate("sample rate must be greater than zero"));
        }
        Ok(Self {
            n_fft,
            hop_size,
            sample_rate,
        })
    }

    /// DFT length in samples.
    pub fn n_fft(&self) -> usize {
        self.n_fft
    }

    /// Samples between successive frame starts.
    pub fn hop_size(&self) -> usize {
        self.hop_size
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of frequency bins, `n_fft / 2 + 1`.
    pub fn num_bins(&self) -> usize {
        self.n_fft / 2 + 1
    }

    /// Number of complete frames in a signal of `len` samples.
    ///
    /// Trailing samples that do not fill a frame are dropped; a signal
    /// shorter than `n_fft` has no frames.
    pub fn num_frames(&self, len: usize) -> usize {
        if len >= self.n_fft {
            (len - self.n_fft) / self.hop_size + 1
        } else {
            0
        }
    }

    /// Centre frequency of `bin` in Hz, `bin·sample_rate/n_fft`.
    pub fn bin_to_frequency_hz(&self, bin: usize) -> f32 {
        (bin as f64 * f64::from(self.sample_rate) / self.n_fft as f64) as f32
    }

    /// Start time of `frame` in seconds, `frame·hop_size/sample_rate`.
    pub fn frame_to_seconds(&self, frame: usize) -> f32 {
        (frame as f64 * self.hop_size as f64 / f64::from(self.sample_rate)) as f32
    }
}

/// Spectrogram data structure
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrogram {
    values: Array2<f32>,
    layout: FrameLayout,
    scale: ValueScale,
}

impl Spectrogram {
    /// Wrap an existing `[bin, frame]` grid.
    ///
    /// Fails with [`Error::ShapeMismatch`] unless the grid has exactly
    /// `layout.num_bins()` rows.
    pub fn from_values(values: Array2<f32>, layout: FrameLayout, scale: ValueScale) -> Result<Self> {
        if values.nrows() != layout.num_bins() {
            return Err(Error::ShapeMismatch {
                axis: "frequency bins",
                expected: layout.num_bins(),
                found: values.nrows(),
            });
        }
        Ok(Self {
            values,
            layout,
            scale,
        })
    }

    /// Values as a `[bin, frame]` array.
    pub fn values(&self) -> &Array2<f32> {
        &self.values
    }

    /// Take the underlying array.
    pub fn into_values(self) -> Array2<f32> {
        self.values
    }

    /// Frame geometry.
    pub fn layout(&self) -> FrameLayout {
        self.layout
    }

    /// Whether values are linear power or dB.
    pub fn scale(&self) -> ValueScale {
        self.scale
    }

    /// Number of frequency bins (rows).
    pub fn num_bins(&self) -> usize {
        self.values.nrows()
    }

    /// Number of time frames (columns).
    pub fn num_frames(&self) -> usize {
        self.values.ncols()
    }

    /// Get frequency in Hz for a given bin index
    pub fn bin_to_frequency_hz(&self, bin: usize) -> f32 {
        self.layout.bin_to_frequency_hz(bin)
    }

    /// Get time in seconds for a given frame index
    pub fn frame_to_seconds(&self, frame: usize) -> f32 {
        self.layout.frame_to_seconds(frame)
    }

    /// Time spanned by the frame starts, `num_frames·hop/sample_rate`.
    pub fn duration_secs(&self) -> f32 {
        self.frame_to_seconds(self.num_frames())
    }

    /// Value at a bin and frame, `None` if out of bounds.
    pub fn get(&self, bin: usize, frame: usize) -> Option<f32> {
        self.values.get((bin, frame)).copied()
    }

    /// The spectrum of one frame.
    pub fn frame(&self, frame: usize) -> Option<ArrayView1<'_, f32>> {
        (frame < self.num_frames()).then(|| self.values.column(frame))
    }

    /// Loudest bin in a frame.
    pub fn peak_bin(&self, frame: usize) -> Option<usize> {
        self.frame(frame)?
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(bin, _)| bin)
    }

    /// Find peak frequency at a given time frame
    pub fn peak_frequency(&self, frame: usize) -> Option<f32> {
        self.peak_bin(frame).map(|bin| self.bin_to_frequency_hz(bin))
    }

    /// Compute spectral centroid for each frame
    ///
    /// Meaningful on linear values only; silent frames report 0 Hz.
    pub fn spectral_centroid(&self) -> Vec<f32> {
        self.values
            .columns()
            .into_iter()
            .map(|frame| {
                let mut weighted_sum = 0.0;
                let mut magnitude_sum = 0.0;

                for (bin, &mag) in frame.iter().enumerate() {
                    weighted_sum += self.bin_to_frequency_hz(bin) * mag;
                    magnitude_sum += mag;
                }

                if magnitude_sum > 1e-10 {
                    weighted_sum / magnitude_sum
                } else {
                    0.0
                }
            })
            .collect()
    }

    /// Convert to dB. A spectrogram already in dB is returned unchanged.
    pub fn to_db(&self, scaler: &DecibelScaler) -> Spectrogram {
        match self.scale {
            ValueScale::Decibel => self.clone(),
            ValueScale::Linear => Spectrogram {
                values: scaler.scale(&self.values),
                layout: self.layout,
                scale: ValueScale::Decibel,
            },
        }
    }
}

/// Construction parameters for [`SpectrogramEngine`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineSettings {
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// DFT length
    pub n_fft: usize,
    /// Samples between frame starts
    pub hop_size: usize,
    /// Mel bands in the filterbank
    pub num_mels: usize,
    /// Exponent applied to DFT magnitudes (2.0 = power, 1.0 = magnitude)
    pub power: f32,
    /// Analysis window
    pub window: Window,
    /// Clamp value for dB conversion
    pub db_floor: f32,
    /// Lowest mel corner frequency in Hz
    pub f_min: f32,
    /// Highest mel corner frequency in Hz; Nyquist when `None`
    pub f_max: Option<f32>,
}

impl EngineSettings {
    /// Settings for the given geometry with every other field at its default.
    pub fn new(sample_rate: u32, n_fft: usize, hop_size: usize, num_mels: usize) -> Self {
        Self {
            sample_rate,
            n_fft,
            hop_size,
            num_mels,
            ..Self::default()
        }
    }
}

/// 16 kHz, n_fft 1024, hop 512, 128 mels, power 2.0, symmetric Hann.
///
/// `torch.hann_window` and torchaudio's `MelSpectrogram` use the periodic
/// Hann window; set `window` to [`Window::PeriodicHann`] to match their
/// output.
impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            sample_rate: 16000,
            n_fft: 1024,
            hop_size: 512,
            num_mels: 128,
            power: 2.0,
            window: Window::Hann,
            db_floor: crate::db::DEFAULT_FLOOR,
            f_min: 0.0,
            f_max: None,
        }
    }
}

/// STFT analyzer with a cached window, FFT plan, and mel filterbank.
///
/// Everything is built in the constructor and only read afterwards, so a
/// single engine can be shared across threads.
#[derive(Debug, Clone)]
pub struct SpectrogramEngine {
    layout: FrameLayout,
    power: f32,
    window: Window,
    window_coeffs: Vec<f32>,
    fft: Fft,
    filterbank: MelFilterbank,
    scaler: DecibelScaler,
}

impl SpectrogramEngine {
    /// Create an engine with power 2.0, a symmetric Hann window, a full-band
    /// mel filterbank, and the default dB floor.
    ///
    /// # Arguments
    /// * `sample_rate` - Sample rate in Hz
    /// * `n_fft` - DFT length
    /// * `hop_size` - Samples between frame starts
    /// * `num_mels` - Mel bands used by [`analyze`](Self::analyze)
    pub fn new(sample_rate: u32, n_fft: usize, hop_size: usize, num_mels: usize) -> Result<Self> {
        Self::with_settings(EngineSettings::new(sample_rate, n_fft, hop_size, num_mels))
    }

    /// Create an engine from explicit settings.
    pub fn with_settings(settings: EngineSettings) -> Result<Self> {
        let layout = FrameLayout::new(settings.n_fft, settings.hop_size, settings.sample_rate)?;

        if !settings.power.is_finite() || settings.power <= 0.0 {
            return Err(Error::degenerate(format!(
                "power must be positive and finite, got {}",
                settings.power
            )));
        }

        let nyquist = settings.sample_rate as f32 / 2.0;
        let filterbank = MelFilterbank::with_frequency_range(
            settings.n_fft,
            settings.sample_rate,
            settings.num_mels,
            settings.f_min,
            settings.f_max.unwrap_or(nyquist),
        )?;
        let scaler = DecibelScaler::new(settings.db_floor)?;

        tracing::debug!(
            "spectrogram engine: n_fft={} hop={} sr={} mels={} power={} window={}",
            settings.n_fft,
            settings.hop_size,
            settings.sample_rate,
            settings.num_mels,
            settings.power,
            settings.window
        );

        Ok(Self {
            layout,
            power: settings.power,
            window: settings.window,
            window_coeffs: settings.window.coefficients(settings.n_fft),
            fft: Fft::new(settings.n_fft),
            filterbank,
            scaler,
        })
    }

    /// Compute spectrogram from a mono signal
    pub fn compute_spectrogram(&self, audio: &[f32]) -> Spectrogram {
        let num_frames = self.layout.num_frames(audio.len());
        let num_bins = self.layout.num_bins();

        #[cfg(feature = "parallel")]
        let columns: Vec<Vec<f32>> = (0..num_frames)
            .into_par_iter()
            .map(|frame| self.frame_spectrum(audio, frame))
            .collect();

        #[cfg(not(feature = "parallel"))]
        let columns: Vec<Vec<f32>> = (0..num_frames)
            .map(|frame| self.frame_spectrum(audio, frame))
            .collect();

        let mut values = Array2::zeros((num_bins, num_frames));
        for (mut column, spectrum) in values.columns_mut().into_iter().zip(&columns) {
            column.assign(&ArrayView1::from(spectrum.as_slice()));
        }

        tracing::debug!(
            "spectrogram: {} samples -> {num_bins} bins x {num_frames} frames",
            audio.len()
        );

        Spectrogram {
            values,
            layout: self.layout,
            scale: ValueScale::Linear,
        }
    }

    /// Compute spectrogram from 2D audio, averaging channels first.
    ///
    /// See [`to_mono`] for how the channel axis is chosen.
    pub fn compute_spectrogram_channels(&self, audio: ArrayView2<'_, f32>) -> Result<Spectrogram> {
        let mono = to_mono(audio)?;
        Ok(self.compute_spectrogram(&mono))
    }

    /// Linear mel spectrogram of a mono signal.
    pub fn mel_spectrogram(&self, audio: &[f32]) -> Result<MelSpectrogram> {
        self.filterbank.project(&self.compute_spectrogram(audio))
    }

    /// Mel spectrogram in dB: STFT, mel projection, then dB conversion.
    pub fn analyze(&self, audio: &[f32]) -> Result<MelSpectrogram> {
        Ok(self.mel_spectrogram(audio)?.to_db(&self.scaler))
    }

    /// [`analyze`](Self::analyze) for 2D audio, averaging channels first.
    pub fn analyze_channels(&self, audio: ArrayView2<'_, f32>) -> Result<MelSpectrogram> {
        let mono = to_mono(audio)?;
        self.analyze(&mono)
    }

    /// Windowed DFT of one frame, magnitudes raised to `power`.
    fn frame_spectrum(&self, audio: &[f32], frame: usize) -> Vec<f32> {
        let start = frame * self.layout.hop_size;
        let windowed: Vec<f32> = audio[start..start + self.layout.n_fft]
            .iter()
            .zip(&self.window_coeffs)
            .map(|(sample, coeff)| sample * coeff)
            .collect();

        self.fft
            .forward(&windowed)
            .iter()
            .map(|c| self.raise(*c))
            .collect()
    }

    #[inline]
    fn raise(&self, c: Complex<f32>) -> f32 {
        if self.power == 2.0 {
            c.norm_sqr()
        } else if self.power == 1.0 {
            c.norm()
        } else {
            c.norm().powf(self.power)
        }
    }

    /// Get frequency in Hz for a given bin index
    pub fn bin_to_frequency_hz(&self, bin: usize) -> f32 {
        self.layout.bin_to_frequency_hz(bin)
    }

    /// Get time in seconds for a given frame index
    pub fn frame_to_seconds(&self, frame: usize) -> f32 {
        self.layout.frame_to_seconds(frame)
    }

    /// Frame geometry.
    pub fn layout(&self) -> FrameLayout {
        self.layout
    }

    /// Get FFT size
    pub fn n_fft(&self) -> usize {
        self.layout.n_fft
    }

    /// Get hop size
    pub fn hop_size(&self) -> usize {
        self.layout.hop_size
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.layout.sample_rate
    }

    /// Magnitude exponent.
    pub fn power(&self) -> f32 {
        self.power
    }

    /// Get the window function used
    pub fn window(&self) -> Window {
        self.window
    }

    /// The cached mel filterbank.
    pub fn filterbank(&self) -> &MelFilterbank {
        &self.filterbank
    }

    /// The dB scaler used by [`analyze`](Self::analyze).
    pub fn scaler(&self) -> &DecibelScaler {
        &self.scaler
    }
}
