//! Mel-scale filterbanks.
//!
//! The filterbank is a `[linear_bin, mel_band]` matrix of triangular filters
//! whose corner frequencies are equally spaced on the HTK mel scale. Filters
//! are not area-normalized: each triangle peaks at 1.0 at its centre
//! frequency. Projection is a single matrix product,
//! `mel[m, t] = Σ_b fb[b, m]·spec[b, t]`.

use crate::db::{DecibelScaler, ValueScale};
use crate::spectrogram::{FrameLayout, Spectrogram};
use ndarray::{Array2, ArrayView1, ArrayView2};
use pitchlab_core::{Error, Result};

/// Convert Hz to mel, `2595·log10(1 + hz/700)`.
pub fn hz_to_mel(hz: f32) -> f32 {
    2595.0 * (1.0 + hz / 700.0).log10()
}

/// Convert mel to Hz, the inverse of [`hz_to_mel`].
pub fn mel_to_hz(mel: f32) -> f32 {
    700.0 * (10.0_f32.powf(mel / 2595.0) - 1.0)
}

fn hz_to_mel_f64(hz: f64) -> f64 {
    2595.0 * (1.0 + hz / 700.0).log10()
}

fn mel_to_hz_f64(mel: f64) -> f64 {
    700.0 * (10.0_f64.powf(mel / 2595.0) - 1.0)
}

/// Evenly spaced points from `start` to `end` inclusive.
fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            (0..count).map(|i| start + step * i as f64).collect()
        }
    }
}

/// Mel filterbank for converting linear spectrogram to mel scale
#[derive(Debug, Clone, PartialEq)]
pub struct MelFilterbank {
    weights: Array2<f32>,
    center_frequencies: Vec<f32>,
    n_fft: usize,
    sample_rate: u32,
    f_min: f32,
    f_max: f32,
}

impl MelFilterbank {
    /// Filterbank spanning 0 Hz to Nyquist.
    pub fn new(n_fft: usize, sample_rate: u32, num_mels: usize) -> Result<Self> {
        Self::with_frequency_range(n_fft, sample_rate, num_mels, 0.0, sample_rate as f32 / 2.0)
    }

    /// Filterbank spanning `[f_min, f_max]`.
    ///
    /// # Arguments
    /// * `n_fft` - DFT length; the bank has `n_fft / 2 + 1` rows
    /// * `sample_rate` - Sample rate in Hz
    /// * `num_mels` - Number of mel bands (columns)
    /// * `f_min` - Lowest corner frequency in Hz
    /// * `f_max` - Highest corner frequency in Hz, at most Nyquist
    pub fn with_frequency_range(
        n_fft: usize,
        sample_rate: u32,
        num_mels: usize,
        f_min: f32,
        f_max: f32,
    ) -> Result<Self> {
        if n_fft == 0 {
            return Err(Error::degenerate("n_fft must be greater than zero"));
        }
        if sample_rate == 0 {
            return Err(Error::degenerate("sample rate must be greater than zero"));
        }
        if num_mels == 0 {
            return Err(Error::degenerate("number of mel bands must be greater than zero"));
        }
        let nyquist = f64::from(sample_rate) / 2.0;
        if !f_min.is_finite() || !f_max.is_finite() || f_min < 0.0 || f_min >= f_max {
            return Err(Error::degenerate(format!(
                "mel frequency range must satisfy 0 <= f_min < f_max, got [{f_min}, {f_max}]"
            )));
        }
        if f64::from(f_max) > nyquist {
            return Err(Error::degenerate(format!(
                "f_max {f_max} Hz is above Nyquist ({nyquist} Hz)"
            )));
        }

        let num_bins = n_fft / 2 + 1;
        let bin_freqs = linspace(0.0, nyquist, num_bins);

        // num_mels + 2 corners: left edge, the centres, right edge
        let corners: Vec<f64> = linspace(
            hz_to_mel_f64(f64::from(f_min)),
            hz_to_mel_f64(f64::from(f_max)),
            num_mels + 2,
        )
        .into_iter()
        .map(mel_to_hz_f64)
        .collect();

        let mut weights = Array2::zeros((num_bins, num_mels));
        for m in 0..num_mels {
            let (left, center, right) = (corners[m], corners[m + 1], corners[m + 2]);
            for (b, &freq) in bin_freqs.iter().enumerate() {
                let rising = (freq - left) / (center - left);
                let falling = (right - freq) / (right - center);
                weights[[b, m]] = rising.min(falling).max(0.0) as f32;
            }
        }

        let empty = weights
            .columns()
            .into_iter()
            .filter(|filter| filter.iter().all(|&w| w == 0.0))
            .count();
        if empty > 0 {
            tracing::debug!(
                "mel filterbank: {empty} of {num_mels} bands fall between FFT bins and are all zero"
            );
        }

        Ok(Self {
            weights,
            center_frequencies: corners[1..=num_mels].iter().map(|&f| f as f32).collect(),
            n_fft,
            sample_rate,
            f_min,
            f_max,
        })
    }

    /// Filter weights as a `[linear_bin, mel_band]` array.
    pub fn weights(&self) -> &Array2<f32> {
        &self.weights
    }

    /// Number of linear frequency bins (rows).
    pub fn num_bins(&self) -> usize {
        self.weights.nrows()
    }

    /// Number of mel bands (columns).
    pub fn num_mels(&self) -> usize {
        self.weights.ncols()
    }

    /// Peak frequency of each band in Hz, strictly increasing.
    pub fn center_frequencies(&self) -> &[f32] {
        &self.center_frequencies
    }

    /// DFT length the bank was built for.
    pub fn n_fft(&self) -> usize {
        self.n_fft
    }

    /// Sample rate the bank was built for.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Covered frequency range in Hz.
    pub fn frequency_range(&self) -> (f32, f32) {
        (self.f_min, self.f_max)
    }

    /// One band's weights over the linear bins.
    pub fn filter(&self, band: usize) -> Option<ArrayView1<'_, f32>> {
        (band < self.num_mels()).then(|| self.weights.column(band))
    }

    /// Project a spectrogram onto the mel bands.
    pub fn project(&self, spectrogram: &Spectrogram) -> Result<MelSpectrogram> {
        let values = project(spectrogram.values().view(), self)?;
        Ok(MelSpectrogram {
            values,
            layout: spectrogram.layout(),
            band_frequencies: self.center_frequencies.clone(),
            scale: spectrogram.scale(),
        })
    }
}

/// Multiply a `[bin, frame]` grid by the transposed filterbank.
///
/// Fails with [`Error::ShapeMismatch`] when the grid's row count differs
/// from the filterbank's linear bin count.
pub fn project(values: ArrayView2<'_, f32>, filterbank: &MelFilterbank) -> Result<Array2<f32>> {
    if values.nrows() != filterbank.num_bins() {
        return Err(Error::ShapeMismatch {
            axis: "frequency bins",
            expected: filterbank.num_bins(),
            found: values.nrows(),
        });
    }
    Ok(filterbank.weights.t().dot(&values))
}

/// Mel-scaled spectrogram, `[mel_band, time_frame]`.
#[derive(Debug, Clone, PartialEq)]
pub struct MelSpectrogram {
    values: Array2<f32>,
    layout: FrameLayout,
    band_frequencies: Vec<f32>,
    scale: ValueScale,
}

impl MelSpectrogram {
    /// Values as a `[band, frame]` array.
    pub fn values(&self) -> &Array2<f32> {
        &self.values
    }

    /// Take the underlying array.
    pub fn into_values(self) -> Array2<f32> {
        self.values
    }

    /// Number of mel bands (rows).
    pub fn num_mels(&self) -> usize {
        self.values.nrows()
    }

    /// Number of time frames (columns).
    pub fn num_frames(&self) -> usize {
        self.values.ncols()
    }

    /// Frame geometry of the source spectrogram.
    pub fn layout(&self) -> FrameLayout {
        self.layout
    }

    /// Whether values are linear or dB.
    pub fn scale(&self) -> ValueScale {
        self.scale
    }

    /// Centre frequency of each band in Hz.
    pub fn band_frequencies(&self) -> &[f32] {
        &self.band_frequencies
    }

    /// Value at a band and frame, `None` if out of bounds.
    pub fn get(&self, band: usize, frame: usize) -> Option<f32> {
        self.values.get((band, frame)).copied()
    }

    /// Start time of `frame` in seconds.
    pub fn frame_to_seconds(&self, frame: usize) -> f32 {
        self.layout.frame_to_seconds(frame)
    }

    /// Convert to dB. Values already in dB are returned unchanged.
    pub fn to_db(&self, scaler: &DecibelScaler) -> MelSpectrogram {
        match self.scale {
            ValueScale::Decibel => self.clone(),
            ValueScale::Linear => MelSpectrogram {
                values: scaler.scale(&self.values),
                layout: self.layout,
                band_frequencies: self.band_frequencies.clone(),
                scale: ValueScale::Decibel,
            },
        }
    }
}
