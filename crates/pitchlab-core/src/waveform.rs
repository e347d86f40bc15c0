//! Mono sample buffers.

use crate::{Error, Result};

/// Number of samples covering `duration_s` seconds at `sample_rate`.
///
/// Rounds to the nearest sample. A duration of zero yields zero samples.
///
/// # Errors
///
/// [`Error::DegenerateInput`] when the duration is negative or not finite,
/// or the sample rate is zero.
pub fn sample_count(duration_s: f32, sample_rate: u32) -> Result<usize> {
    if !duration_s.is_finite() || duration_s < 0.0 {
        return Err(Error::degenerate(format!(
            "duration must be finite and non-negative, got {duration_s}"
        )));
    }
    if sample_rate == 0 {
        return Err(Error::degenerate("sample rate must be non-zero"));
    }
    Ok((f64::from(duration_s) * f64::from(sample_rate)).round() as usize)
}

/// An ordered sequence of mono samples at a fixed sample rate.
///
/// Samples are not exposed mutably; producers build a new `Vec<f32>` and
/// wrap it. Values are not clamped, so a sum of several unit partials can
/// exceed 1.0 until [`Waveform::normalized`] is applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl Waveform {
    /// Wrap existing samples.
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Result<Self> {
        if sample_rate == 0 {
            return Err(Error::degenerate("sample rate must be non-zero"));
        }
        Ok(Self {
            samples,
            sample_rate,
        })
    }

    /// Build a waveform of `len` samples from a per-index generator.
    pub fn from_fn(len: usize, sample_rate: u32, f: impl FnMut(usize) -> f32) -> Result<Self> {
        Self::new((0..len).map(f).collect(), sample_rate)
    }

    /// Silence lasting `duration_s` seconds.
    pub fn silence(duration_s: f32, sample_rate: u32) -> Result<Self> {
        let len = sample_count(duration_s, sample_rate)?;
        Self::new(vec![0.0; len], sample_rate)
    }

    /// Sample values.
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Consume the waveform, returning its samples.
    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the waveform holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds.
    pub fn duration_secs(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }

    /// Largest absolute sample value (0.0 for an empty waveform).
    pub fn peak(&self) -> f32 {
        self.samples.iter().fold(0.0f32, |acc, s| acc.max(s.abs()))
    }

    /// Scale so the largest absolute sample is 1.0.
    ///
    /// Silent (all-zero) and empty waveforms are returned unchanged.
    pub fn normalized(&self) -> Waveform {
        let peak = self.peak();
        if peak <= f32::EPSILON {
            return self.clone();
        }
        Waveform {
            samples: self.samples.iter().map(|s| s / peak).collect(),
            sample_rate: self.sample_rate,
        }
    }
}

impl AsRef<[f32]> for Waveform {
    fn as_ref(&self) -> &[f32] {
        &self.samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_count_rounds_to_nearest() {
        assert_eq!(sample_count(1.0, 16000).unwrap(), 16000);
        assert_eq!(sample_count(0.3, 16000).unwrap(), 4800);
        // 0.5 sample rounds up
        assert_eq!(sample_count(1.5 / 1000.0, 1000).unwrap(), 2);
        assert_eq!(sample_count(0.0, 44100).unwrap(), 0);
    }

    #[test]
    fn sample_count_rejects_negative_and_nan() {
        assert!(matches!(
            sample_count(-0.1, 16000),
            Err(Error::DegenerateInput(_))
        ));
        assert!(matches!(
            sample_count(f32::NAN, 16000),
            Err(Error::DegenerateInput(_))
        ));
        assert!(matches!(sample_count(1.0, 0), Err(Error::DegenerateInput(_))));
    }

    #[test]
    fn new_rejects_zero_rate() {
        assert!(Waveform::new(vec![0.0; 4], 0).is_err());
    }

    #[test]
    fn silence_has_expected_length() {
        let w = Waveform::silence(0.25, 48000).unwrap();
        assert_eq!(w.len(), 12000);
        assert!(w.samples().iter().all(|&s| s == 0.0));
        assert!((w.duration_secs() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn normalized_scales_peak_to_unity() {
        let w = Waveform::new(vec![0.5, -2.0, 1.0], 8000).unwrap();
        let n = w.normalized();
        assert_eq!(n.samples(), &[0.25, -1.0, 0.5]);
        assert_eq!(n.sample_rate(), 8000);
    }

    #[test]
    fn normalized_leaves_silence_alone() {
        let w = Waveform::new(vec![0.0; 16], 8000).unwrap();
        assert_eq!(w.normalized(), w);
    }

    #[test]
    fn from_fn_indexes_in_order() {
        let w = Waveform::from_fn(4, 100, |i| i as f32).unwrap();
        assert_eq!(w.samples(), &[0.0, 1.0, 2.0, 3.0]);
    }
}
