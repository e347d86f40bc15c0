//! Sinusoidal tone synthesis.
//!
//! Everything here is stateless: each call renders a fresh [`Waveform`]
//! starting at phase zero. Partials are summed without normalization, so a
//! chord of three unit-amplitude partials can reach ±3.0. Scale with
//! [`Waveform::normalized`] before writing to a fixed-point file.

use pitchlab_core::{Error, Result, Waveform, midi_to_hz, sample_count};
use std::borrow::Borrow;
use std::f64::consts::PI;

fn ensure_finite(name: &str, value: f32) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(Error::degenerate(format!("{name} must be finite, got {value}")))
    }
}

/// Render `amplitude · sin(2π · frequency_hz · t)` for `duration_s` seconds.
///
/// `t` starts at 0 and advances by `1 / sample_rate`. The phase is computed in
/// double precision so long tones do not drift.
///
/// # Example
///
/// ```rust
/// use pitchlab_synth::tone::sine;
///
/// let tone = sine(440.0, 0.5, 1.0, 16000).unwrap();
/// assert_eq!(tone.len(), 16000);
/// assert_eq!(tone.samples()[0], 0.0);
/// ```
pub fn sine(frequency_hz: f32, amplitude: f32, duration_s: f32, sample_rate: u32) -> Result<Waveform> {
    ensure_finite("frequency", frequency_hz)?;
    ensure_finite("amplitude", amplitude)?;
    let len = sample_count(duration_s, sample_rate)?;

    let omega = 2.0 * PI * f64::from(frequency_hz) / f64::from(sample_rate);
    Waveform::from_fn(len, sample_rate, |n| {
        amplitude * (omega * n as f64).sin() as f32
    })
}

/// Sum one sine partial per MIDI pitch into a single waveform.
///
/// Each pitch is converted with [`midi_to_hz`] and rendered at the matching
/// entry of `amplitudes`. An empty pitch list renders silence.
///
/// # Errors
///
/// [`Error::LengthMismatch`] when the two slices differ in length, plus the
/// conditions of [`sine`].
pub fn mix_partials(
    pitches: &[f32],
    amplitudes: &[f32],
    duration_s: f32,
    sample_rate: u32,
) -> Result<Waveform> {
    if pitches.len() != amplitudes.len() {
        return Err(Error::LengthMismatch {
            pitches: pitches.len(),
            amplitudes: amplitudes.len(),
        });
    }

    let len = sample_count(duration_s, sample_rate)?;
    let mut mix = vec![0.0f32; len];

    for (&pitch, &amplitude) in pitches.iter().zip(amplitudes) {
        let partial = sine(midi_to_hz(pitch), amplitude, duration_s, sample_rate)?;
        for (acc, &sample) in mix.iter_mut().zip(partial.samples()) {
            *acc += sample;
        }
    }

    Waveform::new(mix, sample_rate)
}

/// Append waveforms end to end, in order, with no crossfade.
///
/// # Errors
///
/// [`Error::DegenerateInput`] for an empty sequence and
/// [`Error::SampleRateMismatch`] when the parts disagree on sample rate.
pub fn concatenate<I>(parts: I) -> Result<Waveform>
where
    I: IntoIterator,
    I::Item: Borrow<Waveform>,
{
    let mut parts = parts.into_iter();
    let first = parts
        .next()
        .ok_or_else(|| Error::degenerate("nothing to concatenate"))?;
    let first = first.borrow();
    let sample_rate = first.sample_rate();

    let mut samples = first.samples().to_vec();
    for part in parts {
        let part = part.borrow();
        if part.sample_rate() != sample_rate {
            return Err(Error::SampleRateMismatch {
                expected: sample_rate,
                found: part.sample_rate(),
            });
        }
        samples.extend_from_slice(part.samples());
    }

    Waveform::new(samples, sample_rate)
}

/// Play each frequency as a unit-amplitude sine for `step_duration_s`, one
/// after another, behind one step of leading silence.
///
/// An empty list renders just the silent lead-in.
pub fn pitch_sequence(
    frequencies_hz: &[f32],
    step_duration_s: f32,
    sample_rate: u32,
) -> Result<Waveform> {
    let mut steps = Vec::with_capacity(frequencies_hz.len() + 1);
    steps.push(Waveform::silence(step_duration_s, sample_rate)?);
    for &freq in frequencies_hz {
        steps.push(sine(freq, 1.0, step_duration_s, sample_rate)?);
    }

    concatenate(&steps)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: u32 = 16000;

    #[test]
    fn sine_length_and_start() {
        let w = sine(440.0, 1.0, 0.5, SR).unwrap();
        assert_eq!(w.len(), 8000);
        assert_eq!(w.sample_rate(), SR);
        assert_eq!(w.samples()[0], 0.0);
    }

    #[test]
    fn sine_quarter_period_hits_amplitude() {
        // 1 kHz at 16 kHz: quarter period is 4 samples
        let w = sine(1000.0, 0.7, 0.01, SR).unwrap();
        assert!((w.samples()[4] - 0.7).abs() < 1e-6);
        assert!((w.samples()[12] + 0.7).abs() < 1e-6);
    }

    #[test]
    fn zero_duration_is_empty() {
        let w = sine(440.0, 1.0, 0.0, SR).unwrap();
        assert!(w.is_empty());
    }

    #[test]
    fn sine_rejects_bad_parameters() {
        assert!(matches!(
            sine(f32::INFINITY, 1.0, 1.0, SR),
            Err(Error::DegenerateInput(_))
        ));
        assert!(matches!(
            sine(440.0, f32::NAN, 1.0, SR),
            Err(Error::DegenerateInput(_))
        ));
        assert!(matches!(
            sine(440.0, 1.0, -1.0, SR),
            Err(Error::DegenerateInput(_))
        ));
    }

    #[test]
    fn single_partial_matches_sine_exactly() {
        let mixed = mix_partials(&[60.0], &[0.8], 0.25, SR).unwrap();
        let direct = sine(midi_to_hz(60.0), 0.8, 0.25, SR).unwrap();
        assert_eq!(mixed, direct);
    }

    #[test]
    fn mix_rejects_length_mismatch() {
        let err = mix_partials(&[60.0, 64.0, 67.0], &[1.0, 1.0], 1.0, SR).unwrap_err();
        assert_eq!(
            err,
            Error::LengthMismatch {
                pitches: 3,
                amplitudes: 2
            }
        );
    }

    #[test]
    fn mix_of_nothing_is_silence() {
        let w = mix_partials(&[], &[], 0.1, SR).unwrap();
        assert_eq!(w.len(), 1600);
        assert!(w.samples().iter().all(|&s| s == 0.0));
    }

    #[test]
    fn concatenate_preserves_order() {
        let a = Waveform::new(vec![1.0, 2.0], SR).unwrap();
        let b = Waveform::new(vec![3.0], SR).unwrap();
        let joined = concatenate([&a, &b]).unwrap();
        assert_eq!(joined.samples(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn concatenate_rejects_mixed_rates() {
        let a = Waveform::new(vec![0.0], 16000).unwrap();
        let b = Waveform::new(vec![0.0], 44100).unwrap();
        assert_eq!(
            concatenate([a, b]).unwrap_err(),
            Error::SampleRateMismatch {
                expected: 16000,
                found: 44100
            }
        );
    }

    #[test]
    fn concatenate_empty_is_degenerate() {
        let parts: Vec<Waveform> = Vec::new();
        assert!(matches!(
            concatenate(parts),
            Err(Error::DegenerateInput(_))
        ));
    }

    #[test]
    fn pitch_sequence_lays_steps_end_to_end() {
        let w = pitch_sequence(&[440.0, 660.0, 880.0], 0.5, SR).unwrap();
        assert_eq!(w.len(), 4 * 8000);
        // one silent step leads in
        assert!(w.samples()[..8000].iter().all(|&s| s == 0.0));
        // each step restarts at phase zero
        assert_eq!(w.samples()[8000], 0.0);
        assert_eq!(w.samples()[16000], 0.0);
        assert!(w.samples()[8000..].iter().any(|&s| s != 0.0));
    }

    #[test]
    fn pitch_sequence_of_nothing_is_the_lead_in() {
        let w = pitch_sequence(&[], 0.25, SR).unwrap();
        assert_eq!(w.len(), 4000);
        assert!(w.samples().iter().all(|&s| s == 0.0));
    }
}
