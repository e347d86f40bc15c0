//! Property-based tests for pitchlab-core conversions and waveform helpers.

use pitchlab_core::{Waveform, hz_to_midi, midi_to_hz, sample_count};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Hz -> MIDI -> Hz returns the original frequency within float tolerance.
    #[test]
    fn hz_midi_roundtrip(freq in 1.0f32..20000.0f32) {
        let back = midi_to_hz(hz_to_midi(freq));
        prop_assert!(
            (back - freq).abs() / freq < 1e-4,
            "{} Hz came back as {} Hz", freq, back
        );
    }

    /// Raising a pitch by 12 semitones doubles its frequency.
    #[test]
    fn octave_doubles_frequency(pitch in 0.0f32..115.0f32) {
        let ratio = midi_to_hz(pitch + 12.0) / midi_to_hz(pitch);
        prop_assert!((ratio - 2.0).abs() < 1e-4, "ratio {}", ratio);
    }

    /// Sample counts follow round(duration * rate).
    #[test]
    fn sample_count_matches_rounding(duration in 0.0f32..10.0f32, rate in 1u32..96000u32) {
        let n = sample_count(duration, rate).unwrap();
        let expected = (f64::from(duration) * f64::from(rate)).round() as usize;
        prop_assert_eq!(n, expected);
    }

    /// Normalization never produces a sample louder than 1.0.
    #[test]
    fn normalized_peak_is_unity(samples in prop::collection::vec(-4.0f32..4.0f32, 1..256)) {
        let w = Waveform::new(samples, 16000).unwrap();
        let n = w.normalized();
        prop_assert!(n.peak() <= 1.0 + 1e-6);
        if w.peak() > f32::EPSILON {
            prop_assert!((n.peak() - 1.0).abs() < 1e-6);
        }
    }
}
