//! Pitch conversions, scales, and triads.
//!
//! Pitches are MIDI note numbers as `f32`; fractional values are cents-accurate
//! detunings (60.5 is a quarter tone above middle C). Frequencies use the
//! A4 = 440 Hz reference.
//!
//! # Equal temperament vs. just intonation
//!
//! An equal-tempered major triad stacks 4 and 7 semitones on the root. The
//! just-intonation triad uses the frequency ratios 5:4 and 3:2 instead, which
//! lands its third about 14 cents flat and its fifth about 2 cents sharp of
//! the tempered pitches:
//!
//! ```rust
//! use pitchlab_core::pitch::{equal_tempered_triad, just_intonation_triad};
//!
//! let tempered = equal_tempered_triad(60.0);
//! let just = just_intonation_triad(60.0);
//! assert!((tempered[1] - just[1] - 0.1369).abs() < 1e-3);
//! ```

/// Reference frequency of A4 in Hz.
pub const A4_HZ: f32 = 440.0;

/// MIDI note number of A4.
pub const A4_MIDI: f32 = 69.0;

/// Semitone offsets of the major scale from its root, octave included.
const MAJOR_SCALE_STEPS: [f32; 8] = [0.0, 2.0, 4.0, 5.0, 7.0, 9.0, 11.0, 12.0];

/// Convert a MIDI pitch to frequency in Hz.
///
/// `hz = 440 · 2^((pitch − 69) / 12)`
#[inline]
pub fn midi_to_hz(pitch: f32) -> f32 {
    A4_HZ * 2.0f32.powf((pitch - A4_MIDI) / 12.0)
}

/// Convert a frequency in Hz to a (fractional) MIDI pitch.
///
/// Inverse of [`midi_to_hz`]; `frequency_hz` must be positive.
#[inline]
pub fn hz_to_midi(frequency_hz: f32) -> f32 {
    (frequency_hz / A4_HZ).log2() * 12.0 + A4_MIDI
}

/// The eight MIDI pitches of the major scale starting at `root`, ending on
/// the octave.
pub fn major_scale(root: f32) -> [f32; 8] {
    MAJOR_SCALE_STEPS.map(|step| root + step)
}

/// Frequencies in Hz of [`major_scale`].
pub fn major_scale_hz(root: f32) -> [f32; 8] {
    major_scale(root).map(midi_to_hz)
}

/// Equal-tempered major triad: root, major third, perfect fifth.
pub fn equal_tempered_triad(root: f32) -> [f32; 3] {
    [root, root + 4.0, root + 7.0]
}

/// Just-intonation major triad as MIDI pitches.
///
/// The third and fifth sit at 5/4 and 3/2 of the root frequency.
pub fn just_intonation_triad(root: f32) -> [f32; 3] {
    let fundamental = midi_to_hz(root);
    [fundamental, fundamental * 5.0 / 4.0, fundamental * 3.0 / 2.0].map(hz_to_midi)
}
