//! Pitchlab Synth - tone synthesis for pitch-theory experiments
//!
//! # Tones
//!
//! - [`tone::sine`] - a single sinusoid
//! - [`tone::mix_partials`] - MIDI pitches summed into one waveform (chords)
//! - [`tone::concatenate`] / [`tone::pitch_sequence`] - steps played in order
//!
//! ```rust
//! use pitchlab_core::pitch::{equal_tempered_triad, just_intonation_triad};
//! use pitchlab_synth::tone::mix_partials;
//!
//! let tempered = mix_partials(&equal_tempered_triad(60.0), &[1.0; 3], 3.0, 16000).unwrap();
//! let just = mix_partials(&just_intonation_triad(60.0), &[1.0; 3], 3.0, 16000).unwrap();
//! assert_eq!(tempered.len(), just.len());
//! ```
//!
//! # Shepard tones
//!
//! - [`ShepardToneGenerator`] - endlessly rising (or falling) 24-step sequences
//!
//! ```rust
//! use pitchlab_synth::{Direction, ShepardToneGenerator};
//!
//! let generator = ShepardToneGenerator::new(16000, 0.3, 3)
//!     .unwrap()
//!     .with_direction(Direction::Descending);
//! let audio = generator.generate().unwrap();
//! assert_eq!(audio.len(), 3 * 24 * 4800);
//! ```

pub mod shepard;
pub mod tone;

pub use shepard::{
    AmplitudeTable, Direction, PitchTable, ShepardToneGenerator, amplitude_table,
    fade_out_taper, pitch_table,
};
pub use tone::{concatenate, mix_partials, pitch_sequence, sine};

// Re-export the shared types so callers need only one dependency
pub use pitchlab_core::{Error, Result, Waveform};
