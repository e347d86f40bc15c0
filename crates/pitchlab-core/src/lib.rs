//! Pitchlab Core - shared types for synthesis and analysis
//!
//! This crate holds the pieces every other pitchlab crate agrees on:
//!
//! - [`Waveform`] - mono sample buffer tagged with its sample rate
//! - [`pitch`] - MIDI pitch / Hz conversion, major scales, and triads in
//!   equal temperament and just intonation
//! - [`Error`] - precondition failures shared by the synthesis and analysis crates
//!
//! # Example
//!
//! ```rust
//! use pitchlab_core::pitch::{midi_to_hz, hz_to_midi};
//!
//! assert!((midi_to_hz(69.0) - 440.0).abs() < 1e-3);
//! assert!((hz_to_midi(880.0) - 81.0).abs() < 1e-4);
//! ```

mod error;
pub mod pitch;
mod waveform;

pub use error::{Error, Result};
pub use pitch::{
    A4_HZ, A4_MIDI, equal_tempered_triad, hz_to_midi, just_intonation_triad, major_scale,
    major_scale_hz, midi_to_hz,
};
pub use waveform::{Waveform, sample_count};
