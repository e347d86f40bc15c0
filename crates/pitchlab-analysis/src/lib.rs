//! Pitchlab Analysis - time-frequency analysis for synthesized audio
//!
//! - [`fft`] - FFT wrapper with windowing functions
//! - [`spectrogram`] - STFT framing, power spectrograms, and the
//!   [`SpectrogramEngine`] that runs the full analysis chain
//! - [`mel`] - HTK mel scale and triangular filterbanks
//! - [`db`] - power to decibel conversion with a floor
//! - [`channels`] - multi-channel to mono reduction
//! - [`export`] - CSV and PGM output
//!
//! ## Example
//!
//! ```rust
//! use pitchlab_analysis::SpectrogramEngine;
//!
//! let audio: Vec<f32> = (0..16000)
//!     .map(|n| (2.0 * std::f32::consts::PI * 440.0 * n as f32 / 16000.0).sin())
//!     .collect();
//!
//! let engine = SpectrogramEngine::new(16000, 1024, 512, 128).unwrap();
//! let spectrogram = engine.compute_spectrogram(&audio);
//! assert_eq!(spectrogram.values().dim(), (513, 30));
//! assert_eq!(spectrogram.peak_bin(0), Some(28));
//!
//! let mel_db = engine.analyze(&audio).unwrap();
//! assert_eq!(mel_db.values().dim(), (128, 30));
//! ```
//!
//! ## Features
//!
//! - `parallel` - compute STFT frames on the rayon thread pool

pub mod channels;
pub mod db;
pub mod export;
pub mod fft;
pub mod mel;
pub mod spectrogram;

pub use channels::to_mono;
pub use db::{DEFAULT_FLOOR, DecibelScaler, ValueScale, power_to_db};
pub use export::{TimeFrequencyGrid, export_csv, export_pgm};
pub use fft::{Fft, UnknownWindow, Window};
pub use mel::{MelFilterbank, MelSpectrogram, hz_to_mel, mel_to_hz};
pub use spectrogram::{EngineSettings, FrameLayout, Spectrogram, SpectrogramEngine};

pub use pitchlab_core::{Error, Result};
