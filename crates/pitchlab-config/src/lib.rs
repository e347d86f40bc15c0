//! Session configuration for pitchlab.
//!
//! A single TOML file sets the sample rate, the spectrogram engine, the
//! Shepard generator, and WAV output options. Every field has a default,
//! so an empty file (or no file at all) reproduces the stock settings:
//! 16 kHz, `n_fft` 1024, hop 512, 128 mels, power 2.0, 0.3 s Shepard steps
//! over 3 cycles, and normalized 16-bit output.
//!
//! # Example
//!
//! ```rust,no_run
//! use pitchlab_config::{Config, paths};
//!
//! let mut config = Config::load_or_default(None).unwrap();
//! config.analysis.num_mels = 64;
//! config.validate().unwrap();
//!
//! let engine = config.spectrogram_engine().unwrap();
//! config.save(paths::default_config_path()).unwrap();
//! ```

mod config;
mod error;

/// Platform-specific configuration paths.
pub mod paths;

/// Configuration value validation.
pub mod validation;

pub use config::{AnalysisConfig, Config, OutputConfig, ShepardConfig};
pub use error::ConfigError;
pub use paths::{default_config_path, user_config_dir};
pub use validation::{
    ValidationError, ValidationResult, direction_name, parse_direction, parse_window,
};
