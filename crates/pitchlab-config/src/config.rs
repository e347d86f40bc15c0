//! Session configuration file format and operations.

use pitchlab_analysis::{EngineSettings, SpectrogramEngine};
use pitchlab_core::sample_count;
use pitchlab_synth::ShepardToneGenerator;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;
use crate::paths::default_config_path;
use crate::validation::{
    ValidationError, ValidationResult, check_range, parse_direction, parse_window,
};

/// Bit depths a WAV file can be written with.
const BIT_DEPTHS: [u16; 4] = [8, 16, 24, 32];

/// Settings shared by every pitchlab command.
///
/// Every field has a default, so a file only needs the values it changes.
///
/// # TOML Format
///
/// ```toml
/// sample_rate = 16000
///
/// [analysis]
/// n_fft = 1024
/// hop_size = 512
/// num_mels = 128
/// power = 2.0
/// window = "hann"
/// db_floor = 1e-10
/// f_min = 0.0
///
/// [shepard]
/// step_duration = 0.3
/// iterations = 3
/// direction = "ascending"
///
/// [output]
/// bits_per_sample = 16
/// normalize = true
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Sample rate in Hz for synthesis and analysis.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Spectrogram engine settings.
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Shepard tone generator settings.
    #[serde(default)]
    pub shepard: ShepardConfig,

    /// WAV output settings.
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_sample_rate() -> u32 {
    16000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            analysis: AnalysisConfig::default(),
            shepard: ShepardConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

/// `[analysis]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalysisConfig {
    /// DFT length.
    pub n_fft: usize,
    /// Samples between frame starts.
    pub hop_size: usize,
    /// Mel bands.
    pub num_mels: usize,
    /// Exponent applied to DFT magnitudes.
    pub power: f32,
    /// Window name.
    pub window: String,
    /// dB clamp value.
    pub db_floor: f32,
    /// Lowest mel corner frequency in Hz.
    pub f_min: f32,
    /// Highest mel corner frequency in Hz; Nyquist when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub f_max: Option<f32>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            n_fft: 1024,
            hop_size: 512,
            num_mels: 128,
            power: 2.0,
            window: "hann".to_string(),
            db_floor: pitchlab_analysis::DEFAULT_FLOOR,
            f_min: 0.0,
            f_max: None,
        }
    }
}

/// `[shepard]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ShepardConfig {
    /// Seconds per step.
    pub step_duration: f32,
    /// Full 24-step cycles.
    pub iterations: usize,
    /// `ascending` or `descending`.
    pub direction: String,
}

impl Default for ShepardConfig {
    fn default() -> Self {
        Self {
            step_duration: 0.3,
            iterations: 3,
            direction: "ascending".to_string(),
        }
    }
}

/// `[output]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// WAV bit depth; 32 writes IEEE float.
    pub bits_per_sample: u16,
    /// Divide by the peak before writing.
    pub normalize: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            bits_per_sample: 16,
            normalize: true,
        }
    }
}

impl Config {
    /// Load a configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let config: Config = toml::from_str(&content)?;
        tracing::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Load a configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Load `path` if given, else the user config file if it exists, else
    /// the defaults.
    ///
    /// An explicit path that cannot be read is an error; a missing user
    /// config file is not.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::load(path);
        }

        let default_path = default_config_path();
        if default_path.is_file() {
            Self::load(&default_path)
        } else {
            tracing::debug!("no config at {}, using defaults", default_path.display());
            Ok(Self::default())
        }
    }

    /// Save the configuration to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the configuration to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check every field, reporting the first invalid one.
    pub fn validate(&self) -> ValidationResult<()> {
        check_range("sample_rate", f64::from(self.sample_rate), 1.0, 768_000.0)?;
        let nyquist = f64::from(self.sample_rate) / 2.0;

        let analysis = &self.analysis;
        check_range("analysis.n_fft", analysis.n_fft as f64, 1.0, 65536.0)?;
        check_range("analysis.hop_size", analysis.hop_size as f64, 1.0, 1_048_576.0)?;
        check_range("analysis.num_mels", analysis.num_mels as f64, 1.0, 1024.0)?;
        positive_finite("analysis.power", analysis.power)?;
        parse_window(&analysis.window)?;
        positive_finite("analysis.db_floor", analysis.db_floor)?;
        check_range("analysis.f_min", f64::from(analysis.f_min), 0.0, nyquist)?;
        if let Some(f_max) = analysis.f_max {
            check_range("analysis.f_max", f64::from(f_max), 0.0, nyquist)?;
        }
        let f_max = analysis.f_max.map_or(nyquist, f64::from);
        if f64::from(analysis.f_min) >= f_max {
            return Err(ValidationError::InvalidValue {
                field: "analysis.f_min",
                reason: format!("must be below the upper mel frequency ({f_max} Hz)"),
            });
        }

        let shepard = &self.shepard;
        positive_finite("shepard.step_duration", shepard.step_duration)?;
        if !matches!(sample_count(shepard.step_duration, self.sample_rate), Ok(n) if n > 0) {
            return Err(ValidationError::InvalidValue {
                field: "shepard.step_duration",
                reason: format!(
                    "{} s is shorter than one sample at {} Hz",
                    shepard.step_duration, self.sample_rate
                ),
            });
        }
        check_range("shepard.iterations", shepard.iterations as f64, 0.0, 10_000.0)?;
        parse_direction(&shepard.direction)?;

        if !BIT_DEPTHS.contains(&self.output.bits_per_sample) {
            return Err(ValidationError::InvalidValue {
                field: "output.bits_per_sample",
                reason: format!(
                    "{} is not one of {:?}",
                    self.output.bits_per_sample, BIT_DEPTHS
                ),
            });
        }

        Ok(())
    }

    /// Spectrogram engine settings described by the `[analysis]` section.
    pub fn engine_settings(&self) -> Result<EngineSettings, ConfigError> {
        self.validate()?;
        Ok(EngineSettings {
            sample_rate: self.sample_rate,
            n_fft: self.analysis.n_fft,
            hop_size: self.analysis.hop_size,
            num_mels: self.analysis.num_mels,
            power: self.analysis.power,
            window: parse_window(&self.analysis.window)?,
            db_floor: self.analysis.db_floor,
            f_min: self.analysis.f_min,
            f_max: self.analysis.f_max,
        })
    }

    /// Build the spectrogram engine.
    pub fn spectrogram_engine(&self) -> Result<SpectrogramEngine, ConfigError> {
        Ok(SpectrogramEngine::with_settings(self.engine_settings()?)?)
    }

    /// Build the Shepard tone generator.
    pub fn shepard_generator(&self) -> Result<ShepardToneGenerator, ConfigError> {
        self.validate()?;
        let direction = parse_direction(&self.shepard.direction)?;
        Ok(ShepardToneGenerator::new(
            self.sample_rate,
            self.shepard.step_duration,
            self.shepard.iterations,
        )?
        .with_direction(direction))
    }
}

fn positive_finite(field: &'static str, value: f32) -> ValidationResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::InvalidValue {
            field,
            reason: format!("must be positive and finite, got {value}"),
        })
    }
}
