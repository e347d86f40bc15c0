//! Configuration value validation.
//!
//! Checks are ordered the way fields appear in the file, and
//! [`Config::validate`](crate::Config::validate) stops at the first failure.

use pitchlab_analysis::Window;
use pitchlab_synth::Direction;
use thiserror::Error;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Numeric value outside its allowed range.
    #[error("'{field}' value {value} out of range [{min}, {max}]")]
    OutOfRange {
        /// Dotted name of the field, e.g. `analysis.n_fft`.
        field: &'static str,
        /// The value that was out of range.
        value: f64,
        /// Minimum allowed value.
        min: f64,
        /// Maximum allowed value.
        max: f64,
    },

    /// Value that is in range but still unusable.
    #[error("invalid value for '{field}': {reason}")]
    InvalidValue {
        /// Dotted name of the field.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// Name that does not match any known option.
    #[error("unknown {kind} '{name}' (expected one of: {expected})")]
    UnknownName {
        /// What was being named (window, direction).
        kind: &'static str,
        /// The name given.
        name: String,
        /// Accepted names, comma separated.
        expected: &'static str,
    },
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Check `min <= value <= max`; NaN always fails.
pub fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> ValidationResult<()> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

/// Parse a window name (`hann`, `periodic-hann`, `hamming`, ...).
pub fn parse_window(name: &str) -> ValidationResult<Window> {
    name.parse().map_err(|_| ValidationError::UnknownName {
        kind: "window",
        name: name.to_string(),
        expected: "rectangular, hann, periodic-hann, hamming, blackman",
    })
}

/// Parse a Shepard direction (`ascending`/`up` or `descending`/`down`).
pub fn parse_direction(name: &str) -> ValidationResult<Direction> {
    match name.to_lowercase().as_str() {
        "ascending" | "up" => Ok(Direction::Ascending),
        "descending" | "down" => Ok(Direction::Descending),
        _ => Err(ValidationError::UnknownName {
            kind: "direction",
            name: name.to_string(),
            expected: "ascending, descending",
        }),
    }
}

/// Canonical name of a direction, accepted by [`parse_direction`].
pub fn direction_name(direction: Direction) -> &'static str {
    match direction {
        Direction::Ascending => "ascending",
        Direction::Descending => "descending",
    }
}
