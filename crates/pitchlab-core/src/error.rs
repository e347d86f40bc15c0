//! Error types shared by synthesis and analysis.

use thiserror::Error;

/// Precondition failures raised by pitchlab operations.
///
/// All computation in pitchlab is deterministic, so none of these are
/// transient: retrying with the same input fails the same way.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Pitch and amplitude lists passed to a mix have different lengths.
    #[error("length mismatch: {pitches} pitches but {amplitudes} amplitudes")]
    LengthMismatch {
        /// Number of pitches supplied.
        pitches: usize,
        /// Number of amplitudes supplied.
        amplitudes: usize,
    },

    /// Matrix operands disagree on a shared dimension.
    #[error("shape mismatch: expected {expected} {axis}, found {found}")]
    ShapeMismatch {
        /// Name of the mismatched axis.
        axis: &'static str,
        /// Size required by the left-hand operand.
        expected: usize,
        /// Size found on the right-hand operand.
        found: usize,
    },

    /// Audio input cannot be reduced to a single channel.
    #[error("invalid audio dimension: {0}")]
    InvalidDimension(String),

    /// A size, duration, or rate parameter is zero, negative, or not finite.
    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    /// Waveforms with different sample rates cannot be joined.
    #[error("sample rate mismatch: expected {expected} Hz, found {found} Hz")]
    SampleRateMismatch {
        /// Sample rate of the first waveform.
        expected: u32,
        /// Sample rate of the offending waveform.
        found: u32,
    },
}

impl Error {
    /// Create a degenerate input error.
    pub fn degenerate(reason: impl Into<String>) -> Self {
        Error::DegenerateInput(reason.into())
    }

    /// Create an invalid dimension error.
    pub fn invalid_dimension(reason: impl Into<String>) -> Self {
        Error::InvalidDimension(reason.into())
    }
}

/// Convenience result type for pitchlab operations.
pub type Result<T> = std::result::Result<T, Error>;
