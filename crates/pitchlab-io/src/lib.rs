//! WAV file I/O for pitchlab.
//!
//! - [`read_wav`] / [`write_wav`] for plain sample buffers (multi-channel
//!   files are mixed down to mono on read)
//! - [`read_wav_channels`] for keeping channels apart as a
//!   `[channel, frame]` array
//! - [`read_waveform`] / [`write_waveform`] for [`Waveform`]s, with optional
//!   peak normalization before writing
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pitchlab_io::{read_waveform, write_waveform};
//!
//! let audio = read_waveform("input.wav")?;
//! write_waveform("output.wav", &audio, 16, true)?;
//! ```
//!
//! [`Waveform`]: pitchlab_core::Waveform

mod wav;

pub use wav::{
    SUPPORTED_BIT_DEPTHS, WavFormat, WavInfo, WavSpec, read_wav, read_wav_channels,
    read_wav_info, read_waveform, write_wav, write_waveform,
};

/// Error types for audio I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// The requested sample format is not supported.
    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),

    /// Decoded audio was rejected by pitchlab.
    #[error("Invalid audio: {0}")]
    Audio(#[from] pitchlab_core::Error),
}

/// Convenience result type for audio I/O operations.
pub type Result<T> = std::result::Result<T, Error>;
