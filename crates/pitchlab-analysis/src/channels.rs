//! Reduction of multi-channel audio to mono.

use ndarray::{ArrayView2, Axis};
use pitchlab_core::{Error, Result};

/// Average a 2D audio array down to one channel.
///
/// The array may be laid out either way round, `[channel, frame]` or
/// `[frame, channel]`: the shorter axis is taken to be the channel axis and
/// averaged away. A single row or column is returned as-is.
///
/// # Errors
///
/// [`Error::InvalidDimension`] when either axis is empty, or when a
/// multi-channel array is square and the channel axis cannot be told apart
/// from the time axis.
pub fn to_mono(audio: ArrayView2<'_, f32>) -> Result<Vec<f32>> {
    let (rows, cols) = audio.dim();

    if rows == 0 || cols == 0 {
        return Err(Error::invalid_dimension(format!(
            "audio array has an empty axis ({rows}x{cols})"
        )));
    }
    if rows == 1 {
        return Ok(audio.row(0).to_vec());
    }
    if cols == 1 {
        return Ok(audio.column(0).to_vec());
    }
    if rows == cols {
        return Err(Error::invalid_dimension(format!(
            "square {rows}x{cols} array: cannot tell channels from frames"
        )));
    }

    let channel_axis = if rows < cols { Axis(0) } else { Axis(1) };
    audio
        .mean_axis(channel_axis)
        .map(|mono| mono.to_vec())
        .ok_or_else(|| Error::invalid_dimension("audio array has an empty channel axis"))
}
