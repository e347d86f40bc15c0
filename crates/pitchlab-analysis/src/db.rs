//! Power to decibel conversion.

use ndarray::{Array, ArrayBase, Data, Dimension};
use pitchlab_core::{Error, Result};

/// Smallest power value fed into the logarithm by default.
///
/// `10·log10(1e-10) = −100 dB`, so silence maps to −100 dB.
pub const DEFAULT_FLOOR: f32 = 1e-10;

/// Unit of the values held in a spectrogram grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueScale {
    /// Linear magnitude raised to the engine's power.
    #[default]
    Linear,
    /// Decibels, `10·log10(value)`.
    Decibel,
}

/// Convert one power value to dB, clamping at `floor`.
#[inline]
pub fn power_to_db(value: f32, floor: f32) -> f32 {
    10.0 * value.max(floor).log10()
}

/// Element-wise `10·log10(max(x, floor))`.
///
/// Zero and negative values never reach the logarithm; they come out as the
/// floor's dB value instead of `-inf` or NaN.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecibelScaler {
    floor: f32,
}

impl Default for DecibelScaler {
    fn default() -> Self {
        Self {
            floor: DEFAULT_FLOOR,
        }
    }
}

impl DecibelScaler {
    /// Create a scaler with a custom floor.
    ///
    /// The floor must be positive and finite.
    pub fn new(floor: f32) -> Result<Self> {
        if !floor.is_finite() || floor <= 0.0 {
            return Err(Error::degenerate(format!(
                "dB floor must be positive and finite, got {floor}"
            )));
        }
        Ok(Self { floor })
    }

    /// The clamp value.
    pub fn floor(&self) -> f32 {
        self.floor
    }

    /// dB value assigned to anything at or below the floor.
    pub fn floor_db(&self) -> f32 {
        power_to_db(self.floor, self.floor)
    }

    /// Convert a single value.
    #[inline]
    pub fn to_db(&self, value: f32) -> f32 {
        power_to_db(value, self.floor)
    }

    /// Convert every element of an array, keeping its shape.
    pub fn scale<S, D>(&self, values: &ArrayBase<S, D>) -> Array<f32, D>
    where
        S: Data<Elem = f32>,
        D: Dimension,
    {
        values.mapv(|v| self.to_db(v))
    }

    /// Convert a slice.
    pub fn scale_slice(&self, values: &[f32]) -> Vec<f32> {
        values.iter().map(|&v| self.to_db(v)).collect()
    }
}
