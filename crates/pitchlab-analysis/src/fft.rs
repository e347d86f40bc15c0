//! FFT wrapper with windowing functions

use rustfft::{FftPlanner, num_complex::Complex};
use std::f32::consts::PI;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

/// Window function types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Window {
    /// Rectangular (no windowing)
    Rectangular,
    /// Symmetric Hann window, `0.5·(1 − cos(2πn/(N−1)))`
    ///
    /// Both end points are zero.
    #[default]
    Hann,
    /// Periodic Hann window, `0.5·(1 − cos(2πn/N))`
    ///
    /// The N+1 point symmetric window with its last point removed; the usual
    /// choice in DSP libraries that tile frames for resynthesis.
    PeriodicHann,
    /// Hamming window
    Hamming,
    /// Blackman window
    Blackman,
}

/// Window name not recognised by [`Window::from_str`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown window '{0}' (expected one of: rectangular, hann, periodic-hann, hamming, blackman)")]
pub struct UnknownWindow(pub String);

impl Window {
    /// All supported windows, in display order.
    pub const ALL: [Window; 5] = [
        Window::Rectangular,
        Window::Hann,
        Window::PeriodicHann,
        Window::Hamming,
        Window::Blackman,
    ];

    /// Canonical lowercase name, accepted back by `FromStr`.
    pub fn name(&self) -> &'static str {
        match self {
            Window::Rectangular => "rectangular",
            Window::Hann => "hann",
            Window::PeriodicHann => "periodic-hann",
            Window::Hamming => "hamming",
            Window::Blackman => "blackman",
        }
    }

    /// Apply window to a buffer
    pub fn apply(&self, buffer: &mut [f32]) {
        let n = buffer.len();
        if n < 2 {
            return;
        }
        let symmetric = (n - 1) as f32;

        match self {
            Window::Rectangular => {}
            Window::Hann => {
                for (i, sample) in buffer.iter_mut().enumerate() {
                    let w = 0.5 * (1.0 - (2.0 * PI * i as f32 / symmetric).cos());
                    *sample *= w;
                }
            }
            Window::PeriodicHann => {
                for (i, sample) in buffer.iter_mut().enumerate() {
                    let w = 0.5 * (1.0 - (2.0 * PI * i as f32 / n as f32).cos());
                    *sample *= w;
                }
            }
            Window::Hamming => {
                for (i, sample) in buffer.iter_mut().enumerate() {
                    let w = 0.54 - 0.46 * (2.0 * PI * i as f32 / symmetric).cos();
                    *sample *= w;
                }
            }
            Window::Blackman => {
                for (i, sample) in buffer.iter_mut().enumerate() {
                    let x = 2.0 * PI * i as f32 / symmetric;
                    let w = 0.42 - 0.5 * x.cos() + 0.08 * (2.0 * x).cos();
                    *sample *= w;
                }
            }
        }
    }

    /// Get window coefficients
    pub fn coefficients(&self, size: usize) -> Vec<f32> {
        let mut coeffs = vec![1.0; size];
        self.apply(&mut coeffs);
        coeffs
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Window {
    type Err = UnknownWindow;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rectangular" | "rect" | "none" => Ok(Window::Rectangular),
            "hann" | "hanning" => Ok(Window::Hann),
            "periodic-hann" | "periodic_hann" => Ok(Window::PeriodicHann),
            "hamming" => Ok(Window::Hamming),
            "blackman" => Ok(Window::Blackman),
            _ => Err(UnknownWindow(s.to_string())),
        }
    }
}

/// Forward FFT processor for real input.
///
/// Holds only the shared plan, so one instance can be used from many
/// threads at once.
#[derive(Clone)]
pub struct Fft {
    fft: Arc<dyn rustfft::Fft<f32>>,
    size: usize,
}

impl fmt::Debug for Fft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fft").field("size", &self.size).finish()
    }
}

impl Fft {
    /// Create a new FFT processor for the given size
    pub fn new(size: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(size);
        Self { fft, size }
    }

    /// Get FFT size
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of non-negative frequency bins, `size / 2 + 1`
    pub fn num_bins(&self) -> usize {
        self.size / 2 + 1
    }

    /// Perform forward FFT on real input
    ///
    /// Returns complex spectrum (size/2 + 1 bins for positive frequencies)
    pub fn forward(&self, input: &[f32]) -> Vec<Complex<f32>> {
        let mut buffer: Vec<Complex<f32>> = input
            .iter()
            .map(|&x| Complex::new(x, 0.0))
            .collect();

        // Pad or truncate to FFT size
        buffer.resize(self.size, Complex::new(0.0, 0.0));

        self.fft.process(&mut buffer);

        // DC to Nyquist
        buffer.truncate(self.num_bins());
        buffer
    }
}
