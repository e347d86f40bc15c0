//! Shepard tone sequences.
//!
//! A Shepard tone plays the same pitch class in several octaves at once and
//! crossfades the outer octaves as the pitch moves. Stepping through all 24
//! semitones of a two-octave cycle and looping gives the illusion of a pitch
//! that rises (or falls) forever without ever jumping back down.
//!
//! # Tables
//!
//! The generator is driven by two fixed 24×3 tables, one row per step and
//! one column per partial:
//!
//! | column | pitch | gain |
//! |--------|-------|------|
//! | 0 (low) | `24 + i` | `gain[23 − i][2]` (fades in) |
//! | 1 (mid) | `48 + i` | `1.0` |
//! | 2 (high) | `72 + i` | `exp(−0.388 · i)` (fades out) |
//!
//! The low column mirrors the high one, so as the top partial fades away the
//! bottom partial (two octaves down, same pitch class) fades in by the same
//! curve. Gains follow an exponential so perceived loudness moves evenly.
//!
//! # Example
//!
//! ```rust
//! use pitchlab_synth::ShepardToneGenerator;
//!
//! let generator = ShepardToneGenerator::new(16000, 0.3, 1).unwrap();
//! let audio = generator.generate().unwrap();
//! assert_eq!(audio.len(), 24 * 4800);
//! ```

use crate::tone::{concatenate, mix_partials};
use pitchlab_core::{Error, Result, Waveform, sample_count};

/// Steps in one Shepard cycle (two octaves of semitones).
pub const STEPS: usize = 24;

/// Simultaneous octave-spaced partials per step.
pub const PARTIALS: usize = 3;

/// MIDI pitch of the lowest partial at step 0 (C1).
pub const BASE_PITCH: f32 = 24.0;

/// Semitones between adjacent partials.
pub const PARTIAL_SPACING: f32 = 24.0;

/// Exponential decay rate of the upper partial per step.
pub const UPPER_DECAY: f32 = 0.388;

/// Fraction of each step covered by the fade-out taper.
pub const FADEOUT_FRACTION: f64 = 0.1;

/// Decades of attenuation across the fade-out taper (−60 dB).
const FADE_DECADES: f32 = 3.0;

/// MIDI pitches, `[step][partial]`.
pub type PitchTable = [[f32; PARTIALS]; STEPS];

/// Linear gains, `[step][partial]`.
pub type AmplitudeTable = [[f32; PARTIALS]; STEPS];

/// Order in which the steps of a cycle are played.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    /// Step 0 to 23; the pitch appears to rise.
    #[default]
    Ascending,
    /// Step 23 to 0; the pitch appears to fall.
    Descending,
}

/// Build the 24×3 pitch table: `pitch[i][j] = 24 + i + 24·j`.
pub fn pitch_table() -> PitchTable {
    let mut table = [[0.0; PARTIALS]; STEPS];
    for (i, row) in table.iter_mut().enumerate() {
        for (j, pitch) in row.iter_mut().enumerate() {
            *pitch = BASE_PITCH + i as f32 + PARTIAL_SPACING * j as f32;
        }
    }
    table
}

/// Build the 24×3 gain table.
///
/// Middle partial at 1.0, upper partial `exp(−0.388·i)`, lower partial the
/// reversed upper column.
pub fn amplitude_table() -> AmplitudeTable {
    let mut table = [[0.0; PARTIALS]; STEPS];
    for (i, row) in table.iter_mut().enumerate() {
        row[1] = 1.0;
        row[2] = (-UPPER_DECAY * i as f32).exp();
    }
    for i in 0..STEPS {
        table[i][0] = table[STEPS - 1 - i][2];
    }
    table
}

/// Logarithmic taper from 1.0 down to 10^−3 over `len` samples.
///
/// Sample `k` is `10^(−3·k/(len−1))`; a single-sample taper is `[1.0]`.
pub fn fade_out_taper(len: usize) -> Vec<f32> {
    match len {
        0 => Vec::new(),
        1 => vec![1.0],
        _ => {
            let last = (len - 1) as f32;
            (0..len)
                .map(|k| 10.0f32.powf(-FADE_DECADES * k as f32 / last))
                .collect()
        }
    }
}

/// Renders looping Shepard tone sequences.
///
/// Both tables are computed once at construction and only read afterwards.
#[derive(Debug, Clone)]
pub struct ShepardToneGenerator {
    sample_rate: u32,
    step_duration: f32,
    iterations: usize,
    fadeout_fraction: f64,
    direction: Direction,
    pitches: PitchTable,
    amplitudes: AmplitudeTable,
}

impl ShepardToneGenerator {
    /// Create a generator.
    ///
    /// # Arguments
    /// * `sample_rate` - Sample rate in Hz
    /// * `step_duration` - Seconds per semitone step
    /// * `iterations` - How many times the 24-step cycle repeats (0 renders nothing)
    ///
    /// # Errors
    ///
    /// [`Error::DegenerateInput`] when the sample rate is zero or a step would
    /// contain no samples.
    pub fn new(sample_rate: u32, step_duration: f32, iterations: usize) -> Result<Self> {
        if sample_count(step_duration, sample_rate)? == 0 {
            return Err(Error::degenerate(format!(
                "step duration {step_duration}s is shorter than one sample at {sample_rate} Hz"
            )));
        }

        Ok(Self {
            sample_rate,
            step_duration,
            iterations,
            fadeout_fraction: FADEOUT_FRACTION,
            direction: Direction::Ascending,
            pitches: pitch_table(),
            amplitudes: amplitude_table(),
        })
    }

    /// Play the cycle in the given direction.
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Seconds per step.
    pub fn step_duration(&self) -> f32 {
        self.step_duration
    }

    /// Number of cycle repetitions.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Playback direction.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// The pitch table in use.
    pub fn pitches(&self) -> &PitchTable {
        &self.pitches
    }

    /// The gain table in use.
    pub fn amplitudes(&self) -> &AmplitudeTable {
        &self.amplitudes
    }

    /// Samples per step.
    pub fn step_samples(&self) -> usize {
        (f64::from(self.step_duration) * f64::from(self.sample_rate)).round() as usize
    }

    /// Samples covered by the fade-out at the end of each step.
    ///
    /// `floor(step_duration · fadeout_fraction · sample_rate)`, multiplied in
    /// that order in f64, which never exceeds [`Self::step_samples`] for the
    /// fixed 10% fraction.
    pub fn fadeout_samples(&self) -> usize {
        (f64::from(self.step_duration) * self.fadeout_fraction * f64::from(self.sample_rate))
            .floor() as usize
    }

    /// Render one step of the cycle with its fade-out applied.
    ///
    /// # Errors
    ///
    /// [`Error::DegenerateInput`] if `step` is not below [`STEPS`].
    pub fn render_step(&self, step: usize) -> Result<Waveform> {
        if step >= STEPS {
            return Err(Error::degenerate(format!(
                "step {step} is outside the {STEPS}-step cycle"
            )));
        }

        let mix = mix_partials(
            &self.pitches[step],
            &self.amplitudes[step],
            self.step_duration,
            self.sample_rate,
        )?;

        let mut samples = mix.into_samples();
        let fade_len = self.fadeout_samples();
        let fade_start = samples.len() - fade_len;
        for (sample, gain) in samples[fade_start..]
            .iter_mut()
            .zip(fade_out_taper(fade_len))
        {
            *sample *= gain;
        }

        Waveform::new(samples, self.sample_rate)
    }

    /// Render the full sequence: `iterations` cycles of 24 faded steps.
    pub fn generate(&self) -> Result<Waveform> {
        if self.iterations == 0 {
            return Waveform::new(Vec::new(), self.sample_rate);
        }

        let order: Vec<usize> = match self.direction {
            Direction::Ascending => (0..STEPS).collect(),
            Direction::Descending => (0..STEPS).rev().collect(),
        };
        let cycle = order
            .into_iter()
            .map(|step| self.render_step(step))
            .collect::<Result<Vec<_>>>()?;

        // every repetition of a step is sample-identical, so render once and repeat
        let sequence = concatenate(
            std::iter::repeat_n(&cycle, self.iterations).flat_map(|steps| steps.iter()),
        )?;

        tracing::debug!(
            sample_rate = self.sample_rate,
            step_duration = self.step_duration,
            iterations = self.iterations,
            direction = ?self.direction,
            samples = sequence.len(),
            "rendered shepard sequence"
        );

        Ok(sequence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pitch_table_layout() {
        let table = pitch_table();
        assert_eq!(table[0], [24.0, 48.0, 72.0]);
        assert_eq!(table[23], [47.0, 71.0, 95.0]);
        for row in &table {
            assert_eq!(row[1] - row[0], 24.0);
            assert_eq!(row[2] - row[1], 24.0);
        }
    }

    #[test]
    fn amplitude_table_mirror_and_anchor() {
        let table = amplitude_table();
        for i in 0..STEPS {
            assert_eq!(table[i][0], table[23 - i][2]);
            assert_eq!(table[i][1], 1.0);
        }
    }

    #[test]
    fn amplitude_table_upper_decays() {
        let table = amplitude_table();
        assert_eq!(table[0][2], 1.0);
        assert!(table.windows(2).all(|w| w[1][2] < w[0][2]));
        // nearly inaudible by the last step
        assert!(table[23][2] < 2e-4);
        assert!(table.iter().flatten().all(|&g| g > 0.0 && g <= 1.0));
    }

    #[test]
    fn taper_endpoints() {
        let taper = fade_out_taper(480);
        assert_eq!(taper.len(), 480);
        assert_eq!(taper[0], 1.0);
        assert!((taper[479] - 1e-3).abs() < 1e-7);
        assert!(taper.windows(2).all(|w| w[1] < w[0]));
        assert_eq!(fade_out_taper(1), vec![1.0]);
        assert!(fade_out_taper(0).is_empty());
    }

    #[test]
    fn fade_window_sizes() {
        let generator = ShepardToneGenerator::new(16000, 0.3, 3).unwrap();
        assert_eq!(generator.step_samples(), 4800);
        assert_eq!(generator.fadeout_samples(), 480);
    }

    #[test]
    fn fade_window_truncates_just_below_whole_sample() {
        // 0.7 · 0.1 · 10000 lands a hair under 700
        let generator = ShepardToneGenerator::new(10000, 0.7, 1).unwrap();
        assert_eq!(generator.step_samples(), 7000);
        assert_eq!(generator.fadeout_samples(), 699);
    }

    #[test]
    fn step_tail_is_attenuated() {
        let generator = ShepardToneGenerator::new(16000, 0.3, 1).unwrap();
        let step = generator.render_step(5).unwrap();
        let tail = &step.samples()[4800 - 10..];
        assert!(tail.iter().all(|s| s.abs() < 0.01));
    }

    #[test]
    fn render_step_out_of_range() {
        let generator = ShepardToneGenerator::new(16000, 0.3, 1).unwrap();
        assert!(matches!(
            generator.render_step(STEPS),
            Err(Error::DegenerateInput(_))
        ));
    }

    #[test]
    fn generate_length() {
        let generator = ShepardToneGenerator::new(16000, 0.3, 3).unwrap();
        let audio = generator.generate().unwrap();
        assert_eq!(audio.len(), 3 * STEPS * 4800);
        assert_eq!(audio.sample_rate(), 16000);
    }

    #[test]
    fn zero_iterations_is_empty() {
        let generator = ShepardToneGenerator::new(16000, 0.3, 0).unwrap();
        assert!(generator.generate().unwrap().is_empty());
    }

    #[test]
    fn descending_reverses_steps() {
        let up = ShepardToneGenerator::new(8000, 0.05, 1).unwrap();
        let down = up.clone().with_direction(Direction::Descending);
        let up_audio = up.generate().unwrap();
        let down_audio = down.generate().unwrap();
        let step = up.step_samples();

        let last_up = &up_audio.samples()[(STEPS - 1) * step..];
        let first_down = &down_audio.samples()[..step];
        assert_eq!(last_up, first_down);
    }

    #[test]
    fn rejects_sub_sample_steps() {
        assert!(ShepardToneGenerator::new(16000, 0.00001, 1).is_err());
        assert!(ShepardToneGenerator::new(16000, -0.3, 1).is_err());
        assert!(ShepardToneGenerator::new(0, 0.3, 1).is_err());
    }
}
