//! Tone, chord, scale, and Shepard synthesis commands.

use super::common::{RenderArgs, save_waveform};
use clap::{Args, Subcommand, ValueEnum};
use pitchlab_config::{Config, direction_name};
use pitchlab_core::{equal_tempered_triad, just_intonation_triad, major_scale, major_scale_hz};
use pitchlab_synth::shepard::STEPS;
use pitchlab_synth::{Direction, mix_partials, pitch_sequence, sine};
use std::path::PathBuf;

/// Tuning systems for the triad command
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum Tuning {
    /// Thirds and fifths four and seven semitones above the root
    #[default]
    Equal,
    /// Thirds and fifths at 5/4 and 3/2 of the root frequency
    Just,
}

/// Shepard sweep directions for CLI
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum CliDirection {
    Ascending,
    Descending,
}

impl From<CliDirection> for Direction {
    fn from(d: CliDirection) -> Self {
        match d {
            CliDirection::Ascending => Direction::Ascending,
            CliDirection::Descending => Direction::Descending,
        }
    }
}

#[derive(Args)]
pub struct GenerateArgs {
    #[command(subcommand)]
    command: GenerateCommand,
}

#[derive(Subcommand)]
enum GenerateCommand {
    /// Generate a sine tone
    Tone {
        /// Output WAV file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Frequency in Hz
        #[arg(long, default_value = "440.0")]
        freq: f32,

        /// Duration in seconds
        #[arg(long, default_value = "1.0")]
        duration: f32,

        /// Amplitude
        #[arg(long, default_value = "0.8")]
        amplitude: f32,

        #[command(flatten)]
        render: RenderArgs,
    },

    /// Sum sine partials at MIDI pitches
    Chord {
        /// Output WAV file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// MIDI pitches (comma-separated, fractional allowed)
        #[arg(long, value_delimiter = ',', default_value = "60,64,67")]
        pitches: Vec<f32>,

        /// Amplitude per pitch (comma-separated, defaults to 1.0 each)
        #[arg(long, value_delimiter = ',')]
        amplitudes: Option<Vec<f32>>,

        /// Duration in seconds
        #[arg(long, default_value = "3.0")]
        duration: f32,

        #[command(flatten)]
        render: RenderArgs,
    },

    /// Generate a major triad in equal temperament or just intonation
    Triad {
        /// Output WAV file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Root MIDI pitch
        #[arg(long, default_value = "60")]
        root: f32,

        /// Tuning system
        #[arg(long, value_enum, default_value = "equal")]
        tuning: Tuning,

        /// Duration in seconds
        #[arg(long, default_value = "3.0")]
        duration: f32,

        #[command(flatten)]
        render: RenderArgs,
    },

    /// Play a major scale, one sine per step
    Scale {
        /// Output WAV file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Root MIDI pitch
        #[arg(long, default_value = "69")]
        root: f32,

        /// Seconds per scale step
        #[arg(long, default_value = "0.5")]
        step: f32,

        #[command(flatten)]
        render: RenderArgs,
    },

    /// Generate a Shepard tone sequence
    Shepard {
        /// Output WAV file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Seconds per step (overrides the config file)
        #[arg(long)]
        step: Option<f32>,

        /// Number of full 24-step cycles (overrides the config file)
        #[arg(long)]
        iterations: Option<usize>,

        /// Sweep direction (overrides the config file)
        #[arg(long, value_enum)]
        direction: Option<CliDirection>,

        #[command(flatten)]
        render: RenderArgs,
    },
}

pub fn run(args: GenerateArgs, config: Config) -> anyhow::Result<()> {
    match args.command {
        GenerateCommand::Tone {
            output,
            freq,
            duration,
            amplitude,
            render,
        } => {
            let config = render.apply(config)?;
            println!("Generating sine tone...");
            println!("  {} Hz for {:.2}s", freq, duration);

            let tone = sine(freq, amplitude, duration, config.sample_rate)?;
            save_waveform(&output, &tone, &config.output)?;
            println!("Wrote {} samples to {}", tone.len(), output.display());
        }

        GenerateCommand::Chord {
            output,
            pitches,
            amplitudes,
            duration,
            render,
        } => {
            let config = render.apply(config)?;
            let amplitudes = amplitudes.unwrap_or_else(|| vec![1.0; pitches.len()]);
            println!("Generating chord...");
            println!("  Pitches: {:?}", pitches);
            println!("  Duration: {:.2}s", duration);

            let chord = mix_partials(&pitches, &amplitudes, duration, config.sample_rate)?;
            save_waveform(&output, &chord, &config.output)?;
            println!("Wrote {} samples to {}", chord.len(), output.display());
        }

        GenerateCommand::Triad {
            output,
            root,
            tuning,
            duration,
            render,
        } => {
            let config = render.apply(config)?;
            let pitches = match tuning {
                Tuning::Equal => equal_tempered_triad(root),
                Tuning::Just => just_intonation_triad(root),
            };
            println!("Generating {:?} triad...", tuning);
            println!(
                "  Pitches: {:.2}, {:.2}, {:.2}",
                pitches[0], pitches[1], pitches[2]
            );

            let triad = mix_partials(&pitches, &[1.0; 3], duration, config.sample_rate)?;
            save_waveform(&output, &triad, &config.output)?;
            println!("Wrote {} samples to {}", triad.len(), output.display());
        }

        GenerateCommand::Scale {
            output,
            root,
            step,
            render,
        } => {
            let config = render.apply(config)?;
            println!("Generating major scale...");
            println!("  Pitches: {:?}", major_scale(root));
            println!("  {:.2}s per step", step);

            let scale = pitch_sequence(&major_scale_hz(root), step, config.sample_rate)?;
            save_waveform(&output, &scale, &config.output)?;
            println!("Wrote {} samples to {}", scale.len(), output.display());
        }

        GenerateCommand::Shepard {
            output,
            step,
            iterations,
            direction,
            render,
        } => {
            let mut config = render.apply(config)?;
            if let Some(step) = step {
                config.shepard.step_duration = step;
            }
            if let Some(iterations) = iterations {
                config.shepard.iterations = iterations;
            }
            if let Some(direction) = direction {
                config.shepard.direction = direction_name(direction.into()).to_string();
            }

            let generator = config.shepard_generator()?;
            println!("Generating Shepard tones...");
            println!(
                "  {} x {} steps of {:.2}s, {}",
                generator.iterations(),
                STEPS,
                generator.step_duration(),
                direction_name(generator.direction())
            );

            let audio = generator.generate()?;
            save_waveform(&output, &audio, &config.output)?;
            println!("Wrote {} samples to {}", audio.len(), output.display());
        }
    }

    Ok(())
}
