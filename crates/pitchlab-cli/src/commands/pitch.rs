//! MIDI pitch / frequency conversion tables.

use clap::Args;
use pitchlab_core::{hz_to_midi, midi_to_hz};

#[derive(Args)]
pub struct PitchArgs {
    /// Fundamental whose harmonics are converted to MIDI pitch
    #[arg(long, default_value = "440.0")]
    base: f32,

    /// Number of harmonics to list
    #[arg(long, default_value = "9")]
    harmonics: u32,

    /// First MIDI pitch to convert to Hz
    #[arg(long, default_value = "60")]
    from: i32,

    /// Last MIDI pitch to convert to Hz (inclusive)
    #[arg(long, default_value = "72")]
    to: i32,
}

pub fn run(args: PitchArgs) -> anyhow::Result<()> {
    if !(args.base.is_finite() && args.base > 0.0) {
        anyhow::bail!("base frequency must be positive, got {}", args.base);
    }

    for harmonic in 1..=args.harmonics {
        let freq = args.base * harmonic as f32;
        println!("{} Hz is {:.2} in MIDI Pitch", freq, hz_to_midi(freq));
    }

    println!();

    for pitch in args.from..=args.to {
        println!("{} in MIDI Pitch is {:.2} Hz", pitch, midi_to_hz(pitch as f32));
    }

    Ok(())
}
