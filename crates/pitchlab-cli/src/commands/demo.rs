//! Render the full example set: chords, a scale, Shepard tones, and the mel
//! spectrogram of each.

use super::common::{RenderArgs, export_grid, save_waveform};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use pitchlab_config::Config;
use pitchlab_core::{Waveform, equal_tempered_triad, just_intonation_triad, major_scale_hz};
use pitchlab_synth::{mix_partials, pitch_sequence};
use std::path::PathBuf;

const CHORD: [f32; 3] = [60.0, 64.0, 67.0];
const CHORD_SECS: f32 = 3.0;
const SCALE_ROOT: f32 = 69.0;
const SCALE_STEP_SECS: f32 = 0.5;
const TRIAD_ROOT: f32 = 60.0;

#[derive(Args)]
pub struct DemoArgs {
    /// Output directory (created if missing)
    #[arg(value_name = "DIR")]
    dir: PathBuf,

    /// Skip the mel spectrogram CSV exports
    #[arg(long)]
    no_spectrograms: bool,

    #[command(flatten)]
    render: RenderArgs,
}

/// File stems of the rendered sounds, in render order.
const SOUNDS: [&str; 5] = [
    "chord_tone",
    "scale_sine",
    "just_chord_tone",
    "equal_chord_tone",
    "shepard",
];

fn render(name: &str, config: &Config) -> anyhow::Result<Waveform> {
    let sr = config.sample_rate;
    let audio = match name {
        "chord_tone" => mix_partials(&CHORD, &[1.0; 3], CHORD_SECS, sr)?,
        "scale_sine" => pitch_sequence(&major_scale_hz(SCALE_ROOT), SCALE_STEP_SECS, sr)?,
        "just_chord_tone" => {
            mix_partials(&just_intonation_triad(TRIAD_ROOT), &[1.0; 3], CHORD_SECS, sr)?
        }
        "equal_chord_tone" => {
            mix_partials(&equal_tempered_triad(TRIAD_ROOT), &[1.0; 3], CHORD_SECS, sr)?
        }
        "shepard" => config.shepard_generator()?.generate()?,
        other => anyhow::bail!("no demo sound named '{other}'"),
    };
    Ok(audio)
}

pub fn run(args: DemoArgs, config: Config) -> anyhow::Result<()> {
    let config = args.render.apply(config)?;
    std::fs::create_dir_all(&args.dir)?;
    println!("Rendering demo set to {}...", args.dir.display());

    let engine = if args.no_spectrograms {
        None
    } else {
        Some(config.spectrogram_engine()?)
    };

    let pb = ProgressBar::new(SOUNDS.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("##-"),
    );

    for name in SOUNDS {
        pb.set_message(name);
        let audio = render(name, &config)?;
        let wav_path = args.dir.join(format!("{name}.wav"));
        save_waveform(&wav_path, &audio, &config.output)?;

        if let Some(engine) = &engine {
            let mel_db = engine.analyze(audio.samples())?;
            let csv_path = args.dir.join(format!("{name}_mel_db.csv"));
            export_grid(&mel_db, Some(&csv_path), None, 0.0)?;
        }

        tracing::debug!("rendered {name}: {} samples", audio.len());
        pb.inc(1);
    }

    pb.finish_with_message("done");
    println!("Wrote {} sounds to {}", SOUNDS.len(), args.dir.display());

    Ok(())
}
