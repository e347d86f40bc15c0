//! Spectrogram analysis command.

use super::common::export_grid;
use clap::Args;
use pitchlab_analysis::{MelSpectrogram, Spectrogram};
use pitchlab_config::Config;
use pitchlab_io::read_wav;
use std::path::PathBuf;

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Write the spectrogram (dB) as CSV
    #[arg(long, value_name = "PATH")]
    csv: Option<PathBuf>,

    /// Write the spectrogram (dB) as a PGM image
    #[arg(long, value_name = "PATH")]
    pgm: Option<PathBuf>,

    /// Export the linear-frequency spectrogram instead of mel bands
    #[arg(long)]
    linear: bool,

    /// Print a JSON summary instead of text
    #[arg(long)]
    json: bool,

    /// FFT size (overrides the config file)
    #[arg(long)]
    n_fft: Option<usize>,

    /// Hop size in samples (overrides the config file)
    #[arg(long)]
    hop: Option<usize>,

    /// Number of mel bands (overrides the config file)
    #[arg(long)]
    mels: Option<usize>,

    /// Window function (overrides the config file)
    #[arg(long)]
    window: Option<String>,

    /// Magnitude exponent, 2.0 for power (overrides the config file)
    #[arg(long)]
    power: Option<f32>,

    /// Dynamic range of the PGM image in dB
    #[arg(long, default_value = "80.0")]
    db_range: f32,
}

impl AnalyzeArgs {
    fn apply(&self, config: &mut Config) {
        if let Some(n_fft) = self.n_fft {
            config.analysis.n_fft = n_fft;
        }
        if let Some(hop) = self.hop {
            config.analysis.hop_size = hop;
        }
        if let Some(mels) = self.mels {
            config.analysis.num_mels = mels;
        }
        if let Some(window) = &self.window {
            config.analysis.window = window.clone();
        }
        if let Some(power) = self.power {
            config.analysis.power = power;
        }
    }
}

/// Frame with the most energy, if any.
fn loudest_frame(spectrogram: &Spectrogram) -> Option<usize> {
    spectrogram
        .values()
        .columns()
        .into_iter()
        .map(|frame| frame.sum())
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(frame, _)| frame)
}

/// Lowest and highest value in a mel spectrogram.
fn value_range(mel: &MelSpectrogram) -> Option<(f32, f32)> {
    mel.values().iter().fold(None, |range, &v| match range {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

pub fn run(args: AnalyzeArgs, mut config: Config) -> anyhow::Result<()> {
    // mixed down by the file's own interleaving, so short or empty files need no shape guess
    let (mono, spec) = read_wav(&args.input)?;

    // the file's own rate always wins over the configured one
    config.sample_rate = spec.sample_rate;
    args.apply(&mut config);
    let engine = config.spectrogram_engine()?;

    let spectrogram = engine.compute_spectrogram(&mono);
    let mel_db = engine
        .filterbank()
        .project(&spectrogram)?
        .to_db(engine.scaler());

    let frames = mono.len();
    let duration = frames as f64 / f64::from(spec.sample_rate);
    let loudest = loudest_frame(&spectrogram);
    let peak_hz = loudest.and_then(|frame| spectrogram.peak_frequency(frame));
    let centroids = spectrogram.spectral_centroid();
    let mean_centroid = if centroids.is_empty() {
        None
    } else {
        Some(centroids.iter().sum::<f32>() / centroids.len() as f32)
    };
    let db_range = value_range(&mel_db);

    if args.json {
        let json = serde_json::json!({
            "input": args.input.display().to_string(),
            "sample_rate": spec.sample_rate,
            "channels": spec.channels,
            "samples": frames,
            "duration_secs": duration,
            "n_fft": engine.n_fft(),
            "hop_size": engine.hop_size(),
            "window": engine.window().name(),
            "power": engine.power(),
            "num_bins": spectrogram.num_bins(),
            "num_frames": spectrogram.num_frames(),
            "num_mels": mel_db.num_mels(),
            "loudest_frame": loudest,
            "peak_frequency_hz": peak_hz,
            "mean_spectral_centroid_hz": mean_centroid,
            "mel_db_min": db_range.map(|(lo, _)| lo),
            "mel_db_max": db_range.map(|(_, hi)| hi),
        });
        println!("{}", serde_json::to_string_pretty(&json)?);
    } else {
        println!("Analyzing {}...", args.input.display());
        println!(
            "  {} samples, {} ch, {} Hz, {:.2}s",
            frames, spec.channels, spec.sample_rate, duration
        );
        println!(
            "  n_fft {}, hop {}, {} window, power {}",
            engine.n_fft(),
            engine.hop_size(),
            engine.window(),
            engine.power()
        );
        println!(
            "\nSpectrogram: {} bins x {} frames, {} mel bands",
            spectrogram.num_bins(),
            spectrogram.num_frames(),
            mel_db.num_mels()
        );

        match (loudest, peak_hz) {
            (Some(frame), Some(hz)) => println!(
                "  Peak frequency: {:.1} Hz (frame {} at {:.3}s)",
                hz,
                frame,
                spectrogram.frame_to_seconds(frame)
            ),
            _ => println!("  Input shorter than one frame, nothing to analyze"),
        }
        if let Some(centroid) = mean_centroid {
            println!("  Mean spectral centroid: {:.1} Hz", centroid);
        }
        if let Some((lo, hi)) = db_range {
            println!("  Mel level range: {:.1} dB to {:.1} dB", lo, hi);
        }
    }

    if args.linear {
        let linear_db = spectrogram.to_db(engine.scaler());
        export_grid(&linear_db, args.csv.as_deref(), args.pgm.as_deref(), args.db_range)?;
    } else {
        export_grid(&mel_db, args.csv.as_deref(), args.pgm.as_deref(), args.db_range)?;
    }

    if !args.json {
        if let Some(path) = &args.csv {
            println!("\nWrote CSV to {}", path.display());
        }
        if let Some(path) = &args.pgm {
            println!("Wrote image to {}", path.display());
        }
    }

    Ok(())
}
