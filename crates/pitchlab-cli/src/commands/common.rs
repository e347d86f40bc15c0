//! Shared CLI helpers used across multiple commands.

use anyhow::Context;
use clap::Args;
use pitchlab_analysis::{TimeFrequencyGrid, export_csv, export_pgm};
use pitchlab_config::{Config, OutputConfig};
use pitchlab_core::Waveform;
use pitchlab_io::write_waveform;
use std::path::Path;

/// Load the session config: an explicit file, the user config, or defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    Config::load_or_default(path).context("failed to load configuration")
}

/// Output options shared by every command that renders audio.
#[derive(Args, Debug, Clone, Default)]
pub struct RenderArgs {
    /// Sample rate in Hz (overrides the config file)
    #[arg(long)]
    pub sample_rate: Option<u32>,

    /// WAV bit depth: 8, 16, 24, or 32 (float)
    #[arg(long)]
    pub bits: Option<u16>,

    /// Write samples as synthesized, without peak normalization
    #[arg(long)]
    pub no_normalize: bool,
}

impl RenderArgs {
    /// Overlay the flags on `config` and validate the result.
    pub fn apply(&self, mut config: Config) -> anyhow::Result<Config> {
        if let Some(sample_rate) = self.sample_rate {
            config.sample_rate = sample_rate;
        }
        if let Some(bits) = self.bits {
            config.output.bits_per_sample = bits;
        }
        if self.no_normalize {
            config.output.normalize = false;
        }
        config.validate()?;
        Ok(config)
    }
}

/// Write a waveform with the configured bit depth and normalization.
pub fn save_waveform(path: &Path, waveform: &Waveform, output: &OutputConfig) -> anyhow::Result<()> {
    write_waveform(path, waveform, output.bits_per_sample, output.normalize)
        .with_context(|| format!("failed to write {}", path.display()))?;
    tracing::debug!(
        "wrote {} ({} samples, {} bit, normalize={})",
        path.display(),
        waveform.len(),
        output.bits_per_sample,
        output.normalize
    );
    Ok(())
}

/// Write the requested CSV and PGM exports of a grid.
pub fn export_grid<G: TimeFrequencyGrid>(
    grid: &G,
    csv: Option<&Path>,
    pgm: Option<&Path>,
    db_range: f32,
) -> anyhow::Result<()> {
    if let Some(path) = csv {
        export_csv(grid, path).with_context(|| format!("failed to write {}", path.display()))?;
    }
    if let Some(path) = pgm {
        export_pgm(grid, path, db_range)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }
    Ok(())
}
