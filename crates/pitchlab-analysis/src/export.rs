//! Export formats for spectrograms.
//!
//! - CSV for generic data exchange (rows are frames, columns are bins or
//!   mel bands, both labelled in physical units)
//! - PGM for spectrogram images viewable by most image tools

use crate::db::{DEFAULT_FLOOR, ValueScale, power_to_db};
use crate::mel::MelSpectrogram;
use crate::spectrogram::Spectrogram;
use ndarray::Array2;
use std::io::{BufWriter, Write};
use std::path::Path;

/// A `[row, frame]` grid with a frequency for each row.
///
/// Implemented by both linear and mel spectrograms so the exporters can
/// label their axes without caring which they were given.
pub trait TimeFrequencyGrid {
    /// Values as a `[row, frame]` array.
    fn grid(&self) -> &Array2<f32>;

    /// Frequency in Hz that labels a row.
    fn row_frequency_hz(&self, row: usize) -> f32;

    /// Start time of a frame in seconds.
    fn frame_seconds(&self, frame: usize) -> f32;

    /// Unit of the values.
    fn value_scale(&self) -> ValueScale;
}

impl TimeFrequencyGrid for Spectrogram {
    fn grid(&self) -> &Array2<f32> {
        self.values()
    }

    fn row_frequency_hz(&self, row: usize) -> f32 {
        self.bin_to_frequency_hz(row)
    }

    fn frame_seconds(&self, frame: usize) -> f32 {
        self.frame_to_seconds(frame)
    }

    fn value_scale(&self) -> ValueScale {
        self.scale()
    }
}

impl TimeFrequencyGrid for MelSpectrogram {
    fn grid(&self) -> &Array2<f32> {
        self.values()
    }

    fn row_frequency_hz(&self, row: usize) -> f32 {
        self.band_frequencies().get(row).copied().unwrap_or(f32::NAN)
    }

    fn frame_seconds(&self, frame: usize) -> f32 {
        self.frame_to_seconds(frame)
    }

    fn value_scale(&self) -> ValueScale {
        self.scale()
    }
}

/// Export a grid to CSV format.
///
/// Creates a CSV file with time on rows and frequency on columns. The first
/// row holds frequency labels in Hz, the first column holds frame start
/// times in seconds. Values are written as stored; convert with `to_db`
/// first for a dB export.
///
/// # Example
///
/// ```rust,ignore
/// use pitchlab_analysis::{SpectrogramEngine, export::export_csv};
///
/// let engine = SpectrogramEngine::new(16000, 1024, 512, 128)?;
/// export_csv(&engine.analyze(&signal)?, "mel_db.csv")?;
/// ```
pub fn export_csv<G: TimeFrequencyGrid>(grid: &G, path: impl AsRef<Path>) -> std::io::Result<()> {
    let mut file = BufWriter::new(std::fs::File::create(path)?);
    let values = grid.grid();
    let (rows, frames) = values.dim();

    write!(file, "time_s")?;
    for row in 0..rows {
        write!(file, ",{:.2}", grid.row_frequency_hz(row))?;
    }
    writeln!(file)?;

    for frame in 0..frames {
        write!(file, "{:.6}", grid.frame_seconds(frame))?;
        for &value in values.column(frame) {
            write!(file, ",{:.6}", value)?;
        }
        writeln!(file)?;
    }

    file.flush()
}

/// Export a grid to PGM grayscale image format.
///
/// Time is on the X axis, frequency on the Y axis (low frequencies at the
/// bottom). Linear values are read as power and converted with
/// `10·log10`; dB values are used directly.
///
/// # Arguments
///
/// * `grid` - The spectrogram to export
/// * `path` - Output file path
/// * `db_range` - Dynamic range in dB (values below max-db_range map to black)
pub fn export_pgm<G: TimeFrequencyGrid>(
    grid: &G,
    path: impl AsRef<Path>,
    db_range: f32,
) -> std::io::Result<()> {
    if !db_range.is_finite() || db_range <= 0.0 {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("dB range must be positive, got {db_range}"),
        ));
    }

    let values = grid.grid();
    let (height, width) = values.dim();
    let db = match grid.value_scale() {
        ValueScale::Decibel => values.clone(),
        ValueScale::Linear => values.mapv(|v| power_to_db(v, DEFAULT_FLOOR)),
    };
    let max_db = db.iter().copied().fold(f32::NEG_INFINITY, f32::max);

    let mut file = BufWriter::new(std::fs::File::create(path)?);
    writeln!(file, "P2")?;
    writeln!(file, "# Spectrogram export from pitchlab-analysis")?;
    writeln!(file, "# Width: {} frames, Height: {} rows", width, height)?;
    writeln!(file, "{} {}", width, height)?;
    writeln!(file, "255")?;

    // top to bottom = high to low frequency
    for row in (0..height).rev() {
        let pixels: Vec<String> = db
            .row(row)
            .iter()
            .map(|&value| {
                let normalized = ((value - (max_db - db_range)) / db_range).clamp(0.0, 1.0);
                ((normalized * 255.0).round() as u8).to_string()
            })
            .collect();
        writeln!(file, "{}", pixels.join(" "))?;
    }

    file.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spectrogram::FrameLayout;
    use ndarray::array;
    use tempfile::NamedTempFile;

    fn small_spectrogram() -> Spectrogram {
        // n_fft 4 -> 3 bins, two frames
        let layout = FrameLayout::new(4, 2, 1000).unwrap();
        Spectrogram::from_values(
            array![[0.1, 0.4], [0.2, 0.5], [0.3, 0.6]],
            layout,
            ValueScale::Linear,
        )
        .unwrap()
    }

    #[test]
    fn spectrogram_csv_layout() {
        let temp_file = NamedTempFile::new().unwrap();
        export_csv(&small_spectrogram(), temp_file.path()).unwrap();

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "time_s,0.00,250.00,500.00");
        assert_eq!(lines[1], "0.000000,0.100000,0.200000,0.300000");
        assert!(lines[2].starts_with("0.002000,0.400000"));
    }

    #[test]
    fn spectrogram_pgm_header_and_pixels() {
        let temp_file = NamedTempFile::new().unwrap();
        export_pgm(&small_spectrogram(), temp_file.path(), 60.0).unwrap();

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "P2");
        assert_eq!(lines[3], "2 3");
        assert_eq!(lines[4], "255");
        assert_eq!(lines.len(), 5 + 3);
        // loudest value (0.6, top bin, second frame) is white
        assert!(lines[5].ends_with("255"));
    }

    #[test]
    fn pgm_rejects_bad_range() {
        let temp_file = NamedTempFile::new().unwrap();
        let err = export_pgm(&small_spectrogram(), temp_file.path(), 0.0).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);
    }
}
