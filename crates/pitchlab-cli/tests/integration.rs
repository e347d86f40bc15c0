//! Integration tests for pitchlab-cli.
//!
//! Every test runs the binary with `XDG_CONFIG_HOME` pointed at a scratch
//! directory so a real user config cannot leak in.

use pitchlab_io::{WavSpec, read_wav_info, write_wav};
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Helper to get the `pitchlab` binary built by cargo, isolated from user config.
fn pitchlab_bin(scratch: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_pitchlab"));
    cmd.env("XDG_CONFIG_HOME", scratch).env("HOME", scratch);
    cmd
}

fn run_ok(cmd: &mut Command) -> Output {
    let output = cmd.output().expect("failed to run pitchlab");
    assert!(
        output.status.success(),
        "pitchlab failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    output
}

// ---------------------------------------------------------------------------
// Help and pitch tables
// ---------------------------------------------------------------------------

#[test]
fn help_lists_commands() {
    let dir = TempDir::new().unwrap();
    let output = run_ok(pitchlab_bin(dir.path()).arg("--help"));
    let stdout = String::from_utf8_lossy(&output.stdout);
    for command in ["generate", "analyze", "pitch", "demo"] {
        assert!(stdout.contains(command), "help should mention '{command}'");
    }
}

#[test]
fn pitch_prints_both_tables() {
    let dir = TempDir::new().unwrap();
    let output = run_ok(pitchlab_bin(dir.path()).arg("pitch"));
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(stdout.contains("440 Hz is 69.00 in MIDI Pitch"));
    assert!(stdout.contains("880 Hz is 81.00 in MIDI Pitch"));
    assert!(stdout.contains("3960 Hz is 107.04 in MIDI Pitch"));
    assert!(stdout.contains("60 in MIDI Pitch is 261.63 Hz"));
    assert!(stdout.contains("69 in MIDI Pitch is 440.00 Hz"));
    assert!(stdout.contains("72 in MIDI Pitch is 523.25 Hz"));

    let lines = stdout.lines().filter(|l| l.contains("MIDI Pitch")).count();
    assert_eq!(lines, 9 + 13);
}

#[test]
fn pitch_rejects_non_positive_base() {
    let dir = TempDir::new().unwrap();
    let output = pitchlab_bin(dir.path())
        .args(["pitch", "--base", "0"])
        .output()
        .unwrap();
    assert!(!output.status.success());
}

// ---------------------------------------------------------------------------
// Generate then analyze
// ---------------------------------------------------------------------------

#[test]
fn generated_tone_analyzes_to_its_frequency() {
    let dir = TempDir::new().unwrap();
    let wav = dir.path().join("tone.wav");

    run_ok(pitchlab_bin(dir.path()).args(["generate", "tone"]).arg(&wav));
    let info = read_wav_info(&wav).unwrap();
    assert_eq!(info.sample_rate, 16000);
    assert_eq!(info.num_frames, 16000);

    let output = run_ok(pitchlab_bin(dir.path()).arg("analyze").arg(&wav).arg("--json"));
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();

    assert_eq!(json["num_bins"], 513);
    assert_eq!(json["num_frames"], 30);
    assert_eq!(json["num_mels"], 128);
    assert_eq!(json["window"], "hann");
    let peak = json["peak_frequency_hz"].as_f64().unwrap();
    assert!((peak - 440.0).abs() < 16.0, "peak at {peak} Hz");
}

#[test]
fn analyze_writes_csv_and_pgm() {
    let dir = TempDir::new().unwrap();
    let wav = dir.path().join("chord.wav");
    let csv = dir.path().join("chord.csv");
    let pgm = dir.path().join("chord.pgm");

    run_ok(
        pitchlab_bin(dir.path())
            .args(["generate", "chord", "--duration", "1.0"])
            .arg(&wav),
    );
    run_ok(
        pitchlab_bin(dir.path())
            .arg("analyze")
            .arg(&wav)
            .arg("--csv")
            .arg(&csv)
            .arg("--pgm")
            .arg(&pgm),
    );

    let text = std::fs::read_to_string(&csv).unwrap();
    let mut lines = text.lines();
    let header = lines.next().unwrap();
    assert!(header.starts_with("time_s,"));
    assert_eq!(header.split(',').count(), 1 + 128);
    assert_eq!(lines.count(), 30);

    let image = std::fs::read(&pgm).unwrap();
    assert!(image.starts_with(b"P5"));
}

#[test]
fn analyze_linear_export_has_one_column_per_bin() {
    let dir = TempDir::new().unwrap();
    let wav = dir.path().join("tone.wav");
    let csv = dir.path().join("linear.csv");

    run_ok(pitchlab_bin(dir.path()).args(["generate", "tone"]).arg(&wav));
    run_ok(
        pitchlab_bin(dir.path())
            .arg("analyze")
            .arg(&wav)
            .args(["--linear", "--n-fft", "512", "--hop", "256", "--csv"])
            .arg(&csv),
    );

    let text = std::fs::read_to_string(&csv).unwrap();
    let header = text.lines().next().unwrap();
    assert_eq!(header.split(',').count(), 1 + 257);
}

#[test]
fn analyze_rejects_unknown_window() {
    let dir = TempDir::new().unwrap();
    let wav = dir.path().join("tone.wav");
    run_ok(pitchlab_bin(dir.path()).args(["generate", "tone"]).arg(&wav));

    let output = pitchlab_bin(dir.path())
        .arg("analyze")
        .arg(&wav)
        .args(["--window", "kaiser"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown window 'kaiser'"), "stderr: {stderr}");
}

fn analyze_json(scratch: &Path, wav: &Path, extra: &[&str]) -> serde_json::Value {
    let output = run_ok(
        pitchlab_bin(scratch)
            .arg("analyze")
            .arg(wav)
            .arg("--json")
            .args(extra),
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn analyze_empty_mono_file_has_no_frames() {
    let dir = TempDir::new().unwrap();
    let wav = dir.path().join("empty.wav");
    write_wav(&wav, &[], WavSpec::default()).unwrap();

    let json = analyze_json(dir.path(), &wav, &[]);
    assert_eq!(json["samples"], 0);
    assert_eq!(json["num_frames"], 0);
    assert!(json["peak_frequency_hz"].is_null());
}

#[test]
fn analyze_short_stereo_mixes_by_channel() {
    let dir = TempDir::new().unwrap();
    let stereo = WavSpec {
        channels: 2,
        sample_rate: 16000,
        bits_per_sample: 32,
    };

    // two frames, two channels: a square layout once deinterleaved
    let two_frames = dir.path().join("two.wav");
    write_wav(&two_frames, &[0.5, -0.5, 0.25, 0.75], stereo).unwrap();
    let json = analyze_json(
        dir.path(),
        &two_frames,
        &["--n-fft", "2", "--hop", "1", "--mels", "1"],
    );
    assert_eq!(json["channels"], 2);
    assert_eq!(json["samples"], 2);
    assert_eq!(json["num_frames"], 1);

    // one frame: both values belong to the same instant
    let one_frame = dir.path().join("one.wav");
    write_wav(&one_frame, &[0.5, -0.5], stereo).unwrap();
    let json = analyze_json(
        dir.path(),
        &one_frame,
        &["--n-fft", "2", "--hop", "1", "--mels", "1"],
    );
    assert_eq!(json["samples"], 1);
    assert_eq!(json["num_frames"], 0);
}

#[test]
fn analyze_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    let output = pitchlab_bin(dir.path())
        .arg("analyze")
        .arg(dir.path().join("missing.wav"))
        .output()
        .unwrap();
    assert!(!output.status.success());
}

// ---------------------------------------------------------------------------
// Synthesis subcommands
// ---------------------------------------------------------------------------

#[test]
fn shepard_length_follows_flags() {
    let dir = TempDir::new().unwrap();
    let wav = dir.path().join("shepard.wav");

    run_ok(
        pitchlab_bin(dir.path())
            .args(["generate", "shepard", "--step", "0.1", "--iterations", "2"])
            .args(["--direction", "descending"])
            .arg(&wav),
    );

    let info = read_wav_info(&wav).unwrap();
    assert_eq!(info.num_frames, 2 * 24 * 1600);
}

#[test]
fn scale_and_triad_lengths() {
    let dir = TempDir::new().unwrap();
    let scale = dir.path().join("scale.wav");
    let triad = dir.path().join("triad.wav");

    run_ok(pitchlab_bin(dir.path()).args(["generate", "scale"]).arg(&scale));
    run_ok(
        pitchlab_bin(dir.path())
            .args(["generate", "triad", "--tuning", "just", "--duration", "0.5"])
            .arg(&triad),
    );

    // a silent step leads the eight scale steps
    assert_eq!(read_wav_info(&scale).unwrap().num_frames, 9 * 8000);
    assert_eq!(read_wav_info(&triad).unwrap().num_frames, 8000);
}

#[test]
fn chord_amplitude_count_must_match() {
    let dir = TempDir::new().unwrap();
    let output = pitchlab_bin(dir.path())
        .args(["generate", "chord", "--pitches", "60,64", "--amplitudes", "1.0"])
        .arg(dir.path().join("bad.wav"))
        .output()
        .unwrap();
    assert!(!output.status.success());
}

#[test]
fn render_flags_set_format() {
    let dir = TempDir::new().unwrap();
    let wav = dir.path().join("tone.wav");

    run_ok(
        pitchlab_bin(dir.path())
            .args(["generate", "tone", "--sample-rate", "22050", "--bits", "24"])
            .arg(&wav),
    );

    let info = read_wav_info(&wav).unwrap();
    assert_eq!(info.sample_rate, 22050);
    assert_eq!(info.bits_per_sample, 24);
}

// ---------------------------------------------------------------------------
// Config file and demo
// ---------------------------------------------------------------------------

#[test]
fn config_file_sets_sample_rate() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("pitchlab.toml");
    std::fs::write(&config, "sample_rate = 8000\n\n[output]\nbits_per_sample = 32\n").unwrap();
    let wav = dir.path().join("tone.wav");

    run_ok(
        pitchlab_bin(dir.path())
            .arg("--config")
            .arg(&config)
            .args(["generate", "tone", "--duration", "0.5"])
            .arg(&wav),
    );

    let info = read_wav_info(&wav).unwrap();
    assert_eq!(info.sample_rate, 8000);
    assert_eq!(info.bits_per_sample, 32);
    assert_eq!(info.num_frames, 4000);
}

#[test]
fn invalid_config_file_fails() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("pitchlab.toml");
    std::fs::write(&config, "[analysis]\nn_fft = 0\n").unwrap();

    let output = pitchlab_bin(dir.path())
        .arg("--config")
        .arg(&config)
        .args(["generate", "tone"])
        .arg(dir.path().join("tone.wav"))
        .output()
        .unwrap();
    assert!(!output.status.success());
}

#[test]
fn demo_renders_every_sound() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("demo");

    run_ok(pitchlab_bin(dir.path()).arg("demo").arg(&out));

    for name in [
        "chord_tone",
        "scale_sine",
        "just_chord_tone",
        "equal_chord_tone",
        "shepard",
    ] {
        assert!(out.join(format!("{name}.wav")).exists(), "missing {name}.wav");
        assert!(
            out.join(format!("{name}_mel_db.csv")).exists(),
            "missing {name}_mel_db.csv"
        );
    }

    let shepard = read_wav_info(out.join("shepard.wav")).unwrap();
    assert_eq!(shepard.num_frames, 3 * 24 * 4800);
    let chord = read_wav_info(out.join("chord_tone.wav")).unwrap();
    assert_eq!(chord.num_frames, 48000);
}
