//! pitchlab CLI - tone synthesis and spectrogram analysis from the command line.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pitchlab")]
#[command(author, version, about = "Pitch-theory tone synthesis and spectrogram analysis", long_about = None)]
struct Cli {
    /// Session config file (defaults to the user config file, if present)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Synthesize tones, chords, scales, and Shepard sequences
    Generate(commands::generate::GenerateArgs),

    /// Compute the spectrogram of a WAV file
    Analyze(commands::analyze::AnalyzeArgs),

    /// Print MIDI pitch / Hz conversion tables
    Pitch(commands::pitch::PitchArgs),

    /// Render the full set of example sounds and their spectrograms
    Demo(commands::demo::DemoArgs),
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Generate(args) => {
            commands::generate::run(args, commands::common::load_config(cli.config.as_deref())?)
        }
        Commands::Analyze(args) => {
            commands::analyze::run(args, commands::common::load_config(cli.config.as_deref())?)
        }
        Commands::Pitch(args) => commands::pitch::run(args),
        Commands::Demo(args) => {
            commands::demo::run(args, commands::common::load_config(cli.config.as_deref())?)
        }
    }
}
