use anyhow::Result;
use clap::{Parser, Subcommand};
use sculk_recorder::{AudioFile, Config};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "sculk-recorder", version, about = "Voice activity signals and per-utterance recordings")]
struct Cli {
    /// Config file, with or without the .toml extension
    #[arg(short, long, default_value = "config/sculk-recorder")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the resolved configuration as JSON
    CheckConfig,
    /// Print format, duration and peak level of a recording
    Inspect { file: PathBuf },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,sculk_recorder=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::CheckConfig => {
            let cfg = Config::load(&cli.config)?;
            info!("Loaded config: {}", cfg.service.name);
            println!("{}", serde_json::to_string_pretty(&cfg)?);
        }
        Command::Inspect { file } => {
            let audio = AudioFile::open(&file)?;
            println!("Path: {}", audio.path);
            println!("Sample rate: {} Hz", audio.sample_rate);
            println!("Channels: {}", audio.channels);
            println!("Bits per sample: {}", audio.bits_per_sample);
            println!("Duration: {:.2} s", audio.duration_seconds);
            println!("Peak level: {:.1} dBFS", audio.peak_level_db());
        }
    }

    Ok(())
}
