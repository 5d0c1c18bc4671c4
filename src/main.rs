//! pcmload - decode an audio file into memory and report what was loaded

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use pcmload::{decode_file, PipelineConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for pcmload
#[derive(Parser, Debug)]
#[command(name = "pcmload")]
#[command(about = "Decode a compressed audio file into normalized PCM")]
#[command(version)]
struct Args {
    /// Audio file to decode
    input: PathBuf,

    /// Target sample rate in Hz
    #[arg(short, long, default_value = "44100", env = "PCMLOAD_RATE")]
    rate: u32,

    /// Target channel count (1 or 2)
    #[arg(short, long, default_value = "2", env = "PCMLOAD_CHANNELS")]
    channels: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pcmload=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let config = PipelineConfig {
        target_sample_rate: args.rate,
        target_channels: args.channels,
    };

    let buffer = decode_file(&args.input, &config)
        .with_context(|| format!("Failed to decode {}", args.input.display()))?;

    println!("File:     {}", args.input.display());
    println!(
        "Source:   {} Hz, {} channel(s)",
        buffer.native_sample_rate, buffer.native_channels
    );
    println!(
        "Loaded:   {} Hz, {} channel(s)",
        buffer.sample_rate, buffer.channels
    );
    println!("Frames:   {}", buffer.frame_count());
    println!("Duration: {:.3} s", buffer.duration_seconds());
    println!("Peak:     {:.4}", buffer.peak());
    if buffer.stats.packets_skipped > 0 || buffer.stats.convert_failures > 0 {
        println!(
            "Skipped:  {} packet(s), {} conversion call(s)",
            buffer.stats.packets_skipped, buffer.stats.convert_failures
        );
    }
    if buffer.stats.demuxer_resets > 0 {
        println!("Note:     stream reset mid-file, output ends at the reset point");
    }

    Ok(())
}
