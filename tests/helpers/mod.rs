//! Audio test file generation utilities
//!
//! Generates deterministic WAV files with known characteristics so the
//! pipeline's output can be checked against expected sample counts and
//! amplitude ranges.

use hound::{SampleFormat, WavSpec, WavWriter};
use std::f32::consts::PI;
use std::path::Path;

/// Write a sine wave WAV with the same signal on every channel.
pub fn write_sine_wav<P: AsRef<Path>>(
    path: P,
    sample_rate: u32,
    channels: u16,
    duration_ms: u64,
    frequency_hz: f32,
    amplitude: f32,
) -> Result<(), hound::Error> {
    let spec = WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec)?;

    let total_frames = (sample_rate as u64 * duration_ms) / 1000;
    for frame in 0..total_frames {
        let t = frame as f32 / sample_rate as f32;
        let value = ((2.0 * PI * frequency_hz * t).sin() * amplitude * i16::MAX as f32) as i16;
        for _ in 0..channels {
            writer.write_sample(value)?;
        }
    }

    writer.finalize()
}

/// Write a stereo sine WAV with distinct amplitude per channel,
/// for downmix verification.
pub fn write_stereo_sine_wav<P: AsRef<Path>>(
    path: P,
    sample_rate: u32,
    duration_ms: u64,
    frequency_hz: f32,
    left_amplitude: f32,
    right_amplitude: f32,
) -> Result<(), hound::Error> {
    let spec = WavSpec {
        channels: 2,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec)?;

    let total_frames = (sample_rate as u64 * duration_ms) / 1000;
    for frame in 0..total_frames {
        let t = frame as f32 / sample_rate as f32;
        let s = (2.0 * PI * frequency_hz * t).sin();
        writer.write_sample((s * left_amplitude * i16::MAX as f32) as i16)?;
        writer.write_sample((s * right_amplitude * i16::MAX as f32) as i16)?;
    }

    writer.finalize()
}

/// Write deterministic junk bytes that no container probe should accept.
pub fn write_garbage<P: AsRef<Path>>(path: P, len: usize) -> std::io::Result<()> {
    let bytes: Vec<u8> = (0..len).map(|i| (i * 37 + 11) as u8).collect();
    std::fs::write(path, bytes)
}
