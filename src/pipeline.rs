//! Decode pipeline orchestration
//!
//! Drives demux -> decode -> convert -> accumulate until the container is
//! exhausted or a fatal error short-circuits the run. The media handle and
//! both sessions are owned by stack locals, so every return path releases
//! them in reverse acquisition order: decoder, resampler, then handle.
//!
//! Stages: open the container, select an audio track, open the decoder and
//! resampler sessions, then drain packets. Failure in any stage aborts the
//! run with the stage recorded on the error; per-packet and per-frame
//! failures inside the drain loop are skipped and counted instead.

use crate::accumulator::SampleAccumulator;
use crate::decode::DecoderSession;
use crate::error::{Error, Result};
use crate::probe::MediaHandle;
use crate::resample::ResamplerSession;
use crate::types::{PipelineStats, SampleBuffer};
use std::path::Path;
use symphonia::core::errors::Error as SymphoniaError;
use tracing::{debug, info, warn};

/// Target output format for one pipeline run.
///
/// Channel count and sample rate are caller-supplied policy, not
/// hard-coded: mono for waveform drawing, stereo for playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Sample rate the output buffer is converted to
    pub target_sample_rate: u32,
    /// Channel count of the output buffer (1 or 2)
    pub target_channels: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            target_sample_rate: 44100,
            target_channels: 2,
        }
    }
}

/// Decode a whole audio file into memory at the configured target format.
///
/// One outcome per invocation: a complete [`SampleBuffer`] or a fatal
/// [`Error`] carrying the originating stage. A file whose every packet
/// fails to decode still succeeds with an empty buffer; callers must treat
/// a zero-length result as degenerate but valid.
pub fn decode_file<P: AsRef<Path>>(path: P, config: &PipelineConfig) -> Result<SampleBuffer> {
    let path = path.as_ref();
    debug!("Decoding {}", path.display());

    let handle = MediaHandle::open(path)?;
    decode_handle(handle, config)
}

/// Drive stream selection, session init, and the drain loop over an
/// already-open container.
fn decode_handle(mut handle: MediaHandle, config: &PipelineConfig) -> Result<SampleBuffer> {
    let stream = handle.select_audio_track()?;
    debug!(
        "Selected track {}: {}Hz, {} channel(s)",
        stream.track_id, stream.sample_rate, stream.channels
    );

    let mut decoder = DecoderSession::open(&stream)?;
    let mut resampler = ResamplerSession::open(
        stream.sample_rate,
        stream.channels,
        config.target_sample_rate,
        config.target_channels,
    )?;

    let mut accumulator = match stream.n_frames {
        Some(frames) => SampleAccumulator::with_capacity_hint(frames, config.target_channels),
        None => SampleAccumulator::new(),
    };
    let mut stats = PipelineStats::default();

    loop {
        let packet = match handle.reader_mut().next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                debug!("End of stream");
                break;
            }
            Err(SymphoniaError::ResetRequired) => {
                // The demuxer hit a discontinuity (e.g. a chained stream).
                // Everything before it is complete; end the drain there,
                // but count the reset so callers can tell this run apart
                // from a clean EOF.
                stats.demuxer_resets += 1;
                warn!("Demuxer reset mid-stream, output ends at the reset point");
                break;
            }
            Err(e) => return Err(Error::Read(e.to_string())),
        };

        if packet.track_id() != stream.track_id {
            continue;
        }
        stats.packets_read += 1;

        for frame in decoder.decode(&packet) {
            stats.frames_decoded += 1;
            let converted = resampler.convert(&frame);
            stats.samples_appended += converted.len() as u64;
            accumulator.append(&converted);
        }
    }

    // The resampler may hold a sub-chunk remainder and filter delay.
    let tail = resampler.flush();
    stats.samples_appended += tail.len() as u64;
    accumulator.append(&tail);

    stats.packets_skipped = decoder.skipped_packets();
    stats.convert_failures = resampler.convert_failures();

    if stats.packets_skipped > 0 {
        warn!("Skipped {} undecodable packet(s)", stats.packets_skipped);
    }
    info!(
        "Decoded {} samples at {}Hz ({} packets, {} frames)",
        accumulator.len(),
        config.target_sample_rate,
        stats.packets_read,
        stats.frames_decoded
    );

    Ok(SampleBuffer {
        samples: accumulator.finalize(),
        sample_rate: config.target_sample_rate,
        channels: config.target_channels,
        native_sample_rate: stream.sample_rate,
        native_channels: stream.channels,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{
        garbage_packet, mp3_track, null_codec_track, EndBehavior, ScriptedReader,
    };

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.target_sample_rate, 44100);
        assert_eq!(config.target_channels, 2);
    }

    #[test]
    fn test_nonexistent_file_fails_in_probe_stage() {
        let err = decode_file("/nonexistent/file.mp3", &PipelineConfig::default()).unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
        assert_eq!(err.stage(), crate::error::Stage::Probe);
    }

    #[test]
    fn test_all_packets_failing_is_empty_success() {
        let packets = (0..4).map(|ts| garbage_packet(0, ts)).collect();
        let reader = ScriptedReader::new(vec![mp3_track(0)], packets, EndBehavior::Eof);
        let handle = MediaHandle::from_reader(Box::new(reader));

        let buffer = decode_handle(handle, &PipelineConfig::default()).unwrap();

        // Degenerate but valid: success with an empty buffer, not a failure
        assert!(buffer.samples.is_empty());
        assert_eq!(buffer.frame_count(), 0);
        assert_eq!(buffer.stats.packets_read, 4);
        assert_eq!(buffer.stats.packets_skipped, 4);
        assert_eq!(buffer.stats.frames_decoded, 0);
        assert_eq!(buffer.stats.samples_appended, 0);
    }

    #[test]
    fn test_no_audio_stream_aborts_before_sessions() {
        let reader = ScriptedReader::new(vec![null_codec_track(0)], Vec::new(), EndBehavior::Eof);
        let handle = MediaHandle::from_reader(Box::new(reader));

        let err = decode_handle(handle, &PipelineConfig::default()).unwrap_err();
        assert!(matches!(err, Error::NoAudioStream));
        assert_eq!(err.stage(), crate::error::Stage::SelectStream);
    }

    #[test]
    fn test_demuxer_reset_is_counted() {
        let reader = ScriptedReader::new(
            vec![mp3_track(0)],
            vec![garbage_packet(0, 0)],
            EndBehavior::ResetRequired,
        );
        let handle = MediaHandle::from_reader(Box::new(reader));

        let buffer = decode_handle(handle, &PipelineConfig::default()).unwrap();
        assert_eq!(buffer.stats.demuxer_resets, 1);
    }
}
