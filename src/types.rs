//! Pipeline output types
//!
//! `SampleBuffer` is the read-only snapshot handed to playback or
//! visualization consumers once a run succeeds. It is never exposed
//! partially: a failed run returns an error, not a truncated buffer.

/// Decoded audio held fully in memory.
///
/// **Format:**
/// - Samples are f32 in [-1.0, 1.0]
/// - Interleaved by channel: [L, R, L, R, ...] for stereo
/// - Sampled at the caller's requested target rate
#[derive(Debug, Clone)]
pub struct SampleBuffer {
    /// PCM samples, interleaved
    pub samples: Vec<f32>,
    /// Rate the buffer is sampled at (the requested target rate)
    pub sample_rate: u32,
    /// Channels in the buffer (the requested target layout)
    pub channels: usize,
    /// Rate of the source stream before conversion
    pub native_sample_rate: u32,
    /// Channels in the source stream before mixdown
    pub native_channels: usize,
    /// Counters gathered while draining the container
    pub stats: PipelineStats,
}

impl SampleBuffer {
    /// Number of frames (samples per channel).
    pub fn frame_count(&self) -> usize {
        self.samples.len() / self.channels
    }

    /// Duration in seconds at the buffer's sample rate.
    pub fn duration_seconds(&self) -> f64 {
        self.frame_count() as f64 / self.sample_rate as f64
    }

    /// Map a playback-time fraction (0.0..=1.0) to a sample index.
    ///
    /// Out-of-range fractions clamp to the buffer bounds; the returned
    /// index is always valid for a non-empty buffer.
    pub fn index_for_fraction(&self, fraction: f64) -> usize {
        let frames = self.frame_count();
        if frames == 0 {
            return 0;
        }
        let frame = ((fraction.clamp(0.0, 1.0) * frames as f64) as usize).min(frames - 1);
        frame * self.channels
    }

    /// All channel samples for one frame, or None past the end.
    pub fn frame(&self, frame_index: usize) -> Option<&[f32]> {
        let start = frame_index.checked_mul(self.channels)?;
        let end = start.checked_add(self.channels)?;
        self.samples.get(start..end)
    }

    /// Peak absolute amplitude across the whole buffer.
    pub fn peak(&self) -> f32 {
        self.samples.iter().fold(0.0f32, |m, s| m.max(s.abs()))
    }
}

/// Counters gathered during one pipeline run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    /// Packets read from the container for the selected track
    pub packets_read: u64,
    /// Packets skipped due to decode errors (non-fatal)
    pub packets_skipped: u64,
    /// Frames successfully decoded
    pub frames_decoded: u64,
    /// Conversion calls that dropped output due to errors (non-fatal)
    pub convert_failures: u64,
    /// Total samples appended to the output buffer
    pub samples_appended: u64,
    /// Demuxer resets that ended the drain early (chained streams decode
    /// only up to the first reset; clean EOF runs report zero)
    pub demuxer_resets: u64,
}
