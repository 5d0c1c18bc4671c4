//! Append-only sample accumulation
//!
//! Backing storage is a `Vec`, so growth is amortized geometric rather
//! than a reallocation per append. Accumulation is write-once for the
//! duration of one pipeline run; there is no removal operation.

/// Cap on the up-front reservation, guards against bogus container
/// metadata declaring absurd frame counts (1 GiB of f32 samples).
const MAX_RESERVE_SAMPLES: usize = 1 << 28;

/// Growable buffer receiving converted samples in arrival order.
#[derive(Debug, Default)]
pub struct SampleAccumulator {
    samples: Vec<f32>,
    appended: u64,
}

impl SampleAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve capacity up front from a probed frame-count estimate.
    pub fn with_capacity_hint(frames: u64, channels: usize) -> Self {
        let hint = usize::try_from(frames)
            .unwrap_or(usize::MAX)
            .saturating_mul(channels)
            .min(MAX_RESERVE_SAMPLES);
        Self {
            samples: Vec::with_capacity(hint),
            appended: 0,
        }
    }

    /// Append converted samples, preserving prior content and order.
    pub fn append(&mut self, values: &[f32]) {
        self.samples.extend_from_slice(values);
        self.appended += values.len() as u64;
    }

    /// Samples accumulated so far.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sum of per-call appended counts. Always equals `len()`.
    pub fn appended(&self) -> u64 {
        self.appended
    }

    /// Hand the accumulated samples to the caller.
    pub fn finalize(self) -> Vec<f32> {
        self.samples
    }
}
