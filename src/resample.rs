//! Sample rate and channel layout conversion using rubato
//!
//! Decoded frames are mixed down (or up) to the target channel count, then
//! fed through a streaming `FastFixedIn` resampler when the target rate
//! differs from the native rate. Input is staged in fixed-size chunks, so
//! sub-chunk remainders carry over between calls and the output length of
//! any single convert call is variable. Callers must read the produced
//! count from the result, never assume one frame in equals one chunk out.

use crate::decode::AudioFrame;
use crate::error::{Error, Result};
use rubato::{FastFixedIn, PolynomialDegree, Resampler as RubatoResampler};
use tracing::{debug, warn};

/// Input chunk size fed to rubato, in frames.
const CHUNK_FRAMES: usize = 1024;

/// Format/rate/channel conversion session for one pipeline run.
///
/// Configuration is fixed at open; only internal buffering state mutates
/// per call. Released by drop on every pipeline exit path.
pub struct ResamplerSession {
    /// None when native and target rates match (passthrough)
    resampler: Option<FastFixedIn<f32>>,
    /// Staged input awaiting a full chunk, planar, target channel count
    pending: Vec<Vec<f32>>,
    target_channels: usize,
    convert_failures: u64,
}

impl std::fmt::Debug for ResamplerSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResamplerSession").finish_non_exhaustive()
    }
}

impl ResamplerSession {
    /// Build a conversion session from source to target parameters.
    ///
    /// # Errors
    /// `ResamplerInit` when the parameters are inconsistent: zero rates,
    /// zero source channels, or a target channel count other than 1 or 2.
    pub fn open(
        native_rate: u32,
        native_channels: usize,
        target_rate: u32,
        target_channels: usize,
    ) -> Result<Self> {
        if native_rate == 0 || target_rate == 0 {
            return Err(Error::ResamplerInit("sample rate must be non-zero".into()));
        }
        if native_channels == 0 {
            return Err(Error::ResamplerInit("source has zero channels".into()));
        }
        if !(1..=2).contains(&target_channels) {
            return Err(Error::ResamplerInit(format!(
                "unsupported target channel count: {}",
                target_channels
            )));
        }

        let resampler = if native_rate == target_rate {
            debug!("Native rate matches target {}Hz, passthrough", target_rate);
            None
        } else {
            debug!("Resampling {}Hz -> {}Hz", native_rate, target_rate);
            let ratio = target_rate as f64 / native_rate as f64;
            Some(
                FastFixedIn::<f32>::new(
                    ratio,
                    1.0, // fixed ratio, no runtime changes
                    PolynomialDegree::Septic,
                    CHUNK_FRAMES,
                    target_channels,
                )
                .map_err(|e| Error::ResamplerInit(e.to_string()))?,
            )
        };

        Ok(Self {
            resampler,
            pending: vec![Vec::new(); target_channels],
            target_channels,
            convert_failures: 0,
        })
    }

    /// Convert one decoded frame into interleaved target-format samples.
    ///
    /// May return fewer or more samples than the frame holds; the remainder
    /// stays staged until the next call or [`flush`](Self::flush).
    /// Conversion failures are non-fatal: the chunk is dropped, counted,
    /// and zero samples produced for it.
    pub fn convert(&mut self, frame: &AudioFrame) -> Vec<f32> {
        let mixed = mixdown(&frame.planar, self.target_channels);

        let Some(resampler) = self.resampler.as_mut() else {
            return interleave(&mixed);
        };

        for (ch, data) in mixed.iter().enumerate() {
            self.pending[ch].extend_from_slice(data);
        }

        let mut out = Vec::new();
        while self.pending[0].len() >= CHUNK_FRAMES {
            let chunk: Vec<Vec<f32>> = self
                .pending
                .iter_mut()
                .map(|p| p.drain(..CHUNK_FRAMES).collect())
                .collect();
            match resampler.process(&chunk, None) {
                Ok(planar) => out.extend(interleave(&planar)),
                Err(e) => {
                    self.convert_failures += 1;
                    warn!("Resample failed, dropped {} frames: {}", CHUNK_FRAMES, e);
                }
            }
        }
        out
    }

    /// Drain the staged remainder and the filter's internal delay line at
    /// end of stream. Output may overshoot by up to one chunk of padding.
    pub fn flush(&mut self) -> Vec<f32> {
        let Some(resampler) = self.resampler.as_mut() else {
            return Vec::new();
        };

        let mut out = Vec::new();
        if !self.pending[0].is_empty() {
            let tail: Vec<Vec<f32>> = self.pending.iter_mut().map(std::mem::take).collect();
            match resampler.process_partial(Some(&tail), None) {
                Ok(planar) => out.extend(interleave(&planar)),
                Err(e) => {
                    self.convert_failures += 1;
                    warn!("Resample flush failed: {}", e);
                }
            }
        }

        match resampler.process_partial(None::<&[Vec<f32>]>, None) {
            Ok(planar) => out.extend(interleave(&planar)),
            Err(e) => warn!("Resampler drain failed: {}", e),
        }
        out
    }

    /// Conversion calls that dropped output due to errors so far.
    pub fn convert_failures(&self) -> u64 {
        self.convert_failures
    }
}

/// Mix planar channels to the requested channel count.
///
/// Mono duplicates into both target channels; multi-channel sources average
/// into mono, or split even/odd channel indices into left/right.
fn mixdown(input: &[Vec<f32>], target: usize) -> Vec<Vec<f32>> {
    let src = input.len();
    if src == target {
        return input.to_vec();
    }

    let frames = input.first().map_or(0, |c| c.len());
    if target == 1 {
        let mut mono = Vec::with_capacity(frames);
        for i in 0..frames {
            let sum: f32 = input.iter().map(|c| c[i]).sum();
            mono.push(sum / src as f32);
        }
        return vec![mono];
    }

    if src == 1 {
        return vec![input[0].clone(), input[0].clone()];
    }

    // Multi-channel to stereo: even channel indices feed left, odd feed right
    let left_count = src.div_ceil(2) as f32;
    let right_count = (src / 2) as f32;
    let mut left = Vec::with_capacity(frames);
    let mut right = Vec::with_capacity(frames);
    for i in 0..frames {
        let mut l = 0.0;
        let mut r = 0.0;
        for (ch, data) in input.iter().enumerate() {
            if ch % 2 == 0 {
                l += data[i];
            } else {
                r += data[i];
            }
        }
        left.push(l / left_count);
        right.push(r / right_count);
    }
    vec![left, right]
}

/// Convert planar samples to interleaved format.
fn interleave(planar: &[Vec<f32>]) -> Vec<f32> {
    let channels = planar.len();
    let frames = planar.first().map_or(0, |c| c.len());
    let mut out = Vec::with_capacity(frames * channels);
    for i in 0..frames {
        for ch in planar {
            out.push(ch[i]);
        }
    }
    out
}
