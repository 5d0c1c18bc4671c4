//! # pcmload
//!
//! One-shot decoding of compressed audio files into a contiguous in-memory
//! sample buffer.
//!
//! **Purpose:** Read a container file, decode its first audio track, convert
//! it to a caller-requested sample rate and channel layout, and return the
//! whole waveform as interleaved normalized f32 samples for playback or
//! visualization.
//!
//! **Architecture:** demux and decode via symphonia, rate conversion via
//! rubato, channel mixdown and f32 normalization in-crate.
//!
//! ```no_run
//! use pcmload::{decode_file, PipelineConfig};
//!
//! let config = PipelineConfig { target_sample_rate: 44100, target_channels: 1 };
//! let buffer = decode_file("song.mp3", &config)?;
//! println!("{} frames over {:.1}s", buffer.frame_count(), buffer.duration_seconds());
//! # Ok::<(), pcmload::Error>(())
//! ```

pub mod accumulator;
pub mod decode;
#[cfg(test)]
pub(crate) mod testutil;
pub mod error;
pub mod pipeline;
pub mod probe;
pub mod resample;
pub mod types;

pub use error::{Error, Result, Stage};
pub use pipeline::{decode_file, PipelineConfig};
pub use types::{PipelineStats, SampleBuffer};
