//! Error types for pcmload
//!
//! Defines the fatal pipeline errors using thiserror. Each variant maps to
//! the pipeline stage it can originate from, so callers can present a
//! specific diagnostic instead of a generic decode failure.
//!
//! Per-packet decode failures and per-call conversion failures are not
//! represented here. They are non-fatal: the drain loop logs them, counts
//! them in `PipelineStats`, and continues.

use std::path::PathBuf;
use thiserror::Error;

/// Pipeline stage an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Opening the file and probing the container structure
    Probe,
    /// Selecting an audio track from the probed streams
    SelectStream,
    /// Opening the decoder and resampler sessions
    InitSessions,
    /// Reading and draining packets
    Drain,
}

/// Fatal error type for the decode pipeline
#[derive(Error, Debug)]
pub enum Error {
    /// Input file could not be opened
    #[error("File not found: {}: {source}", path.display())]
    NotFound {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Container structure could not be parsed
    #[error("Unreadable container: {0}")]
    UnreadableContainer(String),

    /// No decodable audio track in the container
    #[error("No audio stream found")]
    NoAudioStream,

    /// No decoder implementation for the track's codec
    #[error("Unsupported codec: {0}")]
    UnsupportedCodec(String),

    /// Decoder failed to initialize against the track parameters
    #[error("Decoder initialization failed: {0}")]
    DecoderInit(String),

    /// Resampler rejected the conversion parameters
    #[error("Resampler initialization failed: {0}")]
    ResamplerInit(String),

    /// Non-EOF I/O error while reading packets
    #[error("Read error: {0}")]
    Read(String),
}

impl Error {
    /// Stage this error originated from.
    pub fn stage(&self) -> Stage {
        match self {
            Error::NotFound { .. } | Error::UnreadableContainer(_) => Stage::Probe,
            Error::NoAudioStream => Stage::SelectStream,
            Error::UnsupportedCodec(_) | Error::DecoderInit(_) | Error::ResamplerInit(_) => {
                Stage::InitSessions
            }
            Error::Read(_) => Stage::Drain,
        }
    }
}

/// Convenience Result type using pcmload Error
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_mapping() {
        assert_eq!(
            Error::UnreadableContainer("bad".into()).stage(),
            Stage::Probe
        );
        assert_eq!(Error::NoAudioStream.stage(), Stage::SelectStream);
        assert_eq!(
            Error::ResamplerInit("zero channels".into()).stage(),
            Stage::InitSessions
        );
        assert_eq!(Error::Read("truncated".into()).stage(), Stage::Drain);
    }
}
