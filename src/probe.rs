//! Container probing and audio track selection using symphonia
//!
//! `MediaHandle` owns the open container. It is released by drop, exactly
//! once, on every pipeline exit path, after any decoder bound to one of its
//! tracks.

use crate::error::{Error, Result};
use std::fs::File;
use std::path::Path;
use std::sync::OnceLock;
use symphonia::core::codecs::{CodecParameters, CodecRegistry, CODEC_TYPE_NULL};
use symphonia::core::formats::{FormatOptions, FormatReader};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::debug;

/// Codec registry shared by all pipeline runs, initialized once per process.
pub(crate) fn codec_registry() -> &'static CodecRegistry {
    static REGISTRY: OnceLock<CodecRegistry> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let mut registry = CodecRegistry::new();
        symphonia::default::register_enabled_codecs(&mut registry);
        registry
    })
}

/// Parameters of the selected audio track. Immutable once selected.
#[derive(Debug, Clone)]
pub struct StreamDescriptor {
    /// Track id within the container
    pub track_id: u32,
    /// Native sample rate of the encoded stream
    pub sample_rate: u32,
    /// Native channel count of the encoded stream
    pub channels: usize,
    /// Total frames, when the container declares them
    pub n_frames: Option<u64>,
    pub(crate) codec_params: CodecParameters,
}

/// An open container with probed stream metadata.
pub struct MediaHandle {
    reader: Box<dyn FormatReader>,
}

impl std::fmt::Debug for MediaHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaHandle").finish_non_exhaustive()
    }
}

impl MediaHandle {
    /// Open a container file and probe its structure.
    ///
    /// # Errors
    /// - `NotFound` if the file cannot be opened
    /// - `UnreadableContainer` if no format reader recognizes it
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::NotFound {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        // The extension is a hint only; probing falls back to scanning.
        let mut hint = Hint::new();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext);
        }

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| Error::UnreadableContainer(e.to_string()))?;

        debug!(
            "Probed {}: {} track(s)",
            path.display(),
            probed.format.tracks().len()
        );

        Ok(Self {
            reader: probed.format,
        })
    }

    /// Select the first decodable audio track in file order.
    ///
    /// First match wins when multiple audio tracks exist. Fails with
    /// `NoAudioStream` if no track carries audio codec parameters; the
    /// failure is terminal, never retried.
    pub fn select_audio_track(&self) -> Result<StreamDescriptor> {
        let track = self
            .reader
            .tracks()
            .iter()
            .find(|t| {
                t.codec_params.codec != CODEC_TYPE_NULL
                    && t.codec_params.sample_rate.is_some()
                    && t.codec_params.channels.is_some()
            })
            .ok_or(Error::NoAudioStream)?;

        let params = track.codec_params.clone();
        let sample_rate = params.sample_rate.ok_or(Error::NoAudioStream)?;
        let channels = params
            .channels
            .map(|c| c.count())
            .ok_or(Error::NoAudioStream)?;

        Ok(StreamDescriptor {
            track_id: track.id,
            sample_rate,
            channels,
            n_frames: params.n_frames,
            codec_params: params,
        })
    }

    /// Demuxer access for the drain loop.
    pub(crate) fn reader_mut(&mut self) -> &mut dyn FormatReader {
        self.reader.as_mut()
    }

    /// Wrap an already-built reader, bypassing the probe.
    #[cfg(test)]
    pub(crate) fn from_reader(reader: Box<dyn FormatReader>) -> Self {
        Self { reader }
    }
}
