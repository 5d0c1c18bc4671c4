//! Packet decoding using symphonia
//!
//! Converts compressed packets into planar f32 frames normalized to
//! [-1.0, 1.0], whatever the codec's native sample format.
//!
//! A single packet may yield zero frames (priming, or a skipped decode
//! error) and in principle more than one; callers must handle both.

use crate::error::{Error, Result};
use crate::probe::{codec_registry, StreamDescriptor};
use symphonia::core::audio::{AudioBuffer, AudioBufferRef, Signal};
use symphonia::core::codecs::{Decoder, DecoderOptions};
use symphonia::core::conv::IntoSample;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::Packet;
use symphonia::core::sample::Sample;
use tracing::warn;

/// One decoded span of audio: planar f32 at the stream's native rate and
/// channel layout.
#[derive(Debug)]
pub struct AudioFrame {
    /// One vec per channel, all the same length
    pub planar: Vec<Vec<f32>>,
}

impl AudioFrame {
    /// Samples per channel in this span
    pub fn frames(&self) -> usize {
        self.planar.first().map_or(0, |c| c.len())
    }
}

/// Codec session bound 1:1 to a selected track.
///
/// Decoding is stateful for some codecs, so one session must not be shared
/// across pipeline runs. The codec context is released by drop, before the
/// `MediaHandle` it was opened against.
pub struct DecoderSession {
    decoder: Box<dyn Decoder>,
    track_id: u32,
    skipped_packets: u64,
}

impl DecoderSession {
    /// Open a decoder matching the track's codec.
    ///
    /// # Errors
    /// - `UnsupportedCodec` if no registered decoder handles the codec id
    /// - `DecoderInit` if the decoder rejects the track parameters
    pub fn open(stream: &StreamDescriptor) -> Result<Self> {
        let decoder = codec_registry()
            .make(&stream.codec_params, &DecoderOptions::default())
            .map_err(|e| match e {
                SymphoniaError::Unsupported(what) => Error::UnsupportedCodec(what.to_string()),
                other => Error::DecoderInit(other.to_string()),
            })?;

        Ok(Self {
            decoder,
            track_id: stream.track_id,
            skipped_packets: 0,
        })
    }

    /// Track id this session decodes.
    pub fn track_id(&self) -> u32 {
        self.track_id
    }

    /// Packets skipped because of decode errors so far.
    pub fn skipped_packets(&self) -> u64 {
        self.skipped_packets
    }

    /// Decode one packet into zero or more frames.
    ///
    /// Decode errors are non-fatal: the packet is skipped, counted, and an
    /// empty sequence returned. Only failure to open the session aborts the
    /// pipeline.
    pub fn decode(&mut self, packet: &Packet) -> Vec<AudioFrame> {
        match self.decoder.decode(packet) {
            Ok(decoded) if decoded.frames() == 0 => Vec::new(),
            Ok(decoded) => vec![AudioFrame {
                planar: planar_f32(&decoded),
            }],
            Err(e) => {
                self.skipped_packets += 1;
                warn!("Decode error, skipping packet: {}", e);
                Vec::new()
            }
        }
    }
}

/// Convert any symphonia sample format to planar f32.
fn planar_f32(decoded: &AudioBufferRef) -> Vec<Vec<f32>> {
    match decoded {
        AudioBufferRef::U8(buf) => planarize(buf),
        AudioBufferRef::U16(buf) => planarize(buf),
        AudioBufferRef::U24(buf) => planarize(buf),
        AudioBufferRef::U32(buf) => planarize(buf),
        AudioBufferRef::S8(buf) => planarize(buf),
        AudioBufferRef::S16(buf) => planarize(buf),
        AudioBufferRef::S24(buf) => planarize(buf),
        AudioBufferRef::S32(buf) => planarize(buf),
        AudioBufferRef::F32(buf) => planarize(buf),
        AudioBufferRef::F64(buf) => planarize(buf),
    }
}

fn planarize<S>(buf: &AudioBuffer<S>) -> Vec<Vec<f32>>
where
    S: Sample + IntoSample<f32>,
{
    let channels = buf.spec().channels.count();
    (0..channels)
        .map(|ch| buf.chan(ch).iter().map(|s| (*s).into_sample()).collect())
        .collect()
}
