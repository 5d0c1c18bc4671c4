//! Test doubles for driving the pipeline without real media files
//!
//! `ScriptedReader` stands in for a demuxer: it serves a fixed track list
//! and packet sequence, then ends with either a clean EOF or a mid-stream
//! reset. Packets filled with zero bytes can never hold an MPEG sync word,
//! so an MP3 decoder fails on every one of them deterministically.

use std::collections::VecDeque;
use symphonia::core::audio::Channels;
use symphonia::core::codecs::{CodecParameters, CODEC_TYPE_MP3};
use symphonia::core::errors::{Error as SymphoniaError, Result as SymphoniaResult};
use symphonia::core::formats::{
    Cue, FormatOptions, FormatReader, Packet, SeekMode, SeekTo, SeekedTo, Track,
};
use symphonia::core::io::{MediaSourceStream, ReadOnlySource};
use symphonia::core::meta::{Metadata, MetadataLog};

/// What `next_packet` reports once the scripted packets run out.
pub enum EndBehavior {
    Eof,
    ResetRequired,
}

pub struct ScriptedReader {
    tracks: Vec<Track>,
    packets: VecDeque<Packet>,
    end: EndBehavior,
    metadata: MetadataLog,
}

impl ScriptedReader {
    pub fn new(tracks: Vec<Track>, packets: Vec<Packet>, end: EndBehavior) -> Self {
        Self {
            tracks,
            packets: packets.into(),
            end,
            metadata: MetadataLog::default(),
        }
    }
}

impl FormatReader for ScriptedReader {
    fn try_new(_source: MediaSourceStream, _options: &FormatOptions) -> SymphoniaResult<Self> {
        Err(SymphoniaError::Unsupported("scripted reader is built directly"))
    }

    fn cues(&self) -> &[Cue] {
        &[]
    }

    fn metadata(&mut self) -> Metadata<'_> {
        self.metadata.metadata()
    }

    fn seek(&mut self, _mode: SeekMode, _to: SeekTo) -> SymphoniaResult<SeekedTo> {
        Err(SymphoniaError::Unsupported("scripted reader cannot seek"))
    }

    fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    fn next_packet(&mut self) -> SymphoniaResult<Packet> {
        match self.packets.pop_front() {
            Some(packet) => Ok(packet),
            None => match self.end {
                EndBehavior::Eof => Err(SymphoniaError::IoError(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    "end of scripted packets",
                ))),
                EndBehavior::ResetRequired => Err(SymphoniaError::ResetRequired),
            },
        }
    }

    fn into_inner(self: Box<Self>) -> MediaSourceStream {
        MediaSourceStream::new(
            Box::new(ReadOnlySource::new(std::io::empty())),
            Default::default(),
        )
    }
}

/// An audio track with full MP3 parameters.
pub fn mp3_track(id: u32) -> Track {
    let mut params = CodecParameters::new();
    params
        .for_codec(CODEC_TYPE_MP3)
        .with_sample_rate(44100)
        .with_channels(Channels::FRONT_LEFT | Channels::FRONT_RIGHT);
    Track::new(id, params)
}

/// A track symphonia probed but could not describe: null codec, no params.
pub fn null_codec_track(id: u32) -> Track {
    Track::new(id, CodecParameters::new())
}

/// An audio-codec track missing sample rate and channel parameters.
pub fn audio_codec_without_params(id: u32) -> Track {
    let mut params = CodecParameters::new();
    params.for_codec(CODEC_TYPE_MP3);
    Track::new(id, params)
}

/// A packet whose payload can never parse as an MP3 frame.
pub fn garbage_packet(track_id: u32, ts: u64) -> Packet {
    Packet::new_from_slice(track_id, ts, 0, &[0u8; 417])
}
