//! Compressed chunk decoding and clip merging
//!
//! The `Transcoder` turns one opaque compressed audio chunk (webm/opus, ogg,
//! wav, ...) into a normalized `AudioClip`, and merges ordered clips into a
//! single clip for recognition. Decoding is CPU-bound and runs on the
//! blocking thread pool so it never stalls other sessions.

use std::io::Cursor;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use thiserror::Error;
use tracing::debug;

use super::clip::AudioClip;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("unrecognized audio container: {0}")]
    Probe(String),

    #[error("no decodable audio track in chunk")]
    NoTrack,

    #[error("audio codec error: {0}")]
    Codec(String),

    #[error("decoded chunk contained no samples")]
    Empty,

    #[error("decode task failed: {0}")]
    Task(String),
}

#[derive(Debug, Error)]
pub enum MergeError {
    #[error("no segments to merge")]
    NoSegments,

    #[error("segment format mismatch: {0}")]
    FormatMismatch(String),
}

/// External transcoding capability consumed by the session pipeline
#[async_trait::async_trait]
pub trait Transcoder: Send + Sync {
    /// Decode one compressed chunk into a normalized clip
    async fn decode(&self, raw: Vec<u8>) -> Result<AudioClip, DecodeError>;

    /// Merge ordered clips into a single clip, preserving arrival order
    async fn merge(&self, clips: &[&AudioClip]) -> Result<AudioClip, MergeError>;
}

/// Symphonia-backed transcoder normalizing everything to one target format
pub struct SymphoniaTranscoder {
    target_sample_rate: u32,
    target_channels: u16,
}

impl SymphoniaTranscoder {
    pub fn new() -> Self {
        Self {
            target_sample_rate: 16000, // Whisper-style engines expect 16kHz
            target_channels: 1,        // Mono
        }
    }
}

impl Default for SymphoniaTranscoder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Transcoder for SymphoniaTranscoder {
    async fn decode(&self, raw: Vec<u8>) -> Result<AudioClip, DecodeError> {
        let target_rate = self.target_sample_rate;
        let target_channels = self.target_channels;

        tokio::task::spawn_blocking(move || {
            let clip = decode_bytes(raw)?;
            Ok(normalize(clip, target_rate, target_channels))
        })
        .await
        .map_err(|e| DecodeError::Task(e.to_string()))?
    }

    async fn merge(&self, clips: &[&AudioClip]) -> Result<AudioClip, MergeError> {
        let first = clips.first().ok_or(MergeError::NoSegments)?;
        let (sample_rate, channels) = (first.sample_rate, first.channels);

        let mut samples = Vec::with_capacity(clips.iter().map(|c| c.samples.len()).sum());
        for clip in clips {
            if clip.sample_rate != sample_rate || clip.channels != channels {
                return Err(MergeError::FormatMismatch(format!(
                    "expected {}Hz {}ch, got {}Hz {}ch",
                    sample_rate, channels, clip.sample_rate, clip.channels
                )));
            }
            samples.extend_from_slice(&clip.samples);
        }

        Ok(AudioClip::new(samples, sample_rate, channels))
    }
}

/// Probe and decode a compressed byte buffer into interleaved PCM
fn decode_bytes(raw: Vec<u8>) -> Result<AudioClip, DecodeError> {
    let source = MediaSourceStream::new(Box::new(Cursor::new(raw)), Default::default());

    let probed = symphonia::default::get_probe()
        .format(
            &Hint::new(),
            source,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| DecodeError::Probe(e.to_string()))?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or(DecodeError::NoTrack)?;
    let track_id = track.id;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| DecodeError::Codec(e.to_string()))?;

    let mut samples: Vec<i16> = Vec::new();
    let mut sample_rate = 0u32;
    let mut channels = 0u16;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            // A streamed chunk is often truncated mid-stream; treat I/O end
            // as end of data rather than a failure.
            Err(SymphoniaError::IoError(_)) | Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(DecodeError::Codec(e.to_string())),
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                sample_rate = spec.rate;
                channels = spec.channels.count() as u16;

                let mut buf = SampleBuffer::<i16>::new(decoded.capacity() as u64, spec);
                buf.copy_interleaved_ref(decoded);
                samples.extend_from_slice(buf.samples());
            }
            // Skip corrupt packets, keep whatever decodes
            Err(SymphoniaError::DecodeError(e)) => {
                debug!("skipping undecodable packet: {}", e);
            }
            Err(e) => return Err(DecodeError::Codec(e.to_string())),
        }
    }

    if samples.is_empty() {
        return Err(DecodeError::Empty);
    }

    Ok(AudioClip::new(samples, sample_rate, channels))
}

/// Normalize a decoded clip to the target rate and channel count
fn normalize(clip: AudioClip, target_rate: u32, target_channels: u16) -> AudioClip {
    let mut clip = clip;

    if clip.sample_rate != target_rate {
        clip = downsample(clip, target_rate);
    }

    if clip.channels != target_channels && target_channels == 1 {
        clip = stereo_to_mono(clip);
    }

    clip
}

/// Downsample by decimation
fn downsample(clip: AudioClip, target_rate: u32) -> AudioClip {
    if clip.sample_rate == target_rate {
        return clip;
    }

    let ratio = clip.sample_rate / target_rate;
    if ratio <= 1 {
        return clip; // Can't upsample
    }

    let frame = clip.channels as usize;
    let downsampled: Vec<i16> = clip
        .samples
        .chunks_exact(frame)
        .step_by(ratio as usize)
        .flatten()
        .copied()
        .collect();

    AudioClip::new(downsampled, target_rate, clip.channels)
}

/// Convert stereo to mono by summing channels
fn stereo_to_mono(clip: AudioClip) -> AudioClip {
    if clip.channels == 1 {
        return clip;
    }

    if clip.channels != 2 {
        return clip; // Only support stereo -> mono
    }

    let mut mono_samples = Vec::with_capacity(clip.samples.len() / 2);

    // Sum left and right channels (no division to preserve volume)
    for chunk in clip.samples.chunks_exact(2) {
        let left = chunk[0] as i32;
        let right = chunk[1] as i32;
        let sum = left + right;
        mono_samples.push(sum.clamp(i16::MIN as i32, i16::MAX as i32) as i16);
    }

    AudioClip::new(mono_samples, clip.sample_rate, 1)
}
