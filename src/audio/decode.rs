//! Decoding uploaded audio files to mono PCM.
//!
//! [`decode_file`] detects the container with symphonia (MP3 plus the
//! royalty-free default formats), decodes the first audio track and downmixes
//! it to mono `f32`.  [`load_for_whisper`] additionally resamples to 16 kHz,
//! which is what [`WhisperEngine`](crate::stt::WhisperEngine) consumes.

use std::fs::File;
use std::path::Path;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use thiserror::Error;

use super::resample::{resample_to_16k, stereo_to_mono, TARGET_SAMPLE_RATE};

// ---------------------------------------------------------------------------
// AudioError
// ---------------------------------------------------------------------------

/// Errors raised while turning an audio file into Whisper-ready samples.
#[derive(Debug, Clone, Error)]
pub enum AudioError {
    /// The file could not be opened.
    #[error("could not open audio file: {0}")]
    Open(String),

    /// No format reader recognised the container.
    #[error("unsupported audio format: {0}")]
    UnsupportedFormat(String),

    /// The container holds no decodable audio track.
    #[error("no audio track found")]
    NoAudioTrack,

    /// The codec failed on the stream.
    #[error("audio decode failed: {0}")]
    Decode(String),

    /// A stream reported a sample rate that cannot be resampled.
    #[error("invalid sample rate: {0} Hz")]
    InvalidSampleRate(u32),

    /// The resampler rejected its configuration or input.
    #[error("resampling failed: {0}")]
    Resample(String),
}

// ---------------------------------------------------------------------------
// DecodedAudio
// ---------------------------------------------------------------------------

/// Mono PCM produced by [`decode_file`].
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    /// Mono samples in `[-1.0, 1.0]`.
    pub samples: Vec<f32>,
    /// Native sample rate of the source stream.
    pub sample_rate: u32,
    /// Channel count of the source stream before downmixing.
    pub channels: u16,
}

impl DecodedAudio {
    /// Playback length in seconds.
    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

// ---------------------------------------------------------------------------
// decode_file
// ---------------------------------------------------------------------------

/// Decode the first audio track of `path` into mono samples at the source
/// sample rate.
///
/// Corrupt packets are skipped with a warning; the stream ends at EOF.
pub fn decode_file(path: &Path) -> Result<DecodedAudio, AudioError> {
    let file = File::open(path).map_err(|e| AudioError::Open(e.to_string()))?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let detected = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| AudioError::UnsupportedFormat(e.to_string()))?;
    let mut format = detected.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or(AudioError::NoAudioTrack)?;
    let track_id = track.id;
    let mut sample_rate = track.codec_params.sample_rate.unwrap_or(0);
    let mut channels = track
        .codec_params
        .channels
        .map(|c| c.count() as u16)
        .unwrap_or(0);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| AudioError::UnsupportedFormat(e.to_string()))?;

    let mut samples: Vec<f32> = Vec::new();
    let mut skipped_packets = 0usize;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(SymphoniaError::ResetRequired) => {
                log::warn!("audio: stream reset requested; stopping at {} samples", samples.len());
                break;
            }
            Err(e) => return Err(AudioError::Decode(e.to_string())),
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                sample_rate = spec.rate;
                channels = spec.channels.count() as u16;

                let mut buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
                buf.copy_interleaved_ref(decoded);
                samples.extend(stereo_to_mono(buf.samples(), channels));
            }
            Err(SymphoniaError::DecodeError(e)) => {
                skipped_packets += 1;
                log::debug!("audio: skipping corrupt packet: {e}");
            }
            Err(e) => return Err(AudioError::Decode(e.to_string())),
        }
    }

    if skipped_packets > 0 {
        log::warn!("audio: skipped {skipped_packets} corrupt packet(s) in {}", path.display());
    }

    Ok(DecodedAudio {
        samples,
        sample_rate,
        channels,
    })
}

/// Decode `path` and convert it to 16 kHz mono, ready for Whisper.
pub fn load_for_whisper(path: &Path) -> Result<Vec<f32>, AudioError> {
    let decoded = decode_file(path)?;
    log::debug!(
        "audio: decoded {:.1}s ({} Hz, {} ch) from {}",
        decoded.duration_secs(),
        decoded.sample_rate,
        decoded.channels,
        path.display()
    );

    if decoded.samples.is_empty() || decoded.sample_rate == TARGET_SAMPLE_RATE {
        return Ok(decoded.samples);
    }
    resample_to_16k(&decoded.samples, decoded.sample_rate)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
