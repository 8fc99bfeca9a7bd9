//! Audio pipeline: uploaded file → decode → downmix → resample to 16 kHz.
//!
//! # Pipeline
//!
//! ```text
//! file on disk → symphonia format detection and decode → stereo_to_mono → resample_to_16k
//!              → Vec<f32> @ 16 kHz (Whisper input)
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use notefy::audio::load_for_whisper;
//!
//! let samples = load_for_whisper(Path::new("lecture.mp3")).unwrap();
//! println!("{} samples @ 16 kHz", samples.len());
//! ```

pub mod decode;
pub mod resample;

pub use decode::{decode_file, load_for_whisper, AudioError, DecodedAudio};
pub use resample::{resample_to_16k, stereo_to_mono, TARGET_SAMPLE_RATE};
