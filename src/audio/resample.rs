//! Audio resampling and channel mixing utilities.
//!
//! The Whisper STT engine requires **16 kHz mono `f32`** audio.  This module
//! provides the two conversion steps applied to every decoded upload:
//!
//! 1. [`stereo_to_mono`]: downmix any number of interleaved channels to mono.
//! 2. [`resample_to_16k`]: resample from any source rate to 16 000 Hz with a
//!    band-limited sinc interpolator (`rubato::SincFixedIn`).

use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};

use super::decode::AudioError;

/// Sample rate Whisper expects.
pub const TARGET_SAMPLE_RATE: u32 = 16_000;

/// Frames fed to the resampler per `process` call.
const CHUNK_FRAMES: usize = 1024;

// ---------------------------------------------------------------------------
// stereo_to_mono
// ---------------------------------------------------------------------------

/// Mix interleaved multi-channel audio down to mono by averaging all channels.
///
/// The output length is `samples.len() / channels`.
///
/// * If `channels == 1` the input slice is returned as an owned `Vec`.
/// * If `channels == 0` an empty vector is returned.
///
/// # Example
///
/// ```rust
/// use notefy::audio::stereo_to_mono;
///
/// let stereo = vec![0.5_f32, -0.5, 0.2, -0.2]; // L R L R
/// let mono = stereo_to_mono(&stereo, 2);
/// assert_eq!(mono.len(), 2);
/// assert!((mono[0] - 0.0).abs() < 1e-6);
/// assert!((mono[1] - 0.0).abs() < 1e-6);
/// ```
pub fn stereo_to_mono(samples: &[f32], channels: u16) -> Vec<f32> {
    match channels {
        0 => Vec::new(),
        1 => samples.to_vec(),
        n => {
            let n = n as usize;
            samples
                .chunks_exact(n)
                .map(|frame| frame.iter().sum::<f32>() / n as f32)
                .collect()
        }
    }
}

// ---------------------------------------------------------------------------
// resample_to_16k
// ---------------------------------------------------------------------------

/// Resample mono `samples` from `source_rate` Hz to 16 000 Hz.
///
/// * If `source_rate` is already `16_000` the input is returned unchanged.
/// * If `samples` is empty an empty vector is returned.
///
/// The resampler's group delay is flushed and trimmed, so the output length
/// is exactly `ceil(samples.len() * 16_000 / source_rate)`.
///
/// # Errors
///
/// [`AudioError::InvalidSampleRate`] for a zero source rate,
/// [`AudioError::Resample`] when rubato rejects the configuration.
pub fn resample_to_16k(samples: &[f32], source_rate: u32) -> Result<Vec<f32>, AudioError> {
    if source_rate == TARGET_SAMPLE_RATE {
        return Ok(samples.to_vec());
    }
    if source_rate == 0 {
        return Err(AudioError::InvalidSampleRate(source_rate));
    }
    if samples.is_empty() {
        return Ok(Vec::new());
    }

    let ratio = TARGET_SAMPLE_RATE as f64 / source_rate as f64;
    let expected = (samples.len() as f64 * ratio).ceil() as usize;

    let params = SincInterpolationParameters {
        sinc_len: 128,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 128,
        window: WindowFunction::BlackmanHarris2,
    };
    let mut resampler = SincFixedIn::<f32>::new(ratio, 1.0, params, CHUNK_FRAMES, 1)
        .map_err(|e| AudioError::Resample(e.to_string()))?;

    let delay = resampler.output_delay();
    let mut output: Vec<f32> = Vec::with_capacity(expected + delay);

    let mut chunks = samples.chunks_exact(CHUNK_FRAMES);
    for chunk in &mut chunks {
        let out = resampler
            .process(&[chunk][..], None)
            .map_err(|e| AudioError::Resample(e.to_string()))?;
        output.extend_from_slice(&out[0]);
    }

    let rest = chunks.remainder();
    if !rest.is_empty() {
        let out = resampler
            .process_partial(Some(&[rest][..]), None)
            .map_err(|e| AudioError::Resample(e.to_string()))?;
        output.extend_from_slice(&out[0]);
    }

    // Flush the filter tail until the delayed signal is fully out.
    while output.len() < delay + expected {
        let out = resampler
            .process_partial::<&[f32]>(None, None)
            .map_err(|e| AudioError::Resample(e.to_string()))?;
        if out[0].is_empty() {
            break;
        }
        output.extend_from_slice(&out[0]);
    }

    output.drain(..delay.min(output.len()));
    output.resize(expected, 0.0);
    Ok(output)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
