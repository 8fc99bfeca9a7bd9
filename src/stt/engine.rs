//! Core STT engine trait and implementations.
//!
//! # Overview
//!
//! [`SttEngine`] is the interface the extractor uses.  It is object-safe and
//! `Send + Sync` so it can be held behind an `Arc<dyn SttEngine>` and shared
//! by every request.  Input is an audio **file path**; output is a
//! [`TranscriptionResult`] of which callers only need the `text`.
//!
//! [`WhisperEngine`] is the production implementation that wraps a
//! `whisper_rs::WhisperContext`.  Construct it with [`WhisperEngine::load`].
//!
//! [`MockSttEngine`] (available under `#[cfg(test)]`) returns a
//! pre-configured response and records every path it was handed.

use std::path::Path;

use thiserror::Error;
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::audio::{self, AudioError};
use crate::stt::transcribe::{Segment, TranscribeParams, TranscriptionResult};

// ---------------------------------------------------------------------------
// SttError
// ---------------------------------------------------------------------------

/// All errors that can arise from the STT subsystem.
#[derive(Debug, Clone, Error)]
pub enum SttError {
    /// The GGML model file was not found at the given path.
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// `whisper_rs` failed to initialise a `WhisperContext` or `WhisperState`.
    #[error("Whisper context initialisation failed: {0}")]
    ContextInit(String),

    /// The audio file could not be decoded.
    #[error(transparent)]
    Audio(#[from] AudioError),

    /// The file decoded to zero samples.
    #[error("Audio file contains no samples")]
    EmptyAudio,

    /// An error occurred during the inference pass.
    #[error("Transcription error: {0}")]
    Transcription(String),
}

// ---------------------------------------------------------------------------
// SttEngine trait
// ---------------------------------------------------------------------------

/// Object-safe, thread-safe interface for speech-to-text engines.
///
/// Calls block for the duration of decoding and inference; async callers
/// run them on `tokio::task::spawn_blocking`.
pub trait SttEngine: Send + Sync {
    /// Transcribe the audio file at `audio_path`.
    fn transcribe(&self, audio_path: &Path) -> Result<TranscriptionResult, SttError>;
}

// Compile-time assertion: Box<dyn SttEngine> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn SttEngine>) {}
};

// ---------------------------------------------------------------------------
// WhisperEngine
// ---------------------------------------------------------------------------

/// Production STT engine that wraps a `whisper_rs::WhisperContext`.
///
/// A new `WhisperState` is created for every call so the engine can be
/// shared across requests without any locking.
pub struct WhisperEngine {
    ctx: WhisperContext,
    params: TranscribeParams,
}

impl std::fmt::Debug for WhisperEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhisperEngine")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

// SAFETY: WhisperContext is Send+Sync as declared by whisper-rs; the model
// weights are read-only after loading.
unsafe impl Send for WhisperEngine {}
unsafe impl Sync for WhisperEngine {}

impl WhisperEngine {
    /// Load a GGML model from `model_path` and prepare it for inference.
    ///
    /// # Errors
    ///
    /// - [`SttError::ModelNotFound`]: `model_path` does not exist.
    /// - [`SttError::ContextInit`]: whisper-rs failed to load the file.
    pub fn load(model_path: impl AsRef<Path>, params: TranscribeParams) -> Result<Self, SttError> {
        let path = model_path.as_ref();

        if !path.exists() {
            return Err(SttError::ModelNotFound(path.display().to_string()));
        }

        let path_str = path.to_str().ok_or_else(|| {
            SttError::ModelNotFound(format!(
                "model path contains non-UTF-8 characters: {}",
                path.display()
            ))
        })?;

        let ctx = WhisperContext::new_with_params(path_str, WhisperContextParameters::default())
            .map_err(|e| SttError::ContextInit(e.to_string()))?;

        Ok(Self { ctx, params })
    }

    /// Transcribe 16 kHz mono `f32` samples.
    pub fn transcribe_samples(&self, audio: &[f32]) -> Result<TranscriptionResult, SttError> {
        if audio.is_empty() {
            return Err(SttError::EmptyAudio);
        }

        let mut fp = FullParams::new(SamplingStrategy::Greedy {
            best_of: self.params.best_of,
        });

        // `fp` borrows the language string until `state.full` returns.
        let lang: Option<&str> = if self.params.language == "auto" {
            None
        } else {
            Some(self.params.language.as_str())
        };
        fp.set_language(lang);
        fp.set_n_threads(self.params.n_threads);
        fp.set_print_progress(false);
        fp.set_print_realtime(false);

        let mut state = self
            .ctx
            .create_state()
            .map_err(|e| SttError::ContextInit(e.to_string()))?;

        let wall_start = std::time::Instant::now();

        state
            .full(fp, audio)
            .map_err(|e| SttError::Transcription(e.to_string()))?;

        let n_segments = state
            .full_n_segments()
            .map_err(|e| SttError::Transcription(e.to_string()))?;

        let mut text = String::new();
        let mut segments: Vec<Segment> = Vec::with_capacity(n_segments.max(0) as usize);

        for i in 0..n_segments {
            let seg_text = state
                .full_get_segment_text(i)
                .map_err(|e| SttError::Transcription(format!("segment {i}: {e}")))?;

            // Timestamps are in centiseconds.
            let t0 = state.full_get_segment_t0(i).unwrap_or(0).max(0) as u64 * 10;
            let t1 = state.full_get_segment_t1(i).unwrap_or(0).max(0) as u64 * 10;

            text.push_str(&seg_text);
            segments.push(Segment {
                text: seg_text,
                start_ms: t0,
                end_ms: t1,
            });
        }

        Ok(TranscriptionResult {
            text: text.trim().to_string(),
            segments,
            duration_ms: wall_start.elapsed().as_millis(),
        })
    }
}

impl SttEngine for WhisperEngine {
    fn transcribe(&self, audio_path: &Path) -> Result<TranscriptionResult, SttError> {
        let samples = audio::load_for_whisper(audio_path)?;
        let result = self.transcribe_samples(&samples)?;
        log::debug!(
            "stt: {} segment(s), {} chars in {} ms",
            result.segments.len(),
            result.text.len(),
            result.duration_ms
        );
        Ok(result)
    }
}

// ---------------------------------------------------------------------------
// MockSttEngine  (test-only)
// ---------------------------------------------------------------------------

/// A test double that returns a pre-configured response without loading any
/// model file.  Every call records the path it was given; the call fails if
/// that path does not exist at call time.
#[cfg(test)]
pub struct MockSttEngine {
    response: Result<String, SttError>,
    seen: std::sync::Mutex<Vec<std::path::PathBuf>>,
}

#[cfg(test)]
impl MockSttEngine {
    /// Create a mock that always returns `Ok(text)`.
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            response: Ok(text.into()),
            seen: Default::default(),
        }
    }

    /// Create a mock that always returns `Err(error)`.
    pub fn err(error: SttError) -> Self {
        Self {
            response: Err(error),
            seen: Default::default(),
        }
    }

    /// Paths handed to [`SttEngine::transcribe`], in call order.
    pub fn seen_paths(&self) -> Vec<std::path::PathBuf> {
        self.seen.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl SttEngine for MockSttEngine {
    fn transcribe(&self, audio_path: &Path) -> Result<TranscriptionResult, SttError> {
        self.seen.lock().unwrap().push(audio_path.to_path_buf());
        if !audio_path.exists() {
            return Err(SttError::Transcription(format!(
                "audio file missing: {}",
                audio_path.display()
            )));
        }
        self.response.clone().map(|text| TranscriptionResult {
            text,
            ..TranscriptionResult::default()
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
