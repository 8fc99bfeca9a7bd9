//! Transcription parameter types and result types.
//!
//! [`TranscribeParams`] carries all settings that control a single Whisper
//! inference run.  [`TranscriptionResult`] is what every
//! [`SttEngine`](crate::stt::SttEngine) returns; only its `text` field feeds
//! the note generator, the rest is auxiliary.

use crate::config::SttConfig;

// ---------------------------------------------------------------------------
// TranscribeParams
// ---------------------------------------------------------------------------

/// All parameters for a single Whisper transcription run.
///
/// ```
/// use notefy::stt::TranscribeParams;
///
/// let params = TranscribeParams {
///     language: "en".into(),
///     ..TranscribeParams::default()
/// };
/// assert_eq!(params.language, "en");
/// ```
#[derive(Debug, Clone)]
pub struct TranscribeParams {
    /// ISO-639-1 language code (e.g. `"en"`), or `"auto"` to let Whisper
    /// detect the language.
    pub language: String,

    /// Candidates evaluated per step of greedy decoding.  1 is fastest.
    pub best_of: i32,

    /// Number of CPU threads handed to Whisper.
    pub n_threads: i32,
}

impl Default for TranscribeParams {
    fn default() -> Self {
        Self {
            language: "auto".into(),
            best_of: 1,
            n_threads: optimal_threads(),
        }
    }
}

impl TranscribeParams {
    /// Derive parameters from the `[stt]` config section.
    pub fn from_config(config: &SttConfig) -> Self {
        Self {
            language: config.language.clone(),
            n_threads: config.n_threads.unwrap_or_else(optimal_threads).max(1),
            ..Self::default()
        }
    }
}

/// Returns the number of CPU threads to use for inference, capped at 8.
pub(crate) fn optimal_threads() -> i32 {
    std::thread::available_parallelism()
        .map(|n| n.get().min(8) as i32)
        .unwrap_or(4)
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// The output of a successful transcription.
#[derive(Debug, Clone, Default)]
pub struct TranscriptionResult {
    /// Full concatenated transcript text, trimmed.
    pub text: String,

    /// Individual time-aligned segments produced by Whisper.
    pub segments: Vec<Segment>,

    /// Wall-clock time the inference took, in milliseconds.
    pub duration_ms: u128,
}

/// A single time-aligned text chunk produced by Whisper.
#[derive(Debug, Clone)]
pub struct Segment {
    /// Segment text.
    pub text: String,
    /// Segment start time in milliseconds from the start of the audio.
    pub start_ms: u64,
    /// Segment end time in milliseconds from the start of the audio.
    pub end_ms: u64,
}
