//! Notes pipeline: upload → text → prompt → notes.
//!
//! [`NotesPipeline`] is a stateless linear sequence.  It holds only shared,
//! read-only collaborators, so one instance serves every request.
//!
//! # Pipeline flow
//!
//! ```text
//! UploadedFile + NoteStyle
//!   └─▶ FileKind::detect                       [None → UnsupportedFileType]
//!         └─▶ spawn_blocking(extractor.extract) [PDF parse | temp file + STT]
//!               └─▶ style.prompt_for(text)
//!                     └─▶ generator.generate (async)
//!                           └─▶ notes text
//! ```
//!
//! Every failure becomes a [`NotesError`]; [`NotesPipeline::process`] turns
//! it into the message shown to the user.

use std::sync::Arc;

use crate::extract::{ExtractError, Extractor, FileKind, UploadedFile};
use crate::llm::{NoteGenerator, NoteStyle};
use crate::stt::SttEngine;

// ---------------------------------------------------------------------------
// NotesError
// ---------------------------------------------------------------------------

/// Everything that can stop a submission from producing notes.
///
/// Extraction and generation failures are separate variants but render the
/// same way, prefixed with the kind of file being processed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotesError {
    #[error("Unsupported file type. Please upload a .pdf or .mp3 file.")]
    UnsupportedFileType,

    #[error("Error: Could not extract text from the PDF.")]
    NoExtractableText,

    /// Parsing, decoding or transcription failed.
    #[error("Error processing {kind}: {message}")]
    Extraction { kind: FileKind, message: String },

    /// The text-generation call failed.
    #[error("Error processing {kind}: {message}")]
    Generation { kind: FileKind, message: String },
}

impl NotesError {
    fn extraction(kind: FileKind, err: ExtractError) -> Self {
        match err {
            ExtractError::NoExtractableText => NotesError::NoExtractableText,
            other => NotesError::Extraction {
                kind,
                message: other.to_string(),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// NotesPipeline
// ---------------------------------------------------------------------------

/// Turns one upload and one style into notes.
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use notefy::extract::UploadedFile;
/// use notefy::llm::NoteStyle;
/// use notefy::pipeline::NotesPipeline;
///
/// # async fn example(
/// #     stt: Arc<dyn notefy::stt::SttEngine>,
/// #     generator: Arc<dyn notefy::llm::NoteGenerator>,
/// # ) {
/// let pipeline = NotesPipeline::new(stt, generator);
/// let upload = UploadedFile::new(std::fs::read("lecture.pdf").unwrap(), "lecture.pdf", "");
/// println!("{}", pipeline.process(&upload, NoteStyle::DetailedNotes).await);
/// # }
/// ```
#[derive(Clone)]
pub struct NotesPipeline {
    extractor: Extractor,
    generator: Arc<dyn NoteGenerator>,
}

impl NotesPipeline {
    pub fn new(stt: Arc<dyn SttEngine>, generator: Arc<dyn NoteGenerator>) -> Self {
        Self {
            extractor: Extractor::new(stt),
            generator,
        }
    }

    /// Run the pipeline and return the notes or the first error.
    pub async fn run(&self, upload: &UploadedFile, style: NoteStyle) -> Result<String, NotesError> {
        let Some(kind) = upload.kind() else {
            log::info!(
                "pipeline: rejected {:?} (mime {:?})",
                upload.filename,
                upload.mime
            );
            return Err(NotesError::UnsupportedFileType);
        };

        log::debug!(
            "pipeline: {} upload {:?}, {} bytes, style {}",
            kind,
            upload.filename,
            upload.bytes.len(),
            style.key()
        );

        // ── 1. Extraction (blocking → thread pool) ──────────────────────
        let extractor = self.extractor.clone();
        let bytes = upload.bytes.clone();
        let extracted = tokio::task::spawn_blocking(move || extractor.extract(kind, &bytes)).await;

        let text = match extracted {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                log::warn!("pipeline: {kind} extraction failed: {e}");
                return Err(NotesError::extraction(kind, e));
            }
            Err(e) => {
                log::error!("pipeline: extraction task failed: {e}");
                return Err(NotesError::Extraction {
                    kind,
                    message: e.to_string(),
                });
            }
        };

        log::debug!("pipeline: extracted {} chars", text.len());

        // ── 2. Generation ───────────────────────────────────────────────
        let prompt = style.prompt_for(&text);
        match self.generator.generate(&prompt).await {
            Ok(notes) => {
                log::info!(
                    "pipeline: {} notes ready ({} chars from {} prompt chars)",
                    style.key(),
                    notes.len(),
                    prompt.len()
                );
                Ok(notes)
            }
            Err(e) => {
                log::warn!("pipeline: generation failed: {e}");
                Err(NotesError::Generation {
                    kind,
                    message: e.to_string(),
                })
            }
        }
    }

    /// Run the pipeline and always return displayable text: the notes, or
    /// the message of whatever went wrong.
    pub async fn process(&self, upload: &UploadedFile, style: NoteStyle) -> String {
        self.run(upload, style)
            .await
            .unwrap_or_else(|e| e.to_string())
    }
}

impl std::fmt::Debug for NotesPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotesPipeline")
            .field("extractor", &self.extractor)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
