//! Upload classification and text extraction.
//!
//! ```text
//!  UploadedFile ──▶ FileKind::detect(mime, filename)
//!                        │
//!          ┌─────────────┼──────────────┐
//!          ▼             ▼              ▼
//!         Pdf           Mp3           None
//!          │             │        (unsupported)
//!   pdf::extract_   audio::transcribe_
//!    pdf_text         upload (temp file
//!          │          + SttEngine)
//!          └──────┬──────┘
//!                 ▼
//!           plain text body
//! ```
//!
//! Extraction is synchronous and CPU-bound; callers running on an async
//! runtime should wrap [`Extractor::extract`] in `spawn_blocking`.

pub mod audio;
pub mod pdf;

use std::fmt;
use std::sync::Arc;

use crate::stt::{SttEngine, SttError};

pub use audio::transcribe_upload;
pub use pdf::extract_pdf_text;

// ---------------------------------------------------------------------------
// UploadedFile
// ---------------------------------------------------------------------------

/// A file received from the user, held in memory.
#[derive(Debug, Clone, Default)]
pub struct UploadedFile {
    pub bytes: Vec<u8>,
    pub filename: String,
    /// MIME type as reported by the client; may be empty.
    pub mime: String,
}

impl UploadedFile {
    pub fn new(bytes: Vec<u8>, filename: impl Into<String>, mime: impl Into<String>) -> Self {
        Self {
            bytes,
            filename: filename.into(),
            mime: mime.into(),
        }
    }

    /// Classify this upload.  See [`FileKind::detect`].
    pub fn kind(&self) -> Option<FileKind> {
        FileKind::detect(&self.mime, &self.filename)
    }
}

// ---------------------------------------------------------------------------
// FileKind
// ---------------------------------------------------------------------------

/// The two accepted upload kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    Pdf,
    Mp3,
}

impl FileKind {
    /// Decide the kind from the MIME type or, failing that, the extension.
    ///
    /// PDF is checked first.  The MIME comparison is exact
    /// (`application/pdf`, `audio/mpeg`); the extension comparison ignores
    /// ASCII case.  Anything else is `None`.
    pub fn detect(mime: &str, filename: &str) -> Option<FileKind> {
        let mime = mime.trim();
        if mime == "application/pdf" || has_extension(filename, "pdf") {
            Some(FileKind::Pdf)
        } else if mime == "audio/mpeg" || has_extension(filename, "mp3") {
            Some(FileKind::Mp3)
        } else {
            None
        }
    }

    /// Word used in user-facing error messages ("Error processing PDF: …").
    pub fn noun(self) -> &'static str {
        match self {
            FileKind::Pdf => "PDF",
            FileKind::Mp3 => "audio",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.noun())
    }
}

fn has_extension(filename: &str, ext: &str) -> bool {
    let Some(dot) = filename.len().checked_sub(ext.len() + 1) else {
        return false;
    };
    filename.is_char_boundary(dot)
        && filename[dot..].starts_with('.')
        && filename[dot + 1..].eq_ignore_ascii_case(ext)
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors produced while turning an upload into text.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The PDF loaded but contains no text (e.g. scanned images only).
    #[error("Could not extract text from the PDF.")]
    NoExtractableText,

    /// The PDF could not be parsed.
    #[error("{0}")]
    Pdf(String),

    /// Writing the temporary audio file failed.
    #[error("temporary file: {0}")]
    TempFile(String),

    /// Decoding or transcription failed.
    #[error(transparent)]
    Audio(#[from] SttError),
}

// ---------------------------------------------------------------------------
// Extractor
// ---------------------------------------------------------------------------

/// Dispatches an upload to the right extractor.
#[derive(Clone)]
pub struct Extractor {
    stt: Arc<dyn SttEngine>,
}

impl Extractor {
    pub fn new(stt: Arc<dyn SttEngine>) -> Self {
        Self { stt }
    }

    /// Extract the text body of `bytes` treated as `kind`.
    ///
    /// Blocking: PDF parsing and speech recognition both run on the calling
    /// thread.
    pub fn extract(&self, kind: FileKind, bytes: &[u8]) -> Result<String, ExtractError> {
        match kind {
            FileKind::Pdf => extract_pdf_text(bytes),
            FileKind::Mp3 => transcribe_upload(self.stt.as_ref(), bytes),
        }
    }
}

impl fmt::Debug for Extractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Extractor").finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stt::MockSttEngine;

    #[test]
    fn detects_by_mime() {
        assert_eq!(FileKind::detect("application/pdf", "blob"), Some(FileKind::Pdf));
        assert_eq!(FileKind::detect("audio/mpeg", "blob"), Some(FileKind::Mp3));
    }

    #[test]
    fn detects_by_extension_when_mime_is_generic() {
        let generic = "application/octet-stream";
        assert_eq!(FileKind::detect(generic, "lecture.pdf"), Some(FileKind::Pdf));
        assert_eq!(FileKind::detect(generic, "LECTURE.PDF"), Some(FileKind::Pdf));
        assert_eq!(FileKind::detect("", "talk.mp3"), Some(FileKind::Mp3));
    }

    #[test]
    fn bare_extension_names_are_routed() {
        assert_eq!(FileKind::detect("", ".pdf"), Some(FileKind::Pdf));
        assert_eq!(FileKind::detect("", ".mp3"), Some(FileKind::Mp3));
    }

    #[test]
    fn pdf_wins_over_mp3() {
        assert_eq!(FileKind::detect("audio/mpeg", "slides.pdf"), Some(FileKind::Pdf));
        assert_eq!(FileKind::detect("application/pdf", "talk.mp3"), Some(FileKind::Pdf));
    }

    #[test]
    fn rejects_other_types() {
        assert_eq!(FileKind::detect("text/plain", "notes.txt"), None);
        assert_eq!(FileKind::detect("audio/wav", "talk.wav"), None);
        assert_eq!(FileKind::detect("", "pdf"), None);
        assert_eq!(FileKind::detect("", "talkmp3"), None);
        assert_eq!(FileKind::detect("", "archive.pdf.zip"), None);
    }

    #[test]
    fn nouns_for_messages() {
        assert_eq!(FileKind::Pdf.noun(), "PDF");
        assert_eq!(FileKind::Mp3.to_string(), "audio");
    }

    #[test]
    fn no_text_error_message_is_literal() {
        assert_eq!(
            ExtractError::NoExtractableText.to_string(),
            "Could not extract text from the PDF."
        );
    }

    #[test]
    fn extractor_routes_pdf_to_pdf_parser() {
        let stt = Arc::new(MockSttEngine::ok("unused"));
        let extractor = Extractor::new(stt.clone());
        let bytes = pdf::tests::pdf_with_pages(&["Routing works"]);

        let text = extractor.extract(FileKind::Pdf, &bytes).unwrap();
        assert!(text.contains("Routing works"));
        assert!(stt.seen_paths().is_empty());
    }

    #[test]
    fn extractor_routes_mp3_to_stt() {
        let stt = Arc::new(MockSttEngine::ok("spoken words"));
        let extractor = Extractor::new(stt.clone());

        let text = extractor.extract(FileKind::Mp3, b"fake").unwrap();
        assert_eq!(text, "spoken words");
        assert_eq!(stt.seen_paths().len(), 1);
    }

    #[test]
    fn uploaded_file_kind_uses_both_fields() {
        let upload = UploadedFile::new(vec![], "x.bin", "audio/mpeg");
        assert_eq!(upload.kind(), Some(FileKind::Mp3));
    }
}
