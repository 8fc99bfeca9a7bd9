//! Audio upload → transcript.
//!
//! The uploaded bytes are written to a scoped temporary `.mp3` file so the
//! STT engine can read them by path.  The file is a
//! [`tempfile::NamedTempFile`] owned by [`transcribe_upload`]; it is removed
//! when that value drops, which happens on every return path.

use std::io::Write;

use crate::stt::SttEngine;

use super::ExtractError;

/// Suffix given to the temporary file; the decoder uses it as a format hint.
const TEMP_SUFFIX: &str = ".mp3";

/// Persist `bytes` to a temporary file, transcribe it and return only the
/// transcript text.
pub fn transcribe_upload(stt: &dyn SttEngine, bytes: &[u8]) -> Result<String, ExtractError> {
    let mut tmp = tempfile::Builder::new()
        .prefix("notefy-")
        .suffix(TEMP_SUFFIX)
        .tempfile()
        .map_err(|e| ExtractError::TempFile(e.to_string()))?;

    tmp.write_all(bytes)
        .and_then(|_| tmp.flush())
        .map_err(|e| ExtractError::TempFile(e.to_string()))?;

    log::debug!(
        "audio: wrote {} bytes to {}",
        bytes.len(),
        tmp.path().display()
    );

    let result = stt.transcribe(tmp.path())?;
    Ok(result.text)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
