//! PDF text extraction via `lopdf`.
//!
//! Pages are visited in document order and their text is concatenated with
//! no separator and no page markers.  A page whose text cannot be decoded
//! (unsupported font encoding, broken content stream) is skipped with a
//! warning; if nothing at all comes out, the document is reported as having
//! no extractable text, which is what scanned image-only PDFs produce.

use lopdf::Document;

use super::ExtractError;

/// Extract the text of every page of the PDF in `bytes`.
///
/// # Errors
///
/// - [`ExtractError::Pdf`]: the bytes are not a loadable PDF.
/// - [`ExtractError::NoExtractableText`]: the PDF loaded but yielded only
///   whitespace.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let doc = Document::load_mem(bytes).map_err(|e| ExtractError::Pdf(e.to_string()))?;

    let pages = doc.get_pages();
    let mut text = String::new();
    let mut failed_pages = 0usize;

    for &page_num in pages.keys() {
        match doc.extract_text(&[page_num]) {
            Ok(page_text) => text.push_str(&page_text),
            Err(e) => {
                failed_pages += 1;
                log::warn!("pdf: could not extract text from page {page_num}: {e}");
            }
        }
    }

    log::debug!(
        "pdf: {} page(s), {} failed, {} chars extracted",
        pages.len(),
        failed_pages,
        text.len()
    );

    if text.trim().is_empty() {
        return Err(ExtractError::NoExtractableText);
    }
    Ok(text)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
