//! Server-rendered HTML for the single Note-fy page.
//!
//! The page is rebuilt on every request from a [`PageView`].  All dynamic
//! text (file name, MIME type, generated notes) is HTML-escaped; the notes
//! are otherwise shown verbatim in a `pre-wrap` panel.

use crate::llm::NoteStyle;

/// Shown whenever no file accompanies the request.
pub const NO_FILE_NOTICE: &str = "Please select a file!!";

/// Busy-indicator text displayed while a submission is in flight.
pub const BUSY_TEXT: &str = "Processing... This may take a few moments.";

/// Metadata and output for a processed upload.
#[derive(Debug, Clone)]
pub struct ResultView<'a> {
    pub filename: &'a str,
    pub file_type: &'a str,
    pub output: &'a str,
}

/// Everything that varies between renders of the page.
#[derive(Debug, Clone, Default)]
pub struct PageView<'a> {
    pub selected: NoteStyle,
    pub result: Option<ResultView<'a>>,
}

impl<'a> PageView<'a> {
    /// The initial page: nothing uploaded yet.
    pub fn empty(selected: NoteStyle) -> Self {
        Self {
            selected,
            result: None,
        }
    }

    pub fn with_result(selected: NoteStyle, result: ResultView<'a>) -> Self {
        Self {
            selected,
            result: Some(result),
        }
    }
}

/// Render the complete HTML document.
pub fn render(view: &PageView<'_>) -> String {
    let mut html = String::with_capacity(8 * 1024);
    html.push_str(HEAD);

    // ── Sidebar: style selector ─────────────────────────────────────────
    html.push_str("<form id=\"notes-form\" method=\"post\" action=\"/notes\" enctype=\"multipart/form-data\">\n");
    html.push_str("<aside class=\"sidebar\">\n<h2>Choose personalization:</h2>\n");
    for style in NoteStyle::ALL {
        let checked = if style == view.selected { " checked" } else { "" };
        html.push_str(&format!(
            "<label class=\"style\"><input type=\"radio\" name=\"style\" value=\"{}\"{checked}> {}</label>\n",
            style.key(),
            html_escape::encode_text(style.label()),
        ));
    }
    html.push_str("</aside>\n");

    // ── Main column ─────────────────────────────────────────────────────
    html.push_str("<main>\n<h1>Note-fy</h1>\n");
    html.push_str(
        "<input type=\"file\" name=\"file\" accept=\".pdf,.mp3,application/pdf,audio/mpeg\">\n",
    );
    html.push_str("<p class=\"hint\">(Select options from sidebar to personalize your notes)</p>\n");
    html.push_str("<button type=\"submit\" id=\"submit\">Submit</button>\n");
    html.push_str(&format!(
        "<p class=\"busy\" id=\"busy\" hidden>{BUSY_TEXT}</p>\n"
    ));

    match &view.result {
        None => {
            html.push_str(&format!("<p class=\"notice\">{NO_FILE_NOTICE}</p>\n"));
        }
        Some(result) => render_result(&mut html, result),
    }

    html.push_str("</main>\n</form>\n");
    html.push_str(TAIL);
    html
}

fn render_result(html: &mut String, result: &ResultView<'_>) {
    html.push_str("<h3>Uploaded File:</h3>\n<table class=\"meta\">\n");
    html.push_str(&format!(
        "<tr><th>Filename</th><td>{}</td></tr>\n",
        html_escape::encode_text(result.filename)
    ));
    html.push_str(&format!(
        "<tr><th>FileType</th><td>{}</td></tr>\n",
        html_escape::encode_text(result.file_type)
    ));
    html.push_str("</table>\n");

    html.push_str("<h3>Output:</h3>\n<div class=\"output\">");
    html.push_str(&html_escape::encode_text(result.output));
    html.push_str("</div>\n");

    // Display only; the value is never submitted anywhere.
    html.push_str(
        "<label class=\"rating\">Satisfaction level \
         <input type=\"range\" min=\"0\" max=\"5\" step=\"1\" value=\"0\" \
         oninput=\"this.nextElementSibling.textContent=this.value\"><output>0</output></label>\n",
    );
}

const HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>Note-fy</title>
  <style>
    * { box-sizing: border-box; }
    body { margin: 0; font-family: system-ui, sans-serif; color: #1f2937; }
    form { display: flex; min-height: 100vh; }
    .sidebar { width: 240px; padding: 24px; background: #f3f4f6; }
    .sidebar .style { display: block; margin: 8px 0; }
    main { flex: 1; padding: 24px 48px; max-width: 960px; }
    .hint { color: #6b7280; font-size: 14px; }
    .busy { color: #2563eb; }
    .notice { font-weight: 600; }
    .meta th { text-align: left; padding-right: 16px; }
    .output {
      border: 1px solid #d1d5db; border-radius: 8px; padding: 16px;
      white-space: pre-wrap; word-wrap: break-word;
    }
    .rating { display: block; margin-top: 24px; }
  </style>
</head>
<body>
"#;

const TAIL: &str = r#"<script>
  document.getElementById('notes-form').addEventListener('submit', function () {
    document.getElementById('busy').hidden = false;
    document.getElementById('submit').disabled = true;
  });
</script>
</body>
</html>
"#;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_page_has_controls_and_notice() {
        let html = render(&PageView::empty(NoteStyle::ShortNotes));
        assert!(html.contains("<h1>Note-fy</h1>"));
        assert!(html.contains("Choose personalization:"));
        assert!(html.contains("(Select options from sidebar to personalize your notes)"));
        assert!(html.contains(NO_FILE_NOTICE));
        assert!(html.contains(BUSY_TEXT));
        assert!(!html.contains("Uploaded File:"));
        for style in NoteStyle::ALL {
            assert!(html.contains(style.label()), "missing {style}");
        }
    }

    #[test]
    fn selected_style_is_checked() {
        let html = render(&PageView::empty(NoteStyle::QuestionAnswers));
        assert!(html.contains("value=\"qa\" checked"));
        assert!(!html.contains("value=\"short\" checked"));
    }

    #[test]
    fn result_shows_metadata_output_and_slider() {
        let view = PageView::with_result(
            NoteStyle::DetailedNotes,
            ResultView {
                filename: "bio.pdf",
                file_type: "application/pdf",
                output: "# Cells\n- nucleus",
            },
        );
        let html = render(&view);
        assert!(html.contains("Uploaded File:"));
        assert!(html.contains("<td>bio.pdf</td>"));
        assert!(html.contains("<td>application/pdf</td>"));
        assert!(html.contains("Output:"));
        assert!(html.contains("# Cells\n- nucleus"));
        assert!(html.contains("Satisfaction level"));
        assert!(html.contains("min=\"0\" max=\"5\""));
        assert!(!html.contains(NO_FILE_NOTICE));
    }

    #[test]
    fn dynamic_text_is_escaped() {
        let view = PageView::with_result(
            NoteStyle::ShortNotes,
            ResultView {
                filename: "<img src=x>.pdf",
                file_type: "application/pdf",
                output: "<script>alert(1)</script> & more",
            },
        );
        let html = render(&view);
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt; &amp; more"));
        assert!(html.contains("&lt;img src=x&gt;.pdf"));
    }
}
