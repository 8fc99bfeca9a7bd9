//! Note styles and prompt composition.
//!
//! [`NoteStyle`] is the closed set of personalisation options offered by the
//! interface.  Each style maps to one fixed instruction string; the table is
//! a compile-time constant and never changes at runtime.
//!
//! [`compose`] joins an instruction with the extracted text:
//!
//! ```text
//! {template}
//!
//! Content:
//! {body}
//! ```
//!
//! No escaping, truncation or length limiting is applied to `body`.

use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Instruction templates
// ---------------------------------------------------------------------------

const SHORT_NOTES: &str =
    "Generate short notes based on the content. Provide a crisp summary of the content as well.";

const DETAILED_NOTES: &str = "Generate detailed notes based on the content. List the sub headings clearly and in bulleted form.";

const QUESTION_ANSWERS: &str = "Generate 5 short answer based questions from the content. Give a question followed by its answer in upto 100 words.";

const COLOUR_CODED: &str = "Generate color coded notes for the content, put headings in bold and contrasting color for the content. Use emojis to color code.";

// ---------------------------------------------------------------------------
// NoteStyle
// ---------------------------------------------------------------------------

/// One of the four fixed note styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NoteStyle {
    /// Crisp summary plus short notes.
    #[default]
    ShortNotes,
    /// Sub-headed, bulleted outline.
    DetailedNotes,
    /// Five short-answer questions with answers.
    QuestionAnswers,
    /// Bold headings, emoji colour coding.
    ColourCoded,
}

impl NoteStyle {
    /// All styles in display order.
    pub const ALL: [NoteStyle; 4] = [
        NoteStyle::ShortNotes,
        NoteStyle::DetailedNotes,
        NoteStyle::QuestionAnswers,
        NoteStyle::ColourCoded,
    ];

    /// Human-readable label shown in the style selector.
    pub fn label(self) -> &'static str {
        match self {
            NoteStyle::ShortNotes => "Short Notes",
            NoteStyle::DetailedNotes => "Detailed Notes",
            NoteStyle::QuestionAnswers => "Question Answers",
            NoteStyle::ColourCoded => "Colour Coded",
        }
    }

    /// Short identifier used on the command line and in form values.
    pub fn key(self) -> &'static str {
        match self {
            NoteStyle::ShortNotes => "short",
            NoteStyle::DetailedNotes => "detailed",
            NoteStyle::QuestionAnswers => "qa",
            NoteStyle::ColourCoded => "colour",
        }
    }

    /// The fixed instruction prepended to the extracted text.
    pub fn template(self) -> &'static str {
        match self {
            NoteStyle::ShortNotes => SHORT_NOTES,
            NoteStyle::DetailedNotes => DETAILED_NOTES,
            NoteStyle::QuestionAnswers => QUESTION_ANSWERS,
            NoteStyle::ColourCoded => COLOUR_CODED,
        }
    }

    /// Compose the full prompt for `body` in this style.
    pub fn prompt_for(self, body: &str) -> String {
        compose(self.template(), body)
    }
}

impl fmt::Display for NoteStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Returned when a string names none of the four styles.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown note style `{0}` (expected one of: short, detailed, qa, colour)")]
pub struct UnknownStyle(pub String);

impl FromStr for NoteStyle {
    type Err = UnknownStyle;

    /// Accepts either the [`key`](NoteStyle::key) or the
    /// [`label`](NoteStyle::label), ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        NoteStyle::ALL
            .into_iter()
            .find(|style| {
                style.key().eq_ignore_ascii_case(wanted)
                    || style.label().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| UnknownStyle(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// compose
// ---------------------------------------------------------------------------

/// Join a style instruction and extracted text into one prompt.
///
/// ```rust
/// use notefy::llm::compose;
///
/// assert_eq!(compose("Summarise.", "text"), "Summarise.\n\nContent:\ntext");
/// ```
pub fn compose(template: &str, body: &str) -> String {
    let mut prompt = String::with_capacity(template.len() + body.len() + 11);
    prompt.push_str(template);
    prompt.push_str("\n\nContent:\n");
    prompt.push_str(body);
    prompt
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compose_uses_fixed_layout() {
        assert_eq!(compose("T", "B"), "T\n\nContent:\nB");
    }

    #[test]
    fn compose_preserves_every_template_verbatim() {
        let body = "Photosynthesis converts light into chemical energy.";
        for style in NoteStyle::ALL {
            let prompt = style.prompt_for(body);
            assert!(
                prompt.starts_with(style.template()),
                "{style} prompt lost its preamble"
            );
            assert!(prompt.ends_with(body));
            assert_eq!(prompt.len(), style.template().len() + 11 + body.len());
        }
    }

    #[test]
    fn compose_does_not_escape_or_truncate() {
        let body = "<b>{braces}</b>\n".repeat(10_000);
        let prompt = compose(NoteStyle::DetailedNotes.template(), &body);
        assert!(prompt.ends_with(&body));
    }

    #[test]
    fn exactly_four_styles_with_distinct_labels() {
        assert_eq!(NoteStyle::ALL.len(), 4);
        let labels: std::collections::HashSet<_> =
            NoteStyle::ALL.iter().map(|s| s.label()).collect();
        assert_eq!(labels.len(), 4);
    }

    #[test]
    fn templates_match_fixed_text() {
        assert_eq!(
            NoteStyle::QuestionAnswers.template(),
            "Generate 5 short answer based questions from the content. Give a question followed by its answer in upto 100 words."
        );
        assert!(NoteStyle::ColourCoded.template().ends_with("Use emojis to color code."));
    }

    #[test]
    fn parses_keys_and_labels() {
        assert_eq!("qa".parse::<NoteStyle>().unwrap(), NoteStyle::QuestionAnswers);
        assert_eq!(
            " detailed notes ".parse::<NoteStyle>().unwrap(),
            NoteStyle::DetailedNotes
        );
        assert_eq!("Colour Coded".parse::<NoteStyle>().unwrap(), NoteStyle::ColourCoded);
        for style in NoteStyle::ALL {
            assert_eq!(style.key().parse::<NoteStyle>().unwrap(), style);
            assert_eq!(style.label().parse::<NoteStyle>().unwrap(), style);
        }
    }

    #[test]
    fn rejects_unknown_style() {
        let err = "limerick".parse::<NoteStyle>().unwrap_err();
        assert_eq!(err, UnknownStyle("limerick".into()));
    }

    #[test]
    fn default_is_short_notes() {
        assert_eq!(NoteStyle::default(), NoteStyle::ShortNotes);
    }
}
