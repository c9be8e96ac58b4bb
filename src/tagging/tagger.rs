/*!
 * Marker insertion.
 *
 * Markers go in right to left, so inserting one never shifts the offsets of
 * the matches still waiting to be processed.
 */

use crate::tagging::markers::{self, FR_SUFFIX, PROT_SUFFIX};
use crate::tagging::matcher::TermMatch;
use crate::tagging::span::Span;

/// A paragraph after marker insertion
///
/// Built once per paragraph and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedParagraph<F> {
    original_spans: Vec<Span<F>>,
    new_plain_text: String,
    translation_required: bool,
}

impl<F> TaggedParagraph<F> {
    /// Create a tagged paragraph
    pub fn new(original_spans: Vec<Span<F>>, new_plain_text: String, translation_required: bool) -> Self {
        Self {
            original_spans,
            new_plain_text,
            translation_required,
        }
    }

    /// Spans as they were before tagging
    pub fn original_spans(&self) -> &[Span<F>] {
        &self.original_spans
    }

    /// Plain text with markers inserted
    pub fn new_plain_text(&self) -> &str {
        &self.new_plain_text
    }

    /// Whether the paragraph received the `[FR]` marker
    pub fn translation_required(&self) -> bool {
        self.translation_required
    }
}

/// Inserts `[PROT]` and `[FR]` markers into plain text
pub struct Tagger;

impl Tagger {
    /// Tag a paragraph's plain text
    ///
    /// # Arguments
    /// * `plain_text` - Flattened paragraph text
    /// * `matches` - Protected-term occurrences (byte offsets into `plain_text`)
    /// * `is_exempt` - Whether the paragraph is a brand block
    ///
    /// # Returns
    /// * The tagged text and whether translation is required
    pub fn tag(plain_text: &str, matches: &[TermMatch], is_exempt: bool) -> (String, bool) {
        if plain_text.trim().is_empty() {
            return (plain_text.to_string(), false);
        }

        let translation_required = !is_exempt;

        let mut ordered: Vec<&TermMatch> = matches.iter().collect();
        ordered.sort_by(|a, b| b.start.cmp(&a.start));

        let mut text = String::with_capacity(
            plain_text.len() + ordered.len() * PROT_SUFFIX.len() + FR_SUFFIX.len(),
        );
        text.push_str(plain_text);

        for m in ordered {
            if m.end > text.len() || !text.is_char_boundary(m.end) {
                continue;
            }
            if markers::is_followed_by_prot(&text, m.end) {
                continue;
            }
            text.insert_str(m.end, PROT_SUFFIX);
        }

        if translation_required && !markers::ends_with_fr(&text) {
            text.push_str(FR_SUFFIX);
        }

        (text, translation_required)
    }
}
