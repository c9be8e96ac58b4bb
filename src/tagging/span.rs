/*!
 * Span model for formatted paragraphs.
 *
 * A paragraph is an ordered list of spans, each carrying its own text and an
 * opaque formatting token. Flattening produces the paragraph's plain text and,
 * for every span, the character range it occupies in that text.
 */

use crate::errors::MalformedParagraphError;

/// A run of text sharing one formatting token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span<F> {
    /// Text of the run
    pub text: String,

    /// Formatting token, copied forward but never inspected
    pub formatting: F,
}

impl<F> Span<F> {
    /// Create a new span
    pub fn new(text: impl Into<String>, formatting: F) -> Self {
        Self {
            text: text.into(),
            formatting,
        }
    }

    /// Length of the span's text in characters
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Concatenate span texts in order
pub fn concat_text<F>(spans: &[Span<F>]) -> String {
    spans.iter().map(|s| s.text.as_str()).collect()
}

/// Character range of one span inside the flattened text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpanOffset {
    /// Index of the span in the original paragraph
    pub span_index: usize,

    /// First character of the span
    pub start: usize,

    /// Number of characters in the span
    pub length: usize,
}

impl SpanOffset {
    /// One past the last character of the span
    pub fn end(&self) -> usize {
        self.start + self.length
    }
}

/// Plain text of a paragraph plus the layout of its spans
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatParagraph {
    /// Concatenated text of all spans
    pub plain_text: String,

    /// One entry per original span, in order
    pub offsets: Vec<SpanOffset>,
}

impl FlatParagraph {
    /// Number of characters in the plain text
    pub fn char_len(&self) -> usize {
        self.plain_text.chars().count()
    }

    /// Index of the span that owns the character at `char_index`
    ///
    /// Empty spans own no characters and are never returned.
    pub fn span_at(&self, char_index: usize) -> Option<usize> {
        let pos = self
            .offsets
            .partition_point(|offset| offset.end() <= char_index);
        self.offsets
            .get(pos)
            .filter(|offset| offset.start <= char_index && char_index < offset.end())
            .map(|offset| offset.span_index)
    }

    /// Check that the layout tiles the plain text exactly
    pub fn validate(&self) -> Result<(), MalformedParagraphError> {
        let mut expected = 0;
        for (position, offset) in self.offsets.iter().enumerate() {
            if offset.span_index != position || offset.start != expected {
                return Err(MalformedParagraphError::NonContiguousSpans {
                    span_index: offset.span_index,
                    start: offset.start,
                    end: offset.end(),
                    expected,
                });
            }
            expected = offset.end();
        }

        let actual = self.char_len();
        if expected != actual {
            return Err(MalformedParagraphError::LengthMismatch {
                covered: expected,
                actual,
            });
        }

        Ok(())
    }

    /// Check the layout against the spans it claims to describe
    pub fn validate_against<F>(&self, spans: &[Span<F>]) -> Result<(), MalformedParagraphError> {
        self.validate()?;

        if self.offsets.len() != spans.len() {
            return Err(MalformedParagraphError::LengthMismatch {
                covered: self.offsets.len(),
                actual: spans.len(),
            });
        }

        for (offset, span) in self.offsets.iter().zip(spans) {
            let length = span.char_len();
            if offset.length != length {
                return Err(MalformedParagraphError::NonContiguousSpans {
                    span_index: offset.span_index,
                    start: offset.start,
                    end: offset.end(),
                    expected: offset.start + length,
                });
            }
        }

        Ok(())
    }
}

/// Flatten a paragraph into plain text and span offsets
pub fn flatten<F>(spans: &[Span<F>]) -> FlatParagraph {
    let mut plain_text = String::with_capacity(spans.iter().map(|s| s.text.len()).sum());
    let mut offsets = Vec::with_capacity(spans.len());
    let mut cursor = 0;

    for (span_index, span) in spans.iter().enumerate() {
        let length = span.char_len();
        offsets.push(SpanOffset {
            span_index,
            start: cursor,
            length,
        });
        plain_text.push_str(&span.text);
        cursor += length;
    }

    FlatParagraph {
        plain_text,
        offsets,
    }
}
