/*!
 * Proportional re-injection of tagged text into the original spans.
 *
 * Each original span keeps its share of the paragraph, measured in characters:
 * a span covering `[start, end)` of the original text receives
 * `[round(start * r), round(end * r))` of the new text, where
 * `r = new_length / original_length`. Boundaries are clamped to stay monotonic
 * and anything left after the last boundary goes to the final span.
 *
 * This is a visual approximation. A marker may land a character or two inside
 * or outside its ideal run, but every run keeps its own formatting.
 */

use crate::errors::MalformedParagraphError;
use crate::tagging::span::{FlatParagraph, Span};

/// Scale a character offset, rounding half up
fn scale(offset: usize, original_length: usize, new_length: usize) -> usize {
    let numerator = offset as u128 * new_length as u128 * 2 + original_length as u128;
    (numerator / (original_length as u128 * 2)) as usize
}

/// Redistributes new paragraph text over the original span layout
pub struct Reinjector;

impl Reinjector {
    /// Split `new_text` into spans that inherit the original formatting
    ///
    /// # Arguments
    /// * `spans` - The original spans
    /// * `layout` - Flattened layout of `spans`
    /// * `new_text` - Tagged text to distribute
    ///
    /// # Returns
    /// * New spans whose concatenation is exactly `new_text`, or an error when
    ///   `layout` does not describe `spans`
    pub fn reinject<F: Clone + Default>(
        spans: &[Span<F>],
        layout: &FlatParagraph,
        new_text: &str,
    ) -> Result<Vec<Span<F>>, MalformedParagraphError> {
        layout.validate_against(spans)?;

        let original_length = layout.char_len();
        if original_length == 0 || spans.len() == 1 {
            let formatting = spans
                .first()
                .map(|span| span.formatting.clone())
                .unwrap_or_default();
            return Ok(vec![Span::new(new_text, formatting)]);
        }

        let new_length = new_text.chars().count();

        // Byte position of every character boundary, including the end
        let boundaries: Vec<usize> = new_text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(new_text.len()))
            .collect();

        let mut result = Vec::with_capacity(spans.len());
        let mut previous_end = 0;

        for (offset, span) in layout.offsets.iter().zip(spans) {
            let new_start = scale(offset.start, original_length, new_length)
                .max(previous_end)
                .min(new_length);
            let new_end = scale(offset.end(), original_length, new_length).clamp(new_start, new_length);

            result.push(Span::new(
                &new_text[boundaries[new_start]..boundaries[new_end]],
                span.formatting.clone(),
            ));
            previous_end = new_end;
        }

        if previous_end < new_length {
            if let Some(last) = result.last_mut() {
                last.text.push_str(&new_text[boundaries[previous_end]..]);
            }
        }

        Ok(result)
    }
}
