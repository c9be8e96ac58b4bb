/*!
 * Per-paragraph orchestration: flatten, match, tag, re-inject.
 *
 * The pipeline holds nothing but a reference to the read-only rule set, so one
 * instance can process any number of paragraphs, in any order, on any thread.
 */

use log::{debug, warn};
use rayon::prelude::*;
use serde::Serialize;

use crate::errors::MalformedParagraphError;
use crate::tagging::matcher::TermMatcher;
use crate::tagging::reinject::Reinjector;
use crate::tagging::rules::TaggingRules;
use crate::tagging::span::{flatten, Span};
use crate::tagging::tagger::{TaggedParagraph, Tagger};

/// What happened to a paragraph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Markers inserted and spans re-split
    Tagged,
    /// Empty or whitespace paragraph, or one that could not be processed safely
    Unchanged,
    /// Brand block: term markers possibly inserted, no `[FR]`
    BrandSkipped,
}

/// Re-injected spans plus the outcome that produced them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedParagraph<F> {
    /// New spans, ready for serialization
    pub spans: Vec<Span<F>>,

    /// Outcome for reporting
    pub outcome: Outcome,
}

/// Paragraph pipeline over a compiled rule set
pub struct ParagraphPipeline<'a> {
    rules: &'a TaggingRules,
}

impl<'a> ParagraphPipeline<'a> {
    /// Create a new pipeline
    pub fn new(rules: &'a TaggingRules) -> Self {
        Self { rules }
    }

    /// Run the matcher and tagger over a paragraph
    pub fn tag<F: Clone>(&self, spans: &[Span<F>]) -> TaggedParagraph<F> {
        let layout = flatten(spans);
        let (new_plain_text, translation_required) = self.tag_text(&layout.plain_text);

        TaggedParagraph::new(spans.to_vec(), new_plain_text, translation_required)
    }

    fn tag_text(&self, plain_text: &str) -> (String, bool) {
        let matcher = TermMatcher::new(self.rules);
        let matches = matcher.find_protected_terms(plain_text);
        Tagger::tag(plain_text, &matches, matcher.is_exempt(plain_text))
    }

    /// Process one paragraph, reporting malformed input as an error
    pub fn try_process<F: Clone + Default>(
        &self,
        spans: &[Span<F>],
    ) -> Result<ProcessedParagraph<F>, MalformedParagraphError> {
        let layout = flatten(spans);

        if layout.plain_text.trim().is_empty() {
            return Ok(ProcessedParagraph {
                spans: spans.to_vec(),
                outcome: Outcome::Unchanged,
            });
        }

        let (new_plain_text, translation_required) = self.tag_text(&layout.plain_text);
        let outcome = if translation_required {
            Outcome::Tagged
        } else {
            Outcome::BrandSkipped
        };

        // Nothing inserted: keep the original spans byte for byte
        if new_plain_text == layout.plain_text {
            debug!("Paragraph left as-is ({:?}): {:?}", outcome, layout.plain_text);
            return Ok(ProcessedParagraph {
                spans: spans.to_vec(),
                outcome,
            });
        }

        let new_spans = Reinjector::reinject(spans, &layout, &new_plain_text)?;
        debug!(
            "Paragraph {:?}: {} spans -> {} spans, {:?}",
            outcome,
            spans.len(),
            new_spans.len(),
            new_plain_text
        );

        Ok(ProcessedParagraph {
            spans: new_spans,
            outcome,
        })
    }

    /// Process one paragraph, passing malformed input through unchanged
    pub fn process<F: Clone + Default>(&self, spans: &[Span<F>]) -> ProcessedParagraph<F> {
        match self.try_process(spans) {
            Ok(processed) => processed,
            Err(e) => {
                warn!("Passing paragraph through unchanged: {}", e);
                ProcessedParagraph {
                    spans: spans.to_vec(),
                    outcome: Outcome::Unchanged,
                }
            }
        }
    }

    /// Process many paragraphs in parallel, returning results in input order
    ///
    /// Runs on the current rayon pool; wrap the call in
    /// [`ProcessingPool::install`](crate::tagging::ProcessingPool::install) to bound it.
    pub fn process_all<F>(&self, paragraphs: &[Vec<Span<F>>]) -> Vec<ProcessedParagraph<F>>
    where
        F: Clone + Default + Send + Sync,
    {
        paragraphs
            .par_iter()
            .map(|spans| self.process(spans))
            .collect()
    }
}
