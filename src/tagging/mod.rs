/*!
 * Span-aware protected-term tagging.
 *
 * - `span`: formatted spans and paragraph flattening
 * - `markers`: the `[PROT]` / `[FR]` wire vocabulary
 * - `rules`: validated, immutable term and brand configuration
 * - `matcher`: word-boundary term matching and brand-block detection
 * - `tagger`: right-to-left marker insertion
 * - `reinject`: proportional redistribution of tagged text over spans
 * - `pipeline`: per-paragraph orchestration and parallel batches
 * - `concurrency`: worker pool sizing
 */

pub mod concurrency;
pub mod markers;
pub mod matcher;
pub mod pipeline;
pub mod reinject;
pub mod rules;
pub mod span;
pub mod tagger;

// Re-export main types
pub use concurrency::ProcessingPool;
pub use matcher::{TermMatch, TermMatcher};
pub use pipeline::{Outcome, ParagraphPipeline, ProcessedParagraph};
pub use reinject::Reinjector;
pub use rules::{ProtectedTerm, TaggingRules};
pub use span::{flatten, FlatParagraph, Span, SpanOffset};
pub use tagger::{TaggedParagraph, Tagger};
