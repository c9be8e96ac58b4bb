/*!
 * Tests for the paragraph pipeline
 */

use doctag::app_config::{Config, ProtectedTermConfig};
use doctag::tagging::{Outcome, ParagraphPipeline, ProcessingPool, Span, TaggingRules};
use crate::common;

fn rules() -> TaggingRules {
    TaggingRules::from_config(&Config::default()).unwrap()
}

#[test]
fn test_tag_shouldExposePlainTextAndTranslationFlag() {
    let rules = rules();
    let pipeline = ParagraphPipeline::new(&rules);
    let spans = vec![Span::new("CDEV", "b"), Span::new(" results", "")];

    let tagged = pipeline.tag(&spans);

    assert_eq!(tagged.new_plain_text(), "CDEV [PROT] results [FR]");
    assert!(tagged.translation_required());
    assert_eq!(tagged.original_spans(), spans.as_slice());
}

#[test]
fn test_process_withFormattedRuns_shouldKeepOneSpanPerRun() {
    let rules = rules();
    let pipeline = ParagraphPipeline::new(&rules);
    let spans = vec![
        Span::new("Under ", "plain"),
        Span::new("IFRS", "bold"),
        Span::new(", the ", "plain"),
        Span::new("CFO", "italic"),
        Span::new(" signs.", "plain"),
    ];

    let processed = pipeline.process(&spans);

    assert_eq!(processed.outcome, Outcome::Tagged);
    assert_eq!(processed.spans.len(), 5);
    assert_eq!(common::span_text(&processed.spans), "Under IFRS [PROT], the CFO [PROT] signs. [FR]");
    let formats: Vec<&str> = processed.spans.iter().map(|s| s.formatting).collect();
    assert_eq!(formats, vec!["plain", "bold", "plain", "italic", "plain"]);
}

#[test]
fn test_process_withLogoParagraph_shouldBeBrandSkipped() {
    let rules = rules();
    let pipeline = ParagraphPipeline::new(&rules);
    let spans = vec![Span::new("CANADA ", "logo"), Span::new("DEVELOPMENT", "logo")];

    let processed = pipeline.process(&spans);

    assert_eq!(processed.outcome, Outcome::BrandSkipped);
    assert_eq!(processed.spans, spans);
}

#[test]
fn test_process_withStandaloneTerm_shouldProtectWithoutFr() {
    let rules = rules();
    let pipeline = ParagraphPipeline::new(&rules);
    let spans = vec![Span::new("CDEV", "heading")];

    let processed = pipeline.process(&spans);

    assert_eq!(processed.outcome, Outcome::BrandSkipped);
    assert_eq!(processed.spans, vec![Span::new("CDEV [PROT]", "heading")]);
}

#[test]
fn test_process_withEmptyParagraph_shouldBeUnchanged() {
    let rules = rules();
    let pipeline = ParagraphPipeline::new(&rules);
    let spans: Vec<Span<&str>> = Vec::new();

    let processed = pipeline.process(&spans);

    assert_eq!(processed.outcome, Outcome::Unchanged);
    assert!(processed.spans.is_empty());
}

#[test]
fn test_process_alreadyTagged_shouldReturnOriginalSpans() {
    let rules = rules();
    let pipeline = ParagraphPipeline::new(&rules);
    let spans = vec![Span::new("CDEV [P", "b"), Span::new("ROT] results [FR]", "")];

    let processed = pipeline.process(&spans);

    assert_eq!(processed.outcome, Outcome::Tagged);
    assert_eq!(processed.spans, spans);
}

#[test]
fn test_processAll_onBoundedPool_shouldMatchSequentialResults() {
    let rules = rules();
    let pipeline = ParagraphPipeline::new(&rules);
    let pool = ProcessingPool::new(Some(3)).unwrap();
    let paragraphs: Vec<Vec<Span<u8>>> = (0..200)
        .map(|i| match i % 4 {
            0 => vec![Span::new(format!("Item {i} under IFRS"), 1u8)],
            1 => vec![Span::new("CANADA", 2u8), Span::new(" CORPORATION", 3u8)],
            2 => vec![Span::new("   ", 0u8)],
            _ => vec![Span::new("The ", 0u8), Span::new("CEO", 1u8), Span::new(format!(" memo {i}"), 0u8)],
        })
        .collect();

    let parallel = pool.install(|| pipeline.process_all(&paragraphs));
    let sequential: Vec<_> = paragraphs.iter().map(|p| pipeline.process(p)).collect();

    assert_eq!(pool.worker_count(), 3);
    assert_eq!(parallel, sequential);
}

#[test]
fn test_process_twice_withPrefixTerms_shouldBeIdempotent() {
    let rules = TaggingRules::new(
        ["Trans Mountain", "Trans Mountain Pipeline"].map(ProtectedTermConfig::new),
        Vec::<String>::new(),
    )
    .unwrap();
    let pipeline = ParagraphPipeline::new(&rules);
    let spans = vec![Span::new("The Trans Mountain ", 0u8), Span::new("Pipeline expansion", 1u8)];

    let once = pipeline.process(&spans);
    let twice = pipeline.process(&once.spans);

    assert_eq!(common::span_text(&once.spans), "The Trans Mountain Pipeline [PROT] expansion [FR]");
    assert_eq!(twice, once);
}

#[test]
fn test_process_withLowercaseStandaloneTerm_shouldStillTranslate() {
    let rules = rules();
    let pipeline = ParagraphPipeline::new(&rules);

    let processed = pipeline.process(&[Span::new("cdev", "heading")]);

    assert_eq!(processed.outcome, Outcome::Tagged);
    assert_eq!(common::span_text(&processed.spans), "cdev [PROT] [FR]");
}
