/*!
 * Document adapter for .docx packages.
 *
 * Pulls paragraphs out of every content part as spans, runs them through the
 * paragraph pipeline, and writes the re-injected text back into the same
 * `<w:t>` nodes. Archive layout, namespaces and styles are never touched.
 *
 * - `archive`: zip container I/O and content part selection
 * - `xml`: paragraph extraction and text node rewriting
 */

pub mod archive;
pub mod xml;

use log::{debug, info, warn};
use serde::Serialize;
use std::path::Path;

use crate::app_config::DocumentConfig;
use crate::errors::DocumentError;
use crate::tagging::{Outcome, ParagraphPipeline, ProcessedParagraph, ProcessingPool, Span, TaggingRules};

pub use archive::{ArchiveEntry, DocxArchive};
pub use xml::{RunFormat, TextNode, XmlParagraph};

/// Per-document processing summary
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocumentReport {
    /// Content parts scanned
    pub parts: usize,
    /// Paragraphs that carried text nodes
    pub paragraphs: usize,
    /// Paragraphs that received markers
    pub tagged: usize,
    /// Brand blocks left without `[FR]`
    pub brand_skipped: usize,
    /// Empty paragraphs and pass-throughs
    pub unchanged: usize,
    /// Paragraphs passed through because their text could not be decoded
    pub malformed: usize,
}

impl DocumentReport {
    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Tagged => self.tagged += 1,
            Outcome::BrandSkipped => self.brand_skipped += 1,
            Outcome::Unchanged => self.unchanged += 1,
        }
    }

    /// Add another report's counts to this one
    pub fn merge(&mut self, other: &DocumentReport) {
        self.parts += other.parts;
        self.paragraphs += other.paragraphs;
        self.tagged += other.tagged;
        self.brand_skipped += other.brand_skipped;
        self.unchanged += other.unchanged;
        self.malformed += other.malformed;
    }
}

/// Tags whole .docx documents
pub struct DocumentTagger {
    rules: TaggingRules,
    config: DocumentConfig,
    pool: ProcessingPool,
}

impl DocumentTagger {
    /// Create a new document tagger
    pub fn new(rules: TaggingRules, config: DocumentConfig, pool: ProcessingPool) -> Self {
        Self { rules, config, pool }
    }

    /// The compiled rule set
    pub fn rules(&self) -> &TaggingRules {
        &self.rules
    }

    /// Tag every paragraph of one XML part
    pub fn tag_part(&self, xml: &str, report: &mut DocumentReport) -> String {
        let paragraphs = xml::scan_paragraphs(xml);

        let mut decoded: Vec<(usize, Vec<Span<RunFormat>>)> = Vec::with_capacity(paragraphs.len());
        for (index, paragraph) in paragraphs.iter().enumerate() {
            match paragraph.spans(xml) {
                Ok(spans) => decoded.push((index, spans)),
                Err(e) => {
                    warn!("Passing paragraph through unchanged: {}", e);
                    report.malformed += 1;
                }
            }
        }
        report.paragraphs += paragraphs.len();

        let inputs: Vec<Vec<Span<RunFormat>>> = decoded.iter().map(|(_, spans)| spans.clone()).collect();
        let pipeline = ParagraphPipeline::new(&self.rules);
        let processed = self.pool.install(|| pipeline.process_all(&inputs));

        let mut edits = Vec::new();
        for ((index, original), result) in decoded.iter().zip(processed) {
            report.record(result.outcome);
            if result.spans == *original {
                continue;
            }
            edits.extend(node_edits(&paragraphs[*index], result));
        }

        if edits.is_empty() {
            return xml.to_string();
        }

        xml::rewrite_text_nodes(xml, edits)
    }

    /// Tag every content part of an in-memory package
    pub fn tag_archive(&self, archive: &mut DocxArchive) -> Result<DocumentReport, DocumentError> {
        let mut report = DocumentReport::default();

        for index in archive.content_parts(&self.config) {
            let name = archive.entries()[index].name.clone();
            let rewritten = {
                let xml = archive.part_text(index)?;
                let mut part_report = DocumentReport {
                    parts: 1,
                    ..Default::default()
                };
                let rewritten = self.tag_part(xml, &mut part_report);
                debug!(
                    "{}: {} paragraphs, {} tagged, {} brand, {} unchanged",
                    name,
                    part_report.paragraphs,
                    part_report.tagged,
                    part_report.brand_skipped,
                    part_report.unchanged
                );
                report.merge(&part_report);
                (rewritten != xml).then_some(rewritten)
            };

            if let Some(rewritten) = rewritten {
                archive.set_data(index, rewritten.into_bytes());
            }
        }

        Ok(report)
    }

    /// Tag `input` and write the result to `output`
    pub fn tag_file(&self, input: &Path, output: &Path) -> Result<DocumentReport, DocumentError> {
        let mut archive = DocxArchive::open(input)?;
        let report = self.tag_archive(&mut archive)?;
        archive.save(output)?;

        info!(
            "{}: {} paragraphs ({} tagged, {} brand blocks, {} unchanged, {} malformed)",
            input.display(),
            report.paragraphs,
            report.tagged,
            report.brand_skipped,
            report.unchanged,
            report.malformed
        );

        Ok(report)
    }
}

/// Map re-injected spans back onto a paragraph's text nodes
///
/// Span `i` goes to node `i`. Nodes without a span are emptied; surplus spans are
/// appended to the last node.
fn node_edits(paragraph: &XmlParagraph, processed: ProcessedParagraph<RunFormat>) -> Vec<(TextNode, String)> {
    let node_count = paragraph.nodes.len();
    let mut texts: Vec<String> = vec![String::new(); node_count];

    for (i, span) in processed.spans.into_iter().enumerate() {
        let slot = i.min(node_count - 1);
        texts[slot].push_str(&span.text);
    }

    paragraph.nodes.iter().cloned().zip(texts).collect()
}
