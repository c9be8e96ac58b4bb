/*!
 * WordprocessingML paragraph extraction and rewriting.
 *
 * Each `<w:p>` paragraph owns the `<w:t>` text nodes that appear inside it and
 * not inside a nested paragraph (text boxes nest paragraphs inside runs). Every
 * text node becomes one span whose formatting token is the `<w:rPr>` markup of
 * its run.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

use crate::errors::MalformedParagraphError;
use crate::tagging::Span;

/// Tokenizer for the elements that matter to paragraph extraction
static TOKEN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?s)(?P<popen><w:p(?:\s[^>/]*)?>)",
        r"|(?P<pclose></w:p>)",
        r"|(?P<ropen><w:r(?:\s[^>/]*)?>)",
        r"|(?P<rclose></w:r>)",
        r"|(?P<rpr><w:rPr>.*?</w:rPr>)",
        r"|(?P<topen><w:t(?:\s[^>/]*)?>)(?P<text>[^<]*)</w:t>",
    ))
    .expect("Invalid WordprocessingML token regex")
});

/// Run properties markup of the run a text node lives in
///
/// Compared by value only; an empty token means the run has no direct formatting.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct RunFormat(pub String);

/// A `<w:t>` element located in a part
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextNode {
    /// Byte range of the opening `<w:t ...>` tag
    pub tag: Range<usize>,

    /// Byte range of the raw (escaped) text content
    pub content: Range<usize>,

    /// Formatting of the enclosing run
    pub format: RunFormat,
}

/// The text nodes owned by one `<w:p>` element
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XmlParagraph {
    /// Text nodes in document order
    pub nodes: Vec<TextNode>,
}

impl XmlParagraph {
    /// Decode the paragraph's text nodes into spans
    pub fn spans(&self, xml: &str) -> Result<Vec<Span<RunFormat>>, MalformedParagraphError> {
        self.nodes
            .iter()
            .map(|node| Ok(Span::new(unescape(&xml[node.content.clone()])?, node.format.clone())))
            .collect()
    }
}

/// Locate every paragraph that owns at least one text node
pub fn scan_paragraphs(xml: &str) -> Vec<XmlParagraph> {
    let mut paragraphs: Vec<XmlParagraph> = Vec::new();
    let mut open_paragraphs: Vec<usize> = Vec::new();
    let mut open_runs: Vec<RunFormat> = Vec::new();

    for caps in TOKEN_REGEX.captures_iter(xml) {
        if caps.name("popen").is_some() {
            open_paragraphs.push(paragraphs.len());
            paragraphs.push(XmlParagraph::default());
        } else if caps.name("pclose").is_some() {
            open_paragraphs.pop();
        } else if caps.name("ropen").is_some() {
            open_runs.push(RunFormat::default());
        } else if caps.name("rclose").is_some() {
            open_runs.pop();
        } else if let Some(rpr) = caps.name("rpr") {
            // Paragraph-mark properties inside <w:pPr> have no open run and are ignored
            if let Some(current) = open_runs.last_mut() {
                *current = RunFormat(rpr.as_str().to_string());
            }
        } else if let (Some(tag), Some(text)) = (caps.name("topen"), caps.name("text")) {
            if let Some(&owner) = open_paragraphs.last() {
                paragraphs[owner].nodes.push(TextNode {
                    tag: tag.range(),
                    content: text.range(),
                    format: open_runs.last().cloned().unwrap_or_default(),
                });
            }
        }
    }

    paragraphs.retain(|p| !p.nodes.is_empty());
    paragraphs
}

/// Replace the content of text nodes, returning the rewritten part
///
/// Text gaining leading or trailing whitespace gets `xml:space="preserve"` so
/// Word does not collapse it.
pub fn rewrite_text_nodes(xml: &str, mut edits: Vec<(TextNode, String)>) -> String {
    edits.sort_by_key(|(node, _)| node.tag.start);

    let mut out = String::with_capacity(xml.len() + edits.iter().map(|(_, t)| t.len()).sum::<usize>());
    let mut cursor = 0;

    for (node, text) in edits {
        if node.tag.start < cursor {
            continue;
        }
        out.push_str(&xml[cursor..node.tag.start]);

        let tag = &xml[node.tag.clone()];
        let needs_preserve = text.starts_with(char::is_whitespace) || text.ends_with(char::is_whitespace);
        if needs_preserve && !tag.contains("xml:space=\"preserve\"") {
            out.push_str(&tag[..tag.len() - 1]);
            out.push_str(" xml:space=\"preserve\">");
        } else {
            out.push_str(tag);
        }

        out.push_str(&escape(&text));
        cursor = node.content.end;
    }

    out.push_str(&xml[cursor..]);
    out
}

/// Decode XML character and entity references
pub fn unescape(raw: &str) -> Result<String, MalformedParagraphError> {
    if !raw.contains('&') {
        return Ok(raw.to_string());
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        let semi = after
            .find(';')
            .ok_or_else(|| MalformedParagraphError::UndecodableText(format!("unterminated reference in '{}'", raw)))?;
        let entity = &after[..semi];

        let decoded = match entity {
            "amp" => '&',
            "lt" => '<',
            "gt" => '>',
            "quot" => '"',
            "apos" => '\'',
            _ => {
                let code = if let Some(hex) = entity.strip_prefix("#x").or_else(|| entity.strip_prefix("#X")) {
                    u32::from_str_radix(hex, 16).ok()
                } else if let Some(dec) = entity.strip_prefix('#') {
                    dec.parse::<u32>().ok()
                } else {
                    None
                };
                code.and_then(char::from_u32).ok_or_else(|| {
                    MalformedParagraphError::UndecodableText(format!("unknown reference '&{};'", entity))
                })?
            }
        };

        out.push(decoded);
        rest = &after[semi + 1..];
    }

    out.push_str(rest);
    Ok(out)
}

/// Escape text for use as element content
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}
