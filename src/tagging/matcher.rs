/*!
 * Protected-term and brand-block detection.
 *
 * Terms match only at word boundaries: the character before a match and the
 * character after it must be non-word characters or the edge of the text.
 * Overlapping candidates resolve to the earliest start, then the longest match.
 */

use log::trace;

use crate::tagging::markers;
use crate::tagging::rules::TaggingRules;

/// One protected-term occurrence, as byte offsets into the plain text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermMatch {
    /// Byte offset of the first character of the match
    pub start: usize,

    /// Byte offset one past the last character of the match
    pub end: usize,

    /// Configured term that produced the match
    pub term: String,
}

impl TermMatch {
    /// Length of the match in bytes
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the match is empty
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn has_boundary_before(text: &str, start: usize) -> bool {
    text[..start].chars().next_back().is_none_or(|c| !is_word_char(c))
}

fn has_boundary_after(text: &str, end: usize) -> bool {
    text[end..].chars().next().is_none_or(|c| !is_word_char(c))
}

/// Scanner over a compiled rule set
pub struct TermMatcher<'a> {
    rules: &'a TaggingRules,
}

impl<'a> TermMatcher<'a> {
    /// Create a new matcher
    pub fn new(rules: &'a TaggingRules) -> Self {
        Self { rules }
    }

    /// Find non-overlapping protected-term occurrences, ordered by start
    ///
    /// Occurrences already followed by a `[PROT]` marker still take part in overlap
    /// resolution, so they shadow shorter terms inside them, but are not returned.
    /// Text inside marker literals never matches. Re-tagging is therefore a no-op.
    pub fn find_protected_terms(&self, text: &str) -> Vec<TermMatch> {
        let reserved = markers::marker_ranges(text);
        let mut candidates: Vec<(TermMatch, bool)> = Vec::new();

        for term in self.rules.terms() {
            let mut pos = 0;
            while pos < text.len() {
                let Some(m) = term.regex().find_at(text, pos) else {
                    break;
                };

                let valid = has_boundary_before(text, m.start())
                    && has_boundary_after(text, m.end())
                    && !reserved.iter().any(|r| m.start() < r.end && r.start < m.end());

                if valid {
                    let already_tagged = markers::is_followed_by_prot(text, m.end());
                    candidates.push((
                        TermMatch {
                            start: m.start(),
                            end: m.end(),
                            term: term.pattern().to_string(),
                        },
                        already_tagged,
                    ));
                }

                // Step one character so self-overlapping occurrences are not lost
                let step = text[m.start()..].chars().next().map_or(1, char::len_utf8);
                pos = m.start() + step;
            }
        }

        candidates.sort_by(|(a, _), (b, _)| a.start.cmp(&b.start).then(b.len().cmp(&a.len())));

        let mut selected: Vec<TermMatch> = Vec::with_capacity(candidates.len());
        let mut cursor = 0;
        for (candidate, already_tagged) in candidates {
            if candidate.start < cursor {
                continue;
            }
            cursor = candidate.end;
            if already_tagged {
                trace!("Protected term '{}' at {} already tagged", candidate.term, candidate.start);
                continue;
            }
            trace!("Protected term '{}' at {}..{}", candidate.term, candidate.start, candidate.end);
            selected.push(candidate);
        }

        selected
    }

    /// Whether the paragraph is a logo or signature block made only of brand words
    pub fn is_brand_only(&self, text: &str) -> bool {
        let stripped = markers::strip_markers(text);
        let mut tokens = stripped
            .split(|c: char| c.is_whitespace() || self.rules.is_punctuation(c))
            .filter(|token| !token.is_empty())
            .peekable();

        if tokens.peek().is_none() {
            return false;
        }

        tokens.all(|token| self.rules.is_brand_word(token))
    }

    /// Whether the whole paragraph is exactly one protected term
    ///
    /// The trimmed text must equal a configured pattern verbatim; a heading that
    /// merely matches a term case-insensitively is still translated. Always false
    /// unless the rule set enables the standalone exemption.
    pub fn is_standalone_term(&self, text: &str) -> bool {
        if !self.rules.exempts_standalone_terms() {
            return false;
        }

        let stripped = markers::strip_markers(text);
        let trimmed = stripped.trim();
        !trimmed.is_empty() && self.rules.terms().iter().any(|term| term.is_exactly(trimmed))
    }

    /// Whether the paragraph is exempt from the translation marker
    pub fn is_exempt(&self, text: &str) -> bool {
        self.is_brand_only(text) || self.is_standalone_term(text)
    }
}
