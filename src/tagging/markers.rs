/*!
 * Marker vocabulary shared with the downstream translator.
 *
 * `[PROT]` follows a protected term after one space. `[FR]` appears at most
 * once, at the very end of a paragraph, after one space.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;
use std::ops::Range;

/// Protected-term marker literal
pub const PROT_MARKER: &str = "[PROT]";

/// Translation-required marker literal
pub const FR_MARKER: &str = "[FR]";

/// Text inserted after a protected term
pub const PROT_SUFFIX: &str = " [PROT]";

/// Text appended to a paragraph that needs translation
pub const FR_SUFFIX: &str = " [FR]";

/// Reserved literals that may not appear inside configured terms
pub const RESERVED_MARKERS: [&str; 2] = [PROT_MARKER, FR_MARKER];

/// Regex for marker literals, with their leading separator space
static MARKER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r" ?\[(?:PROT|FR)\]").expect("Invalid marker regex")
});

/// Remove every marker (and its separator space) from `text`
pub fn strip_markers(text: &str) -> Cow<'_, str> {
    MARKER_REGEX.replace_all(text, "")
}

/// Byte ranges of marker literals in `text`, separator space excluded
pub fn marker_ranges(text: &str) -> Vec<Range<usize>> {
    MARKER_REGEX
        .find_iter(text)
        .map(|m| {
            let start = if m.as_str().starts_with(' ') { m.start() + 1 } else { m.start() };
            start..m.end()
        })
        .collect()
}

/// Whether a `[PROT]` marker directly follows byte offset `end`
pub fn is_followed_by_prot(text: &str, end: usize) -> bool {
    text.get(end..).is_some_and(|rest| rest.starts_with(PROT_SUFFIX))
}

/// Whether the paragraph already carries its `[FR]` marker
pub fn ends_with_fr(text: &str) -> bool {
    text.ends_with(FR_SUFFIX)
}

/// Number of `[PROT]` markers in `text`
pub fn count_prot(text: &str) -> usize {
    text.matches(PROT_MARKER).count()
}
