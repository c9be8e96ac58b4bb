/*!
 * Compiled, read-only tagging rules.
 *
 * The configuration's term and brand lists are validated and compiled once,
 * before any paragraph is processed. The resulting `TaggingRules` is never
 * mutated afterwards and can be shared freely across worker threads.
 */

use log::debug;
use regex::{Regex, RegexBuilder};
use std::collections::HashSet;

use crate::app_config::{Config, ProtectedTermConfig};
use crate::errors::ConfigurationError;
use crate::tagging::markers::RESERVED_MARKERS;

/// Default punctuation ignored by brand-only detection
pub const DEFAULT_PUNCTUATION: &str = ".,;:!?'\"()[]{}-–—&/|·•®™©";

/// A protected term with its compiled matcher
#[derive(Debug, Clone)]
pub struct ProtectedTerm {
    pattern: String,
    case_sensitive: bool,
    regex: Regex,
}

impl ProtectedTerm {
    /// Compile a term
    pub fn new(pattern: &str, case_sensitive: bool) -> Result<Self, ConfigurationError> {
        let regex = RegexBuilder::new(&regex::escape(pattern))
            .case_insensitive(!case_sensitive)
            .build()
            .map_err(|e| ConfigurationError::InvalidPattern {
                pattern: pattern.to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            pattern: pattern.to_string(),
            case_sensitive,
            regex,
        })
    }

    /// The configured term text
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Whether the term matches case-sensitively
    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    pub(crate) fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Whether `text` is this term's pattern verbatim, case included
    pub fn is_exactly(&self, text: &str) -> bool {
        self.pattern == text
    }
}

/// Immutable rule set shared by every paragraph of a run
#[derive(Debug, Clone)]
pub struct TaggingRules {
    // Longest pattern first, so ties at one position resolve to the longest term
    terms: Vec<ProtectedTerm>,
    brand_words: HashSet<String>,
    punctuation: Vec<char>,
    exempt_standalone_terms: bool,
}

impl TaggingRules {
    /// Validate and compile a term list and a brand word list
    pub fn new<T, B, S>(terms: T, brand_words: B) -> Result<Self, ConfigurationError>
    where
        T: IntoIterator<Item = ProtectedTermConfig>,
        B: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut compiled = Vec::new();
        let mut seen = HashSet::new();

        for (index, term) in terms.into_iter().enumerate() {
            if term.pattern.trim().is_empty() {
                return Err(ConfigurationError::EmptyPattern { index });
            }

            if let Some(marker) = RESERVED_MARKERS
                .iter()
                .find(|marker| term.pattern.contains(*marker))
            {
                return Err(ConfigurationError::ReservedMarker {
                    pattern: term.pattern.clone(),
                    marker: *marker,
                });
            }

            if !seen.insert((term.pattern.clone(), term.case_sensitive)) {
                continue;
            }

            compiled.push(ProtectedTerm::new(&term.pattern, term.case_sensitive)?);
        }

        // Stable sort keeps configuration order among equal lengths
        compiled.sort_by(|a, b| b.pattern.chars().count().cmp(&a.pattern.chars().count()));

        let mut brands = HashSet::new();
        for word in brand_words {
            let word = word.as_ref();
            if word.trim().is_empty() || word.trim().chars().any(char::is_whitespace) {
                return Err(ConfigurationError::InvalidBrandWord(word.to_string()));
            }
            brands.insert(word.trim().to_uppercase());
        }

        debug!(
            "Compiled tagging rules: {} protected terms, {} brand words",
            compiled.len(),
            brands.len()
        );

        Ok(Self {
            terms: compiled,
            brand_words: brands,
            punctuation: DEFAULT_PUNCTUATION.chars().collect(),
            exempt_standalone_terms: false,
        })
    }

    /// Compile the rule set described by an application config
    pub fn from_config(config: &Config) -> Result<Self, ConfigurationError> {
        Ok(Self::new(config.protected_terms.iter().cloned(), &config.brand_words)?
            .with_punctuation(&config.punctuation)
            .with_standalone_exemption(config.exempt_standalone_terms))
    }

    /// Replace the punctuation set used by brand-only detection
    pub fn with_punctuation(mut self, punctuation: &str) -> Self {
        self.punctuation = punctuation.chars().collect();
        self
    }

    /// Exempt paragraphs that consist of exactly one protected term
    pub fn with_standalone_exemption(mut self, enabled: bool) -> Self {
        self.exempt_standalone_terms = enabled;
        self
    }

    /// Compiled terms, longest first
    pub fn terms(&self) -> &[ProtectedTerm] {
        &self.terms
    }

    /// Whether `token` (any case) is a brand word
    pub fn is_brand_word(&self, token: &str) -> bool {
        self.brand_words.contains(&token.to_uppercase())
    }

    /// Whether `c` is ignored by brand-only detection
    pub fn is_punctuation(&self, c: char) -> bool {
        self.punctuation.contains(&c)
    }

    /// Whether standalone protected terms are exempt from translation
    pub fn exempts_standalone_terms(&self) -> bool {
        self.exempt_standalone_terms
    }

    /// Whether there is nothing to match at all
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty() && self.brand_words.is_empty()
    }
}
