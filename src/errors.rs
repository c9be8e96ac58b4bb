/*!
 * Error types for the doctag application.
 *
 * Configuration problems are fatal and surface once, when the rule set is
 * compiled. Paragraph problems are local: the offending paragraph is passed
 * through unchanged and the run continues.
 */

use thiserror::Error;

/// Errors found while compiling the protected-term and brand-word configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// A protected term with an empty or whitespace-only pattern
    #[error("Protected term #{index} has an empty pattern")]
    EmptyPattern {
        /// Position of the entry in the configured term list
        index: usize,
    },

    /// A protected term that contains one of the reserved marker literals
    #[error("Protected term '{pattern}' contains the reserved marker {marker}")]
    ReservedMarker {
        /// The offending pattern
        pattern: String,
        /// The marker literal found inside it
        marker: &'static str,
    },

    /// A brand word that is empty or spans several tokens
    #[error("Invalid brand word '{0}': brand words must be a single non-empty token")]
    InvalidBrandWord(String),

    /// The matcher expression for a term could not be built
    #[error("Failed to compile matcher for '{pattern}': {message}")]
    InvalidPattern {
        /// The offending pattern
        pattern: String,
        /// Message from the regex engine
        message: String,
    },

    /// Output files would overwrite their inputs
    #[error("Output suffix must not be empty")]
    EmptyOutputSuffix,

    /// A worker pool that could never run anything
    #[error("Worker count must be at least 1")]
    ZeroWorkers,
}

/// A paragraph whose spans cannot be processed safely
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedParagraphError {
    /// Span layout does not tile the paragraph text
    #[error("Span {span_index} covers [{start}, {end}) but the previous span ended at {expected}")]
    NonContiguousSpans {
        /// Index of the span that breaks the layout
        span_index: usize,
        /// Start offset of that span
        start: usize,
        /// End offset of that span
        end: usize,
        /// Where the span should have started
        expected: usize,
    },

    /// Span layout length disagrees with the flattened text
    #[error("Span layout covers {covered} characters but the paragraph text has {actual}")]
    LengthMismatch {
        /// Characters covered by the layout
        covered: usize,
        /// Characters in the plain text
        actual: usize,
    },

    /// Run text could not be decoded from the document markup
    #[error("Undecodable run text: {0}")]
    UndecodableText(String),
}

/// Errors raised by the document adapter
#[derive(Error, Debug)]
pub enum DocumentError {
    /// Error reading or writing the zip container
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// A content part is not valid UTF-8
    #[error("Part '{0}' is not valid UTF-8")]
    InvalidEncoding(String),

    /// The archive has no main document part
    #[error("Not a word processing document: {0}")]
    NotADocument(String),

    /// Error from a file operation
    #[error("File error: {0}")]
    Io(#[from] std::io::Error),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Fatal configuration error
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Error from the document adapter
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    /// The paragraph worker pool could not be started
    #[error("Worker pool error: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
