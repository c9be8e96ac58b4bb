use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::ConfigurationError;
use crate::tagging::TaggingRules;

/// Application configuration module
/// This module handles loading, validating and saving the tagging configuration:
/// protected terms, brand words and document adapter settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Terms that must reach the translator untouched
    #[serde(default = "default_protected_terms")]
    pub protected_terms: Vec<ProtectedTermConfig>,

    /// Optional newline-delimited file with extra protected terms
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terms_file: Option<PathBuf>,

    /// Words that make up logo and signature blocks
    #[serde(default = "default_brand_words")]
    pub brand_words: Vec<String>,

    /// Characters ignored when deciding whether a paragraph is brand-only
    #[serde(default = "default_punctuation")]
    pub punctuation: String,

    /// Treat a paragraph that is exactly one protected term like a brand block
    #[serde(default = "default_true")]
    pub exempt_standalone_terms: bool,

    /// Document adapter settings
    #[serde(default)]
    pub document: DocumentConfig,

    /// Worker threads for paragraph processing (None uses the global pool)
    #[serde(default)]
    pub workers: Option<usize>,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// One protected term entry
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ProtectedTermConfig {
    /// Literal text of the term
    pub pattern: String,

    /// Match case exactly instead of case-insensitively
    #[serde(default)]
    pub case_sensitive: bool,
}

impl ProtectedTermConfig {
    // @param pattern: Literal term text
    // @returns: Case-insensitive term
    pub fn new(pattern: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            case_sensitive: false,
        }
    }

    // @returns: Same term, matched case-sensitively
    pub fn case_sensitive(mut self) -> Self {
        self.case_sensitive = true;
        self
    }
}

impl From<&str> for ProtectedTermConfig {
    fn from(pattern: &str) -> Self {
        Self::new(pattern)
    }
}

/// Settings for reading and writing .docx archives
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DocumentConfig {
    /// File names under word/ that never carry translatable text
    #[serde(default = "default_excluded_parts")]
    pub excluded_parts: Vec<String>,

    /// Skip everything under word/theme/
    #[serde(default = "default_true")]
    pub skip_theme_parts: bool,

    /// Suffix appended to the output file stem
    #[serde(default = "default_output_suffix")]
    pub output_suffix: String,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            excluded_parts: default_excluded_parts(),
            skip_theme_parts: true,
            output_suffix: default_output_suffix(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    // @returns: Matching filter for the log facade
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_protected_terms() -> Vec<ProtectedTermConfig> {
    [
        "Canada Development Investment Corporation",
        "CDEV",
        "CEI",
        "CEEFC",
        "CGF",
        "CGFIM",
        "CHHC",
        "CILGC",
        "CIC",
        "TMP Finance",
        "TMC",
        "IFRS",
        "GAAP",
        "IAS",
        "IASB",
        "ESG",
        "CEO",
        "CFO",
        "Trans Mountain Corporation",
        "Trans Mountain Pipeline",
        "Government of Canada",
        "16342451 CANADA INC.",
    ]
    .into_iter()
    .map(ProtectedTermConfig::new)
    .collect()
}

fn default_brand_words() -> Vec<String> {
    ["CANADA", "DEVELOPMENT", "INVESTMENT", "CORPORATION"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_punctuation() -> String {
    crate::tagging::rules::DEFAULT_PUNCTUATION.to_string()
}

fn default_excluded_parts() -> Vec<String> {
    ["styles.xml", "settings.xml", "fontTable.xml", "webSettings.xml"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_output_suffix() -> String {
    "translated".to_string()
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Write configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))?;
        Ok(())
    }

    /// Merge terms from `terms_file` into `protected_terms`
    ///
    /// Relative paths resolve against `base_dir` (usually the config file's directory).
    /// Blank lines and lines starting with `#` are ignored; duplicates are dropped.
    pub fn load_terms_file(&mut self, base_dir: &Path) -> Result<usize> {
        let Some(terms_file) = &self.terms_file else {
            return Ok(0);
        };

        let path = if terms_file.is_absolute() {
            terms_file.clone()
        } else {
            base_dir.join(terms_file)
        };

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read terms file: {}", path.display()))?;

        let mut added = 0;
        for line in content.lines() {
            let term = line.trim();
            if term.is_empty() || term.starts_with('#') {
                continue;
            }
            if self.protected_terms.iter().any(|t| t.pattern == term) {
                continue;
            }
            self.protected_terms.push(ProtectedTermConfig::new(term));
            added += 1;
        }

        Ok(added)
    }

    /// Validate the configuration and compile its tagging rules
    ///
    /// Returns the compiled rules so callers do not build them twice.
    pub fn validate(&self) -> Result<TaggingRules, ConfigurationError> {
        if self.document.output_suffix.trim().is_empty() {
            return Err(ConfigurationError::EmptyOutputSuffix);
        }

        if self.workers == Some(0) {
            return Err(ConfigurationError::ZeroWorkers);
        }

        // Term and brand checks live with the rule compiler so library users get them too
        TaggingRules::from_config(self)
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            protected_terms: default_protected_terms(),
            terms_file: None,
            brand_words: default_brand_words(),
            punctuation: default_punctuation(),
            exempt_standalone_terms: true,
            document: DocumentConfig::default(),
            workers: None,
            log_level: LogLevel::default(),
        }
    }
}
