/*!
 * Common test utilities for the doctag test suite
 */

use anyhow::Result;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use doctag::app_config::{Config, ProtectedTermConfig};
use doctag::docx::DocxArchive;
use doctag::tagging::Span;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/></Types>"#;

const DOCUMENT_OPEN: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>"#;

const DOCUMENT_CLOSE: &str = "</w:body></w:document>";

/// Routes library logs through the test harness; safe to call from every test
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Wraps paragraph markup into a full main document part
pub fn document_xml(body: &str) -> String {
    format!("{}{}{}", DOCUMENT_OPEN, body, DOCUMENT_CLOSE)
}

/// A paragraph with one plain run
pub fn paragraph(text: &str) -> String {
    format!("<w:p><w:r><w:t xml:space=\"preserve\">{}</w:t></w:r></w:p>", text)
}

/// A paragraph whose runs carry the given `<w:rPr>` markup (empty string for none)
pub fn formatted_paragraph(runs: &[(&str, &str)]) -> String {
    let mut xml = String::from("<w:p>");
    for (rpr, text) in runs {
        xml.push_str("<w:r>");
        xml.push_str(rpr);
        xml.push_str("<w:t xml:space=\"preserve\">");
        xml.push_str(text);
        xml.push_str("</w:t></w:r>");
    }
    xml.push_str("</w:p>");
    xml
}

/// Writes a minimal .docx with the given body plus any extra parts
pub fn create_test_docx(dir: &Path, filename: &str, body: &str, extra_parts: &[(&str, &str)]) -> Result<PathBuf> {
    let path = dir.join(filename);
    let mut zip = ZipWriter::new(File::create(&path)?);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    zip.start_file("[Content_Types].xml", options)?;
    zip.write_all(CONTENT_TYPES.as_bytes())?;

    zip.start_file("word/document.xml", options)?;
    zip.write_all(document_xml(body).as_bytes())?;

    for (name, content) in extra_parts {
        zip.start_file(*name, options)?;
        zip.write_all(content.as_bytes())?;
    }

    zip.finish()?;
    Ok(path)
}

/// Reads one part of a .docx as text
pub fn read_part(path: &Path, part: &str) -> Result<String> {
    let archive = DocxArchive::open(path)?;
    let entry = archive
        .entry(part)
        .ok_or_else(|| anyhow::anyhow!("Missing part {}", part))?;
    Ok(String::from_utf8(entry.data.clone())?)
}

/// A config with a small, predictable term list
pub fn test_config() -> Config {
    Config {
        protected_terms: ["CDEV", "IFRS", "Acme", "Canada Development Investment Corporation"]
            .into_iter()
            .map(ProtectedTermConfig::new)
            .collect(),
        workers: Some(2),
        ..Config::default()
    }
}

/// Concatenated text of a span list
pub fn span_text<F>(spans: &[Span<F>]) -> String {
    spans.iter().map(|s| s.text.as_str()).collect()
}
