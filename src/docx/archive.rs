/*!
 * .docx container I/O.
 *
 * The archive is held in memory as an ordered list of entries so it can be
 * written back with the same member order Word produced.
 */

use log::debug;
use std::fs::File;
use std::io::{Read, Seek, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::app_config::DocumentConfig;
use crate::errors::DocumentError;

/// Main document part every word processing package carries
pub const MAIN_DOCUMENT_PART: &str = "word/document.xml";

/// One archive member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Member name inside the zip
    pub name: String,

    /// Uncompressed member data
    pub data: Vec<u8>,

    /// Whether the member is a directory
    pub is_dir: bool,
}

/// In-memory .docx package
#[derive(Debug, Clone, Default)]
pub struct DocxArchive {
    entries: Vec<ArchiveEntry>,
}

impl DocxArchive {
    /// Read a .docx file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let archive = Self::from_reader(file)?;
        debug!("Read {} entries from {}", archive.entries.len(), path.display());
        Ok(archive)
    }

    /// Read a .docx package from any seekable reader
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self, DocumentError> {
        let mut zip = ZipArchive::new(reader)?;
        let mut entries = Vec::with_capacity(zip.len());

        for i in 0..zip.len() {
            let mut member = zip.by_index(i)?;
            let mut data = Vec::new();
            member.read_to_end(&mut data)?;
            entries.push(ArchiveEntry {
                name: member.name().to_string(),
                data,
                is_dir: member.is_dir(),
            });
        }

        if !entries.iter().any(|e| e.name == MAIN_DOCUMENT_PART) {
            return Err(DocumentError::NotADocument(format!("missing {}", MAIN_DOCUMENT_PART)));
        }

        Ok(Self { entries })
    }

    /// Build an archive from entries (used by tests and tools)
    pub fn from_entries(entries: Vec<ArchiveEntry>) -> Self {
        Self { entries }
    }

    /// All entries in archive order
    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    /// Look up an entry by name
    pub fn entry(&self, name: &str) -> Option<&ArchiveEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Read a part as UTF-8 text
    pub fn part_text(&self, index: usize) -> Result<&str, DocumentError> {
        let entry = &self.entries[index];
        std::str::from_utf8(&entry.data).map_err(|_| DocumentError::InvalidEncoding(entry.name.clone()))
    }

    /// Replace the data of an entry
    pub fn set_data(&mut self, index: usize, data: Vec<u8>) {
        self.entries[index].data = data;
    }

    /// Indices of the parts that carry paragraph text
    pub fn content_parts(&self, config: &DocumentConfig) -> Vec<usize> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| !e.is_dir && is_content_part(&e.name, config))
            .map(|(i, _)| i)
            .collect()
    }

    /// Write the package to any seekable writer
    pub fn write_to<W: Write + Seek>(&self, writer: W) -> Result<W, DocumentError> {
        let mut zip = ZipWriter::new(writer);
        let deflated = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

        for entry in &self.entries {
            if entry.is_dir {
                zip.add_directory(entry.name.as_str(), stored)?;
                continue;
            }
            let options = if entry.name.starts_with("word/media/") { stored } else { deflated };
            zip.start_file(entry.name.as_str(), options)?;
            zip.write_all(&entry.data)?;
        }

        Ok(zip.finish()?)
    }

    /// Write the package to `path`, replacing it atomically
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), DocumentError> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut temp = NamedTempFile::new_in(dir)?;
        self.write_to(temp.as_file_mut())?;
        temp.persist(path).map_err(|e| DocumentError::Io(e.error))?;

        debug!("Wrote {} entries to {}", self.entries.len(), path.display());
        Ok(())
    }
}

/// Whether an archive member is a paragraph-bearing XML part
///
/// Body, headers, footers, notes and comments qualify; style, settings, font and
/// theme definitions do not.
pub fn is_content_part(name: &str, config: &DocumentConfig) -> bool {
    if !name.starts_with("word/") || !name.ends_with(".xml") {
        return false;
    }

    if config.skip_theme_parts && name.split('/').any(|segment| segment == "theme") {
        return false;
    }

    let file_name = name.rsplit('/').next().unwrap_or(name);
    !config.excluded_parts.iter().any(|excluded| excluded == file_name)
}
