use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// @module: File and directory utilities

/// Extension of word processing packages
pub const DOCX_EXTENSION: &str = "docx";

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {}", path.display()))?;
        }
        Ok(())
    }

    // @checks: .docx extension, case-insensitive
    pub fn is_docx<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref()
            .extension()
            .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(DOCX_EXTENSION))
    }

    // @checks: Whether the file is an output this tool already wrote
    pub fn is_tagged_output<P: AsRef<Path>>(path: P, suffix: &str) -> bool {
        let marker = format!("_{}", suffix);
        path.as_ref()
            .file_stem()
            .is_some_and(|stem| stem.to_string_lossy().ends_with(&marker))
    }

    // @generates: Output path for a tagged document
    // @params: input_file, output_dir, suffix
    pub fn generate_output_path<P1: AsRef<Path>, P2: AsRef<Path>>(
        input_file: P1,
        output_dir: P2,
        suffix: &str,
    ) -> PathBuf {
        let input_file = input_file.as_ref();
        let output_dir = output_dir.as_ref();

        // Get the file stem (filename without extension)
        let stem = input_file.file_stem().unwrap_or_default();

        let mut output_filename = stem.to_string_lossy().to_string();
        output_filename.push('_');
        output_filename.push_str(suffix);
        output_filename.push('.');
        output_filename.push_str(DOCX_EXTENSION);

        output_dir.join(output_filename)
    }

    // @finds: .docx documents under a directory, skipping our own outputs and Word lock files
    pub fn find_documents<P: AsRef<Path>>(dir: P, suffix: &str) -> Result<Vec<PathBuf>> {
        let dir = dir.as_ref();
        if !Self::dir_exists(dir) {
            return Err(anyhow::anyhow!("Directory does not exist: {}", dir.display()));
        }

        let mut documents: Vec<PathBuf> = WalkDir::new(dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .map(|e| e.into_path())
            .filter(|p| p.is_file() && Self::is_docx(p))
            .filter(|p| !Self::is_tagged_output(p, suffix))
            .filter(|p| {
                !p.file_name()
                    .is_some_and(|name| name.to_string_lossy().starts_with("~$"))
            })
            .collect();

        documents.sort();
        Ok(documents)
    }
}
