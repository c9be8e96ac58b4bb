use anyhow::{Context, Result};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::docx::{DocumentReport, DocumentTagger};
use crate::errors::AppError;
use crate::file_utils::FileManager;
use crate::tagging::{ProcessingPool, TaggingRules};

// @module: Application controller for document tagging

/// Main application controller for document tagging
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Document tagger built from the configuration
    tagger: DocumentTagger,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self, AppError> {
        let rules = config.validate()?;
        Self::new(config, rules)
    }

    // @method: Create a controller from a configuration and its already compiled rules
    pub fn new(config: Config, rules: TaggingRules) -> Result<Self, AppError> {
        let pool = ProcessingPool::new(config.workers)?;
        let tagger = DocumentTagger::new(rules, config.document.clone(), pool);

        Ok(Self { config, tagger })
    }

    /// The active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Output path for a given input document
    pub fn output_path_for(&self, input_file: &Path, output_dir: &Path) -> PathBuf {
        FileManager::generate_output_path(input_file, output_dir, &self.config.document.output_suffix)
    }

    /// Tag a single document
    ///
    /// Returns `None` when the output exists and `force_overwrite` is off.
    pub fn run(&self, input_file: &Path, output_file: Option<PathBuf>, force_overwrite: bool) -> Result<Option<DocumentReport>> {
        if !FileManager::file_exists(input_file) {
            return Err(anyhow::anyhow!("Input file does not exist: {:?}", input_file));
        }

        let output_path = match output_file {
            Some(path) => path,
            None => {
                let output_dir = input_file.parent().unwrap_or(Path::new("."));
                self.output_path_for(input_file, output_dir)
            }
        };

        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            FileManager::ensure_dir(parent)?;
        }

        if output_path.exists() && !force_overwrite {
            warn!("Skipping {:?}, output already exists (use -f to force overwrite)", output_path);
            return Ok(None);
        }

        let start_time = std::time::Instant::now();
        let report = self
            .tagger
            .tag_file(input_file, &output_path)
            .with_context(|| format!("Failed to tag {}", input_file.display()))?;

        info!("Saved {:?} in {:.2?}", output_path, start_time.elapsed());
        Ok(Some(report))
    }

    /// Tag every document under a directory
    pub fn run_folder(&self, input_dir: &Path, force_overwrite: bool) -> Result<DocumentReport> {
        let documents = FileManager::find_documents(input_dir, &self.config.document.output_suffix)?;

        if documents.is_empty() {
            return Err(anyhow::anyhow!("No .docx documents found in directory: {:?}", input_dir));
        }

        let multi_progress = MultiProgress::new();
        let folder_pb = multi_progress.add(ProgressBar::new(documents.len() as u64));
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(template_result.progress_chars("█▓▒░"));
        folder_pb.set_message("Processing files");

        let mut total = DocumentReport::default();
        let mut success_count = 0;
        let mut error_count = 0;
        let mut skip_count = 0;

        for document in &documents {
            let file_name = document
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            folder_pb.set_message(format!("Processing: {}", file_name));

            match self.run(document, None, force_overwrite) {
                Ok(Some(report)) => {
                    total.merge(&report);
                    success_count += 1;
                }
                Ok(None) => skip_count += 1,
                Err(e) => {
                    error!("Error processing {:?}: {:#}", document, e);
                    error_count += 1;
                }
            }

            folder_pb.inc(1);
        }

        folder_pb.finish_and_clear();
        info!(
            "Finished: {} tagged, {} skipped, {} failed ({} paragraphs, {} tagged, {} brand blocks)",
            success_count, skip_count, error_count, total.paragraphs, total.tagged, total.brand_skipped
        );

        Ok(total)
    }
}
