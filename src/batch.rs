// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Batch orchestration: extract, name and copy every file in a directory
//!
//! Files are processed one at a time in directory iteration order. Any
//! failure while naming a file degrades to a fallback-named copy, so every
//! attempted input ends up in the output directory exactly once.

use chrono::Local;
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use crate::extractors::{file_extension, ExtractorRegistry};
use crate::naming::{fallback_filename, sanitize_filename, CandidateGenerator};
use crate::ollama::CompletionBackend;
use crate::{AppConfig, RenamerError, Result};

/// What happened to a single directory entry
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    /// Copied under a model-proposed name
    Renamed { source: PathBuf, destination: PathBuf },
    /// Naming failed; copied under the fallback name
    Fallback { source: PathBuf, destination: PathBuf, reason: String },
    /// Not a file, or extension not attempted
    Skipped { source: PathBuf },
    /// Even the fallback copy could not be written
    Failed { source: PathBuf, reason: String },
}

/// Per-entry outcomes of one batch run
#[derive(Debug, Default, Serialize)]
pub struct BatchReport {
    pub outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    pub fn renamed(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Renamed { .. }))
    }

    pub fn fallbacks(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Fallback { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Failed { .. }))
    }

    fn count(&self, pred: impl Fn(&FileOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(o)).count()
    }
}

/// Sequential batch renamer
pub struct BatchRenamer {
    config: AppConfig,
    registry: ExtractorRegistry,
    generator: CandidateGenerator,
    dry_run: bool,
}

impl BatchRenamer {
    /// Create a renamer with the default extractors
    pub fn new(config: AppConfig, backend: Box<dyn CompletionBackend>) -> Self {
        let registry = ExtractorRegistry::new(&config);
        let generator = CandidateGenerator::new(backend, &config);

        Self {
            config,
            registry,
            generator,
            dry_run: false,
        }
    }

    /// Replace the extractor registry
    pub fn with_registry(mut self, registry: ExtractorRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Compute names without writing anything
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Process every entry of `input_dir` into `output_dir`.
    ///
    /// Only an unreadable input directory or an uncreatable output directory
    /// aborts the run; per-file problems are recorded in the report.
    pub async fn run(&self, input_dir: &Path, output_dir: &Path) -> Result<BatchReport> {
        if !input_dir.is_dir() {
            return Err(RenamerError::Config(format!(
                "Input directory {:?} does not exist or is not a directory",
                input_dir
            )));
        }

        if self.dry_run {
            warn!("DRY RUN MODE - no files will be copied");
        } else {
            std::fs::create_dir_all(output_dir)?;
        }

        debug!("Loaded {} extractors: {:?}", self.registry.len(), self.registry.extractor_names());

        let mut report = BatchReport::default();
        // Destinations handed out this run; a dry run never creates them on disk
        let mut claimed = HashSet::new();

        for entry in std::fs::read_dir(input_dir)? {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Failed to read directory entry: {}", e);
                    continue;
                }
            };

            let outcome = self.process_entry(&entry.path(), output_dir, &mut claimed).await;
            report.outcomes.push(outcome);
        }

        info!(
            "Batch complete: {} renamed, {} fallback, {} skipped, {} failed",
            report.renamed(),
            report.fallbacks(),
            report.skipped(),
            report.failed()
        );

        Ok(report)
    }

    async fn process_entry(
        &self,
        path: &Path,
        output_dir: &Path,
        claimed: &mut HashSet<PathBuf>,
    ) -> FileOutcome {
        let file_name = display_name(path);

        if !path.is_file() {
            debug!("Not a file, skipping: {}", file_name);
            return FileOutcome::Skipped { source: path.to_path_buf() };
        }

        let ext = match file_extension(path) {
            Some(ext) if self.config.accepts_extension(&ext) => ext,
            _ => {
                info!("Skipping unsupported file type: {}", file_name);
                return FileOutcome::Skipped { source: path.to_path_buf() };
            }
        };

        info!("Processing: {}", file_name);

        match self.rename_copy(path, &ext, output_dir, claimed).await {
            Ok(destination) => {
                info!("Copied and renamed to: {}", display_name(&destination));
                FileOutcome::Renamed { source: path.to_path_buf(), destination }
            }
            Err(e) => {
                warn!("Failed to name '{}': {}", file_name, e);
                self.fallback_copy(path, &ext, output_dir, claimed, e)
            }
        }
    }

    /// Extract, generate, sanitize and copy under the new name
    async fn rename_copy(
        &self,
        path: &Path,
        ext: &str,
        output_dir: &Path,
        claimed: &mut HashSet<PathBuf>,
    ) -> Result<PathBuf> {
        let name = self.propose_name(path, ext).await?;
        let destination = unique_destination(output_dir, &name, ext, claimed);

        if !self.dry_run {
            std::fs::copy(path, &destination)?;
        }

        Ok(destination)
    }

    /// Sanitized filename stem for `path`, extension excluded
    pub async fn propose_name(&self, path: &Path, ext: &str) -> Result<String> {
        let text = self.registry.extract(path)?;
        debug!("Extracted {} characters from {}", text.chars().count(), display_name(path));

        let candidate = self.generator.generate(&text, ext).await?;
        let max_length = self.config.limits.max_filename_length;
        let name = sanitize_filename(&candidate, max_length);

        if name.is_empty() {
            return Err(RenamerError::NoValidCandidate { reply: candidate });
        }
        if name.len() == max_length && candidate.chars().count() > max_length {
            warn!("Name truncated to {} characters: {}", max_length, name);
        }

        Ok(name)
    }

    fn fallback_copy(
        &self,
        path: &Path,
        ext: &str,
        output_dir: &Path,
        claimed: &mut HashSet<PathBuf>,
        cause: RenamerError,
    ) -> FileOutcome {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        // Extension is added by unique_destination
        let fallback_stem = fallback_filename(&self.config.naming.unknown_token, &stem, "", Local::now());
        let destination = unique_destination(output_dir, &fallback_stem, ext, claimed);

        if !self.dry_run {
            if let Err(e) = std::fs::copy(path, &destination) {
                error!("Fallback copy of {} failed: {}", display_name(path), e);
                return FileOutcome::Failed {
                    source: path.to_path_buf(),
                    reason: format!("{}; fallback copy failed: {}", cause, e),
                };
            }
        }

        warn!("Copied with fallback name: {}", display_name(&destination));
        FileOutcome::Fallback {
            source: path.to_path_buf(),
            destination,
            reason: cause.to_string(),
        }
    }
}

/// `dir/stem.ext`, or `dir/stem_2.ext`, `dir/stem_3.ext`, ... when taken.
///
/// A path is taken if it exists or is already in `claimed`; the returned
/// path is added to `claimed`.
pub fn unique_destination(dir: &Path, stem: &str, ext: &str, claimed: &mut HashSet<PathBuf>) -> PathBuf {
    let mut candidate = dir.join(format!("{}.{}", stem, ext));
    let mut counter = 2u32;
    while candidate.exists() || claimed.contains(&candidate) {
        candidate = dir.join(format!("{}_{}.{}", stem, counter, ext));
        counter += 1;
    }

    claimed.insert(candidate.clone());
    candidate
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
