//! Folder-wide redaction: walk a directory and redact every image in it.
use crate::output_path::{derive_output_path, is_derived_output};
use crate::redactor::{ImageRedactor, RedactionOutcome};
use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use guardian_ocr::OcrEngine;
use regex::Regex;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Semaphore;
use tracing::{info, warn};
use walkdir::WalkDir;

/// Extensions picked up by a batch run (compared case-insensitively)
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "gif", "tiff", "tif", "webp"];

/// Options for a batch run
#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub dir: PathBuf,
    /// Mirror of `dir` that receives the outputs; alongside the inputs when `None`
    pub output_dir: Option<PathBuf>,
    /// Glob patterns relative to `dir` (`*`, `**`, `?`)
    pub file_exclusions: Vec<String>,
    /// Maximum number of images redacted at once
    pub max_concurrent_files: usize,
    /// Where to write the JSON report, if anywhere
    pub report_path: Option<PathBuf>,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            output_dir: None,
            file_exclusions: Vec::new(),
            max_concurrent_files: 4,
            report_path: None,
        }
    }
}

/// Per-file line of a batch report
#[derive(Debug, Clone, Serialize)]
pub struct BatchEntry {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub regions_detected: usize,
    pub regions_blurred: usize,
    pub error: Option<String>,
}

impl BatchEntry {
    fn redacted(input: PathBuf, outcome: RedactionOutcome) -> Self {
        Self {
            input,
            output: Some(outcome.output_path),
            regions_detected: outcome.regions.detected,
            regions_blurred: outcome.regions.blurred,
            error: None,
        }
    }

    fn failed(input: PathBuf, error: String) -> Self {
        Self {
            input,
            output: None,
            regions_detected: 0,
            regions_blurred: 0,
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub generated_at: String,
    pub engine: String,
    pub total_files: usize,
    pub redacted: usize,
    pub failed: usize,
    pub entries: Vec<BatchEntry>,
}

/// Runs an [`ImageRedactor`] over every image below a directory
pub struct BatchRedactor<E> {
    redactor: Arc<ImageRedactor<E>>,
}

impl<E: OcrEngine + 'static> BatchRedactor<E> {
    pub fn new(redactor: ImageRedactor<E>) -> Self {
        Self {
            redactor: Arc::new(redactor),
        }
    }

    /// Lists the images a run over `options` would redact, sorted by path
    pub fn collect_images(&self, options: &BatchOptions) -> Result<Vec<PathBuf>> {
        if !options.dir.is_dir() {
            return Err(anyhow!("{} is not a directory", options.dir.display()));
        }

        let exclusions = options
            .file_exclusions
            .iter()
            .map(|pattern| glob_to_regex(pattern.as_str()))
            .collect::<Result<Vec<_>>>()?;
        let suffix = &self.redactor.config().suffix;

        let mut images: Vec<PathBuf> = WalkDir::new(&options.dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|path| has_image_extension(path))
            .filter(|path| !is_derived_output(path, suffix))
            .filter(|path| {
                let relative = path.strip_prefix(&options.dir).unwrap_or(path.as_path());
                let relative = relative.to_string_lossy().replace('\\', "/");
                !exclusions.iter().any(|re| re.is_match(&relative))
            })
            .collect();
        images.sort();

        Ok(images)
    }

    /// Redacts every collected image; one failing file does not stop the others
    pub async fn run(&self, options: &BatchOptions) -> Result<BatchReport> {
        let images = self.collect_images(options)?;
        let total_files = images.len();
        info!(
            dir = %options.dir.display(),
            files = total_files,
            max_concurrent = options.max_concurrent_files,
            "starting batch redaction"
        );

        let semaphore = Arc::new(Semaphore::new(options.max_concurrent_files.max(1)));
        let mut tasks = Vec::with_capacity(total_files);

        for input in images {
            let output = self.output_for(&input, options).await?;
            let redactor = self.redactor.clone();
            let semaphore = semaphore.clone();
            let task_input = input.clone();

            let task = tokio::spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .context("batch semaphore closed")?;
                tokio::task::spawn_blocking(move || redactor.redact_to(&task_input, &output))
                    .await
                    .context("redaction task panicked")?
                    .map_err(anyhow::Error::from)
            });
            tasks.push((input, task));
        }

        let mut entries = Vec::with_capacity(total_files);
        for (input, task) in tasks {
            let result = match task.await {
                Ok(result) => result,
                Err(e) => Err(anyhow!("task join error: {}", e)),
            };
            match result {
                Ok(outcome) => entries.push(BatchEntry::redacted(input, outcome)),
                Err(e) => {
                    warn!(input = %input.display(), error = %format!("{:#}", e), "redaction failed");
                    entries.push(BatchEntry::failed(input, format!("{:#}", e)));
                }
            }
        }

        let redacted = entries.iter().filter(|e| e.is_success()).count();
        let report = BatchReport {
            generated_at: Utc::now().to_rfc3339(),
            engine: self.redactor.engine().name().to_string(),
            total_files,
            redacted,
            failed: total_files - redacted,
            entries,
        };

        if let Some(report_path) = &options.report_path {
            let json = serde_json::to_string_pretty(&report)?;
            fs::write(report_path, json)
                .await
                .with_context(|| format!("failed to write report {}", report_path.display()))?;
            info!(report = %report_path.display(), "batch report written");
        }

        info!(
            redacted = report.redacted,
            failed = report.failed,
            "batch redaction finished"
        );
        Ok(report)
    }

    async fn output_for(&self, input: &Path, options: &BatchOptions) -> Result<PathBuf> {
        let suffix = &self.redactor.config().suffix;
        let Some(output_dir) = &options.output_dir else {
            return Ok(derive_output_path(input, suffix));
        };

        let relative = input.strip_prefix(&options.dir).unwrap_or(input);
        let target_dir = match relative.parent() {
            Some(parent) => output_dir.join(parent),
            None => output_dir.clone(),
        };
        fs::create_dir_all(&target_dir)
            .await
            .with_context(|| format!("failed to create {}", target_dir.display()))?;

        let name = derive_output_path(relative, suffix);
        let name = name.file_name().ok_or_else(|| anyhow!("{} has no file name", input.display()))?;
        Ok(target_dir.join(name))
    }
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.iter().any(|known| known.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}

/// Translates an exclusion glob into an anchored regex.
///
/// `*` and `?` stay within one path segment, `**` crosses segments and
/// `**/` may match no directory at all.
fn glob_to_regex(pattern: &str) -> Result<Regex> {
    let mut re = String::from("^");
    let mut chars = pattern.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '*' if chars.peek() == Some(&'*') => {
                chars.next();
                if chars.peek() == Some(&'/') {
                    chars.next();
                    re.push_str("(?:.*/)?");
                } else {
                    re.push_str(".*");
                }
            }
            '*' => re.push_str("[^/]*"),
            '?' => re.push_str("[^/]"),
            c => re.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
        }
    }
    re.push('$');

    Regex::new(&re).with_context(|| format!("invalid exclusion pattern {:?}", pattern))
}
