use crate::config::Config;
use crate::extractor::collector::{ExtractionProgress, WrittenCase};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionReport {
    pub root: PathBuf,
    pub output_directory: PathBuf,
    pub dry_run: bool,
    pub extraction_summary: ExtractionSummary,
    pub cases: Vec<WrittenCase>,
    pub extraction_time: DateTime<Utc>,
    pub warnings: Vec<String>,
    pub config_used: ConfigSnapshot,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionSummary {
    pub files_scanned: usize,
    pub files_with_cases: usize,
    pub cases_written: usize,
    pub bytes_written: u64,
    pub first_index: usize,
    pub next_index: usize,
    pub extraction_duration: Duration,
    pub cases_by_source: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    pub stem: String,
    pub extension: String,
    pub extensions: Vec<String>,
    pub exclude_dirs: Vec<String>,
    pub strict: bool,
    pub skip_unreadable: bool,
}

impl From<&Config> for ConfigSnapshot {
    fn from(config: &Config) -> Self {
        Self {
            stem: config.output.stem.clone(),
            extension: config.output.extension.clone(),
            extensions: config.scan.extensions.clone(),
            exclude_dirs: config.scan.exclude_dirs.clone(),
            strict: config.scan.strict,
            skip_unreadable: config.scan.skip_unreadable,
        }
    }
}

impl ExtractionReport {
    pub fn new(
        root: &Path,
        output_directory: &Path,
        progress: ExtractionProgress,
        config: &Config,
        dry_run: bool,
    ) -> Self {
        let extraction_summary = create_extraction_summary(&progress);

        Self {
            root: root.to_path_buf(),
            output_directory: output_directory.to_path_buf(),
            dry_run,
            extraction_summary,
            cases: progress.cases,
            extraction_time: Utc::now(),
            warnings: progress.warnings,
            config_used: ConfigSnapshot::from(config),
        }
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn display_summary(&self) -> String {
        let summary = &self.extraction_summary;
        let mut text = format!(
            "Files scanned: {}\nCases extracted: {}\n",
            summary.files_scanned, summary.cases_written
        );

        if summary.cases_written > 0 {
            let last = summary.next_index - 1;
            text.push_str(&format!(
                "Output files: {} .. {}\n",
                self.file_name(summary.first_index),
                self.file_name(last)
            ));
        }

        text
    }

    fn file_name(&self, index: usize) -> String {
        self.cases
            .iter()
            .find(|c| c.index == index)
            .map(|c| c.file_name.clone())
            .unwrap_or_else(|| index.to_string())
    }
}

fn create_extraction_summary(progress: &ExtractionProgress) -> ExtractionSummary {
    let mut cases_by_source: BTreeMap<String, usize> = BTreeMap::new();
    for case in &progress.cases {
        *cases_by_source
            .entry(case.source.to_string_lossy().to_string())
            .or_insert(0) += 1;
    }

    ExtractionSummary {
        files_scanned: progress.files_scanned,
        files_with_cases: cases_by_source.len(),
        cases_written: progress.cases_written,
        bytes_written: progress.bytes_written,
        first_index: progress.first_index,
        next_index: progress.next_index,
        extraction_duration: progress.elapsed(),
        cases_by_source,
    }
}
