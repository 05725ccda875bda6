use crate::config::Config;
use crate::error::{IsolateError, Result};
use crate::extractor::case_writer::CaseWriter;
use crate::scanner::{ExtractedCase, LiteralScanner, SourceFile};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Index of the next output file. Threaded through the traversal by value so
/// numbering stays contiguous across files and directories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CaseCounter(usize);

impl CaseCounter {
    pub fn new(start: usize) -> Self {
        Self(start)
    }

    pub fn value(self) -> usize {
        self.0
    }

    #[must_use]
    pub fn advance(self) -> Self {
        Self(self.0 + 1)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WrittenCase {
    pub index: usize,
    pub file_name: String,
    pub source: PathBuf,
    pub line: usize,
    pub delimiter: String,
    pub lines: usize,
    pub bytes: u64,
}

#[derive(Debug, Clone)]
pub struct ExtractionProgress {
    pub files_scanned: usize,
    pub total_files: usize,
    pub cases_written: usize,
    pub bytes_written: u64,
    pub current_file: Option<String>,
    pub start_time: Instant,
    pub first_index: usize,
    pub next_index: usize,
    pub cases: Vec<WrittenCase>,
    pub warnings: Vec<String>,
}

impl ExtractionProgress {
    pub fn new(total_files: usize, start: CaseCounter) -> Self {
        Self {
            files_scanned: 0,
            total_files,
            cases_written: 0,
            bytes_written: 0,
            current_file: None,
            start_time: Instant::now(),
            first_index: start.value(),
            next_index: start.value(),
            cases: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn update_file(&mut self, filename: String) {
        self.files_scanned += 1;
        self.current_file = Some(filename);
    }

    pub fn record_case(&mut self, case: WrittenCase) {
        self.cases_written += 1;
        self.bytes_written += case.bytes;
        self.next_index = case.index + 1;
        self.cases.push(case);
    }

    pub fn add_warning<S: Into<String>>(&mut self, warning: S) {
        self.warnings.push(warning.into());
    }

    pub fn percentage(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            (self.files_scanned as f64 / self.total_files as f64) * 100.0
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Scans source files and writes every extracted case to its own numbered file.
pub struct Collector {
    scanner: LiteralScanner,
    writer: CaseWriter,
    strict: bool,
    skip_unreadable: bool,
}

impl Collector {
    pub fn new(scanner: LiteralScanner, writer: CaseWriter) -> Self {
        Self {
            scanner,
            writer,
            strict: false,
            skip_unreadable: false,
        }
    }

    pub fn from_config(config: &Config, dry_run: bool) -> Result<Self> {
        let scanner = LiteralScanner::new(config.scan.syntax.clone())?;
        let writer = CaseWriter::from_config(&config.output).with_dry_run(dry_run);

        Ok(Self::new(scanner, writer)
            .with_strict(config.scan.strict)
            .with_skip_unreadable(config.scan.skip_unreadable))
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_skip_unreadable(mut self, skip: bool) -> Self {
        self.skip_unreadable = skip;
        self
    }

    pub fn writer(&self) -> &CaseWriter {
        &self.writer
    }

    /// Scans every file in order, numbering cases from `start`.
    pub fn collect_files(
        &self,
        files: &[SourceFile],
        start: CaseCounter,
        progress_callback: Option<&dyn Fn(&ExtractionProgress)>,
    ) -> Result<ExtractionProgress> {
        let mut progress = ExtractionProgress::new(files.len(), start);
        self.writer.prepare()?;

        let mut counter = start;
        for file in files {
            if let Some(callback) = progress_callback {
                callback(&progress);
            }

            counter = self.collect_file(file, counter, &mut progress)?;
        }

        if let Some(callback) = progress_callback {
            callback(&progress);
        }

        Ok(progress)
    }

    /// Scans one file and writes its cases starting at `counter`.
    ///
    /// Returns the counter to use for the next file. All of a file's cases are
    /// scanned before any is written, so a strict-mode failure leaves no output
    /// for that file.
    pub fn collect_file(
        &self,
        file: &SourceFile,
        counter: CaseCounter,
        progress: &mut ExtractionProgress,
    ) -> Result<CaseCounter> {
        progress.update_file(file.display_path());

        let text = match std::fs::read_to_string(&file.path) {
            Ok(text) => text,
            Err(source) if self.skip_unreadable => {
                progress.add_warning(format!("Skipped unreadable {}: {}", file.display_path(), source));
                return Ok(counter);
            }
            Err(source) => {
                return Err(IsolateError::UnreadableInput {
                    path: file.path.clone(),
                    source,
                })
            }
        };

        let outcome = self.scanner.scan(&text);

        if let Some(open) = outcome.unterminated {
            if self.strict {
                return Err(IsolateError::UnterminatedLiteral {
                    path: file.path.clone(),
                    line: open.line,
                    delimiter: open.delimiter,
                });
            }

            progress.add_warning(format!(
                "Discarded unterminated literal in {}:{} (delimiter {:?})",
                file.display_path(),
                open.line,
                open.delimiter
            ));
        }

        let mut counter = counter;
        for case in outcome.cases {
            let written = self.write_one(file, counter, case)?;
            progress.record_case(written);
            counter = counter.advance();
        }

        Ok(counter)
    }

    fn write_one(
        &self,
        file: &SourceFile,
        counter: CaseCounter,
        case: ExtractedCase,
    ) -> Result<WrittenCase> {
        let index = counter.value();
        let bytes = self.writer.write_case(index, case.content())?;

        Ok(WrittenCase {
            index,
            file_name: self.writer.file_name(index),
            source: file.relative_path.clone(),
            line: case.line,
            lines: case.line_count(),
            delimiter: case.delimiter,
            bytes,
        })
    }
}
