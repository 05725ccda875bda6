pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod scanner;
pub mod ui;

// Public API re-exports
pub use cli::{Cli, OutputFormat};
pub use config::{CliOverrides, Config, OutputConfig, ScanConfig};
pub use error::{IsolateError, Result, UserFriendlyError};

// Core functionality re-exports
pub use extractor::{
    CaseCounter, CaseWriter, Collector, ConfigSnapshot, ExtractionProgress, ExtractionReport,
    WrittenCase,
};
pub use scanner::{
    extract_cases, ExtractedCase, FileFilter, LiteralScanner, MarkerSyntax, ScanOutcome,
    SourceFile, SourceListing, SourceWalker, UnterminatedLiteral,
};
pub use ui::{OutputFormatter, OutputMode, ProgressManager};

use std::path::Path;

/// Main library interface: walks a tree and isolates every raw string literal
/// into its own file.
pub struct IsolateTests {
    config: Config,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
    dry_run: bool,
}

impl IsolateTests {
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::new(!quiet && output_mode == OutputMode::Human);

        Self {
            config,
            output_formatter,
            progress_manager,
            dry_run: false,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Create an instance from CLI arguments
    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        let output_mode = match cli_args.output_format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        };

        Ok(
            Self::new(config, output_mode, cli_args.verbose, cli_args.quiet)
                .with_dry_run(cli_args.dry_run),
        )
    }

    /// Walk `root`, extract every literal and write one file per case.
    ///
    /// Stops at the first fatal error; files written before it stay on disk.
    pub fn isolate<P: AsRef<Path>>(&self, root: P) -> Result<ExtractionReport> {
        let root = root.as_ref();

        if self.dry_run {
            self.output_formatter
                .info("DRY RUN MODE - No files will be written");
        }

        let listing = self.list_sources(root)?;
        for skipped in &listing.skipped {
            self.output_formatter.warning(skipped);
        }

        self.output_formatter
            .info(&format!("Found {} files to scan", listing.files.len()));
        self.output_formatter.debug(&format!(
            "Scanning {} bytes of source",
            listing.total_bytes()
        ));

        let mut progress = self.collect(&listing)?;

        for warning in &progress.warnings {
            self.output_formatter.warning(warning);
        }
        // Walk-time skips go first in the report
        let mut warnings = listing.skipped;
        warnings.append(&mut progress.warnings);
        progress.warnings = warnings;

        Ok(ExtractionReport::new(
            root,
            &self.config.output.directory,
            progress,
            &self.config,
            self.dry_run,
        ))
    }

    fn list_sources(&self, root: &Path) -> Result<SourceListing> {
        self.output_formatter
            .start_operation(&format!("Walking {}", root.display()));

        let spinner = self.progress_manager.create_spinner("Listing source files");
        let walker = SourceWalker::new(&self.config.scan);
        let listing = walker.walk(root);
        spinner.finish_and_clear();

        listing
    }

    fn collect(&self, listing: &SourceListing) -> Result<ExtractionProgress> {
        self.output_formatter.start_operation("Extracting raw string literals");

        let collector = Collector::from_config(&self.config, self.dry_run)?;
        let file_progress = self
            .progress_manager
            .create_file_progress(listing.files.len() as u64);
        let progress_callback = {
            let pb = file_progress.clone();
            move |progress: &ExtractionProgress| {
                ui::progress::update_file_progress(&pb, progress);
            }
        };

        let result = collector.collect_files(
            &listing.files,
            CaseCounter::new(self.config.output.start_index),
            Some(&progress_callback),
        );

        match result {
            Ok(progress) => {
                ui::progress::finish_progress_with_summary(
                    &file_progress,
                    &format!("Extracted {} cases", progress.cases_written),
                    progress.elapsed(),
                );
                Ok(progress)
            }
            Err(e) => {
                file_progress.abandon();
                Err(e)
            }
        }
    }

    /// Generate sample configuration file
    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        let sample_config = Config::create_sample_config();
        std::fs::write(output_path.as_ref(), sample_config).map_err(IsolateError::Io)?;
        Ok(())
    }

    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    /// Handle error with user-friendly output
    pub fn handle_error(&self, error: &IsolateError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}

/// Extract every case under `root` into `output_dir` with default settings.
pub fn isolate_cases<P: AsRef<Path>, Q: AsRef<Path>>(
    root: P,
    output_dir: Q,
) -> Result<ExtractionReport> {
    let mut config = Config::default();
    config.output.directory = output_dir.as_ref().to_path_buf();
    config.validate()?;

    IsolateTests::new(config, OutputMode::Plain, 0, true).isolate(root)
}

/// Get version information
pub fn version_info() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
