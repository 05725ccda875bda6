use crate::config::{CliOverrides, Config};
use crate::error::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "isolate-tests")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Extract multi-line raw string literals into standalone test files")]
#[command(
    long_about = "isolate-tests walks a source tree and writes the body of every multi-line \
                  raw string literal (R\"delim( ... )delim\";) to its own numbered file, \
                  e.g. to feed inline test cases to a fuzzer or a standalone compiler."
)]
#[command(after_help = "EXAMPLES:\n  \
    isolate-tests test/libsolidity\n  \
    isolate-tests test --output-dir corpus --stem case --extension txt\n  \
    isolate-tests test --extensions cpp,h --strict --verbose")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Directory (or single file) to scan
    #[arg(value_parser = validate_input_path, required_unless_present = "generate_config")]
    pub path: Option<PathBuf>,

    /// Directory receiving the extracted files (defaults to the current directory)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Base name of the output files
    #[arg(long, help = "Output file base name (default: test)")]
    pub stem: Option<String>,

    /// Extension of the output files
    #[arg(long, help = "Output file extension (default: sol)")]
    pub extension: Option<String>,

    /// Number of the first output file
    #[arg(long)]
    pub start: Option<usize>,

    /// Directories to exclude from the traversal
    #[arg(short, long, value_delimiter = ',')]
    pub exclude: Option<Vec<String>>,

    /// Only scan files with these extensions (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub extensions: Option<Vec<String>>,

    /// Skip files that cannot be read instead of aborting
    #[arg(long)]
    pub skip_unreadable: bool,

    /// Treat a literal that is never closed as an error
    #[arg(long)]
    pub strict: bool,

    /// Refuse to overwrite existing output files
    #[arg(long)]
    pub no_overwrite: bool,

    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Scan and report without writing any file
    #[arg(long, help = "Show what would be extracted without writing files")]
    pub dry_run: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        CliOverrides::new()
            .with_output_dir(self.output_dir.clone())
            .with_stem(self.stem.clone())
            .with_extension(self.extension.clone())
            .with_start_index(self.start)
            .with_exclude(self.exclude.clone())
            .with_extensions(self.extensions.clone())
            .with_skip_unreadable(self.skip_unreadable)
            .with_strict(self.strict)
            .with_no_overwrite(self.no_overwrite)
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}

/// Rejects an empty path; existence is checked by the walker so that a
/// missing root is reported like any other unreadable input.
pub fn validate_input_path(s: &str) -> std::result::Result<PathBuf, String> {
    if s.trim().is_empty() {
        return Err("Path must not be empty".to_string());
    }

    Ok(PathBuf::from(s))
}
