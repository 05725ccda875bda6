use crate::error::{IsolateError, Result};
use crate::extractor::case_writer::validate_file_stem;
use crate::scanner::MarkerSyntax;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub scan: ScanConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Only files with these extensions are scanned; empty means every file.
    pub extensions: Vec<String>,
    pub exclude_dirs: Vec<String>,
    pub exclude_patterns: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,
    pub follow_links: bool,
    pub skip_unreadable: bool,
    pub strict: bool,
    pub syntax: MarkerSyntax,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: PathBuf,
    pub stem: String,
    pub extension: String,
    pub start_index: usize,
    pub overwrite: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: Vec::new(),
            exclude_dirs: Vec::new(),
            exclude_patterns: Vec::new(),
            max_depth: None,
            follow_links: false,
            skip_unreadable: false,
            strict: false,
            syntax: MarkerSyntax::default(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            stem: "test".to_string(),
            extension: "sol".to_string(),
            start_index: 0,
            overwrite: true,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(IsolateError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| IsolateError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| IsolateError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["isolate-tests.toml", ".isolate-tests.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(ref output_dir) = cli_args.output_dir {
            self.output.directory = output_dir.clone();
        }

        if let Some(ref stem) = cli_args.stem {
            self.output.stem = stem.clone();
        }

        if let Some(ref extension) = cli_args.extension {
            self.output.extension = extension.trim_start_matches('.').to_string();
        }

        if let Some(start) = cli_args.start_index {
            self.output.start_index = start;
        }

        if let Some(ref exclude) = cli_args.exclude {
            self.scan.exclude_dirs.extend(exclude.clone());
        }

        if let Some(ref extensions) = cli_args.extensions {
            self.scan.extensions = extensions
                .iter()
                .map(|s| s.trim().trim_start_matches('.').to_lowercase())
                .filter(|s| !s.is_empty())
                .collect();
        }

        // Unset flags leave the file's value alone
        if cli_args.skip_unreadable {
            self.scan.skip_unreadable = true;
        }

        if cli_args.strict {
            self.scan.strict = true;
        }

        if cli_args.no_overwrite {
            self.output.overwrite = false;
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| IsolateError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        std::fs::write(path, content).map_err(|e| IsolateError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.scan.syntax.validate()?;

        for pattern in &self.scan.exclude_patterns {
            Regex::new(pattern).map_err(|e| IsolateError::Config {
                message: format!("Invalid exclude pattern {:?}: {}", pattern, e),
            })?;
        }

        if self.scan.max_depth == Some(0) {
            return Err(IsolateError::Config {
                message: "Maximum directory depth must be greater than 0".to_string(),
            });
        }

        validate_file_stem(&self.output.stem)?;

        if self
            .output
            .extension
            .chars()
            .any(|c| std::path::is_separator(c) || c.is_control())
        {
            return Err(IsolateError::Config {
                message: format!("Invalid output extension: {:?}", self.output.extension),
            });
        }

        if self.output.directory.exists() && !self.output.directory.is_dir() {
            return Err(IsolateError::Config {
                message: format!(
                    "Output path is not a directory: {}",
                    self.output.directory.display()
                ),
            });
        }

        Ok(())
    }

    pub fn create_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config).unwrap_or_else(|_| String::new())
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub output_dir: Option<PathBuf>,
    pub stem: Option<String>,
    pub extension: Option<String>,
    pub start_index: Option<usize>,
    pub exclude: Option<Vec<String>>,
    pub extensions: Option<Vec<String>>,
    pub skip_unreadable: bool,
    pub strict: bool,
    pub no_overwrite: bool,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output_dir(mut self, output_dir: Option<PathBuf>) -> Self {
        self.output_dir = output_dir;
        self
    }

    pub fn with_stem(mut self, stem: Option<String>) -> Self {
        self.stem = stem;
        self
    }

    pub fn with_extension(mut self, extension: Option<String>) -> Self {
        self.extension = extension;
        self
    }

    pub fn with_start_index(mut self, start: Option<usize>) -> Self {
        self.start_index = start;
        self
    }

    pub fn with_exclude(mut self, exclude: Option<Vec<String>>) -> Self {
        self.exclude = exclude;
        self
    }

    pub fn with_extensions(mut self, extensions: Option<Vec<String>>) -> Self {
        self.extensions = extensions;
        self
    }

    pub fn with_skip_unreadable(mut self, skip: bool) -> Self {
        self.skip_unreadable = skip;
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_no_overwrite(mut self, no_overwrite: bool) -> Self {
        self.no_overwrite = no_overwrite;
        self
    }
}
