use crate::config::OutputConfig;
use crate::error::{IsolateError, Result};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// Writes case bodies to `<stem><index>.<extension>` inside one directory.
pub struct CaseWriter {
    output_dir: PathBuf,
    stem: String,
    extension: String,
    overwrite: bool,
    dry_run: bool,
    buffer_size: usize,
}

impl CaseWriter {
    pub fn new<P: Into<PathBuf>>(output_dir: P) -> Self {
        let defaults = OutputConfig::default();
        Self {
            output_dir: output_dir.into(),
            stem: defaults.stem,
            extension: defaults.extension,
            overwrite: defaults.overwrite,
            dry_run: false,
            buffer_size: 64 * 1024, // 64KB buffer
        }
    }

    pub fn from_config(config: &OutputConfig) -> Self {
        Self::new(config.directory.clone())
            .with_stem(config.stem.clone())
            .with_extension(config.extension.clone())
            .with_overwrite(config.overwrite)
    }

    pub fn with_stem<S: Into<String>>(mut self, stem: S) -> Self {
        self.stem = stem.into();
        self
    }

    pub fn with_extension<S: Into<String>>(mut self, extension: S) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn file_name(&self, index: usize) -> String {
        if self.extension.is_empty() {
            format!("{}{}", self.stem, index)
        } else {
            format!("{}{}.{}", self.stem, index, self.extension)
        }
    }

    pub fn case_path(&self, index: usize) -> PathBuf {
        self.output_dir.join(self.file_name(index))
    }

    /// Creates the output directory if it is missing.
    pub fn prepare(&self) -> Result<()> {
        if self.dry_run || self.output_dir.exists() {
            return Ok(());
        }

        fs::create_dir_all(&self.output_dir).map_err(|source| IsolateError::WriteFailure {
            path: self.output_dir.clone(),
            source,
        })
    }

    /// Writes one case body verbatim and returns the number of bytes written.
    pub fn write_case(&self, index: usize, content: &str) -> Result<u64> {
        let dest = self.case_path(index);

        if self.dry_run {
            return Ok(content.len() as u64);
        }

        if !self.overwrite && dest.exists() {
            return Err(IsolateError::OutputFileExists {
                path: dest.display().to_string(),
            });
        }

        let write_failure = |source: std::io::Error| IsolateError::WriteFailure {
            path: dest.clone(),
            source,
        };

        let file = fs::File::create(&dest).map_err(write_failure)?;
        let mut writer = BufWriter::with_capacity(self.buffer_size, file);
        writer.write_all(content.as_bytes()).map_err(write_failure)?;
        writer.flush().map_err(write_failure)?;

        Ok(content.len() as u64)
    }
}

/// Rejects stems that would place output files outside the output directory
/// or that no filesystem accepts.
pub fn validate_file_stem(stem: &str) -> Result<()> {
    if stem.chars().any(std::path::is_separator) || stem == ".." {
        return Err(IsolateError::InvalidPath {
            path: format!("Output stem must not contain path separators: {}", stem),
        });
    }

    let invalid_chars = ['<', '>', ':', '"', '|', '?', '*'];
    if stem
        .chars()
        .any(|c| invalid_chars.contains(&c) || c.is_control())
    {
        return Err(IsolateError::InvalidPath {
            path: format!("Output stem contains invalid characters: {}", stem),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_naming() {
        let writer = CaseWriter::new("out");
        assert_eq!(writer.file_name(0), "test0.sol");
        assert_eq!(writer.file_name(17), "test17.sol");

        let writer = CaseWriter::new("out").with_stem("case_").with_extension("");
        assert_eq!(writer.file_name(3), "case_3");
        assert_eq!(writer.case_path(3), PathBuf::from("out").join("case_3"));
    }

    #[test]
    fn test_write_case_is_verbatim() {
        let temp_dir = TempDir::new().unwrap();
        let writer = CaseWriter::new(temp_dir.path());

        let body = "  contract C {\n\tfunction f() {}\n  }\n";
        let bytes = writer.write_case(0, body).unwrap();

        assert_eq!(bytes, body.len() as u64);
        let written = fs::read_to_string(temp_dir.path().join("test0.sol")).unwrap();
        assert_eq!(written, body);
    }

    #[test]
    fn test_empty_case_creates_empty_file() {
        let temp_dir = TempDir::new().unwrap();
        let writer = CaseWriter::new(temp_dir.path());

        writer.write_case(5, "").unwrap();

        let path = temp_dir.path().join("test5.sol");
        assert!(path.exists());
        assert_eq!(fs::metadata(path).unwrap().len(), 0);
    }

    #[test]
    fn test_overwrite_policy() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("test0.sol"), "old").unwrap();

        let writer = CaseWriter::new(temp_dir.path());
        writer.write_case(0, "new\n").unwrap();
        assert_eq!(
            fs::read_to_string(temp_dir.path().join("test0.sol")).unwrap(),
            "new\n"
        );

        let writer = CaseWriter::new(temp_dir.path()).with_overwrite(false);
        let result = writer.write_case(0, "newer\n");
        assert!(matches!(result, Err(IsolateError::OutputFileExists { .. })));
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let out = temp_dir.path().join("not_created");
        let writer = CaseWriter::new(&out).with_dry_run(true);

        writer.prepare().unwrap();
        assert_eq!(writer.write_case(0, "abc\n").unwrap(), 4);
        assert!(!out.exists());
    }

    #[test]
    fn test_prepare_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let out = temp_dir.path().join("a/b");
        let writer = CaseWriter::new(&out);

        writer.prepare().unwrap();
        assert!(out.is_dir());
    }

    #[test]
    fn test_write_failure_when_directory_missing() {
        let temp_dir = TempDir::new().unwrap();
        let writer = CaseWriter::new(temp_dir.path().join("missing"));

        let result = writer.write_case(0, "x\n");
        assert!(matches!(result, Err(IsolateError::WriteFailure { .. })));
    }

    #[test]
    fn test_stem_validation() {
        assert!(validate_file_stem("test").is_ok());
        assert!(validate_file_stem("").is_ok());
        assert!(validate_file_stem("sub/test").is_err());
        assert!(validate_file_stem("..").is_err());
        assert!(validate_file_stem("bad|name").is_err());
    }
}
