use crate::config::ScanConfig;
use regex::Regex;
use std::path::Path;

pub struct FileFilter {
    extensions: Vec<String>,
    exclude_dirs: Vec<String>,
    exclude_patterns: Vec<Regex>,
}

impl FileFilter {
    pub fn new(config: &ScanConfig) -> Self {
        let exclude_patterns = config
            .exclude_patterns
            .iter()
            .filter_map(|pattern| Regex::new(pattern).ok())
            .collect();

        Self {
            extensions: config
                .extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_lowercase())
                .collect(),
            exclude_dirs: config.exclude_dirs.clone(),
            exclude_patterns,
        }
    }

    /// Whether a regular file should be handed to the literal scanner.
    pub fn is_source_file(&self, path: &Path) -> bool {
        if self.matches_any_pattern(&path.to_string_lossy()) {
            return false;
        }

        if self.extensions.is_empty() {
            return true;
        }

        path.extension()
            .and_then(|s| s.to_str())
            .map(|ext| self.extensions.contains(&ext.to_lowercase()))
            .unwrap_or(false)
    }

    pub fn should_traverse_directory(&self, path: &Path) -> bool {
        if let Some(dir_name) = path.file_name().and_then(|s| s.to_str()) {
            if self.exclude_dirs.iter().any(|exclude| exclude == dir_name) {
                return false;
            }
        }

        !self.matches_any_pattern(&path.to_string_lossy())
    }

    pub fn get_extensions(&self) -> &Vec<String> {
        &self.extensions
    }

    pub fn matches_any_pattern(&self, text: &str) -> bool {
        self.exclude_patterns
            .iter()
            .any(|pattern| pattern.is_match(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn create_test_config() -> ScanConfig {
        ScanConfig {
            extensions: vec!["cpp".to_string(), ".h".to_string()],
            exclude_dirs: vec![".git".to_string(), "build".to_string()],
            exclude_patterns: vec![r"_generated\.".to_string()],
            ..ScanConfig::default()
        }
    }

    #[test]
    fn test_extension_filtering() {
        let filter = FileFilter::new(&create_test_config());

        assert!(filter.is_source_file(&PathBuf::from("test/SolidityEndToEnd.cpp")));
        assert!(filter.is_source_file(&PathBuf::from("include/Options.H")));
        assert!(!filter.is_source_file(&PathBuf::from("README.md")));
        assert!(!filter.is_source_file(&PathBuf::from("Makefile")));
        assert_eq!(filter.get_extensions(), &vec!["cpp", "h"]);
    }

    #[test]
    fn test_empty_extensions_accept_everything() {
        let filter = FileFilter::new(&ScanConfig::default());

        assert!(filter.is_source_file(&PathBuf::from("Makefile")));
        assert!(filter.is_source_file(&PathBuf::from("notes.txt")));
    }

    #[test]
    fn test_exclude_patterns() {
        let filter = FileFilter::new(&create_test_config());

        assert!(!filter.is_source_file(&PathBuf::from("src/parser_generated.cpp")));
        assert!(filter.matches_any_pattern("a_generated.h"));
        assert!(!filter.matches_any_pattern("generated.h"));
    }

    #[test]
    fn test_directory_exclusion() {
        let filter = FileFilter::new(&create_test_config());

        assert!(!filter.should_traverse_directory(&PathBuf::from("repo/.git")));
        assert!(!filter.should_traverse_directory(&PathBuf::from("repo/build")));
        assert!(filter.should_traverse_directory(&PathBuf::from("repo/test")));
        assert!(filter.should_traverse_directory(&PathBuf::from("repo/Build")));
    }
}
