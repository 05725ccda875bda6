use crate::config::ScanConfig;
use crate::error::{IsolateError, Result};
use crate::scanner::file_filter::FileFilter;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub relative_path: PathBuf,
    pub size: u64,
}

impl SourceFile {
    pub fn new(path: PathBuf, relative_path: PathBuf, size: u64) -> Self {
        Self {
            path,
            relative_path,
            size,
        }
    }

    pub fn display_path(&self) -> String {
        self.relative_path.display().to_string()
    }
}

/// Files found under a root, in traversal order.
#[derive(Debug, Default)]
pub struct SourceListing {
    pub files: Vec<SourceFile>,
    /// Entries that could not be read and were skipped.
    pub skipped: Vec<String>,
}

impl SourceListing {
    pub fn total_bytes(&self) -> u64 {
        self.files.iter().map(|f| f.size).sum()
    }
}

pub struct SourceWalker {
    filter: FileFilter,
    max_depth: Option<usize>,
    follow_links: bool,
    skip_unreadable: bool,
}

impl SourceWalker {
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            filter: FileFilter::new(config),
            max_depth: config.max_depth,
            follow_links: config.follow_links,
            skip_unreadable: config.skip_unreadable,
        }
    }

    /// Lists every regular file under `root`.
    ///
    /// Entries are sorted by file name within each directory, so the listing
    /// (and therefore case numbering) is the same on every run.
    pub fn walk<P: AsRef<Path>>(&self, root: P) -> Result<SourceListing> {
        let root_path = root.as_ref();

        let root_metadata = std::fs::metadata(root_path).map_err(|source| {
            IsolateError::UnreadableInput {
                path: root_path.to_path_buf(),
                source,
            }
        })?;

        let mut walker = WalkDir::new(root_path)
            .follow_links(self.follow_links)
            .sort_by_file_name();
        if let Some(depth) = self.max_depth {
            walker = walker.max_depth(depth);
        }

        let mut listing = SourceListing::default();

        for entry in walker.into_iter().filter_entry(|e| self.should_traverse(e)) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) if self.skip_unreadable => {
                    listing.skipped.push(format!("Scan error: {}", err));
                    continue;
                }
                Err(err) => return Err(err.into()),
            };

            // Without follow_links a symlink is reported as such; one that
            // resolves to a regular file is still a source.
            let is_file = entry.file_type().is_file()
                || (entry.path_is_symlink() && entry.path().is_file());
            if !is_file {
                continue;
            }

            if root_metadata.is_dir() && !self.filter.is_source_file(entry.path()) {
                continue;
            }

            let size = match std::fs::metadata(entry.path()) {
                Ok(metadata) => metadata.len(),
                Err(err) if self.skip_unreadable => {
                    listing.skipped.push(format!(
                        "Cannot stat {}: {}",
                        entry.path().display(),
                        err
                    ));
                    continue;
                }
                Err(source) => {
                    return Err(IsolateError::UnreadableInput {
                        path: entry.path().to_path_buf(),
                        source,
                    })
                }
            };

            let relative_path = relative_to(entry.path(), root_path);
            listing
                .files
                .push(SourceFile::new(entry.path().to_path_buf(), relative_path, size));
        }

        Ok(listing)
    }

    fn should_traverse(&self, entry: &DirEntry) -> bool {
        // The root is always walked, whatever its name
        if entry.depth() == 0 {
            return true;
        }

        if entry.file_type().is_dir() {
            return self.filter.should_traverse_directory(entry.path());
        }

        true
    }
}

fn relative_to(path: &Path, root: &Path) -> PathBuf {
    match path.strip_prefix(root) {
        Ok(relative) if !relative.as_os_str().is_empty() => relative.to_path_buf(),
        _ => path
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| path.to_path_buf()),
    }
}
