//! Access to book files (intro chapters, part headers).
//!
//! All paths are relative to the book input directory and use `/` as the
//! separator, like the paths in the summary.

use crate::EbookError;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Read-only view of the book input directory.
pub trait BookSource {
    /// Reads a file as UTF-8 text.
    fn read_to_string(&self, path: &str) -> Result<String, EbookError>;

    /// Lists the file names directly inside a directory, or `None` when the
    /// directory does not exist. Order is unspecified.
    fn list_dir(&self, dir: &str) -> Result<Option<Vec<String>>, EbookError>;
}

/// Filesystem-backed source rooted at the book input directory.
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    /// Creates a source rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl BookSource for FsSource {
    fn read_to_string(&self, path: &str) -> Result<String, EbookError> {
        std::fs::read_to_string(self.root.join(path)).map_err(|err| EbookError::io(path, err))
    }

    fn list_dir(&self, dir: &str) -> Result<Option<Vec<String>>, EbookError> {
        let entries = match std::fs::read_dir(self.root.join(dir)) {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(EbookError::io(dir, err)),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|err| EbookError::io(dir, err))?;
            if entry.path().is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        Ok(Some(names))
    }
}

/// In-memory source, for tests and hosts that already hold the files.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: BTreeMap<String, String>,
}

impl MemorySource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file.
    pub fn with_file(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.files.insert(path.into(), content.into());
        self
    }
}

impl BookSource for MemorySource {
    fn read_to_string(&self, path: &str) -> Result<String, EbookError> {
        self.files.get(path).cloned().ok_or_else(|| {
            EbookError::io(path, std::io::Error::new(ErrorKind::NotFound, "no such file"))
        })
    }

    fn list_dir(&self, dir: &str) -> Result<Option<Vec<String>>, EbookError> {
        let prefix = format!("{}/", dir.trim_end_matches('/'));
        let names: Vec<String> = self
            .files
            .keys()
            .filter_map(|path| path.strip_prefix(&prefix))
            .filter(|rest| !rest.contains('/'))
            .map(str::to_string)
            .collect();

        if names.is_empty() {
            Ok(None)
        } else {
            Ok(Some(names))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fs_source_lists_files_only() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("intro/imagens")).unwrap();
        std::fs::write(dir.path().join("intro/b.md"), "# B").unwrap();
        std::fs::write(dir.path().join("intro/a.md"), "# A").unwrap();

        let source = FsSource::new(dir.path());
        let mut names = source.list_dir("intro").unwrap().unwrap();
        names.sort();
        assert_eq!(names, vec!["a.md", "b.md"]);
        assert_eq!(source.read_to_string("intro/a.md").unwrap(), "# A");
    }

    #[test]
    fn fs_source_reports_missing_directory_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let source = FsSource::new(dir.path());
        assert!(source.list_dir("intro").unwrap().is_none());
    }

    #[test]
    fn fs_source_tags_read_errors_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = FsSource::new(dir.path())
            .read_to_string("part-1/header.md")
            .unwrap_err();
        assert!(matches!(err, EbookError::Io { ref path, .. } if path == "part-1/header.md"));
    }

    #[test]
    fn memory_source_lists_direct_children() {
        let source = MemorySource::new()
            .with_file("intro/a.md", "# A")
            .with_file("intro/nested/b.md", "# B")
            .with_file("other.md", "x");

        assert_eq!(source.list_dir("intro").unwrap(), Some(vec!["a.md".to_string()]));
        assert_eq!(source.list_dir("missing").unwrap(), None);
    }
}
