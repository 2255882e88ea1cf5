//! Filesystem operation abstractions for dependency injection.
//!
//! The recursive copier and the jobs talk to the filesystem only through
//! [`FileSystemOps`], so failure handling can be unit-tested without
//! relying on OS permissions.  Production code uses [`SystemFileSystemOps`];
//! tests use `FailingFileSystemOps`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::resources::paths::{PathKind, classify, is_dir_link};

/// Abstraction over the filesystem calls made by the copier.
pub trait FileSystemOps: Send + Sync + std::fmt::Debug {
    /// Classify `path` as missing, a file or a directory.
    fn classify(&self, path: &Path) -> PathKind;

    /// Whether `path` is a link or junction pointing at a folder.
    fn is_dir_link(&self, path: &Path) -> bool;

    /// Create `path` and any missing ancestors.
    ///
    /// # Errors
    ///
    /// Returns an error if a component cannot be created.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Return the immediate children of the directory at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` cannot be listed.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>>;

    /// Stream the content of `from` into `to`, creating or truncating `to`.
    ///
    /// Returns the number of bytes written.
    ///
    /// # Errors
    ///
    /// Returns an error if either file cannot be opened or the copy is
    /// interrupted; `to` may then be truncated.
    fn copy_file(&self, from: &Path, to: &Path) -> io::Result<u64>;
}

/// Production [`FileSystemOps`] implementation that delegates to [`std::fs`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemFileSystemOps;

impl FileSystemOps for SystemFileSystemOps {
    fn classify(&self, path: &Path) -> PathKind {
        classify(path)
    }

    fn is_dir_link(&self, path: &Path) -> bool {
        is_dir_link(path)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let mut children = fs::read_dir(path)?
            .map(|e| e.map(|entry| entry.path()))
            .collect::<io::Result<Vec<_>>>()?;
        children.sort();
        Ok(children)
    }

    fn copy_file(&self, from: &Path, to: &Path) -> io::Result<u64> {
        let mut reader = fs::File::open(from)?;
        let mut writer = fs::File::create(to)?;
        io::copy(&mut reader, &mut writer)
    }
}

/// [`FileSystemOps`] wrapper that fails on selected paths.
///
/// Delegates to [`SystemFileSystemOps`] except for the configured paths,
/// which behave as if the OS denied access.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct FailingFileSystemOps {
    unreadable: Vec<PathBuf>,
}

#[cfg(test)]
impl FailingFileSystemOps {
    /// Create a wrapper with no failing paths.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make reads of `path` (file copy or directory listing) fail.
    #[must_use]
    pub fn with_unreadable(mut self, path: impl Into<PathBuf>) -> Self {
        self.unreadable.push(path.into());
        self
    }

    fn check(&self, path: &Path) -> io::Result<()> {
        if self.unreadable.iter().any(|p| p == path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "access is denied",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
impl FileSystemOps for FailingFileSystemOps {
    fn classify(&self, path: &Path) -> PathKind {
        SystemFileSystemOps.classify(path)
    }

    fn is_dir_link(&self, path: &Path) -> bool {
        SystemFileSystemOps.is_dir_link(path)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        SystemFileSystemOps.create_dir_all(path)
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        self.check(path)?;
        SystemFileSystemOps.read_dir(path)
    }

    fn copy_file(&self, from: &Path, to: &Path) -> io::Result<u64> {
        self.check(from)?;
        SystemFileSystemOps.copy_file(from, to)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn read_dir_lists_children_sorted() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), "b").unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        fs::create_dir(dir.path().join("c")).unwrap();

        let children = SystemFileSystemOps.read_dir(dir.path()).unwrap();
        let names: Vec<_> = children
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["a.txt", "b.txt", "c"]);
    }

    #[test]
    fn copy_file_truncates_existing_destination() {
        let dir = tempfile::tempdir().unwrap();
        let from = dir.path().join("from.txt");
        let to = dir.path().join("to.txt");
        fs::write(&from, "new").unwrap();
        fs::write(&to, "much longer old content").unwrap();

        let written = SystemFileSystemOps.copy_file(&from, &to).unwrap();
        assert_eq!(written, 3);
        assert_eq!(fs::read_to_string(&to).unwrap(), "new");
    }

    #[test]
    fn failing_ops_rejects_configured_path() {
        let dir = tempfile::tempdir().unwrap();
        let from = dir.path().join("locked.txt");
        fs::write(&from, "secret").unwrap();
        let ops = FailingFileSystemOps::new().with_unreadable(&from);

        let err = ops
            .copy_file(&from, &dir.path().join("out.txt"))
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
        assert!(!dir.path().join("out.txt").exists());
    }
}
