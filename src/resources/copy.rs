//! Recursive copy of files and directory trees with error aggregation.
//!
//! A directory copy visits every child even when some of them fail, then
//! reports all failures together as [`CopyError::Partial`].
//!
//! The source given to [`copy`] is followed if it is a link. Inside the
//! tree, links to files are copied as their content and links or junctions
//! to folders are reported as [`CopyError::LinkedDirectory`] without being
//! entered.
use std::fmt::Write as _;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::paths::{PathKind, canonical_or_nearest};
use crate::operations::FileSystemOps;

/// Failure of a copy operation.
#[derive(Error, Debug)]
pub enum CopyError {
    /// The copy source does not exist.
    #[error("source does not exist: {}", .0.display())]
    NotFound(PathBuf),

    /// The source path has no final component to name the copy after.
    #[error("source has no file name: {}", .0.display())]
    NoFileName(PathBuf),

    /// A file occupies a path that must be a directory.
    #[error("destination exists and is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// A single filesystem call failed.
    #[error("{action} {}: {source}", .path.display())]
    Io {
        /// What was being done (e.g. "copying", "listing").
        action: &'static str,
        /// The path the failing call was applied to.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The destination lies inside the folder being copied.
    #[error("destination is inside the copied folder: {}", .0.display())]
    DestinationInsideSource(PathBuf),

    /// A link to a folder inside the copied tree; it is not entered.
    #[error("folder link not followed: {}", .0.display())]
    LinkedDirectory(PathBuf),

    /// One or more entries of a directory tree failed to copy.
    #[error("{}", render_partial(.0))]
    Partial(Vec<CopyError>),
}

impl CopyError {
    /// Paths named by this error, one per individual failure.
    #[must_use]
    pub fn failed_paths(&self) -> Vec<&Path> {
        match self {
            Self::NotFound(p)
            | Self::NoFileName(p)
            | Self::NotADirectory(p)
            | Self::DestinationInsideSource(p)
            | Self::LinkedDirectory(p) => vec![p.as_path()],
            Self::Io { path, .. } => vec![path.as_path()],
            Self::Partial(errors) => errors.iter().flat_map(Self::failed_paths).collect(),
        }
    }

    /// Number of individual failures contained in this error.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        match self {
            Self::Partial(errors) => errors.iter().map(Self::failure_count).sum(),
            _ => 1,
        }
    }

    fn io(action: &'static str, path: &Path, source: io::Error) -> Self {
        Self::Io {
            action,
            path: path.to_path_buf(),
            source,
        }
    }
}

fn render_partial(errors: &[CopyError]) -> String {
    let mut out = format!("{} entr", errors.len());
    out.push_str(if errors.len() == 1 { "y" } else { "ies" });
    out.push_str(" failed to copy:");
    for e in errors {
        let _ = write!(out, "\n  - {e}");
    }
    out
}

/// Copy `source` into `destination_root`.
///
/// A file lands at `destination_root/<file name>`; a directory is recreated
/// as `destination_root/<dir name>` with all of its content. Existing files
/// are overwritten.
///
/// # Errors
///
/// Returns [`CopyError::NotFound`] for a missing source,
/// [`CopyError::DestinationInsideSource`] before anything is written when
/// `destination_root` is the source folder or lies below it, and
/// [`CopyError::Partial`] listing every entry that failed while the rest of
/// the tree was still copied.
pub fn copy(
    fs: &dyn FileSystemOps,
    source: &Path,
    destination_root: &Path,
) -> Result<(), CopyError> {
    match fs.classify(source) {
        PathKind::Missing => Err(CopyError::NotFound(source.to_path_buf())),
        PathKind::File => {
            ensure_dir(fs, destination_root)?;
            copy_file_into(fs, source, destination_root)
        }
        PathKind::Directory => {
            let name = source
                .file_name()
                .ok_or_else(|| CopyError::NoFileName(source.to_path_buf()))?;
            if canonical_or_nearest(destination_root).starts_with(canonical_or_nearest(source)) {
                return Err(CopyError::DestinationInsideSource(destination_root.to_path_buf()));
            }
            let target = destination_root.join(name);
            ensure_dir(fs, &target)?;
            copy_children(fs, source, &target)
        }
    }
}

/// Source and destination of the restore mirroring a backup of `original`
/// into `backup_target`.
///
/// # Errors
///
/// Returns [`CopyError::NoFileName`] when `original` has no file name or no
/// parent directory.
pub fn restore_pair(
    original: &Path,
    backup_target: &Path,
) -> Result<(PathBuf, PathBuf), CopyError> {
    let name = original
        .file_name()
        .ok_or_else(|| CopyError::NoFileName(original.to_path_buf()))?;
    let parent = original
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .ok_or_else(|| CopyError::NoFileName(original.to_path_buf()))?;
    Ok((backup_target.join(name), parent.to_path_buf()))
}

fn ensure_dir(fs: &dyn FileSystemOps, dir: &Path) -> Result<(), CopyError> {
    match fs.classify(dir) {
        PathKind::Directory => Ok(()),
        PathKind::File => Err(CopyError::NotADirectory(dir.to_path_buf())),
        PathKind::Missing => fs
            .create_dir_all(dir)
            .map_err(|e| CopyError::io("creating", dir, e)),
    }
}

fn copy_file_into(fs: &dyn FileSystemOps, file: &Path, dir: &Path) -> Result<(), CopyError> {
    let name = file
        .file_name()
        .ok_or_else(|| CopyError::NoFileName(file.to_path_buf()))?;
    fs.copy_file(file, &dir.join(name))
        .map(|_| ())
        .map_err(|e| CopyError::io("copying", file, e))
}

fn copy_children(fs: &dyn FileSystemOps, source: &Path, target: &Path) -> Result<(), CopyError> {
    let children = fs
        .read_dir(source)
        .map_err(|e| CopyError::io("listing", source, e))?;

    let mut failures = Vec::new();
    for child in children {
        let result = match fs.classify(&child) {
            PathKind::Directory if fs.is_dir_link(&child) => Err(CopyError::LinkedDirectory(child)),
            PathKind::Directory => copy(fs, &child, target),
            PathKind::File => copy_file_into(fs, &child, target),
            PathKind::Missing => Err(CopyError::NotFound(child)),
        };
        match result {
            Ok(()) => {}
            Err(CopyError::Partial(nested)) => failures.extend(nested),
            Err(e) => failures.push(e),
        }
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(CopyError::Partial(failures))
    }
}

#[cfg(test)]
#[allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::operations::{FailingFileSystemOps, SystemFileSystemOps};
    use std::fs;

    fn tree(root: &Path) -> PathBuf {
        let src = root.join("Saved Games");
        fs::create_dir_all(src.join("profiles/slot1")).unwrap();
        fs::write(src.join("settings.ini"), "volume=7").unwrap();
        fs::write(src.join("profiles/slot1/save.dat"), b"\x00\x01\x02").unwrap();
        fs::write(src.join("profiles/readme.txt"), "hello").unwrap();
        src
    }

    // -----------------------------------------------------------------------
    // Single files
    // -----------------------------------------------------------------------

    #[test]
    fn copies_file_into_missing_destination_root() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("notes.txt");
        fs::write(&file, "abc").unwrap();
        let dest = dir.path().join("backup/nested");

        copy(&SystemFileSystemOps, &file, &dest).unwrap();

        assert_eq!(fs::read_to_string(dest.join("notes.txt")).unwrap(), "abc");
    }

    #[test]
    fn file_destination_root_occupied_by_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("notes.txt");
        fs::write(&file, "abc").unwrap();
        let blocker = dir.path().join("backup");
        fs::write(&blocker, "i am a file").unwrap();

        let err = copy(&SystemFileSystemOps, &file, &blocker).unwrap_err();
        assert!(matches!(err, CopyError::NotADirectory(p) if p == blocker));
    }

    #[test]
    fn missing_source_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = copy(
            &SystemFileSystemOps,
            &dir.path().join("nope"),
            &dir.path().join("out"),
        )
        .unwrap_err();
        assert!(matches!(err, CopyError::NotFound(_)));
        assert!(!dir.path().join("out").exists(), "nothing should be created");
    }

    // -----------------------------------------------------------------------
    // Directory trees
    // -----------------------------------------------------------------------

    #[test]
    fn copies_directory_tree_under_its_basename() {
        let dir = tempfile::tempdir().unwrap();
        let src = tree(dir.path());
        let dest = dir.path().join("backup");

        copy(&SystemFileSystemOps, &src, &dest).unwrap();

        let copied = dest.join("Saved Games");
        assert_eq!(
            fs::read_to_string(copied.join("settings.ini")).unwrap(),
            "volume=7"
        );
        assert_eq!(
            fs::read(copied.join("profiles/slot1/save.dat")).unwrap(),
            b"\x00\x01\x02"
        );
        assert_eq!(
            fs::read_to_string(copied.join("profiles/readme.txt")).unwrap(),
            "hello"
        );
    }

    #[test]
    fn directory_target_occupied_by_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let src = tree(dir.path());
        let dest = dir.path().join("backup");
        fs::create_dir(&dest).unwrap();
        fs::write(dest.join("Saved Games"), "blocker").unwrap();

        let err = copy(&SystemFileSystemOps, &src, &dest).unwrap_err();
        assert!(matches!(err, CopyError::NotADirectory(_)));
    }

    #[test]
    fn copying_twice_overwrites_without_duplication() {
        let dir = tempfile::tempdir().unwrap();
        let src = tree(dir.path());
        let dest = dir.path().join("backup");

        copy(&SystemFileSystemOps, &src, &dest).unwrap();
        copy(&SystemFileSystemOps, &src, &dest).unwrap();

        let copied = dest.join("Saved Games");
        let top: Vec<_> = fs::read_dir(&copied).unwrap().collect();
        assert_eq!(top.len(), 2, "settings.ini and profiles only");
        assert_eq!(
            fs::read_to_string(copied.join("settings.ini")).unwrap(),
            "volume=7"
        );
        assert!(!copied.join("Saved Games").exists(), "no nested duplicate");
    }

    #[test]
    fn unreadable_file_is_reported_and_siblings_still_copied() {
        let dir = tempfile::tempdir().unwrap();
        let src = tree(dir.path());
        let locked = src.join("profiles/readme.txt");
        let ops = FailingFileSystemOps::new().with_unreadable(&locked);
        let dest = dir.path().join("backup");

        let err = copy(&ops, &src, &dest).unwrap_err();

        assert_eq!(err.failure_count(), 1);
        assert_eq!(err.failed_paths(), vec![locked.as_path()]);
        let copied = dest.join("Saved Games");
        assert!(copied.join("settings.ini").exists());
        assert!(copied.join("profiles/slot1/save.dat").exists());
        assert!(!copied.join("profiles/readme.txt").exists());
    }

    #[test]
    fn failures_in_several_subtrees_are_flattened() {
        let dir = tempfile::tempdir().unwrap();
        let src = tree(dir.path());
        let ops = FailingFileSystemOps::new()
            .with_unreadable(src.join("settings.ini"))
            .with_unreadable(src.join("profiles/slot1"));
        let dest = dir.path().join("backup");

        let err = copy(&ops, &src, &dest).unwrap_err();

        let CopyError::Partial(errors) = &err else {
            panic!("expected a partial failure, got {err}");
        };
        assert_eq!(errors.len(), 2);
        assert!(
            errors.iter().all(|e| !matches!(e, CopyError::Partial(_))),
            "nested aggregates should be flattened"
        );
        let message = err.to_string();
        assert!(message.starts_with("2 entries failed to copy:"));
        assert!(message.contains("settings.ini"));
        assert!(message.contains("slot1"));
        assert!(dest.join("Saved Games/profiles/readme.txt").exists());
    }

    #[test]
    fn destination_inside_source_is_refused_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let home = dir.path().join("home");
        fs::create_dir(&home).unwrap();
        fs::write(home.join("a.txt"), "a").unwrap();
        let dest = home.join("Backup");

        let err = copy(&SystemFileSystemOps, &home, &dest).unwrap_err();

        assert!(matches!(&err, CopyError::DestinationInsideSource(p) if *p == dest));
        assert_eq!(err.failure_count(), 1);
        assert!(!dest.exists(), "nothing may be created");
    }

    #[test]
    fn destination_equal_to_source_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let src = tree(dir.path());
        let err = copy(&SystemFileSystemOps, &src, &src.join("profiles/..")).unwrap_err();
        assert!(matches!(err, CopyError::DestinationInsideSource(_)));
        assert!(!src.join("Saved Games").exists());
    }

    #[test]
    fn sibling_with_common_prefix_is_not_inside() {
        let dir = tempfile::tempdir().unwrap();
        let src = tree(dir.path());
        let dest = dir.path().join("Saved Games Backup");

        copy(&SystemFileSystemOps, &src, &dest).unwrap();

        assert!(dest.join("Saved Games/settings.ini").exists());
    }

    #[cfg(unix)]
    #[test]
    fn folder_links_inside_the_tree_are_not_entered() {
        let dir = tempfile::tempdir().unwrap();
        let src = tree(dir.path());
        std::os::unix::fs::symlink(&src, src.join("loop")).unwrap();
        std::os::unix::fs::symlink(src.join("settings.ini"), src.join("settings.lnk")).unwrap();
        let dest = dir.path().join("backup");

        let err = copy(&SystemFileSystemOps, &src, &dest).unwrap_err();

        assert_eq!(err.failed_paths(), vec![src.join("loop").as_path()]);
        let copied = dest.join("Saved Games");
        assert!(!copied.join("loop").exists());
        assert_eq!(fs::read_to_string(copied.join("settings.lnk")).unwrap(), "volume=7");
        assert!(copied.join("profiles/slot1/save.dat").exists());
    }

    // -----------------------------------------------------------------------
    // Restore mirror
    // -----------------------------------------------------------------------

    #[test]
    fn restore_pair_mirrors_backup() {
        let (from, to) =
            restore_pair(Path::new("/home/alice/Saved Games"), Path::new("/mnt/backup"))
                .unwrap();
        assert_eq!(from, Path::new("/mnt/backup/Saved Games"));
        assert_eq!(to, Path::new("/home/alice"));
    }

    #[test]
    fn restore_pair_rejects_bare_names() {
        assert!(restore_pair(Path::new("relative"), Path::new("/mnt/backup")).is_err());
        assert!(restore_pair(Path::new("/"), Path::new("/mnt/backup")).is_err());
    }
}
