//! `%NAME%` placeholder expansion and path classification.
use std::path::{Path, PathBuf};

/// Classification of a filesystem path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    /// Nothing exists at the path (or it cannot be stat'ed).
    Missing,
    /// A file, or anything that is not a directory.
    File,
    /// A directory.
    Directory,
}

/// Expand every `%NAME%` placeholder against the process environment.
///
/// Undefined variables expand to the empty string; this never fails.
#[must_use]
pub fn expand_placeholders(path: &str) -> String {
    expand_placeholders_with(path, |name| std::env::var(name).ok())
}

/// Expand every `%NAME%` placeholder using `lookup`.
///
/// Tokens are matched non-greedily: `%A%\%B%` resolves `A` and `B`
/// separately. A `%` with no closing partner is kept as-is.
pub fn expand_placeholders_with<F>(path: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(path.len());
    let mut rest = path;
    while let Some((before, after_open)) = rest.split_once('%') {
        out.push_str(before);
        let Some((name, after_close)) = after_open.split_once('%') else {
            out.push('%');
            out.push_str(after_open);
            return out;
        };
        if let Some(value) = lookup(name) {
            out.push_str(&value);
        }
        rest = after_close;
    }
    out.push_str(rest);
    out
}

/// Whether a file or directory exists at `path`.
///
/// Leading and trailing whitespace (including newlines left by prompts) is
/// ignored. Placeholders are not expanded here.
#[must_use]
pub fn path_exists(path: &str) -> bool {
    let trimmed = path.trim();
    !trimmed.is_empty() && Path::new(trimmed).exists()
}

/// Classify `path`. Links are followed, so a link to a folder is a
/// [`PathKind::Directory`].
#[must_use]
pub fn classify(path: &Path) -> PathKind {
    match std::fs::metadata(path) {
        Err(_) => PathKind::Missing,
        Ok(meta) if meta.is_dir() => PathKind::Directory,
        Ok(_) => PathKind::File,
    }
}

/// Whether `path` is a symbolic link or junction that resolves to a folder.
#[must_use]
pub fn is_dir_link(path: &Path) -> bool {
    std::fs::symlink_metadata(path).is_ok_and(|meta| meta.file_type().is_symlink())
        && path.is_dir()
}

/// Canonical form of `path`, also for paths that do not exist yet.
///
/// The deepest existing ancestor is canonicalised and the missing tail is
/// appended unchanged. A path with no existing ancestor comes back as is.
#[must_use]
pub fn canonical_or_nearest(path: &Path) -> PathBuf {
    let mut tail = Vec::new();
    let mut current = path;
    loop {
        if let Ok(found) = dunce::canonicalize(current) {
            return tail.iter().rev().fold(found, |acc, part| acc.join(part));
        }
        let (Some(parent), Some(name)) = (current.parent(), current.file_name()) else {
            return path.to_path_buf();
        };
        tail.push(name);
        current = if parent.as_os_str().is_empty() {
            Path::new(".")
        } else {
            parent
        };
    }
}

/// Clean a path typed or pasted at a prompt.
///
/// Trims whitespace and one pair of surrounding double quotes, as added by
/// Explorer's "Copy as path".
#[must_use]
pub fn clean_input_path(raw: &str) -> String {
    let trimmed = raw.trim();
    trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed)
        .trim()
        .to_string()
}
