// Shared helpers for integration tests.
//
// Provides a temporary sandbox with a home folder, a backup folder and an
// assets folder, and builds a job context wired to the real filesystem with
// scripted prompt answers.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use win_tools::exec::SystemExecutor;
use win_tools::jobs::Context;
use win_tools::logging::{ItemStatus, Logger};
use win_tools::privilege::FixedElevation;
use win_tools::prompt::{Answer, ScriptedPrompt};

/// An isolated sandbox backed by a [`tempfile::TempDir`].
///
/// The directory is automatically deleted when dropped.
pub struct Sandbox {
    /// Temporary directory holding `home/`, `backup/` and `assets/`.
    pub root: tempfile::TempDir,
}

impl Sandbox {
    /// Create a sandbox with empty `home/`, `backup/` and `assets/` folders.
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        for dir in ["home", "backup", "assets"] {
            std::fs::create_dir_all(root.path().join(dir)).expect("create sandbox dir");
        }
        Self { root }
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.path().join(relative)
    }

    pub fn home(&self) -> PathBuf {
        self.path("home")
    }

    pub fn backup(&self) -> PathBuf {
        self.path("backup")
    }

    /// Write `content` to `relative`, creating parent folders.
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dir");
        }
        std::fs::write(&path, content).expect("write file");
        path
    }

    /// Write a job description backing up `paths` into `backup/`.
    pub fn backup_config(&self, paths: &[&Path]) -> String {
        let mut yaml = String::from("backup:\n  paths:\n");
        for path in paths {
            yaml.push_str(&format!("    - '{}'\n", path.display()));
        }
        yaml.push_str(&format!("  target: '{}'\n", self.backup().display()));
        let config = self.write("job.yaml", &yaml);
        config.display().to_string()
    }

    /// Build a context over the real filesystem with `answers` queued.
    pub fn context(&self, answers: impl IntoIterator<Item = Answer>) -> (Context, Arc<Logger>) {
        let log = Arc::new(Logger::new("integration"));
        let ctx = Context::new(
            Arc::clone(&log) as _,
            Arc::new(SystemExecutor),
            Arc::new(ScriptedPrompt::new(answers)),
            self.path("assets"),
        )
        .with_elevation(Arc::new(FixedElevation(false)));
        (ctx, log)
    }
}

/// Item names recorded with `status`.
pub fn items_with(log: &Logger, status: ItemStatus) -> Vec<String> {
    log.item_entries()
        .into_iter()
        .filter(|i| i.status == status)
        .map(|i| i.name)
        .collect()
}

/// Read a file to a string, panicking with the path on failure.
pub fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap_or_else(|e| panic!("read {}: {e}", path.display()))
}
