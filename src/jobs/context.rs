use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::exec::Executor;
use crate::logging::Log;
use crate::operations::{FileSystemOps, SystemFileSystemOps};
use crate::privilege::{Elevation, ShellElevation};
use crate::prompt::Prompt;
use crate::resources::paths::expand_placeholders;
use crate::resources::powershell::PowerShell;

/// Everything a job needs to talk to the outside world.
pub struct Context {
    /// Logger for output and item recording.
    pub log: Arc<dyn Log>,
    /// Runs external programs.
    pub executor: Arc<dyn Executor>,
    /// Asks the user for missing input.
    pub prompt: Arc<dyn Prompt>,
    /// Answers whether the process is elevated.
    pub elevation: Arc<dyn Elevation>,
    /// PowerShell handle; the executable is resolved once and shared.
    pub shell: Arc<PowerShell>,
    /// Filesystem operation abstraction (injectable for testing).
    pub fs_ops: Arc<dyn FileSystemOps>,
    /// Folder holding bundled scripts, `.reg` files and `start2.bin`.
    pub assets: PathBuf,
    /// Describe actions instead of performing them.
    pub dry_run: bool,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("log", &"<dyn Log>")
            .field("executor", &self.executor)
            .field("prompt", &self.prompt)
            .field("elevation", &self.elevation)
            .field("shell", &self.shell)
            .field("fs_ops", &self.fs_ops)
            .field("assets", &self.assets)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl Context {
    /// Create a context with the production filesystem and a PowerShell
    /// based elevation check.
    #[must_use]
    pub fn new(
        log: Arc<dyn Log>,
        executor: Arc<dyn Executor>,
        prompt: Arc<dyn Prompt>,
        assets: PathBuf,
    ) -> Self {
        let shell = Arc::new(PowerShell::new());
        let elevation = Arc::new(ShellElevation::new(
            Arc::clone(&shell),
            Arc::clone(&executor),
        ));
        Self {
            log,
            executor,
            prompt,
            elevation,
            shell,
            fs_ops: Arc::new(SystemFileSystemOps),
            assets,
            dry_run: false,
        }
    }

    /// Replace the elevation check.
    #[must_use]
    pub fn with_elevation(mut self, elevation: Arc<dyn Elevation>) -> Self {
        self.elevation = elevation;
        self
    }

    /// Replace the PowerShell handle (e.g. one pre-resolved in tests).
    #[must_use]
    pub fn with_shell(mut self, shell: Arc<PowerShell>) -> Self {
        self.shell = shell;
        self
    }

    /// Replace the filesystem operations.
    #[must_use]
    pub fn with_fs_ops(mut self, fs_ops: Arc<dyn FileSystemOps>) -> Self {
        self.fs_ops = fs_ops;
        self
    }

    /// Enable or disable dry-run mode.
    #[must_use]
    pub const fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Expand `%NAME%` placeholders and trim a configured path.
    #[must_use]
    pub fn resolve_path(&self, raw: &str) -> PathBuf {
        PathBuf::from(expand_placeholders(raw.trim()))
    }

    /// Path of a bundled asset.
    #[must_use]
    pub fn asset(&self, name: impl AsRef<Path>) -> PathBuf {
        self.assets.join(name)
    }
}
