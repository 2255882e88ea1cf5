//! PowerShell invocation with a lazily resolved, cached executable.
use std::path::Path;
use std::sync::OnceLock;

use anyhow::{Result, bail};

use crate::exec::{ExecResult, Executor};

/// Executables tried in order when resolving PowerShell.
const CANDIDATES: [&str; 2] = ["pwsh", "powershell"];

const BASE_ARGS: [&str; 3] = ["-NoProfile", "-ExecutionPolicy", "Bypass"];

/// Handle to the PowerShell executable used by every job.
///
/// The executable is resolved once (PowerShell 7 `pwsh` preferred, Windows
/// PowerShell as fallback) and reused for the rest of the process. Tests
/// construct it with [`PowerShell::with_program`] to skip resolution.
#[derive(Debug, Default)]
pub struct PowerShell {
    program: OnceLock<String>,
}

impl PowerShell {
    /// Create an unresolved handle.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            program: OnceLock::new(),
        }
    }

    /// Create a handle already resolved to `program`.
    #[must_use]
    pub fn with_program(program: impl Into<String>) -> Self {
        let shell = Self::new();
        let _ = shell.program.set(program.into());
        shell
    }

    /// The resolved executable name, resolving it on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if neither `pwsh` nor `powershell` is on `PATH`.
    pub fn program(&self, executor: &dyn Executor) -> Result<&str> {
        if let Some(program) = self.program.get() {
            return Ok(program);
        }
        let Some(found) = CANDIDATES.iter().find(|c| executor.which(c)) else {
            bail!("PowerShell not found on PATH (tried {})", CANDIDATES.join(", "));
        };
        Ok(self.program.get_or_init(|| (*found).to_string()))
    }

    /// Run `script` with captured output. Fails on non-zero exit.
    ///
    /// # Errors
    ///
    /// Returns an error if PowerShell cannot be resolved or the script fails.
    pub fn run(&self, executor: &dyn Executor, script: &str) -> Result<ExecResult> {
        let program = self.program(executor)?;
        executor.run(program, &command_args(script))
    }

    /// Run `script` with captured output, tolerating non-zero exit.
    ///
    /// # Errors
    ///
    /// Returns an error if PowerShell cannot be resolved or spawned.
    pub fn run_unchecked(&self, executor: &dyn Executor, script: &str) -> Result<ExecResult> {
        let program = self.program(executor)?;
        executor.run_unchecked(program, &command_args(script))
    }

    /// Run `script` attached to the console.
    ///
    /// # Errors
    ///
    /// Returns an error if PowerShell cannot be resolved or the script fails.
    pub fn run_attached(&self, executor: &dyn Executor, script: &str) -> Result<()> {
        let program = self.program(executor)?;
        executor.run_attached(program, &command_args(script))
    }

    /// Run the script file at `path` with `args`, attached to the console.
    ///
    /// # Errors
    ///
    /// Returns an error if PowerShell cannot be resolved or the script fails.
    pub fn run_file(&self, executor: &dyn Executor, path: &Path, args: &[String]) -> Result<()> {
        let program = self.program(executor)?;
        let path = path.to_string_lossy().into_owned();
        let mut full: Vec<&str> = BASE_ARGS.to_vec();
        full.extend(["-File", path.as_str()]);
        full.extend(args.iter().map(String::as_str));
        executor.run_attached(program, &full)
    }
}

fn command_args(script: &str) -> Vec<&str> {
    let mut args = BASE_ARGS.to_vec();
    args.extend(["-Command", script]);
    args
}

/// Quote `value` as a single-quoted PowerShell string literal.
#[must_use]
pub fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Restart Explorer so shell-level tweaks take effect.
///
/// # Errors
///
/// Returns an error if the Explorer process could not be stopped.
pub fn restart_explorer(shell: &PowerShell, executor: &dyn Executor) -> Result<()> {
    shell
        .run(executor, "Stop-Process -Name explorer -Force")
        .map(|_| ())
}
