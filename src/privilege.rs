//! Administrator privilege detection.
use std::sync::{Arc, OnceLock};

use crate::exec::Executor;
use crate::resources::powershell::PowerShell;

const IS_ADMIN_SCRIPT: &str = "(New-Object Security.Principal.WindowsPrincipal(\
[Security.Principal.WindowsIdentity]::GetCurrent())).IsInRole(\
[Security.Principal.WindowsBuiltInRole]::Administrator)";

/// Answers whether the current process runs elevated.
#[cfg_attr(test, mockall::automock)]
pub trait Elevation: Send + Sync + std::fmt::Debug {
    /// Whether the process has administrator rights.
    fn is_elevated(&self) -> bool;
}

/// Asks Windows through PowerShell, once per process.
///
/// Any failure to run the query counts as not elevated.
#[derive(Debug)]
pub struct ShellElevation {
    shell: Arc<PowerShell>,
    executor: Arc<dyn Executor>,
    cached: OnceLock<bool>,
}

impl ShellElevation {
    /// Checker that asks `shell` on first use and remembers the answer.
    #[must_use]
    pub fn new(shell: Arc<PowerShell>, executor: Arc<dyn Executor>) -> Self {
        Self {
            shell,
            executor,
            cached: OnceLock::new(),
        }
    }

    fn query(&self) -> bool {
        match self.shell.run_unchecked(&*self.executor, IS_ADMIN_SCRIPT) {
            Ok(result) => result.success && result.stdout.trim().eq_ignore_ascii_case("true"),
            Err(e) => {
                tracing::debug!("elevation check failed: {e:#}");
                false
            }
        }
    }
}

impl Elevation for ShellElevation {
    fn is_elevated(&self) -> bool {
        *self.cached.get_or_init(|| self.query())
    }
}

/// A fixed answer, for tests and embedding.
#[derive(Debug, Clone, Copy)]
pub struct FixedElevation(pub bool);

impl Elevation for FixedElevation {
    fn is_elevated(&self) -> bool {
        self.0
    }
}
