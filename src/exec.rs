//! Child processes: `choco`, `cmd`, PowerShell and the bundled uninstallers.
//!
//! Jobs never touch [`std::process`] directly; they go through [`Executor`]
//! so tests can record command lines instead of running them.
use std::process::{Command, ExitStatus, Output, Stdio};

use anyhow::{Context as _, Result, bail};

/// Captured outcome of a finished child.
#[derive(Debug, Clone, Default)]
pub struct ExecResult {
    /// Standard output, decoded lossily.
    pub stdout: String,
    /// Standard error, decoded lossily.
    pub stderr: String,
    /// `true` when the child exited with code 0.
    pub success: bool,
    /// Exit code; `None` when the child was killed.
    pub code: Option<i32>,
}

impl ExecResult {
    /// Turn a non-zero exit into an error carrying the child's stderr.
    ///
    /// # Errors
    ///
    /// Returns an error when [`success`](Self::success) is false.
    pub fn ensure_success(self, program: &str) -> Result<Self> {
        if self.success {
            return Ok(self);
        }
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            bail!("{program} {}", describe_exit(self.code));
        }
        bail!("{program} {}: {stderr}", describe_exit(self.code));
    }
}

impl From<Output> for ExecResult {
    fn from(output: Output) -> Self {
        let Output {
            status,
            stdout,
            stderr,
        } = output;
        Self {
            stdout: String::from_utf8_lossy(&stdout).into_owned(),
            stderr: String::from_utf8_lossy(&stderr).into_owned(),
            success: status.success(),
            code: status.code(),
        }
    }
}

fn describe_exit(code: Option<i32>) -> String {
    code.map_or_else(
        || "was terminated".to_owned(),
        |code| format!("exited with code {code}"),
    )
}

/// Runs external programs for jobs. Calls block until the child exits.
pub trait Executor: Send + Sync + std::fmt::Debug {
    /// Capture the output of `program`, failing on a non-zero exit.
    ///
    /// # Errors
    ///
    /// Returns an error if the child cannot be started or exits non-zero.
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult>;

    /// Capture the output of `program` whatever its exit code.
    ///
    /// # Errors
    ///
    /// Returns an error only if the child cannot be started.
    fn run_unchecked(&self, program: &str, args: &[&str]) -> Result<ExecResult>;

    /// Run `program` on this console so its progress is visible, failing on
    /// a non-zero exit.
    ///
    /// # Errors
    ///
    /// Returns an error if the child cannot be started or exits non-zero.
    fn run_attached(&self, program: &str, args: &[&str]) -> Result<()>;

    /// Whether `program` resolves on `PATH`.
    fn which(&self, program: &str) -> bool;
}

/// [`Executor`] that starts real processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemExecutor;

impl SystemExecutor {
    fn command(program: &str, args: &[&str]) -> Command {
        let mut command = Command::new(program);
        command.args(args);
        command
    }

    fn check(program: &str, status: ExitStatus) -> Result<()> {
        if status.success() {
            Ok(())
        } else {
            bail!("{program} {}", describe_exit(status.code()))
        }
    }
}

impl Executor for SystemExecutor {
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        self.run_unchecked(program, args)?.ensure_success(program)
    }

    fn run_unchecked(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        Self::command(program, args)
            .stdin(Stdio::null())
            .output()
            .map(ExecResult::from)
            .with_context(|| format!("cannot start {program}"))
    }

    fn run_attached(&self, program: &str, args: &[&str]) -> Result<()> {
        let status = Self::command(program, args)
            .status()
            .with_context(|| format!("cannot start {program}"))?;
        Self::check(program, status)
    }

    fn which(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    /// `(program, args)` running `script` in the platform shell.
    fn shell(script: &str) -> (&'static str, Vec<&str>) {
        if cfg!(windows) {
            ("cmd", vec!["/C", script])
        } else {
            ("sh", vec!["-c", script])
        }
    }

    #[test]
    fn captures_stdout() {
        let (program, args) = shell("echo restored");
        let result = SystemExecutor.run(program, &args).unwrap();
        assert!(result.success);
        assert_eq!(result.stdout.trim(), "restored");
    }

    #[test]
    fn non_zero_exit_is_an_error_when_checked() {
        let (program, args) = shell("exit 2");
        let err = SystemExecutor.run(program, &args).unwrap_err();
        assert!(err.to_string().contains("exited with code 2"), "got: {err}");
    }

    #[test]
    fn unchecked_run_reports_the_code() {
        let (program, args) = shell("exit 4");
        let result = SystemExecutor.run_unchecked(program, &args).unwrap();
        assert!(!result.success);
        assert_eq!(result.code, Some(4));
    }

    #[test]
    fn attached_run_reports_the_code() {
        let (program, args) = shell("exit 3");
        let err = SystemExecutor.run_attached(program, &args).unwrap_err();
        assert_eq!(err.to_string(), format!("{program} exited with code 3"));
    }

    #[test]
    fn stderr_is_part_of_the_failure() {
        let result = ExecResult {
            stderr: "package not found\n".into(),
            code: Some(1),
            ..ExecResult::default()
        };
        let err = result.ensure_success("choco").unwrap_err();
        assert_eq!(err.to_string(), "choco exited with code 1: package not found");
    }

    #[test]
    fn killed_child_has_no_code() {
        assert_eq!(describe_exit(None), "was terminated");
    }

    #[test]
    fn missing_program_cannot_start() {
        let err = SystemExecutor
            .run_unchecked("win-tools-no-such-program", &[])
            .unwrap_err();
        assert!(err.to_string().contains("cannot start"));
        assert!(!SystemExecutor.which("win-tools-no-such-program"));
    }
}
