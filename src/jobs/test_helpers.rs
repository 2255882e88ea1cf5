//! Fakes shared by job and resource tests.
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{Result, bail};

use super::Context;
use crate::exec::{ExecResult, Executor};
use crate::logging::Logger;
use crate::operations::FileSystemOps;
use crate::privilege::FixedElevation;
use crate::prompt::{Answer, ScriptedPrompt};
use crate::resources::powershell::PowerShell;

/// Records every command line and answers from canned rules.
///
/// Each call is recorded as `program arg arg...`. A call containing a
/// [`fail_matching`](Self::fail_matching) pattern fails; a call containing a
/// [`with_stdout`](Self::with_stdout) pattern returns that output.
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    programs: Vec<String>,
    stdout: Vec<(String, String)>,
    failures: Vec<String>,
    calls: Mutex<Vec<String>>,
    which_calls: AtomicUsize,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Programs reported as present by `which`.
    pub fn with_programs(mut self, programs: &[&str]) -> Self {
        self.programs = programs.iter().map(ToString::to_string).collect();
        self
    }

    pub fn with_stdout(mut self, pattern: &str, stdout: &str) -> Self {
        self.stdout.push((pattern.to_string(), stdout.to_string()));
        self
    }

    pub fn fail_matching(mut self, pattern: &str) -> Self {
        self.failures.push(pattern.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn calls_matching(&self, pattern: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.contains(pattern))
            .collect()
    }

    pub fn which_calls(&self) -> usize {
        self.which_calls.load(Ordering::SeqCst)
    }

    fn record(&self, program: &str, args: &[&str]) -> (String, bool) {
        let line = std::iter::once(program)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line.clone());
        let fails = self.failures.iter().any(|p| line.contains(p.as_str()));
        (line, fails)
    }

    fn result_for(&self, line: &str, success: bool) -> ExecResult {
        let stdout = self
            .stdout
            .iter()
            .find(|(p, _)| line.contains(p.as_str()))
            .map(|(_, out)| out.clone())
            .unwrap_or_default();
        ExecResult {
            stdout,
            stderr: if success { String::new() } else { "simulated failure".to_string() },
            success,
            code: Some(i32::from(!success)),
        }
    }
}

impl Executor for RecordingExecutor {
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        let (line, fails) = self.record(program, args);
        if fails {
            bail!("{program} exited with code 1: simulated failure");
        }
        Ok(self.result_for(&line, true))
    }

    fn run_unchecked(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        let (line, fails) = self.record(program, args);
        Ok(self.result_for(&line, !fails))
    }

    fn run_attached(&self, program: &str, args: &[&str]) -> Result<()> {
        let (_, fails) = self.record(program, args);
        if fails {
            bail!("{program} exited with code 1");
        }
        Ok(())
    }

    fn which(&self, program: &str) -> bool {
        self.which_calls.fetch_add(1, Ordering::SeqCst);
        self.programs.iter().any(|p| p == program)
    }
}

/// A [`Context`] wired to fakes, with handles to inspect them.
///
/// Defaults: not elevated, PowerShell resolved to `pwsh`, no prompt
/// answers, an empty temporary assets folder.
#[derive(Debug)]
pub struct TestContext {
    pub ctx: Context,
    pub log: Arc<Logger>,
    pub exec: Arc<RecordingExecutor>,
    pub prompt: Arc<ScriptedPrompt>,
    pub assets: tempfile::TempDir,
}

impl TestContext {
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        let log = Arc::new(Logger::new("test"));
        let exec = Arc::new(RecordingExecutor::new());
        let prompt = Arc::new(ScriptedPrompt::silent());
        let assets = tempfile::tempdir().expect("temp assets dir");
        let ctx = Context::new(
            Arc::clone(&log) as _,
            Arc::clone(&exec) as _,
            Arc::clone(&prompt) as _,
            assets.path().to_path_buf(),
        )
        .with_elevation(Arc::new(FixedElevation(false)))
        .with_shell(Arc::new(PowerShell::with_program("pwsh")));
        Self {
            ctx,
            log,
            exec,
            prompt,
            assets,
        }
    }

    pub fn elevated(mut self) -> Self {
        self.ctx.elevation = Arc::new(FixedElevation(true));
        self
    }

    pub fn dry_run(mut self) -> Self {
        self.ctx.dry_run = true;
        self
    }

    pub fn with_executor(mut self, exec: RecordingExecutor) -> Self {
        self.exec = Arc::new(exec);
        self.ctx.executor = Arc::clone(&self.exec) as _;
        self
    }

    pub fn with_answers(mut self, answers: impl IntoIterator<Item = Answer>) -> Self {
        self.prompt = Arc::new(ScriptedPrompt::new(answers));
        self.ctx.prompt = Arc::clone(&self.prompt) as _;
        self
    }

    pub fn with_fs_ops(mut self, fs_ops: Arc<dyn FileSystemOps>) -> Self {
        self.ctx.fs_ops = fs_ops;
        self
    }

    /// Write a job description into the assets folder and return its path.
    #[allow(clippy::expect_used)]
    pub fn write_config(&self, yaml: &str) -> String {
        let path = self.assets.path().join("job.yaml");
        std::fs::write(&path, yaml).expect("write config");
        path.to_string_lossy().into_owned()
    }

    /// Create an empty asset file.
    #[allow(clippy::expect_used)]
    pub fn touch_asset(&self, relative: &str) {
        let path = self.assets.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create asset dir");
        }
        std::fs::write(path, b"").expect("write asset");
    }

    /// Item names recorded with `status`.
    pub fn items_with(&self, status: crate::logging::ItemStatus) -> Vec<String> {
        self.log
            .item_entries()
            .into_iter()
            .filter(|i| i.status == status)
            .map(|i| i.name)
            .collect()
    }
}
