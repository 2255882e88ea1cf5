//! `run-scripts`: run each configured script, one after another.
use anyhow::Result;

use super::{Context, Job, Outcome, Tally, acquire, advise_elevation};
use crate::config::scripts::{Interpreter, ScriptSpec};
use crate::error::{ConfigError, JobError};

/// Longest script excerpt used as an item name.
const LABEL_WIDTH: usize = 48;

/// Runs `scripts` from the job description in file order.
#[derive(Debug, Default)]
pub struct RunScripts {
    /// Config path given on the command line.
    pub config: Option<String>,
}

/// Short single-line label for a script.
fn label(index: usize, script: &ScriptSpec) -> String {
    let first_line = script.body.lines().next().unwrap_or_default().trim();
    let mut excerpt: String = first_line.chars().take(LABEL_WIDTH).collect();
    if excerpt.len() < script.body.trim().len() {
        excerpt.push('…');
    }
    format!("#{} {excerpt}", index + 1)
}

fn run_script(ctx: &Context, script: &ScriptSpec) -> Result<()> {
    match script.interpreter {
        Interpreter::Cmd => ctx.executor.run_attached("cmd", &["/C", &script.body]),
        Interpreter::PowerShell => ctx.shell.run_attached(&*ctx.executor, &script.body),
    }
}

impl Job for RunScripts {
    fn name(&self) -> &'static str {
        "run-scripts"
    }

    fn run(&self, ctx: &Context) -> Result<(), JobError> {
        let config = acquire::load_config(ctx, self.config.as_deref())?;
        if config.scripts.iter().all(|s| s.body.is_empty()) {
            return Err(ConfigError::EmptySection("scripts").into());
        }
        advise_elevation(ctx, "scripts");

        let tally = Tally::new("scripts");
        for (i, script) in config.scripts.iter().enumerate() {
            let name = label(i, script);
            if script.body.is_empty() {
                tally.skip(ctx, &name, "empty script");
                continue;
            }
            let shell = match script.interpreter {
                Interpreter::Cmd => "cmd",
                Interpreter::PowerShell => "PowerShell",
            };
            tally.attempt(
                ctx,
                &name,
                &format!("run with {shell}: {}", script.body),
                || {
                    run_script(ctx, script)?;
                    Ok(Outcome::Done)
                },
            );
        }
        tally.finish()
    }
}
