//! Top-level orchestration: turn a parsed command line into a job run and
//! an exit status.
pub mod menu;

use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::CommandFactory as _;

use crate::cli::{Cli, Command, GlobalOpts};
use crate::error::JobError;
use crate::exec::SystemExecutor;
use crate::jobs::{
    self, Context, Job, auto_logon::AutoLogon, backup::Backup, bloat::UninstallBloat,
    env_vars::SetEnvs, firewall::DisableFirewall, install::Install, registry::SetRegistry,
    restore::Restore, scripts::RunScripts, start_menu::CleanStartMenu, template::CreateTemplate,
};
use crate::logging::{Log, Logger};
use crate::prompt::{Prompt, TerminalPrompt};

/// Environment variable overriding the asset folder.
pub const ASSETS_ENV: &str = "WIN_TOOLS_ASSETS";

/// Locate the folder holding bundled scripts and registry files.
///
/// Order: `--assets`, then `$WIN_TOOLS_ASSETS`, then `assets/` next to the
/// executable. Existing folders are canonicalised without the `\\?\` prefix.
///
/// # Errors
///
/// Returns an error if no candidate is given and the executable path cannot
/// be determined.
pub fn resolve_assets(explicit: Option<&Path>, from_env: Option<String>) -> anyhow::Result<PathBuf> {
    let chosen = match (explicit, from_env) {
        (Some(dir), _) => dir.to_path_buf(),
        (None, Some(dir)) if !dir.trim().is_empty() => PathBuf::from(dir.trim()),
        _ => {
            let exe = std::env::current_exe()?;
            exe.parent()
                .map(|dir| dir.join("assets"))
                .ok_or_else(|| anyhow::anyhow!("cannot determine the folder of {}", exe.display()))?
        }
    };
    Ok(dunce::canonicalize(&chosen).unwrap_or(chosen))
}

/// Build the job for `command`, or `None` for commands that are not jobs.
#[must_use]
pub fn job_for(command: Command) -> Option<Box<dyn Job>> {
    let job: Box<dyn Job> = match command {
        Command::Backup(opts) => Box::new(Backup {
            config: opts.config,
        }),
        Command::Restore(opts) => Box::new(Restore {
            config: opts.config,
        }),
        Command::ChocoInstall(opts) => Box::new(Install {
            config: opts.config.config,
            workers: opts.workers.map(usize::from),
        }),
        Command::RunScripts(opts) => Box::new(RunScripts {
            config: opts.config,
        }),
        Command::SetEnvs(opts) => Box::new(SetEnvs {
            config: opts.config,
        }),
        Command::CreateTemplate(opts) => Box::new(CreateTemplate {
            save_path: opts.save_path,
        }),
        Command::SetRegistry(opts) => Box::new(SetRegistry { apply: opts.apply }),
        Command::CleanMenu => Box::new(CleanStartMenu::default()),
        Command::AutoLogon(opts) => Box::new(AutoLogon {
            username: opts.username,
            domain: opts.domain,
            logon_count: opts.logon_count,
            remove_prompt: opts.remove_prompt,
            backup_file: opts.backup_file,
        }),
        Command::DisableFirewall => Box::new(DisableFirewall),
        Command::UninstallBloat(opts) => Box::new(UninstallBloat {
            packages: opts.packages,
        }),
        Command::Completions { .. } | Command::Version => return None,
    };
    Some(job)
}

/// Run `job` against `ctx`, print the item summary and return the exit
/// status: 0 on success, 130 on cancel, 1 otherwise.
pub fn run_job(job: &dyn Job, ctx: &Context, log: &Logger) -> u8 {
    let result = jobs::execute(job, ctx);
    log.print_summary();
    result.map_or_else(|e| e.exit_code(), |()| 0)
}

/// Dispatch the parsed command line.
#[must_use]
pub fn run(cli: Cli) -> ExitCode {
    let log = Arc::new(Logger::new(cli.log_name()));
    let prompt: Arc<dyn Prompt> = Arc::new(TerminalPrompt);

    let command = match cli.command {
        Some(command) => command,
        None => match menu::choose(&*prompt) {
            Ok(command) => command,
            Err(e) => return report(&*log, &e),
        },
    };

    match command {
        Command::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "win-tools", &mut std::io::stdout());
            ExitCode::SUCCESS
        }
        Command::Version => {
            let _ = writeln!(std::io::stdout().lock(), "win-tools {}", crate::VERSION);
            ExitCode::SUCCESS
        }
        command => {
            let Some(job) = job_for(command) else {
                return ExitCode::SUCCESS;
            };
            let ctx = match build_context(&cli.global, Arc::clone(&log), prompt) {
                Ok(ctx) => ctx,
                Err(e) => return report(&*log, &JobError::Other(e)),
            };
            ExitCode::from(run_job(&*job, &ctx, &log))
        }
    }
}

fn build_context(
    global: &GlobalOpts,
    log: Arc<Logger>,
    prompt: Arc<dyn Prompt>,
) -> anyhow::Result<Context> {
    let assets = resolve_assets(global.assets.as_deref(), std::env::var(ASSETS_ENV).ok())?;
    log.debug(&format!("assets: {}", assets.display()));
    Ok(Context::new(log, Arc::new(SystemExecutor), prompt, assets).with_dry_run(global.dry_run))
}

fn report(log: &dyn Log, err: &JobError) -> ExitCode {
    match err {
        JobError::UserCancelled => log.warn("cancelled, nothing was changed"),
        e => log.error(&e.to_string()),
    }
    ExitCode::from(err.exit_code())
}
