//! `choco-install`: install every configured package with Chocolatey,
//! spread over a fixed number of workers.
use anyhow::Context as _;
use rayon::prelude::*;

use super::{Context, Job, Outcome, Tally, acquire, advise_elevation};
use crate::config::packages::{InstallMode, PackageSpec};
use crate::error::{ConfigError, JobError};
use crate::resources::chocolatey;

/// Worker count offered when none is given on the command line.
pub const DEFAULT_WORKERS: usize = 4;

/// Installs `packages` from the job description.
#[derive(Debug, Default)]
pub struct Install {
    /// Config path given on the command line.
    pub config: Option<String>,
    /// Number of concurrent installs; asked for when absent.
    pub workers: Option<usize>,
}

impl Install {
    fn worker_count(&self, ctx: &Context, packages: usize) -> Result<usize, JobError> {
        let requested = match self.workers {
            Some(n) => n,
            None => ctx
                .prompt
                .number("How many packages should install at once?", DEFAULT_WORKERS)?
                .ok_or(JobError::UserCancelled)?,
        };
        Ok(requested.clamp(1, packages.max(1)))
    }
}

/// Find `choco`, offering to install Chocolatey when it is missing.
fn ensure_chocolatey(ctx: &Context) -> Result<String, JobError> {
    if let Some(choco) = chocolatey::locate(&*ctx.executor, &*ctx.fs_ops) {
        return Ok(choco);
    }
    let install = ctx
        .prompt
        .confirm("Chocolatey is not installed. Do you want to install it?")?;
    if install != Some(true) {
        return Err(JobError::UserCancelled);
    }
    if ctx.dry_run {
        ctx.log.dry_run("would install Chocolatey");
        return Ok("choco".to_string());
    }
    ctx.log.info("installing Chocolatey");
    chocolatey::bootstrap(&ctx.shell, &*ctx.executor)
        .map_err(|e| JobError::external("installing Chocolatey", &e))?;
    chocolatey::locate(&*ctx.executor, &*ctx.fs_ops).ok_or_else(|| {
        JobError::ExternalActionFailed {
            action: "installing Chocolatey".to_string(),
            reason: format!("choco was not found on PATH or at {}", chocolatey::DEFAULT_CHOCO_PATH),
        }
    })
}

fn install_one(ctx: &Context, tally: &Tally, choco: &str, spec: &PackageSpec) {
    let how = match spec.mode {
        InstallMode::Inline => "install",
        InstallMode::NewWindow => "install in a new window",
    };
    tally.attempt(ctx, &spec.name, &format!("{how} {}", spec.name), || {
        chocolatey::install(&ctx.shell, &*ctx.executor, choco, spec)
            .with_context(|| format!("installing {}", spec.name))?;
        Ok(Outcome::Done)
    });
}

impl Job for Install {
    fn name(&self) -> &'static str {
        "choco-install"
    }

    fn run(&self, ctx: &Context) -> Result<(), JobError> {
        let config = acquire::load_config(ctx, self.config.as_deref())?;
        let packages: Vec<&PackageSpec> = config
            .packages
            .iter()
            .filter(|p| !p.name.is_empty())
            .collect();
        if packages.is_empty() {
            return Err(ConfigError::EmptySection("packages").into());
        }
        advise_elevation(ctx, "installing packages");

        let choco = ensure_chocolatey(ctx)?;
        let workers = self.worker_count(ctx, packages.len())?;
        ctx.log.info(&format!(
            "installing {} packages with {workers} workers",
            packages.len()
        ));

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("install-{i}"))
            .build()
            .context("failed to start install workers")?;
        let tally = Tally::new("packages");
        pool.install(|| {
            packages
                .par_iter()
                .for_each(|spec| install_one(ctx, &tally, &choco, spec));
        });
        tally.finish()
    }
}
