//! `backup`: copy every configured path into the backup target.
use std::path::Path;

use super::{Context, Job, Outcome, Tally, acquire, advise_elevation};
use crate::error::{ConfigError, JobError};
use crate::resources::copy;

/// Copies each `backup.paths` entry into `backup.target`.
#[derive(Debug, Default)]
pub struct Backup {
    /// Config path given on the command line.
    pub config: Option<String>,
}

impl Job for Backup {
    fn name(&self) -> &'static str {
        "backup"
    }

    fn run(&self, ctx: &Context) -> Result<(), JobError> {
        let config = acquire::load_config(ctx, self.config.as_deref())?;
        let backup = &config.backup;
        if backup.paths.is_empty() {
            return Err(ConfigError::EmptySection("backup paths").into());
        }
        if backup.target.trim().is_empty() {
            return Err(ConfigError::MissingField("backup.target").into());
        }
        advise_elevation(ctx, "backing up");

        let target = ctx.resolve_path(&backup.target);
        let tally = Tally::new("backup paths");
        for raw in &backup.paths {
            let source = ctx.resolve_path(raw);
            let name = source.display().to_string();
            tally.attempt(
                ctx,
                &name,
                &format!("copy {name} into {}", target.display()),
                || {
                    copy::copy(&*ctx.fs_ops, Path::new(&source), &target)?;
                    Ok(Outcome::Done)
                },
            );
        }
        tally.finish()
    }
}
