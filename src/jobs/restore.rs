//! `restore`: copy each backed-up entry back to where it came from.
use super::{Context, Job, Outcome, Tally, acquire, advise_elevation};
use crate::error::{ConfigError, JobError};
use crate::resources::copy;

/// Mirror of [`Backup`](super::backup::Backup): copies
/// `target/<name>` back into the parent of each configured path.
#[derive(Debug, Default)]
pub struct Restore {
    /// Config path given on the command line.
    pub config: Option<String>,
}

impl Job for Restore {
    fn name(&self) -> &'static str {
        "restore"
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
        advise_elevation(ctx, "restoring");

        let target = ctx.resolve_path(&backup.target);
        let tally = Tally::new("restore paths");
        for raw in &backup.paths {
            let original = ctx.resolve_path(raw);
            let name = original.display().to_string();
            let (from, into) = match copy::restore_pair(&original, &target) {
                Ok(pair) => pair,
                Err(e) => {
                    tally.fail(ctx, &name, &e.to_string());
                    continue;
                }
            };
            tally.attempt(
                ctx,
                &name,
                &format!("copy {} into {}", from.display(), into.display()),
                || {
                    copy::copy(&*ctx.fs_ops, &from, &into)?;
                    Ok(Outcome::Done)
                },
            );
        }
        tally.finish()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::jobs::test_helpers::TestContext;
    use std::fs;

    #[test]
    fn restores_into_parent_of_original() {
        let home = tempfile::tempdir().unwrap();
        let store = tempfile::tempdir().unwrap();
        fs::create_dir_all(store.path().join("app/cfg")).unwrap();
        fs::write(store.path().join("app/cfg/a.ini"), "x=1").unwrap();

        let t = TestContext::new();
        let path = t.write_config(&format!(
            "backup:\n  paths: ['{}']\n  target: '{}'\n",
            home.path().join("app").display(),
            store.path().display()
        ));
        Restore { config: Some(path) }.run(&t.ctx).unwrap();

        assert_eq!(
            fs::read_to_string(home.path().join("app/cfg/a.ini")).unwrap(),
            "x=1"
        );
    }

    #[test]
    fn missing_backup_entry_is_a_failed_item() {
        let home = tempfile::tempdir().unwrap();
        let store = tempfile::tempdir().unwrap();
        let t = TestContext::new();
        let path = t.write_config(&format!(
            "backup:\n  paths: ['{}']\n  target: '{}'\n",
            home.path().join("never-backed-up").display(),
            store.path().display()
        ));
        let err = Restore { config: Some(path) }.run(&t.ctx).unwrap_err();
        assert!(matches!(err, JobError::ItemsFailed { failed: 1, total: 1, .. }));
    }

    #[test]
    fn empty_paths_abort() {
        let t = TestContext::new();
        let path = t.write_config("backup:\n  target: /tmp\n");
        assert!(matches!(
            Restore { config: Some(path) }.run(&t.ctx),
            Err(JobError::ConfigInvalid(ConfigError::EmptySection(_)))
        ));
    }
}
