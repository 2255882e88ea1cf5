//! `clean-menu`: replace the start menu layout with the bundled blank one.
use anyhow::Context as _;

use super::{Context, Job, Outcome, Tally, require_elevation};
use crate::error::JobError;
use crate::resources::{copy, powershell};

/// Bundled blank start menu layout.
pub const LAYOUT_FILE: &str = "start2.bin";

/// Where the start menu keeps its pinned layout.
pub const LOCAL_STATE_DIR: &str = r"C:\Users\%USERNAME%\AppData\Local\Packages\Microsoft.Windows.StartMenuExperienceHost_cw5n1h2txyewy\LocalState";

/// Copies [`LAYOUT_FILE`] over the current layout and restarts Explorer.
#[derive(Debug)]
pub struct CleanStartMenu {
    /// Destination folder; may contain placeholders.
    pub local_state: String,
}

impl Default for CleanStartMenu {
    fn default() -> Self {
        Self {
            local_state: LOCAL_STATE_DIR.to_string(),
        }
    }
}

impl Job for CleanStartMenu {
    fn name(&self) -> &'static str {
        "clean-menu"
    }

    fn run(&self, ctx: &Context) -> Result<(), JobError> {
        require_elevation(ctx, "cleaning the start menu")?;
        let layout = ctx.asset(LAYOUT_FILE);
        let target = ctx.resolve_path(&self.local_state);

        let tally = Tally::new("start menu layouts");
        tally.attempt(
            ctx,
            LAYOUT_FILE,
            &format!("copy {} into {}", layout.display(), target.display()),
            || {
                copy::copy(&*ctx.fs_ops, &layout, &target)?;
                powershell::restart_explorer(&ctx.shell, &*ctx.executor)
                    .context("restarting Explorer")?;
                Ok(Outcome::Done)
            },
        );
        tally.finish()
    }
}
