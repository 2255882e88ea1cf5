//! `uninstall-bloat`: remove selected bundled applications.
use super::{Context, Job, Outcome, Tally, require_elevation};
use crate::error::JobError;
use crate::resources::appx::{self, BloatApp, EDGE_ID};

/// Removes applications from the bloat catalogue.
#[derive(Debug, Default)]
pub struct UninstallBloat {
    /// Package ids given on the command line; asked for when empty.
    pub packages: Vec<String>,
}

impl UninstallBloat {
    fn selection(&self, ctx: &Context) -> Result<Vec<&'static BloatApp>, JobError> {
        if !self.packages.is_empty() {
            return self
                .packages
                .iter()
                .map(|id| {
                    appx::find(id)
                        .ok_or_else(|| JobError::InvalidInput(format!("unknown package id: {id}")))
                })
                .collect();
        }
        let items: Vec<String> = appx::CATALOGUE
            .iter()
            .map(|app| format!("{} ({})", app.label, app.id))
            .collect();
        let picked = ctx
            .prompt
            .multi_select("Applications to remove", &items)?
            .ok_or(JobError::UserCancelled)?;
        if picked.is_empty() {
            return Err(JobError::NothingSelected("applications"));
        }
        Ok(picked
            .into_iter()
            .filter_map(|i| appx::CATALOGUE.get(i))
            .collect())
    }
}

impl Job for UninstallBloat {
    fn name(&self) -> &'static str {
        "uninstall-bloat"
    }

    fn run(&self, ctx: &Context) -> Result<(), JobError> {
        require_elevation(ctx, "removing bundled applications")?;
        let selected = self.selection(ctx)?;
        if selected.iter().any(|app| app.id == EDGE_ID) {
            ctx.log.warn(
                "removing Edge also removes the WebView2 runtime used by some apps; Windows Update may reinstall it",
            );
        }

        let tally = Tally::new("applications");
        for app in selected {
            tally.attempt(ctx, app.label, &format!("remove {}", app.id), || {
                appx::remove(&ctx.shell, &*ctx.executor, &ctx.assets, app)?;
                Ok(Outcome::Done)
            });
        }
        tally.finish()
    }
}
