//! `set-registry`: import selected `.reg` tweaks.
use anyhow::bail;

use super::{Context, Job, Outcome, Tally, require_elevation};
use crate::error::JobError;
use crate::resources::paths::PathKind;
use crate::resources::{powershell, registry};

/// Imports bundled `.reg` files, chosen by name or from a list.
#[derive(Debug, Default)]
pub struct SetRegistry {
    /// Tweak names given on the command line; asked for when empty.
    pub apply: Vec<String>,
}

impl SetRegistry {
    fn selection(&self, ctx: &Context) -> Result<Vec<&'static str>, JobError> {
        if !self.apply.is_empty() {
            return self
                .apply
                .iter()
                .map(|name| {
                    registry::find(name).ok_or_else(|| {
                        JobError::InvalidInput(format!("unknown registry tweak: {name}"))
                    })
                })
                .collect();
        }
        let tweaks: Vec<(&str, &str)> = registry::all().collect();
        let items: Vec<String> = tweaks
            .iter()
            .map(|(page, tweak)| format!("{page}: {tweak}"))
            .collect();
        let picked = ctx
            .prompt
            .multi_select("Registry tweaks to apply", &items)?
            .ok_or(JobError::UserCancelled)?;
        if picked.is_empty() {
            return Err(JobError::NothingSelected("registry tweaks"));
        }
        Ok(picked
            .into_iter()
            .filter_map(|i| tweaks.get(i).map(|(_, tweak)| *tweak))
            .collect())
    }
}

impl Job for SetRegistry {
    fn name(&self) -> &'static str {
        "set-registry"
    }

    fn run(&self, ctx: &Context) -> Result<(), JobError> {
        require_elevation(ctx, "importing registry tweaks")?;
        let selected = self.selection(ctx)?;

        let tally = Tally::new("registry tweaks");
        for tweak in selected {
            let file = registry::reg_file(&ctx.assets, tweak);
            tally.attempt(ctx, tweak, &format!("import {}", file.display()), || {
                if ctx.fs_ops.classify(&file) != PathKind::File {
                    bail!("{} not found", file.display());
                }
                registry::import(&*ctx.executor, &file)?;
                Ok(Outcome::Done)
            });
        }

        if tally.succeeded() > 0
            && !ctx.dry_run
            && let Err(e) = powershell::restart_explorer(&ctx.shell, &*ctx.executor)
        {
            ctx.log
                .warn(&format!("could not restart Explorer, sign out to apply: {e:#}"));
        }
        tally.finish()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::jobs::test_helpers::TestContext;
    use crate::logging::ItemStatus;
    use crate::prompt::Answer;

    #[test]
    fn named_tweaks_are_imported_then_explorer_restarts() {
        let t = TestContext::new().elevated();
        t.touch_asset("RegFiles/DisableCopilot.reg");
        t.touch_asset("RegFiles/AlignTaskbarLeft.reg");
        SetRegistry {
            apply: vec!["disablecopilot".into(), "AlignTaskbarLeft".into()],
        }
        .run(&t.ctx)
        .unwrap();
        let calls = t.exec.calls();
        assert_eq!(calls.len(), 3);
        assert!(calls[0].starts_with("regedit.exe /s ") && calls[0].ends_with("DisableCopilot.reg"));
        assert!(calls[1].ends_with("AlignTaskbarLeft.reg"));
        assert!(calls[2].ends_with("Stop-Process -Name explorer -Force"));
    }

    #[test]
    fn requires_elevation() {
        let t = TestContext::new();
        let err = SetRegistry {
            apply: vec!["EnableDarkMode".into()],
        }
        .run(&t.ctx)
        .unwrap_err();
        assert!(matches!(err, JobError::PrivilegeDenied { .. }));
        assert!(t.exec.calls().is_empty());
    }

    #[test]
    fn unknown_tweak_is_rejected_before_importing() {
        let t = TestContext::new().elevated();
        let err = SetRegistry {
            apply: vec!["EnableDarkMode".into(), "MakeItFaster".into()],
        }
        .run(&t.ctx)
        .unwrap_err();
        assert!(matches!(err, JobError::InvalidInput(ref m) if m.contains("MakeItFaster")));
        assert!(t.exec.calls().is_empty());
    }

    #[test]
    fn interactive_selection() {
        let t = TestContext::new()
            .elevated()
            .with_answers([Answer::MultiSelect(vec![0])]);
        t.touch_asset("RegFiles/DisableCopilot.reg");
        SetRegistry::default().run(&t.ctx).unwrap();
        assert_eq!(t.items_with(ItemStatus::Ok), ["DisableCopilot"]);
    }

    #[test]
    fn empty_selection_is_an_error() {
        let t = TestContext::new()
            .elevated()
            .with_answers([Answer::MultiSelect(vec![])]);
        assert!(matches!(
            SetRegistry::default().run(&t.ctx),
            Err(JobError::NothingSelected(_))
        ));
    }

    #[test]
    fn missing_reg_file_fails_item_without_restart() {
        let t = TestContext::new().elevated();
        let err = SetRegistry {
            apply: vec!["EnableDVR".into()],
        }
        .run(&t.ctx)
        .unwrap_err();
        assert!(matches!(err, JobError::ItemsFailed { failed: 1, .. }));
        assert!(t.exec.calls().is_empty());
    }
}
