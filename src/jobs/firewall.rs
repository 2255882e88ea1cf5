//! `disable-firewall`: run the bundled firewall script.
use super::{Context, Job, require_elevation};
use crate::error::JobError;
use crate::resources::paths::PathKind;

/// Bundled script turning off every firewall profile.
pub const SCRIPT: &str = "disableFirewall.ps1";

/// Turns the Windows firewall off for every profile.
#[derive(Debug, Default)]
pub struct DisableFirewall;

impl Job for DisableFirewall {
    fn name(&self) -> &'static str {
        "disable-firewall"
    }

    fn run(&self, ctx: &Context) -> Result<(), JobError> {
        require_elevation(ctx, "disabling the firewall")?;
        let script = ctx.asset(SCRIPT);
        if ctx.dry_run {
            ctx.log.dry_run(&format!("would run {}", script.display()));
            return Ok(());
        }
        if ctx.fs_ops.classify(&script) != PathKind::File {
            return Err(JobError::ExternalActionFailed {
                action: "disabling the firewall".to_string(),
                reason: format!("{} not found", script.display()),
            });
        }
        ctx.shell
            .run_file(&*ctx.executor, &script, &[])
            .map_err(|e| JobError::external("disabling the firewall", &e))
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::jobs::test_helpers::{RecordingExecutor, TestContext};

    #[test]
    fn runs_bundled_script() {
        let t = TestContext::new().elevated();
        t.touch_asset(SCRIPT);
        DisableFirewall.run(&t.ctx).unwrap();
        let calls = t.exec.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].starts_with("pwsh -NoProfile -ExecutionPolicy Bypass -File "));
        assert!(calls[0].ends_with(SCRIPT));
    }

    #[test]
    fn script_failure_is_external_action_failed() {
        let t = TestContext::new()
            .elevated()
            .with_executor(RecordingExecutor::new().fail_matching(SCRIPT));
        t.touch_asset(SCRIPT);
        let err = DisableFirewall.run(&t.ctx).unwrap_err();
        assert!(err.to_string().starts_with("disabling the firewall failed"), "{err}");
    }

    #[test]
    fn missing_script_is_reported() {
        let t = TestContext::new().elevated();
        let err = DisableFirewall.run(&t.ctx).unwrap_err();
        assert!(err.to_string().contains("not found"));
        assert!(t.exec.calls().is_empty());
    }

    #[test]
    fn not_elevated_is_denied() {
        let t = TestContext::new();
        assert!(matches!(
            DisableFirewall.run(&t.ctx),
            Err(JobError::PrivilegeDenied { .. })
        ));
    }
}
