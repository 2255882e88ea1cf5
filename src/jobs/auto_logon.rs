//! `auto-logon`: enable automatic sign-in through the bundled script.
use super::acquire::{self, Question};
use super::{Context, Job, require_elevation};
use crate::error::JobError;
use crate::resources::paths::PathKind;

/// Bundled script configuring Winlogon.
pub const SCRIPT: &str = "autologon.ps1";

const USERNAME: Question<'static> = Question {
    title: "Please enter your username",
    placeholder: "The username you use to logon",
    rejected: "the username cannot be empty",
};

/// Options forwarded to [`SCRIPT`].
#[derive(Debug, Default)]
pub struct AutoLogon {
    /// Account to sign in as; asked for when absent.
    pub username: Option<String>,
    /// Logon domain; the local machine when absent.
    pub domain: Option<String>,
    /// Number of sign-ins before auto-logon disables itself.
    pub logon_count: Option<u32>,
    /// Clear the legal notice banner so sign-in needs no interaction.
    pub remove_prompt: bool,
    /// File receiving the current Winlogon settings before they change.
    pub backup_file: Option<String>,
}

impl AutoLogon {
    fn script_args(&self, username: &str) -> Vec<String> {
        let mut args = vec!["-Username".to_string(), username.to_string()];
        if let Some(domain) = &self.domain {
            args.extend(["-Domain".to_string(), domain.clone()]);
        }
        if let Some(count) = self.logon_count {
            args.extend(["-AutoLogonCount".to_string(), count.to_string()]);
        }
        if self.remove_prompt {
            args.push("-RemoveLegalPrompt".to_string());
        }
        if let Some(file) = &self.backup_file {
            args.extend(["-BackupFile".to_string(), file.clone()]);
        }
        args
    }
}

impl Job for AutoLogon {
    fn name(&self) -> &'static str {
        "auto-logon"
    }

    fn run(&self, ctx: &Context) -> Result<(), JobError> {
        require_elevation(ctx, "enabling auto-logon")?;
        let username = acquire::with_one_retry(
            ctx,
            self.username.as_deref(),
            &USERNAME,
            |name| !name.trim().is_empty(),
        )?
        .map_err(|_| JobError::InvalidInput("a username is required".to_string()))?;
        let args = self.script_args(username.trim());

        let script = ctx.asset(SCRIPT);
        if ctx.dry_run {
            ctx.log
                .dry_run(&format!("would run {} {}", script.display(), args.join(" ")));
            return Ok(());
        }
        if ctx.fs_ops.classify(&script) != PathKind::File {
            return Err(JobError::ExternalActionFailed {
                action: "enabling auto-logon".to_string(),
                reason: format!("{} not found", script.display()),
            });
        }
        ctx.shell
            .run_file(&*ctx.executor, &script, &args)
            .map_err(|e| JobError::external("enabling auto-logon", &e))?;
        ctx.log.info("auto-logon takes effect on the next restart");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::jobs::test_helpers::TestContext;
    use crate::prompt::Answer;

    #[test]
    fn optional_flags_are_forwarded_only_when_given() {
        let job = AutoLogon {
            username: Some("dana".into()),
            ..AutoLogon::default()
        };
        assert_eq!(job.script_args("dana"), ["-Username", "dana"]);

        let job = AutoLogon {
            username: Some("dana".into()),
            domain: Some("CORP".into()),
            logon_count: Some(3),
            remove_prompt: true,
            backup_file: Some(r"C:\winlogon.bak".into()),
        };
        assert_eq!(
            job.script_args("dana"),
            [
                "-Username",
                "dana",
                "-Domain",
                "CORP",
                "-AutoLogonCount",
                "3",
                "-RemoveLegalPrompt",
                "-BackupFile",
                r"C:\winlogon.bak"
            ]
        );
    }

    #[test]
    fn runs_script_with_supplied_username() {
        let t = TestContext::new().elevated();
        t.touch_asset(SCRIPT);
        AutoLogon {
            username: Some("dana".into()),
            ..AutoLogon::default()
        }
        .run(&t.ctx)
        .unwrap();
        let calls = t.exec.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].contains(SCRIPT));
        assert!(calls[0].ends_with("-Username dana"));
        assert!(t.prompt.asked().is_empty());
    }

    #[test]
    fn blank_username_is_asked_again_once() {
        let t = TestContext::new()
            .elevated()
            .with_answers([Answer::Text("  ".into()), Answer::Text("dana".into())]);
        t.touch_asset(SCRIPT);
        AutoLogon::default().run(&t.ctx).unwrap();
        assert_eq!(t.prompt.asked().len(), 2);
        assert!(t.exec.calls()[0].ends_with("-Username dana"));
    }

    #[test]
    fn second_blank_username_is_invalid_input() {
        let t = TestContext::new()
            .elevated()
            .with_answers([Answer::Text(String::new()), Answer::Text(String::new())]);
        t.touch_asset(SCRIPT);
        let err = AutoLogon::default().run(&t.ctx).unwrap_err();
        assert!(matches!(err, JobError::InvalidInput(_)));
        assert!(t.exec.calls().is_empty());
    }

    #[test]
    fn cancelled_prompt_runs_nothing() {
        let t = TestContext::new().elevated().with_answers([Answer::Cancel]);
        assert!(matches!(
            AutoLogon::default().run(&t.ctx),
            Err(JobError::UserCancelled)
        ));
        assert!(t.exec.calls().is_empty());
    }

    #[test]
    fn elevation_is_checked_before_asking() {
        let t = TestContext::new().with_answers([Answer::Text("dana".into())]);
        assert!(matches!(
            AutoLogon::default().run(&t.ctx),
            Err(JobError::PrivilegeDenied { .. })
        ));
        assert_eq!(t.prompt.remaining(), 1);
    }

    #[test]
    fn dry_run_does_not_run_script() {
        let t = TestContext::new().dry_run();
        AutoLogon {
            username: Some("dana".into()),
            ..AutoLogon::default()
        }
        .run(&t.ctx)
        .unwrap();
        assert!(t.exec.calls().is_empty());
    }
}
