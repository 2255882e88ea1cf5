//! Job executors, one per subcommand.
//!
//! Every job walks the same steps: acquire its input (a config path, a
//! selection), validate it, check privileges, run each work item in order
//! while recording its outcome, then report. Per-item failures never stop
//! the remaining items; they surface at the end as
//! [`JobError::ItemsFailed`].
pub mod acquire;
pub mod auto_logon;
pub mod backup;
pub mod bloat;
mod context;
pub mod env_vars;
pub mod firewall;
pub mod install;
pub mod registry;
pub mod restore;
pub mod scripts;
pub mod start_menu;
pub mod template;
#[cfg(test)]
pub mod test_helpers;

use std::sync::atomic::{AtomicUsize, Ordering};

pub use context::Context;

use crate::error::JobError;
use crate::logging::ItemStatus;

/// A runnable subcommand.
pub trait Job: Send + Sync + std::fmt::Debug {
    /// Command name, as typed on the command line.
    fn name(&self) -> &'static str;

    /// Run the job to completion.
    ///
    /// # Errors
    ///
    /// Returns a [`JobError`] describing why the job stopped or which items
    /// failed.
    fn run(&self, ctx: &Context) -> Result<(), JobError>;
}

/// Run `job` and log the one-line outcome.
///
/// # Errors
///
/// Returns the job's error unchanged.
pub fn execute(job: &dyn Job, ctx: &Context) -> Result<(), JobError> {
    ctx.log.stage(job.name());
    if ctx.dry_run {
        ctx.log.info("dry run: no changes will be made");
    }
    let result = job.run(ctx);
    match &result {
        Ok(()) => ctx.log.success(&format!("{} finished", job.name())),
        Err(JobError::UserCancelled) => ctx.log.warn("cancelled, nothing was changed"),
        Err(e) => ctx.log.error(&format!("{}: {e}", job.name())),
    }
    result
}

/// Fail unless the process is elevated. In dry-run mode a warning is
/// logged instead, so previews still work from a normal terminal.
///
/// # Errors
///
/// Returns [`JobError::PrivilegeDenied`] when not elevated.
pub fn require_elevation(ctx: &Context, action: &str) -> Result<(), JobError> {
    if ctx.elevation.is_elevated() {
        return Ok(());
    }
    if ctx.dry_run {
        ctx.log
            .warn(&format!("{action} requires administrator privileges"));
        return Ok(());
    }
    Err(JobError::privilege(action))
}

/// Warn when not elevated; some items of the job may fail.
pub fn advise_elevation(ctx: &Context, action: &str) {
    if !ctx.elevation.is_elevated() {
        ctx.log.warn(&format!(
            "not running as administrator; {action} may fail for protected locations"
        ));
    }
}

/// Result of one successfully handled work item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The action ran.
    Done,
    /// The action ran; the detail is kept for the summary.
    Changed(String),
    /// Nothing needed doing.
    Skipped(String),
}

/// Counts work items and failures across (possibly parallel) attempts.
#[derive(Debug)]
pub struct Tally {
    noun: &'static str,
    total: AtomicUsize,
    failed: AtomicUsize,
}

impl Tally {
    /// Start counting items described by the plural `noun`.
    #[must_use]
    pub const fn new(noun: &'static str) -> Self {
        Self {
            noun,
            total: AtomicUsize::new(0),
            failed: AtomicUsize::new(0),
        }
    }

    /// Attempt one item: in dry-run mode only `describe` it, otherwise run
    /// `action` and record the outcome.
    pub fn attempt<F>(&self, ctx: &Context, name: &str, describe: &str, action: F)
    where
        F: FnOnce() -> anyhow::Result<Outcome>,
    {
        self.total.fetch_add(1, Ordering::Relaxed);
        if ctx.dry_run {
            ctx.log.dry_run(&format!("would {describe}"));
            ctx.log.record_item(name, ItemStatus::DryRun, None);
            return;
        }
        ctx.log.debug(describe);
        match action() {
            Ok(Outcome::Done) => {
                ctx.log.info(&format!("{name}: done"));
                ctx.log.record_item(name, ItemStatus::Ok, None);
            }
            Ok(Outcome::Changed(detail)) => {
                ctx.log.info(&format!("{name}: {detail}"));
                ctx.log.record_item(name, ItemStatus::Ok, Some(&detail));
            }
            Ok(Outcome::Skipped(reason)) => {
                ctx.log.info(&format!("{name}: {reason}"));
                ctx.log.record_item(name, ItemStatus::Skipped, Some(&reason));
            }
            Err(e) => self.record_failure(ctx, name, &format!("{e:#}")),
        }
    }

    /// Record an item that could not even be attempted.
    pub fn fail(&self, ctx: &Context, name: &str, message: &str) {
        self.total.fetch_add(1, Ordering::Relaxed);
        self.record_failure(ctx, name, message);
    }

    fn record_failure(&self, ctx: &Context, name: &str, message: &str) {
        self.failed.fetch_add(1, Ordering::Relaxed);
        ctx.log.error(&format!("{name}: {message}"));
        ctx.log.record_item(name, ItemStatus::Failed, Some(message));
    }

    /// Record an item that was not attempted.
    pub fn skip(&self, ctx: &Context, name: &str, reason: &str) {
        self.total.fetch_add(1, Ordering::Relaxed);
        ctx.log.warn(&format!("{name}: {reason}"));
        ctx.log.record_item(name, ItemStatus::Skipped, Some(reason));
    }

    /// Number of items that ran without error.
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.total.load(Ordering::Relaxed) - self.failed.load(Ordering::Relaxed)
    }

    /// Turn the counts into the job result.
    ///
    /// # Errors
    ///
    /// Returns [`JobError::ItemsFailed`] if any attempt failed.
    pub fn finish(self) -> Result<(), JobError> {
        let failed = self.failed.into_inner();
        if failed == 0 {
            return Ok(());
        }
        Err(JobError::ItemsFailed {
            noun: self.noun,
            failed,
            total: self.total.into_inner(),
        })
    }
}

#[cfg(test)]
#[allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::jobs::test_helpers::TestContext;
    use crate::privilege::MockElevation;
    use std::sync::Arc;

    #[test]
    fn tally_counts_failures_and_keeps_going() {
        let t = TestContext::new();
        let tally = Tally::new("things");
        tally.attempt(&t.ctx, "a", "do a", || Ok(Outcome::Done));
        tally.attempt(&t.ctx, "b", "do b", || anyhow::bail!("boom"));
        tally.attempt(&t.ctx, "c", "do c", || Ok(Outcome::Skipped("nothing to do".into())));
        assert_eq!(tally.succeeded(), 2);
        let err = tally.finish().unwrap_err();
        assert_eq!(err.to_string(), "1 of 3 things failed");

        let statuses: Vec<_> = t.log.item_entries().iter().map(|i| i.status).collect();
        assert_eq!(statuses, [ItemStatus::Ok, ItemStatus::Failed, ItemStatus::Skipped]);
        assert_eq!(t.log.item_entries()[1].message.as_deref(), Some("boom"));
    }

    #[test]
    fn tally_dry_run_never_calls_action() {
        let t = TestContext::new().dry_run();
        let tally = Tally::new("things");
        tally.attempt(&t.ctx, "a", "do a", || panic!("must not run"));
        assert!(tally.finish().is_ok());
        assert_eq!(t.log.item_entries()[0].status, ItemStatus::DryRun);
    }

    #[test]
    fn require_elevation_denies_when_not_admin() {
        let mut mock = MockElevation::new();
        mock.expect_is_elevated().times(1).return_const(false);
        let t = TestContext::new();
        let ctx = t.ctx.with_elevation(Arc::new(mock));
        let err = require_elevation(&ctx, "disabling the firewall").unwrap_err();
        assert!(matches!(err, JobError::PrivilegeDenied { .. }));
    }

    #[test]
    fn require_elevation_passes_when_admin() {
        let mut mock = MockElevation::new();
        mock.expect_is_elevated().return_const(true);
        let t = TestContext::new();
        let ctx = t.ctx.with_elevation(Arc::new(mock));
        assert!(require_elevation(&ctx, "x").is_ok());
    }

    #[test]
    fn require_elevation_only_warns_in_dry_run() {
        let t = TestContext::new().dry_run();
        assert!(require_elevation(&t.ctx, "x").is_ok());
    }
}
