//! Core logging types: item entries, status, and the [`Log`] trait.

/// Outcome of one work item, kept for the end-of-job summary.
#[derive(Debug, Clone)]
pub struct ItemEntry {
    /// Human-readable item label (a path, package or script).
    pub name: String,
    /// Final status of the item.
    pub status: ItemStatus,
    /// Optional detail message (e.g. skip reason or error description).
    pub message: Option<String>,
}

/// Status of a processed work item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemStatus {
    /// The external action succeeded.
    Ok,
    /// The item needed no action (e.g. PATH entry already present).
    Skipped,
    /// Dry-run mode; the action was only described.
    DryRun,
    /// The external action failed; processing continued with the next item.
    Failed,
}

impl ItemStatus {
    /// Every status, in summary order.
    pub const ALL: [Self; 4] = [Self::Ok, Self::Skipped, Self::DryRun, Self::Failed];

    /// Marker shown before the item name in the summary.
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Ok => "✓",
            Self::Skipped => "○",
            Self::DryRun => "~",
            Self::Failed => "✗",
        }
    }

    /// ANSI colour for this status.
    #[must_use]
    pub const fn colour(self) -> &'static str {
        match self {
            Self::Ok => "\x1b[32m",
            Self::Skipped => "\x1b[33m",
            Self::DryRun => "\x1b[37m",
            Self::Failed => "\x1b[31m",
        }
    }

    /// Word used in the summary totals.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Skipped => "skipped",
            Self::DryRun => "dry-run",
            Self::Failed => "failed",
        }
    }
}

/// Leveled logging sink used by every job.
///
/// [`Logger`](super::logger::Logger) is the production implementation; it
/// forwards to `tracing` and keeps the item summary.
pub trait Log: Send + Sync {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (may be suppressed on console).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Log a success message.
    fn success(&self, msg: &str);
    /// Log a dry-run action message.
    fn dry_run(&self, msg: &str);
    /// Record an item result for the summary.
    fn record_item(&self, name: &str, status: ItemStatus, message: Option<&str>);
}
