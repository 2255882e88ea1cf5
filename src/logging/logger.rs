//! The job-facing logger: leveled messages plus the per-item summary.
use std::path::PathBuf;
use std::sync::Mutex;

use super::subscriber::{DRY_RUN, STAGE, SUCCESS};
use super::types::{ItemEntry, ItemStatus, Log};
use super::utils::log_file_path;

/// Implement the message methods of [`Log`] by calling the inherent
/// method of the same name.
macro_rules! forward_log_methods {
    ($($method:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.$method(msg);
            }
        )+
    };
}

/// Logger handed to every job through its context.
///
/// Messages are plain `tracing` events; the subscriber from
/// [`init_subscriber`](super::subscriber::init_subscriber) decides where
/// they land. Item outcomes are kept here until [`Logger::print_summary`].
#[derive(Debug)]
pub struct Logger {
    items: Mutex<Vec<ItemEntry>>,
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Logger for a run of `command`. The file itself is opened by the
    /// subscriber; the path is kept for the summary footer.
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self {
            items: Mutex::new(Vec::new()),
            log_file: log_file_path(command),
        }
    }

    /// Where the log file for this run lives.
    #[cfg(test)]
    pub const fn log_path(&self) -> Option<&PathBuf> {
        self.log_file.as_ref()
    }

    /// Snapshot of the recorded items, in recording order.
    #[must_use]
    pub fn item_entries(&self) -> Vec<ItemEntry> {
        self.items
            .lock()
            .map(|items| items.clone())
            .unwrap_or_default()
    }

    /// Header for a major step of a job.
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: STAGE, "{msg}");
    }

    /// Plain progress line.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Console shows these only with `-v`; the log file always has them.
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Something the user should look at; the job carries on.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// A failure, usually right before the job returns it.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// A step that finished cleanly.
    pub fn success(&self, msg: &str) {
        tracing::info!(target: SUCCESS, "{msg}");
    }

    /// Describe an action that `--dry-run` skipped.
    pub fn dry_run(&self, msg: &str) {
        tracing::info!(target: DRY_RUN, "{msg}");
    }

    /// Remember the outcome of one item for the summary.
    pub fn record_item(&self, name: &str, status: ItemStatus, message: Option<&str>) {
        let entry = ItemEntry {
            name: name.to_owned(),
            status,
            message: message.map(str::to_owned),
        };
        if let Ok(mut items) = self.items.lock() {
            items.push(entry);
        }
    }

    /// Log one line per recorded item, then the totals and the log file
    /// location. Does nothing when no item was recorded.
    pub fn print_summary(&self) {
        let items = self.item_entries();
        if items.is_empty() {
            return;
        }

        self.stage("Summary");
        for item in &items {
            let detail = item
                .message
                .as_deref()
                .map(|m| format!(" ({m})"))
                .unwrap_or_default();
            let status = item.status;
            self.info(&format!(
                "{}{} {}{detail}\x1b[0m",
                status.colour(),
                status.icon(),
                item.name
            ));
        }
        self.info(&totals_line(&items));

        if let Some(path) = &self.log_file {
            self.info(&format!("\x1b[2mfull log: {}\x1b[0m", path.display()));
        }
    }
}

/// `N items: a ok, b skipped, c dry-run, d failed`, each count coloured.
fn totals_line(items: &[ItemEntry]) -> String {
    let counts: Vec<String> = ItemStatus::ALL
        .iter()
        .map(|&status| {
            let n = items.iter().filter(|i| i.status == status).count();
            format!("{}{n} {}\x1b[0m", status.colour(), status.label())
        })
        .collect();
    format!("{} items: {}", items.len(), counts.join(", "))
}

impl Log for Logger {
    forward_log_methods!(stage, info, debug, warn, error, success, dry_run);

    fn record_item(&self, name: &str, status: ItemStatus, message: Option<&str>) {
        self.record_item(name, status, message);
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::logging::isolated_logger;
    use crate::logging::utils::strip_ansi;
    use std::fs;

    fn log_text(log: &Logger) -> String {
        fs::read_to_string(log.log_path().expect("log path")).unwrap()
    }

    #[test]
    fn items_keep_recording_order_and_detail() {
        let (log, _tmp, _guard) = isolated_logger();
        assert!(log.item_entries().is_empty());
        log.record_item(r"C:\Users\me\.ssh", ItemStatus::Ok, None);
        log.record_item("git", ItemStatus::Failed, Some("exit code 1"));

        let items = log.item_entries();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, r"C:\Users\me\.ssh");
        assert_eq!(items[1].status, ItemStatus::Failed);
        assert_eq!(items[1].message.as_deref(), Some("exit code 1"));
    }

    #[test]
    fn trait_object_records_into_the_same_list() {
        let (log, _tmp, _guard) = isolated_logger();
        let dyn_log: &dyn Log = &log;
        dyn_log.record_item("PATH", ItemStatus::Skipped, Some("already set"));
        assert_eq!(log.item_entries()[0].status, ItemStatus::Skipped);
    }

    #[test]
    fn totals_count_every_status() {
        let entry = |status| ItemEntry {
            name: "x".into(),
            status,
            message: None,
        };
        let items = [
            entry(ItemStatus::Ok),
            entry(ItemStatus::Failed),
            entry(ItemStatus::Failed),
            entry(ItemStatus::Skipped),
        ];
        assert_eq!(
            strip_ansi(&totals_line(&items)),
            "4 items: 1 ok, 1 skipped, 0 dry-run, 2 failed"
        );
    }

    #[test]
    fn file_gets_every_kind_with_its_tag() {
        let (log, _tmp, _guard) = isolated_logger();
        log.stage("Backup");
        log.debug("resolved %USERPROFILE%");
        log.warn("nothing to restore");
        log.success("copied 3 folders");
        log.dry_run("would copy C:/a");

        let text = log_text(&log);
        assert!(text.starts_with("# win-tools "), "{text}");
        for expected in [
            "==> Backup",
            "[debug] resolved %USERPROFILE%",
            "[warn] nothing to restore",
            "[success] copied 3 folders",
            "[dry run] would copy C:/a",
        ] {
            assert!(text.contains(expected), "missing {expected:?} in {text}");
        }
    }

    #[test]
    fn summary_lands_in_the_file_without_colour() {
        let (log, _tmp, _guard) = isolated_logger();
        log.record_item("vlc", ItemStatus::Failed, Some("not found"));
        log.print_summary();

        let text = log_text(&log);
        assert!(text.contains("==> Summary"));
        assert!(text.contains("vlc (not found)"));
        assert!(text.contains("1 items: 0 ok, 0 skipped, 0 dry-run, 1 failed"));
        assert!(!text.contains('\x1b'));
    }

    #[test]
    fn empty_summary_logs_nothing() {
        let (log, _tmp, _guard) = isolated_logger();
        log.print_summary();
        assert!(!log_text(&log).contains("Summary"));
    }
}
