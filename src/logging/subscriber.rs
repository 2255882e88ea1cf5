//! Tracing subscriber: one classification of each event, rendered twice.
//!
//! The console gets coloured output split across stdout and stderr; the
//! per-command log file gets the same events as timestamped plain text.
use std::fmt;
use std::fs;
use std::io::Write as _;
use std::sync::Mutex;

use tracing::Level;
use tracing::field::{Field, Visit};

use super::utils::{HEADER_STAMP, LINE_STAMP, log_file_path, strip_ansi, utc_stamp};

pub(super) const STAGE: &str = "win_tools::stage";
pub(super) const SUCCESS: &str = "win_tools::success";
pub(super) const DRY_RUN: &str = "win_tools::dry_run";

/// What an event means to the user, decided from its level and target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Stage,
    Success,
    DryRun,
    Error,
    Warn,
    Info,
    Debug,
}

impl Kind {
    fn classify(level: Level, target: &str) -> Self {
        match level {
            Level::ERROR => Self::Error,
            Level::WARN => Self::Warn,
            Level::INFO => match target {
                STAGE => Self::Stage,
                SUCCESS => Self::Success,
                DRY_RUN => Self::DryRun,
                _ => Self::Info,
            },
            _ => Self::Debug,
        }
    }

    fn of(event: &tracing::Event<'_>) -> Self {
        let meta = event.metadata();
        Self::classify(*meta.level(), meta.target())
    }

    /// Prefix used in the log file.
    const fn file_tag(self) -> &'static str {
        match self {
            Self::Stage => "==> ",
            Self::Success => "    [success] ",
            Self::DryRun => "    [dry run] ",
            Self::Error => "    [error] ",
            Self::Warn => "    [warn] ",
            Self::Debug => "    [debug] ",
            Self::Info => "    ",
        }
    }

    fn console_line(self, msg: &str) -> String {
        match self {
            Self::Stage => format!("\x1b[1;36m==>\x1b[0m \x1b[1m{msg}\x1b[0m"),
            Self::Success => format!("  \x1b[32mdone\x1b[0m {msg}"),
            Self::DryRun => format!("  \x1b[35m[dry run]\x1b[0m {msg}"),
            Self::Error => format!("\x1b[31merror:\x1b[0m {msg}"),
            Self::Warn => format!("\x1b[33mwarning:\x1b[0m {msg}"),
            Self::Info => format!("  {msg}"),
            Self::Debug => format!("  \x1b[2m{msg}\x1b[0m"),
        }
    }
}

/// Pulls the formatted `message` field out of an event.
#[derive(Default)]
struct Message(String);

impl Message {
    fn of(event: &tracing::Event<'_>) -> String {
        let mut visitor = Self::default();
        event.record(&mut visitor);
        visitor.0
    }
}

impl Visit for Message {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            value.clone_into(&mut self.0);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}

/// Layer appending every event it sees to `<log dir>/<command>.log`.
///
/// The file is truncated when the layer is built, so it only ever holds
/// the latest run of a command.
#[derive(Debug)]
pub(super) struct FileLayer {
    file: Mutex<fs::File>,
}

impl FileLayer {
    /// `None` when the log folder or the file cannot be created; the run
    /// then goes ahead with console output only.
    pub(super) fn new(command: &str) -> Option<Self> {
        let path = log_file_path(command)?;
        let mut file = fs::File::create(&path).ok()?;
        writeln!(
            file,
            "# win-tools {} | {command} | started {} UTC",
            crate::VERSION,
            utc_stamp(HEADER_STAMP),
        )
        .ok()?;
        Some(Self {
            file: Mutex::new(file),
        })
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for FileLayer {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let kind = Kind::of(event);
        let msg = strip_ansi(&Message::of(event));
        if let Ok(mut file) = self.file.lock() {
            let _ = writeln!(file, "[{}] {}{msg}", utc_stamp(LINE_STAMP), kind.file_tag());
        }
    }
}

/// Console rendering of events.
struct ConsoleFormat;

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for ConsoleFormat
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: tracing_subscriber::fmt::format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> fmt::Result {
        writeln!(writer, "{}", Kind::of(event).console_line(&Message::of(event)))
    }
}

/// Install the global subscriber. Call once, before the first log line.
///
/// Warnings and errors go to stderr, everything else to stdout. `-v`
/// lowers the console level to `debug`; `WIN_TOOLS_LOG` replaces the
/// console filter entirely with an `EnvFilter` directive. The log file
/// always records `debug` and above.
pub fn init_subscriber(verbose: bool, command: &str) {
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;
    use tracing_subscriber::{
        EnvFilter, Layer as _, filter::LevelFilter, fmt, layer::SubscriberExt as _,
        util::SubscriberInitExt as _,
    };

    let console_filter = std::env::var("WIN_TOOLS_LOG").map_or_else(
        |_| {
            let level = if verbose { LevelFilter::DEBUG } else { LevelFilter::INFO };
            EnvFilter::default().add_directive(level.into())
        },
        EnvFilter::new,
    );

    let writer = std::io::stderr
        .with_max_level(Level::WARN)
        .or_else(std::io::stdout);

    let console = fmt::layer()
        .event_format(ConsoleFormat)
        .with_writer(writer)
        .with_filter(console_filter);

    let file = FileLayer::new(command).map(|layer| layer.with_filter(LevelFilter::DEBUG));

    tracing_subscriber::registry().with(console).with(file).init();
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn info_targets_select_the_kind() {
        assert_eq!(Kind::classify(Level::INFO, STAGE), Kind::Stage);
        assert_eq!(Kind::classify(Level::INFO, SUCCESS), Kind::Success);
        assert_eq!(Kind::classify(Level::INFO, DRY_RUN), Kind::DryRun);
        assert_eq!(Kind::classify(Level::INFO, "win_tools::jobs"), Kind::Info);
    }

    #[test]
    fn level_decides_outside_info() {
        assert_eq!(Kind::classify(Level::ERROR, STAGE), Kind::Error);
        assert_eq!(Kind::classify(Level::WARN, "win_tools"), Kind::Warn);
        assert_eq!(Kind::classify(Level::DEBUG, SUCCESS), Kind::Debug);
        assert_eq!(Kind::classify(Level::TRACE, "win_tools"), Kind::Debug);
    }

    #[test]
    fn console_lines_are_plain_once_stripped() {
        let plain = strip_ansi(&Kind::Warn.console_line("backup folder missing"));
        assert_eq!(plain, "warning: backup folder missing");
        let plain = strip_ansi(&Kind::Stage.console_line("Restore"));
        assert_eq!(plain, "==> Restore");
    }

    #[test]
    fn file_tags_keep_stages_flush_left() {
        assert!(!Kind::Stage.file_tag().starts_with(' '));
        for kind in [Kind::Success, Kind::DryRun, Kind::Error, Kind::Warn, Kind::Info, Kind::Debug] {
            assert!(kind.file_tag().starts_with("    "), "{kind:?}");
        }
    }
}
