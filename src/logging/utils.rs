//! Where log files live, and the small text helpers the file layer needs.
use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;

/// Environment variable pointing the log files at a specific folder.
pub(super) const LOG_DIR_ENV: &str = "WIN_TOOLS_LOG_DIR";

/// `chrono` pattern for the run header.
pub(super) const HEADER_STAMP: &str = "%Y-%m-%d %H:%M:%S";

/// `chrono` pattern for each log line.
pub(super) const LINE_STAMP: &str = "%H:%M:%S";

/// Remove terminal escape sequences so the log file stays plain text.
///
/// CSI sequences (`ESC [ ... final`) are dropped up to their final byte in
/// `@..=~`; any other escape swallows exactly one following character.
pub(super) fn strip_ansi(s: &str) -> String {
    enum State {
        Text,
        Escape,
        Csi,
    }

    let mut state = State::Text;
    s.chars()
        .filter(|&c| match state {
            State::Text if c == '\x1b' => {
                state = State::Escape;
                false
            }
            State::Text => true,
            State::Escape => {
                state = if c == '[' { State::Csi } else { State::Text };
                false
            }
            State::Csi => {
                if ('@'..='~').contains(&c) {
                    state = State::Text;
                }
                false
            }
        })
        .collect()
}

/// Pick the log folder from the environment, without touching the disk.
///
/// `$WIN_TOOLS_LOG_DIR` is used as given. Otherwise logs go to
/// `%LOCALAPPDATA%\win-tools\logs`, then `$XDG_CACHE_HOME/win-tools`, then
/// `~/.cache/win-tools`.
fn log_dir_from(var: impl Fn(&str) -> Option<OsString>) -> PathBuf {
    let set = |name: &str| var(name).filter(|v| !v.is_empty()).map(PathBuf::from);

    if let Some(dir) = set(LOG_DIR_ENV) {
        return dir;
    }
    if let Some(local) = set("LOCALAPPDATA") {
        return local.join("win-tools").join("logs");
    }
    if let Some(cache) = set("XDG_CACHE_HOME") {
        return cache.join("win-tools");
    }
    set("USERPROFILE")
        .or_else(|| set("HOME"))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".cache")
        .join("win-tools")
}

/// Return the log folder for this process, creating it when missing.
fn log_dir() -> Option<PathBuf> {
    let dir = log_dir_from(|name| std::env::var_os(name));
    fs::create_dir_all(&dir).ok()?;
    Some(dir)
}

/// One log file per command, overwritten on each run.
pub(super) fn log_file_path(command: &str) -> Option<PathBuf> {
    log_dir().map(|dir| dir.join(command).with_extension("log"))
}

/// Current UTC time rendered with `pattern`.
pub(super) fn utc_stamp(pattern: &str) -> String {
    chrono::Utc::now().format(pattern).to_string()
}
