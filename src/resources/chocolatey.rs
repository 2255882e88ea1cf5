//! Chocolatey package manager driver.
use std::path::Path;

use anyhow::Result;

use super::paths::PathKind;
use super::powershell::{PowerShell, quote};
use crate::config::packages::{InstallMode, PackageSpec};
use crate::exec::Executor;
use crate::operations::FileSystemOps;

/// Where the Chocolatey installer puts `choco.exe`.
pub const DEFAULT_CHOCO_PATH: &str = r"C:\ProgramData\chocolatey\bin\choco.exe";

/// Community bootstrap script, run through PowerShell.
pub const INSTALL_SCRIPT: &str = "Set-ExecutionPolicy Bypass -Scope Process -Force; \
[System.Net.ServicePointManager]::SecurityProtocol = [System.Net.ServicePointManager]::SecurityProtocol -bor 3072; \
iex ((New-Object System.Net.WebClient).DownloadString('https://community.chocolatey.org/install.ps1'))";

/// Flags appended to every install so runs never stop for confirmation.
const INSTALL_FLAGS: [&str; 3] = ["-y", "-f", "--ignore-checksum"];

/// Find the Chocolatey executable: `choco` on `PATH`, then the default
/// install location (a fresh install is not on this process's `PATH` yet).
#[must_use]
pub fn locate(executor: &dyn Executor, fs: &dyn FileSystemOps) -> Option<String> {
    if executor.which("choco") {
        return Some("choco".to_string());
    }
    (fs.classify(Path::new(DEFAULT_CHOCO_PATH)) == PathKind::File)
        .then(|| DEFAULT_CHOCO_PATH.to_string())
}

/// Install Chocolatey with the community bootstrap script.
///
/// # Errors
///
/// Returns an error if PowerShell is unavailable or the script fails.
pub fn bootstrap(shell: &PowerShell, executor: &dyn Executor) -> Result<()> {
    shell.run_attached(executor, INSTALL_SCRIPT)
}

/// Arguments passed to `choco` for `spec`.
#[must_use]
pub fn install_args(spec: &PackageSpec) -> Vec<&str> {
    let mut args = vec!["install", spec.name.as_str()];
    args.extend(spec.args.iter().map(String::as_str));
    args.extend(INSTALL_FLAGS);
    args
}

/// Install one package with `choco`.
///
/// Inline installs block until `choco` exits. New-window installs start an
/// elevated console that runs the install and waits for a key press, and
/// return as soon as that window has been launched.
///
/// # Errors
///
/// Returns an error if the install (or the window launch) fails.
pub fn install(
    shell: &PowerShell,
    executor: &dyn Executor,
    choco: &str,
    spec: &PackageSpec,
) -> Result<()> {
    match spec.mode {
        InstallMode::Inline => executor.run_attached(choco, &install_args(spec)),
        InstallMode::NewWindow => {
            let script = new_window_script(shell.program(executor)?, choco, spec);
            shell.run(executor, &script).map(|_| ())
        }
    }
}

fn new_window_script(program: &str, choco: &str, spec: &PackageSpec) -> String {
    let inner = format!("& {} {}; pause", quote(choco), install_args(spec).join(" "));
    format!(
        "Start-Process {program} -ArgumentList '-NoProfile','-Command',{} -Verb RunAs",
        quote(&inner)
    )
}
