//! Windows administration toolkit.
//!
//! A batch executor for machine setup chores: backing up and restoring
//! folders, installing Chocolatey packages, running scripts, setting
//! environment variables, importing registry tweaks and removing bundled
//! applications. Config-driven jobs read a YAML job description; the rest
//! run bundled assets.
//!
//! The public API is organised into four layers:
//!
//! - **[`config`]**: parse and validate the YAML job description
//! - **[`resources`]**: primitives over external facilities (copy, PowerShell, choco, regedit)
//! - **[`jobs`]**: one executor per subcommand, wired to resources through a [`jobs::Context`]
//! - **[`commands`]**: subcommand dispatch, the interactive menu and exit status
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod jobs;
pub mod logging;
pub mod operations;
pub mod privilege;
pub mod prompt;
pub mod resources;

/// Version string: `WIN_TOOLS_VERSION` from the build, or `dev-<crate version>`.
pub const VERSION: &str = match option_env!("WIN_TOOLS_VERSION") {
    Some(v) => v,
    None => concat!("dev-", env!("CARGO_PKG_VERSION")),
};
