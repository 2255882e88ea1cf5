//! Domain-specific error types for the job executors.
//!
//! Collaborators (copier, resolver, process runner) return typed errors or
//! [`anyhow::Error`]; only the command dispatcher turns a [`JobError`] into
//! a process exit status.
//!
//! # Error hierarchy
//!
//! ```text
//! JobError
//! ├── UserCancelled            prompt aborted, no side effects
//! ├── ConfigInvalid(ConfigError)
//! ├── PrivilegeDenied          elevation required but absent
//! ├── ExternalActionFailed     a fatal external step failed
//! ├── ItemsFailed              some work items failed (aggregate-and-continue)
//! ├── NothingSelected          an interactive selection came back empty
//! ├── InvalidInput             a flag or prompt answer was rejected
//! └── Other(anyhow::Error)
//! ```
//!
//! Recursive copy failures live in [`crate::resources::copy::CopyError`].

use std::path::PathBuf;

use thiserror::Error;

/// Exit status used when the user cancels a prompt.
pub const EXIT_CANCELLED: u8 = 130;

/// Errors that arise from locating, reading or validating a job description.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config path does not exist (after one re-prompt).
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The config file exists but could not be read.
    #[error("failed to read config file {}: {source}", .path.display())]
    Io {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The config file is not valid YAML or does not match the schema.
    #[error("failed to parse config file {}: {source}", .path.display())]
    Parse {
        /// Path to the malformed file.
        path: PathBuf,
        /// Underlying YAML error.
        source: serde_yaml::Error,
    },

    /// The list the command operates on is empty.
    #[error("the config file does not contain any {0}")]
    EmptySection(&'static str),

    /// A field required by the command is missing or blank.
    #[error("the config file is missing `{0}`")]
    MissingField(&'static str),
}

/// Errors that end a job.
#[derive(Error, Debug)]
pub enum JobError {
    /// The user cancelled an interactive prompt before anything was changed.
    #[error("cancelled by user")]
    UserCancelled,

    /// The job description is missing, unreadable or invalid.
    #[error(transparent)]
    ConfigInvalid(#[from] ConfigError),

    /// The job mutates machine-wide state and the process is not elevated.
    #[error("{action} requires administrator privileges; re-run win-tools from an elevated terminal")]
    PrivilegeDenied {
        /// What the job was about to do.
        action: String,
    },

    /// An external action the whole job depends on failed.
    #[error("{action} failed: {reason}")]
    ExternalActionFailed {
        /// The action that failed.
        action: String,
        /// Rendered cause chain.
        reason: String,
    },

    /// One or more work items failed; the remaining items were still processed.
    #[error("{failed} of {total} {noun} failed")]
    ItemsFailed {
        /// Plural noun for the work items (e.g. "packages").
        noun: &'static str,
        /// Number of failed items.
        failed: usize,
        /// Number of items attempted.
        total: usize,
    },

    /// An interactive selection returned no entries.
    #[error("no {0} selected")]
    NothingSelected(&'static str),

    /// A value given on the command line or at a prompt was rejected.
    #[error("{0}")]
    InvalidInput(String),

    /// Any other failure raised by a collaborator.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl JobError {
    /// Build an [`JobError::ExternalActionFailed`] from an action label and its cause.
    pub fn external(action: impl Into<String>, err: &anyhow::Error) -> Self {
        Self::ExternalActionFailed {
            action: action.into(),
            reason: format!("{err:#}"),
        }
    }

    /// Build a [`JobError::PrivilegeDenied`] for `action`.
    pub fn privilege(action: impl Into<String>) -> Self {
        Self::PrivilegeDenied {
            action: action.into(),
        }
    }

    /// Process exit status for this error.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::UserCancelled => EXIT_CANCELLED,
            _ => 1,
        }
    }
}
