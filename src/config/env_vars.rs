//! Environment variable entries of a job description.
use std::fmt;

use serde::Deserialize;

/// Where an environment variable is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum Scope {
    /// The current user's environment (`HKCU\Environment`).
    #[default]
    #[serde(alias = "user", alias = "USER")]
    User,
    /// The machine-wide environment; requires elevation.
    #[serde(alias = "machine", alias = "MACHINE")]
    Machine,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "User"),
            Self::Machine => write!(f, "Machine"),
        }
    }
}

/// One `environmentVariables` entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EnvVarSpec {
    /// Variable name.
    pub key: String,
    /// Value to set, or to append when the variable is `PATH`.
    pub value: String,
    /// Target scope; `User` when omitted.
    #[serde(default)]
    pub scope: Scope,
}

impl EnvVarSpec {
    /// Whether this entry appends to `PATH` instead of replacing a value.
    #[must_use]
    pub fn is_path(&self) -> bool {
        self.key.eq_ignore_ascii_case("PATH")
    }
}
