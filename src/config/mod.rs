//! Job description model and loader.
//!
//! A job description is a YAML document with four optional top-level
//! sections (`backup`, `environmentVariables`, `packages`, `scripts`).
//! Missing, empty or `null` sections load as empty; unknown keys are
//! ignored.
pub mod env_vars;
pub mod packages;
pub mod scripts;
pub mod template;
pub mod validation;

use std::path::Path;

use serde::{Deserialize, Deserializer};

use crate::error::ConfigError;
use env_vars::EnvVarSpec;
use packages::PackageSpec;
use scripts::ScriptSpec;
use validation::ValidationWarning;

/// The `backup` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BackupSection {
    /// Source paths, in copy order. May contain `%NAME%` placeholders.
    #[serde(default, deserialize_with = "null_as_default")]
    pub paths: Vec<String>,
    /// Folder backups are written to and restored from.
    #[serde(default, deserialize_with = "null_as_default")]
    pub target: String,
}

/// A parsed job description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct JobConfig {
    /// Folders to back up and where to.
    #[serde(default, deserialize_with = "null_as_default")]
    pub backup: BackupSection,
    /// Variables for `set-envs`.
    #[serde(
        default,
        rename = "environmentVariables",
        deserialize_with = "null_as_default"
    )]
    pub environment_variables: Vec<EnvVarSpec>,
    /// Chocolatey packages for `choco-install`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub packages: Vec<PackageSpec>,
    /// Commands for `run-scripts`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub scripts: Vec<ScriptSpec>,
}

impl JobConfig {
    /// Run the non-fatal checks over this description.
    #[must_use]
    pub fn validate(&self) -> Vec<ValidationWarning> {
        validation::validate(self)
    }
}

/// A section written as `packages:` with nothing under it is `null` in YAML.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Parse a job description from YAML text.
///
/// An empty or comment-only document yields an empty description.
///
/// # Errors
///
/// Returns an error if the text is not YAML or does not match the schema.
pub fn parse(text: &str) -> Result<JobConfig, serde_yaml::Error> {
    let config: Option<JobConfig> = serde_yaml::from_str(text)?;
    Ok(config.unwrap_or_default())
}

/// Read and parse the job description at `path`.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file cannot be read and
/// [`ConfigError::Parse`] if its content does not match the schema.
pub fn load(path: &Path) -> Result<JobConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
