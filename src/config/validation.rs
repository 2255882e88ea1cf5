//! Non-fatal checks run after a job description has been loaded.
use std::collections::HashMap;

use super::JobConfig;

/// A validation warning detected after loading a job description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// The config section (e.g. "backup.paths", "packages").
    pub section: &'static str,
    /// The specific item that triggered the warning.
    pub item: String,
    /// Human-readable warning message.
    pub message: String,
}

impl ValidationWarning {
    /// Warning about `item` in `section`.
    #[must_use]
    pub fn new(section: &'static str, item: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            section,
            item: item.into(),
            message: message.into(),
        }
    }
}

/// Final path component, treating both `\` and `/` as separators.
fn basename(path: &str) -> &str {
    path.trim()
        .trim_end_matches(['\\', '/'])
        .rsplit(['\\', '/'])
        .next()
        .unwrap_or_default()
}

/// Case-insensitive comparison key using `\` separators, without a trailing one.
fn path_key(path: &str) -> String {
    path.trim()
        .replace('/', "\\")
        .trim_end_matches('\\')
        .to_lowercase()
}

/// Whether `inner` is `outer` or a path below it, compared as written.
fn is_within(inner: &str, outer: &str) -> bool {
    let (inner, outer) = (path_key(inner), path_key(outer));
    !outer.is_empty()
        && inner
            .strip_prefix(&outer)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('\\'))
}

pub(super) fn validate(config: &JobConfig) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    validate_backup(config, &mut warnings);
    validate_env_vars(config, &mut warnings);

    for package in &config.packages {
        if package.name.is_empty() {
            warnings.push(ValidationWarning::new(
                "packages",
                "<blank>",
                "entry has no package name and will be skipped",
            ));
        }
    }
    for (i, script) in config.scripts.iter().enumerate() {
        if script.body.is_empty() {
            warnings.push(ValidationWarning::new(
                "scripts",
                format!("#{}", i + 1),
                "script is empty and will be skipped",
            ));
        }
    }
    warnings
}

fn validate_backup(config: &JobConfig, warnings: &mut Vec<ValidationWarning>) {
    let backup = &config.backup;
    if !backup.paths.is_empty() && backup.target.trim().is_empty() {
        warnings.push(ValidationWarning::new(
            "backup.target",
            "<missing>",
            "backup paths are listed but no target folder is set",
        ));
    }

    let mut seen: HashMap<String, &str> = HashMap::new();
    for path in &backup.paths {
        if is_within(&backup.target, path) {
            warnings.push(ValidationWarning::new(
                "backup.target",
                backup.target.clone(),
                format!("lies inside {path}; that folder cannot be backed up into itself"),
            ));
        }
        let name = basename(path).to_lowercase();
        if name.is_empty() {
            warnings.push(ValidationWarning::new(
                "backup.paths",
                path.clone(),
                "path has no file or folder name",
            ));
            continue;
        }
        if let Some(first) = seen.insert(name, path) {
            warnings.push(ValidationWarning::new(
                "backup.paths",
                path.clone(),
                format!("shares its name with {first}; both are stored under the same name in the target"),
            ));
        }
    }
}

fn validate_env_vars(config: &JobConfig, warnings: &mut Vec<ValidationWarning>) {
    for var in &config.environment_variables {
        if var.key.trim().is_empty() {
            warnings.push(ValidationWarning::new(
                "environmentVariables",
                "<blank>",
                "entry has an empty key",
            ));
        } else if var.is_path() && var.value.contains(';') {
            warnings.push(ValidationWarning::new(
                "environmentVariables",
                var.key.clone(),
                "PATH value contains ';' and will be appended as several entries",
            ));
        }
    }
}
