//! Persistent environment variables, written through .NET's
//! `[Environment]` API so both scopes share one code path.
use anyhow::{Context as _, Result};

use super::powershell::{PowerShell, quote};
use crate::config::env_vars::{EnvVarSpec, Scope};
use crate::exec::Executor;

/// What [`apply`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvChange {
    /// The variable was (re)assigned.
    Set,
    /// These entries were appended to `PATH`.
    Appended(Vec<String>),
    /// Every `PATH` entry was already present.
    AlreadyPresent,
}

/// Read the persisted value of `key` in `scope` (empty when unset).
///
/// # Errors
///
/// Returns an error if PowerShell fails.
pub fn get(shell: &PowerShell, executor: &dyn Executor, key: &str, scope: Scope) -> Result<String> {
    let script = format!(
        "[Environment]::GetEnvironmentVariable({}, {})",
        quote(key),
        quote(&scope.to_string())
    );
    let result = shell
        .run(executor, &script)
        .with_context(|| format!("reading {key} ({scope})"))?;
    Ok(result.stdout.trim().to_string())
}

/// Persist `value` as `key` in `scope`.
///
/// # Errors
///
/// Returns an error if PowerShell fails.
pub fn set(
    shell: &PowerShell,
    executor: &dyn Executor,
    key: &str,
    value: &str,
    scope: Scope,
) -> Result<()> {
    let script = format!(
        "[Environment]::SetEnvironmentVariable({}, {}, {})",
        quote(key),
        quote(value),
        quote(&scope.to_string())
    );
    shell
        .run(executor, &script)
        .with_context(|| format!("setting {key} ({scope})"))?;
    Ok(())
}

/// Apply one `environmentVariables` entry: `PATH` entries are appended to
/// the scope's existing value, anything else replaces the variable.
///
/// # Errors
///
/// Returns an error if reading or writing the variable fails.
pub fn apply(shell: &PowerShell, executor: &dyn Executor, spec: &EnvVarSpec) -> Result<EnvChange> {
    if !spec.is_path() {
        set(shell, executor, &spec.key, &spec.value, spec.scope)?;
        return Ok(EnvChange::Set);
    }

    let current = get(shell, executor, &spec.key, spec.scope)?;
    let missing = missing_entries(&current, &spec.value);
    if missing.is_empty() {
        return Ok(EnvChange::AlreadyPresent);
    }
    let mut updated = current.trim_end_matches(';').to_string();
    for entry in &missing {
        if !updated.is_empty() {
            updated.push(';');
        }
        updated.push_str(entry);
    }
    set(shell, executor, &spec.key, &updated, spec.scope)?;
    Ok(EnvChange::Appended(missing))
}

/// Entries of `value` not already in the `;`-separated `current` list.
/// Comparison ignores case and trailing backslashes, as Windows does.
fn missing_entries(current: &str, value: &str) -> Vec<String> {
    let normalize = |s: &str| s.trim().trim_end_matches('\\').to_lowercase();
    let mut present: Vec<String> = current
        .split(';')
        .map(normalize)
        .filter(|s| !s.is_empty())
        .collect();
    let mut missing = Vec::new();
    for entry in value.split(';').map(str::trim).filter(|s| !s.is_empty()) {
        let key = normalize(entry);
        if !present.contains(&key) {
            present.push(key);
            missing.push(entry.to_string());
        }
    }
    missing
}
