//! Script entries of a job description.
use serde::Deserialize;

/// Prefix selecting PowerShell in the string form of a script.
pub const POWERSHELL_PREFIX: &str = "powershell";

/// Interpreter a script runs under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interpreter {
    /// `cmd /C <body>`.
    #[default]
    Cmd,
    /// `pwsh`/`powershell -Command <body>`.
    #[serde(alias = "pwsh")]
    PowerShell,
}

/// One `scripts` entry.
///
/// Accepts either a string, where a leading `powershell` word selects
/// PowerShell, or a mapping (`{ run: "...", shell: powershell }`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawScript")]
pub struct ScriptSpec {
    /// Command line or script text, marker removed.
    pub body: String,
    /// Interpreter to run `body` with.
    pub interpreter: Interpreter,
}

impl ScriptSpec {
    /// Parse the string form of a script entry.
    #[must_use]
    pub fn parse(entry: &str) -> Self {
        let trimmed = entry.trim();
        match trimmed.strip_prefix(POWERSHELL_PREFIX) {
            Some(rest) if rest.is_empty() || rest.starts_with(char::is_whitespace) => Self {
                body: rest.trim().to_string(),
                interpreter: Interpreter::PowerShell,
            },
            _ => Self {
                body: trimmed.to_string(),
                interpreter: Interpreter::Cmd,
            },
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawScript {
    Marked(String),
    Structured {
        run: String,
        #[serde(default)]
        shell: Interpreter,
    },
}

impl From<RawScript> for ScriptSpec {
    fn from(raw: RawScript) -> Self {
        match raw {
            RawScript::Marked(entry) => Self::parse(&entry),
            RawScript::Structured { run, shell } => Self {
                body: run.trim().to_string(),
                interpreter: shell,
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn default_interpreter_is_cmd() {
        let spec = ScriptSpec::parse("echo hello & ver");
        assert_eq!(spec.interpreter, Interpreter::Cmd);
        assert_eq!(spec.body, "echo hello & ver");
    }

    #[test]
    fn powershell_prefix_is_stripped() {
        let spec = ScriptSpec::parse("powershell Get-ChildItem Env:");
        assert_eq!(spec.interpreter, Interpreter::PowerShell);
        assert_eq!(spec.body, "Get-ChildItem Env:");
    }

    #[test]
    fn prefix_must_be_a_whole_word() {
        let spec = ScriptSpec::parse("powershell.exe -File setup.ps1");
        assert_eq!(spec.interpreter, Interpreter::Cmd);
        assert_eq!(spec.body, "powershell.exe -File setup.ps1");
    }

    #[test]
    fn string_and_structured_forms() {
        let specs: Vec<ScriptSpec> = serde_yaml::from_str(
            "- mkdir C:\\work\n\
             - powershell Write-Output hi\n\
             - {run: Get-Date, shell: powershell}\n\
             - {run: ver}\n",
        )
        .unwrap();
        assert_eq!(specs[0].interpreter, Interpreter::Cmd);
        assert_eq!(specs[0].body, r"mkdir C:\work");
        assert_eq!(specs[1].interpreter, Interpreter::PowerShell);
        assert_eq!(specs[2].interpreter, Interpreter::PowerShell);
        assert_eq!(specs[2].body, "Get-Date");
        assert_eq!(specs[3].interpreter, Interpreter::Cmd);
    }
}
