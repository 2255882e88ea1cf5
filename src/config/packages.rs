//! Package entries of a job description.
use serde::Deserialize;

/// Marker token requesting installation in a separate elevated window.
pub const NEW_WINDOW_MARKER: &str = "--new-window";

/// How a package install is launched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InstallMode {
    /// Run the package manager attached to this console.
    #[default]
    Inline,
    /// Launch the install in its own elevated console window.
    NewWindow,
}

/// One `packages` entry.
///
/// Accepts either a string (`"vscode --new-window"`, extra tokens become
/// package-manager arguments) or a mapping
/// (`{ name: vscode, args: [...], newWindow: true }`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawPackage")]
pub struct PackageSpec {
    /// Package identifier.
    pub name: String,
    /// Extra arguments passed to the package manager.
    pub args: Vec<String>,
    /// Launch mode.
    pub mode: InstallMode,
}

impl PackageSpec {
    /// Parse the string form of a package entry.
    #[must_use]
    pub fn parse(entry: &str) -> Self {
        let mut mode = InstallMode::Inline;
        let mut tokens = Vec::new();
        for token in entry.split_whitespace() {
            if token == NEW_WINDOW_MARKER {
                mode = InstallMode::NewWindow;
            } else {
                tokens.push(token.to_string());
            }
        }
        let mut tokens = tokens.into_iter();
        let name = tokens.next().unwrap_or_default();
        Self {
            name,
            args: tokens.collect(),
            mode,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPackage {
    Marked(String),
    Structured {
        name: String,
        #[serde(default)]
        args: Vec<String>,
        #[serde(default, rename = "newWindow")]
        new_window: bool,
    },
}

impl From<RawPackage> for PackageSpec {
    fn from(raw: RawPackage) -> Self {
        match raw {
            RawPackage::Marked(entry) => Self::parse(&entry),
            RawPackage::Structured {
                name,
                args,
                new_window,
            } => Self {
                name: name.trim().to_string(),
                args,
                mode: if new_window {
                    InstallMode::NewWindow
                } else {
                    InstallMode::Inline
                },
            },
        }
    }
}
