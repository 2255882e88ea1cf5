//! Annotated job description skeleton written by `create-template`.

/// Extension every template path must carry.
pub const TEMPLATE_EXTENSION: &str = ".yaml";

/// The template document.
pub const TEMPLATE: &str = r#"backup:
  # Files and folders to back up. %NAME% placeholders are expanded from the
  # environment before use.
  paths:
    - D:\data # a folder
    - F:\importantText.txt # a single file
    - "%LOCALAPPDATA%\\app" # quote entries that start with a placeholder
    - C:\Users\%USERNAME%\Saved Games

  # Backups are copied into (and restored from) this folder
  target: F:\backup

# Environment variables to set
environmentVariables:
  - key: ANDROID_HOME
    value: F:\Android\Sdk
    scope: User # or Machine (needs an elevated terminal)

  # PATH entries are appended to the existing value
  - key: PATH
    value: F:\Android\Sdk\platform-tools
    scope: User

# Packages installed with Chocolatey
packages:
  # --- BROWSERS ---
  - googlechrome

  # --- PROGRAMS ---
  # - vlc

  # --- GAMING ---
  # - steam --new-window # installs in a separate elevated window

  # --- MEDIA ---

  # --- DRIVERS ---

  # --- TOOLS ---
  # - name: git
  #   args: ["--params", "/NoShellIntegration"]

  # --- DEV ---
  # - name: visualstudio2022community
  #   newWindow: true

# Scripts run one after another, in this order
scripts:
  # cmd, single line
  - echo "Hello World!"

  # cmd, folded over several lines
  - >
    echo "Hello World!"
    && echo "What's up?"

  # a leading "powershell" runs the rest with PowerShell
  - powershell Write-Output "Hello World!"

  # PowerShell, folded over several lines
  - >
    powershell $name = "David";
    Write-Output "Hello $name!";

  # mapping form
  - run: Get-Date
    shell: powershell
"#;

/// Whether `path` names a file the template may be written to.
#[must_use]
pub fn is_template_path(path: &str) -> bool {
    path.trim().ends_with(TEMPLATE_EXTENSION)
}
