use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// Top-level CLI entry point for the Windows administration toolkit.
#[derive(Parser, Debug)]
#[command(
    name = "win-tools",
    about = "Configuration-driven Windows administration toolkit",
    version = crate::VERSION
)]
pub struct Cli {
    /// Command to run; a menu is shown when omitted
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options accepted by every subcommand.
    #[command(flatten)]
    pub global: GlobalOpts,
}

impl Cli {
    /// Name used for the log file of this invocation.
    #[must_use]
    pub fn log_name(&self) -> &'static str {
        self.command.as_ref().map_or("win-tools", Command::name)
    }
}

/// Options shared across all subcommands.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Preview changes without applying
    #[arg(short = 'd', long, global = true)]
    pub dry_run: bool,

    /// Folder holding the bundled scripts and registry files
    #[arg(long, global = true, value_name = "DIR")]
    pub assets: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Copy the configured paths into the backup folder
    Backup(ConfigOpts),
    /// Copy backed up paths back to where they came from
    Restore(ConfigOpts),
    /// Install the configured packages with Chocolatey
    ChocoInstall(InstallOpts),
    /// Run the configured scripts in order
    RunScripts(ConfigOpts),
    /// Set the configured environment variables
    SetEnvs(ConfigOpts),
    /// Write an annotated config file to start from
    CreateTemplate(TemplateOpts),
    /// Import bundled registry tweaks
    SetRegistry(RegistryOpts),
    /// Remove every pinned icon from the start menu
    CleanMenu,
    /// Sign in automatically when the computer starts
    AutoLogon(AutoLogonOpts),
    /// Disable Windows firewall, Windows Defender and Windows Defender Cloud
    DisableFirewall,
    /// Uninstall bundled Microsoft applications
    UninstallBloat(BloatOpts),
    /// Print a shell completion script
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
    /// Print version information
    Version,
}

impl Command {
    /// Subcommand name as typed on the command line.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Backup(_) => "backup",
            Self::Restore(_) => "restore",
            Self::ChocoInstall(_) => "choco-install",
            Self::RunScripts(_) => "run-scripts",
            Self::SetEnvs(_) => "set-envs",
            Self::CreateTemplate(_) => "create-template",
            Self::SetRegistry(_) => "set-registry",
            Self::CleanMenu => "clean-menu",
            Self::AutoLogon(_) => "auto-logon",
            Self::DisableFirewall => "disable-firewall",
            Self::UninstallBloat(_) => "uninstall-bloat",
            Self::Completions { .. } => "completions",
            Self::Version => "version",
        }
    }
}

/// Options for subcommands driven by a config file.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigOpts {
    /// YAML config file; asked for when omitted
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<String>,
}

/// Options for the `choco-install` subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct InstallOpts {
    /// Config file selection.
    #[command(flatten)]
    pub config: ConfigOpts,

    /// Number of packages installed at once; asked for when omitted
    #[arg(short, long, value_parser = clap::value_parser!(u16).range(1..))]
    pub workers: Option<u16>,
}

/// Options for the `create-template` subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct TemplateOpts {
    /// Where to write the template (must end with .yaml)
    #[arg(short, long, value_name = "PATH")]
    pub save_path: Option<String>,
}

/// Options for the `set-registry` subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct RegistryOpts {
    /// Tweaks to import without asking, e.g. `DisableCopilot,EnableDarkMode`
    #[arg(long, value_delimiter = ',', value_name = "NAMES")]
    pub apply: Vec<String>,
}

/// Options for the `uninstall-bloat` subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct BloatOpts {
    /// Package ids to remove without asking, e.g. `Microsoft.BingNews`
    #[arg(long = "package", value_delimiter = ',', value_name = "IDS")]
    pub packages: Vec<String>,
}

/// Options for the `auto-logon` subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct AutoLogonOpts {
    /// The username of the user to automatically logon as
    #[arg(long)]
    pub username: Option<String>,

    /// The domain of the user to automatically logon as
    #[arg(long)]
    pub domain: Option<String>,

    /// The number of logons that auto logon will be enabled
    #[arg(long)]
    pub logon_count: Option<u32>,

    /// Remove the system banner to ensure interventionless logon
    #[arg(long)]
    pub remove_prompt: bool,

    /// Back up the current settings such as the banner text to this file
    #[arg(long, value_name = "PATH")]
    pub backup_file: Option<String>,
}

#[cfg(test)]
#[allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_opens_menu() {
        let cli = Cli::parse_from(["win-tools"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.log_name(), "win-tools");
    }

    #[test]
    fn parse_backup_with_config() {
        let cli = Cli::parse_from(["win-tools", "backup", "--config", r"F:\job.yaml"]);
        let Some(Command::Backup(opts)) = cli.command else {
            panic!("expected backup");
        };
        assert_eq!(opts.config.as_deref(), Some(r"F:\job.yaml"));
    }

    #[test]
    fn parse_choco_install_short_flags() {
        let cli = Cli::parse_from(["win-tools", "choco-install", "-c", "job.yaml", "-w", "6"]);
        let Some(Command::ChocoInstall(opts)) = cli.command else {
            panic!("expected choco-install");
        };
        assert_eq!(opts.config.config.as_deref(), Some("job.yaml"));
        assert_eq!(opts.workers, Some(6));
    }

    #[test]
    fn zero_workers_is_rejected() {
        assert!(Cli::try_parse_from(["win-tools", "choco-install", "-w", "0"]).is_err());
    }

    #[test]
    fn parse_registry_list() {
        let cli = Cli::parse_from(["win-tools", "set-registry", "--apply", "DisableCopilot,EnableDarkMode"]);
        let Some(Command::SetRegistry(opts)) = cli.command else {
            panic!("expected set-registry");
        };
        assert_eq!(opts.apply, ["DisableCopilot", "EnableDarkMode"]);
    }

    #[test]
    fn parse_bloat_packages() {
        let cli = Cli::parse_from([
            "win-tools",
            "uninstall-bloat",
            "--package",
            "Microsoft.BingNews,Microsoft.BingWeather",
        ]);
        let Some(Command::UninstallBloat(opts)) = cli.command else {
            panic!("expected uninstall-bloat");
        };
        assert_eq!(opts.packages.len(), 2);
    }

    #[test]
    fn parse_auto_logon() {
        let cli = Cli::parse_from([
            "win-tools",
            "auto-logon",
            "--username",
            "dana",
            "--logon-count",
            "2",
            "--remove-prompt",
        ]);
        let Some(Command::AutoLogon(opts)) = cli.command else {
            panic!("expected auto-logon");
        };
        assert_eq!(opts.username.as_deref(), Some("dana"));
        assert_eq!(opts.logon_count, Some(2));
        assert!(opts.remove_prompt);
        assert!(opts.domain.is_none());
    }

    #[test]
    fn parse_create_template_short() {
        let cli = Cli::parse_from(["win-tools", "create-template", "-s", "F:/job.yaml"]);
        assert!(matches!(cli.command, Some(Command::CreateTemplate(ref o)) if o.save_path.as_deref() == Some("F:/job.yaml")));
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["win-tools", "clean-menu", "-d", "-v", "--assets", "D:/assets"]);
        assert!(cli.global.dry_run);
        assert!(cli.verbose);
        assert_eq!(cli.global.assets, Some(PathBuf::from("D:/assets")));
        assert_eq!(cli.log_name(), "clean-menu");
    }

    #[test]
    fn parse_completions() {
        let cli = Cli::parse_from(["win-tools", "completions", "powershell"]);
        assert!(matches!(
            cli.command,
            Some(Command::Completions {
                shell: Shell::PowerShell
            })
        ));
    }

    #[test]
    fn every_subcommand_name_matches_clap() {
        let cmd = Cli::command();
        let names: Vec<&str> = cmd.get_subcommands().map(clap::Command::get_name).collect();
        for name in [
            "backup",
            "restore",
            "choco-install",
            "run-scripts",
            "set-envs",
            "create-template",
            "set-registry",
            "clean-menu",
            "auto-logon",
            "disable-firewall",
            "uninstall-bloat",
            "completions",
            "version",
        ] {
            assert!(names.contains(&name), "missing {name}");
        }
    }
}
