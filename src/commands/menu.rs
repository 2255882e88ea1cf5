//! Command picker shown when win-tools is started without a subcommand.
use crate::cli::{
    AutoLogonOpts, BloatOpts, Command, ConfigOpts, InstallOpts, RegistryOpts, TemplateOpts,
};
use crate::error::JobError;
use crate::prompt::Prompt;

/// Menu entries in display order.
fn entries() -> Vec<(&'static str, Command)> {
    vec![
        ("Backup", Command::Backup(ConfigOpts::default())),
        ("Restore", Command::Restore(ConfigOpts::default())),
        ("Chocolatey install", Command::ChocoInstall(InstallOpts::default())),
        ("Run scripts", Command::RunScripts(ConfigOpts::default())),
        ("Set environment variables", Command::SetEnvs(ConfigOpts::default())),
        ("Create config template", Command::CreateTemplate(TemplateOpts::default())),
        ("Set registry", Command::SetRegistry(RegistryOpts::default())),
        ("Clean start menu", Command::CleanMenu),
        ("Enable auto logon", Command::AutoLogon(AutoLogonOpts::default())),
        ("Disable Windows firewall", Command::DisableFirewall),
        ("Uninstall bloatware", Command::UninstallBloat(BloatOpts::default())),
    ]
}

/// Ask which command to run. Every option is left at its default, so the
/// chosen job asks for whatever it needs.
///
/// # Errors
///
/// Returns [`JobError::UserCancelled`] if the menu is dismissed.
pub fn choose(prompt: &dyn Prompt) -> Result<Command, JobError> {
    let entries = entries();
    let labels: Vec<String> = entries.iter().map(|(label, _)| (*label).to_string()).collect();
    let picked = prompt
        .select("What would you like to do?", &labels)?
        .ok_or(JobError::UserCancelled)?;
    entries
        .into_iter()
        .nth(picked)
        .map(|(_, command)| command)
        .ok_or_else(|| JobError::InvalidInput(format!("no menu entry {picked}")))
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::prompt::{Answer, ScriptedPrompt};

    #[test]
    fn picks_command_by_position() {
        let prompt = ScriptedPrompt::new([Answer::Select(2)]);
        let command = choose(&prompt).unwrap();
        assert_eq!(command.name(), "choco-install");
        assert_eq!(prompt.asked(), ["What would you like to do?"]);
    }

    #[test]
    fn every_job_is_offered_once() {
        let names: Vec<&str> = entries().iter().map(|(_, c)| c.name()).collect();
        assert_eq!(names.len(), 11);
        let mut unique = names.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), names.len());
        assert!(!names.contains(&"completions"));
    }

    #[test]
    fn dismissed_menu_is_a_cancel() {
        let prompt = ScriptedPrompt::new([Answer::Cancel]);
        assert!(matches!(choose(&prompt), Err(JobError::UserCancelled)));
    }

    #[test]
    fn out_of_range_answer_is_rejected() {
        let prompt = ScriptedPrompt::new([Answer::Select(40)]);
        assert!(matches!(choose(&prompt), Err(JobError::InvalidInput(_))));
    }
}
