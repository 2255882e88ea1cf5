//! `set-envs`: persist the configured environment variables.
use super::{Context, Job, Outcome, Tally, acquire, require_elevation};
use crate::config::env_vars::Scope;
use crate::error::{ConfigError, JobError};
use crate::resources::env_var::{self, EnvChange};

/// Sets `environmentVariables` from the job description.
#[derive(Debug, Default)]
pub struct SetEnvs {
    /// Config path given on the command line.
    pub config: Option<String>,
}

impl Job for SetEnvs {
    fn name(&self) -> &'static str {
        "set-envs"
    }

    fn run(&self, ctx: &Context) -> Result<(), JobError> {
        let config = acquire::load_config(ctx, self.config.as_deref())?;
        let vars = &config.environment_variables;
        if vars.is_empty() {
            return Err(ConfigError::EmptySection("environment variables").into());
        }
        // Checked before any variable is written.
        if vars.iter().any(|v| v.scope == Scope::Machine) {
            require_elevation(ctx, "setting Machine environment variables")?;
        }

        let tally = Tally::new("environment variables");
        for var in vars {
            let name = format!("{} ({})", var.key, var.scope);
            if var.key.trim().is_empty() {
                tally.skip(ctx, &name, "empty key");
                continue;
            }
            let describe = if var.is_path() {
                format!("append {} to {} PATH", var.value, var.scope)
            } else {
                format!("set {}={}", var.key, var.value)
            };
            tally.attempt(ctx, &name, &describe, || {
                Ok(match env_var::apply(&ctx.shell, &*ctx.executor, var)? {
                    EnvChange::AlreadyPresent => Outcome::Skipped("already in PATH".to_string()),
                    EnvChange::Set => Outcome::Done,
                    EnvChange::Appended(entries) => {
                        Outcome::Changed(format!("appended {}", entries.join(";")))
                    }
                })
            });
        }
        if tally.succeeded() > 0 && !ctx.dry_run {
            ctx.log
                .info("open a new terminal to see the updated variables");
        }
        tally.finish()
    }
}
