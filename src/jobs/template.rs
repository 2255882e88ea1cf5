//! `create-template`: write an annotated job description skeleton.

use anyhow::Context as _;

use super::acquire::{self, Question};
use super::{Context, Job};
use crate::config::template::{TEMPLATE, is_template_path};
use crate::error::JobError;
use crate::resources::paths::{PathKind, clean_input_path};

const SAVE_PATH: Question<'static> = Question {
    title: "Please enter a path to save the config file template",
    placeholder: r"Example: F:\config.yaml",
    rejected: "file extension must be .yaml",
};

/// Writes a commented example job description.
#[derive(Debug, Default)]
pub struct CreateTemplate {
    /// Destination given on the command line; must end with `.yaml`.
    pub save_path: Option<String>,
}

impl Job for CreateTemplate {
    fn name(&self) -> &'static str {
        "create-template"
    }

    fn run(&self, ctx: &Context) -> Result<(), JobError> {
        let raw = acquire::with_one_retry(ctx, self.save_path.as_deref(), &SAVE_PATH, |p| {
            is_template_path(&clean_input_path(p))
        })?
        .map_err(|p| JobError::InvalidInput(format!("{p}: file extension must be .yaml")))?;
        let path = ctx.resolve_path(&clean_input_path(&raw));

        if ctx.fs_ops.classify(&path) != PathKind::Missing {
            ctx.log
                .warn(&format!("{} already exists and will be replaced", path.display()));
        }
        if ctx.dry_run {
            ctx.log
                .dry_run(&format!("would write the template to {}", path.display()));
            return Ok(());
        }
        std::fs::write(&path, TEMPLATE)
            .with_context(|| format!("writing the template to {}", path.display()))?;
        ctx.log
            .info(&format!("config file template created at {}", path.display()));
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::config;
    use crate::jobs::test_helpers::TestContext;
    use crate::prompt::Answer;

    #[test]
    fn writes_loadable_template() {
        let t = TestContext::new();
        let path = t.assets.path().join("job.yaml");
        CreateTemplate {
            save_path: Some(path.display().to_string()),
        }
        .run(&t.ctx)
        .unwrap();
        let loaded = config::load(&path).unwrap();
        assert_eq!(loaded.backup.target, r"F:\backup");
        assert!(t.prompt.asked().is_empty());
    }

    #[test]
    fn wrong_extension_is_asked_again_once() {
        let t = TestContext::new();
        let good = t.assets.path().join("jobs.yaml");
        let t = t.with_answers([Answer::Text(format!("\"{}\"", good.display()))]);
        CreateTemplate {
            save_path: Some("jobs.yml".into()),
        }
        .run(&t.ctx)
        .unwrap();
        assert_eq!(t.prompt.asked().len(), 1);
        assert!(good.is_file());
    }

    #[test]
    fn second_wrong_extension_is_invalid_input() {
        let t = TestContext::new().with_answers([Answer::Text("jobs.txt".into())]);
        let err = CreateTemplate {
            save_path: Some("jobs.json".into()),
        }
        .run(&t.ctx)
        .unwrap_err();
        assert!(matches!(err, JobError::InvalidInput(ref m) if m.contains(".yaml")));
    }

    #[test]
    fn existing_file_is_replaced() {
        let t = TestContext::new();
        let path = t.write_config("packages: [git]\n");
        CreateTemplate {
            save_path: Some(path.clone()),
        }
        .run(&t.ctx)
        .unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), TEMPLATE);
    }

    #[test]
    fn dry_run_writes_nothing() {
        let t = TestContext::new().dry_run();
        let path = t.assets.path().join("job.yaml");
        CreateTemplate {
            save_path: Some(path.display().to_string()),
        }
        .run(&t.ctx)
        .unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn unwritable_destination_is_an_error() {
        let t = TestContext::new();
        let path = t.assets.path().join("missing-dir").join("job.yaml");
        let err = CreateTemplate {
            save_path: Some(path.display().to_string()),
        }
        .run(&t.ctx)
        .unwrap_err();
        assert!(matches!(err, JobError::Other(_)));
    }
}
