//! Acquiring job input: a supplied value, or one asked for, with a single
//! retry when the value is rejected.
use std::path::PathBuf;

use super::Context;
use crate::config::{self, JobConfig};
use crate::error::{ConfigError, JobError};
use crate::resources::paths::{clean_input_path, expand_placeholders, path_exists};

/// A question asked when a value is missing or rejected.
#[derive(Debug, Clone, Copy)]
pub struct Question<'a> {
    /// Prompt title.
    pub title: &'a str,
    /// Example value shown next to the title.
    pub placeholder: &'a str,
    /// Warning logged before asking again.
    pub rejected: &'a str,
}

fn ask(ctx: &Context, question: &Question<'_>) -> Result<String, JobError> {
    ctx.prompt
        .input(question.title, question.placeholder)?
        .ok_or(JobError::UserCancelled)
}

/// Take `supplied` or ask for a value until `accept` passes, asking again
/// at most once after a rejection.
///
/// Returns `Ok(Err(last))` with the last rejected value when the retry is
/// rejected too.
///
/// # Errors
///
/// Returns [`JobError::UserCancelled`] when a prompt is cancelled.
pub fn with_one_retry<F>(
    ctx: &Context,
    supplied: Option<&str>,
    question: &Question<'_>,
    accept: F,
) -> Result<Result<String, String>, JobError>
where
    F: Fn(&str) -> bool,
{
    let first = match supplied {
        Some(value) => value.to_string(),
        None => ask(ctx, question)?,
    };
    if accept(&first) {
        return Ok(Ok(first));
    }
    ctx.log.warn(question.rejected);
    let retry = ask(ctx, question)?;
    Ok(if accept(&retry) { Ok(retry) } else { Err(retry) })
}

/// Locate the job description: `supplied`, or asked for.
///
/// Paths are cleaned of surrounding quotes and have placeholders expanded.
///
/// # Errors
///
/// Returns [`JobError::UserCancelled`] when the prompt is cancelled and
/// [`ConfigError::NotFound`] when the retry also names a missing file.
pub fn config_path(ctx: &Context, supplied: Option<&str>) -> Result<PathBuf, JobError> {
    let resolve = |raw: &str| expand_placeholders(&clean_input_path(raw));
    let question = Question {
        title: "Path of the config file",
        placeholder: r"C:\Users\me\win-tools.yaml",
        rejected: "that file does not exist",
    };
    match with_one_retry(ctx, supplied, &question, |raw| path_exists(&resolve(raw)))? {
        Ok(raw) => Ok(PathBuf::from(resolve(&raw))),
        Err(raw) => Err(ConfigError::NotFound(PathBuf::from(resolve(&raw))).into()),
    }
}

/// Locate, load and validate the job description, logging any warnings.
///
/// # Errors
///
/// Returns [`JobError::ConfigInvalid`] if the file is missing, unreadable or
/// malformed, and [`JobError::UserCancelled`] if the prompt is cancelled.
pub fn load_config(ctx: &Context, supplied: Option<&str>) -> Result<JobConfig, JobError> {
    let path = config_path(ctx, supplied)?;
    ctx.log.info(&format!("using config {}", path.display()));
    let config = config::load(&path)?;
    for warning in config.validate() {
        ctx.log.warn(&format!(
            "{} ({}): {}",
            warning.section, warning.item, warning.message
        ));
    }
    Ok(config)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::jobs::test_helpers::TestContext;
    use crate::prompt::Answer;

    #[test]
    fn supplied_existing_path_is_used_without_prompting() {
        let t = TestContext::new();
        let path = t.write_config("packages: [git]\n");
        let found = config_path(&t.ctx, Some(&path)).unwrap();
        assert_eq!(found, PathBuf::from(&path));
        assert!(t.prompt.asked().is_empty());
    }

    #[test]
    fn quoted_answer_is_cleaned() {
        let t = TestContext::new();
        let real = t.write_config("");
        let t = t.with_answers([Answer::Text(format!("\"{real}\"\n"))]);
        assert_eq!(config_path(&t.ctx, None).unwrap(), PathBuf::from(&real));
    }

    #[test]
    fn missing_supplied_path_is_asked_for_once() {
        let t = TestContext::new();
        let real = t.write_config("");
        let t = t.with_answers([Answer::Text(real.clone())]);
        let found = config_path(&t.ctx, Some("/no/such/file.yaml")).unwrap();
        assert_eq!(found, PathBuf::from(real));
        assert_eq!(t.prompt.asked().len(), 1);
    }

    #[test]
    fn second_missing_path_aborts() {
        let t = TestContext::new().with_answers([
            Answer::Text("/no/such/one.yaml".into()),
            Answer::Text("/no/such/two.yaml".into()),
            Answer::Text("/never/asked.yaml".into()),
        ]);
        let err = config_path(&t.ctx, None).unwrap_err();
        assert!(
            matches!(&err, JobError::ConfigInvalid(ConfigError::NotFound(p)) if p.ends_with("two.yaml")),
            "{err:?}"
        );
        assert_eq!(t.prompt.remaining(), 1, "never re-prompts more than once");
    }

    #[test]
    fn cancelled_prompt_is_user_cancelled() {
        let t = TestContext::new().with_answers([Answer::Cancel]);
        assert!(matches!(
            config_path(&t.ctx, None),
            Err(JobError::UserCancelled)
        ));
    }

    #[test]
    fn load_config_propagates_parse_errors() {
        let t = TestContext::new();
        let path = t.write_config("packages: {broken\n");
        let err = load_config(&t.ctx, Some(&path)).unwrap_err();
        assert!(matches!(err, JobError::ConfigInvalid(ConfigError::Parse { .. })));
    }

    #[test]
    fn with_one_retry_accepts_retry() {
        let t = TestContext::new().with_answers([Answer::Text("good".into())]);
        let question = Question {
            title: "value",
            placeholder: "",
            rejected: "bad value",
        };
        let value = with_one_retry(&t.ctx, Some("bad"), &question, |v| v == "good").unwrap();
        assert_eq!(value, Ok("good".to_string()));
    }
}
