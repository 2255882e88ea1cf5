//! Interactive questions asked by jobs when input is missing.
//!
//! Every method returns `Ok(None)` when the user cancels, so jobs can end
//! with [`crate::error::JobError::UserCancelled`] before touching anything.
use std::collections::VecDeque;
use std::io;
use std::sync::Mutex;

use anyhow::{Result, bail};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, MultiSelect, Select};

/// Source of answers for interactive questions.
pub trait Prompt: Send + Sync + std::fmt::Debug {
    /// Ask for a line of text. `placeholder` is shown as an example value.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be read.
    fn input(&self, title: &str, placeholder: &str) -> Result<Option<String>>;

    /// Ask a yes/no question.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be read.
    fn confirm(&self, title: &str) -> Result<Option<bool>>;

    /// Ask for a positive number, offering `default`.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be read.
    fn number(&self, title: &str, default: usize) -> Result<Option<usize>>;

    /// Pick one of `items`, returning its index.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be read.
    fn select(&self, title: &str, items: &[String]) -> Result<Option<usize>>;

    /// Pick any number of `items`, returning their indices in display order.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be read.
    fn multi_select(&self, title: &str, items: &[String]) -> Result<Option<Vec<usize>>>;
}

/// Terminal prompts rendered with `dialoguer`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompt;

/// Ctrl+C while reading a line surfaces as `Interrupted`; treat it as a cancel.
fn cancelled_on_interrupt<T>(result: dialoguer::Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(dialoguer::Error::IO(e)) if e.kind() == io::ErrorKind::Interrupted => Ok(None),
        Err(e) => Err(e.into()),
    }
}

impl Prompt for TerminalPrompt {
    fn input(&self, title: &str, placeholder: &str) -> Result<Option<String>> {
        let prompt = if placeholder.is_empty() {
            title.to_string()
        } else {
            format!("{title} (e.g. {placeholder})")
        };
        let answer = Input::<String>::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text();
        cancelled_on_interrupt(answer)
    }

    fn confirm(&self, title: &str) -> Result<Option<bool>> {
        Ok(Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(title)
            .default(true)
            .interact_opt()?)
    }

    fn number(&self, title: &str, default: usize) -> Result<Option<usize>> {
        let answer = Input::<usize>::with_theme(&ColorfulTheme::default())
            .with_prompt(title)
            .default(default)
            .validate_with(|n: &usize| if *n == 0 { Err("must be at least 1") } else { Ok(()) })
            .interact_text();
        cancelled_on_interrupt(answer)
    }

    fn select(&self, title: &str, items: &[String]) -> Result<Option<usize>> {
        Ok(Select::with_theme(&ColorfulTheme::default())
            .with_prompt(title)
            .items(items)
            .default(0)
            .interact_opt()?)
    }

    fn multi_select(&self, title: &str, items: &[String]) -> Result<Option<Vec<usize>>> {
        Ok(MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("{title} (space to toggle, enter to confirm)"))
            .items(items)
            .interact_opt()?)
    }
}

/// One queued answer for [`ScriptedPrompt`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// Reply to [`Prompt::input`].
    Text(String),
    /// Reply to [`Prompt::confirm`].
    Confirm(bool),
    /// Reply to [`Prompt::number`].
    Number(usize),
    /// Reply to [`Prompt::select`].
    Select(usize),
    /// Reply to [`Prompt::multi_select`].
    MultiSelect(Vec<usize>),
    /// Cancel whatever question comes next.
    Cancel,
}

/// Answers questions from a fixed queue, recording every title asked.
///
/// Asking more questions than were queued, or a question of a different
/// kind than the next answer, is an error.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: Mutex<VecDeque<Answer>>,
    asked: Mutex<Vec<String>>,
}

impl ScriptedPrompt {
    /// Prompt that replays `answers` in order.
    #[must_use]
    pub fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
        Self {
            answers: Mutex::new(answers.into_iter().collect()),
            asked: Mutex::default(),
        }
    }

    /// A prompt that must never be asked anything.
    #[must_use]
    pub fn silent() -> Self {
        Self::default()
    }

    /// Titles of the questions asked so far.
    #[must_use]
    pub fn asked(&self) -> Vec<String> {
        self.asked
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Number of queued answers not consumed yet.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.answers
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    fn next(&self, title: &str) -> Result<Answer> {
        self.asked
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(title.to_string());
        match self
            .answers
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .pop_front()
        {
            Some(answer) => Ok(answer),
            None => bail!("unexpected prompt: {title}"),
        }
    }
}

macro_rules! scripted {
    ($self:ident, $title:expr, $variant:ident) => {
        match $self.next($title)? {
            Answer::$variant(value) => Ok(Some(value)),
            Answer::Cancel => Ok(None),
            other => bail!(
                "prompt {:?} expected a {} answer, got {other:?}",
                $title,
                stringify!($variant)
            ),
        }
    };
}

impl Prompt for ScriptedPrompt {
    fn input(&self, title: &str, _placeholder: &str) -> Result<Option<String>> {
        scripted!(self, title, Text)
    }

    fn confirm(&self, title: &str) -> Result<Option<bool>> {
        scripted!(self, title, Confirm)
    }

    fn number(&self, title: &str, _default: usize) -> Result<Option<usize>> {
        scripted!(self, title, Number)
    }

    fn select(&self, title: &str, _items: &[String]) -> Result<Option<usize>> {
        scripted!(self, title, Select)
    }

    fn multi_select(&self, title: &str, _items: &[String]) -> Result<Option<Vec<usize>>> {
        scripted!(self, title, MultiSelect)
    }
}
