//! Form Collection
//!
//! Workflows describe what they need as a list of [`Field`]s and receive
//! [`Answers`] keyed by field name. [`DialoguerForm`] asks in the terminal;
//! any other [`FormCollector`] (e.g. a scripted one in tests) can stand in.
//!
//! A `None` answer means the user backed out (Esc / `q`); the whole form is
//! then cancelled.

use std::collections::HashMap;

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Select};

use crate::error::{Result, RosterError};

/// One question of a form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    /// Free text, returned raw (validation happens afterwards)
    ///
    /// The terminal form never cancels a text prompt.
    Text { key: &'static str, prompt: String },
    /// Pick one of `options`, answered with its index
    Select { key: &'static str, prompt: String, options: Vec<String> },
    /// Yes/no question
    Confirm { key: &'static str, prompt: String, default: bool },
}

impl Field {
    pub fn text(key: &'static str, prompt: impl Into<String>) -> Self {
        Self::Text { key, prompt: prompt.into() }
    }

    pub fn select(key: &'static str, prompt: impl Into<String>, options: Vec<String>) -> Self {
        Self::Select { key, prompt: prompt.into(), options }
    }

    pub fn confirm(key: &'static str, prompt: impl Into<String>, default: bool) -> Self {
        Self::Confirm { key, prompt: prompt.into(), default }
    }

    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Text { key, .. } | Self::Select { key, .. } | Self::Confirm { key, .. } => *key,
        }
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        match self {
            Self::Text { prompt, .. } | Self::Select { prompt, .. } | Self::Confirm { prompt, .. } => {
                prompt
            }
        }
    }
}

/// A typed answer to one [`Field`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Text(String),
    Choice(usize),
    Bool(bool),
}

/// Answers of a completed form, keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Answers {
    values: HashMap<&'static str, Answer>,
}

impl Answers {
    pub fn insert(&mut self, key: &'static str, answer: Answer) {
        self.values.insert(key, answer);
    }

    fn get(&self, key: &str) -> Result<&Answer> {
        self.values.get(key).ok_or_else(|| RosterError::prompt(format!("No answer for '{key}'")))
    }

    /// Text answer for `key`
    pub fn text(&self, key: &str) -> Result<&str> {
        match self.get(key)? {
            Answer::Text(text) => Ok(text),
            other => Err(RosterError::prompt(format!("Expected text for '{key}', got {other:?}"))),
        }
    }

    /// Selected index for `key`
    pub fn choice(&self, key: &str) -> Result<usize> {
        match self.get(key)? {
            Answer::Choice(index) => Ok(*index),
            other => {
                Err(RosterError::prompt(format!("Expected a choice for '{key}', got {other:?}")))
            }
        }
    }

    /// Yes/no answer for `key`
    pub fn flag(&self, key: &str) -> Result<bool> {
        match self.get(key)? {
            Answer::Bool(flag) => Ok(*flag),
            other => Err(RosterError::prompt(format!("Expected yes/no for '{key}', got {other:?}"))),
        }
    }
}

/// Source of answers for declarative forms
pub trait FormCollector {
    /// Ask one question; `Ok(None)` when the user backs out
    fn ask(&mut self, field: &Field) -> Result<Option<Answer>>;

    /// Ask every field in order; `Ok(None)` as soon as one is cancelled
    fn collect(&mut self, fields: &[Field]) -> Result<Option<Answers>> {
        let mut answers = Answers::default();
        for field in fields {
            match self.ask(field)? {
                Some(answer) => answers.insert(field.key(), answer),
                None => return Ok(None),
            }
        }
        Ok(Some(answers))
    }
}

/// Terminal prompts rendered with `dialoguer`
pub struct DialoguerForm {
    theme: ColorfulTheme,
}

impl DialoguerForm {
    #[must_use]
    pub fn new() -> Self {
        Self { theme: ColorfulTheme::default() }
    }
}

impl Default for DialoguerForm {
    fn default() -> Self {
        Self::new()
    }
}

impl FormCollector for DialoguerForm {
    fn ask(&mut self, field: &Field) -> Result<Option<Answer>> {
        let prompt_error = |e: dialoguer::Error| RosterError::prompt(e.to_string());

        match field {
            Field::Text { prompt, .. } => {
                let text: String = Input::with_theme(&self.theme)
                    .with_prompt(prompt.as_str())
                    .allow_empty(true)
                    .interact_text()
                    .map_err(prompt_error)?;
                Ok(Some(Answer::Text(text)))
            }
            Field::Select { prompt, options, .. } => {
                if options.is_empty() {
                    return Ok(None);
                }
                let choice = Select::with_theme(&self.theme)
                    .with_prompt(prompt.as_str())
                    .items(options.as_slice())
                    .default(0)
                    .interact_opt()
                    .map_err(prompt_error)?;
                Ok(choice.map(Answer::Choice))
            }
            Field::Confirm { prompt, default, .. } => {
                let confirmed = Confirm::with_theme(&self.theme)
                    .with_prompt(prompt.as_str())
                    .default(*default)
                    .interact_opt()
                    .map_err(prompt_error)?;
                Ok(confirmed.map(Answer::Bool))
            }
        }
    }
}
