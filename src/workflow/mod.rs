//! Workflows
//!
//! A [`Session`] bundles the repository, the form collector and the renderer
//! that every menu workflow needs. The workflows themselves live in the
//! submodules, one per entity plus the read-only views.
//!
//! # Workflow Shape
//! 1. Re-read whatever the workflow needs (nothing is cached between runs)
//! 2. Collect raw answers, validate them against that snapshot, and offer
//!    another attempt while the input is malformed
//! 3. Run every pre-check, then at most one mutating statement
//!
//! Data errors abort the workflow and are reported by the menu; nothing has
//! been written when that happens.

mod department;
mod employee;
mod role;
mod view;

use crate::engine::QueryExecutor;
use crate::error::{Result, RosterError};
use crate::form::{Answer, Answers, Field, FormCollector};
use crate::model::EntityKind;
use crate::output::{Renderer, Table, Tabular};
use crate::repository::Repository;
use crate::validation::pick;

/// How a workflow ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Rows were rendered
    Shown,
    /// One mutation was applied
    Committed(String),
    /// The user backed out or declined the confirmation
    Cancelled,
    /// There was nothing to act on
    NothingToDo(String),
}

/// Everything a workflow talks to
pub struct Session<E, F, R> {
    repo: Repository<E>,
    form: F,
    out: R,
}

impl<E, F, R> Session<E, F, R> {
    pub const fn new(repo: Repository<E>, form: F, out: R) -> Self {
        Self { repo, form, out }
    }

    pub const fn repository(&self) -> &Repository<E> {
        &self.repo
    }

    pub const fn form(&self) -> &F {
        &self.form
    }

    pub const fn renderer(&self) -> &R {
        &self.out
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.out
    }
}

impl<E, F, R> Session<E, F, R>
where
    E: QueryExecutor,
    F: FormCollector,
    R: Renderer,
{
    /// Ask a select question; the chosen index, or `None` when the user backs out
    pub(crate) fn select(&mut self, field: &Field) -> Result<Option<usize>> {
        match self.form.ask(field)? {
            Some(Answer::Choice(index)) => Ok(Some(index)),
            Some(other) => Err(RosterError::prompt(format!("Expected a choice, got {other:?}"))),
            None => Ok(None),
        }
    }

    /// Let the user pick one of `items`; `None` when they back out
    fn choose<'a, T>(
        &mut self,
        kind: EntityKind,
        prompt: &str,
        items: &'a [T],
        label: impl Fn(&T) -> String,
    ) -> Result<Option<&'a T>> {
        let field = Field::select("choice", prompt, items.iter().map(label).collect());
        match self.select(&field)? {
            Some(index) => pick(items, index, kind).map(Some),
            None => Ok(None),
        }
    }

    /// Yes/no question defaulting to no; backing out counts as no
    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        self.yes_no(&Field::confirm("confirm", prompt, false))
    }

    /// Offer another attempt after invalid input; backing out counts as no
    fn retry(&mut self) -> Result<bool> {
        self.yes_no(&Field::confirm("retry", "Try again?", true))
    }

    fn yes_no(&mut self, field: &Field) -> Result<bool> {
        match self.form.ask(field)? {
            Some(Answer::Bool(yes)) => Ok(yes),
            Some(other) => Err(RosterError::prompt(format!("Expected yes/no, got {other:?}"))),
            None => Ok(false),
        }
    }

    /// Collect `fields` until `validate` accepts them
    ///
    /// Validation errors are shown as warnings and the user chooses between
    /// another attempt and giving up; any other error ends the workflow.
    /// Text prompts cannot be escaped, so declining the retry is how a
    /// text-only form is cancelled.
    fn collect_valid<T>(
        &mut self,
        fields: &[Field],
        validate: impl Fn(&Answers) -> Result<T>,
    ) -> Result<Option<T>> {
        loop {
            let Some(answers) = self.form.collect(fields)? else {
                return Ok(None);
            };
            match validate(&answers) {
                Ok(value) => return Ok(Some(value)),
                Err(err @ RosterError::Validation(_)) => {
                    tracing::debug!(%err, "re-prompting after invalid input");
                    self.out.warning(&err.message());
                    if !self.retry()? {
                        return Ok(None);
                    }
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Render `rows`, or `empty` as a notice when there are none
    fn show<T: Tabular>(&mut self, rows: &[T], empty: impl Into<String>) -> Outcome {
        if rows.is_empty() {
            return Outcome::NothingToDo(empty.into());
        }
        self.out.table(&Table::from_rows(rows));
        Outcome::Shown
    }
}
