//! Shared test doubles: a scripted form, a recording renderer, and an
//! in-memory database provisioned from the shipped schema.

#![allow(dead_code)]

use std::collections::VecDeque;

use roster::engine::sqlite::SqliteExecutor;
use roster::{
    Answer, Field, FormCollector, Renderer, Repository, RosterError, Session, Table,
};

pub const SCHEMA: &str = include_str!("../../db/schema.sqlite.sql");
pub const SEEDS: &str = include_str!("../../db/seeds.sql");

// ============================================================================
// Scripted form
// ============================================================================

/// Answers questions from a queue; `None` entries back out of the prompt
///
/// Running out of answers is a prompt failure, which ends the menu loop.
#[derive(Debug, Default)]
pub struct ScriptedForm {
    script: VecDeque<Option<Answer>>,
    pub asked: Vec<Field>,
}

impl ScriptedForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, text: &str) -> Self {
        self.script.push_back(Some(Answer::Text(text.to_string())));
        self
    }

    pub fn choice(mut self, index: usize) -> Self {
        self.script.push_back(Some(Answer::Choice(index)));
        self
    }

    pub fn yes(mut self) -> Self {
        self.script.push_back(Some(Answer::Bool(true)));
        self
    }

    pub fn no(mut self) -> Self {
        self.script.push_back(Some(Answer::Bool(false)));
        self
    }

    pub fn escape(mut self) -> Self {
        self.script.push_back(None);
        self
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }

    /// Options offered by the `n`th question, when it was a select
    pub fn options_of(&self, n: usize) -> Option<&[String]> {
        match self.asked.get(n)? {
            Field::Select { options, .. } => Some(options),
            _ => None,
        }
    }
}

impl FormCollector for ScriptedForm {
    fn ask(&mut self, field: &Field) -> roster::Result<Option<Answer>> {
        self.asked.push(field.clone());
        self.script.pop_front().ok_or_else(|| {
            RosterError::prompt(format!("script exhausted at '{}'", field.key()))
        })
    }
}

// ============================================================================
// Recording renderer
// ============================================================================

#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub tables: Vec<Table>,
    pub notices: Vec<String>,
    pub warnings: Vec<String>,
    pub errors: Vec<(&'static str, String)>,
}

impl RecordingRenderer {
    pub fn error_codes(&self) -> Vec<&'static str> {
        self.errors.iter().map(|(code, _)| *code).collect()
    }
}

impl Renderer for RecordingRenderer {
    fn table(&mut self, table: &Table) {
        self.tables.push(table.clone());
    }

    fn notice(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }

    fn warning(&mut self, message: &str) {
        self.warnings.push(message.to_string());
    }

    fn error(&mut self, error: &RosterError) {
        self.errors.push((error.error_code(), error.message()));
    }
}

// ============================================================================
// Database fixtures
// ============================================================================

pub type TestSession = Session<SqliteExecutor, ScriptedForm, RecordingRenderer>;

/// Empty in-memory database with the schema applied
pub fn empty_db() -> SqliteExecutor {
    let executor = SqliteExecutor::in_memory().expect("in-memory database");
    executor.execute_script(SCHEMA).expect("schema applies");
    executor
}

/// In-memory database with the schema and the sample rows
pub fn seeded_db() -> SqliteExecutor {
    let executor = empty_db();
    executor.execute_script(SEEDS).expect("seeds apply");
    executor
}

/// Sales / Rep (50000) / Ann Lee without a manager
pub fn sales_db() -> SqliteExecutor {
    let executor = empty_db();
    executor
        .execute_script(
            "INSERT INTO department (name) VALUES ('Sales');
             INSERT INTO role (title, salary, department_id) VALUES ('Rep', 50000, 1);
             INSERT INTO employee (first_name, last_name, role_id, manager_id)
             VALUES ('Ann', 'Lee', 1, NULL);",
        )
        .expect("fixture rows");
    executor
}

pub fn session(executor: SqliteExecutor, form: ScriptedForm) -> TestSession {
    Session::new(Repository::new(executor), form, RecordingRenderer::default())
}
