//! Tabular Output
//!
//! This module turns rows into text tables and defines the [`Renderer`]
//! that workflows write to.
//!
//! # Output Contract
//! - Tables and notices go to stdout
//! - Warnings and errors go to stderr
//! - An empty result is never printed as an empty table; workflows render a
//!   notice instead

use unicode_width::UnicodeWidthStr;

use crate::error::RosterError;
use crate::model::{Department, DepartmentBudget, EmployeeView, RoleView};

/// Column headers plus rows of already-formatted cells
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Build a table from any rows that know their columns
    #[must_use]
    pub fn from_rows<T: Tabular>(rows: &[T]) -> Self {
        Self {
            columns: T::headers().iter().map(|h| (*h).to_string()).collect(),
            rows: rows.iter().map(Tabular::cells).collect(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell at `row`, in the column named `column`
    #[must_use]
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let idx = self.columns.iter().position(|c| c == column)?;
        self.rows.get(row)?.get(idx).map(String::as_str)
    }
}

/// A row type that can be shown as a table
pub trait Tabular {
    fn headers() -> &'static [&'static str];
    fn cells(&self) -> Vec<String>;
}

impl Tabular for Department {
    fn headers() -> &'static [&'static str] {
        &["id", "name"]
    }

    fn cells(&self) -> Vec<String> {
        vec![self.id.to_string(), self.name.clone()]
    }
}

impl Tabular for RoleView {
    fn headers() -> &'static [&'static str] {
        &["id", "title", "department", "salary"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.title.clone(),
            self.department.clone().unwrap_or_default(),
            format_money(self.salary),
        ]
    }
}

impl Tabular for EmployeeView {
    fn headers() -> &'static [&'static str] {
        &["id", "first_name", "last_name", "title", "department", "salary", "manager"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.first_name.clone(),
            self.last_name.clone(),
            self.title.clone().unwrap_or_default(),
            self.department.clone().unwrap_or_default(),
            self.salary.map(format_money).unwrap_or_default(),
            self.manager.clone().unwrap_or_default(),
        ]
    }
}

impl Tabular for DepartmentBudget {
    fn headers() -> &'static [&'static str] {
        &["department", "employees", "total_salary"]
    }

    fn cells(&self) -> Vec<String> {
        vec![self.name.clone(), self.employee_count.to_string(), format_money(self.total_salary)]
    }
}

/// Two decimals, the way salaries are stored
#[must_use]
pub fn format_money(amount: f64) -> String {
    format!("{amount:.2}")
}

/// Render a table with ASCII borders, padding by display width
#[must_use]
pub fn render_table(table: &Table) -> String {
    let mut widths: Vec<usize> = table.columns.iter().map(|c| c.width()).collect();
    for row in &table.rows {
        for (idx, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(idx) {
                *width = (*width).max(cell.width());
            }
        }
    }

    let border = {
        let mut line = String::from("+");
        for width in &widths {
            line.push_str(&"-".repeat(width + 2));
            line.push('+');
        }
        line
    };

    let format_row = |cells: &[String]| {
        let mut line = String::from("|");
        for (idx, width) in widths.iter().enumerate() {
            let cell = cells.get(idx).map_or("", String::as_str);
            line.push(' ');
            line.push_str(cell);
            line.push_str(&" ".repeat(width - cell.width()));
            line.push_str(" |");
        }
        line
    };

    let mut out = Vec::with_capacity(table.rows.len() + 4);
    out.push(border.clone());
    out.push(format_row(&table.columns));
    out.push(border.clone());
    for row in &table.rows {
        out.push(format_row(row));
    }
    out.push(border);
    out.join("\n")
}

/// Where workflows send what the user should see
pub trait Renderer {
    fn table(&mut self, table: &Table);
    fn notice(&mut self, message: &str);
    fn warning(&mut self, message: &str);
    fn error(&mut self, error: &RosterError);
}

/// Renderer writing to the terminal
#[derive(Debug, Default)]
pub struct TerminalRenderer;

impl Renderer for TerminalRenderer {
    fn table(&mut self, table: &Table) {
        println!("{}", render_table(table));
    }

    fn notice(&mut self, message: &str) {
        println!("{message}");
    }

    fn warning(&mut self, message: &str) {
        eprintln!("Warning: {message}");
    }

    fn error(&mut self, error: &RosterError) {
        eprintln!("Error: {}", error.message());
    }
}
