//! Roster - Employee Management CLI
//!
//! Roster keeps a small organisational dataset (departments, roles,
//! employees) in a relational database and lets a user browse and change it
//! through a terminal menu.
//!
//! # Core Principles
//! - The database is the only store; every workflow re-reads what it needs
//! - Every pre-check runs before the single mutating statement of a workflow
//! - Destructive actions are blocked while dependents exist, then confirmed
//!
//! # Module Organization
//! - [`error`] - Error types and handling
//! - [`engine`] - Query executor trait and the `SQLite` / `PostgreSQL` drivers
//! - [`config`] - Connection profiles
//! - [`model`] - Entity rows and joined views
//! - [`repository`] - Parameterized data access
//! - [`validation`] - Pure input checks
//! - [`form`] - Declarative prompts
//! - [`output`] - Table rendering
//! - [`workflow`] - Menu workflows over a [`Session`]
//! - [`menu`] - The interaction loop

pub mod config;
pub mod engine;
pub mod error;
pub mod form;
pub mod menu;
pub mod model;
pub mod output;
pub mod repository;
pub mod validation;
pub mod workflow;

pub use config::{resolve_connection, RosterConfig, StoredConnection};
pub use engine::{ConnectionConfig, ConnectionInfo, DatabaseType, QueryExecutor, QueryResult, SqlValue};
pub use error::{Result, RosterError};
pub use form::{Answer, Answers, DialoguerForm, Field, FormCollector};
pub use menu::{run, MenuAction};
pub use model::{
    Department, DepartmentBudget, Employee, EmployeeFilter, EmployeeView, EntityKind, NewEmployee,
    NewRole, Role, RoleView,
};
pub use output::{Renderer, Table, Tabular, TerminalRenderer};
pub use repository::Repository;
pub use workflow::{Outcome, Session};
