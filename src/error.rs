//! Error Handling Infrastructure
//!
//! This module defines all error types used throughout Roster.
//! Every error maps to a stable error code and is recovered at the workflow
//! boundary, except the fatal ones (see [`RosterError::is_fatal`]).
//!
//! # Error Categories
//! - `Validation`: Empty or malformed input, re-prompted by the workflow
//! - `DuplicateName`: A department name or role title already exists
//! - `ConstraintViolation`: A mutation would break referential integrity
//! - `NotFound`: The target row vanished between listing and acting
//! - `Database`: Any other query failure, reported verbatim
//! - `ForeignKeyViolation`: Raw foreign key rejection from a driver
//! - `ConnectionFailed`: Database connection errors
//! - `Config`: Configuration file or connection profile errors
//! - `Prompt`: The terminal could not collect input

use thiserror::Error;

use crate::model::EntityKind;

/// Main error type for Roster operations
#[derive(Error, Debug)]
pub enum RosterError {
    /// Empty or malformed user input
    #[error("Invalid input: {0}")]
    Validation(String),

    /// A department or role with the same (case-insensitive) name exists
    #[error("A {kind} named '{name}' already exists")]
    DuplicateName { kind: EntityKind, name: String },

    /// A mutation was refused to keep references intact
    #[error("{} {} {reason}{}", .kind.title(), quote_target(.target), list_dependents(.dependents))]
    ConstraintViolation {
        kind: EntityKind,
        target: String,
        reason: String,
        dependents: Vec<String>,
    },

    /// The row no longer exists
    #[error("{} #{id} was not found", .kind.title())]
    NotFound { kind: EntityKind, id: i64 },

    /// Query execution failed
    #[error("Database error: {0}")]
    Database(String),

    /// The database rejected a statement because of a foreign key
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// Database connection failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Configuration error (file not found, invalid JSON, unknown profile, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Terminal input could not be read
    #[error("Prompt failed: {0}")]
    Prompt(String),
}

/// Names are quoted; `#id` references are shown as they are
fn quote_target(target: &str) -> String {
    if target.starts_with('#') {
        target.to_string()
    } else {
        format!("'{target}'")
    }
}

fn list_dependents(dependents: &[String]) -> String {
    if dependents.is_empty() {
        String::new()
    } else {
        format!(": {}", dependents.join(", "))
    }
}

impl RosterError {
    /// Convert error to a stable error code string
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::DuplicateName { .. } => "DUPLICATE_NAME",
            Self::ConstraintViolation { .. } => "CONSTRAINT_VIOLATION",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Database(_) => "DATABASE_ERROR",
            Self::ForeignKeyViolation(_) => "FOREIGN_KEY_VIOLATION",
            Self::ConnectionFailed(_) => "CONNECTION_FAILED",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Prompt(_) => "PROMPT_FAILED",
        }
    }

    /// Get human-readable error message
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Whether the menu loop must stop instead of returning to the menu
    ///
    /// Prompt failures mean the terminal is gone; looping would spin forever.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Prompt(_) | Self::ConnectionFailed(_) | Self::Config(_))
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a duplicate name error
    pub fn duplicate_name(kind: EntityKind, name: impl Into<String>) -> Self {
        Self::DuplicateName { kind, name: name.into() }
    }

    /// Create a constraint violation for a delete blocked by dependent rows
    pub fn blocked_by_dependents(
        kind: EntityKind,
        target: impl Into<String>,
        dependent_kind: EntityKind,
        dependents: Vec<String>,
    ) -> Self {
        Self::ConstraintViolation {
            kind,
            target: target.into(),
            reason: format!("cannot be deleted while {} reference it", dependent_kind.plural()),
            dependents,
        }
    }

    /// Create a constraint violation with a free-form reason
    pub fn constraint_violation(
        kind: EntityKind,
        target: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::ConstraintViolation {
            kind,
            target: target.into(),
            reason: reason.into(),
            dependents: Vec::new(),
        }
    }

    /// Create a not found error
    pub const fn not_found(kind: EntityKind, id: i64) -> Self {
        Self::NotFound { kind, id }
    }

    /// Create a database error
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database(message.into())
    }

    /// Create a foreign key violation error
    pub fn foreign_key_violation(message: impl Into<String>) -> Self {
        Self::ForeignKeyViolation(message.into())
    }

    /// Create a connection failed error
    pub fn connection_failed(message: impl Into<String>) -> Self {
        Self::ConnectionFailed(message.into())
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a prompt error
    pub fn prompt(message: impl Into<String>) -> Self {
        Self::Prompt(message.into())
    }
}

/// Result type alias for Roster operations
pub type Result<T> = std::result::Result<T, RosterError>;
