//! Domain Types
//!
//! Rows of the three tables (`department`, `role`, `employee`), the joined
//! read views the menu displays, and the validated inputs the workflows hand
//! to the repository.

use serde::{Deserialize, Serialize};

/// The three entity tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Department,
    Role,
    Employee,
}

impl EntityKind {
    /// Singular, lowercase name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Department => "department",
            Self::Role => "role",
            Self::Employee => "employee",
        }
    }

    /// Singular name, capitalised for the start of a sentence
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::Department => "Department",
            Self::Role => "Role",
            Self::Employee => "Employee",
        }
    }

    /// Plural, lowercase name
    #[must_use]
    pub const fn plural(&self) -> &'static str {
        match self {
            Self::Department => "departments",
            Self::Role => "roles",
            Self::Employee => "employees",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A `department` row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Department {
    pub id: i64,
    pub name: String,
}

/// A `role` row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub id: i64,
    pub title: String,
    pub salary: f64,
    pub department_id: i64,
}

/// An `employee` row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub role_id: i64,
    pub manager_id: Option<i64>,
}

impl Employee {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A role joined with its department name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleView {
    pub id: i64,
    pub title: String,
    pub department: Option<String>,
    pub salary: f64,
    pub department_id: i64,
}

/// An employee joined with role, department and manager
///
/// Every joined column is optional: the view is built with outer joins so a
/// row is never dropped because a reference is missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeView {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub title: Option<String>,
    pub department: Option<String>,
    pub salary: Option<f64>,
    pub manager: Option<String>,
    pub role_id: i64,
    pub manager_id: Option<i64>,
}

impl EmployeeView {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Head count and payroll of one department
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentBudget {
    pub department_id: i64,
    pub name: String,
    pub employee_count: i64,
    pub total_salary: f64,
}

/// Which employees [`crate::repository::Repository::list_employees`] returns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmployeeFilter {
    All,
    ByManager(i64),
    ByDepartment(i64),
    ByRole(i64),
}

/// Validated input for a new role
#[derive(Debug, Clone, PartialEq)]
pub struct NewRole {
    pub title: String,
    pub salary: f64,
    pub department_id: i64,
}

/// Validated input for a new employee
#[derive(Debug, Clone, PartialEq)]
pub struct NewEmployee {
    pub first_name: String,
    pub last_name: String,
    pub role_id: i64,
    pub manager_id: Option<i64>,
}
