//! Input Validation
//!
//! Pure functions that turn raw form answers into validated inputs, checked
//! against a snapshot the workflow fetched just before asking. Nothing here
//! touches the database or the terminal.
//!
//! Format problems are reported as [`RosterError::Validation`] so the
//! workflow can re-prompt; name collisions are [`RosterError::DuplicateName`]
//! and end the workflow.

use crate::error::{Result, RosterError};
use crate::model::{Department, EmployeeView, EntityKind, NewEmployee, NewRole, RoleView};

/// Highest accepted salary
pub const MAX_SALARY: f64 = 1_000_000_000.0;

/// Label of the "no manager" option, always offered first
pub const NO_MANAGER: &str = "None";

/// Trim a name and reject it when nothing is left
pub fn normalize_name(raw: &str, field: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(RosterError::validation(format!("{field} cannot be empty")));
    }
    Ok(trimmed.to_string())
}

/// Reject `candidate` when an existing name matches it case-insensitively
pub fn ensure_unique_name<'a>(
    kind: EntityKind,
    candidate: &str,
    existing: impl IntoIterator<Item = &'a str>,
) -> Result<()> {
    let wanted = candidate.trim().to_lowercase();
    if existing.into_iter().any(|name| name.trim().to_lowercase() == wanted) {
        return Err(RosterError::duplicate_name(kind, candidate.trim()));
    }
    Ok(())
}

/// Parse a salary: a finite number in `[0, MAX_SALARY]`
pub fn parse_salary(raw: &str) -> Result<f64> {
    let salary: f64 = raw
        .trim()
        .parse()
        .map_err(|_| RosterError::validation(format!("'{}' is not a valid number", raw.trim())))?;

    if !salary.is_finite() || !(0.0..=MAX_SALARY).contains(&salary) {
        return Err(RosterError::validation(format!(
            "Salary must be between 0 and {MAX_SALARY:.0}"
        )));
    }
    Ok(salary)
}

/// Resolve a selected index against the list it was chosen from
pub fn pick<T>(items: &[T], index: usize, kind: EntityKind) -> Result<&T> {
    items
        .get(index)
        .ok_or_else(|| RosterError::validation(format!("No {kind} at position {}", index + 1)))
}

/// Validate the name of a new department against the existing ones
pub fn validate_new_department(raw_name: &str, existing: &[Department]) -> Result<String> {
    let name = normalize_name(raw_name, "Department name")?;
    ensure_unique_name(EntityKind::Department, &name, existing.iter().map(|d| d.name.as_str()))?;
    Ok(name)
}

/// Validate a new role: title, salary, and the department picked from `departments`
pub fn validate_new_role(
    raw_title: &str,
    raw_salary: &str,
    department_index: usize,
    departments: &[Department],
    roles: &[RoleView],
) -> Result<NewRole> {
    let title = normalize_name(raw_title, "Role title")?;
    let salary = parse_salary(raw_salary)?;
    let department = pick(departments, department_index, EntityKind::Department)?;
    ensure_unique_name(EntityKind::Role, &title, roles.iter().map(|r| r.title.as_str()))?;

    Ok(NewRole { title, salary, department_id: department.id })
}

/// Validate a new employee
///
/// `manager_index` indexes [`manager_options`] built from `employees`:
/// `0` is the "None" sentinel, `n` is `employees[n - 1]`.
pub fn validate_new_employee(
    raw_first_name: &str,
    raw_last_name: &str,
    role_index: usize,
    manager_index: usize,
    roles: &[RoleView],
    employees: &[EmployeeView],
) -> Result<NewEmployee> {
    let first_name = normalize_name(raw_first_name, "First name")?;
    let last_name = normalize_name(raw_last_name, "Last name")?;
    let role = pick(roles, role_index, EntityKind::Role)?;
    let manager_id = manager_choice(manager_index, &employees.iter().collect::<Vec<_>>())?;

    Ok(NewEmployee { first_name, last_name, role_id: role.id, manager_id })
}

/// Employees that may manage `editing`: everyone except `editing` itself
///
/// Only direct self-management is excluded; a report of `editing` is still
/// offered.
#[must_use]
pub fn manager_candidates(employees: &[EmployeeView], editing: i64) -> Vec<&EmployeeView> {
    employees.iter().filter(|e| e.id != editing).collect()
}

/// Select labels for a manager prompt: "None" followed by each candidate
#[must_use]
pub fn manager_options(candidates: &[&EmployeeView]) -> Vec<String> {
    std::iter::once(NO_MANAGER.to_string())
        .chain(candidates.iter().map(|e| e.full_name()))
        .collect()
}

/// Map a manager selection back to an id; index 0 is "None"
pub fn manager_choice(index: usize, candidates: &[&EmployeeView]) -> Result<Option<i64>> {
    match index {
        0 => Ok(None),
        n => pick(candidates, n - 1, EntityKind::Employee).map(|e| Some(e.id)),
    }
}

/// Block a delete while dependent rows exist
pub fn ensure_no_dependents(
    kind: EntityKind,
    target: &str,
    dependent_kind: EntityKind,
    dependents: Vec<String>,
) -> Result<()> {
    if dependents.is_empty() {
        return Ok(());
    }
    Err(RosterError::blocked_by_dependents(kind, target, dependent_kind, dependents))
}
