//! Menu Controller
//!
//! The top-level loop: ask for an action, run its workflow, render how it
//! ended, repeat until Exit.
//!
//! # Error Recovery
//! - Data errors (validation, duplicates, blocked deletes, database failures)
//!   are rendered and the loop continues
//! - Fatal errors ([`RosterError::is_fatal`]) end the loop and are returned

use crate::engine::QueryExecutor;
use crate::error::{Result, RosterError};
use crate::form::{Field, FormCollector};
use crate::output::Renderer;
use crate::workflow::{Outcome, Session};

pub const WELCOME: &str = "Welcome to the Employee Management System!";
pub const GOODBYE: &str = "Goodbye!";

/// Entries of the main menu, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuAction {
    ViewDepartments,
    ViewRoles,
    ViewEmployees,
    ViewEmployeesByManager,
    ViewEmployeesByDepartment,
    ViewDepartmentBudget,
    AddDepartment,
    AddRole,
    AddEmployee,
    UpdateEmployeeRole,
    UpdateEmployeeManager,
    DeleteDepartment,
    DeleteRole,
    DeleteEmployee,
    Exit,
}

impl MenuAction {
    pub const ALL: [Self; 15] = [
        Self::ViewDepartments,
        Self::ViewRoles,
        Self::ViewEmployees,
        Self::ViewEmployeesByManager,
        Self::ViewEmployeesByDepartment,
        Self::ViewDepartmentBudget,
        Self::AddDepartment,
        Self::AddRole,
        Self::AddEmployee,
        Self::UpdateEmployeeRole,
        Self::UpdateEmployeeManager,
        Self::DeleteDepartment,
        Self::DeleteRole,
        Self::DeleteEmployee,
        Self::Exit,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ViewDepartments => "View All Departments",
            Self::ViewRoles => "View All Roles",
            Self::ViewEmployees => "View All Employees",
            Self::ViewEmployeesByManager => "View Employees by Manager",
            Self::ViewEmployeesByDepartment => "View Employees by Department",
            Self::ViewDepartmentBudget => "View Department Budget",
            Self::AddDepartment => "Add Department",
            Self::AddRole => "Add Role",
            Self::AddEmployee => "Add Employee",
            Self::UpdateEmployeeRole => "Update Employee Role",
            Self::UpdateEmployeeManager => "Update Employee Manager",
            Self::DeleteDepartment => "Delete Department",
            Self::DeleteRole => "Delete Role",
            Self::DeleteEmployee => "Delete Employee",
            Self::Exit => "Exit",
        }
    }

    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// The menu question
    #[must_use]
    pub fn field() -> Field {
        Field::select(
            "action",
            "What would you like to do?",
            Self::ALL.iter().map(|a| a.label().to_string()).collect(),
        )
    }
}

impl std::fmt::Display for MenuAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Run the workflow behind `action`
///
/// `Exit` has no workflow and ends as [`Outcome::Cancelled`].
pub async fn dispatch<E, F, R>(session: &mut Session<E, F, R>, action: MenuAction) -> Result<Outcome>
where
    E: QueryExecutor,
    F: FormCollector,
    R: Renderer,
{
    match action {
        MenuAction::ViewDepartments => session.view_departments().await,
        MenuAction::ViewRoles => session.view_roles().await,
        MenuAction::ViewEmployees => session.view_employees().await,
        MenuAction::ViewEmployeesByManager => session.view_employees_by_manager().await,
        MenuAction::ViewEmployeesByDepartment => session.view_employees_by_department().await,
        MenuAction::ViewDepartmentBudget => session.view_department_budget().await,
        MenuAction::AddDepartment => session.add_department().await,
        MenuAction::AddRole => session.add_role().await,
        MenuAction::AddEmployee => session.add_employee().await,
        MenuAction::UpdateEmployeeRole => session.update_employee_role().await,
        MenuAction::UpdateEmployeeManager => session.update_employee_manager().await,
        MenuAction::DeleteDepartment => session.delete_department().await,
        MenuAction::DeleteRole => session.delete_role().await,
        MenuAction::DeleteEmployee => session.delete_employee().await,
        MenuAction::Exit => Ok(Outcome::Cancelled),
    }
}

/// Loop over the menu until the user exits
///
/// Escaping the menu counts as Exit.
pub async fn run<E, F, R>(session: &mut Session<E, F, R>) -> Result<()>
where
    E: QueryExecutor,
    F: FormCollector,
    R: Renderer,
{
    session.renderer_mut().notice(WELCOME);
    let menu = MenuAction::field();

    loop {
        let action = match session.select(&menu)? {
            Some(index) => MenuAction::from_index(index).ok_or_else(|| {
                RosterError::prompt(format!("Menu has no entry at position {}", index + 1))
            })?,
            None => MenuAction::Exit,
        };
        if action == MenuAction::Exit {
            break;
        }

        tracing::debug!(%action, "menu selection");
        match dispatch(session, action).await {
            Ok(outcome) => render_outcome(session.renderer_mut(), &outcome),
            Err(err) if err.is_fatal() => return Err(err),
            Err(err) => {
                tracing::warn!(%action, code = err.error_code(), "{err}");
                session.renderer_mut().error(&err);
            }
        }
    }

    session.renderer_mut().notice(GOODBYE);
    Ok(())
}

fn render_outcome<R: Renderer>(out: &mut R, outcome: &Outcome) {
    match outcome {
        Outcome::Shown => {}
        Outcome::Committed(message) | Outcome::NothingToDo(message) => out.notice(message),
        Outcome::Cancelled => out.notice("Cancelled"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_order_and_labels() {
        let labels: Vec<_> = MenuAction::ALL.iter().map(|a| a.label()).collect();
        assert_eq!(
            labels,
            vec![
                "View All Departments",
                "View All Roles",
                "View All Employees",
                "View Employees by Manager",
                "View Employees by Department",
                "View Department Budget",
                "Add Department",
                "Add Role",
                "Add Employee",
                "Update Employee Role",
                "Update Employee Manager",
                "Delete Department",
                "Delete Role",
                "Delete Employee",
                "Exit",
            ]
        );
    }

    #[test]
    fn test_from_index() {
        assert_eq!(MenuAction::from_index(0), Some(MenuAction::ViewDepartments));
        assert_eq!(MenuAction::from_index(14), Some(MenuAction::Exit));
        assert_eq!(MenuAction::from_index(15), None);
    }

    #[test]
    fn test_menu_field_lists_every_action() {
        match MenuAction::field() {
            Field::Select { options, .. } => assert_eq!(options.len(), MenuAction::ALL.len()),
            other => panic!("unexpected field {other:?}"),
        }
    }
}
