//! Read-only workflows

use super::{Outcome, Session};
use crate::engine::QueryExecutor;
use crate::error::Result;
use crate::form::FormCollector;
use crate::model::{EmployeeFilter, EntityKind};
use crate::output::{Renderer, Table};

impl<E, F, R> Session<E, F, R>
where
    E: QueryExecutor,
    F: FormCollector,
    R: Renderer,
{
    pub async fn view_departments(&mut self) -> Result<Outcome> {
        let departments = self.repo.list_departments().await?;
        Ok(self.show(&departments, "There are no departments yet"))
    }

    pub async fn view_roles(&mut self) -> Result<Outcome> {
        let roles = self.repo.list_roles(None).await?;
        Ok(self.show(&roles, "There are no roles yet"))
    }

    pub async fn view_employees(&mut self) -> Result<Outcome> {
        let employees = self.repo.list_employees(EmployeeFilter::All).await?;
        Ok(self.show(&employees, "There are no employees yet"))
    }

    /// Direct reports of the chosen employee
    pub async fn view_employees_by_manager(&mut self) -> Result<Outcome> {
        let employees = self.repo.list_employees(EmployeeFilter::All).await?;
        if employees.is_empty() {
            return Ok(Outcome::NothingToDo("There are no employees yet".to_string()));
        }

        let Some(manager) = self.choose(
            EntityKind::Employee,
            "Whose direct reports do you want to see?",
            &employees,
            |e| e.full_name(),
        )?
        else {
            return Ok(Outcome::Cancelled);
        };

        let reports = self.repo.list_employees(EmployeeFilter::ByManager(manager.id)).await?;
        Ok(self.show(&reports, format!("{} has no direct reports", manager.full_name())))
    }

    /// Employees holding any role of the chosen department
    pub async fn view_employees_by_department(&mut self) -> Result<Outcome> {
        let departments = self.repo.list_departments().await?;
        if departments.is_empty() {
            return Ok(Outcome::NothingToDo("There are no departments yet".to_string()));
        }

        let Some(department) = self.choose(
            EntityKind::Department,
            "Which department's employees do you want to see?",
            &departments,
            |d| d.name.clone(),
        )?
        else {
            return Ok(Outcome::Cancelled);
        };

        let staff = self.repo.list_employees(EmployeeFilter::ByDepartment(department.id)).await?;
        Ok(self.show(&staff, format!("Nobody works in {} yet", department.name)))
    }

    /// Head count and summed salaries of the chosen department
    pub async fn view_department_budget(&mut self) -> Result<Outcome> {
        let departments = self.repo.list_departments().await?;
        if departments.is_empty() {
            return Ok(Outcome::NothingToDo("There are no departments yet".to_string()));
        }

        let Some(department) = self.choose(
            EntityKind::Department,
            "Which department's budget do you want to see?",
            &departments,
            |d| d.name.clone(),
        )?
        else {
            return Ok(Outcome::Cancelled);
        };

        let budget = self.repo.department_budget(department.id).await?;
        self.out.table(&Table::from_rows(&[budget]));
        Ok(Outcome::Shown)
    }
}
