use super::{Outcome, Session};
use crate::engine::QueryExecutor;
use crate::error::Result;
use crate::form::{Field, FormCollector};
use crate::model::{EmployeeFilter, EntityKind};
use crate::output::Renderer;
use crate::validation::{manager_candidates, manager_choice, manager_options, validate_new_employee};

impl<E, F, R> Session<E, F, R>
where
    E: QueryExecutor,
    F: FormCollector,
    R: Renderer,
{
    /// Hire an employee into an existing role, optionally under a manager
    pub async fn add_employee(&mut self) -> Result<Outcome> {
        let roles = self.repo.list_roles(None).await?;
        if roles.is_empty() {
            return Ok(Outcome::NothingToDo("There are no roles yet; create a role first".to_string()));
        }
        let employees = self.repo.list_employees(EmployeeFilter::All).await?;
        let everyone: Vec<_> = employees.iter().collect();

        let fields = [
            Field::text("first_name", "What is the employee's first name?"),
            Field::text("last_name", "What is the employee's last name?"),
            Field::select(
                "role",
                "What is the employee's role?",
                roles.iter().map(|r| r.title.clone()).collect(),
            ),
            Field::select("manager", "Who is the employee's manager?", manager_options(&everyone)),
        ];

        let Some(hire) = self.collect_valid(&fields, |a| {
            validate_new_employee(
                a.text("first_name")?,
                a.text("last_name")?,
                a.choice("role")?,
                a.choice("manager")?,
                &roles,
                &employees,
            )
        })?
        else {
            return Ok(Outcome::Cancelled);
        };

        let employee = self.repo.create_employee(&hire).await?;
        Ok(Outcome::Committed(format!("Added {} to the database", employee.full_name())))
    }

    pub async fn update_employee_role(&mut self) -> Result<Outcome> {
        let employees = self.repo.list_employees(EmployeeFilter::All).await?;
        if employees.is_empty() {
            return Ok(Outcome::NothingToDo("There are no employees to update".to_string()));
        }
        let roles = self.repo.list_roles(None).await?;
        if roles.is_empty() {
            return Ok(Outcome::NothingToDo("There are no roles to assign".to_string()));
        }

        let Some(employee) = self.choose(
            EntityKind::Employee,
            "Which employee's role do you want to update?",
            &employees,
            |e| e.full_name(),
        )?
        else {
            return Ok(Outcome::Cancelled);
        };
        let Some(role) = self.choose(
            EntityKind::Role,
            "Which role do you want to assign to the selected employee?",
            &roles,
            |r| r.title.clone(),
        )?
        else {
            return Ok(Outcome::Cancelled);
        };

        let updated = self.repo.update_employee_role(employee.id, role.id).await?;
        tracing::info!(id = updated.id, role_id = role.id, "employee role updated");
        Ok(Outcome::Committed(format!("Updated {}'s role to {}", updated.full_name(), role.title)))
    }

    /// Set or clear a manager; an employee is never offered as their own manager
    pub async fn update_employee_manager(&mut self) -> Result<Outcome> {
        let employees = self.repo.list_employees(EmployeeFilter::All).await?;
        if employees.is_empty() {
            return Ok(Outcome::NothingToDo("There are no employees to update".to_string()));
        }

        let Some(employee) = self.choose(
            EntityKind::Employee,
            "Which employee's manager do you want to update?",
            &employees,
            |e| e.full_name(),
        )?
        else {
            return Ok(Outcome::Cancelled);
        };

        let candidates = manager_candidates(&employees, employee.id);
        let field = Field::select(
            "manager",
            format!("Who is {}'s new manager?", employee.full_name()),
            manager_options(&candidates),
        );
        let Some(index) = self.select(&field)? else {
            return Ok(Outcome::Cancelled);
        };
        let manager_id = manager_choice(index, &candidates)?;

        let updated = self.repo.update_employee_manager(employee.id, manager_id).await?;
        tracing::info!(id = updated.id, manager_id = ?manager_id, "employee manager updated");

        let message = match manager_id.and_then(|id| employees.iter().find(|e| e.id == id)) {
            Some(manager) => {
                format!("Updated {}'s manager to {}", updated.full_name(), manager.full_name())
            }
            None => format!("{} no longer has a manager", updated.full_name()),
        };
        Ok(Outcome::Committed(message))
    }

    /// Delete an employee; their direct reports lose their manager
    pub async fn delete_employee(&mut self) -> Result<Outcome> {
        let employees = self.repo.list_employees(EmployeeFilter::All).await?;
        if employees.is_empty() {
            return Ok(Outcome::NothingToDo("There are no employees to delete".to_string()));
        }

        let Some(employee) = self.choose(
            EntityKind::Employee,
            "Which employee do you want to delete?",
            &employees,
            |e| e.full_name(),
        )?
        else {
            return Ok(Outcome::Cancelled);
        };

        let reports = employees.iter().filter(|e| e.manager_id == Some(employee.id)).count();
        if reports > 0 {
            self.out.warning(&format!(
                "{} manages {reports} employee(s); they will be left without a manager",
                employee.full_name()
            ));
        }

        if !self.confirm(&format!("Delete employee '{}'?", employee.full_name()))? {
            return Ok(Outcome::Cancelled);
        }

        let deleted = self.repo.delete_employee(employee.id).await?;
        tracing::info!(id = deleted.id, reports, "employee deleted");
        Ok(Outcome::Committed(format!("Deleted employee {}", deleted.full_name())))
    }
}
