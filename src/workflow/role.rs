use super::{Outcome, Session};
use crate::engine::QueryExecutor;
use crate::error::Result;
use crate::form::{Field, FormCollector};
use crate::model::{EmployeeFilter, EntityKind};
use crate::output::Renderer;
use crate::validation::{ensure_no_dependents, validate_new_role};

impl<E, F, R> Session<E, F, R>
where
    E: QueryExecutor,
    F: FormCollector,
    R: Renderer,
{
    /// Add a role to one of the existing departments
    pub async fn add_role(&mut self) -> Result<Outcome> {
        let departments = self.repo.list_departments().await?;
        if departments.is_empty() {
            return Ok(Outcome::NothingToDo(
                "There are no departments yet; create a department first".to_string(),
            ));
        }
        let roles = self.repo.list_roles(None).await?;

        let fields = [
            Field::text("title", "What is the name of the role?"),
            Field::text("salary", "What is the salary of the role?"),
            Field::select(
                "department",
                "Which department does the role belong to?",
                departments.iter().map(|d| d.name.clone()).collect(),
            ),
        ];

        let Some(new_role) = self.collect_valid(&fields, |a| {
            validate_new_role(
                a.text("title")?,
                a.text("salary")?,
                a.choice("department")?,
                &departments,
                &roles,
            )
        })?
        else {
            return Ok(Outcome::Cancelled);
        };

        let role = self.repo.create_role(&new_role).await?;
        Ok(Outcome::Committed(format!("Added {} to the database", role.title)))
    }

    /// Delete a role nobody holds
    pub async fn delete_role(&mut self) -> Result<Outcome> {
        let roles = self.repo.list_roles(None).await?;
        if roles.is_empty() {
            return Ok(Outcome::NothingToDo("There are no roles to delete".to_string()));
        }

        let Some(role) =
            self.choose(EntityKind::Role, "Which role do you want to delete?", &roles, |r| {
                r.title.clone()
            })?
        else {
            return Ok(Outcome::Cancelled);
        };

        let holders = self.repo.list_employees(EmployeeFilter::ByRole(role.id)).await?;
        ensure_no_dependents(
            EntityKind::Role,
            &role.title,
            EntityKind::Employee,
            holders.iter().map(|e| e.full_name()).collect(),
        )?;

        if !self.confirm(&format!("Delete role '{}'?", role.title))? {
            return Ok(Outcome::Cancelled);
        }

        let deleted = self.repo.delete_role(role.id).await?;
        tracing::info!(id = deleted.id, title = %deleted.title, "role deleted");
        Ok(Outcome::Committed(format!("Deleted role {}", deleted.title)))
    }
}
