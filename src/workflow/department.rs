use super::{Outcome, Session};
use crate::engine::QueryExecutor;
use crate::error::Result;
use crate::form::{Field, FormCollector};
use crate::model::EntityKind;
use crate::output::Renderer;
use crate::validation::{ensure_no_dependents, validate_new_department};

impl<E, F, R> Session<E, F, R>
where
    E: QueryExecutor,
    F: FormCollector,
    R: Renderer,
{
    pub async fn add_department(&mut self) -> Result<Outcome> {
        let existing = self.repo.list_departments().await?;
        let fields = [Field::text("name", "What is the name of the department?")];

        let Some(name) =
            self.collect_valid(&fields, |a| validate_new_department(a.text("name")?, &existing))?
        else {
            return Ok(Outcome::Cancelled);
        };

        let department = self.repo.create_department(&name).await?;
        Ok(Outcome::Committed(format!("Added {} to the database", department.name)))
    }

    /// Delete a department that no role references
    pub async fn delete_department(&mut self) -> Result<Outcome> {
        let departments = self.repo.list_departments().await?;
        if departments.is_empty() {
            return Ok(Outcome::NothingToDo("There are no departments to delete".to_string()));
        }

        let Some(department) = self.choose(
            EntityKind::Department,
            "Which department do you want to delete?",
            &departments,
            |d| d.name.clone(),
        )?
        else {
            return Ok(Outcome::Cancelled);
        };

        let roles = self.repo.list_roles(Some(department.id)).await?;
        ensure_no_dependents(
            EntityKind::Department,
            &department.name,
            EntityKind::Role,
            roles.into_iter().map(|r| r.title).collect(),
        )?;

        if !self.confirm(&format!("Delete department '{}'?", department.name))? {
            return Ok(Outcome::Cancelled);
        }

        let deleted = self.repo.delete_department(department.id).await?;
        tracing::info!(id = deleted.id, name = %deleted.name, "department deleted");
        Ok(Outcome::Committed(format!("Deleted department {}", deleted.name)))
    }
}
