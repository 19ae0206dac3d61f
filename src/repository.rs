//! Entity Repository
//!
//! Thin, parameterized data access for departments, roles and employees.
//! No business rules live here; the workflows decide what is allowed and the
//! repository only reports what the database says.
//!
//! Statements use `$n` placeholders and portable SQL (`||` concatenation,
//! `LEFT JOIN`, `RETURNING`) so the same text runs on `SQLite` and
//! `PostgreSQL`.

use crate::engine::{QueryExecutor, QueryResult, Record, SqlValue};
use crate::error::{Result, RosterError};
use crate::model::{
    Department, DepartmentBudget, Employee, EmployeeFilter, EmployeeView, EntityKind, NewEmployee,
    NewRole, Role, RoleView,
};

const SELECT_DEPARTMENTS: &str = "SELECT id, name FROM department ORDER BY id";

const SELECT_ROLES: &str = "
    SELECT r.id, r.title, d.name AS department, r.salary, r.department_id
    FROM role r
    LEFT JOIN department d ON r.department_id = d.id";

const SELECT_EMPLOYEES: &str = "
    SELECT
        e.id,
        e.first_name,
        e.last_name,
        r.title,
        d.name AS department,
        r.salary,
        m.first_name || ' ' || m.last_name AS manager,
        e.role_id,
        e.manager_id
    FROM employee e
    LEFT JOIN role r ON e.role_id = r.id
    LEFT JOIN department d ON r.department_id = d.id
    LEFT JOIN employee m ON e.manager_id = m.id";

const INSERT_DEPARTMENT: &str = "INSERT INTO department (name) VALUES ($1) RETURNING id, name";

const INSERT_ROLE: &str = "
    INSERT INTO role (title, salary, department_id)
    VALUES ($1, $2, $3)
    RETURNING id, title, salary, department_id";

const INSERT_EMPLOYEE: &str = "
    INSERT INTO employee (first_name, last_name, role_id, manager_id)
    VALUES ($1, $2, $3, $4)
    RETURNING id, first_name, last_name, role_id, manager_id";

const UPDATE_EMPLOYEE_ROLE: &str = "
    UPDATE employee SET role_id = $2 WHERE id = $1
    RETURNING id, first_name, last_name, role_id, manager_id";

const UPDATE_EMPLOYEE_MANAGER: &str = "
    UPDATE employee SET manager_id = $2 WHERE id = $1
    RETURNING id, first_name, last_name, role_id, manager_id";

const DELETE_DEPARTMENT: &str = "DELETE FROM department WHERE id = $1 RETURNING id, name";

const DELETE_ROLE: &str =
    "DELETE FROM role WHERE id = $1 RETURNING id, title, salary, department_id";

const DELETE_EMPLOYEE: &str = "
    DELETE FROM employee WHERE id = $1
    RETURNING id, first_name, last_name, role_id, manager_id";

// Outer joins keep departments without roles or employees; a role only
// contributes its salary once per employee holding it.
const DEPARTMENT_BUDGET: &str = "
    SELECT
        d.id,
        d.name,
        COUNT(e.id) AS employee_count,
        COALESCE(SUM(CASE WHEN e.id IS NOT NULL THEN r.salary END), 0) AS total_salary
    FROM department d
    LEFT JOIN role r ON r.department_id = d.id
    LEFT JOIN employee e ON e.role_id = r.id
    WHERE d.id = $1
    GROUP BY d.id, d.name";

/// Data access over a [`QueryExecutor`]
pub struct Repository<E> {
    executor: E,
}

impl<E: QueryExecutor> Repository<E> {
    pub const fn new(executor: E) -> Self {
        Self { executor }
    }

    async fn fetch(&self, sql: &str, params: &[SqlValue]) -> Result<QueryResult> {
        self.executor.query(sql, params).await
    }

    /// All departments, ordered by id
    pub async fn list_departments(&self) -> Result<Vec<Department>> {
        let result = self.fetch(SELECT_DEPARTMENTS, &[]).await?;
        result.records().map(|r| department_from(&r)).collect()
    }

    /// Roles joined with their department, optionally restricted to one department
    pub async fn list_roles(&self, department_id: Option<i64>) -> Result<Vec<RoleView>> {
        let result = match department_id {
            Some(id) => {
                let sql = format!("{SELECT_ROLES} WHERE r.department_id = $1 ORDER BY r.id");
                self.fetch(&sql, &[id.into()]).await?
            }
            None => self.fetch(&format!("{SELECT_ROLES} ORDER BY r.id"), &[]).await?,
        };

        result
            .records()
            .map(|r| {
                Ok(RoleView {
                    id: r.i64("id")?,
                    title: r.string("title")?,
                    department: r.opt_string("department")?,
                    salary: r.f64("salary")?,
                    department_id: r.i64("department_id")?,
                })
            })
            .collect()
    }

    /// Employees joined with role, department and manager
    pub async fn list_employees(&self, filter: EmployeeFilter) -> Result<Vec<EmployeeView>> {
        let (clause, params): (&str, Vec<SqlValue>) = match filter {
            EmployeeFilter::All => ("", Vec::new()),
            EmployeeFilter::ByManager(id) => (" WHERE e.manager_id = $1", vec![id.into()]),
            EmployeeFilter::ByDepartment(id) => (" WHERE r.department_id = $1", vec![id.into()]),
            EmployeeFilter::ByRole(id) => (" WHERE e.role_id = $1", vec![id.into()]),
        };
        let sql = format!("{SELECT_EMPLOYEES}{clause} ORDER BY e.id");
        let result = self.fetch(&sql, &params).await?;

        result
            .records()
            .map(|r| {
                Ok(EmployeeView {
                    id: r.i64("id")?,
                    first_name: r.string("first_name")?,
                    last_name: r.string("last_name")?,
                    title: r.opt_string("title")?,
                    department: r.opt_string("department")?,
                    salary: r.opt_f64("salary")?,
                    manager: r.opt_string("manager")?,
                    role_id: r.i64("role_id")?,
                    manager_id: r.opt_i64("manager_id")?,
                })
            })
            .collect()
    }

    pub async fn create_department(&self, name: &str) -> Result<Department> {
        let result = self.fetch(INSERT_DEPARTMENT, &[name.into()]).await?;
        let department = single(&result, EntityKind::Department, department_from)?;
        tracing::info!(id = department.id, name = %department.name, "department created");
        Ok(department)
    }

    pub async fn create_role(&self, role: &NewRole) -> Result<Role> {
        let params: [SqlValue; 3] =
            [role.title.as_str().into(), role.salary.into(), role.department_id.into()];
        let result = self.fetch(INSERT_ROLE, &params).await.map_err(|e| {
            reject_reference(e, EntityKind::Role, &role.title, "references a missing department")
        })?;
        let created = single(&result, EntityKind::Role, role_from)?;
        tracing::info!(id = created.id, title = %created.title, "role created");
        Ok(created)
    }

    pub async fn create_employee(&self, employee: &NewEmployee) -> Result<Employee> {
        let params: [SqlValue; 4] = [
            employee.first_name.as_str().into(),
            employee.last_name.as_str().into(),
            employee.role_id.into(),
            employee.manager_id.into(),
        ];
        let name = format!("{} {}", employee.first_name, employee.last_name);
        let result = self.fetch(INSERT_EMPLOYEE, &params).await.map_err(|e| {
            reject_reference(e, EntityKind::Employee, &name, "references a missing role or manager")
        })?;
        let created = single(&result, EntityKind::Employee, employee_from)?;
        tracing::info!(id = created.id, name = %created.full_name(), "employee created");
        Ok(created)
    }

    /// Reassign an employee's role; `NotFound` when the employee is gone
    pub async fn update_employee_role(&self, id: i64, role_id: i64) -> Result<Employee> {
        let result = self
            .fetch(UPDATE_EMPLOYEE_ROLE, &[id.into(), role_id.into()])
            .await
            .map_err(|e| {
                reject_reference(e, EntityKind::Employee, &format!("#{id}"), "references a missing role")
            })?;
        first_or_not_found(&result, EntityKind::Employee, id, employee_from)
    }

    /// Set or clear an employee's manager; `NotFound` when the employee is gone
    pub async fn update_employee_manager(
        &self,
        id: i64,
        manager_id: Option<i64>,
    ) -> Result<Employee> {
        let result = self
            .fetch(UPDATE_EMPLOYEE_MANAGER, &[id.into(), manager_id.into()])
            .await
            .map_err(|e| {
                reject_reference(
                    e,
                    EntityKind::Employee,
                    &format!("#{id}"),
                    "references a missing manager",
                )
            })?;
        first_or_not_found(&result, EntityKind::Employee, id, employee_from)
    }

    pub async fn delete_department(&self, id: i64) -> Result<Department> {
        let result = self.fetch(DELETE_DEPARTMENT, &[id.into()]).await.map_err(|e| {
            reject_reference(e, EntityKind::Department, &format!("#{id}"), "is still referenced by roles")
        })?;
        first_or_not_found(&result, EntityKind::Department, id, department_from)
    }

    pub async fn delete_role(&self, id: i64) -> Result<Role> {
        let result = self.fetch(DELETE_ROLE, &[id.into()]).await.map_err(|e| {
            reject_reference(e, EntityKind::Role, &format!("#{id}"), "is still referenced by employees")
        })?;
        first_or_not_found(&result, EntityKind::Role, id, role_from)
    }

    /// Delete an employee; the schema clears `manager_id` on their reports
    pub async fn delete_employee(&self, id: i64) -> Result<Employee> {
        let result = self.fetch(DELETE_EMPLOYEE, &[id.into()]).await.map_err(|e| {
            reject_reference(e, EntityKind::Employee, &format!("#{id}"), "is still referenced")
        })?;
        first_or_not_found(&result, EntityKind::Employee, id, employee_from)
    }

    /// Head count and summed salary of one department
    pub async fn department_budget(&self, department_id: i64) -> Result<DepartmentBudget> {
        let result = self.fetch(DEPARTMENT_BUDGET, &[department_id.into()]).await?;
        first_or_not_found(&result, EntityKind::Department, department_id, |r| {
            Ok(DepartmentBudget {
                department_id: r.i64("id")?,
                name: r.string("name")?,
                employee_count: r.i64("employee_count")?,
                total_salary: r.f64("total_salary")?,
            })
        })
    }
}

fn department_from(r: &Record<'_>) -> Result<Department> {
    Ok(Department { id: r.i64("id")?, name: r.string("name")? })
}

fn role_from(r: &Record<'_>) -> Result<Role> {
    Ok(Role {
        id: r.i64("id")?,
        title: r.string("title")?,
        salary: r.f64("salary")?,
        department_id: r.i64("department_id")?,
    })
}

fn employee_from(r: &Record<'_>) -> Result<Employee> {
    Ok(Employee {
        id: r.i64("id")?,
        first_name: r.string("first_name")?,
        last_name: r.string("last_name")?,
        role_id: r.i64("role_id")?,
        manager_id: r.opt_i64("manager_id")?,
    })
}

/// Decode the single row an INSERT ... RETURNING must produce
fn single<T>(
    result: &QueryResult,
    kind: EntityKind,
    decode: impl Fn(&Record<'_>) -> Result<T>,
) -> Result<T> {
    let record = result
        .first()
        .ok_or_else(|| RosterError::database(format!("Insert into {kind} returned no row")))?;
    decode(&record)
}

fn first_or_not_found<T>(
    result: &QueryResult,
    kind: EntityKind,
    id: i64,
    decode: impl Fn(&Record<'_>) -> Result<T>,
) -> Result<T> {
    match result.first() {
        Some(record) => decode(&record),
        None => Err(RosterError::not_found(kind, id)),
    }
}

/// Surface a driver's foreign key rejection as a constraint violation
fn reject_reference(err: RosterError, kind: EntityKind, target: &str, reason: &str) -> RosterError {
    match err {
        RosterError::ForeignKeyViolation(detail) => {
            tracing::warn!(%kind, subject = target, %detail, "database rejected statement");
            RosterError::constraint_violation(kind, target, reason)
        }
        other => other,
    }
}
