//! Workflow Tests
//!
//! Drives each workflow with a scripted form against an in-memory `SQLite`
//! database and checks both the outcome and what was (not) written.

#![cfg(feature = "sqlite")]

mod common;

use pretty_assertions::assert_eq;
use roster::{EmployeeFilter, EntityKind, Outcome, RosterError};

use common::{empty_db, sales_db, seeded_db, session, ScriptedForm};

// ============================================================================
// Departments
// ============================================================================

#[tokio::test]
async fn test_add_department() {
    let mut s = session(empty_db(), ScriptedForm::new().text("  Legal "));

    let outcome = s.add_department().await.unwrap();
    assert_eq!(outcome, Outcome::Committed("Added Legal to the database".to_string()));

    let names: Vec<_> =
        s.repository().list_departments().await.unwrap().into_iter().map(|d| d.name).collect();
    assert_eq!(names, vec!["Legal"]);
}

#[tokio::test]
async fn test_add_duplicate_department_case_insensitive() {
    let mut s = session(empty_db(), ScriptedForm::new().text("Engineering").text("engineering"));

    s.add_department().await.unwrap();
    let err = s.add_department().await.unwrap_err();
    assert!(matches!(err, RosterError::DuplicateName { kind: EntityKind::Department, .. }));

    let departments = s.repository().list_departments().await.unwrap();
    assert_eq!(departments.len(), 1);
    assert_eq!(departments[0].name, "Engineering");
}

#[tokio::test]
async fn test_add_department_reprompts_blank_name() {
    let mut s = session(empty_db(), ScriptedForm::new().text("   ").yes().text("Legal"));

    let outcome = s.add_department().await.unwrap();
    assert!(matches!(outcome, Outcome::Committed(_)));
    assert_eq!(s.renderer().warnings.len(), 1);
    assert!(s.renderer().warnings[0].contains("cannot be empty"));
    assert_eq!(s.form().asked.len(), 3);
    assert_eq!(s.form().asked[1].key(), "retry");
}

#[tokio::test]
async fn test_add_department_declining_retry_cancels() {
    let mut s = session(empty_db(), ScriptedForm::new().text("").no());

    assert_eq!(s.add_department().await.unwrap(), Outcome::Cancelled);
    assert_eq!(s.renderer().warnings.len(), 1);
    assert_eq!(s.form().remaining(), 0);
    assert!(s.repository().list_departments().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_escape_at_retry_cancels() {
    let mut s = session(sales_db(), ScriptedForm::new().text("Paralegal").text("-1").choice(0).escape());

    assert_eq!(s.add_role().await.unwrap(), Outcome::Cancelled);
    assert_eq!(s.repository().list_roles(None).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_add_department_escape() {
    let mut s = session(empty_db(), ScriptedForm::new().escape());
    assert_eq!(s.add_department().await.unwrap(), Outcome::Cancelled);
    assert!(s.repository().list_departments().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_department_blocked_by_roles() {
    let mut s = session(sales_db(), ScriptedForm::new().choice(0));

    let err = s.delete_department().await.unwrap_err();
    match &err {
        RosterError::ConstraintViolation { kind, target, dependents, .. } => {
            assert_eq!(*kind, EntityKind::Department);
            assert_eq!(target, "Sales");
            assert_eq!(dependents, &vec!["Rep".to_string()]);
        }
        other => panic!("unexpected error {other:?}"),
    }

    // blocked before the confirmation was asked
    assert_eq!(s.form().asked.len(), 1);
    assert_eq!(s.repository().list_departments().await.unwrap().len(), 1);
    assert_eq!(s.repository().list_roles(None).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_delete_department_requires_confirmation() {
    let mut s = session(empty_db(), ScriptedForm::new().text("Legal").choice(0).no().choice(0).yes());
    s.add_department().await.unwrap();

    assert_eq!(s.delete_department().await.unwrap(), Outcome::Cancelled);
    assert_eq!(s.repository().list_departments().await.unwrap().len(), 1);

    let outcome = s.delete_department().await.unwrap();
    assert_eq!(outcome, Outcome::Committed("Deleted department Legal".to_string()));
    assert!(s.repository().list_departments().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_department_when_none_exist() {
    let mut s = session(empty_db(), ScriptedForm::new());
    assert!(matches!(s.delete_department().await.unwrap(), Outcome::NothingToDo(_)));
    assert!(s.form().asked.is_empty());
}

// ============================================================================
// Roles
// ============================================================================

#[tokio::test]
async fn test_add_role_needs_a_department() {
    let mut s = session(empty_db(), ScriptedForm::new());
    match s.add_role().await.unwrap() {
        Outcome::NothingToDo(message) => assert!(message.contains("create a department first")),
        other => panic!("unexpected outcome {other:?}"),
    }
    assert!(s.form().asked.is_empty());
}

#[tokio::test]
async fn test_add_role_reprompts_bad_salary() {
    let mut s = session(
        seeded_db(),
        ScriptedForm::new()
            .text("Paralegal")
            .text("lots")
            .choice(2)
            .yes()
            .text("Paralegal")
            .text("65000")
            .choice(2),
    );

    let outcome = s.add_role().await.unwrap();
    assert_eq!(outcome, Outcome::Committed("Added Paralegal to the database".to_string()));
    assert_eq!(s.renderer().warnings.len(), 1);

    let legal = s.repository().list_roles(Some(3)).await.unwrap();
    let paralegal = legal.iter().find(|r| r.title == "Paralegal").unwrap();
    assert_eq!(paralegal.salary, 65000.0);
    assert_eq!(paralegal.department.as_deref(), Some("Legal"));
}

#[tokio::test]
async fn test_add_role_rejects_duplicate_title() {
    let mut s = session(sales_db(), ScriptedForm::new().text("rep").text("1").choice(0));

    let err = s.add_role().await.unwrap_err();
    assert!(matches!(err, RosterError::DuplicateName { kind: EntityKind::Role, .. }));
    assert_eq!(s.repository().list_roles(None).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_add_role_offers_live_departments() {
    let mut s = session(seeded_db(), ScriptedForm::new().escape());
    s.add_role().await.unwrap();
    // the form stops at the first field, so only the title was asked
    assert_eq!(s.form().asked.len(), 1);

    let mut s = session(seeded_db(), ScriptedForm::new().text("Clerk").text("1").escape());
    assert_eq!(s.add_role().await.unwrap(), Outcome::Cancelled);
    assert_eq!(
        s.form().options_of(2).unwrap(),
        &["Engineering", "Finance", "Legal", "Sales"]
    );
}

#[tokio::test]
async fn test_delete_role_blocked_by_employee() {
    let mut s = session(sales_db(), ScriptedForm::new().choice(0));

    let err = s.delete_role().await.unwrap_err();
    assert!(matches!(
        &err,
        RosterError::ConstraintViolation { dependents, .. } if dependents == &["Ann Lee"]
    ));
    assert!(err.message().contains("Ann Lee"));
    assert_eq!(s.repository().list_roles(None).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_delete_vacant_role() {
    let mut s = session(
        sales_db(),
        ScriptedForm::new().text("Intern").text("0").choice(0).choice(1).yes(),
    );
    s.add_role().await.unwrap();

    let outcome = s.delete_role().await.unwrap();
    assert_eq!(outcome, Outcome::Committed("Deleted role Intern".to_string()));

    let titles: Vec<_> =
        s.repository().list_roles(None).await.unwrap().into_iter().map(|r| r.title).collect();
    assert_eq!(titles, vec!["Rep"]);
}

// ============================================================================
// Employees
// ============================================================================

#[tokio::test]
async fn test_add_employee_needs_a_role() {
    let mut s = session(empty_db(), ScriptedForm::new());
    match s.add_employee().await.unwrap() {
        Outcome::NothingToDo(message) => assert!(message.contains("create a role first")),
        other => panic!("unexpected outcome {other:?}"),
    }
}

#[tokio::test]
async fn test_add_employee_under_manager() {
    let mut s = session(
        sales_db(),
        ScriptedForm::new().text("Bo").text("Chen").choice(0).choice(1),
    );

    let outcome = s.add_employee().await.unwrap();
    assert_eq!(outcome, Outcome::Committed("Added Bo Chen to the database".to_string()));
    assert_eq!(s.form().options_of(3).unwrap(), &["None", "Ann Lee"]);

    let reports = s.repository().list_employees(EmployeeFilter::ByManager(1)).await.unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].full_name(), "Bo Chen");
}

#[tokio::test]
async fn test_add_employee_reprompts_blank_last_name() {
    let mut s = session(
        sales_db(),
        ScriptedForm::new()
            .text("Bo")
            .text("")
            .choice(0)
            .choice(0)
            .yes()
            .text("Bo")
            .text("Chen")
            .choice(0)
            .choice(0),
    );

    assert!(matches!(s.add_employee().await.unwrap(), Outcome::Committed(_)));
    assert_eq!(s.renderer().warnings.len(), 1);
    assert!(s.renderer().warnings[0].contains("Last name"));

    let bo = s.repository().list_employees(EmployeeFilter::All).await.unwrap().pop().unwrap();
    assert_eq!(bo.manager_id, None);
}

#[tokio::test]
async fn test_update_employee_role() {
    let mut s = session(seeded_db(), ScriptedForm::new().choice(1).choice(2));

    let outcome = s.update_employee_role().await.unwrap();
    assert_eq!(
        outcome,
        Outcome::Committed("Updated Mike Chan's role to Lead Engineer".to_string())
    );

    let engineering =
        s.repository().list_employees(EmployeeFilter::ByDepartment(1)).await.unwrap();
    assert!(engineering.iter().any(|e| e.full_name() == "Mike Chan"));
}

#[tokio::test]
async fn test_update_role_with_nothing_to_update() {
    let mut s = session(empty_db(), ScriptedForm::new());
    assert!(matches!(s.update_employee_role().await.unwrap(), Outcome::NothingToDo(_)));
}

#[tokio::test]
async fn test_manager_candidates_never_include_the_employee() {
    let mut s = session(seeded_db(), ScriptedForm::new().choice(1).choice(3));

    let outcome = s.update_employee_manager().await.unwrap();
    assert_eq!(
        outcome,
        Outcome::Committed("Updated Mike Chan's manager to Kevin Tupik".to_string())
    );

    let options = s.form().options_of(1).unwrap();
    assert_eq!(options.len(), 8);
    assert_eq!(options[0], "None");
    assert!(!options.iter().any(|o| o == "Mike Chan"));

    let mike = s.repository().list_employees(EmployeeFilter::ByManager(4)).await.unwrap();
    assert_eq!(mike[0].full_name(), "Mike Chan");
}

#[tokio::test]
async fn test_clear_manager() {
    let mut s = session(seeded_db(), ScriptedForm::new().choice(1).choice(0));

    let outcome = s.update_employee_manager().await.unwrap();
    assert_eq!(outcome, Outcome::Committed("Mike Chan no longer has a manager".to_string()));
    assert!(s.repository().list_employees(EmployeeFilter::ByManager(1)).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_only_employee_can_only_have_no_manager() {
    let mut s = session(sales_db(), ScriptedForm::new().choice(0).choice(0));
    s.update_employee_manager().await.unwrap();
    assert_eq!(s.form().options_of(1).unwrap(), &["None"]);
}

#[tokio::test]
async fn test_delete_manager_warns_and_clears_reports() {
    let mut s = session(seeded_db(), ScriptedForm::new().choice(0).yes());

    let outcome = s.delete_employee().await.unwrap();
    assert_eq!(outcome, Outcome::Committed("Deleted employee John Doe".to_string()));

    assert_eq!(s.renderer().warnings.len(), 1);
    assert!(s.renderer().warnings[0].contains("manages 1 employee(s)"));

    let employees = s.repository().list_employees(EmployeeFilter::All).await.unwrap();
    assert_eq!(employees.len(), 7);
    let mike = employees.iter().find(|e| e.full_name() == "Mike Chan").unwrap();
    assert_eq!(mike.manager_id, None);
}

#[tokio::test]
async fn test_delete_employee_declined() {
    let mut s = session(sales_db(), ScriptedForm::new().choice(0).escape());

    assert_eq!(s.delete_employee().await.unwrap(), Outcome::Cancelled);
    assert!(s.renderer().warnings.is_empty());
    assert_eq!(s.repository().list_employees(EmployeeFilter::All).await.unwrap().len(), 1);
}

// ============================================================================
// Views
// ============================================================================

#[tokio::test]
async fn test_view_employees_with_missing_manager() {
    let mut s = session(sales_db(), ScriptedForm::new());

    assert_eq!(s.view_employees().await.unwrap(), Outcome::Shown);

    let tables = &s.renderer().tables;
    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0].rows.len(), 1);
    assert_eq!(tables[0].cell(0, "first_name"), Some("Ann"));
    assert_eq!(tables[0].cell(0, "title"), Some("Rep"));
    assert_eq!(tables[0].cell(0, "department"), Some("Sales"));
    assert_eq!(tables[0].cell(0, "manager"), Some(""));
}

#[tokio::test]
async fn test_empty_views_render_nothing() {
    let mut s = session(empty_db(), ScriptedForm::new());

    assert!(matches!(s.view_departments().await.unwrap(), Outcome::NothingToDo(_)));
    assert!(matches!(s.view_roles().await.unwrap(), Outcome::NothingToDo(_)));
    assert!(matches!(s.view_employees().await.unwrap(), Outcome::NothingToDo(_)));
    assert!(matches!(s.view_department_budget().await.unwrap(), Outcome::NothingToDo(_)));
    assert!(s.renderer().tables.is_empty());
}

#[tokio::test]
async fn test_view_roles_and_departments() {
    let mut s = session(seeded_db(), ScriptedForm::new());

    s.view_departments().await.unwrap();
    s.view_roles().await.unwrap();

    let tables = &s.renderer().tables;
    assert_eq!(tables[0].columns, vec!["id", "name"]);
    assert_eq!(tables[0].rows.len(), 4);
    assert_eq!(tables[1].columns, vec!["id", "title", "department", "salary"]);
    assert_eq!(tables[1].cell(0, "salary"), Some("100000.00"));
}

#[tokio::test]
async fn test_view_employees_by_manager() {
    let mut s = session(seeded_db(), ScriptedForm::new().choice(0).choice(1));

    assert_eq!(s.view_employees_by_manager().await.unwrap(), Outcome::Shown);
    assert_eq!(s.renderer().tables[0].cell(0, "first_name"), Some("Mike"));

    match s.view_employees_by_manager().await.unwrap() {
        Outcome::NothingToDo(message) => assert_eq!(message, "Mike Chan has no direct reports"),
        other => panic!("unexpected outcome {other:?}"),
    }
}

#[tokio::test]
async fn test_view_employees_by_department() {
    let mut s = session(seeded_db(), ScriptedForm::new().choice(2));

    assert_eq!(s.view_employees_by_department().await.unwrap(), Outcome::Shown);
    let table = &s.renderer().tables[0];
    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.cell(0, "last_name"), Some("Lourd"));
    assert_eq!(table.cell(1, "last_name"), Some("Allen"));
}

#[tokio::test]
async fn test_view_department_budget() {
    let mut s = session(seeded_db(), ScriptedForm::new().choice(0));

    assert_eq!(s.view_department_budget().await.unwrap(), Outcome::Shown);
    let table = &s.renderer().tables[0];
    assert_eq!(table.rows[0], vec!["Engineering", "2", "270000.00"]);
}

#[tokio::test]
async fn test_budget_of_empty_department() {
    let mut s = session(empty_db(), ScriptedForm::new().text("Legal").choice(0));
    s.add_department().await.unwrap();

    s.view_department_budget().await.unwrap();
    assert_eq!(s.renderer().tables[0].rows[0], vec!["Legal", "0", "0.00"]);
}
