//! Reduce composed first and last names to their first part.
//!
//! Listings are easier to keep on one line when every name is a single
//! word, so `Jean-Pierre Martin Dubois` becomes `Jean Martin`.

use std::sync::Arc;

use tracing::info;

use crate::domain::ports::{EmployeeRepository, EmployeeRepositoryError};
use crate::domain::{Employee, EmployeeId};

/// Whether either name has several words or a hyphen.
pub fn has_composed_name(employee: &Employee) -> bool {
    is_composed(employee.first_name()) || is_composed(employee.last_name())
}

fn is_composed(name: &str) -> bool {
    name.split_whitespace().count() > 1 || name.contains('-')
}

/// First part of `name` after splitting on whitespace and hyphens.
///
/// # Examples
/// ```
/// use hr_assistant::domain::simplify_name;
///
/// assert_eq!(simplify_name("Jean-Pierre"), "Jean");
/// assert_eq!(simplify_name("Martin Dubois"), "Martin");
/// assert_eq!(simplify_name(""), "");
/// ```
pub fn simplify_name(name: &str) -> String {
    name.split(|c: char| c.is_whitespace() || c == '-')
        .find(|part| !part.is_empty())
        .unwrap_or(name)
        .to_owned()
}

/// A pending rename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameChange {
    pub id: EmployeeId,
    pub before: String,
    pub after: String,
    pub first_name: String,
    pub last_name: String,
}

/// Renames needed for `employees`, in input order.
pub fn plan_name_changes(employees: &[Employee]) -> Vec<NameChange> {
    employees
        .iter()
        .filter(|employee| has_composed_name(employee))
        .map(|employee| {
            let first_name = simplify_name(employee.first_name());
            let last_name = simplify_name(employee.last_name());
            NameChange {
                id: employee.id().clone(),
                before: format!("{} {}", employee.first_name(), employee.last_name()),
                after: format!("{first_name} {last_name}"),
                first_name,
                last_name,
            }
        })
        .collect()
}

/// Plans and applies name simplification against the employee store.
pub struct NameSimplifier<E> {
    employees: Arc<E>,
}

impl<E> NameSimplifier<E>
where
    E: EmployeeRepository,
{
    pub fn new(employees: Arc<E>) -> Self {
        Self { employees }
    }

    /// Scan the directory for composed names.
    pub async fn plan(&self) -> Result<Vec<NameChange>, EmployeeRepositoryError> {
        let everyone = self.employees.list_all().await?;
        Ok(plan_name_changes(&everyone))
    }

    /// Write `changes`, returning how many records were updated. Employees
    /// removed since planning are ignored.
    pub async fn apply(&self, changes: &[NameChange]) -> Result<usize, EmployeeRepositoryError> {
        let mut updated = 0;
        for change in changes {
            let Some(existing) = self.employees.find_by_id(&change.id).await? else {
                continue;
            };
            let mut draft = existing.into_draft();
            draft.first_name.clone_from(&change.first_name);
            draft.last_name.clone_from(&change.last_name);
            let employee = Employee::new(draft)
                .map_err(|err| EmployeeRepositoryError::query(err.to_string()))?;
            self.employees.upsert(&employee).await?;
            info!(employee_id = %change.id, before = %change.before, after = %change.after, "name simplified");
            updated += 1;
        }
        Ok(updated)
    }
}
