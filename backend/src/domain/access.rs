//! Who may see which parts of an employee record.
//!
//! The rule set is flat:
//! - an employee sees their own record in full;
//! - a manager sees the records of their direct reports in full;
//! - everyone else, including anonymous callers, gets the directory view
//!   (name, email, department, job title).
//!
//! There is no transitive visibility through reports of reports.

use chrono::NaiveDate;
use serde::Serialize;

use super::{AnnualLeave, Compensation, Department, Employee, EmployeeId, SickLeave};

/// Disclosure level for one requester/target pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Disclosure {
    /// Every field, including leave and compensation.
    Full,
    /// Directory fields only.
    Directory,
    /// Nothing. No current rule produces this level.
    Withheld,
}

impl Disclosure {
    /// Human-readable description used in assistant briefings.
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Full => "accès complet",
            Self::Directory => "annuaire uniquement",
            Self::Withheld => "aucun accès",
        }
    }
}

/// Decide how much of `target` the `requester` may see.
///
/// # Examples
/// ```
/// use hr_assistant::domain::{Disclosure, Employee, EmployeeDraft, EmployeeId, disclosure_for};
///
/// let alice = Employee::new(EmployeeDraft::new(EmployeeId::new("EMP001").unwrap(), "alice")).unwrap();
/// let bob = Employee::new(EmployeeDraft::new(EmployeeId::new("EMP002").unwrap(), "bob")).unwrap();
/// assert_eq!(disclosure_for(Some(&alice), &alice), Disclosure::Full);
/// assert_eq!(disclosure_for(Some(&alice), &bob), Disclosure::Directory);
/// assert_eq!(disclosure_for(None, &bob), Disclosure::Directory);
/// ```
pub fn disclosure_for(requester: Option<&Employee>, target: &Employee) -> Disclosure {
    match requester {
        Some(requester) if requester.id() == target.id() => Disclosure::Full,
        Some(requester) if requester.manages(target) => Disclosure::Full,
        _ => Disclosure::Directory,
    }
}

/// Summary of what a requester may see across the directory.
pub fn permission_summary(requester: &Employee, direct_reports: usize) -> String {
    if direct_reports == 0 {
        "Vous avez accès à vos propres données complètes et aux informations d'annuaire \
         (nom, email, département, poste) de vos collègues."
            .to_owned()
    } else {
        format!(
            "Vous avez accès à vos propres données complètes, aux données complètes de vos \
             {direct_reports} collaborateur(s) direct(s) et aux informations d'annuaire des \
             autres employés. Identifiant manager : {}.",
            requester.id()
        )
    }
}

/// Private fields visible under [`Disclosure::Full`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivateDetails {
    pub manager_id: Option<EmployeeId>,
    pub hire_date: Option<NaiveDate>,
    pub annual_leave: AnnualLeave,
    pub sick_leave: SickLeave,
    pub compensation: Compensation,
}

/// An employee record filtered through a disclosure level.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeView {
    pub id: EmployeeId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub department: Option<Department>,
    pub job_title: String,
    pub disclosure: Disclosure,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private: Option<PrivateDetails>,
}

impl EmployeeView {
    /// Render `target` as seen by `requester`. Returns `None` for
    /// [`Disclosure::Withheld`].
    pub fn for_requester(requester: Option<&Employee>, target: &Employee) -> Option<Self> {
        Self::at_level(disclosure_for(requester, target), target)
    }

    /// Render `target` at a fixed disclosure level.
    pub fn at_level(disclosure: Disclosure, target: &Employee) -> Option<Self> {
        let private = match disclosure {
            Disclosure::Withheld => return None,
            Disclosure::Directory => None,
            Disclosure::Full => Some(PrivateDetails {
                manager_id: target.manager_id().cloned(),
                hire_date: target.hire_date(),
                annual_leave: *target.annual_leave(),
                sick_leave: *target.sick_leave(),
                compensation: target.compensation().clone(),
            }),
        };
        Some(Self {
            id: target.id().clone(),
            first_name: target.first_name().to_owned(),
            last_name: target.last_name().to_owned(),
            email: target.email().to_owned(),
            department: target.department(),
            job_title: target.job_title().to_owned(),
            disclosure,
            private,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EmployeeDraft;
    use rstest::{fixture, rstest};

    fn employee(id: &str, manager: Option<&str>) -> Employee {
        let mut draft = EmployeeDraft::new(EmployeeId::new(id).expect("id"), id.to_lowercase());
        draft.first_name = "Prénom".into();
        draft.last_name = id.into();
        draft.email = format!("{}@company.com", id.to_lowercase());
        draft.department = Some(Department::Finance);
        draft.job_title = "Analyste".into();
        draft.manager_id = manager.map(|m| EmployeeId::new(m).expect("manager id"));
        draft.compensation.salary = 52_000.0;
        Employee::new(draft).expect("employee")
    }

    #[fixture]
    fn manager() -> Employee {
        employee("MGR01", None)
    }

    #[fixture]
    fn report() -> Employee {
        employee("EMP010", Some("MGR01"))
    }

    #[fixture]
    fn grand_report() -> Employee {
        employee("EMP020", Some("EMP010"))
    }

    #[rstest]
    fn manager_sees_direct_report_in_full(manager: Employee, report: Employee) {
        assert_eq!(disclosure_for(Some(&manager), &report), Disclosure::Full);
    }

    #[rstest]
    fn visibility_is_not_transitive(manager: Employee, grand_report: Employee) {
        assert_eq!(
            disclosure_for(Some(&manager), &grand_report),
            Disclosure::Directory
        );
    }

    #[rstest]
    fn report_sees_manager_in_directory_only(manager: Employee, report: Employee) {
        assert_eq!(disclosure_for(Some(&report), &manager), Disclosure::Directory);
    }

    #[rstest]
    fn directory_view_never_carries_private_fields(manager: Employee, grand_report: Employee) {
        let view = EmployeeView::for_requester(Some(&manager), &grand_report).expect("visible");
        assert!(view.private.is_none());
        assert_eq!(view.email, "emp020@company.com");
        assert_eq!(view.department, Some(Department::Finance));
        assert_eq!(view.job_title, "Analyste");

        let json = serde_json::to_value(&view).expect("serialise view");
        assert!(json.get("private").is_none());
        let text = json.to_string();
        assert!(!text.contains("52000"));
        assert!(!text.contains("remaining"));
    }

    #[rstest]
    fn full_view_includes_compensation(manager: Employee) {
        let view = EmployeeView::for_requester(Some(&manager), &manager).expect("visible");
        let private = view.private.expect("full details");
        assert_eq!(private.compensation.salary, 52_000.0);
    }

    #[rstest]
    fn withheld_level_renders_nothing(report: Employee) {
        assert!(EmployeeView::at_level(Disclosure::Withheld, &report).is_none());
    }
}
