//! Briefing text sent to the assistant alongside each user message.
//!
//! The briefing gives the assistant the requester's own file, their manager,
//! their direct reports and the company directory, with every entry filtered
//! through [`disclosure_for`]. It is followed by fixed formatting
//! instructions and then the raw user message.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use super::ports::{EmployeeRepository, EmployeeRepositoryError};
use super::{Department, Disclosure, Employee, disclosure_for, format_number, permission_summary};

/// Bullet format the assistant must use for employee listings.
pub const LISTING_FORMAT: &str = "• Prénom Nom (ID) - Poste - email";

/// Instructions appended after the briefing.
pub const FORMATTING_INSTRUCTIONS: &str = "=== INSTRUCTIONS ===\n\
Tu es l'assistant RH de l'entreprise. Réponds en français, de façon concise.\n\
Ne divulgue jamais les congés, le salaire ou les avantages d'un employé pour lequel \
l'utilisateur n'a qu'un accès annuaire.\n\
Quand tu listes des employés, utilise exactement une ligne par personne au format :\n\
• Prénom Nom (ID) - Poste - email\n\
N'ajoute aucune autre information sur ces lignes.";

const NO_DEPARTMENT_LABEL: &str = "Sans département";

/// Everything the briefing needs about the requester's surroundings.
pub struct BriefingInputs<'a> {
    pub requester: &'a Employee,
    pub manager: Option<&'a Employee>,
    pub reports: &'a [Employee],
    pub directory: &'a [Employee],
}

/// Render the briefing for `inputs.requester`.
pub fn build_briefing(inputs: &BriefingInputs<'_>) -> String {
    let mut out = String::new();
    out.push_str(&profile_section(inputs.requester, inputs.reports.len()));
    out.push_str(&own_figures_section(inputs.requester));
    out.push_str(&manager_section(inputs.manager));
    if !inputs.reports.is_empty() {
        out.push_str(&reports_section(inputs.reports));
    }
    out.push_str(&directory_section(inputs.requester, inputs.directory));
    out
}

/// A titled block: header, one line per entry, then a blank line.
fn section(title: &str, lines: &[String]) -> String {
    let mut out = format!("=== {title} ===\n");
    for line in lines {
        out.push_str(line);
        out.push('\n');
    }
    out.push('\n');
    out
}

fn profile_section(requester: &Employee, report_count: usize) -> String {
    let mut lines = vec![
        format!("Nom : {}", requester.full_name()),
        format!("Identifiant : {}", requester.id()),
        format!("Email : {}", requester.email()),
        format!("Département : {}", department_label(requester.department())),
        format!("Poste : {}", requester.job_title()),
    ];
    if let Some(hire_date) = requester.hire_date() {
        lines.push(format!("Date d'embauche : {}", hire_date.format("%d/%m/%Y")));
    }
    let role = if requester.is_manager() || report_count > 0 {
        "Manager"
    } else {
        "Collaborateur"
    };
    lines.push(format!("Statut : {role}"));
    lines.push(format!(
        "Permissions : {}",
        permission_summary(requester, report_count)
    ));
    section("PROFIL DE L'UTILISATEUR", &lines)
}

fn own_figures_section(requester: &Employee) -> String {
    let leave = requester.annual_leave();
    let sick = requester.sick_leave();
    let pay = requester.compensation();
    let review = pay.next_review_date.map_or_else(
        || "non planifiée".to_owned(),
        |date| date.format("%d/%m/%Y").to_string(),
    );
    let lines = [
        format!(
            "Congés annuels : droit {} jours, utilisés {}, planifiés {}, restants {}",
            format_number(leave.entitlement),
            format_number(leave.used),
            format_number(leave.planned),
            format_number(leave.remaining),
        ),
        format!(
            "Congés maladie : droit {} jours, utilisés {}, restants {}",
            format_number(sick.entitlement),
            format_number(sick.used),
            format_number(sick.remaining),
        ),
        format!("Salaire annuel : {} €", format_number(pay.salary)),
        format!(
            "Éligible à la prime : {}",
            if pay.bonus_eligible { "Oui" } else { "Non" }
        ),
        format!("Prochaine évaluation : {review}"),
        format!("Régime santé : {}", pay.benefits_tier),
    ];
    section("CONGÉS ET RÉMUNÉRATION", &lines)
}

fn manager_section(manager: Option<&Employee>) -> String {
    let line = manager.map_or_else(
        || "Aucun manager renseigné".to_owned(),
        |manager| {
            format!(
                "{} - {} - {}",
                manager.full_name(),
                manager.job_title(),
                manager.email()
            )
        },
    );
    section("MANAGER", &[line])
}

fn reports_section(reports: &[Employee]) -> String {
    let lines: Vec<String> = reports
        .iter()
        .map(|report| {
            format!(
                "- {} ({}) - {}",
                report.full_name(),
                report.id(),
                report.job_title()
            )
        })
        .collect();
    section(&format!("ÉQUIPE DIRECTE ({})", reports.len()), &lines)
}

fn directory_section(requester: &Employee, directory: &[Employee]) -> String {
    let mut lines = Vec::new();
    for (department, members) in group_by_department(directory) {
        lines.push(format!("[{}]", department_label(department)));
        lines.extend(
            members
                .into_iter()
                .filter_map(|member| directory_entry(requester, member)),
        );
    }
    section("ANNUAIRE DE L'ENTREPRISE", &lines)
}

fn directory_entry(requester: &Employee, member: &Employee) -> Option<String> {
    let disclosure = disclosure_for(Some(requester), member);
    if disclosure == Disclosure::Withheld {
        return None;
    }
    let mut entry = format!(
        "• {} ({}) - {} - {}",
        member.full_name(),
        member.id(),
        member.job_title(),
        member.email()
    );
    if disclosure == Disclosure::Full {
        entry.push_str(&format!(
            " | congés restants : {} jours | congés maladie restants : {} jours | salaire : {} €",
            format_number(member.annual_leave().remaining),
            format_number(member.sick_leave().remaining),
            format_number(member.compensation().salary),
        ));
    }
    Some(entry)
}

/// Group employees by department in [`Department::ALL`] order, with
/// employees lacking a department last.
pub fn group_by_department(employees: &[Employee]) -> Vec<(Option<Department>, Vec<&Employee>)> {
    let mut grouped: BTreeMap<(usize, Option<Department>), Vec<&Employee>> = BTreeMap::new();
    for employee in employees {
        let department = employee.department();
        let rank = department
            .and_then(|d| Department::ALL.iter().position(|candidate| *candidate == d))
            .unwrap_or(Department::ALL.len());
        grouped.entry((rank, department)).or_default().push(employee);
    }
    grouped
        .into_iter()
        .map(|((_, department), members)| (department, members))
        .collect()
}

/// Department label, or the placeholder for employees without one.
pub fn department_label(department: Option<Department>) -> &'static str {
    department.map_or(NO_DEPARTMENT_LABEL, Department::label)
}

/// Loads briefing inputs from the employee store and builds the prompt.
pub struct ContextAssembler<R> {
    employees: Arc<R>,
}

impl<R> Clone for ContextAssembler<R> {
    fn clone(&self) -> Self {
        Self {
            employees: Arc::clone(&self.employees),
        }
    }
}

impl<R> ContextAssembler<R>
where
    R: EmployeeRepository,
{
    pub fn new(employees: Arc<R>) -> Self {
        Self { employees }
    }

    /// Build the effective prompt for `message`.
    ///
    /// Anonymous requesters get `message` back unchanged.
    pub async fn enhanced_message(
        &self,
        requester: Option<&Employee>,
        message: &str,
    ) -> Result<String, EmployeeRepositoryError> {
        let Some(requester) = requester else {
            return Ok(message.to_owned());
        };

        let manager = match requester.manager_id() {
            Some(manager_id) => {
                let found = self.employees.find_by_id(manager_id).await?;
                if found.is_none() {
                    debug!(manager_id = %manager_id, "manager link does not resolve");
                }
                found
            }
            None => None,
        };
        let reports = self.employees.list_reports(requester.id()).await?;
        let directory = self.employees.list_all().await?;

        let briefing = build_briefing(&BriefingInputs {
            requester,
            manager: manager.as_ref(),
            reports: &reports,
            directory: &directory,
        });
        Ok(format!(
            "{briefing}{FORMATTING_INSTRUCTIONS}\n\n=== QUESTION DE L'UTILISATEUR ===\n{message}"
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockEmployeeRepository;
    use crate::domain::{EmployeeDraft, EmployeeId};
    use rstest::{fixture, rstest};

    fn employee(id: &str, department: Option<Department>, manager: Option<&str>) -> Employee {
        let mut draft = EmployeeDraft::new(EmployeeId::new(id).expect("id"), id.to_lowercase());
        draft.first_name = "Camille".into();
        draft.last_name = id.into();
        draft.email = format!("{}@company.com", id.to_lowercase());
        draft.department = department;
        draft.job_title = "Chargé de projet".into();
        draft.manager_id = manager.map(|m| EmployeeId::new(m).expect("manager id"));
        draft.compensation.salary = 48_000.0;
        draft.annual_leave.remaining = 12.0;
        Employee::new(draft).expect("employee")
    }

    #[fixture]
    fn staff() -> Vec<Employee> {
        vec![
            employee("MGR01", Some(Department::Finance), None),
            employee("EMP010", Some(Department::Finance), Some("MGR01")),
            employee("EMP020", Some(Department::It), None),
            employee("EMP030", None, None),
        ]
    }

    #[rstest]
    fn briefing_discloses_reports_but_not_peers(staff: Vec<Employee>) {
        let requester = staff.first().expect("manager").clone();
        let reports: Vec<Employee> = staff
            .iter()
            .filter(|e| requester.manages(e))
            .cloned()
            .collect();
        let briefing = build_briefing(&BriefingInputs {
            requester: &requester,
            manager: None,
            reports: &reports,
            directory: &staff,
        });

        let report_line = briefing
            .lines()
            .find(|line| line.starts_with("• ") && line.contains("(EMP010)"))
            .expect("report line");
        assert!(report_line.contains("salaire : 48000 €"));

        let peer_line = briefing
            .lines()
            .find(|line| line.starts_with("• ") && line.contains("(EMP020)"))
            .expect("peer line");
        assert!(!peer_line.contains("salaire"));
        assert!(peer_line.ends_with("emp020@company.com"));

        assert!(briefing.contains("=== ÉQUIPE DIRECTE (1) ==="));
        assert!(briefing.contains("Aucun manager renseigné"));
    }

    #[rstest]
    fn sections_are_separated_by_blank_lines(staff: Vec<Employee>) {
        let requester = staff.get(2).expect("peer").clone();
        let briefing = build_briefing(&BriefingInputs {
            requester: &requester,
            manager: None,
            reports: &[],
            directory: &staff,
        });

        let headers: Vec<&str> = briefing
            .lines()
            .filter(|line| line.starts_with("=== "))
            .collect();
        assert_eq!(
            headers,
            [
                "=== PROFIL DE L'UTILISATEUR ===",
                "=== CONGÉS ET RÉMUNÉRATION ===",
                "=== MANAGER ===",
                "=== ANNUAIRE DE L'ENTREPRISE ===",
            ]
        );
        assert!(briefing.contains("Statut : Collaborateur\n"));
        assert!(briefing.contains("Prochaine évaluation : non planifiée\n"));
        assert!(briefing.contains("\n\n=== MANAGER ===\nAucun manager renseigné\n\n"));
        assert!(briefing.ends_with("emp030@company.com\n\n"));
    }

    #[rstest]
    fn directory_groups_follow_department_order(staff: Vec<Employee>) {
        let groups = group_by_department(&staff);
        let labels: Vec<&str> = groups.iter().map(|(d, _)| department_label(*d)).collect();
        assert_eq!(labels, vec!["IT", "Finance", "Sans département"]);
    }

    #[rstest]
    #[tokio::test]
    async fn anonymous_requester_gets_raw_message() {
        let repo = MockEmployeeRepository::new();
        let assembler = ContextAssembler::new(Arc::new(repo));
        let prompt = assembler
            .enhanced_message(None, "Bonjour")
            .await
            .expect("no store access needed");
        assert_eq!(prompt, "Bonjour");
    }

    #[rstest]
    #[tokio::test]
    async fn prompt_contains_briefing_instructions_and_message(staff: Vec<Employee>) {
        let requester = staff.get(1).expect("report").clone();
        let manager = staff.first().expect("manager").clone();
        let directory = staff.clone();

        let mut repo = MockEmployeeRepository::new();
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(manager.clone())));
        repo.expect_list_reports().returning(|_| Ok(Vec::new()));
        repo.expect_list_all()
            .returning(move || Ok(directory.clone()));

        let assembler = ContextAssembler::new(Arc::new(repo));
        let prompt = assembler
            .enhanced_message(Some(&requester), "Qui est mon manager ?")
            .await
            .expect("prompt");

        assert!(prompt.contains("Identifiant : EMP010"));
        assert!(prompt.contains("Camille MGR01 - Chargé de projet - mgr01@company.com"));
        assert!(prompt.contains(LISTING_FORMAT));
        assert!(prompt.ends_with("Qui est mon manager ?"));
    }
}
