//! Rule-based responder used when the assistant service is unavailable.
//!
//! The message is folded to lower case without accents and run through
//! [`RULES`] in order; the first rule that produces a reply wins, and
//! [`replies::CAPABILITIES`] answers anything left over. Every rule reads the
//! store afresh, so the reply depends only on the message, the requester and
//! the current records.
//!
//! The third-party refusal sits near the end of the cascade. Phrasings such
//! as "le salaire de Paul" are answered earlier by the salary rule with the
//! requester's own figures; only questions the earlier rules ignore (for
//! example "combien gagne Paul") reach the refusal.

mod intent;
pub mod replies;
pub mod search;

use std::sync::Arc;

use tracing::debug;

use super::ports::{EmployeeRepository, EmployeeRepositoryError};
use super::{Department, Employee, fold_text};

/// Cascade steps, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    ComprehensiveInfo,
    Identity,
    PersonSearch,
    DepartmentListing,
    PositionSearch,
    Statistics,
    ExecutiveContacts,
    HrContacts,
    Hierarchy,
    AnnualLeave,
    SickLeave,
    Salary,
    WorkingHours,
    Training,
    ThirdPartyRefusal,
}

/// Evaluation order of the cascade.
pub const RULES: [Rule; 15] = [
    Rule::ComprehensiveInfo,
    Rule::Identity,
    Rule::PersonSearch,
    Rule::DepartmentListing,
    Rule::PositionSearch,
    Rule::Statistics,
    Rule::ExecutiveContacts,
    Rule::HrContacts,
    Rule::Hierarchy,
    Rule::AnnualLeave,
    Rule::SickLeave,
    Rule::Salary,
    Rule::WorkingHours,
    Rule::Training,
    Rule::ThirdPartyRefusal,
];

/// Deterministic replies built from the employee store.
pub struct FallbackResponder<R> {
    employees: Arc<R>,
}

impl<R> Clone for FallbackResponder<R> {
    fn clone(&self) -> Self {
        Self {
            employees: Arc::clone(&self.employees),
        }
    }
}

impl<R> FallbackResponder<R>
where
    R: EmployeeRepository,
{
    pub fn new(employees: Arc<R>) -> Self {
        Self { employees }
    }

    /// Answer `message` on behalf of `requester`.
    pub async fn respond(
        &self,
        message: &str,
        requester: Option<&Employee>,
    ) -> Result<String, EmployeeRepositoryError> {
        let text = fold_text(message.trim());
        for rule in RULES {
            if let Some(reply) = self.apply(rule, &text, message, requester).await? {
                debug!(?rule, "fallback rule matched");
                return Ok(reply);
            }
        }
        Ok(replies::CAPABILITIES.to_owned())
    }

    async fn apply(
        &self,
        rule: Rule,
        text: &str,
        original: &str,
        requester: Option<&Employee>,
    ) -> Result<Option<String>, EmployeeRepositoryError> {
        let reply = match rule {
            Rule::ComprehensiveInfo if intent::asks_comprehensive_info(text) => {
                match requester {
                    Some(me) => {
                        let manager = self.manager_of(me).await?;
                        Some(replies::comprehensive_profile(me, manager.as_ref()))
                    }
                    None => Some(replies::LOGIN_REQUIRED.to_owned()),
                }
            }
            Rule::Identity if intent::asks_identity(text) => {
                Some(personal(requester, replies::identity))
            }
            Rule::PersonSearch if intent::asks_person_search(text) => {
                self.search_person(text, requester).await?
            }
            Rule::DepartmentListing => self.list_department(text, requester).await?,
            Rule::PositionSearch if intent::asks_position(text) => {
                self.search_position(original).await?
            }
            Rule::Statistics if intent::asks_statistics(text) => {
                let counts = self.employees.count_by_department().await?;
                Some(replies::statistics(&counts))
            }
            Rule::ExecutiveContacts if intent::asks_executive_contacts(text) => {
                let executives = self
                    .employees
                    .list_by_department(Department::Direction)
                    .await?;
                Some(replies::executive_contacts(&executives))
            }
            Rule::HrContacts if intent::asks_hr_contacts(text) => {
                let hr = self.employees.list_by_department(Department::Rh).await?;
                Some(replies::hr_contacts(&hr))
            }
            Rule::Hierarchy if intent::asks_hierarchy(text) => match requester {
                Some(me) => {
                    let manager = self.manager_of(me).await?;
                    let reports = self.employees.list_reports(me.id()).await?;
                    Some(replies::hierarchy(me, manager.as_ref(), &reports))
                }
                None => Some(replies::LOGIN_REQUIRED.to_owned()),
            },
            Rule::AnnualLeave if intent::asks_annual_leave(text) => {
                Some(personal(requester, replies::annual_leave))
            }
            Rule::SickLeave if intent::asks_sick_leave(text) => {
                Some(personal(requester, replies::sick_leave))
            }
            Rule::Salary if intent::asks_salary(text) => {
                Some(personal(requester, replies::salary))
            }
            Rule::WorkingHours if intent::asks_working_hours(text) => {
                Some(replies::WORKING_HOURS.to_owned())
            }
            Rule::Training if intent::asks_training(text) => Some(replies::TRAINING.to_owned()),
            Rule::ThirdPartyRefusal if intent::asks_third_party_private_data(text) => {
                Some(replies::THIRD_PARTY_REFUSAL.to_owned())
            }
            _ => None,
        };
        Ok(reply)
    }

    async fn manager_of(&self, employee: &Employee) -> Result<Option<Employee>, EmployeeRepositoryError> {
        match employee.manager_id() {
            Some(manager_id) => self.employees.find_by_id(manager_id).await,
            None => Ok(None),
        }
    }

    async fn search_person(
        &self,
        text: &str,
        requester: Option<&Employee>,
    ) -> Result<Option<String>, EmployeeRepositoryError> {
        if intent::mentions_department(text) {
            return Ok(None);
        }
        let Some(query) = intent::term_after(text, intent::SEARCH_CUES) else {
            return Ok(None);
        };
        let directory = self.employees.list_all().await?;
        Ok(search::best_match(&query, &directory)
            .map(|(found, _)| replies::person_found(requester, found)))
    }

    async fn list_department(
        &self,
        text: &str,
        requester: Option<&Employee>,
    ) -> Result<Option<String>, EmployeeRepositoryError> {
        if intent::asks_own_team(text) {
            let Some(me) = requester else {
                return Ok(Some(replies::LOGIN_REQUIRED.to_owned()));
            };
            let Some(department) = me.department() else {
                return Ok(Some(replies::NO_OWN_DEPARTMENT.to_owned()));
            };
            let members = self.employees.list_by_department(department).await?;
            return Ok(Some(replies::department_members(department, &members)));
        }

        let Some(department) = intent::named_department(text) else {
            return Ok(None);
        };
        if !intent::asks_department_listing(text) {
            return Ok(None);
        }
        let members = self.employees.list_by_department(department).await?;
        Ok(Some(replies::department_members(department, &members)))
    }

    /// Title search keeps the message's accents so containment matches
    /// stored titles.
    async fn search_position(&self, original: &str) -> Result<Option<String>, EmployeeRepositoryError> {
        let lowered = original.trim().to_lowercase();
        let Some(term) = intent::term_after(&lowered, intent::POSITION_CUES)
            .or_else(|| intent::term_after(&lowered, &["poste"]))
        else {
            return Ok(None);
        };
        let matches = self.employees.search_by_title(&term).await?;
        Ok(Some(replies::position_matches(&term, &matches)))
    }
}

fn personal(requester: Option<&Employee>, render: fn(&Employee) -> String) -> String {
    requester.map_or_else(|| replies::LOGIN_REQUIRED.to_owned(), render)
}
