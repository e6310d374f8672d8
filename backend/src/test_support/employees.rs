use std::cmp::Ordering;
use std::sync::Mutex;

use async_trait::async_trait;

use super::lock;
use crate::domain::ports::{
    DepartmentHeadcount, EmployeeRepository, EmployeeRepositoryError, PasswordHashError,
    PasswordHasher, UpsertOutcome,
};
use crate::domain::{Department, Employee, EmployeeId};

/// Employee store kept in memory, ordered by identifier.
#[derive(Default)]
pub struct InMemoryEmployeeRepository {
    employees: Mutex<Vec<Employee>>,
}

impl InMemoryEmployeeRepository {
    /// Seed the store; later duplicates of an identifier replace earlier ones.
    pub fn with_employees(employees: Vec<Employee>) -> Self {
        let repository = Self::default();
        {
            let mut stored = lock(&repository.employees);
            for employee in employees {
                insert_sorted(&mut stored, employee);
            }
        }
        repository
    }

    fn filtered(&self, keep: impl Fn(&Employee) -> bool) -> Vec<Employee> {
        lock(&self.employees)
            .iter()
            .filter(|employee| keep(*employee))
            .cloned()
            .collect()
    }
}

fn insert_sorted(stored: &mut Vec<Employee>, employee: Employee) -> UpsertOutcome {
    match stored.binary_search_by(|probe| probe.id().cmp(employee.id())) {
        Ok(index) => {
            if let Some(slot) = stored.get_mut(index) {
                *slot = employee;
            }
            UpsertOutcome::Updated
        }
        Err(index) => {
            stored.insert(index, employee);
            UpsertOutcome::Created
        }
    }
}

const USERNAME_INDEX: &str = "idx_employees_username_lower";

/// Another record already uses `employee`'s username.
fn username_taken(stored: &[Employee], employee: &Employee) -> bool {
    stored.iter().any(|other| {
        other.id() != employee.id() && other.username().eq_ignore_ascii_case(employee.username())
    })
}

fn by_name(left: &Employee, right: &Employee) -> Ordering {
    left.last_name()
        .cmp(right.last_name())
        .then_with(|| left.first_name().cmp(right.first_name()))
}

#[async_trait]
impl EmployeeRepository for InMemoryEmployeeRepository {
    async fn find_by_id(
        &self,
        id: &EmployeeId,
    ) -> Result<Option<Employee>, EmployeeRepositoryError> {
        Ok(self.filtered(|employee| employee.id() == id).into_iter().next())
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Employee>, EmployeeRepositoryError> {
        let wanted = username.trim();
        Ok(self
            .filtered(|employee| employee.username().eq_ignore_ascii_case(wanted))
            .into_iter()
            .next())
    }

    async fn list_all(&self) -> Result<Vec<Employee>, EmployeeRepositoryError> {
        Ok(self.filtered(|_| true))
    }

    async fn list_reports(
        &self,
        manager_id: &EmployeeId,
    ) -> Result<Vec<Employee>, EmployeeRepositoryError> {
        Ok(self.filtered(|employee| employee.manager_id() == Some(manager_id)))
    }

    async fn list_by_department(
        &self,
        department: Department,
    ) -> Result<Vec<Employee>, EmployeeRepositoryError> {
        let mut members = self.filtered(|employee| employee.department() == Some(department));
        members.sort_by(by_name);
        Ok(members)
    }

    async fn search_by_title(
        &self,
        fragment: &str,
    ) -> Result<Vec<Employee>, EmployeeRepositoryError> {
        let needle = fragment.trim().to_lowercase();
        let mut matches =
            self.filtered(|employee| employee.job_title().to_lowercase().contains(&needle));
        matches.sort_by(by_name);
        Ok(matches)
    }

    async fn count_by_department(
        &self,
    ) -> Result<Vec<DepartmentHeadcount>, EmployeeRepositoryError> {
        let mut counts: Vec<DepartmentHeadcount> = Vec::new();
        for employee in lock(&self.employees).iter() {
            let department = employee.department();
            match counts.iter_mut().find(|entry| entry.department == department) {
                Some(entry) => entry.count += 1,
                None => counts.push(DepartmentHeadcount {
                    department,
                    count: 1,
                }),
            }
        }
        Ok(counts)
    }

    async fn insert(&self, employee: &Employee) -> Result<(), EmployeeRepositoryError> {
        let mut stored = lock(&self.employees);
        if stored.iter().any(|other| other.id() == employee.id()) {
            return Err(EmployeeRepositoryError::duplicate("employees_pkey"));
        }
        if username_taken(&stored, employee) {
            return Err(EmployeeRepositoryError::duplicate(USERNAME_INDEX));
        }
        insert_sorted(&mut stored, employee.clone());
        Ok(())
    }

    async fn upsert(&self, employee: &Employee) -> Result<UpsertOutcome, EmployeeRepositoryError> {
        let mut stored = lock(&self.employees);
        if username_taken(&stored, employee) {
            return Err(EmployeeRepositoryError::duplicate(USERNAME_INDEX));
        }
        Ok(insert_sorted(&mut stored, employee.clone()))
    }
}

/// Password hasher storing `plain:<password>`; only for tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaintextPasswordHasher;

const PLAINTEXT_PREFIX: &str = "plain:";

impl PasswordHasher for PlaintextPasswordHasher {
    fn hash(&self, password: &str) -> Result<String, PasswordHashError> {
        Ok(format!("{PLAINTEXT_PREFIX}{password}"))
    }

    fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, PasswordHashError> {
        stored_hash
            .strip_prefix(PLAINTEXT_PREFIX)
            .map(|stored| stored == password)
            .ok_or_else(|| PasswordHashError::malformed_hash("missing plain: prefix"))
    }
}
