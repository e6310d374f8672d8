//! PostgreSQL-backed `EmployeeRepository` implementation using Diesel ORM.
//!
//! The adapter translates between [`EmployeeRow`] and the domain
//! [`Employee`]. Enum columns are stored as their labels; unreadable labels
//! are logged and replaced by the domain default instead of failing the whole
//! read.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{
    DepartmentHeadcount, EmployeeRepository, EmployeeRepositoryError, UpsertOutcome,
};
use crate::domain::{
    AnnualLeave, BenefitsTier, Compensation, Department, Employee, EmployeeDraft, EmployeeId,
    Role, Sex, SickLeave,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{EmployeeRecord, EmployeeRow};
use super::pool::{DbPool, PoolError};
use super::schema::employees;

/// Diesel-backed implementation of the `EmployeeRepository` port.
#[derive(Clone)]
pub struct DieselEmployeeRepository {
    pool: DbPool,
}

impl DieselEmployeeRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> EmployeeRepositoryError {
    map_basic_pool_error(error, EmployeeRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> EmployeeRepositoryError {
    map_basic_diesel_error(
        error,
        EmployeeRepositoryError::query,
        EmployeeRepositoryError::connection,
    )
}

/// Like [`map_diesel_error`], but a unique violation becomes
/// [`EmployeeRepositoryError::Duplicate`] naming the constraint.
fn map_insert_error(error: diesel::result::Error) -> EmployeeRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            EmployeeRepositoryError::duplicate(info.constraint_name().unwrap_or("unknown"))
        }
        other => map_diesel_error(other),
    }
}

/// Escape `LIKE` wildcards so user text matches literally.
fn like_pattern(fragment: &str) -> String {
    let mut escaped = String::with_capacity(fragment.len() + 2);
    for c in fragment.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn parse_department(id: &str, label: Option<String>) -> Option<Department> {
    let label = label?;
    match label.parse() {
        Ok(department) => Some(department),
        Err(_) => {
            warn!(employee_id = id, value = %label, "unrecognised department label, ignoring");
            None
        }
    }
}

fn parse_sex(id: &str, label: Option<String>) -> Option<Sex> {
    let label = label?;
    match label.parse() {
        Ok(sex) => Some(sex),
        Err(_) => {
            warn!(employee_id = id, value = %label, "unrecognised sex label, ignoring");
            None
        }
    }
}

/// Convert a database row to a domain employee.
fn row_to_employee(row: EmployeeRow) -> Result<Employee, EmployeeRepositoryError> {
    let id = EmployeeId::new(row.id.as_str())
        .map_err(|err| EmployeeRepositoryError::query(format!("stored employee id: {err}")))?;
    let manager_id = match row.manager_id.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => match EmployeeId::new(raw) {
            Ok(manager) => Some(manager),
            Err(err) => {
                warn!(employee_id = %id, value = raw, %err, "unusable manager link, ignoring");
                None
            }
        },
    };
    let department = parse_department(id.as_str(), row.department);
    let sex = parse_sex(id.as_str(), row.sex);

    let mut draft = EmployeeDraft::new(id, row.username);
    draft.password_hash = row.password_hash;
    draft.first_name = row.first_name;
    draft.last_name = row.last_name;
    draft.email = row.email;
    draft.department = department;
    draft.job_title = row.job_title;
    draft.manager_id = manager_id;
    draft.is_manager = row.is_manager;
    draft.role = Role::from_label(&row.role);
    draft.birth_date = row.birth_date;
    draft.sex = sex;
    draft.hire_date = row.hire_date;
    draft.annual_leave = AnnualLeave {
        entitlement: row.annual_leave_entitlement,
        used: row.annual_leave_used,
        planned: row.annual_leave_planned,
        remaining: row.annual_leave_remaining,
    };
    draft.sick_leave = SickLeave {
        entitlement: row.sick_leave_entitlement,
        used: row.sick_leave_used,
        remaining: row.sick_leave_remaining,
    };
    draft.compensation = Compensation {
        salary: row.salary,
        bonus_eligible: row.bonus_eligible,
        next_review_date: row.next_review_date,
        benefits_tier: BenefitsTier::from_label(&row.benefits_tier),
    };
    Employee::new(draft)
        .map_err(|err| EmployeeRepositoryError::query(format!("stored employee: {err}")))
}

fn rows_to_employees(rows: Vec<EmployeeRow>) -> Result<Vec<Employee>, EmployeeRepositoryError> {
    rows.into_iter().map(row_to_employee).collect()
}

fn employee_record(employee: &Employee) -> EmployeeRecord<'_> {
    let annual = employee.annual_leave();
    let sick = employee.sick_leave();
    let pay = employee.compensation();
    EmployeeRecord {
        id: employee.id().as_str(),
        username: employee.username(),
        password_hash: employee.password_hash(),
        first_name: employee.first_name(),
        last_name: employee.last_name(),
        email: employee.email(),
        department: employee.department().map(Department::label),
        job_title: employee.job_title(),
        manager_id: employee.manager_id().map(EmployeeId::as_str),
        is_manager: employee.is_manager(),
        role: employee.role().as_str(),
        birth_date: employee.birth_date(),
        sex: employee.sex().map(Sex::as_str),
        hire_date: employee.hire_date(),
        annual_leave_entitlement: annual.entitlement,
        annual_leave_used: annual.used,
        annual_leave_planned: annual.planned,
        annual_leave_remaining: annual.remaining,
        sick_leave_entitlement: sick.entitlement,
        sick_leave_used: sick.used,
        sick_leave_remaining: sick.remaining,
        salary: pay.salary,
        bonus_eligible: pay.bonus_eligible,
        next_review_date: pay.next_review_date,
        benefits_tier: pay.benefits_tier.label(),
    }
}

/// Merge grouped counts whose labels resolve to the same department.
fn merge_headcounts(groups: Vec<(Option<String>, i64)>) -> Vec<DepartmentHeadcount> {
    let mut merged: Vec<DepartmentHeadcount> = Vec::new();
    for (label, count) in groups {
        let department = label.and_then(|raw| raw.parse::<Department>().ok());
        let count = u64::try_from(count).unwrap_or(0);
        match merged.iter_mut().find(|entry| entry.department == department) {
            Some(entry) => entry.count += count,
            None => merged.push(DepartmentHeadcount { department, count }),
        }
    }
    merged
}

#[async_trait]
impl EmployeeRepository for DieselEmployeeRepository {
    async fn find_by_id(
        &self,
        id: &EmployeeId,
    ) -> Result<Option<Employee>, EmployeeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<EmployeeRow> = employees::table
            .filter(employees::id.eq(id.as_str()))
            .select(EmployeeRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_employee).transpose()
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Employee>, EmployeeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<EmployeeRow> = employees::table
            .filter(employees::username.ilike(like_pattern(username.trim())))
            .select(EmployeeRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_employee).transpose()
    }

    async fn list_all(&self) -> Result<Vec<Employee>, EmployeeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<EmployeeRow> = employees::table
            .order(employees::id.asc())
            .select(EmployeeRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_employees(rows)
    }

    async fn list_reports(
        &self,
        manager_id: &EmployeeId,
    ) -> Result<Vec<Employee>, EmployeeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<EmployeeRow> = employees::table
            .filter(employees::manager_id.eq(manager_id.as_str()))
            .order(employees::id.asc())
            .select(EmployeeRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_employees(rows)
    }

    async fn list_by_department(
        &self,
        department: Department,
    ) -> Result<Vec<Employee>, EmployeeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<EmployeeRow> = employees::table
            .filter(employees::department.eq(department.label()))
            .order((employees::last_name.asc(), employees::first_name.asc()))
            .select(EmployeeRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_employees(rows)
    }

    async fn search_by_title(
        &self,
        fragment: &str,
    ) -> Result<Vec<Employee>, EmployeeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<EmployeeRow> = employees::table
            .filter(employees::job_title.ilike(format!("%{}%", like_pattern(fragment.trim()))))
            .order((employees::last_name.asc(), employees::first_name.asc()))
            .select(EmployeeRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_employees(rows)
    }

    async fn count_by_department(
        &self,
    ) -> Result<Vec<DepartmentHeadcount>, EmployeeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let groups: Vec<(Option<String>, i64)> = employees::table
            .group_by(employees::department)
            .select((employees::department, diesel::dsl::count_star()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(merge_headcounts(groups))
    }

    async fn insert(&self, employee: &Employee) -> Result<(), EmployeeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(employees::table)
            .values(&employee_record(employee))
            .execute(&mut conn)
            .await
            .map_err(map_insert_error)?;
        Ok(())
    }

    async fn upsert(&self, employee: &Employee) -> Result<UpsertOutcome, EmployeeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let existing: i64 = employees::table
            .filter(employees::id.eq(employee.id().as_str()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let record = employee_record(employee);
        diesel::insert_into(employees::table)
            .values(&record)
            .on_conflict(employees::id)
            .do_update()
            .set((&record, employees::updated_at.eq(diesel::dsl::now)))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(if existing > 0 {
            UpsertOutcome::Updated
        } else {
            UpsertOutcome::Created
        })
    }
}
