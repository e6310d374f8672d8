//! Bulk employee import from HR spreadsheets exported as CSV.
//!
//! Column names follow the HR export (`id`, `nom`, `email`, `departement`,
//! `Manager`, `poste`, `responsable`, `date_embauche`, `conges.*`,
//! `conges_maladie.*`, `remuneration.*`, `avantages.regime_sante`). Rows are
//! upserted by identifier: new employees get their identifier as username
//! and the default password; existing employees keep their credentials and
//! have every HR field overwritten.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use encoding_rs::WINDOWS_1252;
use tracing::{error, info, warn};
use zeroize::Zeroizing;

use crate::domain::ports::{
    EmployeeRepository, EmployeeRepositoryError, PasswordHashError, PasswordHasher, UpsertOutcome,
};
use crate::domain::{
    AnnualLeave, BenefitsTier, Compensation, Department, Employee, EmployeeDraft, EmployeeId,
    EmployeeValidationError, SickLeave,
};

/// Domain used for generated email addresses.
pub const DEFAULT_EMAIL_DOMAIN: &str = "company.com";
/// Password given to imported accounts unless overridden.
pub const DEFAULT_IMPORT_PASSWORD: &str = "test";

const SNIFF_LEN: usize = 1024;
const FIRST_DATA_LINE: usize = 2;
const TRUE_FLAGS: &[&str] = &["OUI", "VRAI", "TRUE", "1", "YES"];

/// Import failures that abort the whole run.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("CSV input is malformed: {message}")]
    Malformed { message: String },
    #[error(transparent)]
    Repository(#[from] EmployeeRepositoryError),
}

/// Counters reported at the end of an import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
    pub errors: usize,
    pub total: usize,
}

/// One CSV data row keyed by header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRow {
    /// Line number in the file; the first data row is line 2.
    pub line: usize,
    values: HashMap<String, String>,
}

impl CsvRow {
    /// Cell for `column`, or `None` when the file has no such column.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.values.get(column).map(String::as_str)
    }
}

/// Decode file bytes as UTF-8, falling back to Windows-1252.
pub fn decode_input(bytes: &[u8]) -> Cow<'_, str> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => WINDOWS_1252.decode_without_bom_handling(bytes).0,
    }
}

/// `;` when the start of the file contains one, `,` otherwise.
pub fn detect_delimiter(text: &str) -> u8 {
    if text.chars().take(SNIFF_LEN).any(|c| c == ';') {
        b';'
    } else {
        b','
    }
}

/// Split decoded CSV text into header-keyed rows.
pub fn read_rows(text: &str) -> Result<Vec<CsvRow>, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(detect_delimiter(text))
        .flexible(true)
        .from_reader(text.as_bytes());
    let headers: Vec<String> = reader
        .headers()
        .map_err(|err| ImportError::Malformed {
            message: err.to_string(),
        })?
        .iter()
        .map(|header| header.trim().to_owned())
        .collect();

    reader
        .records()
        .enumerate()
        .map(|(index, record)| {
            let record = record.map_err(|err| ImportError::Malformed {
                message: err.to_string(),
            })?;
            let values = headers
                .iter()
                .cloned()
                .zip(record.iter().map(str::to_owned))
                .collect();
            Ok(CsvRow {
                line: index + FIRST_DATA_LINE,
                values,
            })
        })
        .collect()
}

/// HR fields extracted from a row.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedEmployee {
    pub id: EmployeeId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub department: Option<Department>,
    pub is_manager: bool,
    pub job_title: String,
    pub manager_id: Option<EmployeeId>,
    pub hire_date: Option<NaiveDate>,
    pub annual_leave: AnnualLeave,
    pub sick_leave: SickLeave,
    pub compensation: Compensation,
}

impl ImportedEmployee {
    /// Overwrite the HR fields of `draft`, leaving credentials alone.
    pub fn apply_to(self, draft: &mut EmployeeDraft) {
        draft.first_name = self.first_name;
        draft.last_name = self.last_name;
        draft.email = self.email;
        draft.department = self.department;
        draft.is_manager = self.is_manager;
        draft.job_title = self.job_title;
        draft.manager_id = self.manager_id;
        draft.hire_date = self.hire_date;
        draft.annual_leave = self.annual_leave;
        draft.sick_leave = self.sick_leave;
        draft.compensation = self.compensation;
    }
}

/// A parsed row plus the recoverable problems found on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRow {
    pub employee: ImportedEmployee,
    pub warnings: Vec<String>,
}

/// Parse one row. Returns `None` when the row has no identifier.
pub fn parse_row(row: &CsvRow) -> Option<ParsedRow> {
    let raw_id = cell(row, "id");
    let id = EmployeeId::new(raw_id).ok()?;
    let mut warnings = Vec::new();

    let (first_name, last_name) = match cell(row, "nom").split_once(' ') {
        Some((first, last)) => (first.to_owned(), last.trim().to_owned()),
        None => (cell(row, "nom").to_owned(), String::new()),
    };

    let email = match cell(row, "email") {
        "" => format!("{}@{DEFAULT_EMAIL_DOMAIN}", id.as_str().to_lowercase()),
        email => email.to_owned(),
    };

    let department = match cell(row, "departement") {
        "" => None,
        raw => raw.parse::<Department>().map_or_else(
            |err| {
                warnings.push(err.to_string());
                None
            },
            Some,
        ),
    };

    let manager_id = match cell(row, "responsable") {
        "" => None,
        raw => EmployeeId::new(raw).map_or_else(
            |err| {
                warnings.push(format!("responsable {raw:?} ignored: {err}"));
                None
            },
            Some,
        ),
    };

    let mut number = |column: &str, default: f64| parse_number(row, column, default, &mut warnings);
    let annual_leave = AnnualLeave {
        entitlement: number("conges.droit_annuel", 25.0),
        used: number("conges.utilises", 0.0),
        planned: number("conges.planifies", 0.0),
        remaining: number("conges.restants", 25.0),
    };
    let sick_leave = SickLeave {
        entitlement: number("conges_maladie.droit", 10.0),
        used: number("conges_maladie.utilises", 0.0),
        remaining: number("conges_maladie.restants", 10.0),
    };
    let salary = number("remuneration.salaire", 0.0);

    let compensation = Compensation {
        salary,
        bonus_eligible: parse_flag(row.get("remuneration.eligible_prime"), true),
        next_review_date: parse_date(
            cell(row, "remuneration.date_prochaine_evaluation"),
            &mut warnings,
        ),
        benefits_tier: BenefitsTier::from_label(row.get("avantages.regime_sante").unwrap_or("Standard")),
    };

    let employee = ImportedEmployee {
        id,
        first_name,
        last_name,
        email,
        department,
        is_manager: parse_flag(row.get("Manager"), false),
        job_title: cell(row, "poste").to_owned(),
        manager_id,
        hire_date: parse_date(cell(row, "date_embauche"), &mut warnings),
        annual_leave,
        sick_leave,
        compensation,
    };
    Some(ParsedRow { employee, warnings })
}

fn cell<'a>(row: &'a CsvRow, column: &str) -> &'a str {
    row.get(column).map_or("", str::trim)
}

/// Absent column → `default`; empty cell → 0; comma decimals accepted;
/// unparsable → 0 with a warning.
fn parse_number(row: &CsvRow, column: &str, default: f64, warnings: &mut Vec<String>) -> f64 {
    let Some(raw) = row.get(column) else {
        return default;
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return 0.0;
    }
    raw.replace(',', ".").parse::<f64>().unwrap_or_else(|_| {
        warnings.push(format!("{column}: invalid number {raw:?}"));
        0.0
    })
}

fn parse_flag(raw: Option<&str>, default: bool) -> bool {
    match raw {
        None => default,
        Some(value) => {
            let value = value.trim().to_uppercase();
            TRUE_FLAGS.contains(&value.as_str())
        }
    }
}

fn parse_date(raw: &str, warnings: &mut Vec<String>) -> Option<NaiveDate> {
    if raw.is_empty() {
        return None;
    }
    match NaiveDate::parse_from_str(raw, "%d/%m/%Y") {
        Ok(date) => Some(date),
        Err(_) => {
            warnings.push(format!("invalid date {raw:?}"));
            None
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum RowError {
    #[error(transparent)]
    Repository(#[from] EmployeeRepositoryError),
    #[error(transparent)]
    Hash(#[from] PasswordHashError),
    #[error(transparent)]
    Invalid(#[from] EmployeeValidationError),
}

/// Upserts parsed rows into the employee store.
pub struct EmployeeImporter<E, H> {
    employees: Arc<E>,
    hasher: Arc<H>,
    default_password: Zeroizing<String>,
}

impl<E, H> EmployeeImporter<E, H>
where
    E: EmployeeRepository,
    H: PasswordHasher,
{
    pub fn new(employees: Arc<E>, hasher: Arc<H>, default_password: impl Into<String>) -> Self {
        Self {
            employees,
            hasher,
            default_password: Zeroizing::new(default_password.into()),
        }
    }

    /// Import every row of `bytes`.
    ///
    /// Row-level failures are counted and logged; losing the store
    /// connection aborts the run.
    pub async fn import(&self, bytes: &[u8]) -> Result<ImportSummary, ImportError> {
        let text = decode_input(bytes);
        let rows = read_rows(&text)?;
        let mut summary = ImportSummary {
            total: rows.len(),
            ..ImportSummary::default()
        };

        for row in &rows {
            let Some(parsed) = parse_row(row) else {
                warn!(line = row.line, "missing employee id, row skipped");
                summary.skipped += 1;
                continue;
            };
            for warning in &parsed.warnings {
                warn!(line = row.line, employee_id = %parsed.employee.id, %warning, "import warning");
            }
            let id = parsed.employee.id.clone();
            match self.store(parsed.employee).await {
                Ok(UpsertOutcome::Created) => {
                    info!(line = row.line, employee_id = %id, "employee created");
                    summary.created += 1;
                }
                Ok(UpsertOutcome::Updated) => {
                    info!(line = row.line, employee_id = %id, "employee updated");
                    summary.updated += 1;
                }
                Err(RowError::Repository(err @ EmployeeRepositoryError::Connection { .. })) => {
                    return Err(err.into());
                }
                Err(err) => {
                    error!(line = row.line, employee_id = %id, error = %err, "row import failed");
                    summary.errors += 1;
                }
            }
        }
        Ok(summary)
    }

    async fn store(&self, imported: ImportedEmployee) -> Result<UpsertOutcome, RowError> {
        let mut draft = match self.employees.find_by_id(&imported.id).await? {
            Some(existing) => existing.into_draft(),
            None => {
                let mut draft = EmployeeDraft::new(imported.id.clone(), imported.id.as_str());
                draft.password_hash = self.hasher.hash(&self.default_password)?;
                draft
            }
        };
        imported.apply_to(&mut draft);
        let employee = Employee::new(draft)?;
        Ok(self.employees.upsert(&employee).await?)
    }
}
