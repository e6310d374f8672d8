//! Employee records.
//!
//! An [`Employee`] is both a login identity and an HR file: directory fields
//! (names, email, department, job title), the reporting link to a manager,
//! leave counters and compensation. Leave counters are stored exactly as
//! supplied; `remaining` is never recomputed from `entitlement`, `used` and
//! `planned`.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Maximum length accepted for an employee identifier.
pub const EMPLOYEE_ID_MAX: usize = 50;

/// Validation errors raised when building employee values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EmployeeValidationError {
    #[error("employee id must not be empty")]
    EmptyId,
    #[error("employee id must be at most {max} characters")]
    IdTooLong { max: usize },
    #[error("employee id must not contain whitespace")]
    IdContainsWhitespace,
    #[error("username must not be empty")]
    EmptyUsername,
    #[error("unknown department: {value}")]
    UnknownDepartment { value: String },
}

/// Stable employee identifier such as `EMP001`.
///
/// The identifier doubles as the manager link stored on direct reports.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmployeeId(String);

impl EmployeeId {
    /// Validate and construct an identifier. Surrounding whitespace is
    /// trimmed.
    ///
    /// # Examples
    /// ```
    /// use hr_assistant::domain::EmployeeId;
    ///
    /// let id = EmployeeId::new(" EMP001 ").expect("valid id");
    /// assert_eq!(id.as_ref(), "EMP001");
    /// assert!(EmployeeId::new("   ").is_err());
    /// ```
    pub fn new(value: impl Into<String>) -> Result<Self, EmployeeValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(EmployeeValidationError::EmptyId);
        }
        if trimmed.chars().count() > EMPLOYEE_ID_MAX {
            return Err(EmployeeValidationError::IdTooLong {
                max: EMPLOYEE_ID_MAX,
            });
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(EmployeeValidationError::IdContainsWhitespace);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the identifier text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for EmployeeId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for EmployeeId {
    type Error = EmployeeValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EmployeeId> for String {
    fn from(value: EmployeeId) -> Self {
        value.0
    }
}

/// Organisational department.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Department {
    #[serde(rename = "IT")]
    It,
    #[serde(rename = "RH")]
    Rh,
    Finance,
    Marketing,
    Ventes,
    Juridique,
    Operations,
    Direction,
    Support,
}

impl Department {
    /// Every department in directory order.
    pub const ALL: [Self; 9] = [
        Self::It,
        Self::Rh,
        Self::Finance,
        Self::Marketing,
        Self::Ventes,
        Self::Juridique,
        Self::Operations,
        Self::Direction,
        Self::Support,
    ];

    /// Label used in listings and storage.
    pub const fn label(self) -> &'static str {
        match self {
            Self::It => "IT",
            Self::Rh => "RH",
            Self::Finance => "Finance",
            Self::Marketing => "Marketing",
            Self::Ventes => "Ventes",
            Self::Juridique => "Juridique",
            Self::Operations => "Operations",
            Self::Direction => "Direction",
            Self::Support => "Support",
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Department {
    type Err = EmployeeValidationError;

    /// Parse a label or a common alias, ignoring case and accents.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let folded = fold_text(value.trim());
        let department = match folded.as_str() {
            "it" | "informatique" | "tech" | "dsi" => Self::It,
            "rh" | "hr" | "ressources humaines" | "human resources" => Self::Rh,
            "finance" | "finances" | "comptabilite" => Self::Finance,
            "marketing" | "communication" => Self::Marketing,
            "ventes" | "vente" | "sales" | "commercial" => Self::Ventes,
            "juridique" | "legal" => Self::Juridique,
            "operations" | "ops" | "logistique" => Self::Operations,
            "direction" | "management" | "executive" => Self::Direction,
            "support" | "service client" => Self::Support,
            _ => {
                return Err(EmployeeValidationError::UnknownDepartment {
                    value: value.to_owned(),
                });
            }
        };
        Ok(department)
    }
}

/// Application role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    #[default]
    User,
}

impl Role {
    /// Storage label.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }

    /// Parse a storage label, treating anything unknown as a regular user.
    pub fn from_label(value: &str) -> Self {
        if value.eq_ignore_ascii_case("admin") {
            Self::Admin
        } else {
            Self::User
        }
    }
}

/// Self-declared sex captured at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
    Other,
}

impl Sex {
    /// Storage label.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Other => "other",
        }
    }
}

impl FromStr for Sex {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            "other" => Ok(Self::Other),
            other => Err(format!("unknown sex value: {other}")),
        }
    }
}

/// Health-insurance plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BenefitsTier {
    #[default]
    Standard,
    Premium,
    Famille,
}

impl BenefitsTier {
    /// Storage label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Standard => "Standard",
            Self::Premium => "Premium",
            Self::Famille => "Famille",
        }
    }

    /// Parse a label exactly; anything unrecognised maps to `Standard`.
    pub fn from_label(value: &str) -> Self {
        match value.trim() {
            "Premium" => Self::Premium,
            "Famille" => Self::Famille,
            _ => Self::Standard,
        }
    }
}

impl fmt::Display for BenefitsTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Annual leave counters, in days.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnualLeave {
    pub entitlement: f64,
    pub used: f64,
    pub planned: f64,
    pub remaining: f64,
}

impl Default for AnnualLeave {
    fn default() -> Self {
        Self {
            entitlement: 25.0,
            used: 0.0,
            planned: 0.0,
            remaining: 25.0,
        }
    }
}

/// Sick leave counters, in days.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SickLeave {
    pub entitlement: f64,
    pub used: f64,
    pub remaining: f64,
}

impl Default for SickLeave {
    fn default() -> Self {
        Self {
            entitlement: 10.0,
            used: 0.0,
            remaining: 10.0,
        }
    }
}

/// Pay and benefits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Compensation {
    pub salary: f64,
    pub bonus_eligible: bool,
    pub next_review_date: Option<NaiveDate>,
    pub benefits_tier: BenefitsTier,
}

impl Default for Compensation {
    fn default() -> Self {
        Self {
            salary: 0.0,
            bonus_eligible: true,
            next_review_date: None,
            benefits_tier: BenefitsTier::Standard,
        }
    }
}

/// Input for [`Employee::new`].
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeDraft {
    pub id: EmployeeId,
    pub username: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub department: Option<Department>,
    pub job_title: String,
    pub manager_id: Option<EmployeeId>,
    pub is_manager: bool,
    pub role: Role,
    pub birth_date: Option<NaiveDate>,
    pub sex: Option<Sex>,
    pub hire_date: Option<NaiveDate>,
    pub annual_leave: AnnualLeave,
    pub sick_leave: SickLeave,
    pub compensation: Compensation,
}

impl EmployeeDraft {
    /// Minimal draft with default counters, useful for registration and
    /// fixtures.
    pub fn new(id: EmployeeId, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            password_hash: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            department: None,
            job_title: String::new(),
            manager_id: None,
            is_manager: false,
            role: Role::User,
            birth_date: None,
            sex: None,
            hire_date: None,
            annual_leave: AnnualLeave::default(),
            sick_leave: SickLeave::default(),
            compensation: Compensation::default(),
        }
    }
}

/// A validated employee record.
#[derive(Debug, Clone, PartialEq)]
pub struct Employee {
    draft: EmployeeDraft,
}

impl Employee {
    /// Validate a draft.
    pub fn new(mut draft: EmployeeDraft) -> Result<Self, EmployeeValidationError> {
        let username = draft.username.trim();
        if username.is_empty() {
            return Err(EmployeeValidationError::EmptyUsername);
        }
        draft.username = username.to_owned();
        draft.first_name = draft.first_name.trim().to_owned();
        draft.last_name = draft.last_name.trim().to_owned();
        draft.email = draft.email.trim().to_owned();
        draft.job_title = draft.job_title.trim().to_owned();
        Ok(Self { draft })
    }

    /// Return the underlying draft for modification.
    pub fn into_draft(self) -> EmployeeDraft {
        self.draft
    }

    pub fn id(&self) -> &EmployeeId {
        &self.draft.id
    }

    pub fn username(&self) -> &str {
        &self.draft.username
    }

    /// Argon2 PHC string; empty when the account cannot log in.
    pub fn password_hash(&self) -> &str {
        &self.draft.password_hash
    }

    pub fn first_name(&self) -> &str {
        &self.draft.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.draft.last_name
    }

    /// First and last name joined by a space, falling back to the username.
    pub fn full_name(&self) -> String {
        let joined = format!("{} {}", self.draft.first_name, self.draft.last_name);
        let trimmed = joined.trim();
        if trimmed.is_empty() {
            self.draft.username.clone()
        } else {
            trimmed.to_owned()
        }
    }

    pub fn email(&self) -> &str {
        &self.draft.email
    }

    pub fn department(&self) -> Option<Department> {
        self.draft.department
    }

    pub fn job_title(&self) -> &str {
        &self.draft.job_title
    }

    /// Identifier of this employee's manager. The link is not enforced and
    /// may point at an identifier that no longer exists.
    pub fn manager_id(&self) -> Option<&EmployeeId> {
        self.draft.manager_id.as_ref()
    }

    pub fn is_manager(&self) -> bool {
        self.draft.is_manager
    }

    pub fn role(&self) -> Role {
        self.draft.role
    }

    pub fn birth_date(&self) -> Option<NaiveDate> {
        self.draft.birth_date
    }

    pub fn sex(&self) -> Option<Sex> {
        self.draft.sex
    }

    pub fn hire_date(&self) -> Option<NaiveDate> {
        self.draft.hire_date
    }

    pub fn annual_leave(&self) -> &AnnualLeave {
        &self.draft.annual_leave
    }

    pub fn sick_leave(&self) -> &SickLeave {
        &self.draft.sick_leave
    }

    pub fn compensation(&self) -> &Compensation {
        &self.draft.compensation
    }

    /// Whether `other` reports directly to this employee.
    pub fn manages(&self, other: &Employee) -> bool {
        other.manager_id() == Some(self.id())
    }
}

/// Render a day count or amount without a trailing `.0`.
///
/// # Examples
/// ```
/// use hr_assistant::domain::format_number;
///
/// assert_eq!(format_number(15.0), "15");
/// assert_eq!(format_number(2.5), "2.5");
/// ```
pub fn format_number(value: f64) -> String {
    format!("{value}")
}

/// Lower-case `value` and strip the French diacritics that matter for
/// keyword matching.
pub fn fold_text(value: &str) -> String {
    value
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'à' | 'â' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'î' | 'ï' => 'i',
            'ô' | 'ö' => 'o',
            'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            '’' => '\'',
            other => other,
        })
        .collect()
}
