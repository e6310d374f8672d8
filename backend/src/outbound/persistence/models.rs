//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions to and from domain types live
//! next to the repositories that use them.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{chats, employees, messages};

/// Row struct for reading from the employees table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = employees)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct EmployeeRow {
    pub id: String,
    pub username: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub department: Option<String>,
    pub job_title: String,
    pub manager_id: Option<String>,
    pub is_manager: bool,
    pub role: String,
    pub birth_date: Option<NaiveDate>,
    pub sex: Option<String>,
    pub hire_date: Option<NaiveDate>,
    pub annual_leave_entitlement: f64,
    pub annual_leave_used: f64,
    pub annual_leave_planned: f64,
    pub annual_leave_remaining: f64,
    pub sick_leave_entitlement: f64,
    pub sick_leave_used: f64,
    pub sick_leave_remaining: f64,
    pub salary: f64,
    pub bonus_eligible: bool,
    pub next_review_date: Option<NaiveDate>,
    pub benefits_tier: String,
}

/// Insertable and changeset struct for employee upserts.
///
/// `id` is the primary key, so the derived changeset leaves it untouched.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = employees)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct EmployeeRecord<'a> {
    pub id: &'a str,
    pub username: &'a str,
    pub password_hash: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub department: Option<&'a str>,
    pub job_title: &'a str,
    pub manager_id: Option<&'a str>,
    pub is_manager: bool,
    pub role: &'a str,
    pub birth_date: Option<NaiveDate>,
    pub sex: Option<&'a str>,
    pub hire_date: Option<NaiveDate>,
    pub annual_leave_entitlement: f64,
    pub annual_leave_used: f64,
    pub annual_leave_planned: f64,
    pub annual_leave_remaining: f64,
    pub sick_leave_entitlement: f64,
    pub sick_leave_used: f64,
    pub sick_leave_remaining: f64,
    pub salary: f64,
    pub bonus_eligible: bool,
    pub next_review_date: Option<NaiveDate>,
    pub benefits_tier: &'a str,
}

// ---------------------------------------------------------------------------
// Chat models
// ---------------------------------------------------------------------------

/// Row struct for reading from the chats table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = chats)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ChatRow {
    pub id: Uuid,
    pub owner_id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating chats.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = chats)]
pub(crate) struct NewChatRow<'a> {
    pub id: Uuid,
    pub owner_id: &'a str,
    pub title: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset for title and activity updates.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = chats)]
pub(crate) struct ChatUpdate<'a> {
    pub title: &'a str,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Message models
// ---------------------------------------------------------------------------

/// Row struct for reading from the messages table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MessageRow {
    pub id: Uuid,
    pub chat_id: Uuid,
    pub sender: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for appending messages; `seq` is assigned by the
/// database.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = messages)]
pub(crate) struct NewMessageRow<'a> {
    pub id: Uuid,
    pub chat_id: Uuid,
    pub sender: &'a str,
    pub content: &'a str,
    pub created_at: DateTime<Utc>,
}
