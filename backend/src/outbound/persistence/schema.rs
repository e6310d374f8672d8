//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the embedded migrations exactly. When a
//! migration changes a table, update this file by hand or regenerate it with
//! `diesel print-schema` against a migrated database.

diesel::table! {
    /// Employee records and login identities.
    ///
    /// `manager_id` is a loose reference to another employee's `id` and is
    /// not a foreign key.
    employees (id) {
        /// Business identifier such as `EMP001`.
        id -> Varchar,
        /// Unique login name.
        username -> Varchar,
        /// Argon2 PHC string; empty when the account cannot log in.
        password_hash -> Text,
        first_name -> Varchar,
        last_name -> Varchar,
        email -> Varchar,
        /// Department label; null when unassigned.
        department -> Nullable<Varchar>,
        job_title -> Varchar,
        manager_id -> Nullable<Varchar>,
        is_manager -> Bool,
        /// `admin` or `user`.
        role -> Varchar,
        birth_date -> Nullable<Date>,
        /// `male`, `female` or `other`.
        sex -> Nullable<Varchar>,
        hire_date -> Nullable<Date>,
        annual_leave_entitlement -> Float8,
        annual_leave_used -> Float8,
        annual_leave_planned -> Float8,
        annual_leave_remaining -> Float8,
        sick_leave_entitlement -> Float8,
        sick_leave_used -> Float8,
        sick_leave_remaining -> Float8,
        salary -> Float8,
        bonus_eligible -> Bool,
        next_review_date -> Nullable<Date>,
        benefits_tier -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Conversations, owned by one employee.
    chats (id) {
        id -> Uuid,
        /// Owning employee; deleting the employee removes the chat.
        owner_id -> Varchar,
        title -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Chat messages.
    messages (id) {
        id -> Uuid,
        /// Insertion sequence breaking ties between equal timestamps.
        seq -> Int8,
        chat_id -> Uuid,
        /// `user` or `assistant`.
        sender -> Varchar,
        content -> Text,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(chats -> employees (owner_id));
diesel::joinable!(messages -> chats (chat_id));

diesel::allow_tables_to_appear_in_same_query!(employees, chats, messages);
