//! Internal Diesel row structs for the `users` table.
//!
//! These types never leave the persistence layer; the repository converts
//! them to domain records.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{AvatarRef, PasswordHash, User, UserId};

use super::schema::users;

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::from(row.id),
            name: row.name,
            email: row.email,
            phone: row.phone,
            password_hash: PasswordHash::new(row.password_hash),
            avatar: row.avatar.map(AvatarRef::new),
            created_at: row.created_at,
        }
    }
}

/// Insertable struct for new accounts; `created_at` comes from the column
/// default.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub email: &'a str,
    pub phone: &'a str,
    pub password_hash: &'a str,
    pub avatar: Option<&'a str>,
}

/// Changeset for self-service profile edits.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct ProfileUpdateRow<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub phone: &'a str,
}
