//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` when a migration changes the table.

diesel::table! {
    /// Registered accounts.
    ///
    /// `email` carries the `users_email_key` unique constraint.
    users (id) {
        /// Primary key, generated by the application.
        id -> Uuid,
        /// Display name.
        name -> Varchar,
        /// Login email, unique.
        email -> Varchar,
        /// Free-form phone number.
        phone -> Varchar,
        /// PHC-encoded password hash.
        password_hash -> Varchar,
        /// Stored avatar file name.
        avatar -> Nullable<Varchar>,
        /// Defaults to insertion time.
        created_at -> Timestamptz,
    }
}
