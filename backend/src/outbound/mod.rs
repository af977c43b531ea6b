//! Outbound adapters implementing the driven ports.
//!
//! - **persistence**: PostgreSQL credential store using Diesel ORM
//! - **memory**: process-local credential and session stores
//! - **password**: Argon2id password hashing
//! - **avatars**: filesystem avatar storage
//!
//! Adapters translate between domain types and infrastructure
//! representations and hold no business rules.

pub mod avatars;
pub mod memory;
pub mod password;
pub mod persistence;

pub use avatars::FilesystemAvatarStore;
pub use memory::{InMemorySessionStore, InMemoryUserRepository};
pub use password::Argon2PasswordHasher;
