//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`*Service`, `*Query`, `*Command`) are what inbound adapters
//! call. Driven ports (repositories, stores, hashers) are what the domain
//! services call out to. Each driven port returns its own error enum so
//! adapters map failures into predictable variants.

mod macros;
pub(crate) use macros::define_port_error;

mod avatar_store;
mod login_service;
mod password_hasher;
mod session_store;
mod signup_service;
mod user_profile_command;
mod user_profile_query;
mod user_repository;
mod users_query;

#[cfg(test)]
pub use avatar_store::MockAvatarStore;
pub use avatar_store::{AvatarStore, AvatarStoreError};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::LoginService;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use session_store::MockSessionStore;
pub use session_store::{SessionStore, SessionStoreError};
#[cfg(test)]
pub use signup_service::MockSignupService;
pub use signup_service::SignupService;
#[cfg(test)]
pub use user_profile_command::MockUserProfileCommand;
pub use user_profile_command::UserProfileCommand;
#[cfg(test)]
pub use user_profile_query::MockUserProfileQuery;
pub use user_profile_query::UserProfileQuery;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
#[cfg(test)]
pub use users_query::MockUsersQuery;
pub use users_query::UsersQuery;
