//! Process-local adapters for the credential store and session store.
//!
//! Used when no database URL is configured and throughout the test suites.
//! State lives behind `std::sync::RwLock`; critical sections never await.

mod session_store;
mod user_repository;

pub use session_store::InMemorySessionStore;
pub use user_repository::InMemoryUserRepository;
