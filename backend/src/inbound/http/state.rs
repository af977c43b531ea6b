//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    LoginService, SignupService, UserProfileCommand, UserProfileQuery, UsersQuery,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Account creation.
    pub signup: Arc<dyn SignupService>,
    /// Login, session resolution, and logout.
    pub login: Arc<dyn LoginService>,
    /// Directory listings.
    pub users: Arc<dyn UsersQuery>,
    /// Reads of the caller's own record.
    pub profile: Arc<dyn UserProfileQuery>,
    /// Profile updates and account deletion.
    pub profile_command: Arc<dyn UserProfileCommand>,
}

impl HttpState {
    /// Construct state from the account and directory services.
    ///
    /// # Examples
    /// ```no_run
    /// use std::path::Path;
    /// use std::sync::Arc;
    ///
    /// use chrono::TimeDelta;
    /// use mockable::DefaultClock;
    /// use userdesk::domain::{AuthPolicy, AuthService, ProfileService};
    /// use userdesk::inbound::http::state::HttpState;
    /// use userdesk::outbound::{
    ///     Argon2PasswordHasher, FilesystemAvatarStore, InMemorySessionStore,
    ///     InMemoryUserRepository,
    /// };
    ///
    /// let clock = Arc::new(DefaultClock);
    /// let users = Arc::new(InMemoryUserRepository::new(clock.clone()));
    /// let sessions = Arc::new(InMemorySessionStore::new(TimeDelta::hours(24), clock.clone()));
    /// let avatars = Arc::new(
    ///     FilesystemAvatarStore::open(Path::new("uploads"), clock).expect("upload dir"),
    /// );
    /// let auth = Arc::new(AuthService::new(
    ///     users.clone(),
    ///     sessions.clone(),
    ///     Arc::new(Argon2PasswordHasher::new()),
    ///     avatars,
    ///     AuthPolicy::default(),
    /// ));
    /// let profiles = Arc::new(ProfileService::new(users, sessions));
    /// let state = HttpState::new(auth, profiles);
    /// let _login = state.login.clone();
    /// ```
    pub fn new<A, P>(auth: Arc<A>, profiles: Arc<P>) -> Self
    where
        A: SignupService + LoginService + 'static,
        P: UsersQuery + UserProfileQuery + UserProfileCommand + 'static,
    {
        Self {
            signup: auth.clone(),
            login: auth,
            users: profiles.clone(),
            profile: profiles.clone(),
            profile_command: profiles,
        }
    }
}
