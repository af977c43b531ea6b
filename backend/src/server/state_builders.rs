//! Builders wiring adapters into the driving ports held by [`HttpState`].

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::info;

use crate::domain::ports::{AvatarStoreError, SessionStore, UserRepository};
use crate::domain::{AuthPolicy, AuthService, ProfileService};
use crate::inbound::http::state::HttpState;
use crate::outbound::persistence::DieselUserRepository;
use crate::outbound::{
    Argon2PasswordHasher, FilesystemAvatarStore, InMemorySessionStore, InMemoryUserRepository,
};

use super::ServerConfig;

/// Handler state plus the session store the sweeper needs.
pub struct AppServices {
    /// Driving ports for the HTTP handlers.
    pub http_state: web::Data<HttpState>,
    /// Server-side session entries.
    pub sessions: Arc<InMemorySessionStore>,
}

/// Adapters shared by every credential store choice.
struct SharedAdapters {
    sessions: Arc<InMemorySessionStore>,
    hasher: Arc<Argon2PasswordHasher>,
    avatars: Arc<FilesystemAvatarStore>,
    policy: AuthPolicy,
}

/// Assemble the auth and profile services over `users`.
fn build_state_with_users<R>(users: Arc<R>, shared: &SharedAdapters) -> HttpState
where
    R: UserRepository + 'static,
{
    let auth = Arc::new(AuthService::new(
        users.clone(),
        shared.sessions.clone(),
        shared.hasher.clone(),
        shared.avatars.clone(),
        shared.policy,
    ));
    let profiles = Arc::new(ProfileService::new(users, shared.sessions.clone()));
    HttpState::new(auth, profiles)
}

/// Build the shared HTTP state, selecting the Diesel credential store when a
/// pool is configured and the in-memory store otherwise.
///
/// # Errors
/// Returns [`AvatarStoreError`] when the upload directory cannot be opened.
pub fn build_services(config: &ServerConfig) -> Result<AppServices, AvatarStoreError> {
    build_services_with_clock(config, Arc::new(DefaultClock))
}

fn build_services_with_clock(
    config: &ServerConfig,
    clock: Arc<dyn Clock>,
) -> Result<AppServices, AvatarStoreError> {
    let shared = SharedAdapters {
        sessions: Arc::new(InMemorySessionStore::new(config.session_ttl, clock.clone())),
        hasher: Arc::new(Argon2PasswordHasher::new()),
        avatars: Arc::new(FilesystemAvatarStore::open(&config.upload_dir, clock.clone())?),
        policy: config.policy,
    };

    let http_state = match &config.db_pool {
        Some(pool) => {
            info!("using PostgreSQL credential store");
            build_state_with_users(Arc::new(DieselUserRepository::new(pool.clone())), &shared)
        }
        None => {
            info!("no database configured; using in-memory credential store");
            build_state_with_users(Arc::new(InMemoryUserRepository::new(clock)), &shared)
        }
    };

    Ok(AppServices {
        http_state: web::Data::new(http_state),
        sessions: shared.sessions,
    })
}

/// Erase the concrete session store type for the sweeper.
pub fn session_store(services: &AppServices) -> Arc<dyn SessionStore> {
    services.sessions.clone()
}
