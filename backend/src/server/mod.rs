//! Server construction and middleware wiring.

mod config;
mod state_builders;
mod sweeper;

pub use config::ServerConfig;
pub use state_builders::{AppServices, build_services, session_store};
pub use sweeper::{spawn_session_sweeper, sweep_once};

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession, TtlExtensionPolicy},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use chrono::TimeDelta;
use tracing::info;

use crate::Trace;
use crate::inbound::http::configure;
use crate::inbound::http::error::not_found;
use crate::inbound::http::state::HttpState;

/// Cookie carrying the session token and pending flashes.
pub const SESSION_COOKIE_NAME: &str = "session";

/// Everything a single app instance needs.
#[derive(Clone)]
pub struct AppDependencies {
    /// Driving ports for the handlers.
    pub http_state: web::Data<HttpState>,
    /// Cookie signing and encryption key.
    pub key: Key,
    /// Whether the cookie is marked `Secure`.
    pub cookie_secure: bool,
    /// Cookie `SameSite` policy.
    pub same_site: SameSite,
    /// Persistent cookie lifetime; matches the server-side session TTL and
    /// is renewed on every request.
    pub session_ttl: TimeDelta,
}

fn session_middleware(
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
    ttl: TimeDelta,
) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name(SESSION_COOKIE_NAME.into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default()
                .session_ttl(actix_web::cookie::time::Duration::seconds(ttl.num_seconds()))
                // The store slides its expiry on every lookup; the cookie keeps pace.
                .session_ttl_extension_policy(TtlExtensionPolicy::OnEveryRequest),
        )
        .build()
}

/// Build the application: every page route, the session cookie, request
/// tracing, and a JSON 404 for anything unmatched.
pub fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        http_state,
        key,
        cookie_secure,
        same_site,
        session_ttl,
    } = deps;

    App::new()
        .app_data(http_state)
        .wrap(session_middleware(key, cookie_secure, same_site, session_ttl))
        .wrap(Trace)
        .configure(configure)
        .default_service(web::to(not_found))
}

/// Construct an Actix HTTP server from a [`ServerConfig`] and prepared
/// services.
///
/// # Returns
/// A spawned [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(config: ServerConfig, services: &AppServices) -> std::io::Result<Server> {
    let http_state = services.http_state.clone();
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        session_ttl,
        ..
    } = config;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
            session_ttl,
        })
    })
    .bind(bind_addr)?
    .run();

    info!(%bind_addr, "server listening");
    Ok(server)
}
