//! Backend entry-point: loads settings, wires adapters, and serves pages.

use mockable::DefaultEnv;
use ortho_config::OrthoConfig as _;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use userdesk::domain::AuthPolicy;
use userdesk::inbound::http::session_config::{BuildMode, session_settings_from_env};
use userdesk::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use userdesk::server::{
    ServerConfig, build_services, create_server, session_store, spawn_session_sweeper,
};
use userdesk::settings::AppSettings;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;
    let session_ttl = settings.session_ttl().map_err(std::io::Error::other)?;
    let sweep_interval = settings.sweep_interval().map_err(std::io::Error::other)?;

    let mut config = ServerConfig::new(session, bind_addr)
        .with_session_ttl(session_ttl)
        .with_upload_dir(settings.upload_dir())
        .with_policy(AuthPolicy {
            avatar_required: settings.avatar_required,
            uniform_login_errors: settings.uniform_login_errors,
        });

    if let Some(url) = settings.database_url() {
        run_migrations(url).await.map_err(std::io::Error::other)?;
        let pool = DbPool::new(PoolConfig::new(url))
            .await
            .map_err(std::io::Error::other)?;
        config = config.with_db_pool(pool);
    }

    let services = build_services(&config).map_err(std::io::Error::other)?;
    let sweeper = spawn_session_sweeper(session_store(&services), sweep_interval);

    let result = create_server(config, &services)?.await;
    sweeper.abort();
    info!("server stopped");
    result
}
