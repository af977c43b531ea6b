//! HTTP inbound adapter: signup, login, dashboard, and profile pages.
//!
//! Handlers are thin: they decode the request, call a driving port from
//! [`state::HttpState`], and turn the outcome into either a JSON view or a
//! `303 See Other` redirect carrying flash notifications.

pub mod accounts;
pub mod auth;
pub mod dashboard;
pub mod error;
pub mod redirect;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod upload;
pub mod views;

pub use error::ApiResult;

/// Signup form; also the landing page.
pub const SIGNUP_PATH: &str = "/signup";
/// Login form; target of every authentication failure.
pub const LOGIN_PATH: &str = "/login";
/// Paginated user directory.
pub const DASHBOARD_PATH: &str = "/dashboard";
/// The caller's own profile.
pub const PROFILE_PATH: &str = "/profile";
/// Flashed when a form body cannot be decoded at all.
pub const MALFORMED_FORM: &str = "Invalid form submission";

/// Register every page handler on an app or scope.
///
/// # Examples
/// ```no_run
/// use actix_web::App;
/// use userdesk::inbound::http::configure;
///
/// let app = App::new().configure(configure);
/// # let _ = app;
/// ```
pub fn configure(cfg: &mut actix_web::web::ServiceConfig) {
    cfg.service(accounts::index)
        .service(accounts::signup_page)
        .service(accounts::signup)
        .service(accounts::login_page)
        .service(accounts::login)
        .service(accounts::logout)
        .service(accounts::list_all_users)
        .service(dashboard::dashboard)
        .service(dashboard::profile)
        .service(dashboard::update_profile)
        .service(dashboard::delete_account);
}
