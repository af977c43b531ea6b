//! Signup, login, logout, and the unpaginated user listing.
//!
//! Every form submission ends in a redirect; failures travel to the next
//! page as flash notifications rather than as error statuses.

use actix_multipart::Multipart;
use actix_web::http::header;
use actix_web::{HttpResponse, get, post, web};
use serde::Deserialize;
use tracing::{error, info, warn};

use super::auth::Authenticated;
use super::redirect::Redirect;
use super::session::SessionContext;
use super::state::HttpState;
use super::upload::read_signup;
use super::views::{LoginView, SignupView, UsersView};
use super::{DASHBOARD_PATH, LOGIN_PATH, MALFORMED_FORM, SIGNUP_PATH};
use crate::domain::LoginForm;

/// Flashed on the login page after an account is created.
pub const SIGNUP_SUCCESS: &str = "Signup successful!";
/// Flashed on the signup page when storage fails.
pub const SIGNUP_FAILED: &str = "Server error/Something Went Wrong";
/// Flashed on the dashboard after a successful login.
pub const LOGIN_SUCCESS: &str = "Login successful!";
/// Flashed on the login page when storage fails.
pub const LOGIN_FAILED: &str = "Server error";
/// Plain-text body returned when the session store cannot end a session.
pub const LOGOUT_FAILED: &str = "Error logging out";
/// Flashed on the login page when the full listing cannot be read.
pub const USERS_FAILED: &str = "Server error";

/// Query accepted by the signup page.
#[derive(Debug, Default, Deserialize)]
pub struct SignupPageQuery {
    /// Notice carried through a redirect that had no session to flash into.
    pub message: Option<String>,
}

/// Landing page; everything starts at signup.
#[get("/")]
pub async fn index() -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, SIGNUP_PATH))
        .finish()
}

/// Signup form, echoing any `message` notice.
#[get("/signup")]
pub async fn signup_page(
    session: SessionContext,
    query: web::Query<SignupPageQuery>,
) -> HttpResponse {
    HttpResponse::Ok().json(SignupView {
        message: query.into_inner().message,
        flash: session.take_flashes(),
    })
}

/// Register an account from a multipart form with an optional `photo`.
#[post("/signup")]
pub async fn signup(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: Multipart,
) -> HttpResponse {
    let submission = match read_signup(payload).await {
        Ok(submission) => submission,
        Err(err) => {
            warn!(error = %err, "signup upload rejected");
            return Redirect::to(SIGNUP_PATH)
                .with_error(err.to_string())
                .respond(&session);
        }
    };

    let redirect = match state.signup.signup(submission.form, submission.avatar).await {
        Ok(_) => Redirect::to(LOGIN_PATH).with_success(SIGNUP_SUCCESS),
        Err(err) if err.is_server_side() => {
            error!(error = %err, "signup failed");
            Redirect::to(SIGNUP_PATH).with_error(SIGNUP_FAILED)
        }
        Err(err) => Redirect::to(SIGNUP_PATH).with_error(err.message()),
    };
    redirect.respond(&session)
}

/// Login form.
#[get("/login")]
pub async fn login_page(session: SessionContext) -> HttpResponse {
    HttpResponse::Ok().json(LoginView {
        flash: session.take_flashes(),
    })
}

/// Authenticate and start a session.
///
/// Validation failures are flashed one message per rule; a body that is
/// not a urlencoded form returns to the form as well.
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: Result<web::Form<LoginForm>, actix_web::Error>,
) -> HttpResponse {
    let form = match form {
        Ok(form) => form.into_inner(),
        Err(err) => {
            warn!(error = %err, "unreadable login form");
            return Redirect::to(LOGIN_PATH)
                .with_error(MALFORMED_FORM)
                .respond(&session);
        }
    };
    let active = match state.login.login(form).await {
        Ok(active) => active,
        Err(err) if err.is_server_side() => {
            error!(error = %err, "login failed");
            return Redirect::to(LOGIN_PATH)
                .with_error(LOGIN_FAILED)
                .respond(&session);
        }
        Err(err) => {
            return err
                .validation_messages()
                .into_iter()
                .fold(Redirect::to(LOGIN_PATH), |redirect, message| {
                    redirect.with_error(message)
                })
                .respond(&session);
        }
    };

    session.renew();
    if let Err(err) = session.persist_token(&active.token) {
        error!(error = %err, "failed to store session token");
        return Redirect::to(LOGIN_PATH)
            .with_error(LOGIN_FAILED)
            .respond(&session);
    }
    Redirect::to(DASHBOARD_PATH)
        .with_success(LOGIN_SUCCESS)
        .respond(&session)
}

/// End the session and clear the cookie.
///
/// Visiting without a session still lands on the login form. The cookie is
/// cleared even when the store fails, so the browser never keeps a token
/// the server may still honour.
#[get("/logout")]
pub async fn logout(state: web::Data<HttpState>, session: SessionContext) -> HttpResponse {
    let token = session.token().unwrap_or_else(|err| {
        warn!(error = %err, "unreadable session cookie at logout");
        None
    });
    if let Some(token) = token {
        if let Err(err) = state.login.logout(&token).await {
            error!(error = %err, "logout failed");
            session.purge();
            return HttpResponse::InternalServerError().body(LOGOUT_FAILED);
        }
    } else {
        info!("logout without an active session");
    }
    session.purge();
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, LOGIN_PATH))
        .finish()
}

/// Every user without pagination, plus the caller's identity.
#[get("/users")]
pub async fn list_all_users(
    state: web::Data<HttpState>,
    session: SessionContext,
    user: Authenticated,
) -> HttpResponse {
    match state.users.all_users().await {
        Ok(users) => {
            let current_user = user.into_inner().identity;
            HttpResponse::Ok().json(UsersView {
                users,
                id: current_user.id,
                current_user,
            })
        }
        Err(err) => {
            error!(error = %err, "listing all users failed");
            Redirect::to(LOGIN_PATH)
                .with_error(USERS_FAILED)
                .respond(&session)
        }
    }
}
