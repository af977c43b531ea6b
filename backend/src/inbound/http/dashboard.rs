//! Directory dashboard and self-service profile pages.

use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, get, post, web};
use pagination::PageLinks;
use tracing::{error, warn};
use url::Url;

use super::auth::Authenticated;
use super::redirect::Redirect;
use super::session::SessionContext;
use super::state::HttpState;
use super::views::{DashboardView, ProfileView};
use super::{DASHBOARD_PATH, LOGIN_PATH, MALFORMED_FORM, PROFILE_PATH};
use crate::domain::{ErrorCode, ProfileForm, UserListParams, UserListQuery};

/// Flashed on the login page when the directory cannot be read.
pub const DASHBOARD_FAILED: &str = "Error loading dashboard";
/// Flashed on the dashboard when the caller's record cannot be read.
pub const PROFILE_FAILED: &str = "Error loading profile";
/// Flashed on the profile page after a successful update.
pub const PROFILE_UPDATED: &str = "Profile updated successfully!";
/// Flashed on the profile page when storage fails during an update.
pub const UPDATE_FAILED: &str = "Error updating profile";
/// Flashed on the profile page when storage fails during deletion.
pub const DELETE_FAILED: &str = "Error deleting account. Please try again.";
/// Signup page carrying the deletion notice in its query string.
pub const ACCOUNT_DELETED_PATH: &str = "/signup?message=Account%20deleted%20successfully";

/// Paginated, searchable, sortable user directory.
#[get("/dashboard")]
pub async fn dashboard(
    state: web::Data<HttpState>,
    session: SessionContext,
    user: Authenticated,
    params: web::Query<UserListParams>,
    req: HttpRequest,
) -> HttpResponse {
    let query = UserListQuery::from_params(&params);
    let page = match state.users.list_users(&query).await {
        Ok(page) => page,
        Err(err) => {
            error!(error = %err, "dashboard listing failed");
            return Redirect::to(LOGIN_PATH)
                .with_error(DASHBOARD_FAILED)
                .respond(&session);
        }
    };

    let links = request_url(&req)
        .map(|url| PageLinks::build(&url, &page.pagination))
        .unwrap_or_default();
    HttpResponse::Ok().json(DashboardView {
        users: page.items,
        current_user: user.into_inner().identity,
        pagination: page.pagination,
        links,
        search: query.search.unwrap_or_default(),
        sort_by: query.sort_field.as_str(),
        sort_order: query.sort_order.as_str(),
        flash: session.take_flashes(),
    })
}

fn request_url(req: &HttpRequest) -> Option<Url> {
    let target = req
        .uri()
        .path_and_query()
        .map_or("/", |path_and_query| path_and_query.as_str());
    Url::parse("http://localhost/").ok()?.join(target).ok()
}

/// The caller's own record.
#[get("/profile")]
pub async fn profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    user: Authenticated,
) -> HttpResponse {
    match state.profile.fetch_profile(&user.identity.id).await {
        Ok(record) => HttpResponse::Ok().json(ProfileView {
            user: record,
            flash: session.take_flashes(),
        }),
        Err(err) if err.code() == ErrorCode::NotFound => Redirect::to(DASHBOARD_PATH)
            .with_error(err.message())
            .respond(&session),
        Err(err) => {
            error!(error = %err, "profile lookup failed");
            Redirect::to(DASHBOARD_PATH)
                .with_error(PROFILE_FAILED)
                .respond(&session)
        }
    }
}

/// Change name, email, or phone.
#[post("/profile/update")]
pub async fn update_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    user: Authenticated,
    form: Result<web::Form<ProfileForm>, actix_web::Error>,
) -> HttpResponse {
    let form = match form {
        Ok(form) => form.into_inner(),
        Err(err) => {
            warn!(error = %err, "unreadable profile form");
            return Redirect::to(PROFILE_PATH)
                .with_error(MALFORMED_FORM)
                .respond(&session);
        }
    };
    let redirect = match state.profile_command.update_profile(&user, form).await {
        Ok(_) => Redirect::to(PROFILE_PATH).with_success(PROFILE_UPDATED),
        Err(err) if err.is_server_side() => {
            error!(error = %err, "profile update failed");
            Redirect::to(PROFILE_PATH).with_error(UPDATE_FAILED)
        }
        Err(err) => Redirect::to(PROFILE_PATH).with_error(err.message()),
    };
    redirect.respond(&session)
}

/// Remove the caller's account and end their session.
///
/// The confirmation travels in the query string because the cookie that
/// would carry a flash is cleared.
#[post("/profile/delete")]
pub async fn delete_account(
    state: web::Data<HttpState>,
    session: SessionContext,
    user: Authenticated,
) -> HttpResponse {
    match state.profile_command.delete_account(&user).await {
        Ok(()) => {
            session.purge();
            HttpResponse::SeeOther()
                .insert_header((header::LOCATION, ACCOUNT_DELETED_PATH))
                .finish()
        }
        Err(err) if err.code() == ErrorCode::NotFound => Redirect::to(PROFILE_PATH)
            .with_error(err.message())
            .respond(&session),
        Err(err) => {
            error!(error = %err, "account deletion failed");
            Redirect::to(PROFILE_PATH)
                .with_error(DELETE_FAILED)
                .respond(&session)
        }
    }
}
