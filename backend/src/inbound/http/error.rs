//! HTTP adapter mapping for domain errors.
//!
//! Form flows turn failures into redirects with flash notifications
//! themselves. What escapes a handler lands here: a missing session becomes
//! a redirect to the login form, anything else a JSON error page with
//! server-side detail redacted.

use actix_web::http::{StatusCode, header};
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use tracing::error;

use super::LOGIN_PATH;
use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

/// Text shown in place of server-side failure detail.
pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::SEE_OTHER,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn redact_if_server_side(error: &Error) -> Error {
    if !error.is_server_side() {
        return error.clone();
    }
    let mut redacted = Error::new(error.code(), GENERIC_FAILURE);
    if let Some(id) = error.trace_id() {
        redacted = redacted.with_trace_id(id.to_owned());
    }
    redacted
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        if self.code() == ErrorCode::Unauthorized {
            return builder
                .insert_header((header::LOCATION, LOGIN_PATH))
                .finish();
        }
        if self.is_server_side() {
            error!(code = ?self.code(), message = %self.message(), "request failed");
        }

        builder.json(redact_if_server_side(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        // Do not leak implementation details to clients.
        error!(error = %err, "actix error promoted to domain error");
        Error::internal(GENERIC_FAILURE)
    }
}

/// Fallback for unmatched routes.
pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(json!({ "message": "Page not found" }))
}
