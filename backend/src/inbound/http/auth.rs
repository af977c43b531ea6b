//! Authentication gate for HTTP handlers.
//!
//! [`Authenticated`] resolves the token in the session cookie against the
//! server-side session store. Requests without a live session fail with
//! [`ErrorCode::Unauthorized`](crate::domain::ErrorCode::Unauthorized),
//! which the error adapter renders as a redirect to the login form.

use std::ops::Deref;

use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;
use tracing::debug;

use super::session::SessionContext;
use super::state::HttpState;
use crate::domain::{ActiveSession, Error};

/// Message carried by the unauthorised error; never shown to users.
pub const LOGIN_REQUIRED: &str = "login required";

/// Extractor for routes that need a logged-in user.
#[derive(Debug, Clone)]
pub struct Authenticated(ActiveSession);

impl Authenticated {
    /// Unwrap the resolved session.
    pub fn into_inner(self) -> ActiveSession {
        self.0
    }
}

impl Deref for Authenticated {
    type Target = ActiveSession;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Resolve the cookie token to a live session.
///
/// Stale tokens are removed from the cookie so later requests skip the
/// store lookup.
pub async fn resolve_session(
    session: &SessionContext,
    state: &HttpState,
) -> Result<ActiveSession, Error> {
    let token = session
        .token()?
        .ok_or_else(|| Error::unauthorized(LOGIN_REQUIRED))?;
    match state.login.resolve(&token).await? {
        Some(active) => Ok(active),
        None => {
            debug!(session = %token.fingerprint(), "session expired or revoked");
            session.forget_token();
            Err(Error::unauthorized(LOGIN_REQUIRED))
        }
    }
}

impl FromRequest for Authenticated {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let session = SessionContext::from_request(req, payload);
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        Box::pin(async move {
            let session = session.await?;
            let state = state.ok_or_else(|| Error::internal("HTTP state is not registered"))?;
            resolve_session(&session, &state).await.map(Authenticated)
        })
    }
}
