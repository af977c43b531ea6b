//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! The cookie carries only two things: the opaque [`SessionToken`] issued at
//! login, and the flash notifications waiting for the next rendered page.
//! Identities themselves live in the server-side session store.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Error, Flash, FlashMessages, SessionToken};

pub(crate) const SESSION_TOKEN_KEY: &str = "token";
pub(crate) const FLASH_KEY: &str = "flash";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Token presented by the client, if any.
    ///
    /// A token that does not parse is treated as absent.
    pub fn token(&self) -> Result<Option<SessionToken>, Error> {
        let raw = self
            .0
            .get::<String>(SESSION_TOKEN_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        Ok(raw.and_then(|raw| match SessionToken::parse(raw) {
            Ok(token) => Some(token),
            Err(error) => {
                warn!(%error, "invalid session token in cookie");
                None
            }
        }))
    }

    /// Store a freshly issued token in the cookie.
    pub fn persist_token(&self, token: &SessionToken) -> Result<(), Error> {
        self.0
            .insert(SESSION_TOKEN_KEY, token.expose())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Drop the token but keep pending notifications.
    pub fn forget_token(&self) {
        self.0.remove(SESSION_TOKEN_KEY);
    }

    /// Rotate the cookie identifier, used at login.
    pub fn renew(&self) {
        self.0.renew();
    }

    /// Queue a notification for the next rendered page.
    pub fn push_flash(&self, flash: Flash) -> Result<(), Error> {
        let mut pending = self.pending_flashes()?;
        pending.push(flash);
        self.0
            .insert(FLASH_KEY, pending)
            .map_err(|error| Error::internal(format!("failed to persist flash: {error}")))
    }

    /// Consume every pending notification.
    pub fn take_flashes(&self) -> FlashMessages {
        match self.0.remove_as::<Vec<Flash>>(FLASH_KEY) {
            Some(Ok(flashes)) => flashes.into_iter().collect(),
            Some(Err(raw)) => {
                warn!(len = raw.len(), "discarding unreadable flash state");
                FlashMessages::default()
            }
            None => FlashMessages::default(),
        }
    }

    /// Clear the whole cookie.
    pub fn purge(&self) {
        self.0.purge();
    }

    fn pending_flashes(&self) -> Result<Vec<Flash>, Error> {
        Ok(self
            .0
            .get::<Vec<Flash>>(FLASH_KEY)
            .map_err(|error| Error::internal(format!("failed to read flash: {error}")))?
            .unwrap_or_default())
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
