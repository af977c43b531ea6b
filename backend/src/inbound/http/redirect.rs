//! Form-flow outcomes: a `303 See Other` plus the notifications to show on
//! the page the browser lands on.
//!
//! Handlers build a [`Redirect`] value and only at the edge is it rendered
//! into session state and headers, so the flow itself stays a plain value
//! that tests can inspect.

use actix_web::HttpResponse;
use actix_web::http::header;
use tracing::error;

use super::session::SessionContext;
use crate::domain::Flash;

/// Redirect instruction with attached notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    location: String,
    flashes: Vec<Flash>,
}

impl Redirect {
    /// Redirect without notifications.
    ///
    /// # Examples
    /// ```
    /// use userdesk::inbound::http::redirect::Redirect;
    ///
    /// let redirect = Redirect::to("/login").with_error("Invalid email address.");
    /// assert_eq!(redirect.location(), "/login");
    /// assert_eq!(redirect.flashes().len(), 1);
    /// ```
    pub fn to(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            flashes: Vec::new(),
        }
    }

    /// Attach an error notification.
    #[must_use]
    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.flashes.push(Flash::error(message));
        self
    }

    /// Attach a success notification.
    #[must_use]
    pub fn with_success(mut self, message: impl Into<String>) -> Self {
        self.flashes.push(Flash::success(message));
        self
    }

    /// Target path.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Notifications in the order they were attached.
    pub fn flashes(&self) -> &[Flash] {
        &self.flashes
    }

    /// Queue the notifications in the session and build the response.
    ///
    /// A notification that cannot be stored is logged and dropped; the
    /// redirect itself still happens.
    pub fn respond(self, session: &SessionContext) -> HttpResponse {
        for flash in self.flashes {
            if let Err(err) = session.push_flash(flash) {
                error!(error = %err, location = %self.location, "failed to queue flash");
            }
        }
        HttpResponse::SeeOther()
            .insert_header((header::LOCATION, self.location))
            .finish()
    }
}
