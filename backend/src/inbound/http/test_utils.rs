//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_http::Request;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{HttpResponse, test, web};

use super::session::SessionContext;
use super::state::HttpState;
use crate::domain::ports::{
    MockLoginService, MockSignupService, MockUserProfileCommand, MockUserProfileQuery,
    MockUsersQuery,
};
use crate::domain::{ActiveSession, Error, SessionIdentity, SessionToken, UserId};

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Session cookie set by a response, if any.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
}

/// `Location` header of a redirect response.
pub fn location<B>(response: &ServiceResponse<B>) -> Option<&str> {
    response
        .headers()
        .get(actix_web::http::header::LOCATION)
        .and_then(|value| value.to_str().ok())
}

/// Mocked driving ports, assembled into an [`HttpState`] for handler tests.
///
/// Ports left untouched panic if a handler calls them, which keeps each test
/// explicit about the use-cases it exercises.
#[derive(Default)]
pub struct MockPorts {
    pub signup: MockSignupService,
    pub login: MockLoginService,
    pub users: MockUsersQuery,
    pub profile: MockUserProfileQuery,
    pub profile_command: MockUserProfileCommand,
}

impl MockPorts {
    /// Wrap the mocks as handler state.
    pub fn into_state(self) -> web::Data<HttpState> {
        web::Data::new(HttpState {
            signup: Arc::new(self.signup),
            login: Arc::new(self.login),
            users: Arc::new(self.users),
            profile: Arc::new(self.profile),
            profile_command: Arc::new(self.profile_command),
        })
    }
}

/// Active session for a fixed test identity.
pub fn active_session() -> ActiveSession {
    ActiveSession {
        token: SessionToken::generate(),
        identity: SessionIdentity {
            id: UserId::random(),
            name: "Ada Lovelace".into(),
            email: "ada@example.com".into(),
            phone: "0123456789".into(),
        },
    }
}

/// Login mock that resolves exactly `session`'s token and nothing else.
pub fn login_resolving(session: &ActiveSession) -> MockLoginService {
    let mut login = MockLoginService::new();
    let active = session.clone();
    login.expect_resolve().returning(move |token| {
        Ok((*token == active.token).then(|| active.clone()))
    });
    login
}

/// Request builder carrying a session cookie that holds `token`.
///
/// The cookie is minted by a throwaway route on the same app, so the app
/// under test must mount [`seed_session`] at `/__seed`.
pub async fn seed_cookie<S, B>(app: &S, token: &SessionToken) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
{
    let request = test::TestRequest::get()
        .uri(&format!("/__seed/{}", token.expose()))
        .to_request();
    let response = test::call_service(app, request).await;
    session_cookie(&response).expect("seed route sets the session cookie")
}

/// Route storing the token from the path in the session cookie.
pub async fn seed_session(
    session: SessionContext,
    token: web::Path<String>,
) -> Result<HttpResponse, Error> {
    let token = SessionToken::parse(token.into_inner())
        .map_err(|err| Error::invalid_request(err.to_string()))?;
    session.persist_token(&token)?;
    Ok(HttpResponse::Ok().finish())
}

const BOUNDARY: &str = "userdesk-test-boundary";

/// Hand-assembled `multipart/form-data` body.
#[derive(Debug, Default)]
pub struct MultipartBody {
    bytes: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a plain text part.
    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.bytes.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    /// Append a file part.
    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, data: &[u8]) -> Self {
        self.bytes.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; \
                 filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.bytes.extend_from_slice(data);
        self.bytes.extend_from_slice(b"\r\n");
        self
    }

    fn finish(mut self) -> Vec<u8> {
        self.bytes
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        self.bytes
    }
}

/// POST request carrying `body` as multipart form data.
pub fn multipart_request(uri: &str, body: MultipartBody) -> test::TestRequest {
    test::TestRequest::post()
        .uri(uri)
        .insert_header((
            actix_web::http::header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .set_payload(body.finish())
}
