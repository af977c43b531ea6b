//! Shared helpers for in-process HTTP integration tests.
//!
//! The app is assembled exactly as `main` assembles it, over the in-memory
//! credential store and a temporary upload directory.

use std::net::SocketAddr;
use std::path::Path;

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key, SameSite};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{StatusCode, header};
use actix_web::test;
use actix_web::web::Bytes;
use chrono::TimeDelta;
use serde_json::Value;
use userdesk::domain::AuthPolicy;
use userdesk::inbound::http::session_config::SessionSettings;
use userdesk::server::{
    AppDependencies, AppServices, SESSION_COOKIE_NAME, ServerConfig, build_app, build_services,
};

const BOUNDARY: &str = "userdesk-it-boundary";

/// Services wired over the in-memory store with `policy`.
pub fn services(policy: AuthPolicy, uploads: &Path) -> (AppServices, AppDependencies) {
    let key = Key::generate();
    let config = ServerConfig::new(
        SessionSettings {
            key: key.clone(),
            cookie_secure: false,
            same_site: SameSite::Lax,
        },
        SocketAddr::from(([127, 0, 0, 1], 0)),
    )
    .with_upload_dir(uploads)
    .with_policy(policy);
    let services = build_services(&config).expect("services should build");
    let deps = AppDependencies {
        http_state: services.http_state.clone(),
        key,
        cookie_secure: false,
        same_site: SameSite::Lax,
        session_ttl: TimeDelta::hours(24),
    };
    (services, deps)
}

/// Initialised application service.
pub async fn app(
    deps: AppDependencies,
) -> impl Service<Request, Response = ServiceResponse, Error = actix_web::Error> {
    test::init_service(build_app(deps)).await
}

/// Response reduced to what the assertions need.
#[derive(Debug)]
pub struct Reply {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: Bytes,
}

impl Reply {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("JSON body")
    }

    pub fn assert_redirect(&self, target: &str) {
        assert_eq!(self.status, StatusCode::SEE_OTHER, "body: {:?}", self.body);
        assert_eq!(self.location.as_deref(), Some(target));
    }
}

/// Cookie-carrying client that follows the session across requests.
#[derive(Debug, Default, Clone)]
pub struct Browser {
    cookie: Option<Cookie<'static>>,
}

impl Browser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cookie(&self) -> Option<Cookie<'static>> {
        self.cookie.clone()
    }

    pub async fn send<S, B>(&mut self, app: &S, request: test::TestRequest) -> Reply
    where
        S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
        B: MessageBody,
    {
        let request = match &self.cookie {
            Some(cookie) => request.cookie(cookie.clone()),
            None => request,
        };
        let response = test::call_service(app, request.to_request()).await;
        if let Some(cookie) = response
            .response()
            .cookies()
            .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        {
            self.cookie = (!cookie.value().is_empty()).then(|| cookie.into_owned());
        }
        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = test::read_body(response).await;
        Reply {
            status,
            location,
            body,
        }
    }

    pub async fn get<S, B>(&mut self, app: &S, uri: &str) -> Reply
    where
        S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
        B: MessageBody,
    {
        self.send(app, test::TestRequest::get().uri(uri)).await
    }

    pub async fn post_form<S, B>(&mut self, app: &S, uri: &str, form: &[(&str, &str)]) -> Reply
    where
        S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
        B: MessageBody,
    {
        self.send(app, test::TestRequest::post().uri(uri).set_form(form))
            .await
    }

    pub async fn signup<S, B>(&mut self, app: &S, form: SignupParts<'_>) -> Reply
    where
        S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
        B: MessageBody,
    {
        self.send(app, form.into_request()).await
    }

    pub async fn login<S, B>(&mut self, app: &S, email: &str, password: &str) -> Reply
    where
        S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
        B: MessageBody,
    {
        self.post_form(app, "/login", &[("email", email), ("password", password)])
            .await
    }
}

/// Signup fields plus an optional photo part.
#[derive(Debug, Clone, Copy)]
pub struct SignupParts<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub phone: &'a str,
    pub password: &'a str,
    pub photo: Option<(&'a str, &'a str, &'a [u8])>,
}

impl<'a> SignupParts<'a> {
    pub fn new(name: &'a str, email: &'a str) -> Self {
        Self {
            name,
            email,
            phone: "0123456789",
            password: "analytical",
            photo: None,
        }
    }

    fn into_request(self) -> test::TestRequest {
        let mut body = Vec::new();
        for (name, value) in [
            ("name", self.name),
            ("email", self.email),
            ("phone", self.phone),
            ("password", self.password),
        ] {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some((file_name, content_type, bytes)) = self.photo {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"photo\"; \
                     filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        test::TestRequest::post()
            .uri("/signup")
            .insert_header((
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            ))
            .set_payload(body)
    }
}

/// Error flashes shown on `page`.
pub async fn errors_on<S, B>(browser: &mut Browser, app: &S, page: &str) -> Vec<String>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    flashes_on(browser, app, page, "error").await
}

/// Success flashes shown on `page`.
pub async fn successes_on<S, B>(browser: &mut Browser, app: &S, page: &str) -> Vec<String>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    flashes_on(browser, app, page, "success").await
}

async fn flashes_on<S, B>(browser: &mut Browser, app: &S, page: &str, kind: &str) -> Vec<String>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let reply = browser.get(app, page).await;
    assert_eq!(reply.status, StatusCode::OK, "page {page}");
    serde_json::from_value(reply.json()["flash"][kind].clone()).expect("flash list")
}
