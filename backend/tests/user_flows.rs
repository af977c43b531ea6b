//! End-to-end page flows over the in-memory adapters.
//!
//! Each test drives the fully wired app (session cookie, tracing, every
//! route) through `actix_web::test`, following redirects by hand the way a
//! browser would.

mod support;

use std::collections::HashSet;

use actix_web::http::StatusCode;
use rstest::{fixture, rstest};
use serde_json::Value;
use tempfile::TempDir;
use userdesk::domain::AuthPolicy;
use userdesk::server::{session_store, sweep_once};

use support::{Browser, SignupParts, app, errors_on, services, successes_on};

const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

#[fixture]
fn uploads() -> TempDir {
    tempfile::tempdir().expect("upload dir")
}

fn emails(page: &Value) -> Vec<String> {
    page["users"]
        .as_array()
        .expect("users array")
        .iter()
        .map(|user| user["email"].as_str().expect("email").to_owned())
        .collect()
}

#[rstest]
#[actix_web::test]
async fn account_lifecycle_from_signup_to_deletion(uploads: TempDir) {
    let (_services, deps) = services(AuthPolicy::default(), uploads.path());
    let app = app(deps).await;
    let mut browser = Browser::new();

    let signup = SignupParts {
        photo: Some(("me.png", "image/png", PNG_BYTES)),
        ..SignupParts::new("Ada Lovelace", "ada@example.com")
    };
    browser.signup(&app, signup).await.assert_redirect("/login");
    assert_eq!(
        successes_on(&mut browser, &app, "/login").await,
        vec!["Signup successful!"]
    );
    let stored = std::fs::read_dir(uploads.path()).expect("uploads").count();
    assert_eq!(stored, 1);

    browser
        .login(&app, "ada@example.com", "analytical")
        .await
        .assert_redirect("/dashboard");
    let dashboard = browser.get(&app, "/dashboard").await;
    assert_eq!(dashboard.status, StatusCode::OK);
    let page = dashboard.json();
    assert_eq!(emails(&page), vec!["ada@example.com"]);
    assert!(page["users"][0]["avatar"].as_str().is_some_and(|name| name.ends_with(".png")));
    assert!(page["users"][0].get("password").is_none());
    assert_eq!(page["currentUser"]["name"], "Ada Lovelace");
    assert_eq!(page["flash"]["success"][0], "Login successful!");

    browser
        .post_form(
            &app,
            "/profile/update",
            &[
                ("name", "Ada King"),
                ("email", "countess@example.com"),
                ("phone", "0987654321"),
            ],
        )
        .await
        .assert_redirect("/profile");
    let profile = browser.get(&app, "/profile").await.json();
    assert_eq!(profile["user"]["name"], "Ada King");
    assert_eq!(profile["user"]["email"], "countess@example.com");
    assert_eq!(profile["flash"]["success"][0], "Profile updated successfully!");
    let dashboard = browser.get(&app, "/dashboard").await.json();
    assert_eq!(dashboard["currentUser"]["name"], "Ada King");

    browser
        .post_form(&app, "/profile/delete", &[])
        .await
        .assert_redirect("/signup?message=Account%20deleted%20successfully");
    assert!(browser.cookie().is_none());
    let signup_page = browser
        .get(&app, "/signup?message=Account%20deleted%20successfully")
        .await
        .json();
    assert_eq!(signup_page["message"], "Account deleted successfully");

    browser.get(&app, "/dashboard").await.assert_redirect("/login");
    browser
        .login(&app, "countess@example.com", "analytical")
        .await
        .assert_redirect("/login");
    assert_eq!(
        errors_on(&mut browser, &app, "/login").await,
        vec!["User not found, Please Signup"]
    );
}

#[rstest]
#[actix_web::test]
async fn logout_invalidates_the_server_side_session(uploads: TempDir) {
    let (_services, deps) = services(AuthPolicy::default(), uploads.path());
    let app = app(deps).await;
    let mut browser = Browser::new();
    browser
        .signup(&app, SignupParts::new("Grace Hopper", "grace@example.com"))
        .await;
    browser.login(&app, "grace@example.com", "analytical").await;
    let stolen = browser.clone();

    browser.get(&app, "/logout").await.assert_redirect("/login");

    let mut replay = stolen;
    replay.get(&app, "/dashboard").await.assert_redirect("/login");
    browser.get(&app, "/profile").await.assert_redirect("/login");
}

#[rstest]
#[actix_web::test]
async fn deleting_an_account_ends_its_sessions_everywhere(uploads: TempDir) {
    let (_services, deps) = services(AuthPolicy::default(), uploads.path());
    let app = app(deps).await;
    let mut laptop = Browser::new();
    laptop
        .signup(&app, SignupParts::new("Ada Lovelace", "ada@example.com"))
        .await;
    laptop.login(&app, "ada@example.com", "analytical").await;
    let mut phone = Browser::new();
    phone
        .login(&app, "ada@example.com", "analytical")
        .await
        .assert_redirect("/dashboard");
    let mut bystander = Browser::new();
    bystander
        .signup(&app, SignupParts::new("Grace Hopper", "grace@example.com"))
        .await;
    bystander.login(&app, "grace@example.com", "analytical").await;

    laptop
        .post_form(&app, "/profile/delete", &[])
        .await
        .assert_redirect("/signup?message=Account%20deleted%20successfully");

    phone.get(&app, "/dashboard").await.assert_redirect("/login");
    phone
        .post_form(
            &app,
            "/profile/update",
            &[
                ("name", "Ghost"),
                ("email", "ghost@example.com"),
                ("phone", "0987654321"),
            ],
        )
        .await
        .assert_redirect("/login");
    assert_eq!(
        bystander.get(&app, "/dashboard").await.status,
        StatusCode::OK
    );
}

#[rstest]
#[actix_web::test]
async fn dashboard_pages_cover_every_user_once(uploads: TempDir) {
    let (_services, deps) = services(AuthPolicy::default(), uploads.path());
    let app = app(deps).await;
    let mut browser = Browser::new();
    for (name, email) in [
        ("Dana Scully", "dana@example.com"),
        ("Alan Turing", "alan@example.com"),
        ("Carl Sagan", "carl@example.com"),
        ("Barbara Liskov", "barbara@example.com"),
    ] {
        browser
            .signup(&app, SignupParts::new(name, email))
            .await
            .assert_redirect("/login");
    }
    browser.login(&app, "alan@example.com", "analytical").await;

    let first = browser.get(&app, "/dashboard?limit=3").await.json();
    assert_eq!(first["pagination"]["totalItems"], 4);
    assert_eq!(first["pagination"]["totalPages"], 2);
    assert_eq!(first["pagination"]["hasPrevPage"], false);
    let next = first["links"]["next"].as_str().expect("next link").to_owned();
    assert_eq!(next, "/dashboard?limit=3&page=2");
    let second = browser.get(&app, &next).await.json();
    assert_eq!(second["pagination"]["hasNextPage"], false);

    let mut seen = emails(&first);
    seen.extend(emails(&second));
    assert_eq!(
        seen,
        vec![
            "alan@example.com",
            "barbara@example.com",
            "carl@example.com",
            "dana@example.com",
        ]
    );
    assert_eq!(seen.iter().collect::<HashSet<_>>().len(), 4);

    let sorted = browser
        .get(&app, "/dashboard?sortBy=email&sortOrder=desc&limit=2")
        .await
        .json();
    assert_eq!(
        emails(&sorted),
        vec!["dana@example.com", "carl@example.com"]
    );
    assert_eq!(sorted["sortBy"], "email");
    assert_eq!(sorted["sortOrder"], "desc");

    let searched = browser.get(&app, "/dashboard?search=TURING").await.json();
    assert_eq!(emails(&searched), vec!["alan@example.com"]);
    assert_eq!(searched["search"], "TURING");

    let beyond = browser.get(&app, "/dashboard?page=9").await.json();
    assert_eq!(emails(&beyond), Vec::<String>::new());
    assert_eq!(beyond["pagination"]["totalItems"], 4);
}

#[rstest]
#[case(SignupParts::new("Al", "al@example.com"), "Name must be at least 3 characters")]
#[case(
    SignupParts { phone: "123", password: "abc", ..SignupParts::new("Alan", "not-an-email") },
    "Invalid email, Phone number must be at least 10 characters, Password must be at least 6 characters"
)]
#[case(
    SignupParts { photo: Some(("cat.gif", "image/gif", b"GIF89a")), ..SignupParts::new("Alan", "alan@example.com") },
    "Only JPEG and PNG files are allowed"
)]
#[actix_web::test]
async fn rejected_signups_explain_themselves(
    uploads: TempDir,
    #[case] form: SignupParts<'static>,
    #[case] expected: &str,
) {
    let (_services, deps) = services(AuthPolicy::default(), uploads.path());
    let app = app(deps).await;
    let mut browser = Browser::new();

    browser.signup(&app, form).await.assert_redirect("/signup");

    assert_eq!(errors_on(&mut browser, &app, "/signup").await, vec![expected]);
    browser
        .login(&app, form.email, form.password)
        .await
        .assert_redirect("/login");
}

#[rstest]
#[actix_web::test]
async fn duplicate_email_is_refused(uploads: TempDir) {
    let (_services, deps) = services(AuthPolicy::default(), uploads.path());
    let app = app(deps).await;
    let mut browser = Browser::new();
    browser
        .signup(&app, SignupParts::new("Ada Lovelace", "ada@example.com"))
        .await;

    browser
        .signup(&app, SignupParts::new("Ada Again", "ada@example.com"))
        .await
        .assert_redirect("/signup");

    assert_eq!(
        errors_on(&mut browser, &app, "/signup").await,
        vec!["Email is already registered."]
    );
}

#[rstest]
#[actix_web::test]
async fn login_failures_are_distinct_by_default(uploads: TempDir) {
    let (_services, deps) = services(AuthPolicy::default(), uploads.path());
    let app = app(deps).await;
    let mut browser = Browser::new();
    browser
        .signup(&app, SignupParts::new("Ada Lovelace", "ada@example.com"))
        .await;

    browser.login(&app, "ada@example.com", "wrong-password").await;
    assert_eq!(
        errors_on(&mut browser, &app, "/login").await,
        vec!["Invalid Password"]
    );
    browser.login(&app, "nobody@example.com", "whatever").await;
    assert_eq!(
        errors_on(&mut browser, &app, "/login").await,
        vec!["User not found, Please Signup"]
    );
    browser.login(&app, "nope", "x").await;
    assert_eq!(
        errors_on(&mut browser, &app, "/login").await,
        vec!["Invalid email address.", "Password is too short."]
    );
}

#[rstest]
#[actix_web::test]
async fn uniform_login_errors_hide_which_part_failed(uploads: TempDir) {
    let policy = AuthPolicy {
        uniform_login_errors: true,
        ..AuthPolicy::default()
    };
    let (_services, deps) = services(policy, uploads.path());
    let app = app(deps).await;
    let mut browser = Browser::new();
    browser
        .signup(&app, SignupParts::new("Ada Lovelace", "ada@example.com"))
        .await;

    browser.login(&app, "ada@example.com", "wrong-password").await;
    let wrong_password = errors_on(&mut browser, &app, "/login").await;
    browser.login(&app, "nobody@example.com", "whatever").await;
    let unknown_user = errors_on(&mut browser, &app, "/login").await;

    assert_eq!(wrong_password, vec!["Invalid email or password"]);
    assert_eq!(wrong_password, unknown_user);
}

#[rstest]
#[actix_web::test]
async fn non_form_bodies_are_bounced_back_with_a_notice(uploads: TempDir) {
    let (_services, deps) = services(AuthPolicy::default(), uploads.path());
    let app = app(deps).await;
    let mut browser = Browser::new();

    browser
        .send(
            &app,
            actix_web::test::TestRequest::post()
                .uri("/login")
                .set_json(serde_json::json!({"email": "ada@example.com"})),
        )
        .await
        .assert_redirect("/login");

    assert_eq!(
        errors_on(&mut browser, &app, "/login").await,
        vec!["Invalid form submission"]
    );
}

#[rstest]
#[actix_web::test]
async fn required_avatar_is_enforced(uploads: TempDir) {
    let policy = AuthPolicy {
        avatar_required: true,
        ..AuthPolicy::default()
    };
    let (_services, deps) = services(policy, uploads.path());
    let app = app(deps).await;
    let mut browser = Browser::new();

    browser
        .signup(&app, SignupParts::new("Ada Lovelace", "ada@example.com"))
        .await
        .assert_redirect("/signup");

    assert_eq!(
        errors_on(&mut browser, &app, "/signup").await,
        vec!["Please upload an image."]
    );
}

#[rstest]
#[actix_web::test]
async fn landing_and_unknown_pages(uploads: TempDir) {
    let (_services, deps) = services(AuthPolicy::default(), uploads.path());
    let app = app(deps).await;
    let mut browser = Browser::new();

    browser.get(&app, "/").await.assert_redirect("/signup");
    let missing = browser.get(&app, "/no/such/page").await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.json()["message"], "Page not found");
}

#[rstest]
#[actix_web::test]
async fn sweeping_keeps_live_sessions(uploads: TempDir) {
    let (services, deps) = services(AuthPolicy::default(), uploads.path());
    let app = app(deps).await;
    let mut browser = Browser::new();
    browser
        .signup(&app, SignupParts::new("Ada Lovelace", "ada@example.com"))
        .await;
    browser.login(&app, "ada@example.com", "analytical").await;

    assert_eq!(sweep_once(session_store(&services).as_ref()).await, 0);

    assert_eq!(browser.get(&app, "/dashboard").await.status, StatusCode::OK);
}
