//! Unit tests for session configuration parsing.

use std::collections::HashMap;
use std::io::Write;

use mockable::MockEnv;
use rstest::{fixture, rstest};
use tempfile::NamedTempFile;

use super::*;

fn key_file(len: usize) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create key file");
    file.write_all(&vec![b'a'; len]).expect("write key file");
    file
}

#[fixture]
fn full_key() -> NamedTempFile {
    key_file(SESSION_KEY_MIN_LEN)
}

fn path_of(file: &NamedTempFile) -> String {
    file.path().to_string_lossy().into_owned()
}

fn mock_env(vars: HashMap<&'static str, String>) -> MockEnv {
    let mut env = MockEnv::new();
    env.expect_string()
        .times(0..)
        .returning(move |key| vars.get(key).cloned());
    env
}

fn release_vars(key_path: String) -> HashMap<&'static str, String> {
    HashMap::from([
        (KEY_FILE_ENV, key_path),
        (COOKIE_SECURE_ENV, "1".to_owned()),
        (SAMESITE_ENV, "Strict".to_owned()),
        (ALLOW_EPHEMERAL_ENV, "0".to_owned()),
    ])
}

fn expect_error(result: Result<SessionSettings, SessionConfigError>) -> SessionConfigError {
    match result {
        Ok(settings) => panic!("expected configuration error, got {settings:?}"),
        Err(error) => error,
    }
}

#[rstest]
#[case(COOKIE_SECURE_ENV)]
#[case(SAMESITE_ENV)]
#[case(ALLOW_EPHEMERAL_ENV)]
fn release_requires_every_toggle(full_key: NamedTempFile, #[case] missing: &'static str) {
    let mut vars = release_vars(path_of(&full_key));
    vars.remove(missing);

    let err = expect_error(session_settings_from_env(
        &mock_env(vars),
        BuildMode::Release,
    ));

    assert!(matches!(err, SessionConfigError::MissingEnv { name } if name == missing));
}

#[rstest]
#[case("maybe")]
#[case("")]
fn release_rejects_invalid_cookie_secure(full_key: NamedTempFile, #[case] value: &str) {
    let mut vars = release_vars(path_of(&full_key));
    vars.insert(COOKIE_SECURE_ENV, value.to_owned());

    let err = expect_error(session_settings_from_env(
        &mock_env(vars),
        BuildMode::Release,
    ));

    assert!(matches!(
        err,
        SessionConfigError::InvalidEnv {
            name: COOKIE_SECURE_ENV,
            ..
        }
    ));
}

#[rstest]
fn release_rejects_ephemeral_keys(full_key: NamedTempFile) {
    let mut vars = release_vars(path_of(&full_key));
    vars.insert(ALLOW_EPHEMERAL_ENV, "1".to_owned());

    let err = expect_error(session_settings_from_env(
        &mock_env(vars),
        BuildMode::Release,
    ));

    assert!(matches!(err, SessionConfigError::EphemeralNotAllowed));
}

#[rstest]
fn release_requires_a_readable_key_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let missing = dir.path().join("absent").to_string_lossy().into_owned();

    let err = expect_error(session_settings_from_env(
        &mock_env(release_vars(missing)),
        BuildMode::Release,
    ));

    assert!(matches!(err, SessionConfigError::KeyRead { .. }));
}

#[rstest]
fn release_rejects_short_keys() {
    let short = key_file(32);

    let err = expect_error(session_settings_from_env(
        &mock_env(release_vars(path_of(&short))),
        BuildMode::Release,
    ));

    assert!(matches!(
        err,
        SessionConfigError::KeyTooShort {
            length: 32,
            min_len: SESSION_KEY_MIN_LEN,
            ..
        }
    ));
}

#[rstest]
fn release_rejects_insecure_same_site_none(full_key: NamedTempFile) {
    let mut vars = release_vars(path_of(&full_key));
    vars.insert(COOKIE_SECURE_ENV, "0".to_owned());
    vars.insert(SAMESITE_ENV, "None".to_owned());

    let err = expect_error(session_settings_from_env(
        &mock_env(vars),
        BuildMode::Release,
    ));

    assert!(matches!(err, SessionConfigError::InsecureSameSiteNone));
}

#[rstest]
fn release_accepts_complete_settings(full_key: NamedTempFile) {
    let settings = session_settings_from_env(
        &mock_env(release_vars(path_of(&full_key))),
        BuildMode::Release,
    )
    .expect("valid settings");

    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Strict);
}

#[rstest]
fn same_key_file_yields_same_key(full_key: NamedTempFile) {
    let first = session_settings_from_env(
        &mock_env(release_vars(path_of(&full_key))),
        BuildMode::Release,
    )
    .expect("first load");
    let second = session_settings_from_env(
        &mock_env(release_vars(path_of(&full_key))),
        BuildMode::Release,
    )
    .expect("second load");

    assert_eq!(
        key_fingerprint(&first.key),
        key_fingerprint(&second.key)
    );
}

#[rstest]
fn debug_defaults_suit_plain_http() {
    let dir = tempfile::tempdir().expect("temp dir");
    let missing = dir.path().join("absent").to_string_lossy().into_owned();
    let env = mock_env(HashMap::from([(KEY_FILE_ENV, missing)]));

    let settings =
        session_settings_from_env(&env, BuildMode::Debug).expect("debug defaults succeed");

    assert!(!settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Lax);
}

#[rstest]
fn debug_invalid_same_site_falls_back_to_lax(full_key: NamedTempFile) {
    let mut vars = release_vars(path_of(&full_key));
    vars.insert(SAMESITE_ENV, "unexpected".to_owned());

    let settings = session_settings_from_env(&mock_env(vars), BuildMode::Debug)
        .expect("debug falls back");

    assert_eq!(settings.same_site, SameSite::Lax);
}

#[rstest]
fn debug_tolerates_short_keys() {
    let short = key_file(8);
    let mut vars = release_vars(path_of(&short));
    vars.insert(COOKIE_SECURE_ENV, "0".to_owned());

    let settings =
        session_settings_from_env(&mock_env(vars), BuildMode::Debug).expect("short key in debug");

    assert!(!settings.cookie_secure);
}

#[rstest]
fn reads_the_process_environment(full_key: NamedTempFile) {
    let _guard = env_lock::lock_env(
        release_vars(path_of(&full_key))
            .into_iter()
            .map(|(name, value)| (name, Some(value))),
    );

    let settings = session_settings_from_env(&mockable::DefaultEnv::new(), BuildMode::Release)
        .expect("process environment is complete");

    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Strict);
}
