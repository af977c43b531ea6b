//! Field rules for the signup, login, and profile-update forms.
//!
//! Each form is a bag of raw strings; absent fields deserialize as empty
//! strings so they fail the relevant rule instead of being rejected by the
//! transport. Validation either yields a normalized value or a non-empty
//! list of [`FieldError`]s in rule-declaration order.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;
use zeroize::Zeroizing;

use super::{Error, LoginCredentials, ProfileChanges};

/// Minimum display name length, in characters.
pub const NAME_MIN_CHARS: usize = 3;
/// Minimum phone number length, in characters.
pub const PHONE_MIN_CHARS: usize = 10;
/// Minimum password length, in characters.
pub const PASSWORD_MIN_CHARS: usize = 6;

const NAME_TOO_SHORT: &str = "Name must be at least 3 characters";
const EMAIL_INVALID: &str = "Invalid email";
const PHONE_TOO_SHORT: &str = "Phone number must be at least 10 characters";
const PASSWORD_TOO_SHORT: &str = "Password must be at least 6 characters";
const LOGIN_EMAIL_INVALID: &str = "Invalid email address.";
const LOGIN_PASSWORD_TOO_SHORT: &str = "Password is too short.";

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Form field a rule applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Display name.
    Name,
    /// Email address.
    Email,
    /// Phone number.
    Phone,
    /// Password.
    Password,
}

impl Field {
    /// Form field name as submitted by the browser.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Password => "password",
        }
    }
}

/// One violated rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldError {
    /// Field the rule applies to.
    pub field: Field,
    /// Human-readable message.
    pub message: &'static str,
}

/// Ordered, non-empty list of violated rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    /// Violations in rule-declaration order.
    pub fn as_slice(&self) -> &[FieldError] {
        &self.0
    }

    /// Messages in rule-declaration order.
    pub fn messages(&self) -> Vec<&'static str> {
        self.0.iter().map(|error| error.message).collect()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.messages().join(", "))
    }
}

impl From<FieldErrors> for Error {
    fn from(value: FieldErrors) -> Self {
        Error::validation(value.messages().into_iter().map(str::to_owned).collect())
    }
}

#[derive(Default)]
struct Rules(Vec<FieldError>);

impl Rules {
    fn min_chars(&mut self, field: Field, value: &str, min: usize, message: &'static str) {
        if value.chars().count() < min {
            self.0.push(FieldError { field, message });
        }
    }

    fn email(&mut self, value: &str, message: &'static str) {
        if !email_regex().is_match(value) {
            self.0.push(FieldError {
                field: Field::Email,
                message,
            });
        }
    }

    fn finish(self) -> Result<(), FieldErrors> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(FieldErrors(self.0))
        }
    }
}

fn identity_rules(rules: &mut Rules, name: &str, email: &str, phone: &str) {
    rules.min_chars(Field::Name, name, NAME_MIN_CHARS, NAME_TOO_SHORT);
    rules.email(email, EMAIL_INVALID);
    rules.min_chars(Field::Phone, phone, PHONE_MIN_CHARS, PHONE_TOO_SHORT);
}

/// Raw signup form fields.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct SignupForm {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Phone number.
    pub phone: String,
    /// Plain-text password.
    pub password: String,
}

impl fmt::Debug for SignupForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupForm")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("phone", &self.phone)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Signup fields that passed every rule.
#[derive(Clone, PartialEq, Eq)]
pub struct SignupDetails {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Phone number.
    pub phone: String,
    /// Plain-text password, wiped on drop.
    pub password: Zeroizing<String>,
}

impl fmt::Debug for SignupDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupDetails")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("phone", &self.phone)
            .finish_non_exhaustive()
    }
}

impl SignupForm {
    /// Apply the signup rules.
    ///
    /// # Examples
    /// ```
    /// use userdesk::domain::SignupForm;
    ///
    /// let form = SignupForm {
    ///     name: "Al".into(),
    ///     email: "a@b.com".into(),
    ///     phone: "1234567890".into(),
    ///     password: "secret".into(),
    /// };
    /// let errors = form.validate().unwrap_err();
    /// assert_eq!(errors.messages(), vec!["Name must be at least 3 characters"]);
    /// ```
    pub fn validate(self) -> Result<SignupDetails, FieldErrors> {
        let mut rules = Rules::default();
        identity_rules(&mut rules, &self.name, &self.email, &self.phone);
        rules.min_chars(
            Field::Password,
            &self.password,
            PASSWORD_MIN_CHARS,
            PASSWORD_TOO_SHORT,
        );
        let password = Zeroizing::new(self.password);
        rules.finish()?;
        Ok(SignupDetails {
            name: self.name,
            email: self.email,
            phone: self.phone,
            password,
        })
    }
}

/// Raw login form fields.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    /// Email address.
    pub email: String,
    /// Plain-text password.
    pub password: String,
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl LoginForm {
    /// Build a form from borrowed values.
    pub fn new(email: &str, password: &str) -> Self {
        Self {
            email: email.to_owned(),
            password: password.to_owned(),
        }
    }

    /// Apply the login rules.
    ///
    /// Messages are keyed by field rather than by rule, so the login page
    /// shows "Invalid email address." and "Password is too short.".
    pub fn validate(self) -> Result<LoginCredentials, FieldErrors> {
        let mut rules = Rules::default();
        rules.email(&self.email, LOGIN_EMAIL_INVALID);
        rules.min_chars(
            Field::Password,
            &self.password,
            PASSWORD_MIN_CHARS,
            LOGIN_PASSWORD_TOO_SHORT,
        );
        let password = Zeroizing::new(self.password);
        rules.finish()?;
        Ok(LoginCredentials::new(self.email, password))
    }
}

/// Raw profile-update form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProfileForm {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Phone number.
    pub phone: String,
}

impl ProfileForm {
    /// Apply the signup identity rules, without the password rule.
    pub fn validate(self) -> Result<ProfileChanges, FieldErrors> {
        let mut rules = Rules::default();
        identity_rules(&mut rules, &self.name, &self.email, &self.phone);
        rules.finish()?;
        Ok(ProfileChanges {
            name: self.name,
            email: self.email,
            phone: self.phone,
        })
    }
}
