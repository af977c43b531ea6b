//! Signup, login, and logout orchestration.
//!
//! [`AuthService`] implements the [`SignupService`] and [`LoginService`]
//! driving ports on top of the credential store, the session store, the
//! password hasher, and the avatar store.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use super::port_errors::{
    map_avatar_store_error, map_password_hash_error, map_session_store_error,
    map_user_persistence_error,
};
use super::ports::{
    AvatarStore, LoginService, PasswordHasher, SessionStore, SignupService, UserPersistenceError,
    UserRepository,
};
use super::{
    ActiveSession, AvatarRef, AvatarUpload, Error, LoginForm, NewUser, SessionIdentity, SessionToken,
    SignupForm, UserProfile,
};

/// Message shown when signup hits an existing email.
pub const EMAIL_REGISTERED: &str = "Email is already registered.";
/// Message shown when signup requires an avatar and none was sent.
pub const AVATAR_MISSING: &str = "Please upload an image.";
/// Login failure for an unknown email.
pub const USER_NOT_FOUND: &str = "User not found, Please Signup";
/// Login failure for a wrong password.
pub const INVALID_PASSWORD: &str = "Invalid Password";
/// Login failure used for both cases when enumeration hiding is on.
pub const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Tunable authentication behaviour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuthPolicy {
    /// Reject signups that carry no avatar.
    pub avatar_required: bool,
    /// Report unknown emails and wrong passwords with the same message.
    pub uniform_login_errors: bool,
}

/// Authentication service implementing the signup and login ports.
pub struct AuthService<R, S, H, A> {
    users: Arc<R>,
    sessions: Arc<S>,
    hasher: Arc<H>,
    avatars: Arc<A>,
    policy: AuthPolicy,
}

impl<R, S, H, A> AuthService<R, S, H, A> {
    /// Create a service over the given adapters.
    pub fn new(
        users: Arc<R>,
        sessions: Arc<S>,
        hasher: Arc<H>,
        avatars: Arc<A>,
        policy: AuthPolicy,
    ) -> Self {
        Self {
            users,
            sessions,
            hasher,
            avatars,
            policy,
        }
    }

    /// Remove an avatar whose user record was never written. Failure only
    /// leaves an unreferenced file, so it is logged rather than returned.
    async fn discard_avatar(&self, avatar: &AvatarRef)
    where
        A: AvatarStore,
    {
        if let Err(error) = self.avatars.remove(avatar).await {
            warn!(file = %avatar, %error, "failed to remove orphaned avatar");
        }
    }

    fn login_failure(&self, specific: &'static str) -> Error {
        if self.policy.uniform_login_errors {
            Error::unauthorized(INVALID_CREDENTIALS)
        } else {
            Error::unauthorized(specific)
        }
    }
}

#[async_trait]
impl<R, S, H, A> SignupService for AuthService<R, S, H, A>
where
    R: UserRepository,
    S: SessionStore,
    H: PasswordHasher,
    A: AvatarStore,
{
    async fn signup(
        &self,
        form: SignupForm,
        avatar: Option<AvatarUpload>,
    ) -> Result<UserProfile, Error> {
        let details = form.validate().map_err(|errors| {
            warn!(violations = errors.as_slice().len(), "signup rejected by validation");
            Error::from(errors)
        })?;
        if self.policy.avatar_required && avatar.is_none() {
            return Err(Error::invalid_request(AVATAR_MISSING));
        }

        if self
            .users
            .find_by_email(&details.email)
            .await
            .map_err(map_user_persistence_error)?
            .is_some()
        {
            warn!("signup rejected: email already registered");
            return Err(Error::conflict(EMAIL_REGISTERED));
        }

        let password_hash = self
            .hasher
            .hash(details.password.as_str())
            .await
            .map_err(map_password_hash_error)?;

        let avatar = match avatar {
            Some(upload) => Some(
                self.avatars
                    .save(upload)
                    .await
                    .map_err(map_avatar_store_error)?,
            ),
            None => None,
        };

        let inserted = self
            .users
            .insert(NewUser {
                name: details.name,
                email: details.email,
                phone: details.phone,
                password_hash,
                avatar: avatar.clone(),
            })
            .await;
        let user = match inserted {
            Ok(user) => user,
            Err(error) => {
                if let Some(stored) = &avatar {
                    self.discard_avatar(stored).await;
                }
                return Err(match error {
                    UserPersistenceError::DuplicateEmail => {
                        warn!("signup lost a race on a duplicate email");
                        Error::conflict(EMAIL_REGISTERED)
                    }
                    other => map_user_persistence_error(other),
                });
            }
        };

        info!(user_id = %user.id, "user signed up");
        Ok(user.profile())
    }
}

#[async_trait]
impl<R, S, H, A> LoginService for AuthService<R, S, H, A>
where
    R: UserRepository,
    S: SessionStore,
    H: PasswordHasher,
    A: AvatarStore,
{
    async fn login(&self, form: LoginForm) -> Result<ActiveSession, Error> {
        let credentials = form.validate().map_err(|errors| {
            warn!(violations = errors.as_slice().len(), "login rejected by validation");
            Error::from(errors)
        })?;

        let Some(user) = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(map_user_persistence_error)?
        else {
            warn!("login failed: unknown email");
            return Err(self.login_failure(USER_NOT_FOUND));
        };

        let matches = self
            .hasher
            .verify(credentials.password(), &user.password_hash)
            .await
            .map_err(map_password_hash_error)?;
        if !matches {
            warn!(user_id = %user.id, "login failed: wrong password");
            return Err(self.login_failure(INVALID_PASSWORD));
        }

        let identity = SessionIdentity::from(&user);
        let token = self
            .sessions
            .create(identity.clone())
            .await
            .map_err(map_session_store_error)?;
        info!(user_id = %user.id, session = %token.fingerprint(), "user logged in");
        Ok(ActiveSession { token, identity })
    }

    async fn resolve(&self, token: &SessionToken) -> Result<Option<ActiveSession>, Error> {
        let identity = self
            .sessions
            .get(token)
            .await
            .map_err(map_session_store_error)?;
        Ok(identity.map(|identity| ActiveSession {
            token: token.clone(),
            identity,
        }))
    }

    async fn logout(&self, token: &SessionToken) -> Result<(), Error> {
        self.sessions
            .destroy(token)
            .await
            .map_err(map_session_store_error)?;
        info!(session = %token.fingerprint(), "user logged out");
        Ok(())
    }
}
