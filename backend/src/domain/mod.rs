//! Domain primitives, services, and ports.
//!
//! Purpose: hold the rules of the user desk independently of HTTP and
//! storage. Types here are transport agnostic; adapters under `inbound` and
//! `outbound` translate to and from them.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - User, UserProfile, NewUser, ProfileChanges: credential store records.
//! - SignupForm, LoginForm, ProfileForm: raw forms and their rules.
//! - SessionToken, SessionIdentity, ActiveSession: session lifecycle.
//! - Flash, FlashMessages: one-shot notifications.
//! - UserListQuery: directory search, sort, and paging.
//! - AuthService, ProfileService: implementations of the driving ports.

pub mod auth;
pub mod auth_service;
pub mod avatar;
pub mod error;
pub mod flash;
mod port_errors;
pub mod ports;
pub mod profile_service;
pub mod session;
pub mod trace_id;
pub mod user;
pub mod user_directory;
pub mod validation;

pub use self::auth::{LoginCredentials, PasswordHash};
pub use self::auth_service::{AuthPolicy, AuthService};
pub use self::avatar::{AVATAR_MAX_BYTES, AvatarFormat, AvatarRejection, AvatarUpload};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::flash::{Flash, FlashKind, FlashMessages};
pub use self::profile_service::ProfileService;
pub use self::session::{ActiveSession, SessionIdentity, SessionToken, SessionTokenError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{AvatarRef, NewUser, ProfileChanges, User, UserId, UserIdError, UserProfile};
pub use self::user_directory::{
    DEFAULT_PAGE_LIMIT, SortField, SortOrder, UserListParams, UserListQuery,
};
pub use self::validation::{
    Field, FieldError, FieldErrors, LoginForm, ProfileForm, SignupDetails, SignupForm,
};

/// Convenient result alias for driving ports and handlers.
pub type ApiResult<T> = Result<T, Error>;
