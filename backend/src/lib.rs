//! User desk: account signup, session login, and a searchable user
//! directory served over HTTP.

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;
pub mod settings;

pub use domain::TraceId;
pub use middleware::Trace;
