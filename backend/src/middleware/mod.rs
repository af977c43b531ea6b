//! Request middleware.
//!
//! Purpose: cross-cutting request lifecycle concerns. Currently only request
//! tracing; authentication is an extractor under `inbound::http`.

pub mod trace;

pub use trace::Trace;
