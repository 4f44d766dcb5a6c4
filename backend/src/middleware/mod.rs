//! Request middleware.
//!
//! Purpose: attach a request-scoped trace identifier to logs, errors and
//! responses.

pub mod trace;

pub use trace::Trace;
