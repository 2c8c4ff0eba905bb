//! Request middleware.
//!
//! Purpose: define middleware for request lifecycle concerns such as
//! correlating logs and error responses.

pub mod trace;

pub use trace::Trace;
