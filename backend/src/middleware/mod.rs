//! Request middleware.
//!
//! Holds cross-cutting request lifecycle components; currently only request
//! tracing.

pub mod trace;

pub use trace::Trace;
