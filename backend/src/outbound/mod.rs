//! Outbound adapters implementing the domain repository ports.
//!
//! - [`persistence`]: PostgreSQL via Diesel, used when a database URL is
//!   configured.
//! - [`memory`]: an in-process store for development and tests.

pub mod memory;
pub mod persistence;
