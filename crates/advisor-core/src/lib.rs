//! Advisor core crate - configuration and shared error types.
//!
//! Everything here is cross-cutting: the TOML configuration loaded by the
//! binary and the top-level error enum that lets `?` cross crate
//! boundaries.

pub mod config;
pub mod error;

pub use config::AdvisorConfig;
pub use error::{AdvisorError, Result};
