//! Domain layer for agentkb
//!
//! Platform resource models, the remote platform port, and domain errors.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DomainError, DomainResult};
