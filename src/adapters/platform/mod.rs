//! Remote platform adapters.
//!
//! `client` talks to the real REST API; `mock` keeps everything in memory
//! for tests.

pub mod client;
pub mod mock;
pub mod models;

pub use client::{PlatformClient, PlatformClientConfig};
pub use mock::MockPlatform;
