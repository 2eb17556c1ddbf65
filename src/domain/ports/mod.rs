//! Port trait definitions (Hexagonal Architecture)
//!
//! The domain depends only on these traits; concrete adapters live in
//! `crate::adapters`.

pub mod remote_platform;

pub use remote_platform::RemotePlatform;
