//! agentkb - support agent and knowledge base reconciliation
//!
//! Keeps support agents on a hosted RAG platform consistent with the
//! knowledge bases provisioned for them: finds knowledge bases that lost
//! their attachment, re-attaches them, triggers re-indexing, evaluates
//! readiness, and resolves a single shared demo agent.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): models, errors and the `RemotePlatform` port
//! - **Service Layer** (`services`): reconciliation logic over the port
//! - **Adapters** (`adapters`): HTTP platform client and an in-memory mock
//! - **Infrastructure Layer** (`infrastructure`): configuration and logging
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use agentkb::{ConfigLoader, PlatformClient, Services};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ConfigLoader::load()?;
//!     let platform = Arc::new(PlatformClient::from_config(&config.platform)?);
//!     let report = Services::new(&config, platform).repair.repair("agent-id").await?;
//!     println!("attached {:?}", report.attached);
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use adapters::platform::{MockPlatform, PlatformClient, PlatformClientConfig};
pub use domain::errors::{DomainError, DomainResult};
pub use domain::models::{
    AccessKey, Agent, AgentSpec, Config, DemoAgentRecord, IndexingJob, JobStatus, KbSourceKind,
    KnowledgeBase, KnowledgeBaseSnapshot, Readiness, ResolutionTier, RetrievalSettings,
};
pub use domain::ports::RemotePlatform;
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{
    derive_domain_slug, expected_kb_names, is_ready, DemoProvisioner, DemoResolution,
    NamingResolver, OrphanReconciler, RepairReport, RepairService, ReindexReport, Services,
};
