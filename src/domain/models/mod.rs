pub mod access_key;
pub mod agent;
pub mod config;
pub mod demo;
pub mod indexing_job;
pub mod knowledge_base;

pub use access_key::AccessKey;
pub use agent::{Agent, AgentSpec, RetrievalSettings};
pub use config::{
    AgentDefaultsConfig, Config, DemoConfig, LoggingConfig, NamingConfig, PlatformConfig,
};
pub use demo::{DemoAgentRecord, ProvisionState, ResolutionTier};
pub use indexing_job::{IndexingJob, JobStatus, Readiness};
pub use knowledge_base::{
    DataSource, DataSourceSpec, KbSourceKind, KnowledgeBase, KnowledgeBaseSnapshot,
    KnowledgeBaseSpec, SNAPSHOT_SCHEMA_VERSION,
};
