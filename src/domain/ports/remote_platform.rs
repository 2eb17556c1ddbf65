//! Remote platform port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{
    AccessKey, Agent, AgentSpec, IndexingJob, KnowledgeBase, KnowledgeBaseSpec,
};

/// Typed access to the hosted RAG platform.
///
/// Implementations are pure transport: no retries, no caching, no policy.
/// Missing resources are reported as `DomainError::NotFound`, duplicate
/// attachments as `DomainError::Conflict`, anything else as
/// `DomainError::Remote` with the platform's message.
#[async_trait]
pub trait RemotePlatform: Send + Sync {
    /// Fetch a single agent.
    async fn get_agent(&self, id: &str) -> DomainResult<Agent>;

    /// List every agent visible to the credentials.
    async fn list_agents(&self) -> DomainResult<Vec<Agent>>;

    /// Create an agent.
    async fn create_agent(&self, spec: &AgentSpec) -> DomainResult<Agent>;

    /// Fetch a single knowledge base, including its last indexing job.
    async fn get_knowledge_base(&self, id: &str) -> DomainResult<KnowledgeBase>;

    /// List every knowledge base visible to the credentials.
    async fn list_knowledge_bases(&self) -> DomainResult<Vec<KnowledgeBase>>;

    /// Create a knowledge base.
    async fn create_knowledge_base(&self, spec: &KnowledgeBaseSpec) -> DomainResult<KnowledgeBase>;

    /// Attach a knowledge base to an agent, returning the updated agent.
    async fn attach_knowledge_base(&self, agent_id: &str, kb_id: &str) -> DomainResult<Agent>;

    /// Start a new indexing job for a knowledge base.
    async fn start_indexing_job(&self, kb_id: &str) -> DomainResult<IndexingJob>;

    /// Issue a new access key for an agent.
    async fn create_access_key(&self, agent_id: &str, name: &str) -> DomainResult<AccessKey>;
}
