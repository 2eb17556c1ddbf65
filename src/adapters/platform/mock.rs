//! In-memory platform for tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    AccessKey, Agent, AgentSpec, DataSource, DataSourceSpec, IndexingJob, KnowledgeBase,
    KnowledgeBaseSpec,
};
use crate::domain::ports::RemotePlatform;

/// Operation names used for call counting and failure injection.
pub mod ops {
    pub const GET_AGENT: &str = "get_agent";
    pub const LIST_AGENTS: &str = "list_agents";
    pub const CREATE_AGENT: &str = "create_agent";
    pub const GET_KNOWLEDGE_BASE: &str = "get_knowledge_base";
    pub const LIST_KNOWLEDGE_BASES: &str = "list_knowledge_bases";
    pub const CREATE_KNOWLEDGE_BASE: &str = "create_knowledge_base";
    pub const ATTACH_KNOWLEDGE_BASE: &str = "attach_knowledge_base";
    pub const START_INDEXING_JOB: &str = "start_indexing_job";
    pub const CREATE_ACCESS_KEY: &str = "create_access_key";
}

#[derive(Debug, Default)]
struct MockState {
    /// Insertion-ordered so listings are stable
    agents: Vec<Agent>,
    knowledge_bases: Vec<KnowledgeBase>,
    access_keys: Vec<AccessKey>,
    calls: HashMap<&'static str, usize>,
    /// `(operation, resource id)` → error message
    failures: HashMap<(&'static str, String), String>,
}

/// Mock platform holding agents and knowledge bases in memory.
///
/// Every trait call is counted per operation. Failures can be injected
/// for a specific `(operation, id)` pair; an id of `"*"` matches any.
#[derive(Debug, Clone, Default)]
pub struct MockPlatform {
    state: Arc<RwLock<MockState>>,
}

impl MockPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an agent.
    pub async fn add_agent(&self, agent: Agent) {
        self.state.write().await.agents.push(agent);
    }

    /// Seed a knowledge base.
    pub async fn add_knowledge_base(&self, kb: KnowledgeBase) {
        self.state.write().await.knowledge_bases.push(kb);
    }

    /// Make `op` fail for `id` with `message` until cleared.
    pub async fn fail_on(&self, op: &'static str, id: impl Into<String>, message: impl Into<String>) {
        self.state
            .write()
            .await
            .failures
            .insert((op, id.into()), message.into());
    }

    pub async fn clear_failures(&self) {
        self.state.write().await.failures.clear();
    }

    /// Number of times `op` has been called.
    pub async fn calls(&self, op: &str) -> usize {
        self.state.read().await.calls.get(op).copied().unwrap_or(0)
    }

    /// Number of calls across all operations.
    pub async fn total_calls(&self) -> usize {
        self.state.read().await.calls.values().sum()
    }

    pub async fn agents(&self) -> Vec<Agent> {
        self.state.read().await.agents.clone()
    }

    pub async fn knowledge_bases(&self) -> Vec<KnowledgeBase> {
        self.state.read().await.knowledge_bases.clone()
    }

    pub async fn access_keys(&self) -> Vec<AccessKey> {
        self.state.read().await.access_keys.clone()
    }

    /// Count the call and return the injected failure, if any.
    fn record(state: &mut MockState, op: &'static str, id: &str) -> DomainResult<()> {
        *state.calls.entry(op).or_insert(0) += 1;
        let failure = state
            .failures
            .get(&(op, id.to_string()))
            .or_else(|| state.failures.get(&(op, "*".to_string())));
        match failure {
            Some(message) => Err(DomainError::Remote(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RemotePlatform for MockPlatform {
    async fn get_agent(&self, id: &str) -> DomainResult<Agent> {
        let mut state = self.state.write().await;
        Self::record(&mut state, ops::GET_AGENT, id)?;
        state
            .agents
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or_else(|| DomainError::agent_not_found(id))
    }

    async fn list_agents(&self) -> DomainResult<Vec<Agent>> {
        let mut state = self.state.write().await;
        Self::record(&mut state, ops::LIST_AGENTS, "")?;
        Ok(state.agents.clone())
    }

    async fn create_agent(&self, spec: &AgentSpec) -> DomainResult<Agent> {
        let mut state = self.state.write().await;
        Self::record(&mut state, ops::CREATE_AGENT, &spec.name)?;
        let id = Uuid::new_v4().to_string();
        let agent = Agent {
            endpoint: format!("https://{id}.agents.mock.local"),
            id,
            name: spec.name.clone(),
            region: spec.region.clone(),
            settings: spec.settings,
            knowledge_base_ids: spec.knowledge_base_ids.clone(),
        };
        state.agents.push(agent.clone());
        Ok(agent)
    }

    async fn get_knowledge_base(&self, id: &str) -> DomainResult<KnowledgeBase> {
        let mut state = self.state.write().await;
        Self::record(&mut state, ops::GET_KNOWLEDGE_BASE, id)?;
        state
            .knowledge_bases
            .iter()
            .find(|kb| kb.id == id)
            .cloned()
            .ok_or_else(|| DomainError::kb_not_found(id))
    }

    async fn list_knowledge_bases(&self) -> DomainResult<Vec<KnowledgeBase>> {
        let mut state = self.state.write().await;
        Self::record(&mut state, ops::LIST_KNOWLEDGE_BASES, "")?;
        Ok(state.knowledge_bases.clone())
    }

    async fn create_knowledge_base(&self, spec: &KnowledgeBaseSpec) -> DomainResult<KnowledgeBase> {
        let mut state = self.state.write().await;
        Self::record(&mut state, ops::CREATE_KNOWLEDGE_BASE, &spec.name)?;
        let kb = KnowledgeBase {
            id: Uuid::new_v4().to_string(),
            name: spec.name.clone(),
            region: spec.region.clone(),
            document_count: 0,
            last_indexing_job: None,
            data_sources: spec
                .data_sources
                .iter()
                .map(|s| match s {
                    DataSourceSpec::WebCrawler { base_url } => DataSource::WebCrawler {
                        base_url: base_url.clone(),
                    },
                    DataSourceSpec::Bucket {
                        bucket, item_path, ..
                    } => DataSource::Bucket {
                        bucket: bucket.clone(),
                        item_path: item_path.clone(),
                    },
                })
                .collect(),
        };
        state.knowledge_bases.push(kb.clone());
        Ok(kb)
    }

    async fn attach_knowledge_base(&self, agent_id: &str, kb_id: &str) -> DomainResult<Agent> {
        let mut state = self.state.write().await;
        Self::record(&mut state, ops::ATTACH_KNOWLEDGE_BASE, kb_id)?;
        if !state.knowledge_bases.iter().any(|kb| kb.id == kb_id) {
            return Err(DomainError::kb_not_found(kb_id));
        }
        let agent = state
            .agents
            .iter_mut()
            .find(|a| a.id == agent_id)
            .ok_or_else(|| DomainError::agent_not_found(agent_id))?;
        if agent.is_attached(kb_id) {
            return Err(DomainError::Conflict(format!(
                "knowledge base {kb_id} is already attached to agent {agent_id}"
            )));
        }
        agent.knowledge_base_ids.push(kb_id.to_string());
        Ok(agent.clone())
    }

    async fn start_indexing_job(&self, kb_id: &str) -> DomainResult<IndexingJob> {
        let mut state = self.state.write().await;
        Self::record(&mut state, ops::START_INDEXING_JOB, kb_id)?;
        let kb = state
            .knowledge_bases
            .iter_mut()
            .find(|kb| kb.id == kb_id)
            .ok_or_else(|| DomainError::kb_not_found(kb_id))?;
        let job = IndexingJob {
            id: Uuid::new_v4().to_string(),
            knowledge_base_id: kb_id.to_string(),
            status: "INDEX_JOB_STATUS_PENDING".to_string(),
            phase: "BATCH_JOB_PHASE_PENDING".to_string(),
            tokens: None,
            total_datasources: Some(u32::try_from(kb.data_sources.len()).unwrap_or(u32::MAX)),
            completed_datasources: Some(0),
            started_at: Some(chrono::Utc::now()),
            finished_at: None,
            error: None,
        };
        kb.last_indexing_job = Some(job.clone());
        Ok(job)
    }

    async fn create_access_key(&self, agent_id: &str, name: &str) -> DomainResult<AccessKey> {
        let mut state = self.state.write().await;
        Self::record(&mut state, ops::CREATE_ACCESS_KEY, agent_id)?;
        if !state.agents.iter().any(|a| a.id == agent_id) {
            return Err(DomainError::agent_not_found(agent_id));
        }
        let key = AccessKey {
            id: Uuid::new_v4().to_string(),
            agent_id: agent_id.to_string(),
            name: name.to_string(),
            secret: format!("mock-secret-{}", Uuid::new_v4().simple()),
        };
        state.access_keys.push(key.clone());
        Ok(key)
    }
}
