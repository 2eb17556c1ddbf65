//! Read-only status report for an agent and its knowledge bases.

use serde::Serialize;
use std::sync::Arc;
use tracing::instrument;

use crate::domain::errors::{require_id, DomainResult};
use crate::domain::models::{Agent, KnowledgeBaseSnapshot, Readiness};
use crate::domain::ports::RemotePlatform;
use crate::services::orphan_reconciler::OrphanReconciler;
use crate::services::readiness::is_ready;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KbReport {
    pub kb_id: String,
    pub snapshot: Option<KnowledgeBaseSnapshot>,
    pub readiness: Option<Readiness>,
    /// Set when the knowledge base could not be fetched
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentReport {
    pub agent: Agent,
    pub domain: Option<String>,
    pub knowledge_bases: Vec<KbReport>,
    pub orphans: Vec<KnowledgeBaseSnapshot>,
}

impl AgentReport {
    /// True when every attached knowledge base is ready and there is at least one.
    pub fn all_ready(&self) -> bool {
        !self.knowledge_bases.is_empty()
            && self
                .knowledge_bases
                .iter()
                .all(|kb| kb.readiness.as_ref().is_some_and(|r| r.ready))
    }
}

#[derive(Clone)]
pub struct AgentStatusService {
    platform: Arc<dyn RemotePlatform>,
    reconciler: OrphanReconciler,
}

impl AgentStatusService {
    pub fn new(platform: Arc<dyn RemotePlatform>, reconciler: OrphanReconciler) -> Self {
        Self {
            platform,
            reconciler,
        }
    }

    /// Fetch the agent and evaluate every attached KB fresh.
    #[instrument(skip(self))]
    pub async fn describe_agent(&self, agent_id: &str) -> DomainResult<AgentReport> {
        require_id("agent", agent_id)?;

        let agent = self.platform.get_agent(agent_id).await?;

        let mut knowledge_bases = Vec::with_capacity(agent.knowledge_base_ids.len());
        for kb_id in &agent.knowledge_base_ids {
            let report = match self.platform.get_knowledge_base(kb_id).await {
                Ok(kb) => KbReport {
                    kb_id: kb_id.clone(),
                    readiness: Some(is_ready(&kb)),
                    snapshot: Some(KnowledgeBaseSnapshot::from(&kb)),
                    error: None,
                },
                Err(err) => KbReport {
                    kb_id: kb_id.clone(),
                    snapshot: None,
                    readiness: None,
                    error: Some(err.to_string()),
                },
            };
            knowledge_bases.push(report);
        }

        let orphans = self
            .reconciler
            .find_orphaned_kbs(&agent)
            .await?
            .iter()
            .map(KnowledgeBaseSnapshot::from)
            .collect();

        Ok(AgentReport {
            domain: self.reconciler.naming().extract_domain(&agent.name),
            agent,
            knowledge_bases,
            orphans,
        })
    }
}
