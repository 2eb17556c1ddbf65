//! Re-index fan-out across an agent's knowledge bases.

use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::domain::errors::{require_id, DomainResult};
use crate::domain::models::Readiness;
use crate::domain::ports::RemotePlatform;
use crate::services::orphan_reconciler::OrphanReconciler;
use crate::services::readiness::is_ready;

/// Per-knowledge-base trigger outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerStatus {
    Started,
    Error,
}

/// Result of triggering one knowledge base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReindexResult {
    pub kb_id: String,
    pub kb_name: Option<String>,
    pub status: TriggerStatus,
    pub error: Option<String>,
    pub job_id: Option<String>,
    /// Readiness captured before the job was started
    pub readiness: Readiness,
}

/// Outcome of a re-index run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReindexReport {
    pub agent_id: String,
    /// Whether the KBs came from orphan discovery rather than the attachment set
    pub used_orphan_discovery: bool,
    pub results: Vec<ReindexResult>,
    /// True when at least one job started
    pub success: bool,
}

impl ReindexReport {
    pub fn started(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.status == TriggerStatus::Started)
            .count()
    }
}

/// Starts indexing jobs for every knowledge base of an agent.
///
/// Knowledge bases are processed one after another; a failure is recorded
/// against that knowledge base and the loop continues.
#[derive(Clone)]
pub struct IndexingTrigger {
    platform: Arc<dyn RemotePlatform>,
    reconciler: OrphanReconciler,
}

impl IndexingTrigger {
    pub fn new(platform: Arc<dyn RemotePlatform>, reconciler: OrphanReconciler) -> Self {
        Self {
            platform,
            reconciler,
        }
    }

    #[instrument(skip(self))]
    pub async fn reindex_agent(&self, agent_id: &str) -> DomainResult<ReindexReport> {
        require_id("agent", agent_id)?;

        let agent = self.platform.get_agent(agent_id).await?;

        let (kb_ids, used_orphan_discovery) = if agent.has_attachments() {
            (agent.knowledge_base_ids.clone(), false)
        } else {
            let orphans = self.reconciler.find_orphaned_kbs(&agent).await?;
            (orphans.into_iter().map(|kb| kb.id).collect(), true)
        };

        // The listing may repeat an id; one job per knowledge base.
        let mut seen = HashSet::new();
        let kb_ids: Vec<String> = kb_ids
            .into_iter()
            .filter(|id| seen.insert(id.clone()))
            .collect();

        let mut results = Vec::with_capacity(kb_ids.len());
        for kb_id in kb_ids {
            results.push(self.trigger_one(kb_id).await);
        }

        let report = ReindexReport {
            agent_id: agent_id.to_string(),
            used_orphan_discovery,
            success: results.iter().any(|r| r.status == TriggerStatus::Started),
            results,
        };

        info!(
            total = report.results.len(),
            started = report.started(),
            used_orphan_discovery,
            "reindex finished"
        );
        Ok(report)
    }

    async fn trigger_one(&self, kb_id: String) -> ReindexResult {
        let (kb_name, readiness) = match self.platform.get_knowledge_base(&kb_id).await {
            Ok(kb) => {
                let readiness = is_ready(&kb);
                (Some(kb.name), readiness)
            }
            Err(err) => (
                None,
                Readiness {
                    ready: false,
                    reason: format!("unavailable: {err}"),
                    has_content: false,
                },
            ),
        };

        match self.platform.start_indexing_job(&kb_id).await {
            Ok(job) => {
                info!(kb_id = %kb_id, job_id = %job.id, "indexing job started");
                ReindexResult {
                    kb_id,
                    kb_name,
                    status: TriggerStatus::Started,
                    error: None,
                    job_id: Some(job.id),
                    readiness,
                }
            }
            Err(err) => {
                warn!(kb_id = %kb_id, error = %err, "failed to start indexing job");
                ReindexResult {
                    kb_id,
                    kb_name,
                    status: TriggerStatus::Error,
                    error: Some(err.to_string()),
                    job_id: None,
                    readiness,
                }
            }
        }
    }
}
