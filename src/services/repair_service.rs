//! Repair of agent-to-knowledge-base attachments.

use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::domain::errors::{require_id, DomainResult};
use crate::domain::ports::RemotePlatform;
use crate::services::orphan_reconciler::OrphanReconciler;

/// A knowledge base that could not be attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepairFailure {
    pub kb_id: String,
    pub error: String,
}

/// Outcome of a repair run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RepairReport {
    pub agent_id: String,
    /// Newly attached in this run
    pub attached: Vec<String>,
    /// Already attached (duplicates, or the platform reported a conflict)
    pub already_attached: Vec<String>,
    pub failed: Vec<RepairFailure>,
}

impl RepairReport {
    /// True when the run had nothing to do.
    pub fn is_noop(&self) -> bool {
        self.attached.is_empty() && self.already_attached.is_empty() && self.failed.is_empty()
    }
}

/// Attaches orphaned knowledge bases to their agent.
///
/// Only ever adds attachments; there is no rollback, and a failure on one
/// knowledge base does not stop the rest. Running it again is safe.
#[derive(Clone)]
pub struct RepairService {
    platform: Arc<dyn RemotePlatform>,
    reconciler: OrphanReconciler,
}

impl RepairService {
    pub fn new(platform: Arc<dyn RemotePlatform>, reconciler: OrphanReconciler) -> Self {
        Self {
            platform,
            reconciler,
        }
    }

    #[instrument(skip(self))]
    pub async fn repair(&self, agent_id: &str) -> DomainResult<RepairReport> {
        require_id("agent", agent_id)?;

        let agent = self.platform.get_agent(agent_id).await?;
        let mut attached_set: HashSet<String> = agent.knowledge_base_ids.iter().cloned().collect();
        let orphans = self.reconciler.find_orphaned_kbs(&agent).await?;

        let mut report = RepairReport {
            agent_id: agent_id.to_string(),
            ..RepairReport::default()
        };

        for kb in orphans {
            if attached_set.contains(&kb.id) {
                report.already_attached.push(kb.id);
                continue;
            }

            match self.platform.attach_knowledge_base(agent_id, &kb.id).await {
                Ok(_) => {
                    info!(kb_id = %kb.id, kb_name = %kb.name, "attached orphaned knowledge base");
                    attached_set.insert(kb.id.clone());
                    report.attached.push(kb.id);
                }
                Err(err) if err.is_conflict() => {
                    attached_set.insert(kb.id.clone());
                    report.already_attached.push(kb.id);
                }
                Err(err) => {
                    warn!(kb_id = %kb.id, error = %err, "failed to attach knowledge base");
                    report.failed.push(RepairFailure {
                        kb_id: kb.id,
                        error: err.to_string(),
                    });
                }
            }
        }

        info!(
            attached = report.attached.len(),
            already_attached = report.already_attached.len(),
            failed = report.failed.len(),
            "repair finished"
        );
        Ok(report)
    }
}
