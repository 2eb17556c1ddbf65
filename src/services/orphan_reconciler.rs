//! Orphaned knowledge base discovery.

use std::sync::Arc;
use tracing::{debug, instrument};

use crate::domain::errors::DomainResult;
use crate::domain::models::{Agent, KnowledgeBase};
use crate::domain::ports::RemotePlatform;
use crate::services::naming::{ExpectedKbNames, NamingResolver};

/// Finds knowledge bases that belong to an agent by name but are not attached.
///
/// This recovers agents whose attachment metadata was lost or never
/// persisted by an earlier provisioning run.
#[derive(Clone)]
pub struct OrphanReconciler {
    platform: Arc<dyn RemotePlatform>,
    naming: NamingResolver,
}

impl OrphanReconciler {
    pub fn new(platform: Arc<dyn RemotePlatform>, naming: NamingResolver) -> Self {
        Self { platform, naming }
    }

    pub const fn naming(&self) -> &NamingResolver {
        &self.naming
    }

    /// Return the KBs named for `agent`'s domain when the agent has none attached.
    ///
    /// Empty when the agent already reports attachments, or when its name
    /// carries no domain (in which case the platform is not queried).
    /// Duplicate names on the platform are returned as-is.
    #[instrument(skip(self, agent), fields(agent_id = %agent.id))]
    pub async fn find_orphaned_kbs(&self, agent: &Agent) -> DomainResult<Vec<KnowledgeBase>> {
        if agent.has_attachments() {
            debug!(
                attached = agent.knowledge_base_ids.len(),
                "agent reports attachments, nothing orphaned"
            );
            return Ok(Vec::new());
        }

        let Some(expected) = self.naming.expected_names_for_agent(&agent.name) else {
            debug!(name = %agent.name, "agent name carries no domain, cannot reconcile");
            return Ok(Vec::new());
        };

        self.find_by_expected_names(&expected).await
    }

    /// List all KBs and keep those whose name is in `expected`.
    ///
    /// A not-found listing is treated as "nothing to reconcile".
    pub async fn find_by_expected_names(
        &self,
        expected: &ExpectedKbNames,
    ) -> DomainResult<Vec<KnowledgeBase>> {
        let all = match self.platform.list_knowledge_bases().await {
            Ok(all) => all,
            Err(err) if err.is_not_found() => return Ok(Vec::new()),
            Err(err) => return Err(err),
        };

        let orphans: Vec<KnowledgeBase> = all
            .into_iter()
            .filter(|kb| expected.contains(&kb.name))
            .collect();

        debug!(
            found = orphans.len(),
            crawl = %expected.crawl,
            "matched knowledge bases by name"
        );
        Ok(orphans)
    }
}
