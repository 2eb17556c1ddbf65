//! Reconciliation services.
//!
//! Each service takes the remote platform as an `Arc<dyn RemotePlatform>`
//! and holds no state between calls.

pub mod agent_status;
pub mod demo_provisioner;
pub mod indexing_trigger;
pub mod naming;
pub mod orphan_reconciler;
pub mod readiness;
pub mod repair_service;

pub use agent_status::{AgentReport, AgentStatusService, KbReport};
pub use demo_provisioner::{DemoProvisioner, DemoResolution};
pub use indexing_trigger::{IndexingTrigger, ReindexReport, ReindexResult, TriggerStatus};
pub use naming::{
    derive_domain_slug, expected_kb_names, parse_kb_name, ExpectedKbNames, NamingResolver,
};
pub use orphan_reconciler::OrphanReconciler;
pub use readiness::is_ready;
pub use repair_service::{RepairFailure, RepairReport, RepairService};

use std::sync::Arc;

use crate::domain::models::Config;
use crate::domain::ports::RemotePlatform;

/// The reconciliation services wired to one platform.
#[derive(Clone)]
pub struct Services {
    pub reconciler: OrphanReconciler,
    pub repair: RepairService,
    pub indexing: IndexingTrigger,
    pub status: AgentStatusService,
}

impl Services {
    pub fn new(config: &Config, platform: Arc<dyn RemotePlatform>) -> Self {
        let reconciler = OrphanReconciler::new(
            platform.clone(),
            NamingResolver::new(config.naming.brand.clone()),
        );
        Self {
            repair: RepairService::new(platform.clone(), reconciler.clone()),
            indexing: IndexingTrigger::new(platform.clone(), reconciler.clone()),
            status: AgentStatusService::new(platform, reconciler.clone()),
            reconciler,
        }
    }
}
