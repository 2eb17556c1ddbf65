//! Demo singleton agent resolution.
//!
//! Resolution walks three tiers, cheapest first, and stops at the first
//! that yields a complete record:
//!
//! 1. static configuration (`demo.endpoint` + `demo.access_key`)
//! 2. the cache artifact written by a warm pass
//! 3. find-or-create on the remote platform, keyed by the agent's name
//!
//! Nothing is kept between calls. Concurrent cold starts may all reach
//! tier 3; they converge because each lists agents by name before
//! creating one. Two callers that both miss the listing can still create
//! duplicates. When that happens every later caller picks the duplicate
//! with the smallest id, so traffic settles on a single agent.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    AgentDefaultsConfig, AgentSpec, Config, DataSourceSpec, DemoAgentRecord, DemoConfig,
    KbSourceKind, KnowledgeBase, KnowledgeBaseSpec, PlatformConfig, ProvisionState,
    ResolutionTier,
};
use crate::domain::ports::RemotePlatform;
use crate::services::naming::{derive_domain_slug, kb_name, NamingResolver};

/// Name given to access keys issued for the demo agent.
pub const DEMO_ACCESS_KEY_NAME: &str = "demo-access";

/// A resolved demo record and how it was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoResolution {
    pub record: DemoAgentRecord,
    pub tier: ResolutionTier,
    /// True when tier 3 had to create the agent
    pub created: bool,
}

#[derive(Clone)]
pub struct DemoProvisioner {
    platform: Option<Arc<dyn RemotePlatform>>,
    naming: NamingResolver,
    demo: DemoConfig,
    platform_config: PlatformConfig,
    agent_defaults: AgentDefaultsConfig,
}

impl DemoProvisioner {
    /// `platform` may be `None` when no credentials are available; tier 3
    /// then fails instead of calling out.
    pub fn new(config: &Config, platform: Option<Arc<dyn RemotePlatform>>) -> Self {
        Self {
            platform,
            naming: NamingResolver::new(config.naming.brand.clone()),
            demo: config.demo.clone(),
            platform_config: config.platform.clone(),
            agent_defaults: config.agent_defaults.clone(),
        }
    }

    /// Resolve the demo agent record.
    ///
    /// Returns `DomainError::Initialization` when every tier is exhausted.
    #[instrument(skip(self))]
    pub async fn resolve(&self) -> DomainResult<DemoResolution> {
        let mut state = ProvisionState::Unconfigured;
        transition(&mut state, ProvisionState::Resolving);

        let mut attempts: Vec<String> = Vec::new();

        if let Some(record) = self.from_static_config() {
            transition(&mut state, ProvisionState::Resolved(ResolutionTier::Env));
            return Ok(DemoResolution {
                record,
                tier: ResolutionTier::Env,
                created: false,
            });
        }
        attempts.push("env: endpoint and access key not configured".to_string());

        let cached = match self.from_cache_file().await {
            Ok(record) if record.is_complete() && self.cache_matches_domain(&record) => {
                transition(&mut state, ProvisionState::Resolved(ResolutionTier::CacheFile));
                return Ok(DemoResolution {
                    record,
                    tier: ResolutionTier::CacheFile,
                    created: false,
                });
            }
            Ok(record) => {
                attempts.push("cache-file: record incomplete or for another domain".to_string());
                Some(record)
            }
            Err(err) => {
                attempts.push(format!("cache-file: {err}"));
                None
            }
        };

        let lazy = match self.demo.domain.as_deref().filter(|d| !d.trim().is_empty()) {
            Some(domain) => self.ensure_demo_agent(domain, cached.as_ref()).await,
            None => Err(DomainError::Config(
                "demo.domain is not set; cannot derive the deployment domain".to_string(),
            )),
        };

        match lazy {
            Ok((record, created)) => {
                transition(&mut state, ProvisionState::Resolved(ResolutionTier::Lazy));
                Ok(DemoResolution {
                    record,
                    tier: ResolutionTier::Lazy,
                    created,
                })
            }
            Err(err) => {
                attempts.push(format!("lazy: {err}"));
                let reason = attempts.join("; ");
                transition(&mut state, ProvisionState::Failed(reason.clone()));
                Err(DomainError::Initialization(reason))
            }
        }
    }

    fn from_static_config(&self) -> Option<DemoAgentRecord> {
        let endpoint = self.demo.endpoint.as_deref().map(str::trim).unwrap_or_default();
        let access_key = self.demo.access_key.as_deref().map(str::trim).unwrap_or_default();
        if endpoint.is_empty() || access_key.is_empty() {
            return None;
        }
        Some(DemoAgentRecord {
            agent_id: self.demo.agent_id.clone(),
            domain: self.demo.domain.clone().unwrap_or_default(),
            endpoint: endpoint.to_string(),
            access_key: access_key.to_string(),
        })
    }

    async fn from_cache_file(&self) -> DomainResult<DemoAgentRecord> {
        let path = Path::new(&self.demo.cache_file);
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| DomainError::Io(format!("{}: {e}", path.display())))?;
        let record: DemoAgentRecord = serde_json::from_str(&raw)?;
        debug!(path = %path.display(), domain = %record.domain, "read demo cache");
        Ok(record)
    }

    /// A cache written for one domain must not serve another.
    fn cache_matches_domain(&self, record: &DemoAgentRecord) -> bool {
        match self.demo.domain.as_deref() {
            Some(domain) if !record.domain.is_empty() => record.domain.eq_ignore_ascii_case(domain),
            _ => true,
        }
    }

    /// Find the agent named for `domain`, or create it with its crawl KB.
    ///
    /// Only the `-crawl` knowledge base is provisioned here. The uploads and
    /// structured KBs are not created; once they exist, orphan repair
    /// attaches them by name. A reused agent with no attachments gets the
    /// crawl KB attached, so a run interrupted before the attach converges
    /// on the next call.
    ///
    /// `cached` is an earlier record whose key may be reused for the same agent.
    /// Returns the record and whether the agent was created.
    #[instrument(skip(self, cached))]
    pub async fn ensure_demo_agent(
        &self,
        domain: &str,
        cached: Option<&DemoAgentRecord>,
    ) -> DomainResult<(DemoAgentRecord, bool)> {
        let platform = self.platform.as_ref().ok_or_else(|| {
            DomainError::Initialization("no platform credentials configured".to_string())
        })?;
        let name = self.naming.agent_display_name(domain);

        let mut matches: Vec<_> = platform
            .list_agents()
            .await?
            .into_iter()
            .filter(|a| a.name == name)
            .collect();
        matches.sort_by(|a, b| a.id.cmp(&b.id));
        if matches.len() > 1 {
            warn!(
                count = matches.len(),
                chosen = %matches[0].id,
                "multiple demo agents share the canonical name"
            );
        }

        if let Some(existing) = matches.into_iter().next() {
            info!(agent_id = %existing.id, "reusing existing demo agent");
            if !existing.has_attachments() {
                warn!(agent_id = %existing.id, "demo agent has no knowledge bases; attaching crawl KB");
                let kb = self.find_or_create_crawl_kb(platform.as_ref(), domain).await?;
                attach_tolerating_conflict(platform.as_ref(), &existing.id, &kb.id).await?;
            }
            let access_key = match self.reusable_key(&existing.id, cached) {
                Some(key) => key,
                None => {
                    platform
                        .create_access_key(&existing.id, DEMO_ACCESS_KEY_NAME)
                        .await?
                        .secret
                }
            };
            let record = self
                .complete_record(
                    platform.as_ref(),
                    existing.id,
                    existing.endpoint,
                    domain,
                    access_key,
                )
                .await?;
            return Ok((record, false));
        }

        info!(%name, "creating demo agent");
        let kb = self.find_or_create_crawl_kb(platform.as_ref(), domain).await?;

        let agent = platform
            .create_agent(&AgentSpec {
                name,
                region: self.platform_config.region.clone(),
                project_id: self.platform_config.project_id.clone(),
                model_id: self.platform_config.model_id.clone(),
                instruction: self.agent_defaults.instruction.clone(),
                description: format!("Demo support agent for {domain}"),
                settings: self.agent_defaults.settings(),
                knowledge_base_ids: Vec::new(),
            })
            .await?;

        if !agent.is_attached(&kb.id) {
            attach_tolerating_conflict(platform.as_ref(), &agent.id, &kb.id).await?;
        }

        let access_key = platform
            .create_access_key(&agent.id, DEMO_ACCESS_KEY_NAME)
            .await?
            .secret;

        let record = self
            .complete_record(platform.as_ref(), agent.id, agent.endpoint, domain, access_key)
            .await?;
        Ok((record, true))
    }

    /// Reuse a configured or cached key when it was issued for `agent_id`.
    ///
    /// A configured key is only trusted when `demo.agent_id` names the same agent.
    fn reusable_key(&self, agent_id: &str, cached: Option<&DemoAgentRecord>) -> Option<String> {
        let configured = self
            .demo
            .access_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .filter(|_| self.demo.agent_id.as_deref() == Some(agent_id));
        if let Some(key) = configured {
            return Some(key.to_string());
        }
        cached
            .filter(|r| r.agent_id.as_deref() == Some(agent_id))
            .map(|r| r.access_key.clone())
            .filter(|k| !k.trim().is_empty())
    }

    async fn find_or_create_crawl_kb(
        &self,
        platform: &dyn RemotePlatform,
        domain: &str,
    ) -> DomainResult<KnowledgeBase> {
        let name = kb_name(&derive_domain_slug(domain), KbSourceKind::Crawl);
        let existing = platform
            .list_knowledge_bases()
            .await?
            .into_iter()
            .filter(|kb| kb.name == name)
            .min_by(|a, b| a.id.cmp(&b.id));
        if let Some(kb) = existing {
            debug!(kb_id = %kb.id, "reusing existing crawl knowledge base");
            return Ok(kb);
        }

        platform
            .create_knowledge_base(&KnowledgeBaseSpec {
                name,
                region: self.platform_config.region.clone(),
                project_id: self.platform_config.project_id.clone(),
                embedding_model_id: self.platform_config.embedding_model_id.clone(),
                data_sources: vec![DataSourceSpec::WebCrawler {
                    base_url: format!("https://{}", domain.trim()),
                }],
            })
            .await
    }

    /// Assemble the record, re-fetching the agent once if the endpoint is not yet known.
    async fn complete_record(
        &self,
        platform: &dyn RemotePlatform,
        agent_id: String,
        endpoint: String,
        domain: &str,
        access_key: String,
    ) -> DomainResult<DemoAgentRecord> {
        let endpoint = if endpoint.trim().is_empty() {
            platform.get_agent(&agent_id).await?.endpoint
        } else {
            endpoint
        };

        let record = DemoAgentRecord {
            agent_id: Some(agent_id),
            domain: domain.to_string(),
            endpoint,
            access_key,
        };
        if !record.is_complete() {
            return Err(DomainError::Initialization(format!(
                "agent {} has no deployment endpoint yet",
                record.agent_id.as_deref().unwrap_or_default()
            )));
        }
        Ok(record)
    }

    /// Run the lazy tier and persist the result as the cache artifact.
    ///
    /// Writes to `path`, or to `demo.cache_file` when `path` is `None`.
    #[instrument(skip(self))]
    pub async fn warm_cache(&self, path: Option<&Path>) -> DomainResult<DemoAgentRecord> {
        let domain = self
            .demo
            .domain
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .ok_or_else(|| DomainError::Config("demo.domain is not set".to_string()))?;

        let (record, created) = self.ensure_demo_agent(domain, None).await?;
        let target = path.map_or_else(|| PathBuf::from(&self.demo.cache_file), Path::to_path_buf);
        write_cache(&target, &record).await?;

        info!(path = %target.display(), created, "demo cache written");
        Ok(record)
    }
}

/// Attach `kb_id` to `agent_id`; an existing attachment counts as success.
async fn attach_tolerating_conflict(
    platform: &dyn RemotePlatform,
    agent_id: &str,
    kb_id: &str,
) -> DomainResult<()> {
    match platform.attach_knowledge_base(agent_id, kb_id).await {
        Ok(_) => Ok(()),
        Err(err) if err.is_conflict() => Ok(()),
        Err(err) => Err(err),
    }
}

fn transition(state: &mut ProvisionState, next: ProvisionState) {
    debug_assert!(state.can_transition_to(&next), "{state} -> {next}");
    debug!(from = %state, to = %next, "demo provisioning state");
    *state = next;
}

/// Write `record` as pretty JSON, creating parent directories.
pub async fn write_cache(path: &Path, record: &DemoAgentRecord) -> DomainResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    let json = serde_json::to_string_pretty(record)?;
    tokio::fs::write(path, json).await?;
    Ok(())
}
