//! Platform HTTP client with rate limiting.
//!
//! Wraps the platform's REST API, providing typed methods for every
//! operation the reconciliation services need. Requests share a
//! client-side rate limiter so bursts from a single invocation stay
//! within the platform's quota.

use std::fmt;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    AccessKey, Agent, AgentSpec, IndexingJob, KnowledgeBase, KnowledgeBaseSpec, PlatformConfig,
};
use crate::domain::ports::RemotePlatform;

use super::models::{
    AgentEnvelope, AgentsPage, ApiKeyEnvelope, CreateAgentRequest, CreateApiKeyRequest,
    CreateKnowledgeBaseRequest, IndexingJobEnvelope, KnowledgeBaseEnvelope, KnowledgeBasesPage,
    StartIndexingJobRequest, WireLinks,
};

/// Upper bound on pages fetched by a single list call.
const MAX_PAGES: u32 = 1000;

/// Configuration for the platform HTTP client
#[derive(Clone)]
pub struct PlatformClientConfig {
    pub base_url: String,
    pub api_token: String,
    pub requests_per_second: u32,
    pub timeout_secs: u64,
    pub page_size: u32,
}

impl fmt::Debug for PlatformClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlatformClientConfig")
            .field("base_url", &self.base_url)
            .field("requests_per_second", &self.requests_per_second)
            .field("timeout_secs", &self.timeout_secs)
            .field("page_size", &self.page_size)
            .finish_non_exhaustive()
    }
}

impl PlatformClientConfig {
    /// Build client settings from loaded configuration.
    ///
    /// Returns `Err` if no API token is configured.
    pub fn from_platform_config(config: &PlatformConfig) -> DomainResult<Self> {
        let api_token = config
            .api_token
            .clone()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| {
                DomainError::Config(
                    "platform.api_token is not set (use AGENTKB_PLATFORM__API_TOKEN)".to_string(),
                )
            })?;

        Ok(Self {
            base_url: config.base_url.clone(),
            api_token,
            requests_per_second: config.requests_per_second,
            timeout_secs: config.timeout_secs,
            page_size: config.page_size,
        })
    }
}

/// HTTP client for the platform REST API.
///
/// Cloning is cheap; clones share the connection pool and rate limiter.
#[derive(Clone)]
pub struct PlatformClient {
    http: Client,
    base_url: String,
    api_token: String,
    page_size: u32,
    limiter: Arc<DefaultDirectRateLimiter>,
}

impl fmt::Debug for PlatformClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlatformClient")
            .field("base_url", &self.base_url)
            .field("page_size", &self.page_size)
            .finish_non_exhaustive()
    }
}

impl PlatformClient {
    pub fn new(config: PlatformClientConfig) -> DomainResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| DomainError::Config(format!("Failed to build HTTP client: {e}")))?;

        let rps = NonZeroU32::new(config.requests_per_second).unwrap_or(NonZeroU32::MIN);

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token,
            page_size: config.page_size.max(1),
            limiter: Arc::new(RateLimiter::direct(Quota::per_second(rps))),
        })
    }

    pub fn from_config(config: &PlatformConfig) -> DomainResult<Self> {
        Self::new(PlatformClientConfig::from_platform_config(config)?)
    }

    /// Send a request and decode the JSON envelope.
    ///
    /// `resource` and `id` are only used to build a `NotFound` error.
    async fn send<B, T>(
        &self,
        op: &'static str,
        method: Method,
        path: &str,
        body: Option<&B>,
        resource: &'static str,
        id: &str,
    ) -> DomainResult<T>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        self.limiter.until_ready().await;

        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(op, %method, %url, "platform request");

        let mut req = self
            .http
            .request(method, &url)
            .bearer_auth(&self.api_token)
            .header("Content-Type", "application/json");
        if let Some(body) = body {
            req = req.json(body);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| DomainError::Remote(format!("{op} request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(match status {
                StatusCode::NOT_FOUND => DomainError::NotFound {
                    resource,
                    id: id.to_string(),
                },
                StatusCode::CONFLICT => DomainError::Conflict(format!("{op}: {text}")),
                _ => DomainError::Remote(format!("{op} returned {status}: {text}")),
            });
        }

        resp.json::<T>()
            .await
            .map_err(|e| DomainError::Remote(format!("{op} parse failed: {e}")))
    }

    async fn get<T: DeserializeOwned>(
        &self,
        op: &'static str,
        path: &str,
        resource: &'static str,
        id: &str,
    ) -> DomainResult<T> {
        self.send::<(), T>(op, Method::GET, path, None, resource, id)
            .await
    }
}

#[async_trait]
impl RemotePlatform for PlatformClient {
    async fn get_agent(&self, id: &str) -> DomainResult<Agent> {
        let env: AgentEnvelope = self
            .get("get_agent", &format!("/agents/{id}"), "Agent", id)
            .await?;
        Ok(env.agent.into())
    }

    async fn list_agents(&self) -> DomainResult<Vec<Agent>> {
        let mut agents = Vec::new();
        for page in 1..=MAX_PAGES {
            let path = format!("/agents?page={page}&per_page={}", self.page_size);
            let resp: AgentsPage = self.get("list_agents", &path, "Agent page", "").await?;
            let batch = resp.agents.unwrap_or_default();
            let short = batch.len() < self.page_size as usize;
            agents.extend(batch.into_iter().map(Agent::from));
            if short || !WireLinks::has_next(resp.links.as_ref()) {
                break;
            }
        }
        Ok(agents)
    }

    async fn create_agent(&self, spec: &AgentSpec) -> DomainResult<Agent> {
        let body = CreateAgentRequest::from(spec);
        let env: AgentEnvelope = self
            .send("create_agent", Method::POST, "/agents", Some(&body), "Agent", &spec.name)
            .await?;
        Ok(env.agent.into())
    }

    async fn get_knowledge_base(&self, id: &str) -> DomainResult<KnowledgeBase> {
        let env: KnowledgeBaseEnvelope = self
            .get(
                "get_knowledge_base",
                &format!("/knowledge_bases/{id}"),
                "Knowledge base",
                id,
            )
            .await?;
        Ok(env.knowledge_base.into())
    }

    async fn list_knowledge_bases(&self) -> DomainResult<Vec<KnowledgeBase>> {
        let mut kbs = Vec::new();
        for page in 1..=MAX_PAGES {
            let path = format!("/knowledge_bases?page={page}&per_page={}", self.page_size);
            let resp: KnowledgeBasesPage = self
                .get("list_knowledge_bases", &path, "Knowledge base page", "")
                .await?;
            let batch = resp.knowledge_bases.unwrap_or_default();
            let short = batch.len() < self.page_size as usize;
            kbs.extend(batch.into_iter().map(KnowledgeBase::from));
            if short || !WireLinks::has_next(resp.links.as_ref()) {
                break;
            }
        }
        Ok(kbs)
    }

    async fn create_knowledge_base(&self, spec: &KnowledgeBaseSpec) -> DomainResult<KnowledgeBase> {
        let body = CreateKnowledgeBaseRequest::from(spec);
        let env: KnowledgeBaseEnvelope = self
            .send(
                "create_knowledge_base",
                Method::POST,
                "/knowledge_bases",
                Some(&body),
                "Knowledge base",
                &spec.name,
            )
            .await?;
        Ok(env.knowledge_base.into())
    }

    async fn attach_knowledge_base(&self, agent_id: &str, kb_id: &str) -> DomainResult<Agent> {
        let path = format!("/agents/{agent_id}/knowledge_bases/{kb_id}");
        let env: AgentEnvelope = self
            .send::<(), _>(
                "attach_knowledge_base",
                Method::POST,
                &path,
                None,
                "Agent or knowledge base",
                &format!("{agent_id}/{kb_id}"),
            )
            .await?;
        Ok(env.agent.into())
    }

    async fn start_indexing_job(&self, kb_id: &str) -> DomainResult<IndexingJob> {
        let body = StartIndexingJobRequest {
            knowledge_base_uuid: kb_id.to_string(),
        };
        let env: IndexingJobEnvelope = self
            .send(
                "start_indexing_job",
                Method::POST,
                "/indexing_jobs",
                Some(&body),
                "Knowledge base",
                kb_id,
            )
            .await?;
        Ok(env.job.into())
    }

    async fn create_access_key(&self, agent_id: &str, name: &str) -> DomainResult<AccessKey> {
        let body = CreateApiKeyRequest {
            agent_uuid: agent_id.to_string(),
            name: name.to_string(),
        };
        let env: ApiKeyEnvelope = self
            .send(
                "create_access_key",
                Method::POST,
                &format!("/agents/{agent_id}/api_keys"),
                Some(&body),
                "Agent",
                agent_id,
            )
            .await?;
        Ok(env.api_key_info.into_access_key(agent_id))
    }
}
