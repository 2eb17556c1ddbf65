//! Platform REST API request and response models.
//!
//! These structs map to the platform's JSON payloads. They are internal to
//! the HTTP adapter; everything above it works with `domain::models`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::models::{
    AccessKey, Agent, AgentSpec, DataSource, DataSourceSpec, IndexingJob, KnowledgeBase,
    KnowledgeBaseSpec, RetrievalSettings,
};

/// The platform encodes some 64-bit counters as JSON strings.
fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumOrString {
        Num(u64),
        Str(String),
    }

    match Option::<NumOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumOrString::Num(n)) => Ok(Some(n)),
        Some(NumOrString::Str(s)) if s.trim().is_empty() => Ok(None),
        Some(NumOrString::Str(s)) => s.trim().parse().map(Some).map_err(serde::de::Error::custom),
    }
}

fn lenient_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_u64(deserializer)?
        .map(u32::try_from)
        .transpose()
        .map_err(serde::de::Error::custom)
}

// ---------------------------------------------------------------------------
// Agents
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct AgentEnvelope {
    pub agent: WireAgent,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AgentsPage {
    #[serde(default)]
    pub agents: Option<Vec<WireAgent>>,
    #[serde(default)]
    pub links: Option<WireLinks>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireAgent {
    pub uuid: String,
    pub name: String,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub k: Option<u32>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub top_p: Option<f64>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub deployment: Option<WireDeployment>,
    #[serde(default)]
    pub knowledge_bases: Option<Vec<WireKnowledgeBaseRef>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireDeployment {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireKnowledgeBaseRef {
    pub uuid: String,
}

impl From<WireAgent> for Agent {
    fn from(wire: WireAgent) -> Self {
        let defaults = RetrievalSettings::default();
        Self {
            id: wire.uuid,
            name: wire.name,
            region: wire.region.unwrap_or_default(),
            settings: RetrievalSettings {
                k: wire.k.unwrap_or(defaults.k),
                temperature: wire.temperature.unwrap_or(defaults.temperature),
                top_p: wire.top_p.unwrap_or(defaults.top_p),
                max_tokens: wire.max_tokens.unwrap_or(defaults.max_tokens),
            },
            endpoint: wire.deployment.and_then(|d| d.url).unwrap_or_default(),
            knowledge_base_ids: wire
                .knowledge_bases
                .unwrap_or_default()
                .into_iter()
                .map(|kb| kb.uuid)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateAgentRequest {
    pub name: String,
    pub instruction: String,
    pub description: String,
    pub model_uuid: String,
    pub project_id: String,
    pub region: String,
    pub knowledge_base_uuid: Vec<String>,
    pub k: u32,
    pub temperature: f64,
    pub top_p: f64,
    pub max_tokens: u32,
}

impl From<&AgentSpec> for CreateAgentRequest {
    fn from(spec: &AgentSpec) -> Self {
        Self {
            name: spec.name.clone(),
            instruction: spec.instruction.clone(),
            description: spec.description.clone(),
            model_uuid: spec.model_id.clone(),
            project_id: spec.project_id.clone(),
            region: spec.region.clone(),
            knowledge_base_uuid: spec.knowledge_base_ids.clone(),
            k: spec.settings.k,
            temperature: spec.settings.temperature,
            top_p: spec.settings.top_p,
            max_tokens: spec.settings.max_tokens,
        }
    }
}

// ---------------------------------------------------------------------------
// Knowledge bases
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct KnowledgeBaseEnvelope {
    pub knowledge_base: WireKnowledgeBase,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KnowledgeBasesPage {
    #[serde(default)]
    pub knowledge_bases: Option<Vec<WireKnowledgeBase>>,
    #[serde(default)]
    pub links: Option<WireLinks>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireKnowledgeBase {
    pub uuid: String,
    pub name: String,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub document_count: Option<u64>,
    #[serde(default)]
    pub last_indexing_job: Option<WireIndexingJob>,
    #[serde(default)]
    pub datasources: Option<Vec<WireDataSource>>,
}

impl From<WireKnowledgeBase> for KnowledgeBase {
    fn from(wire: WireKnowledgeBase) -> Self {
        let job_items = wire
            .last_indexing_job
            .as_ref()
            .and_then(|j| j.total_items_indexed);
        Self {
            id: wire.uuid,
            name: wire.name,
            region: wire.region.unwrap_or_default(),
            document_count: wire.document_count.or(job_items).unwrap_or(0),
            last_indexing_job: wire.last_indexing_job.map(IndexingJob::from),
            data_sources: wire
                .datasources
                .unwrap_or_default()
                .into_iter()
                .map(DataSource::from)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireDataSource {
    #[serde(default)]
    pub web_crawler_data_source: Option<WireWebCrawler>,
    #[serde(default)]
    pub file_upload_data_source: Option<WireFileUpload>,
    #[serde(default)]
    pub spaces_data_source: Option<WireBucket>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WireWebCrawler {
    pub base_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crawling_option: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embed_media: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireFileUpload {
    #[serde(default)]
    pub original_file_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WireBucket {
    pub bucket_name: String,
    #[serde(default)]
    pub item_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

impl From<WireDataSource> for DataSource {
    fn from(wire: WireDataSource) -> Self {
        if let Some(crawler) = wire.web_crawler_data_source {
            Self::WebCrawler {
                base_url: crawler.base_url,
            }
        } else if let Some(upload) = wire.file_upload_data_source {
            Self::FileUpload {
                file_name: upload.original_file_name.unwrap_or_default(),
            }
        } else if let Some(bucket) = wire.spaces_data_source {
            Self::Bucket {
                bucket: bucket.bucket_name,
                item_path: bucket.item_path.unwrap_or_default(),
            }
        } else {
            Self::Unknown
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateKnowledgeBaseRequest {
    pub name: String,
    pub region: String,
    pub project_id: String,
    pub embedding_model_uuid: String,
    pub datasources: Vec<DataSourceRequest>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DataSourceRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_crawler_data_source: Option<WireWebCrawler>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spaces_data_source: Option<WireBucket>,
}

impl From<&DataSourceSpec> for DataSourceRequest {
    fn from(spec: &DataSourceSpec) -> Self {
        match spec {
            DataSourceSpec::WebCrawler { base_url } => Self {
                web_crawler_data_source: Some(WireWebCrawler {
                    base_url: base_url.clone(),
                    crawling_option: Some("SCOPED".to_string()),
                    embed_media: Some(false),
                }),
                spaces_data_source: None,
            },
            DataSourceSpec::Bucket {
                bucket,
                item_path,
                region,
            } => Self {
                web_crawler_data_source: None,
                spaces_data_source: Some(WireBucket {
                    bucket_name: bucket.clone(),
                    item_path: Some(item_path.clone()),
                    region: Some(region.clone()),
                }),
            },
        }
    }
}

impl From<&KnowledgeBaseSpec> for CreateKnowledgeBaseRequest {
    fn from(spec: &KnowledgeBaseSpec) -> Self {
        Self {
            name: spec.name.clone(),
            region: spec.region.clone(),
            project_id: spec.project_id.clone(),
            embedding_model_uuid: spec.embedding_model_id.clone(),
            datasources: spec.data_sources.iter().map(DataSourceRequest::from).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Indexing jobs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct IndexingJobEnvelope {
    pub job: WireIndexingJob,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireIndexingJob {
    #[serde(default)]
    pub uuid: String,
    #[serde(default)]
    pub knowledge_base_uuid: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub phase: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub tokens: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub total_datasources: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub completed_datasources: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub total_items_indexed: Option<u64>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub finished_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub error: Option<String>,
}

impl From<WireIndexingJob> for IndexingJob {
    fn from(wire: WireIndexingJob) -> Self {
        Self {
            id: wire.uuid,
            knowledge_base_id: wire.knowledge_base_uuid,
            status: wire.status.unwrap_or_default(),
            phase: wire.phase.unwrap_or_default(),
            tokens: wire.tokens,
            total_datasources: wire.total_datasources,
            completed_datasources: wire.completed_datasources,
            started_at: wire.started_at,
            finished_at: wire.finished_at,
            error: wire.error.filter(|e| !e.is_empty()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StartIndexingJobRequest {
    pub knowledge_base_uuid: String,
}

// ---------------------------------------------------------------------------
// Access keys
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ApiKeyEnvelope {
    pub api_key_info: WireApiKey,
}

#[derive(Clone, Deserialize)]
pub struct WireApiKey {
    pub uuid: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub secret_key: Option<String>,
}

impl std::fmt::Debug for WireApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WireApiKey")
            .field("uuid", &self.uuid)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl WireApiKey {
    pub fn into_access_key(self, agent_id: &str) -> AccessKey {
        AccessKey {
            id: self.uuid,
            agent_id: agent_id.to_string(),
            name: self.name.unwrap_or_default(),
            secret: self.secret_key.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateApiKeyRequest {
    pub agent_uuid: String,
    pub name: String,
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireLinks {
    #[serde(default)]
    pub pages: Option<WirePages>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WirePages {
    #[serde(default)]
    pub next: Option<String>,
}

impl WireLinks {
    pub fn has_next(links: Option<&Self>) -> bool {
        links
            .and_then(|l| l.pages.as_ref())
            .and_then(|p| p.next.as_deref())
            .is_some_and(|next| !next.is_empty())
    }
}
