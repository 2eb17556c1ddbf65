use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::indexing_job::IndexingJob;

/// The family of content a knowledge base holds, encoded as a name suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KbSourceKind {
    /// Pages discovered by crawling the customer's site
    Crawl,
    /// Files uploaded by the customer
    Uploads,
    /// Structured records (FAQs, catalogs)
    Structured,
}

impl KbSourceKind {
    pub const ALL: [Self; 3] = [Self::Crawl, Self::Uploads, Self::Structured];

    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Crawl => "crawl",
            Self::Uploads => "uploads",
            Self::Structured => "structured",
        }
    }
}

impl fmt::Display for KbSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

impl FromStr for KbSourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "crawl" => Ok(Self::Crawl),
            "uploads" => Ok(Self::Uploads),
            "structured" => Ok(Self::Structured),
            _ => Err(format!("Invalid knowledge base source kind: {s}")),
        }
    }
}

/// Where a knowledge base's documents come from.
///
/// The platform reports each source as an object with exactly one of
/// several optional members set; this collapses that into a closed set of
/// variants, with `Unknown` for source types added later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DataSource {
    WebCrawler { base_url: String },
    FileUpload { file_name: String },
    Bucket { bucket: String, item_path: String },
    Unknown,
}

impl DataSource {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::WebCrawler { .. } => "web crawler",
            Self::FileUpload { .. } => "file upload",
            Self::Bucket { .. } => "bucket",
            Self::Unknown => "unknown",
        }
    }
}

/// A knowledge base as reported by the remote platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeBase {
    /// Opaque platform identifier
    pub id: String,

    /// Name, conventionally `"<slug>-<suffix>"`
    pub name: String,

    /// Datacenter region
    pub region: String,

    /// Number of documents committed to the index
    pub document_count: u64,

    /// Most recent indexing job, `None` if the KB was never indexed
    pub last_indexing_job: Option<IndexingJob>,

    /// Content sources, when the platform includes them
    #[serde(default)]
    pub data_sources: Vec<DataSource>,
}

/// One content source in a knowledge base creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DataSourceSpec {
    WebCrawler { base_url: String },
    Bucket { bucket: String, item_path: String, region: String },
}

/// Request to create a knowledge base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeBaseSpec {
    pub name: String,
    pub region: String,
    pub project_id: String,
    pub embedding_model_id: String,
    pub data_sources: Vec<DataSourceSpec>,
}

/// Current version of [`KnowledgeBaseSnapshot`].
pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

/// Versioned, read-only projection of a knowledge base for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeBaseSnapshot {
    pub schema_version: u32,
    pub id: String,
    pub name: String,
    pub region: String,
    pub document_count: u64,
    pub job_status: Option<String>,
    pub job_phase: Option<String>,
    pub job_error: Option<String>,
    pub sources: Vec<String>,
}

impl From<&KnowledgeBase> for KnowledgeBaseSnapshot {
    fn from(kb: &KnowledgeBase) -> Self {
        let job = kb.last_indexing_job.as_ref();
        Self {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            id: kb.id.clone(),
            name: kb.name.clone(),
            region: kb.region.clone(),
            document_count: kb.document_count,
            job_status: job.map(|j| j.status.clone()),
            job_phase: job.map(|j| j.phase.clone()),
            job_error: job.and_then(|j| j.error.clone()),
            sources: kb
                .data_sources
                .iter()
                .map(|s| match s {
                    DataSource::WebCrawler { base_url } => format!("web crawler: {base_url}"),
                    DataSource::FileUpload { file_name } => format!("file upload: {file_name}"),
                    DataSource::Bucket { bucket, item_path } => {
                        format!("bucket: {bucket}/{item_path}")
                    }
                    DataSource::Unknown => "unknown".to_string(),
                })
                .collect(),
        }
    }
}
