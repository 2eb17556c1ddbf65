use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An indexing job run against a single knowledge base.
///
/// `status` and `phase` are kept exactly as the platform reported them;
/// use [`IndexingJob::classify`] for a normalized view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexingJob {
    /// Opaque platform identifier
    pub id: String,

    /// Knowledge base this job belongs to
    pub knowledge_base_id: String,

    /// Raw status string (e.g. `INDEX_JOB_STATUS_IN_PROGRESS`)
    pub status: String,

    /// Raw phase string (e.g. `BATCH_JOB_PHASE_RUNNING`)
    pub phase: String,

    /// Tokens embedded so far
    pub tokens: Option<u64>,

    /// Data sources the job will process
    pub total_datasources: Option<u32>,

    /// Data sources already processed
    pub completed_datasources: Option<u32>,

    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,

    /// Error text reported by the platform for failed jobs
    pub error: Option<String>,
}

impl IndexingJob {
    pub fn classify(&self) -> JobStatus {
        JobStatus::classify(&self.status, &self.phase)
    }
}

/// Normalized lifecycle state of an indexing job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
    /// A status string this crate does not recognize; treated as non-terminal.
    Unknown(String),
}

impl JobStatus {
    /// Classify a raw `(status, phase)` pair.
    ///
    /// Failure in either field wins. Otherwise the status decides, and the
    /// phase is only consulted when the status is empty or unrecognized.
    pub fn classify(status: &str, phase: &str) -> Self {
        let status_norm = normalize(status, "index_job_status_");
        let phase_norm = normalize(phase, "batch_job_phase_");

        let from_status = Self::from_token(&status_norm);
        let from_phase = Self::from_token(&phase_norm);

        if from_status == Some(Self::Failed) || from_phase == Some(Self::Failed) {
            return Self::Failed;
        }

        match (from_status, from_phase) {
            (Some(s), _) => s,
            (None, Some(p)) => p,
            (None, None) if status_norm.is_empty() => Self::Unknown(phase.to_string()),
            (None, None) => Self::Unknown(status.to_string()),
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        match token {
            "completed" | "succeeded" | "success" | "partial" | "no_changes" => {
                Some(Self::Completed)
            }
            "failed" | "error" | "cancelled" | "canceled" => Some(Self::Failed),
            "pending" | "queued" => Some(Self::Pending),
            "in_progress" | "running" | "indexing" => Some(Self::InProgress),
            _ => None,
        }
    }

    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

fn normalize(raw: &str, prefix: &str) -> String {
    let lowered = raw.trim().to_lowercase().replace(['-', ' '], "_");
    lowered
        .strip_prefix(prefix)
        .map_or_else(|| lowered.clone(), ToString::to_string)
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::InProgress => write!(f, "in progress"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
            Self::Unknown(raw) => write!(f, "unknown ({raw})"),
        }
    }
}

/// Readiness verdict for a knowledge base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Readiness {
    /// Whether the KB can serve useful retrieval results right now
    pub ready: bool,

    /// Human-readable explanation
    pub reason: String,

    /// Whether any documents are already committed to the index
    pub has_content: bool,
}
