//! Knowledge base readiness evaluation.

use crate::domain::models::{JobStatus, KnowledgeBase, Readiness};

pub const REASON_NEVER_INDEXED: &str = "never indexed";
pub const REASON_IN_PROGRESS: &str = "indexing in progress";
pub const REASON_NO_CONTENT: &str = "completed with no content";
pub const REASON_READY: &str = "ready";

/// Derive a readiness verdict from a knowledge base's last indexing job.
///
/// Pure function of `(status, phase, document count)`. Job state moves
/// independently of this crate, so callers must fetch the KB fresh and
/// never cache the verdict.
pub fn is_ready(kb: &KnowledgeBase) -> Readiness {
    let has_content = kb.document_count > 0;

    let Some(job) = kb.last_indexing_job.as_ref() else {
        return Readiness {
            ready: false,
            reason: REASON_NEVER_INDEXED.to_string(),
            has_content,
        };
    };

    match job.classify() {
        JobStatus::Failed => {
            let detail = job
                .error
                .as_deref()
                .filter(|e| !e.trim().is_empty())
                .unwrap_or(job.status.as_str());
            Readiness {
                ready: false,
                reason: format!("indexing failed: {detail}"),
                has_content,
            }
        }
        JobStatus::Completed if has_content => Readiness {
            ready: true,
            reason: REASON_READY.to_string(),
            has_content,
        },
        JobStatus::Completed => Readiness {
            ready: false,
            reason: REASON_NO_CONTENT.to_string(),
            has_content,
        },
        JobStatus::Pending | JobStatus::InProgress | JobStatus::Unknown(_) => Readiness {
            ready: false,
            reason: REASON_IN_PROGRESS.to_string(),
            has_content,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::IndexingJob;

    fn kb_with(status: Option<(&str, &str, Option<&str>)>, docs: u64) -> KnowledgeBase {
        KnowledgeBase {
            id: "kb-1".to_string(),
            name: "acme-com-crawl".to_string(),
            region: "tor1".to_string(),
            document_count: docs,
            last_indexing_job: status.map(|(status, phase, error)| IndexingJob {
                id: "job-1".to_string(),
                knowledge_base_id: "kb-1".to_string(),
                status: status.to_string(),
                phase: phase.to_string(),
                tokens: None,
                total_datasources: None,
                completed_datasources: None,
                started_at: None,
                finished_at: None,
                error: error.map(ToString::to_string),
            }),
            data_sources: vec![],
        }
    }

    #[test]
    fn test_never_indexed() {
        let verdict = is_ready(&kb_with(None, 0));
        assert!(!verdict.ready);
        assert_eq!(verdict.reason, "never indexed");
    }

    #[test]
    fn test_failed_includes_remote_error() {
        let verdict = is_ready(&kb_with(
            Some(("INDEX_JOB_STATUS_FAILED", "", Some("crawler blocked by robots.txt"))),
            0,
        ));
        assert!(!verdict.ready);
        assert_eq!(verdict.reason, "indexing failed: crawler blocked by robots.txt");
    }

    #[test]
    fn test_failed_without_error_text_uses_status() {
        let verdict = is_ready(&kb_with(Some(("failed", "", None)), 0));
        assert_eq!(verdict.reason, "indexing failed: failed");
    }

    #[test]
    fn test_in_progress_reports_partial_content() {
        let verdict = is_ready(&kb_with(Some(("INDEX_JOB_STATUS_IN_PROGRESS", "", None)), 12));
        assert!(!verdict.ready);
        assert_eq!(verdict.reason, "indexing in progress");
        assert!(verdict.has_content);

        let fresh = is_ready(&kb_with(Some(("INDEX_JOB_STATUS_PENDING", "", None)), 0));
        assert!(!fresh.has_content);
    }

    #[test]
    fn test_completed_with_documents_is_ready() {
        let verdict = is_ready(&kb_with(Some(("completed", "", None)), 5));
        assert!(verdict.ready);
        assert!(verdict.has_content);
    }

    #[test]
    fn test_completed_without_documents_is_not_ready() {
        let verdict = is_ready(&kb_with(Some(("completed", "", None)), 0));
        assert!(!verdict.ready);
        assert_eq!(verdict.reason, "completed with no content");
    }

    #[test]
    fn test_unrecognized_status_is_in_progress() {
        let verdict = is_ready(&kb_with(Some(("INDEX_JOB_STATUS_SOMETHING_NEW", "", None)), 0));
        assert!(!verdict.ready);
        assert_eq!(verdict.reason, REASON_IN_PROGRESS);
    }
}
