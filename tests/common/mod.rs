//! Common test utilities for integration tests
//!
//! Provides shared fixtures, helpers, and test utilities used across
//! multiple integration test files.

#![allow(dead_code)]

use std::sync::Arc;

use agentkb::domain::models::{Agent, IndexingJob, KnowledgeBase, RetrievalSettings};
use agentkb::domain::ports::RemotePlatform;
use agentkb::MockPlatform;
use tempfile::TempDir;

/// Create a temporary directory for test isolation
///
/// Returns a TempDir that will be cleaned up when dropped.
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
/// Call this at the beginning of tests that need logging.
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

pub fn agent(id: &str, name: &str, kb_ids: &[&str]) -> Agent {
    Agent {
        id: id.to_string(),
        name: name.to_string(),
        region: "tor1".to_string(),
        settings: RetrievalSettings::default(),
        endpoint: format!("https://{id}.agents.example"),
        knowledge_base_ids: kb_ids.iter().map(ToString::to_string).collect(),
    }
}

pub fn knowledge_base(id: &str, name: &str, docs: u64, job_status: Option<&str>) -> KnowledgeBase {
    KnowledgeBase {
        id: id.to_string(),
        name: name.to_string(),
        region: "tor1".to_string(),
        document_count: docs,
        last_indexing_job: job_status.map(|status| IndexingJob {
            id: format!("job-{id}"),
            knowledge_base_id: id.to_string(),
            status: status.to_string(),
            phase: String::new(),
            tokens: None,
            total_datasources: None,
            completed_datasources: None,
            started_at: None,
            finished_at: None,
            error: None,
        }),
        data_sources: vec![],
    }
}

/// A mock platform plus the same instance behind the port trait.
pub fn platform() -> (MockPlatform, Arc<dyn RemotePlatform>) {
    let mock = MockPlatform::new();
    let shared: Arc<dyn RemotePlatform> = Arc::new(mock.clone());
    (mock, shared)
}
