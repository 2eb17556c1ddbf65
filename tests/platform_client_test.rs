//! Integration tests for the platform HTTP client
//!
//! Runs the client against a mockito server to cover:
//! - Envelope decoding into domain types
//! - Bearer authentication
//! - Pagination across list calls
//! - Status code to error mapping (404, 409, 5xx)

use agentkb::domain::ports::RemotePlatform;
use agentkb::{DomainError, PlatformClient, PlatformClientConfig};
use mockito::{Matcher, Server};

fn client(base_url: String, page_size: u32) -> PlatformClient {
    PlatformClient::new(PlatformClientConfig {
        base_url,
        api_token: "test-token".to_string(),
        requests_per_second: 100,
        timeout_secs: 5,
        page_size,
    })
    .expect("Failed to create client")
}

fn agent_json(id: &str, name: &str, kb_ids: &[&str]) -> serde_json::Value {
    serde_json::json!({
        "uuid": id,
        "name": name,
        "region": "tor1",
        "k": 5,
        "temperature": 0.3,
        "top_p": 1.0,
        "max_tokens": 512,
        "deployment": { "url": format!("https://{id}.agents.example"), "status": "STATUS_RUNNING" },
        "knowledge_bases": kb_ids.iter().map(|k| serde_json::json!({ "uuid": k })).collect::<Vec<_>>(),
    })
}

#[tokio::test]
async fn test_get_agent_decodes_envelope() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/agents/a-1")
        .match_header("authorization", "Bearer test-token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            serde_json::json!({ "agent": agent_json("a-1", "Support Agent - acme.com", &["kb-1"]) })
                .to_string(),
        )
        .create_async()
        .await;

    let agent = client(server.url(), 100).get_agent("a-1").await.unwrap();

    assert_eq!(agent.id, "a-1");
    assert_eq!(agent.name, "Support Agent - acme.com");
    assert_eq!(agent.endpoint, "https://a-1.agents.example");
    assert_eq!(agent.knowledge_base_ids, vec!["kb-1".to_string()]);
    assert_eq!(agent.settings.k, 5);
    assert_eq!(agent.settings.max_tokens, 512);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_list_agents_follows_pages() {
    let mut server = Server::new_async().await;
    let first = server
        .mock("GET", "/agents")
        .match_query(Matcher::UrlEncoded("page".into(), "1".into()))
        .with_status(200)
        .with_body(
            serde_json::json!({
                "agents": [agent_json("a-1", "one", &[]), agent_json("a-2", "two", &[])],
                "links": { "pages": { "next": "https://api.example/agents?page=2" } },
            })
            .to_string(),
        )
        .create_async()
        .await;
    let second = server
        .mock("GET", "/agents")
        .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
        .with_status(200)
        .with_body(
            serde_json::json!({
                "agents": [agent_json("a-3", "three", &[])],
                "links": {},
            })
            .to_string(),
        )
        .create_async()
        .await;

    let agents = client(server.url(), 2).list_agents().await.unwrap();

    let ids: Vec<&str> = agents.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["a-1", "a-2", "a-3"]);
    first.assert_async().await;
    second.assert_async().await;
}

#[tokio::test]
async fn test_list_knowledge_bases_maps_jobs_and_sources() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/knowledge_bases")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            serde_json::json!({
                "knowledge_bases": [{
                    "uuid": "kb-1",
                    "name": "acme-com-crawl",
                    "region": "tor1",
                    "last_indexing_job": {
                        "uuid": "job-1",
                        "knowledge_base_uuid": "kb-1",
                        "status": "INDEX_JOB_STATUS_COMPLETED",
                        "phase": "BATCH_JOB_PHASE_SUCCEEDED",
                        "total_items_indexed": "42"
                    },
                    "datasources": [
                        { "web_crawler_data_source": { "base_url": "https://acme.com" } }
                    ]
                }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let kbs = client(server.url(), 100).list_knowledge_bases().await.unwrap();

    assert_eq!(kbs.len(), 1);
    let kb = &kbs[0];
    assert_eq!(kb.name, "acme-com-crawl");
    assert_eq!(kb.document_count, 42);
    assert!(agentkb::is_ready(kb).ready);
}

#[tokio::test]
async fn test_not_found_maps_to_domain_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/knowledge_bases/missing")
        .with_status(404)
        .with_body(r#"{"id":"not_found","message":"The resource you requested could not be found."}"#)
        .create_async()
        .await;

    let err = client(server.url(), 100)
        .get_knowledge_base("missing")
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert!(matches!(err, DomainError::NotFound { id, .. } if id == "missing"));
}

#[tokio::test]
async fn test_attach_conflict_maps_to_conflict() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/agents/a-1/knowledge_bases/kb-1")
        .with_status(409)
        .with_body(r#"{"id":"conflict","message":"already attached"}"#)
        .create_async()
        .await;

    let err = client(server.url(), 100)
        .attach_knowledge_base("a-1", "kb-1")
        .await
        .unwrap_err();

    assert!(err.is_conflict());
}

#[tokio::test]
async fn test_server_error_maps_to_remote() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/indexing_jobs")
        .with_status(503)
        .with_body("upstream unavailable")
        .create_async()
        .await;

    let err = client(server.url(), 100)
        .start_indexing_job("kb-1")
        .await
        .unwrap_err();

    match err {
        DomainError::Remote(msg) => {
            assert!(msg.contains("503"));
            assert!(msg.contains("upstream unavailable"));
        }
        other => panic!("expected remote error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_start_indexing_job_sends_kb_id() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/indexing_jobs")
        .match_body(Matcher::PartialJson(
            serde_json::json!({ "knowledge_base_uuid": "kb-7" }),
        ))
        .with_status(200)
        .with_body(
            serde_json::json!({
                "job": { "uuid": "job-9", "knowledge_base_uuid": "kb-7", "status": "INDEX_JOB_STATUS_PENDING" }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let job = client(server.url(), 100)
        .start_indexing_job("kb-7")
        .await
        .unwrap();

    assert_eq!(job.id, "job-9");
    assert_eq!(job.knowledge_base_id, "kb-7");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_create_access_key_reads_secret() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/agents/a-1/api_keys")
        .with_status(200)
        .with_body(
            serde_json::json!({
                "api_key_info": { "uuid": "key-1", "name": "demo-access", "secret_key": "sk-123" }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let key = client(server.url(), 100)
        .create_access_key("a-1", "demo-access")
        .await
        .unwrap();

    assert_eq!(key.id, "key-1");
    assert_eq!(key.agent_id, "a-1");
    assert_eq!(key.secret, "sk-123");
    assert!(!format!("{key:?}").contains("sk-123"));
}
