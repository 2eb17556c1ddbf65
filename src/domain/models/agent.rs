use serde::{Deserialize, Serialize};

/// Retrieval settings applied by the platform when an agent answers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetrievalSettings {
    /// Number of chunks retrieved per query
    pub k: u32,

    /// Sampling temperature (0.0 - 1.0)
    pub temperature: f64,

    /// Nucleus sampling cutoff (0.0 - 1.0)
    pub top_p: f64,

    /// Maximum tokens in a generated answer
    pub max_tokens: u32,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            k: 10,
            temperature: 0.2,
            top_p: 0.9,
            max_tokens: 1024,
        }
    }
}

/// A support agent as reported by the remote platform.
///
/// `knowledge_base_ids` reflects the attachment set at query time and is
/// never treated as ground truth beyond the current operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    /// Opaque platform identifier
    pub id: String,

    /// Display name, conventionally `"<Brand> - <domain>"`
    pub name: String,

    /// Datacenter region
    pub region: String,

    /// Retrieval settings
    pub settings: RetrievalSettings,

    /// Deployment endpoint URL (empty until the platform has deployed the agent)
    pub endpoint: String,

    /// Attached knowledge base ids
    pub knowledge_base_ids: Vec<String>,
}

impl Agent {
    /// Whether the platform reports any attached knowledge bases.
    pub fn has_attachments(&self) -> bool {
        !self.knowledge_base_ids.is_empty()
    }

    pub fn is_attached(&self, kb_id: &str) -> bool {
        self.knowledge_base_ids.iter().any(|id| id == kb_id)
    }
}

/// Request to create a new agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSpec {
    pub name: String,
    pub region: String,
    pub project_id: String,
    pub model_id: String,
    pub instruction: String,
    pub description: String,
    pub settings: RetrievalSettings,
    /// Knowledge bases attached at creation time (may be empty)
    pub knowledge_base_ids: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent(ids: &[&str]) -> Agent {
        Agent {
            id: "agent-1".to_string(),
            name: "Support Agent - acme.com".to_string(),
            region: "tor1".to_string(),
            settings: RetrievalSettings::default(),
            endpoint: String::new(),
            knowledge_base_ids: ids.iter().map(ToString::to_string).collect(),
        }
    }

    #[test]
    fn test_attachment_queries() {
        let empty = agent(&[]);
        assert!(!empty.has_attachments());

        let attached = agent(&["kb-1", "kb-2"]);
        assert!(attached.has_attachments());
        assert!(attached.is_attached("kb-2"));
        assert!(!attached.is_attached("kb-3"));
    }
}
