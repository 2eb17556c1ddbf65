use serde::{Deserialize, Serialize};
use std::fmt;

/// Resolved connection details for the demo singleton agent.
///
/// This is also the on-disk cache artifact format (camelCase keys).
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoAgentRecord {
    /// Platform id of the agent, unknown when sourced from static configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,

    /// Deployment domain the agent was provisioned for
    #[serde(default)]
    pub domain: String,

    pub endpoint: String,

    pub access_key: String,
}

impl DemoAgentRecord {
    /// A record is usable when both the endpoint and key are present.
    pub fn is_complete(&self) -> bool {
        !self.endpoint.trim().is_empty() && !self.access_key.trim().is_empty()
    }
}

impl fmt::Debug for DemoAgentRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DemoAgentRecord")
            .field("agent_id", &self.agent_id)
            .field("domain", &self.domain)
            .field("endpoint", &self.endpoint)
            .field("access_key", &"[REDACTED]")
            .finish()
    }
}

/// Which resolution tier produced a [`DemoAgentRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionTier {
    /// Endpoint and key came from static configuration
    Env,
    /// Read from the cache artifact written by a warm pass
    CacheFile,
    /// Found or created on the remote platform
    Lazy,
}

impl fmt::Display for ResolutionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Env => write!(f, "env"),
            Self::CacheFile => write!(f, "cache-file"),
            Self::Lazy => write!(f, "lazy"),
        }
    }
}

/// Demo provisioning state for a single resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisionState {
    Unconfigured,
    Resolving,
    Resolved(ResolutionTier),
    Failed(String),
}

impl ProvisionState {
    /// Whether moving from `self` to `next` is a legal transition.
    pub const fn can_transition_to(&self, next: &Self) -> bool {
        matches!(
            (self, next),
            (Self::Unconfigured, Self::Resolving)
                | (Self::Resolving, Self::Resolved(_) | Self::Failed(_))
        )
    }
}

impl fmt::Display for ProvisionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unconfigured => write!(f, "unconfigured"),
            Self::Resolving => write!(f, "resolving"),
            Self::Resolved(tier) => write!(f, "resolved ({tier})"),
            Self::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}
