//! Domain errors for agentkb.

use thiserror::Error;

/// Domain-level errors that can occur while reconciling platform resources.
///
/// Remote failures are carried as opaque, human-readable messages. Only
/// "not found" and "conflict" are distinguished, since reconciliation
/// treats both as outcomes rather than hard failures in some places.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Remote error: {0}")]
    Remote(String),

    #[error("Demo agent initialization failed: {0}")]
    Initialization(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("I/O error: {0}")]
    Io(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    /// Shorthand for a missing agent.
    pub fn agent_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            resource: "Agent",
            id: id.into(),
        }
    }

    /// Shorthand for a missing knowledge base.
    pub fn kb_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            resource: "Knowledge base",
            id: id.into(),
        }
    }

    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}

/// Reject empty or whitespace-only identifiers before any remote call.
pub fn require_id(kind: &str, id: &str) -> DomainResult<()> {
    if id.trim().is_empty() {
        return Err(DomainError::InvalidInput(format!("{kind} id must not be empty")));
    }
    Ok(())
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}

impl From<std::io::Error> for DomainError {
    fn from(err: std::io::Error) -> Self {
        DomainError::Io(err.to_string())
    }
}
