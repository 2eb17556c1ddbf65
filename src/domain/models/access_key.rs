use serde::{Deserialize, Serialize};
use std::fmt;

/// A credential for calling an agent's endpoint.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessKey {
    /// Opaque platform identifier
    pub id: String,

    /// Agent the key is bound to
    pub agent_id: String,

    pub name: String,

    /// Secret value; only returned by the platform at creation time
    pub secret: String,
}

impl fmt::Debug for AccessKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessKey")
            .field("id", &self.id)
            .field("agent_id", &self.agent_id)
            .field("name", &self.name)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}
