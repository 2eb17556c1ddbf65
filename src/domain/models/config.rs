use serde::{Deserialize, Serialize};

use super::agent::RetrievalSettings;

/// Main configuration structure for agentkb
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Remote platform connection
    #[serde(default)]
    pub platform: PlatformConfig,

    /// Naming convention settings
    #[serde(default)]
    pub naming: NamingConfig,

    /// Defaults applied to newly created agents
    #[serde(default)]
    pub agent_defaults: AgentDefaultsConfig,

    /// Demo singleton resolution
    #[serde(default)]
    pub demo: DemoConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Remote platform configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PlatformConfig {
    /// Base URL of the platform REST API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer token for the platform API
    #[serde(default)]
    pub api_token: Option<String>,

    /// Region for newly created resources
    #[serde(default = "default_region")]
    pub region: String,

    /// Project that owns newly created resources
    #[serde(default)]
    pub project_id: String,

    /// Model used by newly created agents
    #[serde(default)]
    pub model_id: String,

    /// Embedding model used by newly created knowledge bases
    #[serde(default)]
    pub embedding_model_id: String,

    /// Client-side request rate limit
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,

    /// Per-request transport timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Page size used when listing resources
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_base_url() -> String {
    "https://api.digitalocean.com/v2/gen-ai".to_string()
}

fn default_region() -> String {
    "tor1".to_string()
}

const fn default_requests_per_second() -> u32 {
    10
}

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_page_size() -> u32 {
    100
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_token: None,
            region: default_region(),
            project_id: String::new(),
            model_id: String::new(),
            embedding_model_id: String::new(),
            requests_per_second: default_requests_per_second(),
            timeout_secs: default_timeout_secs(),
            page_size: default_page_size(),
        }
    }
}

/// Naming convention configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NamingConfig {
    /// Brand prefix in agent names: `"<brand> - <domain>"`
    #[serde(default = "default_brand")]
    pub brand: String,
}

fn default_brand() -> String {
    "Support Agent".to_string()
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            brand: default_brand(),
        }
    }
}

/// Defaults for agent creation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AgentDefaultsConfig {
    #[serde(default = "default_k")]
    pub k: u32,

    #[serde(default = "default_temperature")]
    pub temperature: f64,

    #[serde(default = "default_top_p")]
    pub top_p: f64,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// System instruction for newly created agents
    #[serde(default = "default_instruction")]
    pub instruction: String,
}

const fn default_k() -> u32 {
    10
}

const fn default_temperature() -> f64 {
    0.2
}

const fn default_top_p() -> f64 {
    0.9
}

const fn default_max_tokens() -> u32 {
    1024
}

fn default_instruction() -> String {
    "You are a helpful support agent. Answer only from the provided knowledge base \
     and say so when the answer is not there."
        .to_string()
}

impl AgentDefaultsConfig {
    pub const fn settings(&self) -> RetrievalSettings {
        RetrievalSettings {
            k: self.k,
            temperature: self.temperature,
            top_p: self.top_p,
            max_tokens: self.max_tokens,
        }
    }
}

impl Default for AgentDefaultsConfig {
    fn default() -> Self {
        Self {
            k: default_k(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            max_tokens: default_max_tokens(),
            instruction: default_instruction(),
        }
    }
}

/// Demo singleton configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DemoConfig {
    /// Deployment domain the demo agent serves
    #[serde(default)]
    pub domain: Option<String>,

    /// Statically configured endpoint (env tier)
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Statically configured access key (env tier)
    #[serde(default)]
    pub access_key: Option<String>,

    /// Statically configured agent id
    #[serde(default)]
    pub agent_id: Option<String>,

    /// Cache artifact written by the warm pass
    #[serde(default = "default_cache_file")]
    pub cache_file: String,
}

fn default_cache_file() -> String {
    ".agentkb/demo-agent.json".to_string()
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            domain: None,
            endpoint: None,
            access_key: None,
            agent_id: None,
            cache_file: default_cache_file(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling log files; stderr only when unset
    #[serde(default)]
    pub log_dir: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
        }
    }
}
