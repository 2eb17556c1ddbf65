//! Demo singleton agent commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::commands::connect;
use crate::cli::output::{mask_secret, output, CommandOutput};
use crate::domain::models::{Config, DemoAgentRecord, ResolutionTier};
use crate::services::DemoProvisioner;

#[derive(Args, Debug)]
pub struct DemoArgs {
    #[command(subcommand)]
    pub command: DemoCommands,
}

#[derive(Subcommand, Debug)]
pub enum DemoCommands {
    /// Resolve the demo agent (config, then cache file, then platform)
    Resolve {
        /// Print the full access key instead of a masked one
        #[arg(long)]
        show_key: bool,
    },
    /// Find or create the demo agent and write the cache file
    Warm {
        /// Cache file to write (defaults to demo.cache_file)
        #[arg(short, long)]
        path: Option<PathBuf>,
    },
}

#[derive(Debug, Serialize)]
pub struct DemoRecordOutput {
    pub agent_id: Option<String>,
    pub domain: String,
    pub endpoint: String,
    pub access_key: String,
    pub tier: Option<ResolutionTier>,
    pub created: bool,
    pub cache_path: Option<String>,
}

impl DemoRecordOutput {
    fn new(record: DemoAgentRecord, show_key: bool) -> Self {
        Self {
            access_key: if show_key {
                record.access_key
            } else {
                mask_secret(&record.access_key)
            },
            agent_id: record.agent_id,
            domain: record.domain,
            endpoint: record.endpoint,
            tier: None,
            created: false,
            cache_path: None,
        }
    }
}

impl CommandOutput for DemoRecordOutput {
    fn to_human(&self) -> String {
        let mut lines = Vec::new();
        if let Some(path) = &self.cache_path {
            lines.push(format!("Demo cache written to {path}"));
        }
        lines.push(format!(
            "Agent ID: {}",
            self.agent_id.as_deref().unwrap_or("-")
        ));
        lines.push(format!(
            "Domain: {}",
            if self.domain.is_empty() { "-" } else { self.domain.as_str() }
        ));
        lines.push(format!("Endpoint: {}", self.endpoint));
        lines.push(format!("Access key: {}", self.access_key));
        if let Some(tier) = self.tier {
            let created = if self.created { " (created)" } else { "" };
            lines.push(format!("Resolved via: {tier}{created}"));
        }
        lines.join("\n")
    }
}

pub async fn execute(args: DemoArgs, config: &Config, json_mode: bool) -> Result<()> {
    match args.command {
        DemoCommands::Resolve { show_key } => {
            // Without a token only the config and cache tiers can succeed.
            let platform = match config.platform.api_token {
                Some(_) => Some(connect(config)?),
                None => None,
            };
            let resolution = DemoProvisioner::new(config, platform).resolve().await?;

            let out = DemoRecordOutput {
                tier: Some(resolution.tier),
                created: resolution.created,
                ..DemoRecordOutput::new(resolution.record, show_key)
            };
            output(&out, json_mode);
        }

        DemoCommands::Warm { path } => {
            let provisioner = DemoProvisioner::new(config, Some(connect(config)?));
            let record = provisioner.warm_cache(path.as_deref()).await?;

            let target = path.unwrap_or_else(|| PathBuf::from(&config.demo.cache_file));
            let out = DemoRecordOutput {
                tier: Some(ResolutionTier::Lazy),
                cache_path: Some(target.display().to_string()),
                ..DemoRecordOutput::new(record, false)
            };
            output(&out, json_mode);
        }
    }

    Ok(())
}
