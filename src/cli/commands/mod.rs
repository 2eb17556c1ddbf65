//! CLI command implementations.

pub mod agent;
pub mod demo;

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::adapters::platform::PlatformClient;
use crate::domain::models::Config;
use crate::domain::ports::RemotePlatform;

/// Build the HTTP platform client from configuration.
pub fn connect(config: &Config) -> Result<Arc<dyn RemotePlatform>> {
    let client = PlatformClient::from_config(&config.platform)
        .context("Failed to configure platform client. Set AGENTKB_PLATFORM__API_TOKEN.")?;
    Ok(Arc::new(client))
}
