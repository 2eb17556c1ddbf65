//! agentkb CLI entry point.

use anyhow::Context;
use clap::Parser;

use agentkb::cli::{dispatch, handle_error, Cli};
use agentkb::infrastructure::config::{ConfigLoader, CONFIG_DIR};
use agentkb::infrastructure::logging::{LogConfig, LoggerImpl};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config_dir = cli
        .config_dir
        .clone()
        .unwrap_or_else(|| CONFIG_DIR.into());
    let config = match ConfigLoader::load_from_dir(&config_dir) {
        Ok(config) => config,
        Err(err) => handle_error(err, cli.json),
    };

    let _logger = match LogConfig::try_from(&config.logging)
        .map_err(anyhow::Error::msg)
        .and_then(|log_config| LoggerImpl::init(&log_config))
        .context("Failed to initialize logging")
    {
        Ok(logger) => logger,
        Err(err) => handle_error(err, cli.json),
    };

    if let Err(err) = dispatch(cli.command, &config, cli.json).await {
        handle_error(err, cli.json);
    }
}
