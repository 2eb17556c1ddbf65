//! Command-line interface.

pub mod commands;
pub mod output;
pub mod table;
pub mod types;

pub use types::{Cli, Commands};

use anyhow::Result;

use crate::domain::errors::DomainError;
use crate::domain::models::Config;

/// Run a parsed command against a loaded configuration.
pub async fn dispatch(command: Commands, config: &Config, json_mode: bool) -> Result<()> {
    match command {
        Commands::Orphans(args) => commands::agent::orphans(args, config, json_mode).await,
        Commands::Repair(args) => commands::agent::repair(args, config, json_mode).await,
        Commands::Reindex(args) => commands::agent::reindex(args, config, json_mode).await,
        Commands::Status(args) => commands::agent::status(args, config, json_mode).await,
        Commands::Demo(args) => commands::demo::execute(args, config, json_mode).await,
    }
}

/// Process exit code for a failed command.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<DomainError>() {
        Some(DomainError::InvalidInput(_)) => 2,
        Some(DomainError::NotFound { .. }) => 3,
        Some(DomainError::Config(_)) => 4,
        _ => 1,
    }
}

/// Print the error and exit.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    tracing::debug!(error = ?err, "command failed");
    if json_mode {
        let body = serde_json::json!({
            "success": false,
            "error": format!("{err:#}"),
        });
        eprintln!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        eprintln!("{} {err:#}", console::style("Error:").red().bold());
    }
    std::process::exit(exit_code(&err));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_code(&DomainError::agent_not_found("a-1").into()), 3);
        assert_eq!(exit_code(&DomainError::InvalidInput("blank".into()).into()), 2);
        assert_eq!(exit_code(&anyhow::anyhow!("other")), 1);
        let wrapped = anyhow::Error::from(DomainError::Config("no token".into()))
            .context("Failed to configure platform client");
        assert_eq!(exit_code(&wrapped), 4);
    }
}
