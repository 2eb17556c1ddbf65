//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::cli::commands::agent::AgentIdArgs;
use crate::cli::commands::demo::DemoArgs;

#[derive(Parser, Debug)]
#[command(name = "agentkb")]
#[command(about = "Reconcile support agents with their knowledge bases", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Configuration directory holding config.yaml and local.yaml
    #[arg(long, global = true, env = "AGENTKB_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List knowledge bases named for the agent's domain but not attached
    Orphans(AgentIdArgs),

    /// Attach orphaned knowledge bases to the agent
    Repair(AgentIdArgs),

    /// Start an indexing job for each of the agent's knowledge bases
    Reindex(AgentIdArgs),

    /// Show the agent, its knowledge bases and their readiness
    Status(AgentIdArgs),

    /// Demo singleton agent commands
    Demo(DemoArgs),
}
