//! Agent reconciliation commands: orphans, repair, reindex, status.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::cli::commands::connect;
use crate::cli::output::{output, CommandOutput};
use crate::cli::table::TableFormatter;
use crate::domain::errors::require_id;
use crate::domain::models::{Config, KnowledgeBaseSnapshot};
use crate::services::{AgentReport, ReindexReport, RepairReport, Services};

#[derive(Args, Debug)]
pub struct AgentIdArgs {
    /// Platform id of the agent
    pub agent_id: String,
}

#[derive(Debug, Serialize)]
pub struct OrphansOutput {
    pub agent_id: String,
    pub agent_name: String,
    pub orphans: Vec<KnowledgeBaseSnapshot>,
}

impl CommandOutput for OrphansOutput {
    fn to_human(&self) -> String {
        if self.orphans.is_empty() {
            return format!("No orphaned knowledge bases for {}.", self.agent_name);
        }
        format!(
            "Found {} orphaned knowledge base(s) for {}:\n{}",
            self.orphans.len(),
            self.agent_name,
            TableFormatter::new().format_orphans(&self.orphans)
        )
    }
}

impl CommandOutput for RepairReport {
    fn to_human(&self) -> String {
        if self.is_noop() {
            return format!("Nothing to repair for agent {}.", self.agent_id);
        }

        let mut lines = vec![format!("Repair of agent {}:", self.agent_id)];
        for kb_id in &self.attached {
            lines.push(format!("  attached          {kb_id}"));
        }
        for kb_id in &self.already_attached {
            lines.push(format!("  already attached  {kb_id}"));
        }
        for failure in &self.failed {
            lines.push(format!("  failed            {}: {}", failure.kb_id, failure.error));
        }
        lines.join("\n")
    }
}

impl CommandOutput for ReindexReport {
    fn to_human(&self) -> String {
        if self.results.is_empty() {
            return format!("No knowledge bases to reindex for agent {}.", self.agent_id);
        }

        let source = if self.used_orphan_discovery {
            "discovered by name"
        } else {
            "attached"
        };
        format!(
            "Started {}/{} indexing job(s) for agent {} ({source}):\n{}",
            self.started(),
            self.results.len(),
            self.agent_id,
            TableFormatter::new().format_reindex_results(&self.results)
        )
    }
}

impl CommandOutput for AgentReport {
    fn to_human(&self) -> String {
        let mut lines = vec![
            format!("Agent: {}", self.agent.name),
            format!("ID: {}", self.agent.id),
            format!("Region: {}", self.agent.region),
            format!("Domain: {}", self.domain.as_deref().unwrap_or("-")),
            format!(
                "Endpoint: {}",
                if self.agent.endpoint.is_empty() {
                    "-"
                } else {
                    self.agent.endpoint.as_str()
                }
            ),
            format!(
                "Retrieval: k={} temperature={} top_p={} max_tokens={}",
                self.agent.settings.k,
                self.agent.settings.temperature,
                self.agent.settings.top_p,
                self.agent.settings.max_tokens
            ),
        ];

        let formatter = TableFormatter::new();
        if self.knowledge_bases.is_empty() {
            lines.push("\nNo knowledge bases attached.".to_string());
        } else {
            lines.push(format!("\nKnowledge bases ({}):", self.knowledge_bases.len()));
            lines.push(formatter.format_kb_reports(&self.knowledge_bases));
        }

        if !self.orphans.is_empty() {
            lines.push(format!("\nOrphaned knowledge bases ({}):", self.orphans.len()));
            lines.push(formatter.format_orphans(&self.orphans));
        }

        lines.push(format!(
            "\nReady: {}",
            if self.all_ready() { "yes" } else { "no" }
        ));
        lines.join("\n")
    }
}

pub async fn orphans(args: AgentIdArgs, config: &Config, json_mode: bool) -> Result<()> {
    require_id("agent", &args.agent_id)?;
    let platform = connect(config)?;
    let services = Services::new(config, platform.clone());
    let agent = platform.get_agent(&args.agent_id).await?;
    let orphans = services.reconciler.find_orphaned_kbs(&agent).await?;

    let out = OrphansOutput {
        agent_id: agent.id.clone(),
        agent_name: agent.name.clone(),
        orphans: orphans.iter().map(KnowledgeBaseSnapshot::from).collect(),
    };
    output(&out, json_mode);
    Ok(())
}

pub async fn repair(args: AgentIdArgs, config: &Config, json_mode: bool) -> Result<()> {
    let services = Services::new(config, connect(config)?);
    let report = services.repair.repair(&args.agent_id).await?;
    output(&report, json_mode);
    Ok(())
}

pub async fn reindex(args: AgentIdArgs, config: &Config, json_mode: bool) -> Result<()> {
    let services = Services::new(config, connect(config)?);
    let report = services.indexing.reindex_agent(&args.agent_id).await?;
    output(&report, json_mode);
    if !report.success {
        anyhow::bail!("no indexing job could be started for agent {}", args.agent_id);
    }
    Ok(())
}

pub async fn status(args: AgentIdArgs, config: &Config, json_mode: bool) -> Result<()> {
    let services = Services::new(config, connect(config)?);
    let report = services.status.describe_agent(&args.agent_id).await?;
    output(&report, json_mode);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{Agent, RetrievalSettings};
    use crate::services::RepairFailure;

    #[test]
    fn test_repair_human_output() {
        let report = RepairReport {
            agent_id: "a-1".to_string(),
            attached: vec!["kb-1".to_string()],
            already_attached: vec![],
            failed: vec![RepairFailure {
                kb_id: "kb-2".to_string(),
                error: "remote error: boom".to_string(),
            }],
        };
        let text = report.to_human();
        assert!(text.contains("attached          kb-1"));
        assert!(text.contains("kb-2: remote error: boom"));

        let json = report.to_json();
        assert_eq!(json["attached"][0], "kb-1");
    }

    #[test]
    fn test_status_human_output_without_kbs() {
        let report = AgentReport {
            agent: Agent {
                id: "a-1".to_string(),
                name: "Support Agent - acme.com".to_string(),
                region: "tor1".to_string(),
                settings: RetrievalSettings::default(),
                endpoint: String::new(),
                knowledge_base_ids: vec![],
            },
            domain: Some("acme.com".to_string()),
            knowledge_bases: vec![],
            orphans: vec![],
        };
        let text = report.to_human();
        assert!(text.contains("Domain: acme.com"));
        assert!(text.contains("Endpoint: -"));
        assert!(text.contains("No knowledge bases attached."));
        assert!(text.contains("Ready: no"));
    }
}
