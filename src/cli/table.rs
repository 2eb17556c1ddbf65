//! Table output formatting for CLI commands
//!
//! Knowledge base, orphan and reindex tables built with comfy-table.

use comfy_table::{presets, Attribute, Cell, Color, ContentArrangement, Table};
use std::env;

use crate::cli::output::truncate;
use crate::domain::models::{KnowledgeBaseSnapshot, Readiness};
use crate::services::{KbReport, ReindexResult, TriggerStatus};

/// Table formatter for CLI output
pub struct TableFormatter {
    use_colors: bool,
}

impl TableFormatter {
    pub fn new() -> Self {
        Self {
            use_colors: supports_color(),
        }
    }

    pub const fn with_colors(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Attached knowledge bases with their readiness.
    pub fn format_kb_reports(&self, reports: &[KbReport]) -> String {
        let mut table = create_base_table();
        table.set_header(header(&["ID", "Name", "Docs", "Job", "Ready", "Reason"]));

        for report in reports {
            match (&report.snapshot, &report.readiness) {
                (Some(kb), Some(readiness)) => {
                    table.add_row(vec![
                        Cell::new(&report.kb_id),
                        Cell::new(truncate(&kb.name, 40)),
                        Cell::new(kb.document_count),
                        Cell::new(kb.job_status.as_deref().unwrap_or("-")),
                        self.readiness_cell(readiness),
                        Cell::new(truncate(&readiness.reason, 50)),
                    ]);
                }
                _ => {
                    let error = report.error.as_deref().unwrap_or("unavailable");
                    table.add_row(vec![
                        Cell::new(&report.kb_id),
                        Cell::new("-"),
                        Cell::new("-"),
                        Cell::new("-"),
                        self.colored("error", Color::Red),
                        Cell::new(truncate(error, 50)),
                    ]);
                }
            }
        }

        table.to_string()
    }

    /// Knowledge bases that match the agent's naming but are not attached.
    pub fn format_orphans(&self, orphans: &[KnowledgeBaseSnapshot]) -> String {
        let mut table = create_base_table();
        table.set_header(header(&["ID", "Name", "Region", "Docs", "Sources"]));

        for kb in orphans {
            table.add_row(vec![
                Cell::new(&kb.id),
                Cell::new(truncate(&kb.name, 40)),
                Cell::new(&kb.region),
                Cell::new(kb.document_count),
                Cell::new(truncate(&kb.sources.join(", "), 50)),
            ]);
        }

        table.to_string()
    }

    /// Per-KB outcome of a reindex run.
    pub fn format_reindex_results(&self, results: &[ReindexResult]) -> String {
        let mut table = create_base_table();
        table.set_header(header(&["KB", "Name", "Status", "Job", "Readiness"]));

        for result in results {
            let status = match result.status {
                TriggerStatus::Started => self.colored("started", Color::Green),
                TriggerStatus::Error => self.colored("error", Color::Red),
            };
            let job = result
                .job_id
                .clone()
                .or_else(|| result.error.as_deref().map(|e| truncate(e, 40)))
                .unwrap_or_else(|| "-".to_string());

            table.add_row(vec![
                Cell::new(&result.kb_id),
                Cell::new(result.kb_name.as_deref().map_or_else(|| "-".to_string(), |n| truncate(n, 40))),
                status,
                Cell::new(job),
                Cell::new(truncate(&result.readiness.reason, 40)),
            ]);
        }

        table.to_string()
    }

    fn readiness_cell(&self, readiness: &Readiness) -> Cell {
        if readiness.ready {
            self.colored("yes", Color::Green)
        } else if readiness.has_content {
            self.colored("no", Color::Yellow)
        } else {
            self.colored("no", Color::Red)
        }
    }

    fn colored(&self, text: &str, color: Color) -> Cell {
        if self.use_colors {
            Cell::new(text).fg(color)
        } else {
            Cell::new(text)
        }
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn create_base_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn header(titles: &[&str]) -> Vec<Cell> {
    titles
        .iter()
        .map(|t| Cell::new(t).add_attribute(Attribute::Bold))
        .collect()
}

/// Check if color output is supported
fn supports_color() -> bool {
    if env::var("NO_COLOR").is_ok() {
        return false;
    }
    if env::var("TERM").is_ok_and(|term| term == "dumb") {
        return false;
    }
    console::colors_enabled()
}
