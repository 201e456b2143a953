//! Output formatting for the run report.

use crate::pipeline::{RunReport, StageStatus};
use anyhow::{Context, Result};
use std::fmt::Write as _;

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable formatted text
    Human,
    /// JSON format (machine-readable)
    Json,
}

/// Formatter for deployment run reports.
pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self, report: &RunReport) -> Result<String> {
        match self.format {
            OutputFormat::Human => Ok(format_human(report)),
            OutputFormat::Json => {
                serde_json::to_string_pretty(report).context("failed to serialize run report")
            }
        }
    }
}

fn format_human(report: &RunReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Deployment report");
    let _ = writeln!(out, "  prompt:    {}", report.prompt);
    let _ = writeln!(
        out,
        "  intent:    cloud={} app={} infra={}",
        opt(&report.intent.cloud),
        opt(&report.intent.app_type),
        opt(&report.intent.infra_type)
    );
    if let Some(info) = &report.app_info {
        let _ = writeln!(
            out,
            "  analysis:  language={} framework={} dependencies={}",
            opt(&info.language),
            opt(&info.framework),
            info.dependencies.len()
        );
        if let Some(start) = &info.start_command {
            let _ = writeln!(out, "  start:     {}", start);
        }
    }
    if let Some(site) = &report.static_site {
        let _ = writeln!(out, "  static:    {}", site.document_root.display());
    }
    if let Some(strategy) = &report.strategy {
        let _ = writeln!(out, "  strategy:  {}", strategy);
    }
    if let Some(template) = &report.template {
        let _ = writeln!(out, "  template:  {}", template);
    }
    let _ = writeln!(out, "  stages:");
    for stage in &report.stages {
        let status = match &stage.status {
            StageStatus::Completed => "completed".to_string(),
            StageStatus::Failed { error } => format!("failed: {}", error),
            StageStatus::Skipped => "skipped".to_string(),
        };
        let _ = writeln!(out, "    {:<10} {}", stage.stage.to_string(), status);
    }
    if let Some(endpoint) = &report.endpoint {
        let _ = writeln!(out, "  endpoint:  {}", endpoint);
    }
    out.trim_end().to_string()
}

fn opt<T: std::fmt::Display>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map(|v| v.to_string())
        .unwrap_or_else(|| "-".to_string())
}
