//! The staged deployment run.
//!
//! Stages execute strictly in order: parse, acquire, analyze, strategy,
//! patch, render, provision. Each stage records an outcome in the
//! [`RunReport`]; acquisition, analysis, and rendering failures abort the
//! run, a patch failure is recorded and the run continues, and a
//! provisioning failure surfaces as a report with no endpoint.
//!
//! A [`RunContext`] carries the per-invocation paths and binary name that
//! every stage needs, replacing ambient global state. The default layout is
//! fixed (`deployments/current_app`, `deployments/tf_generated`) and shared
//! between consecutive runs; concurrent runs racing on these paths are
//! unsupported.

use crate::config::ShipwrightConfig;
use crate::detection::{self, AppInfo, StaticSite};
use crate::intent::{Cloud, ParsedIntent};
use crate::patch;
use crate::source::{self, SourceSpec};
use crate::strategy::{self, Strategy};
use crate::terraform::{self, TerraformRunner};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use tracing::{error, info, warn};

const APP_SUBDIR: &str = "current_app";
const GENERATED_SUBDIR: &str = "tf_generated";

/// Per-invocation dependencies threaded through every stage.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Working tree the source is fetched into.
    pub app_dir: PathBuf,
    /// Directory the generated configuration is written to.
    pub terraform_dir: PathBuf,
    /// Directory templates are loaded from.
    pub template_dir: PathBuf,
    /// Provisioning binary name or path.
    pub terraform_binary: String,
}

impl RunContext {
    pub fn from_config(config: &ShipwrightConfig) -> Self {
        Self {
            app_dir: config.deploy_dir.join(APP_SUBDIR),
            terraform_dir: config.deploy_dir.join(GENERATED_SUBDIR),
            template_dir: config.template_dir.clone(),
            terraform_binary: config.terraform_binary.clone(),
        }
    }
}

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Parse,
    Acquire,
    Analyze,
    Strategy,
    Patch,
    Render,
    Provision,
}

const STAGE_ORDER: &[Stage] = &[
    Stage::Parse,
    Stage::Acquire,
    Stage::Analyze,
    Stage::Strategy,
    Stage::Patch,
    Stage::Render,
    Stage::Provision,
];

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Parse => "parse",
            Stage::Acquire => "acquire",
            Stage::Analyze => "analyze",
            Stage::Strategy => "strategy",
            Stage::Patch => "patch",
            Stage::Render => "render",
            Stage::Provision => "provision",
        };
        write!(f, "{}", name)
    }
}

/// Outcome of a single stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "status")]
pub enum StageStatus {
    Completed,
    Failed { error: String },
    Skipped,
}

#[derive(Debug, Clone, Serialize)]
pub struct StageReport {
    pub stage: Stage,
    #[serde(flatten)]
    pub status: StageStatus,
}

/// Everything a run produced, collected stage by stage.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub prompt: String,
    pub intent: ParsedIntent,
    pub app_info: Option<AppInfo>,
    pub static_site: Option<StaticSite>,
    pub strategy: Option<Strategy>,
    pub template: Option<String>,
    pub endpoint: Option<String>,
    pub stages: Vec<StageReport>,
}

impl RunReport {
    fn new(prompt: &str, intent: ParsedIntent) -> Self {
        Self {
            prompt: prompt.to_string(),
            intent,
            app_info: None,
            static_site: None,
            strategy: None,
            template: None,
            endpoint: None,
            stages: Vec::new(),
        }
    }

    fn record(&mut self, stage: Stage, status: StageStatus) {
        self.stages.push(StageReport { stage, status });
    }

    /// Record a fatal failure and mark every remaining stage as skipped.
    fn abort(&mut self, stage: Stage, error: String) {
        self.record(stage, StageStatus::Failed { error });
        let after_failed = STAGE_ORDER
            .iter()
            .skip_while(|s| **s != stage)
            .skip(1);
        for remaining in after_failed {
            self.record(*remaining, StageStatus::Skipped);
        }
    }

    /// A run succeeded when it produced a public endpoint.
    pub fn succeeded(&self) -> bool {
        self.endpoint.is_some()
    }

    /// The first recorded stage failure, if any.
    pub fn failure(&self) -> Option<(Stage, &str)> {
        self.stages.iter().find_map(|report| match &report.status {
            StageStatus::Failed { error } => Some((report.stage, error.as_str())),
            _ => None,
        })
    }
}

/// Execute a full deployment run.
pub async fn run(ctx: &RunContext, prompt: &str, source: &SourceSpec) -> RunReport {
    let intent = ParsedIntent::parse(prompt);
    info!(
        cloud = ?intent.cloud,
        app = ?intent.app_type,
        infra = ?intent.infra_type,
        "parsed prompt"
    );
    let mut report = RunReport::new(prompt, intent);
    report.record(Stage::Parse, StageStatus::Completed);

    let repo_root = match source::acquire(source, &ctx.app_dir).await {
        Ok(path) => {
            report.record(Stage::Acquire, StageStatus::Completed);
            path
        }
        Err(e) => {
            error!("source acquisition failed: {}", e);
            report.abort(Stage::Acquire, e.to_string());
            return report;
        }
    };

    let app_info = match detection::analyze(&repo_root) {
        Ok(info) => {
            info!(%info, "application analysis complete");
            report.record(Stage::Analyze, StageStatus::Completed);
            info
        }
        Err(e) => {
            error!("repository analysis failed: {}", e);
            report.abort(Stage::Analyze, e.to_string());
            return report;
        }
    };
    if app_info.language.is_none() {
        report.static_site = detection::detect_static_site(&repo_root);
        if let Some(site) = &report.static_site {
            info!(root = %site.document_root.display(), "static asset tree detected");
        }
    }
    report.app_info = Some(app_info.clone());

    let strategy = strategy::select(&app_info, &report.intent, &repo_root);
    info!(%strategy, "chosen deployment strategy");
    report.strategy = Some(strategy);
    report.record(Stage::Strategy, StageStatus::Completed);

    match patch::apply(&app_info, &repo_root) {
        Ok(patched) => {
            info!(files = patched.len(), "application patches applied");
            report.record(Stage::Patch, StageStatus::Completed);
        }
        Err(e) => {
            warn!("patching failed, continuing unpatched: {}", e);
            report.record(
                Stage::Patch,
                StageStatus::Failed {
                    error: e.to_string(),
                },
            );
        }
    }

    let cloud = report.intent.cloud.unwrap_or(Cloud::Aws);
    let template_name = terraform::select_template(cloud, strategy);
    report.template = Some(template_name.to_string());
    let rendered = match terraform::render(
        &ctx.template_dir,
        template_name,
        &app_info,
        &source.reference(),
    ) {
        Ok(rendered) => rendered,
        Err(e) => {
            error!("template rendering failed: {}", e);
            report.abort(Stage::Render, e.to_string());
            return report;
        }
    };
    if let Err(e) = terraform::write_config(&ctx.terraform_dir, &rendered) {
        error!("failed to write generated configuration: {}", e);
        report.abort(Stage::Render, e.to_string());
        return report;
    }
    info!(dir = %ctx.terraform_dir.display(), "terraform files generated");
    report.record(Stage::Render, StageStatus::Completed);

    let runner = TerraformRunner::new(&ctx.terraform_binary);
    match runner.provision(&ctx.terraform_dir).await {
        Ok(Some(ip)) => {
            report.endpoint = Some(ip);
            report.record(Stage::Provision, StageStatus::Completed);
        }
        Ok(None) => {
            report.record(
                Stage::Provision,
                StageStatus::Failed {
                    error: "provisioning produced no public endpoint".to_string(),
                },
            );
        }
        Err(e) => {
            error!("provisioning runner failed: {}", e);
            report.record(
                Stage::Provision,
                StageStatus::Failed {
                    error: e.to_string(),
                },
            );
        }
    }

    report
}
