//! Configuration management.
//!
//! Settings load from environment variables with fixed defaults that match
//! the conventional on-disk layout: working trees under `deployments/`,
//! templates under `terraform_templates/`, logs under `logs/`.
//!
//! # Environment Variables
//!
//! - `SHIPWRIGHT_DEPLOY_DIR`: deployment workspace root - default: "deployments"
//! - `SHIPWRIGHT_TEMPLATE_DIR`: template directory - default: "terraform_templates"
//! - `SHIPWRIGHT_LOG_DIR`: log directory - default: "logs"
//! - `SHIPWRIGHT_TERRAFORM_BIN`: provisioning binary - default: "terraform"
//! - `SHIPWRIGHT_LOG_LEVEL`: logging level - default: "info"

use std::env;
use std::path::PathBuf;
use thiserror::Error;

const DEFAULT_DEPLOY_DIR: &str = "deployments";
const DEFAULT_TEMPLATE_DIR: &str = "terraform_templates";
const DEFAULT_LOG_DIR: &str = "logs";
const DEFAULT_TERRAFORM_BIN: &str = "terraform";
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("template directory does not exist: {0}")]
    MissingTemplateDir(PathBuf),
}

/// Runtime configuration, one instance per invocation.
#[derive(Debug, Clone)]
pub struct ShipwrightConfig {
    /// Root for per-run working trees and generated configuration.
    pub deploy_dir: PathBuf,
    /// Directory the template loader reads from.
    pub template_dir: PathBuf,
    /// Directory for per-run log files.
    pub log_dir: PathBuf,
    /// Name or path of the provisioning binary.
    pub terraform_binary: String,
    /// Logging level used when no flag or `RUST_LOG` overrides it.
    pub log_level: String,
}

impl Default for ShipwrightConfig {
    fn default() -> Self {
        Self {
            deploy_dir: env_path("SHIPWRIGHT_DEPLOY_DIR", DEFAULT_DEPLOY_DIR),
            template_dir: env_path("SHIPWRIGHT_TEMPLATE_DIR", DEFAULT_TEMPLATE_DIR),
            log_dir: env_path("SHIPWRIGHT_LOG_DIR", DEFAULT_LOG_DIR),
            terraform_binary: env::var("SHIPWRIGHT_TERRAFORM_BIN")
                .unwrap_or_else(|_| DEFAULT_TERRAFORM_BIN.to_string()),
            log_level: env::var("SHIPWRIGHT_LOG_LEVEL")
                .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string()),
        }
    }
}

impl ShipwrightConfig {
    /// Check that the parts of the environment a run depends on are present.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.template_dir.is_dir() {
            return Err(ConfigError::MissingTemplateDir(self.template_dir.clone()));
        }
        Ok(())
    }
}

fn env_path(var: &str, default: &str) -> PathBuf {
    env::var(var).map(PathBuf::from).unwrap_or_else(|_| PathBuf::from(default))
}
