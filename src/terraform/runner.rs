//! External provisioning runner.
//!
//! Drives the `terraform` binary through init, apply, and output in the
//! generated-configuration directory. All output is captured and logged,
//! never streamed. A non-zero init or apply exit short-circuits to "no
//! endpoint", as does a malformed output document; only a failure to launch
//! the binary at all is an error. There is deliberately no timeout: a hung
//! terraform blocks the run.

use serde_json::Value;
use std::io;
use std::path::Path;
use std::process::Output;
use thiserror::Error;
use tokio::process::Command;
use tracing::{error, info};

#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error("failed to launch {program}: {source}")]
    Launch { program: String, source: io::Error },
}

/// Runner for the external provisioning binary.
pub struct TerraformRunner {
    binary: String,
}

impl TerraformRunner {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Provision the configuration in `work_dir` and extract the public
    /// endpoint. `Ok(None)` means the tool ran but produced no endpoint.
    pub async fn provision(&self, work_dir: &Path) -> Result<Option<String>, ProvisionError> {
        info!("initializing terraform");
        let init = self.run(work_dir, &["init"]).await?;
        info!("terraform init output: {}", stdout_of(&init));
        if !init.status.success() {
            error!("terraform init failed: {}", stderr_of(&init));
            return Ok(None);
        }

        info!("applying terraform configuration");
        let apply = self.run(work_dir, &["apply", "-auto-approve"]).await?;
        info!("terraform apply output: {}", stdout_of(&apply));
        if !apply.status.success() {
            error!("terraform apply failed: {}", stderr_of(&apply));
            return Ok(None);
        }

        let output = self.run(work_dir, &["output", "-json"]).await?;
        match parse_public_ip(&output.stdout) {
            Some(ip) => {
                info!(public_ip = %ip, "infrastructure provisioned");
                Ok(Some(ip))
            }
            None => {
                error!("failed to extract terraform outputs");
                Ok(None)
            }
        }
    }

    async fn run(&self, work_dir: &Path, args: &[&str]) -> Result<Output, ProvisionError> {
        Command::new(&self.binary)
            .args(args)
            .current_dir(work_dir)
            .output()
            .await
            .map_err(|source| ProvisionError::Launch {
                program: self.binary.clone(),
                source,
            })
    }
}

impl Default for TerraformRunner {
    fn default() -> Self {
        Self::new("terraform")
    }
}

/// Pull `public_ip.value` out of a `terraform output -json` document.
fn parse_public_ip(stdout: &[u8]) -> Option<String> {
    let outputs: Value = serde_json::from_slice(stdout).ok()?;
    outputs
        .get("public_ip")?
        .get("value")?
        .as_str()
        .map(str::to_string)
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).trim().to_string()
}
