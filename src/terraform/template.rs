//! Template selection and rendering.
//!
//! Template names come from a fixed cloud × shape matrix. Rendering
//! interpolates the source reference, start command, port, framework tag,
//! and language tag into the selected template. The credential-variables
//! block is an independent lookup keyed by the cloud token at the front of
//! the template name, with the AWS set as the fallback for unrecognized
//! tokens.

use crate::detection::types::DEFAULT_PORT;
use crate::detection::AppInfo;
use crate::intent::Cloud;
use crate::strategy::Strategy;
use minijinja::{context, path_loader, Environment};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),
    #[error("failed to write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

/// Rendered infrastructure configuration.
#[derive(Debug, Clone)]
pub struct Rendered {
    pub main_tf: String,
    pub variables_tf: String,
}

const AWS_VARIABLES: &str = r#"variable "aws_access_key" {}
variable "aws_secret_key" {}
variable "ami_id" {}
variable "key_name" {}
variable "private_key_path" {}
"#;

const GCP_VARIABLES: &str = r#"variable "project_id" {}
variable "credentials_file" {}
variable "region" {}
variable "zone" {}
"#;

const AZURE_VARIABLES: &str = r#"variable "subscription_id" {}
variable "client_id" {}
variable "client_secret" {}
variable "tenant_id" {}
variable "resource_group_name" {}
"#;

/// Map a cloud and strategy to a template name.
pub fn select_template(cloud: Cloud, strategy: Strategy) -> &'static str {
    match (cloud, strategy) {
        (Cloud::Aws, Strategy::Vm) => "aws_vm.tf.j2",
        (Cloud::Aws, Strategy::Serverless) => "aws_lambda.tf.j2",
        (Cloud::Aws, Strategy::Kubernetes) => "aws_eks.tf.j2",
        (Cloud::Gcp, Strategy::Vm) => "gcp_vm.tf.j2",
        (Cloud::Gcp, Strategy::Serverless) => "gcp_functions.tf.j2",
        (Cloud::Gcp, Strategy::Kubernetes) => "gcp_gke.tf.j2",
        (Cloud::Azure, Strategy::Vm) => "azure_vm.tf.j2",
        (Cloud::Azure, Strategy::Serverless) => "azure_functions.tf.j2",
        (Cloud::Azure, Strategy::Kubernetes) => "azure_aks.tf.j2",
    }
}

/// Render the selected template and its credential-variables block.
pub fn render(
    template_dir: &Path,
    template_name: &str,
    app_info: &AppInfo,
    source_ref: &str,
) -> Result<Rendered, RenderError> {
    let mut env = Environment::new();
    env.set_loader(path_loader(template_dir));
    let template = env.get_template(template_name)?;

    let main_tf = template.render(context! {
        repo_url => source_ref,
        start_command => app_info.start_command.clone().unwrap_or_default(),
        port => app_info.port.unwrap_or(DEFAULT_PORT),
        app_type => app_info.framework.map(|f| f.to_string()).unwrap_or_default(),
        language => app_info.language.map(|l| l.to_string()).unwrap_or_default(),
    })?;

    let variables_tf = credential_variables(cloud_token(template_name)).to_string();

    debug!(template = template_name, "rendered infrastructure configuration");
    Ok(Rendered {
        main_tf,
        variables_tf,
    })
}

/// Credential variable declarations for a cloud token. Unrecognized tokens
/// fall back to the AWS set.
pub fn credential_variables(cloud: &str) -> &'static str {
    match cloud {
        "gcp" => GCP_VARIABLES,
        "azure" => AZURE_VARIABLES,
        _ => AWS_VARIABLES,
    }
}

/// Write `main.tf` and `variables.tf` into the generated-configuration
/// directory, creating it if needed.
pub fn write_config(out_dir: &Path, rendered: &Rendered) -> Result<(), RenderError> {
    fs::create_dir_all(out_dir).map_err(|source| RenderError::Write {
        path: out_dir.to_path_buf(),
        source,
    })?;
    let main_path = out_dir.join("main.tf");
    fs::write(&main_path, &rendered.main_tf).map_err(|source| RenderError::Write {
        path: main_path,
        source,
    })?;
    let vars_path = out_dir.join("variables.tf");
    fs::write(&vars_path, &rendered.variables_tf).map_err(|source| RenderError::Write {
        path: vars_path,
        source,
    })?;
    Ok(())
}

/// First `_`-separated token of a template name, used as the cloud key for
/// the variables lookup.
fn cloud_token(template_name: &str) -> &str {
    template_name.split('_').next().unwrap_or("aws")
}
