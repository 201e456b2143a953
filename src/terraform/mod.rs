//! Terraform configuration: template selection, rendering, and the external
//! provisioning runner.

pub mod runner;
pub mod template;

pub use runner::{ProvisionError, TerraformRunner};
pub use template::{
    credential_variables, render, select_template, write_config, RenderError, Rendered,
};
