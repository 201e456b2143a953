//! Prompt parsing: free-text deployment prompts to coarse intent.
//!
//! The parser lower-cases the prompt and scans a fixed ordered keyword list
//! per field; the first match wins and absent keywords leave the field unset.
//! Parsing is side-effect free and never fails.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Target cloud provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cloud {
    Aws,
    Gcp,
    Azure,
}

impl fmt::Display for Cloud {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cloud::Aws => write!(f, "aws"),
            Cloud::Gcp => write!(f, "gcp"),
            Cloud::Azure => write!(f, "azure"),
        }
    }
}

/// Application kind named in the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppType {
    Flask,
    Django,
    Node,
    Static,
}

impl fmt::Display for AppType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppType::Flask => write!(f, "flask"),
            AppType::Django => write!(f, "django"),
            AppType::Node => write!(f, "node"),
            AppType::Static => write!(f, "static"),
        }
    }
}

/// Infrastructure shape named in the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InfraType {
    Vm,
    Serverless,
    Kubernetes,
}

impl fmt::Display for InfraType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InfraType::Vm => write!(f, "vm"),
            InfraType::Serverless => write!(f, "serverless"),
            InfraType::Kubernetes => write!(f, "kubernetes"),
        }
    }
}

/// Intent extracted from a deployment prompt.
///
/// Immutable once produced; every field is optional because the prompt may
/// name any subset of cloud, application, and infrastructure shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedIntent {
    pub cloud: Option<Cloud>,
    pub app_type: Option<AppType>,
    pub infra_type: Option<InfraType>,
}

impl ParsedIntent {
    /// Parse a free-text prompt into a coarse intent triple.
    ///
    /// Keyword ordering is load-bearing: "aws" is checked before "gcp" before
    /// "azure", "flask" before "django" before "node"/"express" before
    /// "static", and "kubernetes" before "serverless" before "vm"/"ec2".
    pub fn parse(prompt: &str) -> Self {
        let prompt = prompt.to_lowercase();

        let cloud = if prompt.contains("aws") {
            Some(Cloud::Aws)
        } else if prompt.contains("gcp") {
            Some(Cloud::Gcp)
        } else if prompt.contains("azure") {
            Some(Cloud::Azure)
        } else {
            None
        };

        let app_type = if prompt.contains("flask") {
            Some(AppType::Flask)
        } else if prompt.contains("django") {
            Some(AppType::Django)
        } else if prompt.contains("node") || prompt.contains("express") {
            Some(AppType::Node)
        } else if prompt.contains("static") {
            Some(AppType::Static)
        } else {
            None
        };

        let infra_type = if prompt.contains("kubernetes") {
            Some(InfraType::Kubernetes)
        } else if prompt.contains("serverless") {
            Some(InfraType::Serverless)
        } else if prompt.contains("vm") || prompt.contains("ec2") {
            Some(InfraType::Vm)
        } else {
            None
        };

        Self {
            cloud,
            app_type,
            infra_type,
        }
    }
}
