//! shipwright - natural-language deployment orchestrator
//!
//! This library turns a free-text deployment prompt ("deploy this flask app on
//! aws as serverless") and a source bundle (git URL or zip archive) into
//! provisioned infrastructure. It parses the prompt into a coarse intent,
//! analyzes the repository to infer the application stack, selects a
//! deployment strategy, patches the application for production binding,
//! renders Terraform configuration from templates, and drives the external
//! `terraform` binary.
//!
//! # Core Concepts
//!
//! - **Intent**: the cloud / application / infrastructure shape extracted from
//!   the prompt by ordered keyword matching
//! - **Analysis**: manifest-driven inspection of the source tree to infer
//!   language, framework, dependencies, entry file, and start command
//! - **Strategy**: the final infrastructure shape after combining explicit
//!   intent with heuristic inference (explicit intent always wins)
//! - **Patching**: in-place textual rewrites that make the application bind to
//!   all interfaces and disable development settings
//!
//! # Example Usage
//!
//! ```no_run
//! use shipwright::detection::analyze;
//! use shipwright::intent::ParsedIntent;
//! use shipwright::strategy::select;
//! use std::path::Path;
//!
//! # fn main() -> anyhow::Result<()> {
//! let repo = Path::new("deployments/current_app");
//! let intent = ParsedIntent::parse("deploy this flask app on aws");
//! let app_info = analyze(repo)?;
//! let strategy = select(&app_info, &intent, repo);
//! println!("strategy: {}", strategy);
//! # Ok(())
//! # }
//! ```
//!
//! # Project Structure
//!
//! - [`intent`]: prompt parsing into [`intent::ParsedIntent`]
//! - [`detection`]: repository analysis into [`detection::AppInfo`]
//! - [`strategy`]: deployment strategy selection
//! - [`patch`]: framework-specific production patches
//! - [`source`]: source acquisition (git clone, zip extraction)
//! - [`terraform`]: template rendering and the provisioning runner
//! - [`pipeline`]: the staged deployment run and its report

pub mod cli;
pub mod config;
pub mod detection;
pub mod intent;
pub mod patch;
pub mod pipeline;
pub mod source;
pub mod strategy;
pub mod terraform;
pub mod util;

pub use config::{ConfigError, ShipwrightConfig};
pub use detection::{analyze, AnalysisError, AppInfo, Framework, Language};
pub use intent::{AppType, Cloud, InfraType, ParsedIntent};
pub use pipeline::{RunContext, RunReport};
pub use strategy::{select, Strategy};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_name_is_shipwright() {
        assert_eq!(NAME, "shipwright");
    }
}
