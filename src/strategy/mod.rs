//! Deployment strategy selection.
//!
//! Combines the parsed intent with the repository analysis into a single
//! infrastructure shape. Rules are ordered and the first match wins; explicit
//! user intent overrides every inference. Selection never fails.

use crate::detection::{AppInfo, Framework};
use crate::intent::{InfraType, ParsedIntent};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// A Flask app with fewer dependency lines than this is treated as
/// lightweight enough for serverless.
const LIGHTWEIGHT_DEP_LIMIT: usize = 5;

/// The selected infrastructure shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Vm,
    Serverless,
    Kubernetes,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Vm => write!(f, "vm"),
            Strategy::Serverless => write!(f, "serverless"),
            Strategy::Kubernetes => write!(f, "kubernetes"),
        }
    }
}

impl From<InfraType> for Strategy {
    fn from(infra: InfraType) -> Self {
        match infra {
            InfraType::Vm => Strategy::Vm,
            InfraType::Serverless => Strategy::Serverless,
            InfraType::Kubernetes => Strategy::Kubernetes,
        }
    }
}

/// Select the deployment strategy for an analyzed repository.
///
/// The "express" rule is a literal membership test over raw dependency names:
/// it fires only when a package literally named `express` is a direct
/// dependency. Correct for typical Express apps, fragile otherwise; the exact
/// semantics are kept on purpose.
pub fn select(app_info: &AppInfo, intent: &ParsedIntent, repo_root: &Path) -> Strategy {
    if let Some(infra) = intent.infra_type {
        return infra.into();
    }

    match app_info.framework {
        Some(Framework::Flask) if app_info.dependencies.len() < LIGHTWEIGHT_DEP_LIMIT => {
            return Strategy::Serverless;
        }
        Some(Framework::Django) => return Strategy::Vm,
        _ => {}
    }

    if app_info.dependencies.iter().any(|d| d == "express") {
        return Strategy::Serverless;
    }

    if repo_root.join("Dockerfile").exists() {
        return Strategy::Kubernetes;
    }

    Strategy::Vm
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::Framework;
    use std::fs;
    use tempfile::TempDir;

    fn intent_with_infra(infra: Option<InfraType>) -> ParsedIntent {
        ParsedIntent {
            cloud: None,
            app_type: None,
            infra_type: infra,
        }
    }

    fn app(framework: Option<Framework>, deps: &[&str]) -> AppInfo {
        AppInfo {
            framework,
            dependencies: deps.iter().map(|d| d.to_string()).collect(),
            ..AppInfo::default()
        }
    }

    #[test]
    fn test_explicit_intent_overrides_all_inference() {
        let repo = TempDir::new().unwrap();
        let django = app(Some(Framework::Django), &["django"]);
        let strategy = select(
            &django,
            &intent_with_infra(Some(InfraType::Serverless)),
            repo.path(),
        );
        assert_eq!(strategy, Strategy::Serverless);
    }

    #[test]
    fn test_lightweight_flask_is_serverless() {
        let repo = TempDir::new().unwrap();
        let flask = app(Some(Framework::Flask), &["flask", "requests"]);
        assert_eq!(
            select(&flask, &intent_with_infra(None), repo.path()),
            Strategy::Serverless
        );
    }

    #[test]
    fn test_heavy_flask_falls_through_to_default() {
        let repo = TempDir::new().unwrap();
        let flask = app(
            Some(Framework::Flask),
            &["flask", "requests", "celery", "redis", "sqlalchemy", "boto3"],
        );
        assert_eq!(
            select(&flask, &intent_with_infra(None), repo.path()),
            Strategy::Vm
        );
    }

    #[test]
    fn test_heavy_flask_with_dockerfile_is_kubernetes() {
        let repo = TempDir::new().unwrap();
        fs::write(repo.path().join("Dockerfile"), "FROM python:3.11\n").unwrap();
        let flask = app(
            Some(Framework::Flask),
            &["flask", "requests", "celery", "redis", "sqlalchemy"],
        );
        assert_eq!(
            select(&flask, &intent_with_infra(None), repo.path()),
            Strategy::Kubernetes
        );
    }

    #[test]
    fn test_django_is_vm_even_with_dockerfile() {
        let repo = TempDir::new().unwrap();
        fs::write(repo.path().join("Dockerfile"), "FROM python:3.11\n").unwrap();
        let django = app(Some(Framework::Django), &["django"]);
        assert_eq!(
            select(&django, &intent_with_infra(None), repo.path()),
            Strategy::Vm
        );
    }

    #[test]
    fn test_express_dependency_is_serverless() {
        let repo = TempDir::new().unwrap();
        let node = app(Some(Framework::Node), &["express", "morgan"]);
        assert_eq!(
            select(&node, &intent_with_infra(None), repo.path()),
            Strategy::Serverless
        );
    }

    #[test]
    fn test_express_must_match_exactly() {
        let repo = TempDir::new().unwrap();
        let node = app(Some(Framework::Node), &["express-session"]);
        assert_eq!(
            select(&node, &intent_with_infra(None), repo.path()),
            Strategy::Vm
        );
    }

    #[test]
    fn test_default_is_vm() {
        let repo = TempDir::new().unwrap();
        assert_eq!(
            select(&app(None, &[]), &intent_with_infra(None), repo.path()),
            Strategy::Vm
        );
    }
}
