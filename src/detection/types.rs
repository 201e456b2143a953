use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Default port used when analysis could not determine one.
pub const DEFAULT_PORT: u16 = 5000;

/// Detected implementation language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    Node,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::Python => write!(f, "python"),
            Language::Node => write!(f, "node"),
        }
    }
}

/// Detected application framework.
///
/// Invariant: Flask and Django imply [`Language::Python`]; Node implies
/// [`Language::Node`]. The analyzer only ever sets a framework together with
/// its matching language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Framework {
    Flask,
    Django,
    Node,
}

impl Framework {
    /// The language this framework implies.
    pub fn language(&self) -> Language {
        match self {
            Framework::Flask | Framework::Django => Language::Python,
            Framework::Node => Language::Node,
        }
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Framework::Flask => write!(f, "flask"),
            Framework::Django => write!(f, "django"),
            Framework::Node => write!(f, "node"),
        }
    }
}

/// Result of a repository analysis pass.
///
/// Built once per run; later stages read it but never mutate it (patches
/// rewrite the repository files instead).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppInfo {
    pub language: Option<Language>,
    pub framework: Option<Framework>,
    /// Raw dependency names: lower-cased requirement lines for Python,
    /// `dependencies` keys for Node.
    pub dependencies: Vec<String>,
    pub start_command: Option<String>,
    pub port: Option<u16>,
    pub entry_file: Option<String>,
}

impl AppInfo {
    /// The port to expose, falling back to the default when analysis found
    /// none.
    pub fn port_or_default(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }
}

impl fmt::Display for AppInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "language: {}, framework: {}, {} dependencies",
            self.language.map(|l| l.to_string()).unwrap_or_else(|| "unknown".into()),
            self.framework.map(|fw| fw.to_string()).unwrap_or_else(|| "unknown".into()),
            self.dependencies.len()
        )
    }
}

/// A static-asset tree discovered when no application stack was detected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticSite {
    /// Directory holding the index document (the repo root or a build
    /// output directory).
    pub document_root: PathBuf,
}
