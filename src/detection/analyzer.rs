//! Repository analyzer.
//!
//! Inspects the immediate children of a conventional search root (`app/` or
//! `src/` when present, the repo root otherwise) and infers the application
//! stack from dependency manifests. Detection is mutually exclusive and
//! ordered: a Python manifest is checked before a Node one, and only one
//! branch runs. A missing manifest is not an error; the corresponding fields
//! simply stay unset.

use super::types::{AppInfo, Framework, Language, StaticSite};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Conventional application subdirectories, in priority order. Only one level
/// of indirection is checked.
const CONVENTIONAL_SUBDIRS: &[&str] = &["app", "src"];

/// Entry files recognized for Python applications.
const PYTHON_ENTRY_FILES: &[&str] = &["app.py", "main.py"];

const PYTHON_MANIFEST: &str = "requirements.txt";
const NODE_MANIFEST: &str = "package.json";

const STATIC_INDICATORS: &[&str] = &["index.html", "index.htm"];
const BUILD_DIRS: &[&str] = &["dist", "build", "public"];

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("path does not exist: {0}")]
    PathNotFound(PathBuf),
    #[error("path is not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("failed to read {path}: {source}")]
    FileRead { path: PathBuf, source: io::Error },
    #[error("failed to parse {path}: {source}")]
    ManifestParse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// The subset of `package.json` the analyzer cares about.
#[derive(Debug, Deserialize, Default)]
struct NodeManifest {
    #[serde(default)]
    dependencies: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    scripts: BTreeMap<String, String>,
}

/// Analyze a source tree and infer the application stack.
pub fn analyze(root: &Path) -> Result<AppInfo, AnalysisError> {
    if !root.exists() {
        return Err(AnalysisError::PathNotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(AnalysisError::NotADirectory(root.to_path_buf()));
    }

    let subdir = CONVENTIONAL_SUBDIRS
        .iter()
        .find(|d| root.join(d).is_dir())
        .copied();
    let search_root = match subdir {
        Some(d) => root.join(d),
        None => root.to_path_buf(),
    };
    debug!(search_root = %search_root.display(), "analyzing repository");

    let listing = list_dir(&search_root)?;

    let mut info = AppInfo::default();
    if listing.iter().any(|f| f == PYTHON_MANIFEST) {
        detect_python(&search_root, &mut info)?;
    } else if listing.iter().any(|f| f == NODE_MANIFEST) {
        detect_node(&search_root, &mut info)?;
    }

    backfill_entry(&listing, subdir, &mut info);

    Ok(info)
}

/// Python branch: read the requirements manifest line by line,
/// case-insensitive. Flask is checked before Django, so a manifest naming
/// both resolves to Flask (preserved ordering edge case).
fn detect_python(search_root: &Path, info: &mut AppInfo) -> Result<(), AnalysisError> {
    let path = search_root.join(PYTHON_MANIFEST);
    let deps = read_lowercase(&path)?;

    info.language = Some(Language::Python);
    info.dependencies = deps.lines().map(str::to_string).collect();

    if deps.contains("flask") {
        info.framework = Some(Framework::Flask);
        info.port = Some(5000);
    } else if deps.contains("django") {
        info.framework = Some(Framework::Django);
        info.port = Some(8000);
    }

    Ok(())
}

/// Node branch: parse the manifest as structured data. Dependency names come
/// from the `dependencies` keys; the start command from `scripts.start` when
/// present.
fn detect_node(search_root: &Path, info: &mut AppInfo) -> Result<(), AnalysisError> {
    let path = search_root.join(NODE_MANIFEST);
    let text = fs::read_to_string(&path).map_err(|source| AnalysisError::FileRead {
        path: path.clone(),
        source,
    })?;
    let manifest: NodeManifest =
        serde_json::from_str(&text).map_err(|source| AnalysisError::ManifestParse {
            path,
            source,
        })?;

    info.language = Some(Language::Node);
    info.framework = Some(Framework::Node);
    info.dependencies = manifest.dependencies.keys().cloned().collect();
    info.start_command = Some(
        manifest
            .scripts
            .get("start")
            .cloned()
            .unwrap_or_else(|| "node index.js".to_string()),
    );
    info.entry_file = Some("index.js".to_string());

    Ok(())
}

/// Second pass over the same listing: record the entry file and synthesize a
/// start command if detection left it unset, prefixing a directory change when
/// a conventional subdirectory was used.
fn backfill_entry(listing: &[String], subdir: Option<&str>, info: &mut AppInfo) {
    for file in listing {
        match info.language {
            Some(Language::Python) if PYTHON_ENTRY_FILES.contains(&file.as_str()) => {
                info.entry_file = Some(file.clone());
                if info.start_command.is_none() {
                    info.start_command = Some(match subdir {
                        Some(d) => format!("cd {} && python {}", d, file),
                        None => format!("python {}", file),
                    });
                }
            }
            Some(Language::Node) if file == "index.js" => {
                info.entry_file = Some("index.js".to_string());
                if info.start_command.is_none() {
                    info.start_command = Some(match subdir {
                        Some(d) => format!("cd {} && node index.js", d),
                        None => "node index.js".to_string(),
                    });
                }
            }
            _ => {}
        }
    }
}

/// Detect a static-asset tree: an index document at the root, or inside a
/// conventional build output directory. Advisory only; IO failures read as
/// "not a static site".
pub fn detect_static_site(root: &Path) -> Option<StaticSite> {
    let listing = list_dir(root).ok()?;
    if listing
        .iter()
        .any(|f| STATIC_INDICATORS.contains(&f.as_str()))
    {
        return Some(StaticSite {
            document_root: root.to_path_buf(),
        });
    }

    for build_dir in BUILD_DIRS {
        let build_path = root.join(build_dir);
        if !build_path.is_dir() {
            continue;
        }
        if let Ok(build_files) = list_dir(&build_path) {
            if build_files
                .iter()
                .any(|f| STATIC_INDICATORS.contains(&f.as_str()))
            {
                return Some(StaticSite {
                    document_root: build_path,
                });
            }
        }
    }

    None
}

/// Immediate children of a directory, as sorted file names.
fn list_dir(dir: &Path) -> Result<Vec<String>, AnalysisError> {
    let entries = fs::read_dir(dir).map_err(|source| AnalysisError::FileRead {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| AnalysisError::FileRead {
            path: dir.to_path_buf(),
            source,
        })?;
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    Ok(names)
}

fn read_lowercase(path: &Path) -> Result<String, AnalysisError> {
    fs::read_to_string(path)
        .map(|s| s.to_lowercase())
        .map_err(|source| AnalysisError::FileRead {
            path: path.to_path_buf(),
            source,
        })
}
