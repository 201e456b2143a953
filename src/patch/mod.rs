//! Framework-specific production patches.
//!
//! Each patcher mutates source files in place to make the application
//! container-friendly: bind to all interfaces, disable debug settings, ensure
//! a start script exists. Dispatch is by detected framework and mutually
//! exclusive. Substring-presence guards keep a second run from corrupting an
//! already-patched tree; there is no backup or rollback.

mod django;
mod flask;
mod node;

use crate::detection::{AppInfo, Framework};
use regex::RegexSet;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;
use walkdir::{DirEntry, WalkDir};

#[derive(Error, Debug)]
pub enum PatchError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("failed to parse {path}: {source}")]
    ManifestParse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("manifest {0} is not a JSON object")]
    ManifestShape(PathBuf),
    #[error("directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("invalid ignore pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// Directory names skipped by the recursive patch walks.
const SKIP_DIR_PATTERNS: &[&str] = &[
    r"^\.git$",
    r"^node_modules$",
    r"^venv$",
    r"^\.venv$",
    r"^__pycache__$",
    r"^dist$",
    r"^build$",
    r"^target$",
    r"^vendor$",
];

/// Apply the patch set for the detected framework.
///
/// Returns the files that were rewritten. A repository with no detected
/// framework is left untouched.
pub fn apply(app_info: &AppInfo, repo_root: &Path) -> Result<Vec<PathBuf>, PatchError> {
    let patched = match app_info.framework {
        Some(Framework::Flask) => {
            let files = flask::bind_all_interfaces(repo_root)?;
            if !files.is_empty() {
                info!("applied Flask host binding patch");
            }
            files
        }
        Some(Framework::Django) => django::harden_settings(repo_root)?,
        Some(Framework::Node) => node::ensure_start_script(repo_root)?,
        None => Vec::new(),
    };
    Ok(patched)
}

/// Walk a tree collecting files with the given name, skipping vendored and
/// generated directories.
fn find_files_named(root: &Path, name: &str) -> Result<Vec<PathBuf>, PatchError> {
    let skip = RegexSet::new(SKIP_DIR_PATTERNS)?;
    let mut found = Vec::new();
    let walker = WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| !is_skipped_dir(e, &skip));
    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_file() && entry.file_name() == name {
            found.push(entry.into_path());
        }
    }
    Ok(found)
}

fn is_skipped_dir(entry: &DirEntry, skip: &RegexSet) -> bool {
    entry.file_type().is_dir() && skip.is_match(&entry.file_name().to_string_lossy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_no_framework_is_a_noop() {
        let repo = TempDir::new().unwrap();
        fs::write(repo.path().join("README.md"), "hello").unwrap();
        let patched = apply(&AppInfo::default(), repo.path()).unwrap();
        assert!(patched.is_empty());
    }

    #[test]
    fn test_find_files_named_skips_vendored_dirs() {
        let repo = TempDir::new().unwrap();
        fs::create_dir_all(repo.path().join("site/config")).unwrap();
        fs::create_dir_all(repo.path().join("node_modules/pkg")).unwrap();
        fs::write(repo.path().join("site/config/settings.py"), "").unwrap();
        fs::write(repo.path().join("node_modules/pkg/settings.py"), "").unwrap();

        let found = find_files_named(repo.path(), "settings.py").unwrap();
        assert_eq!(found.len(), 1);
        assert!(found[0].ends_with("site/config/settings.py"));
    }
}
