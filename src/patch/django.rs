//! Django patch: allow all hosts and disable debug mode in every settings
//! module under the tree.

use super::{find_files_named, PatchError};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

const SETTINGS_FILE: &str = "settings.py";
const ALLOWED_HOSTS: &str = "ALLOWED_HOSTS";
const EMPTY_ALLOWED_HOSTS: &str = "ALLOWED_HOSTS = []";
const ALLOW_ALL_HOSTS: &str = "ALLOWED_HOSTS = [\"*\"]";
const DEBUG_ON: &str = "DEBUG = True";
const DEBUG_OFF: &str = "DEBUG = False";

/// Rewrite every `settings.py` found under the tree. An absent allow-list
/// directive is appended, an empty one is widened, and a debug-enabled
/// assignment is turned off. Every matched file is written back, matching the
/// original write-always behavior.
pub(super) fn harden_settings(repo_root: &Path) -> Result<Vec<PathBuf>, PatchError> {
    let settings_files = find_files_named(repo_root, SETTINGS_FILE)?;

    let mut patched = Vec::new();
    for path in settings_files {
        let mut content = fs::read_to_string(&path).map_err(|source| PatchError::Read {
            path: path.clone(),
            source,
        })?;

        if !content.contains(ALLOWED_HOSTS) {
            content.push_str("\nALLOWED_HOSTS = [\"*\"]\n");
        } else if content.contains(EMPTY_ALLOWED_HOSTS) {
            content = content.replace(EMPTY_ALLOWED_HOSTS, ALLOW_ALL_HOSTS);
        }

        if content.contains(DEBUG_ON) {
            content = content.replace(DEBUG_ON, DEBUG_OFF);
        }

        fs::write(&path, &content).map_err(|source| PatchError::Write {
            path: path.clone(),
            source,
        })?;
        info!(file = %path.display(), "patched Django settings");
        patched.push(path);
    }

    Ok(patched)
}
