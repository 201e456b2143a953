//! Node patch: guarantee a `scripts.start` entry in the package manifest.

use super::{find_files_named, PatchError};
use serde_json::{json, Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

const NODE_MANIFEST: &str = "package.json";
const DEFAULT_ENTRY: &str = "index.js";

/// Locate the first `package.json` in walk order and make sure it declares a
/// start script, synthesizing `node <main>` from the manifest's declared
/// entry module when absent. The file is rewritten as reformatted JSON.
pub(super) fn ensure_start_script(repo_root: &Path) -> Result<Vec<PathBuf>, PatchError> {
    let Some(path) = find_files_named(repo_root, NODE_MANIFEST)?.into_iter().next() else {
        return Ok(Vec::new());
    };

    let text = fs::read_to_string(&path).map_err(|source| PatchError::Read {
        path: path.clone(),
        source,
    })?;
    let mut manifest: Value =
        serde_json::from_str(&text).map_err(|source| PatchError::ManifestParse {
            path: path.clone(),
            source,
        })?;

    let main = manifest
        .get("main")
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_ENTRY)
        .to_string();

    let obj = manifest
        .as_object_mut()
        .ok_or_else(|| PatchError::ManifestShape(path.clone()))?;
    let scripts = obj
        .entry("scripts")
        .or_insert_with(|| Value::Object(Map::new()));
    let scripts = scripts
        .as_object_mut()
        .ok_or_else(|| PatchError::ManifestShape(path.clone()))?;
    if !scripts.contains_key("start") {
        scripts.insert("start".to_string(), json!(format!("node {}", main)));
    }

    let mut rendered = serde_json::to_string_pretty(&manifest).map_err(|source| {
        PatchError::ManifestParse {
            path: path.clone(),
            source,
        }
    })?;
    rendered.push('\n');
    fs::write(&path, rendered).map_err(|source| PatchError::Write {
        path: path.clone(),
        source,
    })?;

    info!(file = %path.display(), "patched Node.js package manifest");
    Ok(vec![path])
}
