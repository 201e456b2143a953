//! Flask patch: bind the development server to all interfaces.

use super::PatchError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const CANDIDATE_FILES: &[&str] = &["app.py", "main.py"];
const RUN_CALL: &str = "app.run(";
const HOST_ARG: &str = "host=";
const PATCHED_RUN_CALL: &str = "app.run(host='0.0.0.0', ";

/// Rewrite `app.run(...)` calls that lack an explicit host argument so the
/// server binds to all interfaces. Only the conventional entry files at the
/// repo root are considered. No-op when the pattern is absent or a host
/// argument is already present, which makes a re-run safe.
pub(super) fn bind_all_interfaces(repo_root: &Path) -> Result<Vec<PathBuf>, PatchError> {
    let mut patched = Vec::new();
    for name in CANDIDATE_FILES {
        let path = repo_root.join(name);
        if !path.is_file() {
            continue;
        }
        let code = fs::read_to_string(&path).map_err(|source| PatchError::Read {
            path: path.clone(),
            source,
        })?;
        if code.contains(RUN_CALL) && !code.contains(HOST_ARG) {
            let updated = code.replace(RUN_CALL, PATCHED_RUN_CALL);
            fs::write(&path, updated).map_err(|source| PatchError::Write {
                path: path.clone(),
                source,
            })?;
            debug!(file = name, "patched flask entry to bind all interfaces");
            patched.push(path);
        }
    }
    Ok(patched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const APP: &str = "from flask import Flask\napp = Flask(__name__)\n\nif __name__ == '__main__':\n    app.run(debug=True)\n";

    #[test]
    fn test_inserts_host_argument() {
        let repo = TempDir::new().unwrap();
        let path = repo.path().join("app.py");
        fs::write(&path, APP).unwrap();

        let patched = bind_all_interfaces(repo.path()).unwrap();
        assert_eq!(patched, vec![path.clone()]);

        let code = fs::read_to_string(&path).unwrap();
        assert!(code.contains("app.run(host='0.0.0.0', debug=True)"));
    }

    #[test]
    fn test_second_run_is_a_noop() {
        let repo = TempDir::new().unwrap();
        let path = repo.path().join("app.py");
        fs::write(&path, APP).unwrap();

        bind_all_interfaces(repo.path()).unwrap();
        let patched_again = bind_all_interfaces(repo.path()).unwrap();
        assert!(patched_again.is_empty());

        let code = fs::read_to_string(&path).unwrap();
        assert_eq!(code.matches("host='0.0.0.0'").count(), 1);
    }

    #[test]
    fn test_existing_host_argument_is_left_alone() {
        let repo = TempDir::new().unwrap();
        let path = repo.path().join("main.py");
        fs::write(&path, "app.run(host='127.0.0.1')\n").unwrap();

        let patched = bind_all_interfaces(repo.path()).unwrap();
        assert!(patched.is_empty());
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "app.run(host='127.0.0.1')\n"
        );
    }

    #[test]
    fn test_missing_entry_files_are_skipped() {
        let repo = TempDir::new().unwrap();
        let patched = bind_all_interfaces(repo.path()).unwrap();
        assert!(patched.is_empty());
    }
}
