//! Source acquisition: git clone or zip extraction into the run's working
//! tree.
//!
//! The destination directory is owned exclusively by the current run; it is
//! removed and recreated at the start of every acquisition, so repeated runs
//! never see stale files.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("failed to prepare {path}: {source}")]
    Prepare { path: PathBuf, source: io::Error },
    #[error("failed to launch git: {0}")]
    GitLaunch(io::Error),
    #[error("git clone failed: {0}")]
    CloneFailed(String),
    #[error("failed to open archive {path}: {source}")]
    ArchiveOpen { path: PathBuf, source: io::Error },
    #[error("archive extraction failed: {0}")]
    Extract(#[from] zip::result::ZipError),
}

/// Where the application source comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSpec {
    Git { url: String },
    Zip { path: PathBuf },
}

impl SourceSpec {
    /// The reference rendered into infrastructure configuration and logs:
    /// the clone URL or the archive path.
    pub fn reference(&self) -> String {
        match self {
            SourceSpec::Git { url } => url.clone(),
            SourceSpec::Zip { path } => path.display().to_string(),
        }
    }
}

/// Fetch the source into `dest`, replacing anything already there.
pub async fn acquire(spec: &SourceSpec, dest: &Path) -> Result<PathBuf, SourceError> {
    reset_dest(dest)?;
    match spec {
        SourceSpec::Git { url } => {
            clone_repo(url, dest).await?;
            info!(dest = %dest.display(), "repository cloned");
        }
        SourceSpec::Zip { path } => {
            extract_zip(path, dest)?;
            info!(dest = %dest.display(), "zip extracted");
        }
    }
    Ok(dest.to_path_buf())
}

fn reset_dest(dest: &Path) -> Result<(), SourceError> {
    if dest.exists() {
        std::fs::remove_dir_all(dest).map_err(|source| SourceError::Prepare {
            path: dest.to_path_buf(),
            source,
        })?;
    }
    std::fs::create_dir_all(dest).map_err(|source| SourceError::Prepare {
        path: dest.to_path_buf(),
        source,
    })
}

async fn clone_repo(url: &str, dest: &Path) -> Result<(), SourceError> {
    debug!(url, "cloning repository");
    let output = Command::new("git")
        .arg("clone")
        .arg(url)
        .arg(dest)
        .output()
        .await
        .map_err(SourceError::GitLaunch)?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(SourceError::CloneFailed(stderr));
    }
    Ok(())
}

fn extract_zip(archive: &Path, dest: &Path) -> Result<(), SourceError> {
    debug!(archive = %archive.display(), "extracting archive");
    let file = std::fs::File::open(archive).map_err(|source| SourceError::ArchiveOpen {
        path: archive.to_path_buf(),
        source,
    })?;
    let mut zip = zip::ZipArchive::new(file)?;
    zip.extract(dest)?;
    Ok(())
}
