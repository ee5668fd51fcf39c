use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Unable to resolve Armory path. Run setup with: ./setup.sh")]
    ArmoryRootNotFound { tried: Vec<PathBuf> },
    #[error("RepoPath not found: {}", .0.display())]
    RepoPathNotFound(PathBuf),
}
