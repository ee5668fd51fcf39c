use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum KernelError {
    #[error("store error: {0}")]
    Store(#[from] qm_store::StoreError),
    #[error("{0}")]
    PlanUnavailable(#[source] qm_store::StoreError),
    #[error("approval missing: re-run with --approve after explicit human approval")]
    ApprovalMissing,
    #[error("plan Armory root is invalid: '{0}'")]
    InvalidCatalogRoot(String),
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
