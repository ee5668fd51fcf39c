//! Persistence for Quartermaster: config and plan stores with filesystem and
//! in-memory backends, plus loading of the Armory catalog document.

pub mod catalog;
mod config;
mod plan;

pub use catalog::{LoadedCatalog, is_armory_root, load_catalog};
pub use config::{ConfigStore, ConfigUpdate, FsConfigStore, MemConfigStore, migrate_config};
pub use plan::{FsPlanStore, MemPlanStore, PlanStore, PlanTarget, decode_plan, encode_plan};

use std::{
    io,
    path::{Path, PathBuf},
};

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid JSON in {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("config must be a JSON object: {path:?}")]
    ConfigShape { path: PathBuf },
    #[error("Plan file not found: {}", path.display())]
    PlanNotFound { path: PathBuf },
    #[error("Plan file parse failed: {}: {source}", path.display())]
    PlanParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub(crate) fn io_error(path: impl Into<PathBuf>, err: io::Error) -> StoreError {
    StoreError::Io {
        path: path.into(),
        source: err,
    }
}

/// Expand a leading `~` to the current user's home directory.
pub fn expand_user(raw: &str) -> PathBuf {
    let home = dirs::home_dir();
    match (raw.strip_prefix('~'), home) {
        (Some(""), Some(home)) => home,
        (Some(rest), Some(home)) if rest.starts_with('/') => home.join(&rest[1..]),
        _ => PathBuf::from(raw),
    }
}

/// Write `text` to `path`, creating parent directories first.
pub(crate) fn write_text(path: &Path, text: &str) -> StoreResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
    }
    std::fs::write(path, text).map_err(|e| io_error(path, e))
}

/// Pretty JSON with two-space indent and a trailing newline.
pub(crate) fn to_json_document<T: serde::Serialize>(value: &T) -> StoreResult<String> {
    let mut text = serde_json::to_string_pretty(value)?;
    text.push('\n');
    Ok(text)
}
