//! Locating the local Armory checkout.

use std::env;
use std::path::{Path, PathBuf};

use qm_store::{expand_user, is_armory_root};
use tracing::debug;

use crate::HostError;

pub const ARMORY_REPO_ROOT_ENV: &str = "ARMORY_REPO_ROOT";

/// Inputs for root discovery, in priority order.
#[derive(Debug, Clone, Default)]
pub struct RootSearch {
    pub explicit: Option<PathBuf>,
    pub config_root: Option<PathBuf>,
    pub env_root: Option<PathBuf>,
    pub cwd: PathBuf,
    pub home: Option<PathBuf>,
}

impl RootSearch {
    /// Fills the ambient parts (env var, cwd, home) from the running process.
    pub fn from_environment(
        explicit: Option<&str>,
        config_root: Option<&str>,
    ) -> Result<Self, HostError> {
        let cwd = env::current_dir().map_err(|source| HostError::Io {
            path: PathBuf::from("."),
            source,
        })?;
        Ok(Self {
            explicit: non_blank(explicit).map(expand_user),
            config_root: non_blank(config_root).map(expand_user),
            env_root: env::var(ARMORY_REPO_ROOT_ENV)
                .ok()
                .as_deref()
                .and_then(|v| non_blank(Some(v)))
                .map(expand_user),
            cwd,
            home: dirs::home_dir(),
        })
    }

    fn candidates(&self) -> Vec<PathBuf> {
        let mut out = Vec::new();
        out.extend(self.explicit.clone());
        out.extend(self.config_root.clone());
        out.extend(self.env_root.clone());
        out.push(self.cwd.clone());
        out.push(self.cwd.join("armory"));
        if let Some(parent) = self.cwd.parent() {
            out.push(parent.join("armory"));
        }
        if let Some(home) = &self.home {
            out.push(home.join("armory"));
        }
        out
    }
}

fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoot {
    pub path: PathBuf,
    /// True unless the root came from the explicit flag; discovered roots get
    /// persisted to config by the caller.
    pub discovered: bool,
}

fn normalize(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

pub fn resolve_armory_root(search: &RootSearch) -> Result<ResolvedRoot, HostError> {
    let explicit = search.explicit.as_deref().map(normalize);
    let mut tried: Vec<PathBuf> = Vec::new();

    for candidate in search.candidates() {
        let candidate = normalize(&candidate);
        if tried.contains(&candidate) {
            continue;
        }
        debug!(candidate = %candidate.display(), "armory root candidate");
        if is_armory_root(&candidate) {
            let discovered = explicit.as_ref() != Some(&candidate);
            return Ok(ResolvedRoot {
                path: candidate,
                discovered,
            });
        }
        tried.push(candidate);
    }

    Err(HostError::ArmoryRootNotFound { tried })
}
