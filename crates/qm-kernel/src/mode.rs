//! Picking the display mode for a run.

use std::env;
use std::path::Path;

use qm_types::{Config, Mode};
use serde_json::Value;
use tracing::{debug, warn};

/// Per-repository settings file that may carry a `mode` key.
pub const SOVEREIGN_FILE: &str = ".sovereign.json";

/// Checked in order; the first non-empty value wins.
pub const MODE_ENV_VARS: [&str; 2] = ["ARMORY_MODE", "SOVEREIGN_MODE"];

pub fn env_mode() -> Option<String> {
    MODE_ENV_VARS
        .iter()
        .filter_map(|var| env::var(var).ok())
        .find(|value| !value.trim().is_empty())
}

/// Flag, then the stored config mode, then the target repo's
/// `.sovereign.json`, then the environment, then saga.
pub fn resolve_mode(
    flag: Option<&str>,
    config: &Config,
    repo_path: &Path,
    env_value: Option<&str>,
) -> Mode {
    if let Some(raw) = flag {
        return Mode::normalize(raw, false);
    }
    if config.mode_set {
        return config.mode;
    }
    if let Some(mode) = sovereign_mode(repo_path) {
        return mode;
    }
    if let Some(raw) = env_value.filter(|v| !v.trim().is_empty()) {
        return Mode::normalize(raw, false);
    }
    Mode::Saga
}

fn sovereign_mode(repo_path: &Path) -> Option<Mode> {
    let path = repo_path.join(SOVEREIGN_FILE);
    if !path.is_file() {
        return None;
    }
    let text = match std::fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "unreadable sovereign file");
            return None;
        }
    };
    let doc: Value = match serde_json::from_str(&text) {
        Ok(doc) => doc,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "ignoring malformed sovereign file");
            return None;
        }
    };
    let raw = doc.as_object()?.get("mode")?;
    debug!(path = %path.display(), "mode from sovereign file");
    Some(Mode::normalize(raw.as_str().unwrap_or_default(), false))
}
