use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::Mode;

pub const DEFAULT_COMMAND_WORD: &str = "armory";

/// Normalized shared config document (`config.json`).
///
/// Keys this crate does not know about are kept in `extra` so that saving
/// never drops settings written by other Armory tools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub mode: Mode,
    pub civilian_aliases: bool,
    pub command_word: String,
    pub install_dir: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo_root: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    /// Whether the stored document carried a `mode` key of its own.
    #[serde(skip)]
    pub mode_set: bool,
}

impl Config {
    pub fn new(install_dir: impl Into<String>) -> Self {
        Self {
            mode: Mode::Saga,
            civilian_aliases: false,
            command_word: DEFAULT_COMMAND_WORD.to_string(),
            install_dir: install_dir.into(),
            repo_root: None,
            extra: Map::new(),
            mode_set: false,
        }
    }

    /// Set the mode and keep `civilianAliases` in step with it.
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.civilian_aliases = mode.is_civ();
        self.mode_set = true;
    }

    /// Look up a top-level key by its on-disk name.
    pub fn get(&self, key: &str) -> Option<Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map.get(key).cloned(),
            _ => None,
        }
    }
}
