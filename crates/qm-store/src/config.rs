use std::{
    fmt,
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use qm_types::{Config, DEFAULT_COMMAND_WORD, Mode};
use serde_json::{Map, Value};
use tracing::debug;

use crate::{StoreError, StoreResult, expand_user, io_error, to_json_document, write_text};

const KNOWN_KEYS: [&str; 5] = ["mode", "civilianAliases", "commandWord", "installDir", "repoRoot"];

/// Fields to upsert with [`ConfigStore::ensure`]. `None` leaves a value alone.
#[derive(Debug, Clone, Default)]
pub struct ConfigUpdate {
    pub command_word: Option<String>,
    pub install_dir: Option<String>,
    pub repo_root: Option<String>,
    pub mode: Option<Mode>,
}

/// Persisted settings shared by every Armory tool.
pub trait ConfigStore {
    /// Load and normalize. A missing document yields defaults.
    fn load(&self) -> StoreResult<Config>;

    /// Persist `config` after normalizing it; returns what was written.
    fn save(&self, config: &Config) -> StoreResult<Config>;

    /// Apply `update` on top of the stored config and persist the result.
    fn ensure(&self, update: &ConfigUpdate) -> StoreResult<Config> {
        let mut cfg = self.load()?;
        if let Some(word) = update.command_word.as_deref().filter(|w| !w.is_empty()) {
            cfg.command_word = word.to_string();
        }
        if let Some(dir) = update.install_dir.as_deref().filter(|d| !d.is_empty()) {
            cfg.install_dir = expand_user(dir).to_string_lossy().into_owned();
        }
        if let Some(root) = update.repo_root.as_deref().filter(|r| !r.is_empty()) {
            cfg.repo_root = Some(expand_user(root).to_string_lossy().into_owned());
        }
        if let Some(mode) = update.mode {
            cfg.set_mode(mode);
        }
        self.save(&cfg)
    }
}

/// Normalize a raw config object into a [`Config`].
///
/// Mirrors what every Armory runtime does on load: the mode collapses onto
/// `{saga, civ}`, `civilianAliases` follows the mode, blank strings fall back
/// to defaults, and unknown keys are carried through untouched.
pub fn migrate_config(mut raw: Map<String, Value>, default_install_dir: &str) -> Config {
    let mode_set = !matches!(raw.get("mode"), None | Some(Value::Null));
    let civilian_aliases = matches!(raw.get("civilianAliases"), Some(Value::Bool(true)));
    let mode_raw = raw.get("mode").and_then(Value::as_str).unwrap_or_default();
    let mode = Mode::normalize(mode_raw, civilian_aliases);

    let command_word = non_blank(raw.get("commandWord")).unwrap_or(DEFAULT_COMMAND_WORD);
    let install_dir = non_blank(raw.get("installDir")).unwrap_or(default_install_dir);
    let repo_root =
        non_blank(raw.get("repoRoot")).map(|root| expand_user(root).to_string_lossy().into_owned());

    let mut cfg = Config::new(install_dir);
    cfg.command_word = command_word.to_string();
    cfg.repo_root = repo_root;
    cfg.set_mode(mode);
    cfg.mode_set = mode_set;

    for key in KNOWN_KEYS {
        raw.remove(key);
    }
    cfg.extra = raw;
    cfg
}

fn non_blank(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

fn default_install_dir() -> String {
    dirs::home_dir()
        .unwrap_or_default()
        .join(".local")
        .join("bin")
        .to_string_lossy()
        .into_owned()
}

fn object_from(value: Value, path: &Path) -> StoreResult<Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(StoreError::ConfigShape {
            path: path.to_path_buf(),
        }),
    }
}

fn config_to_object(config: &Config) -> StoreResult<Map<String, Value>> {
    match serde_json::to_value(config)? {
        Value::Object(map) => Ok(map),
        _ => Ok(Map::new()),
    }
}

/// `config.json` on disk.
#[derive(Clone)]
pub struct FsConfigStore {
    path: PathBuf,
    default_install_dir: String,
}

impl fmt::Debug for FsConfigStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FsConfigStore")
            .field("path", &self.path)
            .finish()
    }
}

impl FsConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            default_install_dir: default_install_dir(),
        }
    }

    pub fn with_default_install_dir(mut self, dir: impl Into<String>) -> Self {
        self.default_install_dir = dir.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// What [`ConfigStore::load`] returns when no document exists.
    pub fn defaults(&self) -> Config {
        migrate_config(Map::new(), &self.default_install_dir)
    }
}

impl ConfigStore for FsConfigStore {
    fn load(&self) -> StoreResult<Config> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "config missing; using defaults");
            return Ok(self.defaults());
        }
        let text = std::fs::read_to_string(&self.path).map_err(|e| io_error(&self.path, e))?;
        let value: Value = serde_json::from_str(&text).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;
        let raw = object_from(value, &self.path)?;
        Ok(migrate_config(raw, &self.default_install_dir))
    }

    fn save(&self, config: &Config) -> StoreResult<Config> {
        let cfg = migrate_config(config_to_object(config)?, &self.default_install_dir);
        write_text(&self.path, &to_json_document(&cfg)?)?;
        Ok(cfg)
    }
}

/// In-memory config document for tests.
#[derive(Clone, Default)]
pub struct MemConfigStore {
    doc: Arc<RwLock<Option<Value>>>,
    default_install_dir: String,
}

impl fmt::Debug for MemConfigStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemConfigStore")
            .field("present", &self.doc.read().unwrap().is_some())
            .finish()
    }
}

impl MemConfigStore {
    pub fn new(default_install_dir: impl Into<String>) -> Self {
        Self {
            doc: Arc::default(),
            default_install_dir: default_install_dir.into(),
        }
    }

    /// Seed the store with a raw document, as if a file had been hand-written.
    pub fn with_document(self, value: Value) -> Self {
        *self.doc.write().unwrap() = Some(value);
        self
    }

    pub fn document(&self) -> Option<Value> {
        self.doc.read().unwrap().clone()
    }
}

impl ConfigStore for MemConfigStore {
    fn load(&self) -> StoreResult<Config> {
        let path = PathBuf::from("memory://config.json");
        match self.doc.read().unwrap().clone() {
            None => Ok(migrate_config(Map::new(), &self.default_install_dir)),
            Some(value) => Ok(migrate_config(
                object_from(value, &path)?,
                &self.default_install_dir,
            )),
        }
    }

    fn save(&self, config: &Config) -> StoreResult<Config> {
        let cfg = migrate_config(config_to_object(config)?, &self.default_install_dir);
        *self.doc.write().unwrap() = Some(serde_json::to_value(&cfg)?);
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn migrate_fills_defaults() {
        let cfg = migrate_config(Map::new(), "/home/op/.local/bin");
        assert_eq!(cfg.mode, Mode::Saga);
        assert!(!cfg.civilian_aliases);
        assert_eq!(cfg.command_word, "armory");
        assert_eq!(cfg.install_dir, "/home/op/.local/bin");
        assert_eq!(cfg.repo_root, None);
        assert!(!cfg.mode_set);
    }

    #[test]
    fn migrate_uses_civilian_aliases_for_unknown_mode() {
        let cfg = migrate_config(
            object(json!({ "mode": "plain", "civilianAliases": true })),
            "/bin",
        );
        assert_eq!(cfg.mode, Mode::Civ);
        assert!(cfg.civilian_aliases);
    }

    #[test]
    fn migrate_rewrites_stale_civilian_aliases() {
        let cfg = migrate_config(
            object(json!({ "mode": "crystal", "civilianAliases": true })),
            "/bin",
        );
        assert_eq!(cfg.mode, Mode::Saga);
        assert!(!cfg.civilian_aliases);
        assert!(cfg.mode_set);
    }

    #[test]
    fn migrate_keeps_unknown_keys_and_ignores_blank_strings() {
        let cfg = migrate_config(
            object(json!({ "commandWord": "  ", "installDir": "", "theme": "dark" })),
            "/bin",
        );
        assert_eq!(cfg.command_word, "armory");
        assert_eq!(cfg.install_dir, "/bin");
        assert_eq!(cfg.extra.get("theme"), Some(&json!("dark")));
    }

    #[test]
    fn fs_store_missing_file_yields_defaults() {
        let dir = TempDir::new().expect("tmp");
        let store = FsConfigStore::new(dir.path().join("config.json")).with_default_install_dir("/x");
        let cfg = store.load().expect("load");
        assert_eq!(cfg.install_dir, "/x");
        assert!(!store.path().exists(), "load must not create the file");
    }

    #[test]
    fn fs_store_rejects_non_object() {
        let dir = TempDir::new().expect("tmp");
        let path = dir.path().join("config.json");
        std::fs::write(&path, "[1, 2]").unwrap();
        let err = FsConfigStore::new(&path).load().expect_err("should fail");
        assert!(matches!(err, StoreError::ConfigShape { .. }), "{err:?}");

        std::fs::write(&path, "{ nope").unwrap();
        let err = FsConfigStore::new(&path).load().expect_err("should fail");
        assert!(matches!(err, StoreError::Json { .. }), "{err:?}");
    }

    #[test]
    fn fs_store_ensure_persists_and_normalizes() {
        let dir = TempDir::new().expect("tmp");
        let path = dir.path().join("nested").join("config.json");
        let store = FsConfigStore::new(&path).with_default_install_dir("/x");
        let cfg = store
            .ensure(&ConfigUpdate {
                repo_root: Some("/srv/armory".into()),
                mode: Some(Mode::Civ),
                ..Default::default()
            })
            .expect("ensure");
        assert_eq!(cfg.repo_root.as_deref(), Some("/srv/armory"));
        assert!(cfg.civilian_aliases);

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.ends_with("}\n"));
        let reloaded = store.load().expect("reload");
        assert_eq!(reloaded, cfg);
    }

    #[test]
    fn mem_store_round_trip() {
        let store = MemConfigStore::new("/mem/bin").with_document(json!({ "mode": "lore", "extra": 1 }));
        let mut cfg = store.load().expect("load");
        assert_eq!(cfg.mode, Mode::Saga);
        cfg.set_mode(Mode::Civ);
        store.save(&cfg).expect("save");
        let doc = store.document().expect("doc");
        assert_eq!(doc["mode"], json!("civ"));
        assert_eq!(doc["civilianAliases"], json!(true));
        assert_eq!(doc["extra"], json!(1));
    }
}
