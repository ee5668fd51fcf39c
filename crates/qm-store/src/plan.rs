use std::{
    collections::HashMap,
    fmt,
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use qm_types::Plan;
use tracing::info;

use crate::{StoreError, StoreResult, expand_user, io_error, to_json_document, write_text};

/// Which plan file an action reads or writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanTarget {
    /// The last-plan pointer under the state directory.
    Last,
    /// An explicit plan file.
    Path(PathBuf),
}

impl PlanTarget {
    /// An explicit path wins; otherwise the pointer (which is also what
    /// `--from-last-plan` asks for).
    pub fn from_arg(plan_path: Option<&str>) -> Self {
        match plan_path.filter(|p| !p.trim().is_empty()) {
            Some(path) => PlanTarget::Path(expand_user(path)),
            None => PlanTarget::Last,
        }
    }
}

/// Storage for plan documents.
///
/// Every save writes the target file and mirrors the same document into the
/// last-plan pointer. There is no locking: the last writer wins.
pub trait PlanStore {
    fn last_plan_path(&self) -> &Path;

    fn resolve(&self, target: &PlanTarget) -> PathBuf {
        match target {
            PlanTarget::Last => self.last_plan_path().to_path_buf(),
            PlanTarget::Path(path) => path.clone(),
        }
    }

    fn load(&self, target: &PlanTarget) -> StoreResult<Plan>;

    /// Persist `plan`; returns the resolved target path.
    fn save(&self, target: &PlanTarget, plan: &Plan) -> StoreResult<PathBuf>;
}

pub fn encode_plan(plan: &Plan) -> StoreResult<String> {
    to_json_document(plan)
}

pub fn decode_plan(path: &Path, text: &str) -> StoreResult<Plan> {
    serde_json::from_str(text).map_err(|source| StoreError::PlanParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Plan files on disk.
#[derive(Clone)]
pub struct FsPlanStore {
    last_plan_path: PathBuf,
}

impl fmt::Debug for FsPlanStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FsPlanStore")
            .field("last_plan_path", &self.last_plan_path)
            .finish()
    }
}

impl FsPlanStore {
    /// Store whose pointer lives at `<state_dir>/quartermaster/last-plan.json`.
    pub fn open(state_dir: impl AsRef<Path>) -> Self {
        Self {
            last_plan_path: state_dir
                .as_ref()
                .join("quartermaster")
                .join("last-plan.json"),
        }
    }
}

impl PlanStore for FsPlanStore {
    fn last_plan_path(&self) -> &Path {
        &self.last_plan_path
    }

    fn load(&self, target: &PlanTarget) -> StoreResult<Plan> {
        let path = self.resolve(target);
        if !path.exists() {
            return Err(StoreError::PlanNotFound { path });
        }
        let text = std::fs::read_to_string(&path).map_err(|e| io_error(&path, e))?;
        decode_plan(&path, &text)
    }

    fn save(&self, target: &PlanTarget, plan: &Plan) -> StoreResult<PathBuf> {
        let path = self.resolve(target);
        let text = encode_plan(plan)?;
        write_text(&path, &text)?;
        if path != self.last_plan_path {
            write_text(&self.last_plan_path, &text)?;
        }
        info!(path = %path.display(), status = plan.status.as_str(), "plan saved");
        Ok(path)
    }
}

/// Plan documents kept as encoded JSON in memory, keyed by path.
#[derive(Clone)]
pub struct MemPlanStore {
    files: Arc<RwLock<HashMap<PathBuf, String>>>,
    last_plan_path: PathBuf,
}

impl Default for MemPlanStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MemPlanStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemPlanStore")
            .field("files", &self.files.read().unwrap().len())
            .finish()
    }
}

impl MemPlanStore {
    pub fn new() -> Self {
        Self {
            files: Arc::default(),
            last_plan_path: PathBuf::from("memory://quartermaster/last-plan.json"),
        }
    }

    /// Raw document at `path`, exactly as it would be on disk.
    pub fn raw(&self, path: &Path) -> Option<String> {
        self.files.read().unwrap().get(path).cloned()
    }

    pub fn insert_raw(&self, path: impl Into<PathBuf>, text: impl Into<String>) {
        self.files.write().unwrap().insert(path.into(), text.into());
    }

    pub fn len(&self) -> usize {
        self.files.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PlanStore for MemPlanStore {
    fn last_plan_path(&self) -> &Path {
        &self.last_plan_path
    }

    fn load(&self, target: &PlanTarget) -> StoreResult<Plan> {
        let path = self.resolve(target);
        let text = self
            .raw(&path)
            .ok_or_else(|| StoreError::PlanNotFound { path: path.clone() })?;
        decode_plan(&path, &text)
    }

    fn save(&self, target: &PlanTarget, plan: &Plan) -> StoreResult<PathBuf> {
        let path = self.resolve(target);
        let text = encode_plan(plan)?;
        let mut files = self.files.write().unwrap();
        files.insert(self.last_plan_path.clone(), text.clone());
        files.insert(path.clone(), text);
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qm_types::{EntryClass, EquipRecord, LoadoutEntry, Mode, PLAN_VERSION, PlanStatus, RefreshRecord};
    use tempfile::TempDir;

    fn plan() -> Plan {
        Plan {
            plan_version: PLAN_VERSION,
            status: PlanStatus::Planned,
            created_at: "2026-10-18T09:00:00+00:00".into(),
            mode: Mode::Saga,
            task: "release automation".into(),
            repo_path: "/work/repo".into(),
            armory_root: "/work/armory".into(),
            manifest_ref: "local".into(),
            shortlist: vec!["alpha".into()],
            loadout: vec!["alpha".into(), "beta".into()],
            dependency_missing: vec!["ghost".into()],
            loadout_entries: vec![LoadoutEntry {
                id: "alpha".into(),
                class: EntryClass::Spell,
                name: "Alpha".into(),
                description: "first".into(),
                entrypoint_path: Some("spells/alpha/alpha.sh".into()),
                dependencies: vec!["beta".into()],
            }],
            refresh: RefreshRecord {
                success: true,
                command: "git -C <armoryRepoRoot> pull --ff-only".into(),
                output: "Already up to date.".into(),
            },
            approval_required: true,
            approved: false,
            approved_at: None,
            equip: EquipRecord::default(),
        }
    }

    #[test]
    fn target_prefers_explicit_path() {
        assert_eq!(PlanTarget::from_arg(None), PlanTarget::Last);
        assert_eq!(PlanTarget::from_arg(Some("")), PlanTarget::Last);
        assert_eq!(
            PlanTarget::from_arg(Some("/tmp/p.json")),
            PlanTarget::Path(PathBuf::from("/tmp/p.json"))
        );
    }

    #[test]
    fn fs_round_trip_mirrors_last_pointer() {
        let dir = TempDir::new().expect("tmp");
        let store = FsPlanStore::open(dir.path());
        let target = PlanTarget::Path(dir.path().join("plans").join("mine.json"));
        let original = plan();

        let written = store.save(&target, &original).expect("save");
        assert_eq!(written, dir.path().join("plans").join("mine.json"));

        let text = std::fs::read_to_string(&written).unwrap();
        assert!(text.ends_with('\n'));
        assert!(text.starts_with("{\n  \"planVersion\": 1,"));
        assert_eq!(std::fs::read_to_string(store.last_plan_path()).unwrap(), text);

        assert_eq!(store.load(&target).expect("load"), original);
        assert_eq!(store.load(&PlanTarget::Last).expect("load last"), original);
    }

    #[test]
    fn fs_missing_and_corrupt_plans() {
        let dir = TempDir::new().expect("tmp");
        let store = FsPlanStore::open(dir.path());
        let err = store.load(&PlanTarget::Last).expect_err("missing");
        assert!(matches!(err, StoreError::PlanNotFound { .. }), "{err:?}");
        assert!(err.to_string().starts_with("Plan file not found: "));

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "{ \"planVersion\": ").unwrap();
        let err = store.load(&PlanTarget::Path(bad)).expect_err("corrupt");
        assert!(matches!(err, StoreError::PlanParse { .. }), "{err:?}");
    }

    #[test]
    fn mem_store_matches_disk_encoding() {
        let store = MemPlanStore::new();
        let original = plan();
        let path = store.save(&PlanTarget::Last, &original).expect("save");
        assert_eq!(store.len(), 1, "pointer and target are the same file");
        assert_eq!(store.raw(&path).unwrap(), encode_plan(&original).unwrap());
        assert_eq!(store.load(&PlanTarget::Last).expect("load"), original);
    }
}
