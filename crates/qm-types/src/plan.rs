use serde::{Deserialize, Serialize};

use crate::{EntryClass, Mode};

pub const PLAN_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanStatus {
    Planned,
    Equipped,
    Partial,
}

impl PlanStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PlanStatus::Planned => "planned",
            PlanStatus::Equipped => "equipped",
            PlanStatus::Partial => "partial",
        }
    }
}

/// Frozen copy of a catalog entry, taken when the plan is written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadoutEntry {
    pub id: String,
    pub class: EntryClass,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub entrypoint_path: Option<String>,
    #[serde(default)]
    pub dependencies: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshRecord {
    pub success: bool,
    pub command: String,
    pub output: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipRecord {
    pub installed: Vec<String>,
    pub failed: Vec<String>,
    pub install_dir: String,
    pub completed_at: Option<String>,
}

/// Persisted, approval-gated record of a scout decision.
///
/// Field order is the on-disk key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub plan_version: u32,
    pub status: PlanStatus,
    pub created_at: String,
    pub mode: Mode,
    pub task: String,
    pub repo_path: String,
    pub armory_root: String,
    pub manifest_ref: String,
    pub shortlist: Vec<String>,
    pub loadout: Vec<String>,
    #[serde(default)]
    pub dependency_missing: Vec<String>,
    pub loadout_entries: Vec<LoadoutEntry>,
    #[serde(default)]
    pub refresh: RefreshRecord,
    #[serde(default = "approval_required_default")]
    pub approval_required: bool,
    #[serde(default)]
    pub approved: bool,
    #[serde(default)]
    pub approved_at: Option<String>,
    #[serde(default)]
    pub equip: EquipRecord,
}

fn approval_required_default() -> bool {
    true
}

impl Plan {
    pub fn snapshot(&self, id: &str) -> Option<&LoadoutEntry> {
        self.loadout_entries.iter().find(|entry| entry.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Plan {
        Plan {
            plan_version: PLAN_VERSION,
            status: PlanStatus::Planned,
            created_at: "2026-01-02T03:04:05+00:00".into(),
            mode: Mode::Civ,
            task: "ship it".into(),
            repo_path: "/tmp/repo".into(),
            armory_root: "/tmp/armory".into(),
            manifest_ref: "local".into(),
            shortlist: vec!["x".into()],
            loadout: vec!["x".into()],
            dependency_missing: vec![],
            loadout_entries: vec![LoadoutEntry {
                id: "x".into(),
                class: EntryClass::Item,
                name: "X".into(),
                description: "does x".into(),
                entrypoint_path: Some("items/x/x.sh".into()),
                dependencies: vec![],
            }],
            refresh: RefreshRecord::default(),
            approval_required: true,
            approved: false,
            approved_at: None,
            equip: EquipRecord::default(),
        }
    }

    #[test]
    fn keys_are_camel_case_in_declared_order() {
        let json = serde_json::to_string(&sample()).unwrap();
        let keys = [
            "\"planVersion\"",
            "\"status\"",
            "\"createdAt\"",
            "\"mode\"",
            "\"task\"",
            "\"repoPath\"",
            "\"armoryRoot\"",
            "\"manifestRef\"",
            "\"shortlist\"",
            "\"loadout\"",
            "\"dependencyMissing\"",
            "\"loadoutEntries\"",
            "\"refresh\"",
            "\"approvalRequired\"",
            "\"approved\"",
            "\"approvedAt\"",
            "\"equip\"",
        ];
        let mut last = 0;
        for key in keys {
            let pos = json[last..]
                .find(key)
                .unwrap_or_else(|| panic!("{key} missing or out of order"));
            last += pos + key.len();
        }
        assert!(json.contains("\"approvedAt\":null"));
        assert!(json.contains("\"completedAt\":null"));
    }

    #[test]
    fn older_plan_without_optional_blocks_still_loads() {
        let json = r#"{
            "planVersion": 1, "status": "planned", "createdAt": "t", "mode": "lore",
            "task": "t", "repoPath": "/r", "armoryRoot": "/a", "manifestRef": "local",
            "shortlist": [], "loadout": [], "loadoutEntries": []
        }"#;
        let plan: Plan = serde_json::from_str(json).unwrap();
        assert_eq!(plan.mode, Mode::Saga);
        assert!(plan.approval_required);
        assert!(!plan.approved);
        assert_eq!(plan.equip, EquipRecord::default());
    }
}
