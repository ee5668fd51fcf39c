//! Plan construction and the approval gate.
//!
//! A plan starts `planned` with `approved = false`. The only way to mark it
//! approved is through [`ApprovalGate::check`], which yields an
//! [`ApprovedPlan`]; only that type can be handed to the equip executor or
//! turned back into an `equipped`/`partial` plan.

use std::path::Path;

use chrono::{SecondsFormat, Utc};
use qm_types::{
    CatalogEntry, EquipRecord, LoadoutEntry, Mode, PLAN_VERSION, Plan, PlanStatus, RefreshRecord,
};

use crate::closure::eligible_by_id;
use crate::equip::EquipOutcome;
use crate::error::KernelError;
use crate::scout::Scouting;

/// UTC timestamp with second precision, e.g. `2026-01-02T03:04:05+00:00`.
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// Run-level facts recorded alongside the scouting result.
#[derive(Debug, Clone)]
pub struct PlanDraft {
    pub task: String,
    pub mode: Mode,
    pub repo_path: String,
    pub armory_root: String,
    pub manifest_ref: String,
    pub refresh: RefreshRecord,
    pub created_at: String,
}

pub fn build_plan(draft: PlanDraft, scouting: &Scouting, entries: &[CatalogEntry]) -> Plan {
    let by_id = eligible_by_id(entries);
    let loadout_entries = scouting
        .closure
        .ids
        .iter()
        .filter_map(|id| by_id.get(id.as_str()))
        .map(|entry| LoadoutEntry {
            id: entry.id.clone(),
            class: entry.class,
            name: entry.display_name(draft.mode),
            description: entry.display_description(draft.mode),
            entrypoint_path: entry.entrypoint().map(str::to_string),
            dependencies: entry.install.dependencies.clone(),
        })
        .collect();

    Plan {
        plan_version: PLAN_VERSION,
        status: PlanStatus::Planned,
        created_at: draft.created_at,
        mode: draft.mode,
        task: draft.task,
        repo_path: draft.repo_path,
        armory_root: draft.armory_root,
        manifest_ref: draft.manifest_ref,
        shortlist: scouting.shortlist.iter().map(|c| c.id.clone()).collect(),
        loadout: scouting.closure.ids.clone(),
        dependency_missing: scouting.closure.missing.clone(),
        loadout_entries,
        refresh: draft.refresh,
        approval_required: true,
        approved: false,
        approved_at: None,
        equip: EquipRecord::default(),
    }
}

/// Whether a human explicitly approved this equip run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Approval(bool);

impl Approval {
    pub fn from_flag(approve: bool) -> Self {
        Approval(approve)
    }

    pub fn is_granted(self) -> bool {
        self.0
    }
}

pub struct ApprovalGate;

impl ApprovalGate {
    pub fn check(plan: Plan, approval: Approval) -> Result<ApprovedPlan, KernelError> {
        if !approval.is_granted() {
            return Err(KernelError::ApprovalMissing);
        }
        Ok(ApprovedPlan { plan })
    }
}

/// A plan that passed the approval gate.
#[derive(Debug, Clone)]
pub struct ApprovedPlan {
    plan: Plan,
}

impl ApprovedPlan {
    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    /// Record an equip run. Re-equipping an already equipped plan simply
    /// overwrites the previous record.
    pub fn apply_equip(
        self,
        outcome: &EquipOutcome,
        install_dir: &Path,
        mode: Mode,
        now: &str,
    ) -> Plan {
        let mut plan = self.plan;
        plan.status = if outcome.failed.is_empty() {
            PlanStatus::Equipped
        } else {
            PlanStatus::Partial
        };
        plan.approved = true;
        plan.approved_at = Some(now.to_string());
        plan.mode = mode;
        plan.equip = EquipRecord {
            installed: outcome.installed.clone(),
            failed: outcome.failed.clone(),
            install_dir: install_dir.to_string_lossy().into_owned(),
            completed_at: Some(now.to_string()),
        };
        plan
    }
}
