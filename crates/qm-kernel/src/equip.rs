//! Turning an approved plan into shims in the install directory.

use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use qm_store::{PlanStore, PlanTarget, expand_user, is_armory_root};
use qm_types::{Mode, Plan};
use regex::Regex;
use tracing::{info, warn};

use crate::error::KernelError;
use crate::plan::{Approval, ApprovalGate, ApprovedPlan, now_iso};

/// Per-tool results of one equip run, in loadout order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EquipOutcome {
    pub installed: Vec<String>,
    pub failed: Vec<String>,
}

impl EquipOutcome {
    pub fn is_partial(&self) -> bool {
        !self.failed.is_empty()
    }
}

static TOOL_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").expect("tool id pattern is valid"));

/// Kebab-case ids only; anything else could name a path outside the install dir.
pub fn is_tool_id(id: &str) -> bool {
    TOOL_ID.is_match(id)
}

/// Launcher script that pins `ARMORY_ROOT` and execs the tool's entrypoint.
pub fn shim_script(armory_root: &Path, entrypoint: &str) -> String {
    format!(
        "#!/usr/bin/env bash\n\
         set -euo pipefail\n\
         ARMORY_ROOT=\"{}\"\n\
         export ARMORY_ROOT\n\
         exec \"$ARMORY_ROOT/{}\" \"$@\"\n",
        double_quoted(&armory_root.to_string_lossy()),
        double_quoted(entrypoint),
    )
}

/// Escape text for use inside a bash double-quoted string.
fn double_quoted(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '\\' | '"' | '$' | '`') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Install every loadout id from its frozen snapshot. Tools that cannot be
/// installed are recorded as failed and the batch carries on.
pub fn equip(approved: &ApprovedPlan, install_dir: &Path) -> Result<EquipOutcome, KernelError> {
    let plan = approved.plan();
    let root = plan_root(plan)?;

    fs::create_dir_all(install_dir).map_err(|source| KernelError::Io {
        path: install_dir.to_path_buf(),
        source,
    })?;

    let mut outcome = EquipOutcome::default();
    for id in &plan.loadout {
        if !is_tool_id(id) {
            warn!(%id, "tool id is not kebab-case");
            outcome.failed.push(id.clone());
            continue;
        }
        let entrypoint = plan
            .snapshot(id)
            .and_then(|snap| snap.entrypoint_path.as_deref())
            .filter(|path| !path.is_empty());
        let Some(entrypoint) = entrypoint else {
            warn!(%id, "no entrypoint in plan snapshot");
            outcome.failed.push(id.clone());
            continue;
        };
        if !root.join(entrypoint).exists() {
            warn!(%id, entrypoint, "entrypoint missing under Armory root");
            outcome.failed.push(id.clone());
            continue;
        }

        let shim = install_dir.join(id);
        match write_shim(&shim, &shim_script(&root, entrypoint)) {
            Ok(()) => {
                info!(%id, path = %shim.display(), "shim installed");
                outcome.installed.push(id.clone());
            }
            Err(err) => {
                warn!(%id, path = %shim.display(), error = %err, "shim write failed");
                outcome.failed.push(id.clone());
            }
        }
    }
    Ok(outcome)
}

fn plan_root(plan: &Plan) -> Result<PathBuf, KernelError> {
    let raw = plan.armory_root.trim();
    if raw.is_empty() {
        return Err(KernelError::InvalidCatalogRoot(plan.armory_root.clone()));
    }
    let root = expand_user(raw);
    let root = root.canonicalize().unwrap_or(root);
    if !is_armory_root(&root) {
        return Err(KernelError::InvalidCatalogRoot(plan.armory_root.clone()));
    }
    Ok(root)
}

fn write_shim(path: &Path, body: &str) -> std::io::Result<()> {
    fs::write(path, body)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o755))?;
    }
    Ok(())
}

/// A finished equip run: the updated plan as saved, and where it went.
#[derive(Debug, Clone)]
pub struct EquipRun {
    pub plan: Plan,
    pub path: PathBuf,
    pub outcome: EquipOutcome,
}

/// Load, gate, equip, record, and save.
///
/// Fails without touching the store when the plan cannot be loaded, approval
/// is missing, or the plan's Armory root is invalid.
pub fn run_equip(
    store: &impl PlanStore,
    target: &PlanTarget,
    approval: Approval,
    install_dir: &Path,
    mode: Mode,
) -> Result<EquipRun, KernelError> {
    let plan = store.load(target).map_err(KernelError::PlanUnavailable)?;
    let approved = ApprovalGate::check(plan, approval)?;
    let outcome = equip(&approved, install_dir)?;
    let plan = approved.apply_equip(&outcome, install_dir, mode, &now_iso());
    let path = store.save(target, &plan)?;
    Ok(EquipRun {
        plan,
        path,
        outcome,
    })
}
