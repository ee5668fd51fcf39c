//! Quartermaster pipeline logic: term extraction, scoring, dependency
//! closure, the plan state machine with its approval gate, the equip
//! executor, and report rendering.

pub mod closure;
pub mod equip;
pub mod error;
pub mod mode;
pub mod plan;
pub mod render;
pub mod score;
pub mod scout;
pub mod terms;

#[cfg(test)]
pub(crate) mod testing;

pub use closure::{Closure, eligible_by_id, expand};
pub use equip::{EquipOutcome, EquipRun, equip, run_equip, shim_script};
pub use error::KernelError;
pub use mode::{MODE_ENV_VARS, SOVEREIGN_FILE, env_mode, resolve_mode};
pub use plan::{Approval, ApprovalGate, ApprovedPlan, PlanDraft, build_plan, now_iso};
pub use render::{
    EQUIP_HINT, GOVERNANCE_PATH, governance_present, render_equip, render_failure, render_plan_saved,
    render_report, render_scout,
};
pub use score::{ScoredCandidate, rationale, score_entry, shortlist};
pub use scout::{Scouting, scout};
pub use terms::{STOP_WORDS, extract_terms};
