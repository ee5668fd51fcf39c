//! User-facing text for every action, in both voices.
//!
//! Each function returns the full block, including its surrounding blank
//! lines, ready for `print!`.

use std::path::Path;

use qm_store::expand_user;
use qm_types::{Mode, Plan};

use crate::closure::Closure;
use crate::score::ScoredCandidate;

/// Governance checkout looked for inside the Armory root.
pub const GOVERNANCE_PATH: &str = "governance/seven-shadow-system";

pub const EQUIP_HINT: &str =
    "Approval required before equip. Run: quartermaster equip --from-last-plan --approve";

fn block(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn sorted_csv(ids: &[String]) -> String {
    let mut ids: Vec<&str> = ids.iter().map(String::as_str).collect();
    ids.sort_unstable();
    ids.join(", ")
}

pub fn render_scout(
    mode: Mode,
    task: &str,
    summary: &[String],
    shortlist: &[ScoredCandidate],
    closure: &Closure,
) -> String {
    let mut lines = vec![
        String::new(),
        "Quartermaster scout report".to_string(),
        "------------------------".to_string(),
    ];
    if !mode.is_civ() {
        lines.push("Crystal resonance confirmed. Scouting report follows.".to_string());
    }
    lines.push(format!("Task context: {task}"));
    lines.extend(summary.iter().map(|line| format!("- {line}")));

    lines.push(String::new());
    lines.push("Recommended loadout:".to_string());
    for item in shortlist {
        let deps = if item.dependencies.is_empty() {
            "none".to_string()
        } else {
            item.dependencies.join(", ")
        };
        lines.push(format!("- {} ({})", item.id, item.class.as_str()));
        lines.push(format!("  Why: {}", item.rationale));
        lines.push(format!("  Dependencies: {deps}"));
    }

    if !closure.missing.is_empty() {
        lines.push(String::new());
        lines.push(format!(
            "Dependency warnings: missing entries [{}]",
            closure.missing.join(", ")
        ));
    }

    lines.push(String::new());
    lines.push("Risk/impact: tools are read-only unless you run equip/install actions.".to_string());
    lines.push("Full catalog available on request.".to_string());
    lines.push(String::new());
    block(lines)
}

/// Trailer printed after a plan is written.
pub fn render_plan_saved(closure: &Closure, plan_path: &Path) -> String {
    block(vec![
        format!("Cart prepared: {}", sorted_csv(&closure.ids)),
        format!("Plan saved: {}", plan_path.display()),
        EQUIP_HINT.to_string(),
    ])
}

pub fn render_equip(mode: Mode, installed: &[String], failed: &[String], install_dir: &Path) -> String {
    let mut lines = vec![String::new()];
    lines.push(match mode {
        Mode::Civ => "Install complete.".to_string(),
        Mode::Saga => "Loadout equipped. The party is battle-ready.".to_string(),
    });
    lines.push(format!("Installed tool IDs: {}", sorted_csv(installed)));
    if !failed.is_empty() {
        lines.push(format!("Failed tool IDs: {}", sorted_csv(failed)));
    }
    lines.push(format!("Install directory: {}", install_dir.display()));
    lines.push(String::new());
    if !failed.is_empty() {
        lines.push(
            "Tactical report: partial equip complete, resolve failed IDs before continuing."
                .to_string(),
        );
    }
    block(lines)
}

/// Whether the plan's Armory root carries a governance checkout.
pub fn governance_present(plan: &Plan) -> bool {
    let raw = plan.armory_root.trim();
    !raw.is_empty() && expand_user(raw).join(GOVERNANCE_PATH).exists()
}

/// Read-only summary of a saved plan, in the plan's own mode.
pub fn render_report(plan: &Plan, governance: bool) -> String {
    let (title, rule, status, ok_label, failed_label) = match plan.mode {
        Mode::Civ => (
            "Quartermaster status report",
            "-------------------------",
            "Status",
            "Installed tool IDs",
            "Failed tool IDs",
        ),
        Mode::Saga => (
            "Quartermaster field report",
            "------------------------",
            "Quest status",
            "Equipped tool IDs",
            "Unresolved tool IDs",
        ),
    };

    let mut lines = vec![
        String::new(),
        title.to_string(),
        rule.to_string(),
        format!("{status}: {}", plan.status.as_str()),
        format!("{ok_label}: {}", sorted_csv(&plan.equip.installed)),
    ];
    if !plan.equip.failed.is_empty() {
        lines.push(format!("{failed_label}: {}", sorted_csv(&plan.equip.failed)));
    }
    lines.push(if governance {
        "Seven Shadow path detected. Run real shadow checks before final sign-off.".to_string()
    } else {
        "Seven Shadow path not found; reported and continuing with Armory-native checks."
            .to_string()
    });
    lines.push(String::new());
    block(lines)
}

pub fn render_failure(mode: Mode, headline: &str, detail: &str) -> String {
    let mut lines = vec![String::new()];
    lines.push(match mode {
        Mode::Civ => headline.to_string(),
        Mode::Saga => format!("Tactical setback: {headline}"),
    });
    if !detail.is_empty() {
        lines.push(detail.to_string());
    }
    lines.push(String::new());
    block(lines)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use qm_types::{EntryClass, EquipRecord, PlanStatus, RefreshRecord};
    use tempfile::TempDir;

    use super::*;

    fn candidate(id: &str, deps: &[&str], rationale: &str) -> ScoredCandidate {
        ScoredCandidate {
            id: id.into(),
            class: EntryClass::Weapon,
            score: 4,
            name: id.into(),
            description: "No description available.".into(),
            rationale: rationale.into(),
            matched_terms: Vec::new(),
            dependencies: deps.iter().map(|d| d.to_string()).collect(),
            entrypoint_path: Some(format!("bin/{id}.sh")),
        }
    }

    fn plan(mode: Mode, installed: &[&str], failed: &[&str]) -> Plan {
        Plan {
            plan_version: 1,
            status: if failed.is_empty() { PlanStatus::Equipped } else { PlanStatus::Partial },
            created_at: "2026-01-02T03:04:05+00:00".into(),
            mode,
            task: "t".into(),
            repo_path: "/r".into(),
            armory_root: String::new(),
            manifest_ref: "local".into(),
            shortlist: vec![],
            loadout: vec![],
            dependency_missing: vec![],
            loadout_entries: vec![],
            refresh: RefreshRecord::default(),
            approval_required: true,
            approved: true,
            approved_at: None,
            equip: EquipRecord {
                installed: installed.iter().map(|s| s.to_string()).collect(),
                failed: failed.iter().map(|s| s.to_string()).collect(),
                install_dir: "/bin".into(),
                completed_at: None,
            },
        }
    }

    #[test]
    fn scout_saga_report_layout() {
        let text = render_scout(
            Mode::Saga,
            "fix ci",
            &["Repo path: /r".to_string(), "Dirty files: 0".to_string()],
            &[candidate("lint", &["core"], "Matches task/context terms: lint.")],
            &Closure {
                ids: vec!["lint".into()],
                missing: vec!["core".into()],
            },
        );
        let expected = "\nQuartermaster scout report\n------------------------\n\
Crystal resonance confirmed. Scouting report follows.\n\
Task context: fix ci\n- Repo path: /r\n- Dirty files: 0\n\
\nRecommended loadout:\n- lint (weapon)\n  Why: Matches task/context terms: lint.\n  Dependencies: core\n\
\nDependency warnings: missing entries [core]\n\
\nRisk/impact: tools are read-only unless you run equip/install actions.\n\
Full catalog available on request.\n\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn scout_civ_skips_flavor_line_and_says_none() {
        let text = render_scout(
            Mode::Civ,
            "x",
            &[],
            &[candidate("a", &[], "r")],
            &Closure::default(),
        );
        assert!(!text.contains("Crystal resonance"));
        assert!(text.contains("  Dependencies: none\n"));
        assert!(!text.contains("Dependency warnings"));
    }

    #[test]
    fn plan_trailer_sorts_cart() {
        let closure = Closure {
            ids: vec!["zed".into(), "alpha".into()],
            missing: vec![],
        };
        let text = render_plan_saved(&closure, Path::new("/s/last-plan.json"));
        assert_eq!(
            text,
            format!("Cart prepared: alpha, zed\nPlan saved: /s/last-plan.json\n{EQUIP_HINT}\n")
        );
    }

    #[test]
    fn equip_partial_adds_failed_and_warning() {
        let text = render_equip(
            Mode::Civ,
            &["b".into(), "a".into()],
            &["c".into()],
            Path::new("/home/op/.local/bin"),
        );
        assert_eq!(
            text,
            "\nInstall complete.\nInstalled tool IDs: a, b\nFailed tool IDs: c\nInstall directory: /home/op/.local/bin\n\n\
Tactical report: partial equip complete, resolve failed IDs before continuing.\n"
        );
    }

    #[test]
    fn equip_saga_success() {
        let text = render_equip(Mode::Saga, &["a".into()], &[], Path::new("/b"));
        assert!(text.starts_with("\nLoadout equipped. The party is battle-ready.\n"));
        assert!(!text.contains("Failed"));
        assert!(!text.contains("Tactical report"));
    }

    #[test]
    fn report_wording_follows_plan_mode() {
        let civ = render_report(&plan(Mode::Civ, &["b", "a"], &["c"]), false);
        assert!(civ.contains("Quartermaster status report\n-------------------------\n"));
        assert!(civ.contains("Status: partial\n"));
        assert!(civ.contains("Installed tool IDs: a, b\n"));
        assert!(civ.contains("Failed tool IDs: c\n"));
        assert!(civ.contains("Seven Shadow path not found"));

        let saga = render_report(&plan(Mode::Saga, &["a"], &[]), true);
        assert!(saga.contains("Quartermaster field report\n"));
        assert!(saga.contains("Quest status: equipped\n"));
        assert!(saga.contains("Equipped tool IDs: a\n"));
        assert!(!saga.contains("Unresolved"));
        assert!(saga.contains("Seven Shadow path detected."));
    }

    #[test]
    fn governance_lookup_uses_plan_root() {
        let tmp = TempDir::new().unwrap();
        let mut p = plan(Mode::Civ, &[], &[]);
        assert!(!governance_present(&p));
        p.armory_root = tmp.path().to_string_lossy().into_owned();
        assert!(!governance_present(&p));
        fs::create_dir_all(tmp.path().join(GOVERNANCE_PATH)).unwrap();
        assert!(governance_present(&p));
    }

    #[test]
    fn failure_voice() {
        assert_eq!(
            render_failure(Mode::Saga, "No plan available for equip.", "Plan file not found: /p"),
            "\nTactical setback: No plan available for equip.\nPlan file not found: /p\n\n"
        );
        assert_eq!(render_failure(Mode::Civ, "RepoPath not found", ""), "\nRepoPath not found\n\n");
    }
}
