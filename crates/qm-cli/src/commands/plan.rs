//! `quartermaster plan`: scout, then persist an unapproved plan.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;
use qm_kernel::{PlanDraft, build_plan, now_iso, render_plan_saved, render_scout};
use qm_store::PlanStore;

use crate::commands::{LoadoutArgs, scout_loadout};
use crate::opts::{GlobalOpts, PlanPathArgs, Session};

#[derive(Args, Debug)]
pub struct PlanArgs {
    #[command(flatten)]
    pub loadout: LoadoutArgs,

    #[command(flatten)]
    pub plan: PlanPathArgs,
}

pub fn cmd_plan(opts: &GlobalOpts, args: &PlanArgs) -> Result<ExitCode> {
    let session = Session::open(opts)?;
    let run = scout_loadout(
        &session,
        &args.loadout,
        "Armory refresh failed; stopping before cart planning.",
    )?;

    let draft = PlanDraft {
        task: args.loadout.task.clone(),
        mode: run.mode,
        repo_path: run.repo_path.to_string_lossy().into_owned(),
        armory_root: run.armory_root.to_string_lossy().into_owned(),
        manifest_ref: run.catalog.manifest_ref.clone(),
        refresh: run.refresh.record(),
        created_at: now_iso(),
    };
    let plan = build_plan(draft, &run.scouting, &run.catalog.entries);
    let path = session
        .plans
        .save(&args.plan.target(), &plan)
        .context("failed to save plan")?;

    print!(
        "{}",
        render_scout(
            run.mode,
            &args.loadout.task,
            &run.context.summary,
            &run.scouting.shortlist,
            &run.scouting.closure,
        )
    );
    print!("{}", render_plan_saved(&run.scouting.closure, &path));
    Ok(ExitCode::SUCCESS)
}
