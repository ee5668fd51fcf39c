//! `quartermaster report`: read-only summary of a saved plan.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;
use qm_kernel::{governance_present, render_report};
use qm_store::{ConfigUpdate, PlanStore};

use crate::commands::current_dir;
use crate::opts::{GlobalOpts, ModeArg, PlanPathArgs, Session};
use crate::output::fail;

#[derive(Args, Debug)]
pub struct ReportArgs {
    #[command(flatten)]
    pub plan: PlanPathArgs,

    #[command(flatten)]
    pub mode: ModeArg,
}

pub fn cmd_report(opts: &GlobalOpts, args: &ReportArgs) -> Result<ExitCode> {
    let session = Session::open(opts)?;
    let config = session.load_config();
    let mode = session.active_mode(&args.mode, &config, &current_dir()?);
    session.persist(&ConfigUpdate {
        mode: Some(mode),
        ..ConfigUpdate::default()
    });

    // The report speaks in the plan's recorded mode; `mode` only voices failures.
    let plan = session
        .plans
        .load(&args.plan.target())
        .map_err(|err| fail(mode, "No saved plan/report data.", err))?;
    print!("{}", render_report(&plan, governance_present(&plan)));
    Ok(ExitCode::SUCCESS)
}
