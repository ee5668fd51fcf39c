//! `quartermaster equip`: install a saved plan behind the approval gate.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;
use qm_kernel::{Approval, KernelError, render_equip, run_equip};
use qm_store::{ConfigUpdate, expand_user};

use crate::commands::current_dir;
use crate::opts::{GlobalOpts, ModeArg, PlanPathArgs, Session};
use crate::output::fail;

#[derive(Args, Debug)]
pub struct EquipArgs {
    #[command(flatten)]
    pub plan: PlanPathArgs,

    /// Confirm that a human approved this plan
    #[arg(long)]
    pub approve: bool,

    #[command(flatten)]
    pub mode: ModeArg,
}

pub fn cmd_equip(opts: &GlobalOpts, args: &EquipArgs) -> Result<ExitCode> {
    let session = Session::open(opts)?;
    let config = session.load_config();
    let mode = session.active_mode(&args.mode, &config, &current_dir()?);

    let install_dir = expand_user(&config.install_dir);
    let run = match run_equip(
        &session.plans,
        &args.plan.target(),
        Approval::from_flag(args.approve),
        &install_dir,
        mode,
    ) {
        Ok(run) => run,
        Err(KernelError::PlanUnavailable(err)) => {
            return Err(fail(mode, "No plan available for equip.", err));
        }
        Err(KernelError::ApprovalMissing) => {
            return Err(fail(
                mode,
                "Approval gate not satisfied.",
                "Re-run with --approve after explicit human approval.",
            ));
        }
        Err(KernelError::InvalidCatalogRoot(root)) => {
            return Err(fail(mode, "Plan Armory root is invalid.", root));
        }
        Err(err) => return Err(err).context("equip failed"),
    };
    // Only runs that passed the gate touch config.
    session.persist(&ConfigUpdate {
        mode: Some(mode),
        ..ConfigUpdate::default()
    });

    print!(
        "{}",
        render_equip(
            mode,
            &run.outcome.installed,
            &run.outcome.failed,
            &install_dir
        )
    );
    if run.outcome.is_partial() {
        return Ok(ExitCode::from(1));
    }
    Ok(ExitCode::SUCCESS)
}
