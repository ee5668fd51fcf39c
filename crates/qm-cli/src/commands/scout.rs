//! `quartermaster scout`: read-only recommendation.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;
use qm_kernel::render_scout;

use crate::commands::{LoadoutArgs, scout_loadout};
use crate::opts::{GlobalOpts, Session};

#[derive(Args, Debug)]
pub struct ScoutArgs {
    #[command(flatten)]
    pub loadout: LoadoutArgs,
}

pub fn cmd_scout(opts: &GlobalOpts, args: &ScoutArgs) -> Result<ExitCode> {
    let session = Session::open(opts)?;
    let run = scout_loadout(
        &session,
        &args.loadout,
        "Armory refresh failed; stopping before scout.",
    )?;
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
    Ok(ExitCode::SUCCESS)
}
