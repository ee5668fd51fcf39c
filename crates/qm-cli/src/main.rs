mod commands;
mod opts;
mod output;

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::config::ConfigArgs;
use commands::equip::EquipArgs;
use commands::plan::PlanArgs;
use commands::report::ReportArgs;
use commands::scout::ScoutArgs;
use opts::GlobalOpts;
use output::Failure;

#[derive(Parser, Debug)]
#[command(
    name = "quartermaster",
    version,
    about = "Scout, plan, and equip Armory tools for a task"
)]
struct Cli {
    #[command(flatten)]
    opts: GlobalOpts,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Recommend a loadout for a task (read-only)
    Scout(ScoutArgs),

    /// Build and save a dependency-aware plan
    Plan(PlanArgs),

    /// Install the tools of a saved plan (approval required)
    Equip(EquipArgs),

    /// Summarize the outcome of a saved plan
    Report(ReportArgs),

    /// Inspect or update the shared Armory config
    Config(ConfigArgs),
}

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_level(true)
        .init();
}

fn main() -> Result<ExitCode> {
    setup_logging();
    let cli = Cli::parse();
    let opts = &cli.opts;

    let result = match &cli.command {
        Command::Scout(args) => commands::scout::cmd_scout(opts, args),
        Command::Plan(args) => commands::plan::cmd_plan(opts, args),
        Command::Equip(args) => commands::equip::cmd_equip(opts, args),
        Command::Report(args) => commands::report::cmd_report(opts, args),
        Command::Config(args) => commands::config::cmd_config(opts, args),
    };

    match result {
        Ok(code) => Ok(code),
        Err(err) => match err.downcast_ref::<Failure>() {
            Some(failure) => Ok(failure.report()),
            None => Err(err),
        },
    }
}
