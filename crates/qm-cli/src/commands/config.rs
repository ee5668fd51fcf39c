//! `quartermaster config`: the shared Armory config helper.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use qm_store::{ConfigStore, ConfigUpdate};
use qm_types::Mode;
use serde_json::Value;

use crate::opts::{GlobalOpts, Session};

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub cmd: ConfigSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigSubcommand {
    /// Print the normalized config JSON
    Show,

    /// Print one config value (exit 1 when absent)
    Get(GetArgs),

    /// Set the mode and keep civilianAliases in step
    SetMode(SetModeArgs),

    /// Normalize a raw mode value without touching config
    NormalizeMode(NormalizeModeArgs),
}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Config key, e.g. installDir
    pub key: String,

    /// Printed when the key is absent
    #[arg(long)]
    pub default: Option<String>,
}

#[derive(Args, Debug)]
pub struct SetModeArgs {
    #[arg(value_parser = Mode::ACCEPTED)]
    pub mode: String,
}

#[derive(Args, Debug)]
pub struct NormalizeModeArgs {
    pub value: String,

    /// Map unrecognized values to civ instead of saga
    #[arg(long)]
    pub civilian_aliases: bool,
}

pub fn cmd_config(opts: &GlobalOpts, args: &ConfigArgs) -> Result<ExitCode> {
    match &args.cmd {
        ConfigSubcommand::Show => {
            let session = Session::open(opts)?;
            let cfg = session.config.load().context("failed to load config")?;
            println!("{}", serde_json::to_string_pretty(&cfg)?);
            Ok(ExitCode::SUCCESS)
        }
        ConfigSubcommand::Get(get) => {
            let session = Session::open(opts)?;
            let cfg = session.config.load().context("failed to load config")?;
            let value = cfg
                .get(&get.key)
                .or_else(|| get.default.clone().map(Value::String));
            print_value(value)
        }
        ConfigSubcommand::SetMode(set) => {
            let session = Session::open(opts)?;
            let cfg = session
                .config
                .ensure(&ConfigUpdate {
                    mode: Some(Mode::normalize(&set.mode, false)),
                    ..ConfigUpdate::default()
                })
                .context("failed to update config")?;
            println!("{}", cfg.mode);
            Ok(ExitCode::SUCCESS)
        }
        ConfigSubcommand::NormalizeMode(norm) => {
            println!("{}", Mode::normalize(&norm.value, norm.civilian_aliases));
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn print_value(value: Option<Value>) -> Result<ExitCode> {
    match value {
        None | Some(Value::Null) => return Ok(ExitCode::from(1)),
        Some(Value::Bool(flag)) => println!("{flag}"),
        Some(Value::String(text)) => println!("{text}"),
        Some(value @ (Value::Object(_) | Value::Array(_))) => {
            println!("{}", serde_json::to_string_pretty(&value)?)
        }
        Some(other) => println!("{other}"),
    }
    Ok(ExitCode::SUCCESS)
}
