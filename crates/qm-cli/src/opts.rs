//! Global CLI options and state directory resolution.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use qm_kernel::{env_mode, resolve_mode};
use qm_store::{
    ConfigStore, ConfigUpdate, FsConfigStore, FsPlanStore, PlanTarget, expand_user,
};
use qm_types::{Config, Mode};
use tracing::warn;

/// Global options for every command.
#[derive(Args, Debug, Clone)]
pub struct GlobalOpts {
    /// State directory holding config.json and the last plan (env: ARMORY_STATE_DIR, default: ~/.armory)
    #[arg(long, global = true, env = "ARMORY_STATE_DIR")]
    pub state_dir: Option<PathBuf>,
}

/// `--mode` as accepted by every action.
#[derive(Args, Debug, Clone, Default)]
pub struct ModeArg {
    /// Output voice (lore and crystal are saga aliases)
    #[arg(long, value_parser = Mode::ACCEPTED)]
    pub mode: Option<String>,
}

/// Which saved plan an action works on.
#[derive(Args, Debug, Clone, Default)]
pub struct PlanPathArgs {
    /// Plan file to read or write (default: the last-plan pointer)
    #[arg(long)]
    pub plan_path: Option<String>,

    /// Use the last saved plan (the default when --plan-path is absent)
    #[arg(long)]
    pub from_last_plan: bool,
}

impl PlanPathArgs {
    pub fn target(&self) -> PlanTarget {
        PlanTarget::from_arg(self.plan_path.as_deref())
    }
}

/// Stores rooted at the resolved state directory.
#[derive(Debug, Clone)]
pub struct Session {
    pub config: FsConfigStore,
    pub plans: FsPlanStore,
}

impl Session {
    pub fn open(opts: &GlobalOpts) -> Result<Self> {
        let state_dir = match &opts.state_dir {
            Some(dir) => expand_user(&dir.to_string_lossy()),
            None => dirs::home_dir()
                .context("cannot determine home directory for ~/.armory")?
                .join(".armory"),
        };
        Ok(Self {
            config: FsConfigStore::new(state_dir.join("config.json")),
            plans: FsPlanStore::open(&state_dir),
        })
    }

    /// Stored config, or defaults when the document cannot be read.
    pub fn load_config(&self) -> Config {
        match self.config.load() {
            Ok(cfg) => cfg,
            Err(err) => {
                warn!(error = %err, "config unreadable; using defaults");
                self.config.defaults()
            }
        }
    }

    /// Upsert into config; a failed write is logged and the run carries on.
    pub fn persist(&self, update: &ConfigUpdate) {
        if let Err(err) = self.config.ensure(update) {
            warn!(error = %err, path = %self.config.path().display(), "config not persisted");
        }
    }

    /// Flag, stored config, `.sovereign.json` in `repo_path`, environment.
    pub fn active_mode(&self, flag: &ModeArg, config: &Config, repo_path: &Path) -> Mode {
        resolve_mode(
            flag.mode.as_deref(),
            config,
            repo_path,
            env_mode().as_deref(),
        )
    }
}
