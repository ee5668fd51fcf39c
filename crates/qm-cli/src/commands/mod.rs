//! CLI command handlers.

pub mod config;
pub mod equip;
pub mod plan;
pub mod report;
pub mod scout;

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use qm_host::{RefreshResult, RepoContext, RootSearch, SystemGit, analyze, refresh, resolve_armory_root};
use qm_kernel::Scouting;
use qm_store::{ConfigUpdate, LoadedCatalog, expand_user, load_catalog};
use qm_types::Mode;
use tracing::debug;

use crate::opts::{ModeArg, Session};
use crate::output::fail;

/// Arguments shared by `scout` and `plan`.
#[derive(Args, Debug, Clone)]
pub struct LoadoutArgs {
    /// Task description to tailor the loadout to
    #[arg(long)]
    pub task: String,

    /// Maximum shortlist size (values below 1 count as 1)
    #[arg(long, default_value_t = 5, allow_negative_numbers = true)]
    pub top: i64,

    /// Target repository to scan (default: current directory)
    #[arg(long)]
    pub repo_path: Option<String>,

    /// Armory checkout to use instead of discovery
    #[arg(long)]
    pub armory_root: Option<String>,

    #[command(flatten)]
    pub mode: ModeArg,
}

impl LoadoutArgs {
    /// `--top` clamped to at least one candidate.
    pub fn top(&self) -> usize {
        usize::try_from(self.top.max(1)).unwrap_or(usize::MAX)
    }
}

/// A refreshed catalog scouted against the target repository.
pub struct Scouted {
    pub mode: Mode,
    pub repo_path: PathBuf,
    pub armory_root: PathBuf,
    pub refresh: RefreshResult,
    pub catalog: LoadedCatalog,
    pub context: RepoContext,
    pub scouting: Scouting,
}

/// Resolve inputs, refresh the Armory, then score and expand.
///
/// Nothing is written to the plan store here; a refresh failure stops the
/// run with `refresh_headline`.
pub fn scout_loadout(
    session: &Session,
    args: &LoadoutArgs,
    refresh_headline: &str,
) -> Result<Scouted> {
    let config = session.load_config();
    let repo_path = resolve_repo_path(args.repo_path.as_deref())?;

    let search = RootSearch::from_environment(args.armory_root.as_deref(), config.repo_root.as_deref())
        .map_err(|err| fail(Mode::Civ, "Armory root resolution failed", err))?;
    let root = resolve_armory_root(&search)
        .map_err(|err| fail(Mode::Civ, "Armory root resolution failed", err))?;
    debug!(root = %root.path.display(), discovered = root.discovered, "armory root");

    let mode = session.active_mode(&args.mode, &config, &repo_path);
    session.persist(&ConfigUpdate {
        repo_root: root
            .discovered
            .then(|| root.path.to_string_lossy().into_owned()),
        mode: Some(mode),
        ..ConfigUpdate::default()
    });

    let refresh = refresh(&SystemGit, &root.path);
    if !refresh.success {
        return Err(fail(mode, refresh_headline, &refresh.output));
    }

    let catalog = load_catalog(&root.path)
        .with_context(|| format!("failed to load Armory catalog from {}", root.path.display()))?;
    let context = analyze(&SystemGit, &repo_path);
    let scouting = qm_kernel::scout(&catalog.entries, &context.terms, &args.task, args.top(), mode);

    Ok(Scouted {
        mode,
        repo_path,
        armory_root: root.path,
        refresh,
        catalog,
        context,
        scouting,
    })
}

fn resolve_repo_path(raw: Option<&str>) -> Result<PathBuf> {
    let path = match raw.map(str::trim).filter(|p| !p.is_empty()) {
        Some(raw) => expand_user(raw),
        None => env::current_dir().context("cannot read current directory")?,
    };
    path.canonicalize()
        .map_err(|_| fail(Mode::Civ, "RepoPath not found", path.display()))
}

/// Working directory for actions that have no `--repo-path`.
pub fn current_dir() -> Result<PathBuf> {
    env::current_dir().context("cannot read current directory")
}
