//! Fast-forward of the local Armory mirror, run before any planning decision.

use std::path::Path;

use qm_types::RefreshRecord;
use tracing::{debug, warn};

use crate::git::{GitRunner, join_nonempty};

pub const PULL_COMMAND: &str = "git -C <armoryRepoRoot> pull --ff-only";
pub const FETCH_COMMAND: &str = "git -C <armoryRepoRoot> fetch --all --prune";
pub const FALLBACK_MARKER: &str = "[detached HEAD fallback succeeded]";

const DETACHED_HEAD_TEXT: &str = "not currently on a branch";

/// Which path the refresh took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshPath {
    /// `pull --ff-only` succeeded.
    FastForward,
    /// Pull failed on a detached HEAD and `fetch --all --prune` succeeded.
    DetachedHeadFallback,
    /// Anything else. Callers must stop before touching plan state.
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshResult {
    pub success: bool,
    pub command: String,
    pub output: String,
    pub path: RefreshPath,
}

impl RefreshResult {
    pub fn record(&self) -> RefreshRecord {
        RefreshRecord {
            success: self.success,
            command: self.command.clone(),
            output: self.output.clone(),
        }
    }
}

/// Whether git output says the checkout is on a detached HEAD.
///
/// git offers no structured signal for this, so the check reads the
/// human-facing message. A git release that rewords it will route detached
/// checkouts to [`RefreshPath::Failed`].
pub fn is_detached_head(output: &str) -> bool {
    output.to_lowercase().contains(DETACHED_HEAD_TEXT)
}

/// Pull the Armory mirror, falling back to a fetch once on detached HEAD.
///
/// There are no other retries; network errors fail the refresh.
pub fn refresh(git: &impl GitRunner, armory_root: &Path) -> RefreshResult {
    let root = armory_root.to_string_lossy().into_owned();
    let (pulled, output) = run(git, &["-C", root.as_str(), "pull", "--ff-only"], armory_root);
    if pulled {
        debug!("armory refresh fast-forwarded");
        return RefreshResult {
            success: true,
            command: PULL_COMMAND.to_string(),
            output,
            path: RefreshPath::FastForward,
        };
    }

    if is_detached_head(&output) {
        let (fetched, fetch_output) =
            run(git, &["-C", root.as_str(), "fetch", "--all", "--prune"], armory_root);
        if fetched {
            debug!("armory refresh used detached-head fallback");
            return RefreshResult {
                success: true,
                command: format!("{PULL_COMMAND} (detached-head fallback: {FETCH_COMMAND})"),
                output: join_nonempty([output.as_str(), FALLBACK_MARKER, fetch_output.as_str()]),
                path: RefreshPath::DetachedHeadFallback,
            };
        }
    }

    warn!("armory refresh failed");
    RefreshResult {
        success: false,
        command: PULL_COMMAND.to_string(),
        output,
        path: RefreshPath::Failed,
    }
}

fn run(git: &impl GitRunner, args: &[&str], cwd: &Path) -> (bool, String) {
    match git.run(args, cwd) {
        Ok(out) => (out.success, out.output),
        Err(err) => (false, format!("failed to run git: {err}")),
    }
}
