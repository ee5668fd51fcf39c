//! Process-boundary adapters: git invocations, the catalog refresh gate, the
//! target repository scan, and Armory root discovery.

pub mod context;
pub mod discovery;
pub mod error;
pub mod git;
pub mod refresh;

pub use context::{RepoContext, analyze};
pub use discovery::{ResolvedRoot, RootSearch, resolve_armory_root};
pub use error::HostError;
pub use git::{GitOutput, GitRunner, SystemGit};
pub use refresh::{RefreshPath, RefreshResult, is_detached_head, refresh};
