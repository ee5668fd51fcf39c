use std::io;
use std::path::Path;
use std::process::Command;

use tracing::debug;

/// Combined result of one git invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitOutput {
    pub success: bool,
    /// Trimmed stdout and stderr, joined by a newline (empty parts dropped).
    pub output: String,
}

impl GitOutput {
    pub fn new(success: bool, output: impl Into<String>) -> Self {
        Self {
            success,
            output: output.into(),
        }
    }
}

/// Seam over the `git` executable so callers can be driven by a script in tests.
pub trait GitRunner {
    fn run(&self, args: &[&str], cwd: &Path) -> io::Result<GitOutput>;
}

/// Runs the `git` found on `PATH`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemGit;

impl GitRunner for SystemGit {
    fn run(&self, args: &[&str], cwd: &Path) -> io::Result<GitOutput> {
        debug!(?args, cwd = %cwd.display(), "git");
        let out = Command::new("git").args(args).current_dir(cwd).output()?;
        let stdout = String::from_utf8_lossy(&out.stdout);
        let stderr = String::from_utf8_lossy(&out.stderr);
        Ok(GitOutput::new(
            out.status.success(),
            join_nonempty([stdout.trim(), stderr.trim()]),
        ))
    }
}

pub(crate) fn join_nonempty<'a>(parts: impl IntoIterator<Item = &'a str>) -> String {
    parts
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_drops_empty_parts() {
        assert_eq!(join_nonempty(["a", "", "b"]), "a\nb");
        assert_eq!(join_nonempty(["", ""]), "");
    }
}
