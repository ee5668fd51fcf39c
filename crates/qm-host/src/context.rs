//! Bounded, read-only scan of the target repository.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use tracing::debug;
use walkdir::WalkDir;

use crate::git::GitRunner;

/// Files examined at most, to keep latency flat on large trees.
pub const SCAN_LIMIT: usize = 400;
/// How many of the most frequent extensions feed the term mapping.
pub const TOP_EXTENSIONS: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoContext {
    /// Human-facing lines, in display order.
    pub summary: Vec<String>,
    pub terms: BTreeSet<String>,
}

fn extension_terms(ext: &str) -> &'static [&'static str] {
    match ext {
        ".sh" => &["shell", "automation", "macos"],
        ".ps1" => &["powershell", "automation"],
        ".yml" | ".yaml" => &["ci", "release"],
        ".py" => &["python"],
        ".md" => &["docs"],
        _ => &[],
    }
}

pub fn analyze(git: &impl GitRunner, repo_path: &Path) -> RepoContext {
    let mut summary = vec![format!("Repo path: {}", repo_path.display())];
    let mut terms = BTreeSet::new();
    let repo = repo_path.to_string_lossy().into_owned();

    if let Ok(out) = git.run(&["-C", repo.as_str(), "rev-parse", "--abbrev-ref", "HEAD"], repo_path) {
        if out.success && !out.output.is_empty() {
            summary.push(format!("Git branch: {}", out.output.trim()));
        }
    }

    if let Ok(out) = git.run(&["-C", repo.as_str(), "status", "--porcelain"], repo_path) {
        if out.success {
            let dirty = out.output.lines().filter(|l| !l.trim().is_empty()).count();
            summary.push(format!("Dirty files: {dirty}"));
            if dirty > 0 {
                terms.extend(["stability", "diagnostics"].map(String::from));
            }
        }
    }

    let top = top_extensions(&count_extensions(repo_path));
    if !top.is_empty() {
        let listed: Vec<String> = top
            .iter()
            .map(|(ext, count)| {
                let label = if ext.is_empty() { "(none)" } else { ext.as_str() };
                format!("{label} ({count})")
            })
            .collect();
        summary.push(format!("Top extensions: {}", listed.join(", ")));
    }
    for (ext, _) in &top {
        terms.extend(extension_terms(ext).iter().map(|t| t.to_string()));
    }

    if repo_path.join(".github").join("workflows").exists() {
        terms.extend(["release", "preflight"].map(String::from));
    }

    RepoContext { summary, terms }
}

/// Lowercase extension (with leading dot, empty for none) to file count.
fn count_extensions(repo_path: &Path) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    let files = WalkDir::new(repo_path)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.file_name() != ".git")
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .take(SCAN_LIMIT);

    let mut scanned = 0;
    for entry in files {
        scanned += 1;
        let ext = entry
            .path()
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
            .unwrap_or_default();
        *counts.entry(ext).or_insert(0) += 1;
    }
    debug!(scanned, limit = SCAN_LIMIT, "repo scan");
    counts
}

fn top_extensions(counts: &BTreeMap<String, usize>) -> Vec<(String, usize)> {
    let mut ranked: Vec<(String, usize)> = counts.iter().map(|(k, v)| (k.clone(), *v)).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(TOP_EXTENSIONS);
    ranked
}
