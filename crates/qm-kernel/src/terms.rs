use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

/// Filler words that never count as task terms.
pub const STOP_WORDS: [&str; 18] = [
    "this", "that", "with", "from", "have", "need", "repo", "issue", "task", "help", "please",
    "about", "into", "when", "your", "their", "the", "and",
];

const MIN_TERM_LEN: usize = 3;

static SEPARATORS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("separator pattern is valid"));

/// Tokenize the task together with repo-derived terms into a sorted term set.
pub fn extract_terms<'a>(task: &str, repo_terms: impl IntoIterator<Item = &'a str>) -> BTreeSet<String> {
    let mut source = task.to_string();
    for term in repo_terms {
        source.push(' ');
        source.push_str(term);
    }
    let source = source.trim().to_lowercase();
    SEPARATORS
        .split(&source)
        .filter(|tok| tok.len() >= MIN_TERM_LEN && !STOP_WORDS.contains(tok))
        .map(str::to_string)
        .collect()
}
