use std::collections::BTreeSet;

use qm_types::{CatalogEntry, Mode};

use crate::closure::{Closure, eligible_by_id, expand};
use crate::score::{ScoredCandidate, shortlist};
use crate::terms::extract_terms;

/// Everything a scout or plan run decides from the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scouting {
    pub terms: BTreeSet<String>,
    pub shortlist: Vec<ScoredCandidate>,
    pub closure: Closure,
}

pub fn scout(
    entries: &[CatalogEntry],
    repo_terms: &BTreeSet<String>,
    task: &str,
    top: usize,
    mode: Mode,
) -> Scouting {
    let terms = extract_terms(task, repo_terms.iter().map(String::as_str));
    let shortlist = shortlist(entries, &terms, top, mode);
    let seeds: Vec<&str> = shortlist.iter().map(|c| c.id.as_str()).collect();
    let closure = expand(&seeds, &eligible_by_id(entries));
    Scouting {
        terms,
        shortlist,
        closure,
    }
}
