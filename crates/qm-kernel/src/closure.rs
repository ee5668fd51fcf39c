//! Transitive dependency closure over installable catalog entries.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use qm_types::CatalogEntry;

/// Result of expanding a seed list.
///
/// `ids` is in breadth-first visitation order. That is not a guaranteed
/// install order: a dependency can appear after the tool that needs it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Closure {
    pub ids: Vec<String>,
    /// Referenced ids with no installable entry, sorted.
    pub missing: Vec<String>,
}

/// Index installable entries by id. Later duplicates win.
pub fn eligible_by_id(entries: &[CatalogEntry]) -> HashMap<&str, &CatalogEntry> {
    entries
        .iter()
        .filter(|entry| entry.is_installable())
        .map(|entry| (entry.id.as_str(), entry))
        .collect()
}

pub fn expand<S: AsRef<str>>(seeds: &[S], entry_by_id: &HashMap<&str, &CatalogEntry>) -> Closure {
    let mut ids = Vec::new();
    let mut missing = BTreeSet::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut queue: VecDeque<String> = seeds
        .iter()
        .map(|s| s.as_ref())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    while let Some(id) = queue.pop_front() {
        if !seen.insert(id.clone()) {
            continue;
        }
        let Some(entry) = entry_by_id.get(id.as_str()) else {
            missing.insert(id);
            continue;
        };
        for dep in &entry.install.dependencies {
            if !dep.is_empty() && !seen.contains(dep) {
                queue.push_back(dep.clone());
            }
        }
        ids.push(id);
    }

    Closure {
        ids,
        missing: missing.into_iter().collect(),
    }
}
