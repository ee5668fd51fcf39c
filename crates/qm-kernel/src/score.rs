//! Relevance scoring of catalog entries against a term set.

use std::collections::BTreeSet;

use qm_types::{CatalogEntry, EntryClass, Mode};

const STRUCTURAL_WEIGHT: u32 = 4;
const DISPLAY_WEIGHT: u32 = 2;

/// A shortlisted entry with its score and the text shown for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredCandidate {
    pub id: String,
    pub class: EntryClass,
    pub score: u32,
    pub name: String,
    pub description: String,
    pub rationale: String,
    pub matched_terms: Vec<String>,
    pub dependencies: Vec<String>,
    pub entrypoint_path: Option<String>,
}

/// Score one entry. Each term adds 4 when it appears in the id, class, or
/// tags, and 2 more when it appears in any display text. Entries that match
/// nothing get a floor of 2 (items and spells) or 1.
pub fn score_entry(entry: &CatalogEntry, terms: &BTreeSet<String>) -> (u32, Vec<String>) {
    let id = entry.id.to_lowercase();
    let class = entry.class.as_str();
    let tags = entry.tags.join(" ").to_lowercase();
    let display = display_text(entry);

    let mut score = 0;
    let mut matched = BTreeSet::new();
    for term in terms {
        let term = term.as_str();
        if id.contains(term) || class.contains(term) || tags.contains(term) {
            score += STRUCTURAL_WEIGHT;
            matched.insert(term.to_string());
        }
        if display.contains(term) {
            score += DISPLAY_WEIGHT;
            matched.insert(term.to_string());
        }
    }

    if score == 0 {
        score = match entry.class {
            EntryClass::Item | EntryClass::Spell => 2,
            _ => 1,
        };
    }
    (score, matched.into_iter().collect())
}

fn display_text(entry: &CatalogEntry) -> String {
    [entry.display.saga.as_ref(), entry.display.civ.as_ref()]
        .into_iter()
        .flat_map(|text| match text {
            Some(text) => [text.name.as_str(), text.description.as_str()],
            None => ["", ""],
        })
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

pub fn rationale(matched: &[String]) -> String {
    if matched.is_empty() {
        "General-purpose active Armory tool for diagnostics/readiness.".to_string()
    } else {
        format!("Matches task/context terms: {}.", matched.join(", "))
    }
}

/// Rank installable entries by `(-score, id)` and keep the first `top`
/// (at least one).
pub fn shortlist(
    entries: &[CatalogEntry],
    terms: &BTreeSet<String>,
    top: usize,
    mode: Mode,
) -> Vec<ScoredCandidate> {
    let mut scored: Vec<ScoredCandidate> = entries
        .iter()
        .filter(|entry| entry.is_installable())
        .map(|entry| {
            let (score, matched_terms) = score_entry(entry, terms);
            ScoredCandidate {
                id: entry.id.clone(),
                class: entry.class,
                score,
                name: entry.display_name(mode),
                description: entry.display_description(mode),
                rationale: rationale(&matched_terms),
                matched_terms,
                dependencies: entry.install.dependencies.clone(),
                entrypoint_path: entry.entrypoint().map(str::to_string),
            }
        })
        .collect();

    scored.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.id.cmp(&b.id)));
    scored.truncate(top.max(1));
    scored
}

#[cfg(test)]
mod tests {
    use qm_types::EntryStatus;

    use super::*;
    use crate::testing::{entry, with_display, with_tags};

    fn terms(list: &[&str]) -> BTreeSet<String> {
        list.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn structural_and_display_matches_stack() {
        let e = with_display(
            with_tags(entry("shell-lint", EntryClass::Weapon, &[]), &["shell", "ci"]),
            ("Blade of Lint", "Cuts shell scripts"),
            ("Shell linter", "Lints shell scripts"),
        );
        let (score, matched) = score_entry(&e, &terms(&["shell", "lint", "release"]));
        // shell: 4 + 2, lint: 4 + 2
        assert_eq!(score, 12);
        assert_eq!(matched, ["lint", "shell"]);
    }

    #[test]
    fn floor_depends_on_class() {
        let none = terms(&["zzz"]);
        assert_eq!(score_entry(&entry("a", EntryClass::Item, &[]), &none).0, 2);
        assert_eq!(score_entry(&entry("b", EntryClass::Spell, &[]), &none).0, 2);
        assert_eq!(score_entry(&entry("c", EntryClass::Weapon, &[]), &none).0, 1);
        assert_eq!(score_entry(&entry("d", EntryClass::Summon, &[]), &terms(&[])).0, 1);
    }

    #[test]
    fn class_name_counts_as_structural() {
        let (score, matched) = score_entry(&entry("x", EntryClass::Spell, &[]), &terms(&["spell"]));
        assert_eq!(score, 4);
        assert_eq!(matched, ["spell"]);
    }

    #[test]
    fn shortlist_orders_by_score_then_id_and_respects_top() {
        let entries = vec![
            entry("zeta", EntryClass::Weapon, &[]),
            entry("alpha", EntryClass::Weapon, &[]),
            with_tags(entry("beta", EntryClass::Weapon, &[]), &["release"]),
            entry("gamma", EntryClass::Item, &[]),
        ];
        let list = shortlist(&entries, &terms(&["release"]), 3, Mode::Saga);
        let ids: Vec<&str> = list.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["beta", "gamma", "alpha"]);
        assert_eq!(list[0].rationale, "Matches task/context terms: release.");
        assert_eq!(
            list[1].rationale,
            "General-purpose active Armory tool for diagnostics/readiness."
        );
    }

    #[test]
    fn shortlist_top_is_clamped_to_one() {
        let entries = vec![
            entry("a", EntryClass::Weapon, &[]),
            entry("b", EntryClass::Weapon, &[]),
        ];
        assert_eq!(shortlist(&entries, &terms(&[]), 0, Mode::Civ).len(), 1);
    }

    #[test]
    fn shortlist_skips_ineligible_entries() {
        let mut retired = entry("old", EntryClass::Weapon, &[]);
        retired.status = EntryStatus::Deprecated;
        let idea = entry("someday", EntryClass::Idea, &[]);
        let mut no_entry = entry("bare", EntryClass::Weapon, &[]);
        no_entry.install.entrypoint_path = Some(String::new());
        let keep = entry("keep", EntryClass::Weapon, &[]);

        let list = shortlist(&[retired, idea, no_entry, keep], &terms(&[]), 10, Mode::Saga);
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].id, "keep");
    }

    #[test]
    fn display_text_follows_mode_with_fallbacks() {
        let dressed = with_display(
            entry("lint", EntryClass::Weapon, &[]),
            ("Blade", "Saga text"),
            ("Linter", "Civ text"),
        );
        let plain = entry("plain", EntryClass::Weapon, &[]);

        let civ = shortlist(&[dressed.clone(), plain.clone()], &terms(&[]), 5, Mode::Civ);
        assert_eq!((civ[0].name.as_str(), civ[0].description.as_str()), ("Linter", "Civ text"));
        assert_eq!(civ[1].name, "plain");
        assert_eq!(civ[1].description, "No description available.");

        let saga = shortlist(&[dressed], &terms(&[]), 5, Mode::Saga);
        assert_eq!(saga[0].name, "Blade");
    }
}
