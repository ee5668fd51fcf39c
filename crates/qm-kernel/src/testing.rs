use qm_types::{CatalogEntry, Display, DisplayText, EntryClass, EntryStatus, InstallSpec};

/// Active catalog entry with an entrypoint under `bin/`.
pub fn entry(id: &str, class: EntryClass, deps: &[&str]) -> CatalogEntry {
    CatalogEntry {
        id: id.to_string(),
        class,
        status: EntryStatus::Active,
        tags: Vec::new(),
        display: Display::default(),
        install: InstallSpec {
            entrypoint_path: Some(format!("bin/{id}.sh")),
            dependencies: deps.iter().map(|d| d.to_string()).collect(),
            ..InstallSpec::default()
        },
        source: None,
    }
}

pub fn with_tags(mut entry: CatalogEntry, tags: &[&str]) -> CatalogEntry {
    entry.tags = tags.iter().map(|t| t.to_string()).collect();
    entry
}

pub fn with_display(mut entry: CatalogEntry, saga: (&str, &str), civ: (&str, &str)) -> CatalogEntry {
    entry.display = Display {
        saga: Some(DisplayText {
            name: saga.0.to_string(),
            description: saga.1.to_string(),
        }),
        civ: Some(DisplayText {
            name: civ.0.to_string(),
            description: civ.1.to_string(),
        }),
    };
    entry
}
