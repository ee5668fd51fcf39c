//! Reading the Armory catalog: the built manifest when present, otherwise the
//! shop catalog it is generated from.

use std::path::{Path, PathBuf};

use qm_types::{CatalogEntry, SourceRef};
use serde_json::Value;
use tracing::{debug, warn};

use crate::{StoreError, StoreResult, io_error};

pub const MANIFEST_PATH: &str = "docs/data/armory-manifest.v1.json";
pub const CATALOG_PATH: &str = "shop/catalog.json";
pub const BOOTSTRAP_SCRIPT: &str = "awakening.sh";

/// Ref recorded when entries come straight from the shop catalog.
pub const LOCAL_REF: &str = "local";

#[derive(Debug, Clone)]
pub struct LoadedCatalog {
    pub manifest_ref: String,
    pub entries: Vec<CatalogEntry>,
}

/// A directory holding `awakening.sh` and `shop/catalog.json`.
pub fn is_armory_root(path: &Path) -> bool {
    path.is_dir() && path.join(BOOTSTRAP_SCRIPT).is_file() && path.join(CATALOG_PATH).is_file()
}

pub fn load_catalog(armory_root: &Path) -> StoreResult<LoadedCatalog> {
    let manifest = armory_root.join(MANIFEST_PATH);
    if manifest.exists() {
        let doc = read_json(&manifest)?;
        let manifest_ref = doc
            .get("ref")
            .and_then(Value::as_str)
            .unwrap_or(LOCAL_REF)
            .to_string();
        let entries = parse_entries(&doc, &manifest, false);
        debug!(path = %manifest.display(), entries = entries.len(), "loaded manifest");
        return Ok(LoadedCatalog {
            manifest_ref,
            entries,
        });
    }

    let catalog = armory_root.join(CATALOG_PATH);
    let doc = read_json(&catalog)?;
    let entries = parse_entries(&doc, &catalog, true);
    debug!(path = %catalog.display(), entries = entries.len(), "loaded shop catalog");
    Ok(LoadedCatalog {
        manifest_ref: LOCAL_REF.to_string(),
        entries,
    })
}

fn read_json(path: &Path) -> StoreResult<Value> {
    let text = std::fs::read_to_string(path).map_err(|e| io_error(path, e))?;
    serde_json::from_str(&text).map_err(|source| StoreError::Json {
        path: PathBuf::from(path),
        source,
    })
}

fn parse_entries(doc: &Value, path: &Path, with_source: bool) -> Vec<CatalogEntry> {
    let Some(raw_entries) = doc.get("entries").and_then(Value::as_array) else {
        warn!(path = %path.display(), "catalog has no entries array");
        return Vec::new();
    };

    let mut entries = Vec::with_capacity(raw_entries.len());
    for (index, raw) in raw_entries.iter().enumerate() {
        if !raw.is_object() {
            continue;
        }
        match serde_json::from_value::<CatalogEntry>(raw.clone()) {
            Ok(mut entry) => {
                if with_source {
                    entry.source = source_ref(raw);
                }
                entries.push(entry);
            }
            Err(err) => warn!(path = %path.display(), index, "skipping catalog entry: {err}"),
        }
    }
    entries
}

// The shop catalog keeps script/readme paths at the top level of each entry.
fn source_ref(raw: &Value) -> Option<SourceRef> {
    let field = |key: &str| raw.get(key).and_then(Value::as_str).map(str::to_string);
    let source = SourceRef {
        script_path: field("scriptPath"),
        readme_path: field("readmePath"),
    };
    (source != SourceRef::default()).then_some(source)
}
