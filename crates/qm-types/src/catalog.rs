use serde::{Deserialize, Serialize};

use crate::Mode;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryClass {
    Summon,
    Weapon,
    Spell,
    Item,
    Audio,
    Idea,
    #[default]
    #[serde(other)]
    Other,
}

impl EntryClass {
    pub fn as_str(self) -> &'static str {
        match self {
            EntryClass::Summon => "summon",
            EntryClass::Weapon => "weapon",
            EntryClass::Spell => "spell",
            EntryClass::Item => "item",
            EntryClass::Audio => "audio",
            EntryClass::Idea => "idea",
            EntryClass::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    Active,
    Idea,
    Planned,
    Deprecated,
    #[default]
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayText {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Mode-specific display text. Either block may be absent in the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Display {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saga: Option<DisplayText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub civ: Option<DisplayText>,
}

impl Display {
    pub fn for_mode(&self, mode: Mode) -> Option<&DisplayText> {
        match mode {
            Mode::Saga => self.saga.as_ref(),
            Mode::Civ => self.civ.as_ref(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entrypoint_path: Option<String>,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub bundle_paths: Vec<String>,
    #[serde(default)]
    pub platforms: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readme_path: Option<String>,
}

/// One tool as declared by the Armory catalog or manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    #[serde(default)]
    pub class: EntryClass,
    #[serde(default)]
    pub status: EntryStatus,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub display: Display,
    #[serde(default)]
    pub install: InstallSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceRef>,
}

pub const NO_DESCRIPTION: &str = "No description available.";

impl CatalogEntry {
    /// Entrypoint path relative to the Armory root, if declared and non-empty.
    pub fn entrypoint(&self) -> Option<&str> {
        self.install
            .entrypoint_path
            .as_deref()
            .filter(|path| !path.is_empty())
    }

    /// Active, not an idea, and carrying an entrypoint.
    pub fn is_installable(&self) -> bool {
        self.status == EntryStatus::Active
            && self.class != EntryClass::Idea
            && self.entrypoint().is_some()
    }

    /// Display name for `mode`, falling back to the id.
    pub fn display_name(&self, mode: Mode) -> String {
        self.display
            .for_mode(mode)
            .map(|text| text.name.as_str())
            .filter(|name| !name.is_empty())
            .unwrap_or(self.id.as_str())
            .to_string()
    }

    pub fn display_description(&self, mode: Mode) -> String {
        self.display
            .for_mode(mode)
            .map(|text| text.description.as_str())
            .filter(|desc| !desc.is_empty())
            .unwrap_or(NO_DESCRIPTION)
            .to_string()
    }
}
