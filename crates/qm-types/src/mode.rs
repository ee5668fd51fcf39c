use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Voice applied to every user-facing line: narrative (`saga`) or plain (`civ`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    #[default]
    Saga,
    Civ,
}

impl Mode {
    /// Values accepted on the command line; `lore` and `crystal` are saga aliases.
    pub const ACCEPTED: [&'static str; 4] = ["saga", "civ", "lore", "crystal"];

    /// Map a raw mode value onto the closed `{saga, civ}` set.
    ///
    /// `civilian_aliases` only matters for values that are not recognized: it
    /// turns the fallback from saga into civ.
    pub fn normalize(raw: &str, civilian_aliases: bool) -> Mode {
        match raw.trim().to_ascii_lowercase().as_str() {
            "civ" => Mode::Civ,
            "saga" | "lore" | "crystal" => Mode::Saga,
            _ if civilian_aliases => Mode::Civ,
            _ => Mode::Saga,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Saga => "saga",
            Mode::Civ => "civ",
        }
    }

    pub fn is_civ(self) -> bool {
        self == Mode::Civ
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Mode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// Persisted documents are hand-editable, so any value (or null) is accepted
// and normalized instead of rejected.
impl<'de> Deserialize<'de> for Mode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(Mode::normalize(raw.as_deref().unwrap_or_default(), false))
    }
}
