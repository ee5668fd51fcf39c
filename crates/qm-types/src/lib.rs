//! Quartermaster data model: catalog entries, display modes, plans, and config.

mod catalog;
mod config;
mod mode;
mod plan;

pub use catalog::{
    CatalogEntry, Display, DisplayText, EntryClass, EntryStatus, InstallSpec, NO_DESCRIPTION,
    SourceRef,
};
pub use config::{Config, DEFAULT_COMMAND_WORD};
pub use mode::Mode;
pub use plan::{EquipRecord, LoadoutEntry, PLAN_VERSION, Plan, PlanStatus, RefreshRecord};
