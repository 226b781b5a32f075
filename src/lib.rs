pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use adapters::{FixedClock, JsonlHistoryStore, SystemClock};
pub use config::toml_config::TomlConfig;
pub use crate::core::{generator::ExcuseGenerator, session::ExcuseSession, templates::TemplateCatalog};
pub use domain::model::{Audience, ExcuseRequest, HistoryEntry, Length, Scenario, Tone};
pub use utils::error::{ExcuseError, Result};
