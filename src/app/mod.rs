pub mod commands;
pub mod interactive;

use crate::adapters::{JsonlHistoryStore, SystemClock};
use crate::config::toml_config::TomlConfig;
use crate::core::generator::ExcuseGenerator;
use crate::core::session::ExcuseSession;
use crate::core::templates::TemplateCatalog;
use crate::domain::model::ExcuseRequest;
use crate::domain::ports::Clock;
use crate::utils::error::Result;
use crate::utils::validation::validate_required_field;
use std::sync::Arc;

pub const TIPS: &[&str] = &[
    "Keep it short when you're unsure.",
    "Add one concrete detail for trust.",
    "Be clear about the new time or next step.",
];

/// Session backed by the JSONL history folder of `request` and the local clock.
///
/// `request.history_dir` must already be resolved.
pub fn build_session(
    request: &ExcuseRequest,
    file: Option<&TomlConfig>,
) -> Result<ExcuseSession<JsonlHistoryStore>> {
    let catalog = match file {
        Some(file) => file.catalog()?,
        None => TemplateCatalog::builtin(),
    };
    let dir = validate_required_field("history_dir", &request.history_dir)?;

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let generator = ExcuseGenerator::new(catalog, clock.clone());
    Ok(ExcuseSession::new(
        generator,
        JsonlHistoryStore::new(dir.clone()),
        clock,
    ))
}
